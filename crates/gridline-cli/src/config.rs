// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use gridline_tui::DEFAULT_LOG_CAPACITY;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const APP_NAME: &str = "gridline";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_TITLE: &str = "Files";
const DEFAULT_REFRESH_INTERVAL: &str = "5s";
const DEFAULT_SELECTION_KEY: &str = "Name";
const MAX_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub browser: Browser,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            ui: Ui::default(),
            browser: Browser::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub title: Option<String>,
    pub refresh_interval: Option<String>,
    pub log_lines: Option<i64>,
    pub help_expanded: Option<bool>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            title: Some(DEFAULT_TITLE.to_owned()),
            refresh_interval: Some(DEFAULT_REFRESH_INTERVAL.to_owned()),
            log_lines: i64::try_from(DEFAULT_LOG_CAPACITY).ok(),
            help_expanded: Some(false),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Browser {
    pub root: Option<String>,
    pub show_hidden: Option<bool>,
    pub selection_key: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("GRIDLINE_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set GRIDLINE_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [ui] and [browser]",
                    path.display()
                )
            })?;
        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(interval) = &self.ui.refresh_interval {
            let parsed = parse_duration(interval)?;
            if parsed.is_zero() {
                bail!(
                    "ui.refresh_interval in {} must be positive, got {}",
                    path.display(),
                    interval
                );
            }
            if parsed > MAX_REFRESH_INTERVAL {
                bail!(
                    "ui.refresh_interval in {} must be at most 24h, got {}",
                    path.display(),
                    interval
                );
            }
        }

        if let Some(lines) = self.ui.log_lines
            && lines <= 0
        {
            bail!(
                "ui.log_lines in {} must be positive, got {}",
                path.display(),
                lines
            );
        }

        if let Some(key) = &self.browser.selection_key
            && key.trim().is_empty()
        {
            bail!(
                "browser.selection_key in {} must name a column",
                path.display()
            );
        }

        Ok(())
    }

    pub fn title(&self) -> &str {
        self.ui.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    pub fn refresh_interval(&self) -> Result<Duration> {
        parse_duration(
            self.ui
                .refresh_interval
                .as_deref()
                .unwrap_or(DEFAULT_REFRESH_INTERVAL),
        )
    }

    pub fn log_lines(&self) -> usize {
        self.ui
            .log_lines
            .and_then(|lines| usize::try_from(lines).ok())
            .filter(|lines| *lines > 0)
            .unwrap_or(DEFAULT_LOG_CAPACITY)
    }

    pub fn help_expanded(&self) -> bool {
        self.ui.help_expanded.unwrap_or(false)
    }

    /// The configured root, else the current directory.
    pub fn browser_root(&self) -> Result<PathBuf> {
        match &self.browser.root {
            Some(root) => Ok(PathBuf::from(root)),
            None => env::current_dir().context("resolve current directory"),
        }
    }

    pub fn show_hidden(&self) -> bool {
        self.browser.show_hidden.unwrap_or(false)
    }

    pub fn selection_key(&self) -> &str {
        self.browser
            .selection_key
            .as_deref()
            .unwrap_or(DEFAULT_SELECTION_KEY)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# gridline config\n# Place this file at: {}\n\nversion = 1\n\n[ui]\ntitle = \"{}\"\n# <N>ms, <N>s or <N>m\nrefresh_interval = \"{}\"\nlog_lines = {}\nhelp_expanded = false\n\n[browser]\n# Optional. Default is the current directory\n# root = \"/absolute/path\"\nshow_hidden = false\nselection_key = \"{}\"\n",
            path.display(),
            DEFAULT_TITLE,
            DEFAULT_REFRESH_INTERVAL,
            DEFAULT_LOG_CAPACITY,
            DEFAULT_SELECTION_KEY,
        )
    }
}

pub fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins.saturating_mul(60)));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}
