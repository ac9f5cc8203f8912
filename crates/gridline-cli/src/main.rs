// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod browser;
mod config;

use anyhow::{Context, Result, anyhow};
use config::{APP_NAME, Config};
use gridline_tui::App;
use std::env;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `gridline --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;
    let interval = config.refresh_interval()?;
    let root = match &options.root {
        Some(root) => root.clone(),
        None => config.browser_root()?,
    };
    if !root.is_dir() {
        return Err(anyhow!(
            "{} is not a directory; pass a directory or set [browser].root",
            root.display()
        ));
    }
    if options.check_only {
        return Ok(());
    }

    let log_path = match &options.log_file {
        Some(path) => path.clone(),
        None => default_log_path()?,
    };
    init_logging(&log_path)?;
    tracing::info!(root = %root.display(), config = %options.config_path.display(), "starting");

    let mut app = App::new();
    let mut controller = browser::install(&mut app, &config, root)?;
    controller.refresh_data();
    controller.start_auto_refresh(interval)?;

    let result = gridline_tui::run_app(&mut app, &mut controller);
    controller.destroy(&mut app);
    tracing::info!("stopped");
    result
}

fn default_log_path() -> Result<PathBuf> {
    let data_root = dirs::data_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; pass --log-file to choose a log path")
    })?;
    Ok(data_root.join(APP_NAME).join("gridline.log"))
}

/// Sends tracing output to `path`; the terminal belongs to the UI.
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_env("GRIDLINE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    root: Option<PathBuf>,
    log_file: Option<PathBuf>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        root: None,
        log_file: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--log-file" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--log-file requires a file path"))?;
                options.log_file = Some(PathBuf::from(value.as_ref()));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            flag if flag.starts_with('-') => {
                return Err(anyhow!(
                    "unknown argument {flag:?}; run with --help to see supported options"
                ));
            }
            path => {
                if options.root.is_some() {
                    return Err(anyhow!("expected at most one directory, got another: {path:?}"));
                }
                options.root = Some(PathBuf::from(path));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("gridline [directory]");
    println!("  --config <path>          Use a specific config path");
    println!("  --log-file <path>        Write logs to this file");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config and exit");
    println!("  --help                   Show this help");
}
