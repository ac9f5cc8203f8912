// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const REFRESH_KEY: KeySymbol = KeySymbol::Char('R');
pub const HELP_KEY: KeySymbol = KeySymbol::Char('?');
pub const BACK_KEY: KeySymbol = KeySymbol::Esc;

/// A key as the binding table sees it: one printable character or a named
/// special key. Modifiers live on [`KeyStroke`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum KeySymbol {
    Char(char),
    Esc,
    Enter,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

impl KeySymbol {
    const NAMED: [(&'static str, KeySymbol); 15] = [
        ("ESC", Self::Esc),
        ("Enter", Self::Enter),
        ("Tab", Self::Tab),
        ("BackTab", Self::BackTab),
        ("Backspace", Self::Backspace),
        ("Delete", Self::Delete),
        ("Insert", Self::Insert),
        ("Up", Self::Up),
        ("Down", Self::Down),
        ("Left", Self::Left),
        ("Right", Self::Right),
        ("Home", Self::Home),
        ("End", Self::End),
        ("PgUp", Self::PageUp),
        ("PgDn", Self::PageDown),
    ];

    pub fn label(self) -> String {
        match self {
            Self::Char(' ') => "Space".to_owned(),
            Self::Char(ch) => ch.to_string(),
            Self::F(number) => format!("F{number}"),
            named => Self::NAMED
                .iter()
                .find(|(_, symbol)| *symbol == named)
                .map(|(label, _)| (*label).to_owned())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for KeySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for KeySymbol {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let mut chars = raw.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Ok(Self::Char(ch));
        }
        if raw.eq_ignore_ascii_case("space") {
            return Ok(Self::Char(' '));
        }
        if raw.eq_ignore_ascii_case("escape") {
            return Ok(Self::Esc);
        }
        if let Some((_, symbol)) = Self::NAMED
            .iter()
            .find(|(label, _)| label.eq_ignore_ascii_case(raw))
        {
            return Ok(*symbol);
        }
        if let Some(number) = raw.strip_prefix(['F', 'f'])
            && let Ok(number) = number.parse::<u8>()
            && (1..=24).contains(&number)
        {
            return Ok(Self::F(number));
        }
        bail!("unknown key {raw:?}; use a single character or a name like ESC, Enter, PgUp, F5")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyStroke {
    pub symbol: KeySymbol,
    pub control: bool,
    pub alt: bool,
}

impl KeyStroke {
    pub const fn plain(symbol: KeySymbol) -> Self {
        Self {
            symbol,
            control: false,
            alt: false,
        }
    }

    pub const fn ctrl(ch: char) -> Self {
        Self {
            symbol: KeySymbol::Char(ch),
            control: true,
            alt: false,
        }
    }

    pub const fn is_plain(self) -> bool {
        !self.control && !self.alt
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: KeySymbol,
    pub description: String,
}

/// Key to description registry. Keys are unique; re-binding a key replaces
/// its description in place so help ordering stays stable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyBindingTable {
    bindings: Vec<KeyBinding>,
}

impl KeyBindingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_standard_keys() -> Self {
        let mut table = Self::new();
        table.register_standard_keys();
        table
    }

    pub fn register_standard_keys(&mut self) {
        self.bind(REFRESH_KEY, "Refresh");
        self.bind(HELP_KEY, "Help");
        self.bind(BACK_KEY, "Back");
    }

    pub fn bind(&mut self, key: KeySymbol, description: impl Into<String>) {
        let description = description.into();
        match self.bindings.iter_mut().find(|binding| binding.key == key) {
            Some(existing) => existing.description = description,
            None => self.bindings.push(KeyBinding { key, description }),
        }
    }

    pub fn unbind(&mut self, key: KeySymbol) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|binding| binding.key != key);
        self.bindings.len() != before
    }

    pub fn description(&self, key: KeySymbol) -> Option<&str> {
        self.bindings
            .iter()
            .find(|binding| binding.key == key)
            .map(|binding| binding.description.as_str())
    }

    pub fn contains(&self, key: KeySymbol) -> bool {
        self.description(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyBinding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn is_builtin(key: KeySymbol) -> bool {
        matches!(key, REFRESH_KEY | HELP_KEY | BACK_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::{BACK_KEY, HELP_KEY, KeyBindingTable, KeySymbol, REFRESH_KEY};
    use anyhow::Result;

    #[test]
    fn standard_keys_are_seeded_in_order() {
        let table = KeyBindingTable::with_standard_keys();
        let seeded = table
            .iter()
            .map(|binding| (binding.key, binding.description.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            seeded,
            vec![
                (REFRESH_KEY, "Refresh"),
                (HELP_KEY, "Help"),
                (BACK_KEY, "Back")
            ]
        );
    }

    #[test]
    fn last_registration_wins_without_reordering() {
        let mut table = KeyBindingTable::with_standard_keys();
        table.bind(KeySymbol::Char('C'), "Connect");
        table.bind(REFRESH_KEY, "Reload pods");
        table.bind(KeySymbol::Char('C'), "Connect (ssh)");

        assert_eq!(table.len(), 4);
        assert_eq!(table.description(REFRESH_KEY), Some("Reload pods"));
        assert_eq!(
            table.description(KeySymbol::Char('C')),
            Some("Connect (ssh)")
        );
        assert_eq!(table.iter().next().map(|binding| binding.key), Some(REFRESH_KEY));
    }

    #[test]
    fn unbind_removes_only_the_named_key() {
        let mut table = KeyBindingTable::with_standard_keys();
        assert!(table.unbind(HELP_KEY));
        assert!(!table.unbind(HELP_KEY));
        assert!(table.contains(REFRESH_KEY));
        assert!(!table.contains(HELP_KEY));
    }

    #[test]
    fn symbols_parse_from_labels() -> Result<()> {
        assert_eq!("C".parse::<KeySymbol>()?, KeySymbol::Char('C'));
        assert_eq!("ESC".parse::<KeySymbol>()?, KeySymbol::Esc);
        assert_eq!("escape".parse::<KeySymbol>()?, KeySymbol::Esc);
        assert_eq!("pgdn".parse::<KeySymbol>()?, KeySymbol::PageDown);
        assert_eq!("F5".parse::<KeySymbol>()?, KeySymbol::F(5));
        assert_eq!("space".parse::<KeySymbol>()?, KeySymbol::Char(' '));
        Ok(())
    }

    #[test]
    fn unknown_symbol_names_are_rejected() {
        let error = "Hyper".parse::<KeySymbol>().expect_err("unknown name should fail");
        assert!(error.to_string().contains("unknown key"));
        assert!("F99".parse::<KeySymbol>().is_err());
    }

    #[test]
    fn labels_round_trip_through_parse() -> Result<()> {
        for symbol in [
            KeySymbol::Char('x'),
            KeySymbol::Char(' '),
            KeySymbol::Esc,
            KeySymbol::PageUp,
            KeySymbol::F(12),
        ] {
            assert_eq!(symbol.label().parse::<KeySymbol>()?, symbol);
        }
        Ok(())
    }
}
