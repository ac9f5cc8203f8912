// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::VecDeque;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::Level;

pub const DEFAULT_LOG_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: OffsetDateTime,
    pub level: Level,
    pub message: String,
}

impl LogEntry {
    pub fn line(&self) -> String {
        let clock = self
            .timestamp
            .format(format_description!("[hour]:[minute]:[second]"))
            .unwrap_or_default();
        format!("{clock} {:<5} {}", self.level.as_str(), self.message)
    }
}

/// Bounded ring of controller log lines shown under the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPanel {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for LogPanel {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl LogPanel {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.trim();
    }

    pub fn push(&mut self, level: Level, message: impl Into<String>) {
        self.push_entry(LogEntry {
            timestamp: OffsetDateTime::now_utc(),
            level,
            message: message.into(),
        });
    }

    pub fn push_entry(&mut self, entry: LogEntry) {
        self.entries.push_back(entry);
        self.trim();
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &LogEntry> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The newest `count` entries, oldest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries
            .iter()
            .skip(self.entries.len().saturating_sub(count))
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn count_at(&self, level: Level) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.level == level)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn trim(&mut self) {
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }
}
