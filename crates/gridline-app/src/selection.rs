// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::Serialize;
use std::collections::BTreeMap;

/// How the tracked row is emphasized. Cursor rows come from exploratory
/// movement; confirmed rows went through the full selection contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    None,
    Cursor,
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    row: Option<usize>,
    highlight: Highlight,
}

impl Selection {
    pub const fn selected(&self) -> Option<usize> {
        self.row
    }

    pub const fn highlight(&self) -> Highlight {
        self.highlight
    }

    pub fn highlight_for(&self, row: usize) -> Highlight {
        if self.row == Some(row) {
            self.highlight
        } else {
            Highlight::None
        }
    }

    pub fn move_by(&mut self, delta: isize, row_count: usize) -> Option<usize> {
        if row_count == 0 {
            self.clear();
            return None;
        }

        let next = match self.row {
            None => 0,
            Some(current) if delta.is_negative() => current.saturating_sub(delta.unsigned_abs()),
            Some(current) => current.saturating_add(delta.unsigned_abs()),
        };
        self.place_cursor(next.min(row_count - 1));
        self.row
    }

    pub fn jump_first(&mut self, row_count: usize) -> Option<usize> {
        if row_count == 0 {
            self.clear();
            return None;
        }
        self.place_cursor(0);
        self.row
    }

    pub fn jump_last(&mut self, row_count: usize) -> Option<usize> {
        if row_count == 0 {
            self.clear();
            return None;
        }
        self.place_cursor(row_count - 1);
        self.row
    }

    /// Places the cursor on `row` without confirming it.
    pub fn move_to(&mut self, row: usize, row_count: usize) -> Option<usize> {
        if row >= row_count {
            return None;
        }
        self.place_cursor(row);
        self.row
    }

    /// Marks `row` confirmed. Returns false when the index is out of range.
    pub fn confirm(&mut self, row: usize, row_count: usize) -> bool {
        if row >= row_count {
            return false;
        }
        self.row = Some(row);
        self.highlight = Highlight::Confirmed;
        true
    }

    /// Moves the tracked row after a reload, keeping its emphasis.
    pub fn restore(&mut self, row: usize) {
        self.row = Some(row);
        if self.highlight == Highlight::None {
            self.highlight = Highlight::Cursor;
        }
    }

    pub fn clear(&mut self) {
        self.row = None;
        self.highlight = Highlight::None;
    }

    pub fn revalidate(&mut self, row_count: usize) {
        if let Some(row) = self.row
            && row >= row_count
        {
            self.clear();
        }
    }

    fn place_cursor(&mut self, row: usize) {
        if self.row != Some(row) || self.highlight == Highlight::None {
            self.highlight = Highlight::Cursor;
        }
        self.row = Some(row);
    }
}

/// Payload delivered when a row is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSelection {
    pub index: usize,
    pub cells: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl RowSelection {
    pub fn field(&self, header: &str) -> Option<&str> {
        self.fields
            .as_ref()
            .and_then(|fields| fields.get(header))
            .map(String::as_str)
    }
}
