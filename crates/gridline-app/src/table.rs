// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{RowSelection, Selection};
use std::collections::BTreeMap;

pub const IDENTITY_SEPARATOR: char = '|';
const IDENTITY_CELLS: usize = 3;

/// Derives the identity used to find a row again after a reload.
///
/// With a selection key whose column exists in `headers`, the identity is
/// that cell. Otherwise it is the first three cells, each followed by
/// [`IDENTITY_SEPARATOR`]. The result never depends on the row's position.
pub fn row_identity(headers: &[String], row: &[String], selection_key: Option<&str>) -> String {
    if let Some(key) = selection_key
        && let Some(column) = headers.iter().position(|header| header == key)
    {
        return row.get(column).cloned().unwrap_or_default();
    }

    let mut identity = String::new();
    for cell in row.iter().take(IDENTITY_CELLS) {
        identity.push_str(cell);
        identity.push(IDENTITY_SEPARATOR);
    }
    identity
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableStore {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    selection_key: Option<String>,
    selection: Selection,
    revision: u64,
}

impl TableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.selection.selected()
    }

    pub fn selection_key(&self) -> Option<&str> {
        self.selection_key.as_deref()
    }

    pub fn set_selection_key(&mut self, key: Option<String>) {
        self.selection_key = key.filter(|key| !key.trim().is_empty());
    }

    /// Bumped on every structural change so renderers can tell a reload
    /// from a cursor move.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_headers(&mut self, headers: Vec<String>) {
        self.headers = headers;
        self.selection.revalidate(self.rows.len());
        self.revision = self.revision.wrapping_add(1);
    }

    /// Replaces every row and re-selects the row whose identity matches the
    /// one selected before the call. Returns the restored index.
    pub fn set_data(&mut self, rows: Vec<Vec<String>>) -> Option<usize> {
        let previous = self
            .selection
            .selected()
            .and_then(|index| self.rows.get(index))
            .map(|row| self.identity_of(row));

        self.rows = rows;
        self.revision = self.revision.wrapping_add(1);

        let restored = previous.and_then(|identity| self.find_by_identity(&identity));
        match restored {
            Some(index) => self.selection.restore(index),
            None => self.selection.clear(),
        }
        restored
    }

    /// In-place update of one row. Out-of-range indexes are ignored because
    /// callers may race a reload.
    pub fn update_row(&mut self, index: usize, row: Vec<String>) -> bool {
        let Some(slot) = self.rows.get_mut(index) else {
            return false;
        };
        *slot = row;
        self.revision = self.revision.wrapping_add(1);
        true
    }

    pub fn identity_of(&self, row: &[String]) -> String {
        row_identity(&self.headers, row, self.selection_key.as_deref())
    }

    pub fn find_by_identity(&self, identity: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| self.identity_of(row) == identity)
    }

    /// Cell text for rendering: blank for missing cells, nothing past the
    /// header count.
    pub fn display_row(&self, index: usize) -> Option<Vec<&str>> {
        let row = self.rows.get(index)?;
        Some(
            (0..self.headers.len())
                .map(|column| row.get(column).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }

    pub fn row_fields(&self, index: usize) -> Option<BTreeMap<String, String>> {
        if self.headers.is_empty() {
            return None;
        }
        let row = self.rows.get(index)?;
        Some(
            self.headers
                .iter()
                .enumerate()
                .map(|(column, header)| {
                    (header.clone(), row.get(column).cloned().unwrap_or_default())
                })
                .collect(),
        )
    }

    /// Confirms `index` and builds the payload for selection callbacks.
    pub fn select(&mut self, index: usize) -> Option<RowSelection> {
        if !self.selection.confirm(index, self.rows.len()) {
            return None;
        }
        Some(RowSelection {
            index,
            cells: self.rows.get(index).cloned().unwrap_or_default(),
            fields: self.row_fields(index),
        })
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{TableStore, row_identity};
    use crate::Highlight;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    fn rows(values: &[&[&str]]) -> Vec<Vec<String>> {
        values.iter().map(|row| strings(row)).collect()
    }

    fn scenario_store() -> TableStore {
        let mut store = TableStore::new();
        store.set_headers(strings(&["ID", "Name", "Status"]));
        store.set_data(rows(&[&["1", "a", "up"], &["2", "b", "down"]]));
        store
    }

    #[test]
    fn composite_identity_joins_first_three_cells() {
        let headers = strings(&["ID", "Name", "Status", "Age"]);
        assert_eq!(
            row_identity(&headers, &strings(&["2", "b", "down", "5m"]), None),
            "2|b|down|"
        );
        assert_eq!(row_identity(&headers, &strings(&["7"]), None), "7|");
        assert_eq!(row_identity(&headers, &[], None), "");
    }

    #[test]
    fn selection_key_identity_uses_the_named_column() {
        let headers = strings(&["ID", "Name", "Status"]);
        let row = strings(&["2", "b", "down"]);
        assert_eq!(row_identity(&headers, &row, Some("Name")), "b");
        assert_eq!(row_identity(&headers, &row, Some("Missing")), "2|b|down|");
    }

    #[test]
    fn reload_restores_selection_by_identity() {
        let mut store = scenario_store();
        assert!(store.select(1).is_some());

        let restored = store.set_data(rows(&[&["2", "b", "down"], &["1", "a", "up"]]));
        assert_eq!(restored, Some(0));
        assert_eq!(store.selected_row(), Some(0));
        assert_eq!(store.selection().highlight(), Highlight::Confirmed);
    }

    #[test]
    fn reload_clears_selection_when_identity_disappears() {
        let mut store = scenario_store();
        store.select(1);

        let restored = store.set_data(rows(&[&["1", "a", "up"], &["2", "b", "up"]]));
        assert_eq!(restored, None);
        assert_eq!(store.selected_row(), None);
    }

    #[test]
    fn selection_key_survives_changes_in_other_columns() {
        let mut store = scenario_store();
        store.set_selection_key(Some("ID".to_owned()));
        store.select(1);

        store.set_data(rows(&[
            &["3", "c", "up"],
            &["1", "a", "down"],
            &["2", "b", "up"],
        ]));
        assert_eq!(store.selected_row(), Some(2));
    }

    #[test]
    fn exact_identity_ties_restore_the_first_match() {
        let mut store = scenario_store();
        store.select(0);
        store.set_data(rows(&[
            &["9", "z", "up"],
            &["1", "a", "up"],
            &["1", "a", "up"],
        ]));
        assert_eq!(store.selected_row(), Some(1));
    }

    #[test]
    fn reload_without_selection_stays_unselected() {
        let mut store = scenario_store();
        let restored = store.set_data(rows(&[&["1", "a", "up"]]));
        assert_eq!(restored, None);
        assert_eq!(store.selected_row(), None);
    }

    #[test]
    fn update_row_ignores_out_of_bounds_index() {
        let mut store = scenario_store();
        let before = store.clone();
        assert!(!store.update_row(2, strings(&["x"])));
        assert_eq!(store, before);

        assert!(store.update_row(1, strings(&["2", "b", "up"])));
        assert_eq!(store.row(1), Some(strings(&["2", "b", "up"]).as_slice()));
    }

    #[test]
    fn display_row_pads_and_truncates_to_header_count() {
        let mut store = TableStore::new();
        store.set_headers(strings(&["ID", "Name"]));
        store.set_data(rows(&[&["1"], &["2", "b", "extra"]]));

        assert_eq!(store.display_row(0), Some(vec!["1", ""]));
        assert_eq!(store.display_row(1), Some(vec!["2", "b"]));
        assert_eq!(store.display_row(2), None);
    }

    #[test]
    fn select_builds_cells_and_field_map() {
        let mut store = scenario_store();
        let selection = store.select(1).expect("row 1 should select");
        assert_eq!(selection.cells, strings(&["2", "b", "down"]));
        assert_eq!(selection.field("Status"), Some("down"));
        assert!(store.select(5).is_none());
    }

    #[test]
    fn select_without_headers_omits_field_map() {
        let mut store = TableStore::new();
        store.set_data(rows(&[&["1", "a"]]));
        let selection = store.select(0).expect("row 0 should select");
        assert_eq!(selection.fields, None);
    }

    #[test]
    fn shrinking_headers_keeps_selection_in_range() {
        let mut store = scenario_store();
        store.select(1);
        let revision = store.revision();
        store.set_headers(strings(&["ID"]));
        assert_eq!(store.selected_row(), Some(1));
        assert!(store.revision() > revision);
    }
}
