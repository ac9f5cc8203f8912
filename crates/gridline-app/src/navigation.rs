// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub const BREADCRUMB_SEPARATOR: &str = " › ";

/// Ordered history of view names. Index 0 is the root and is never removed
/// by [`NavigationStack::pop`]; the active view is the last element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationStack {
    views: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crumb<'a> {
    pub name: &'a str,
    pub active: bool,
}

impl NavigationStack {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            views: vec![root.into()],
        }
    }

    pub fn views(&self) -> &[String] {
        &self.views
    }

    pub fn depth(&self) -> usize {
        self.views.len()
    }

    pub fn is_at_root(&self) -> bool {
        self.views.len() <= 1
    }

    pub fn current(&self) -> Option<&str> {
        self.views.last().map(String::as_str)
    }

    pub fn root(&self) -> Option<&str> {
        self.views.first().map(String::as_str)
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.views.push(name.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        if self.is_at_root() {
            return None;
        }
        self.views.pop()
    }

    /// Truncates to the root. An empty stack stays empty.
    pub fn clear(&mut self) {
        self.views.truncate(1);
    }

    pub fn set(&mut self, views: Vec<String>) {
        self.views = views;
    }

    pub fn copy_from(&mut self, other: &NavigationStack) {
        self.views.clone_from(&other.views);
    }

    pub fn breadcrumbs(&self) -> Vec<Crumb<'_>> {
        let last = self.views.len().saturating_sub(1);
        self.views
            .iter()
            .enumerate()
            .map(|(index, name)| Crumb {
                name,
                active: index == last,
            })
            .collect()
    }

    pub fn breadcrumb_text(&self) -> String {
        self.views.join(BREADCRUMB_SEPARATOR)
    }
}
