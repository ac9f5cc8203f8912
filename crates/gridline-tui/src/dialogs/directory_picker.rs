// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use super::{dialog_block, focused_style};
use crate::keymap::is_ctrl;
use crate::overlay::{Dialog, DialogResult, DialogStep};
use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph, Wrap};
use std::fs;
use std::path::{Path, PathBuf};

/// Sorted sub-directory names of `dir`.
pub fn list_subdirectories(dir: &Path, show_hidden: bool) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read entry in {}", dir.display()))?;
        let is_dir = entry.file_type().map(|kind| kind.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }
        names.push(name);
    }
    names.sort_by_key(|name| name.to_lowercase());
    Ok(names)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPicker {
    title: String,
    current: PathBuf,
    entries: Vec<String>,
    cursor: usize,
    show_hidden: bool,
    error: Option<String>,
}

impl DirectoryPicker {
    pub fn new(title: impl Into<String>, start: impl Into<PathBuf>) -> Self {
        let mut picker = Self {
            title: title.into(),
            current: start.into(),
            entries: Vec::new(),
            cursor: 0,
            show_hidden: false,
            error: None,
        };
        picker.reload();
        picker
    }

    pub fn with_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self.reload();
        self
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn reload(&mut self) {
        match list_subdirectories(&self.current, self.show_hidden) {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(error) => {
                self.entries.clear();
                self.error = Some(format!("{error:#}"));
            }
        }
        self.cursor = self.cursor.min(self.entries.len().saturating_sub(1));
    }

    /// Moves to `target` if it can be listed; otherwise stays put and shows
    /// the error.
    fn enter(&mut self, target: PathBuf) {
        match list_subdirectories(&target, self.show_hidden) {
            Ok(entries) => {
                self.current = target;
                self.entries = entries;
                self.cursor = 0;
                self.error = None;
            }
            Err(error) => self.error = Some(format!("{error:#}")),
        }
    }
}

impl Dialog for DirectoryPicker {
    fn title(&self) -> &str {
        &self.title
    }

    fn handle_key(&mut self, key: KeyEvent) -> DialogStep {
        if key.code == KeyCode::Up || is_ctrl(key, 'p') {
            self.cursor = self.cursor.saturating_sub(1);
            return DialogStep::Consumed;
        }
        if key.code == KeyCode::Down || is_ctrl(key, 'n') {
            self.cursor = (self.cursor + 1).min(self.entries.len().saturating_sub(1));
            return DialogStep::Consumed;
        }

        match key.code {
            KeyCode::Enter => {
                if let Some(name) = self.entries.get(self.cursor) {
                    let target = self.current.join(name);
                    self.enter(target);
                }
                DialogStep::Consumed
            }
            KeyCode::Backspace => {
                if let Some(parent) = self.current.parent().map(Path::to_path_buf) {
                    let child = self
                        .current
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned());
                    self.enter(parent);
                    if let Some(child) = child
                        && let Some(position) = self.entries.iter().position(|name| *name == child)
                    {
                        self.cursor = position;
                    }
                }
                DialogStep::Consumed
            }
            KeyCode::Char('s') | KeyCode::Char(' ') => {
                DialogStep::Complete(DialogResult::Directory(self.current.clone()))
            }
            KeyCode::Char('.') => {
                self.show_hidden = !self.show_hidden;
                self.reload();
                DialogStep::Consumed
            }
            _ => DialogStep::Ignored,
        }
    }

    fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let block = dialog_block(&self.title, Color::Cyan);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(2),
            ])
            .split(inner);

        let path = Line::from(Span::styled(
            self.current.display().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(path), rows[0]);

        if self.entries.is_empty() {
            let note = if self.error.is_some() {
                "cannot list this directory"
            } else {
                "no sub-directories"
            };
            frame.render_widget(
                Paragraph::new(note).style(Style::default().fg(Color::DarkGray)),
                rows[1],
            );
        } else {
            let items = self
                .entries
                .iter()
                .map(|name| ListItem::new(format!("{name}/")))
                .collect::<Vec<_>>();
            let list = List::new(items).highlight_style(focused_style());
            let mut state = ListState::default().with_selected(Some(self.cursor));
            frame.render_stateful_widget(list, rows[1], &mut state);
        }

        let footer = match &self.error {
            Some(error) => Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
            None => Paragraph::new("enter open  backspace up  s choose  . hidden")
                .style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(footer.wrap(Wrap { trim: true }), rows[2]);
    }

    fn size(&self) -> (u16, u16) {
        (60, 70)
    }
}
