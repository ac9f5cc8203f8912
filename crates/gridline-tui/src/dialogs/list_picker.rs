// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use super::{dialog_block, focused_style};
use crate::keymap::{is_ctrl, is_plain_char};
use crate::overlay::{Dialog, DialogResult, DialogStep};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};

/// Case-insensitive subsequence match. Whitespace in the query is ignored.
pub fn subsequence_match(label: &str, query: &str) -> bool {
    let mut needle = query.chars().filter(|ch| !ch.is_whitespace());
    let mut target = needle.next();
    if target.is_none() {
        return true;
    }

    for label_char in label.chars() {
        let Some(needle_char) = target else {
            break;
        };
        if label_char.to_lowercase().eq(needle_char.to_lowercase()) {
            target = needle.next();
            if target.is_none() {
                return true;
            }
        }
    }
    false
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPicker {
    title: String,
    items: Vec<String>,
    query: String,
    cursor: usize,
}

impl ListPicker {
    pub fn new(title: impl Into<String>, items: Vec<String>) -> Self {
        Self {
            title: title.into(),
            items,
            query: String::new(),
            cursor: 0,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Filtered items with their index into the unfiltered list.
    pub fn matches(&self) -> Vec<(usize, &str)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| subsequence_match(item, &self.query))
            .map(|(index, item)| (index, item.as_str()))
            .collect()
    }

    pub fn highlighted(&self) -> Option<(usize, &str)> {
        self.matches().get(self.cursor).copied()
    }

    fn clamp_cursor(&mut self) {
        let count = self.matches().len();
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }
}

impl Dialog for ListPicker {
    fn title(&self) -> &str {
        &self.title
    }

    fn handle_key(&mut self, key: KeyEvent) -> DialogStep {
        if key.code == KeyCode::Up || is_ctrl(key, 'p') {
            self.cursor = self.cursor.saturating_sub(1);
        } else if key.code == KeyCode::Down || is_ctrl(key, 'n') {
            self.cursor = self.cursor.saturating_add(1);
        } else if is_ctrl(key, 'u') {
            self.query.clear();
        } else if key.code == KeyCode::Backspace {
            self.query.pop();
        } else if key.code == KeyCode::Enter {
            return match self.highlighted() {
                Some((index, item)) => DialogStep::Complete(DialogResult::Selected {
                    index,
                    item: item.to_owned(),
                }),
                None => DialogStep::Consumed,
            };
        } else if let Some(ch) = is_plain_char(key) {
            self.query.push(ch);
        } else {
            return DialogStep::Ignored;
        }
        self.clamp_cursor();
        DialogStep::Consumed
    }

    fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let block = dialog_block(&self.title, Color::Cyan);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);

        let prompt = Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::raw(self.query.as_str()),
        ]);
        frame.render_widget(Paragraph::new(prompt), rows[0]);

        let matches = self.matches();
        if matches.is_empty() {
            let empty = Paragraph::new("no matches").style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            );
            frame.render_widget(empty, rows[1]);
            return;
        }

        let items = matches
            .iter()
            .map(|(_, item)| ListItem::new(*item))
            .collect::<Vec<_>>();
        let list = List::new(items).highlight_style(focused_style());
        let mut state = ListState::default().with_selected(Some(self.cursor));
        frame.render_stateful_widget(list, rows[1], &mut state);
    }

    fn size(&self) -> (u16, u16) {
        (50, 60)
    }
}
