// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use super::dialog_block;
use crate::overlay::{Dialog, DialogStep};
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Gauge, Paragraph};

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressDialog {
    title: String,
    message: String,
    ratio: f64,
    cancellable: bool,
}

impl ProgressDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ratio: 0.0,
            cancellable: true,
        }
    }

    /// A progress dialog that only closes programmatically.
    pub fn pinned(mut self) -> Self {
        self.cancellable = false;
        self
    }

    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Dialog for ProgressDialog {
    fn title(&self) -> &str {
        &self.title
    }

    fn handle_key(&mut self, _key: KeyEvent) -> DialogStep {
        DialogStep::Ignored
    }

    fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let block = dialog_block(&self.title, Color::Cyan);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);
        frame.render_widget(Paragraph::new(self.message.as_str()), rows[0]);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
            .ratio(self.ratio);
        frame.render_widget(gauge, rows[1]);
    }

    fn size(&self) -> (u16, u16) {
        (50, 20)
    }

    fn set_progress(&mut self, ratio: f64, message: Option<String>) {
        self.ratio = if ratio.is_finite() {
            ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if let Some(message) = message {
            self.message = message;
        }
    }

    fn cancellable(&self) -> bool {
        self.cancellable
    }
}
