// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use super::{dialog_block, focused_style};
use crate::overlay::{Dialog, DialogResult, DialogStep};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Color;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDialog {
    kind: MessageKind,
    title: String,
    message: String,
}

impl MessageDialog {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            title: "Error".to_owned(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Dialog for MessageDialog {
    fn title(&self) -> &str {
        &self.title
    }

    fn handle_key(&mut self, key: KeyEvent) -> DialogStep {
        match key.code {
            KeyCode::Enter => DialogStep::Complete(DialogResult::Acknowledged),
            _ => DialogStep::Ignored,
        }
    }

    fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let accent = match self.kind {
            MessageKind::Error => Color::Red,
            MessageKind::Info => Color::Cyan,
        };
        let mut lines = self
            .message
            .lines()
            .map(|line| Line::from(line.to_owned()))
            .collect::<Vec<_>>();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" OK ", focused_style())).alignment(Alignment::Center));

        let body = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(dialog_block(&self.title, accent));
        frame.render_widget(body, area);
    }

    fn size(&self) -> (u16, u16) {
        let lines = u16::try_from(self.message.lines().count()).unwrap_or(u16::MAX);
        (60, lines.saturating_mul(4).clamp(25, 70))
    }
}
