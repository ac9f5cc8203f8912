// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use super::{dialog_block, focused_style};
use crate::overlay::{Dialog, DialogResult, DialogStep};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Yes,
    No,
}

impl Choice {
    fn toggled(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDialog {
    title: String,
    message: String,
    focus: Choice,
}

impl ConfirmDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            focus: Choice::Yes,
        }
    }

    pub fn yes_focused(&self) -> bool {
        self.focus == Choice::Yes
    }
}

impl Dialog for ConfirmDialog {
    fn title(&self) -> &str {
        &self.title
    }

    fn handle_key(&mut self, key: KeyEvent) -> DialogStep {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                DialogStep::Complete(DialogResult::Confirmed(true))
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                DialogStep::Complete(DialogResult::Confirmed(false))
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                self.focus = self.focus.toggled();
                DialogStep::Consumed
            }
            KeyCode::Enter => DialogStep::Complete(DialogResult::Confirmed(self.yes_focused())),
            _ => DialogStep::Ignored,
        }
    }

    fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let button = |label: &'static str, choice: Choice| {
            if self.focus == choice {
                Span::styled(label, focused_style())
            } else {
                Span::styled(label, Style::default().fg(Color::Gray))
            }
        };
        let lines = vec![
            Line::from(self.message.as_str()),
            Line::from(""),
            Line::from(vec![
                button(" Yes ", Choice::Yes),
                Span::raw("   "),
                button(" No ", Choice::No),
            ])
            .alignment(Alignment::Center),
        ];
        let body = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(dialog_block(&self.title, Color::Yellow));
        frame.render_widget(body, area);
    }

    fn size(&self) -> (u16, u16) {
        (50, 25)
    }
}

#[cfg(test)]
mod tests {
    use super::ConfirmDialog;
    use crate::overlay::{Dialog, DialogResult, DialogStep};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn shortcuts_answer_immediately() {
        let mut dialog = ConfirmDialog::new("Delete", "Delete web-1?");
        assert_eq!(
            dialog.handle_key(key(KeyCode::Char('y'))),
            DialogStep::Complete(DialogResult::Confirmed(true))
        );
        assert_eq!(
            dialog.handle_key(key(KeyCode::Char('n'))),
            DialogStep::Complete(DialogResult::Confirmed(false))
        );
    }

    #[test]
    fn enter_activates_the_focused_button() {
        let mut dialog = ConfirmDialog::new("Delete", "Delete web-1?");
        assert!(dialog.yes_focused());
        assert_eq!(dialog.handle_key(key(KeyCode::Tab)), DialogStep::Consumed);
        assert!(!dialog.yes_focused());
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            DialogStep::Complete(DialogResult::Confirmed(false))
        );
    }

    #[test]
    fn unrelated_keys_are_ignored() {
        let mut dialog = ConfirmDialog::new("Delete", "Delete web-1?");
        assert_eq!(dialog.handle_key(key(KeyCode::Char('j'))), DialogStep::Ignored);
    }
}
