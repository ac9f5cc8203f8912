// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod confirm;
mod directory_picker;
mod list_picker;
mod message;
mod progress;

pub use confirm::ConfirmDialog;
pub use directory_picker::{DirectoryPicker, list_subdirectories};
pub use list_picker::{ListPicker, subsequence_match};
pub use message::{MessageDialog, MessageKind};
pub use progress::ProgressDialog;

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

pub(crate) fn dialog_block(title: &str, accent: Color) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
}

pub(crate) fn focused_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}
