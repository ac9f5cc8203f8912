// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::app::Layer;
use crate::render::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use gridline_app::{FrameId, InputStack, OverlayId, Propagation};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Clear;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    Confirmed(bool),
    Acknowledged,
    Selected { index: usize, item: String },
    Directory(PathBuf),
}

/// What a dialog did with a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogStep {
    /// Not for this dialog; the key continues down the input chain.
    Ignored,
    Consumed,
    Complete(DialogResult),
    Cancelled,
}

pub trait Dialog: Send {
    fn title(&self) -> &str;

    fn handle_key(&mut self, key: KeyEvent) -> DialogStep;

    fn render(&self, frame: &mut Frame<'_>, area: Rect);

    /// Width and height as percentages of the screen.
    fn size(&self) -> (u16, u16) {
        (60, 30)
    }

    fn set_progress(&mut self, _ratio: f64, _message: Option<String>) {}

    fn cancellable(&self) -> bool {
        true
    }
}

/// Receives `(result, cancelled)` once, after the page is gone and the
/// previous input frame is back on top.
pub type OnDone = Box<dyn FnOnce(Option<DialogResult>, bool) + Send>;

struct OverlayPage {
    id: OverlayId,
    frame: FrameId,
    dialog: Box<dyn Dialog>,
    on_done: Option<OnDone>,
}

impl fmt::Debug for OverlayPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayPage")
            .field("id", &self.id)
            .field("frame", &self.frame)
            .field("title", &self.dialog.title())
            .finish_non_exhaustive()
    }
}

/// Visible modal pages, bottom to top. Every exit path runs through
/// [`OverlayManager::finish`].
#[derive(Debug, Default)]
pub struct OverlayManager {
    pages: Vec<OverlayPage>,
}

impl OverlayManager {
    pub fn open(
        &mut self,
        input: &mut InputStack<Layer>,
        id: OverlayId,
        dialog: Box<dyn Dialog>,
        on_done: Option<OnDone>,
    ) {
        if self.contains(id) {
            tracing::warn!(overlay = %id, "overlay already open");
            return;
        }
        let frame = input.push(Layer::Overlay(id));
        tracing::debug!(overlay = %id, title = dialog.title(), "overlay opened");
        self.pages.push(OverlayPage {
            id,
            frame,
            dialog,
            on_done,
        });
    }

    pub fn handle_key(
        &mut self,
        input: &mut InputStack<Layer>,
        id: OverlayId,
        key: KeyEvent,
    ) -> Propagation {
        let Some(page) = self.pages.iter_mut().find(|page| page.id == id) else {
            return Propagation::Forward;
        };

        if key.code == KeyCode::Esc {
            if page.dialog.cancellable() {
                self.finish(input, id, None, true);
            }
            return Propagation::Handled;
        }

        match page.dialog.handle_key(key) {
            DialogStep::Ignored => Propagation::Forward,
            DialogStep::Consumed => Propagation::Handled,
            DialogStep::Complete(result) => {
                self.finish(input, id, Some(result), false);
                Propagation::Handled
            }
            DialogStep::Cancelled => {
                self.finish(input, id, None, true);
                Propagation::Handled
            }
        }
    }

    /// Programmatic close. Completes with no result and no cancellation.
    pub fn close(&mut self, input: &mut InputStack<Layer>, id: OverlayId) -> bool {
        self.finish(input, id, None, false)
    }

    pub fn update_progress(&mut self, id: OverlayId, ratio: f64, message: Option<String>) -> bool {
        let Some(page) = self.pages.iter_mut().find(|page| page.id == id) else {
            return false;
        };
        page.dialog.set_progress(ratio, message);
        true
    }

    pub fn contains(&self, id: OverlayId) -> bool {
        self.pages.iter().any(|page| page.id == id)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn top_title(&self) -> Option<&str> {
        self.pages.last().map(|page| page.dialog.title())
    }

    pub fn render(&self, frame: &mut Frame<'_>) {
        for page in &self.pages {
            let (width, height) = page.dialog.size();
            let area = centered_rect(width, height, frame.area());
            frame.render_widget(Clear, area);
            page.dialog.render(frame, area);
        }
    }

    fn finish(
        &mut self,
        input: &mut InputStack<Layer>,
        id: OverlayId,
        result: Option<DialogResult>,
        cancelled: bool,
    ) -> bool {
        let Some(position) = self.pages.iter().position(|page| page.id == id) else {
            return false;
        };
        let page = self.pages.remove(position);
        input.remove(page.frame);
        tracing::debug!(overlay = %id, cancelled, "overlay closed");
        if let Some(on_done) = page.on_done {
            on_done(result, cancelled);
        }
        true
    }
}
