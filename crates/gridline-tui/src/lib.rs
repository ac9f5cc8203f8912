// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod app;
mod controller;
pub mod dialogs;
mod keymap;
mod log_panel;
mod overlay;
mod refresh;
mod render;

pub use app::{
    App, Layer, UiEvent, UiHandle, UiUpdate, handle_key_event, process_ui_events, run_app,
};
pub use controller::{ActionFn, RowSelectedFn, TableController};
pub use keymap::key_stroke;
pub use log_panel::{DEFAULT_LOG_CAPACITY, LogEntry, LogPanel};
pub use overlay::{Dialog, DialogResult, DialogStep, OnDone, OverlayManager};
pub use refresh::{FetchFn, RefreshScheduler};
pub use render::render;
