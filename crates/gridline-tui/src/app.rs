// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::controller::TableController;
use crate::keymap::{is_ctrl, key_stroke};
use crate::overlay::{Dialog, OnDone, OverlayManager};
use crate::render::render;
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use gridline_app::{ControllerId, FrameId, InputStack, OverlayId, Propagation};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::fmt;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(120);
const STATUS_CLEAR_DELAY: Duration = Duration::from_secs(4);

/// Owner of an input frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Global,
    Controller(ControllerId),
    Overlay(OverlayId),
}

pub type UiUpdate = Box<dyn FnOnce(&mut App, &mut TableController) + Send>;

pub enum UiEvent {
    RefreshLoaded {
        controller: ControllerId,
        generation: u64,
        result: Result<Vec<Vec<String>>, String>,
    },
    RefreshTick {
        controller: ControllerId,
        generation: u64,
    },
    ClearStatus {
        token: u64,
    },
    OpenOverlay {
        id: OverlayId,
        dialog: Box<dyn Dialog>,
        on_done: Option<OnDone>,
    },
    CloseOverlay {
        id: OverlayId,
    },
    Progress {
        id: OverlayId,
        ratio: f64,
        message: Option<String>,
    },
    /// Host work that needs the controller. A tagged update only runs
    /// against that controller.
    Update {
        controller: Option<ControllerId>,
        update: UiUpdate,
    },
    Quit,
}

impl fmt::Debug for UiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RefreshLoaded {
                controller,
                generation,
                result,
            } => f
                .debug_struct("RefreshLoaded")
                .field("controller", controller)
                .field("generation", generation)
                .field("rows", &result.as_ref().map(Vec::len))
                .finish(),
            Self::RefreshTick {
                controller,
                generation,
            } => f
                .debug_struct("RefreshTick")
                .field("controller", controller)
                .field("generation", generation)
                .finish(),
            Self::ClearStatus { token } => {
                f.debug_struct("ClearStatus").field("token", token).finish()
            }
            Self::OpenOverlay { id, dialog, .. } => f
                .debug_struct("OpenOverlay")
                .field("id", id)
                .field("title", &dialog.title())
                .finish_non_exhaustive(),
            Self::CloseOverlay { id } => f.debug_struct("CloseOverlay").field("id", id).finish(),
            Self::Progress { id, ratio, message } => f
                .debug_struct("Progress")
                .field("id", id)
                .field("ratio", ratio)
                .field("message", message)
                .finish(),
            Self::Update { controller, .. } => f
                .debug_struct("Update")
                .field("controller", controller)
                .finish_non_exhaustive(),
            Self::Quit => f.write_str("Quit"),
        }
    }
}

/// Cloneable handle for scheduling work on the UI thread. Background code
/// never touches controller or overlay state directly.
#[derive(Debug, Clone)]
pub struct UiHandle {
    tx: Sender<UiEvent>,
    next_overlay: Arc<AtomicU64>,
    target: Option<ControllerId>,
}

impl UiHandle {
    /// Returns false once the UI thread has gone away.
    pub fn send(&self, event: UiEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Same channel, but updates are tagged for `controller`.
    pub fn for_controller(&self, controller: ControllerId) -> Self {
        Self {
            target: Some(controller),
            ..self.clone()
        }
    }

    pub fn target(&self) -> Option<ControllerId> {
        self.target
    }

    /// Untargeted handles run `update` against whichever controller the
    /// event loop is pumping.
    pub fn update(
        &self,
        update: impl FnOnce(&mut App, &mut TableController) + Send + 'static,
    ) -> bool {
        self.send(UiEvent::Update {
            controller: self.target,
            update: Box::new(update),
        })
    }

    /// The id is reserved immediately so callers can close or update the
    /// dialog before the UI thread has shown it.
    pub fn open_overlay(&self, dialog: Box<dyn Dialog>, on_done: Option<OnDone>) -> OverlayId {
        let id = self.allocate_overlay_id();
        self.send(UiEvent::OpenOverlay {
            id,
            dialog,
            on_done,
        });
        id
    }

    pub fn close_overlay(&self, id: OverlayId) -> bool {
        self.send(UiEvent::CloseOverlay { id })
    }

    pub fn update_progress(&self, id: OverlayId, ratio: f64, message: Option<String>) -> bool {
        self.send(UiEvent::Progress { id, ratio, message })
    }

    pub fn quit(&self) -> bool {
        self.send(UiEvent::Quit)
    }

    fn allocate_overlay_id(&self) -> OverlayId {
        OverlayId::new(self.next_overlay.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug)]
pub struct App {
    input: InputStack<Layer>,
    overlays: OverlayManager,
    rx: Receiver<UiEvent>,
    handle: UiHandle,
    status: Option<String>,
    status_token: u64,
    next_controller: u64,
    quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let mut input = InputStack::new();
        input.push(Layer::Global);
        Self {
            input,
            overlays: OverlayManager::default(),
            rx,
            handle: UiHandle {
                tx,
                next_overlay: Arc::new(AtomicU64::new(1)),
                target: None,
            },
            status: None,
            status_token: 0,
            next_controller: 1,
            quit: false,
        }
    }

    pub fn handle(&self) -> UiHandle {
        self.handle.clone()
    }

    pub fn input(&self) -> &InputStack<Layer> {
        &self.input
    }

    pub fn overlays(&self) -> &OverlayManager {
        &self.overlays
    }

    pub fn open_overlay(&mut self, dialog: Box<dyn Dialog>, on_done: Option<OnDone>) -> OverlayId {
        let id = self.handle.allocate_overlay_id();
        self.overlays.open(&mut self.input, id, dialog, on_done);
        id
    }

    pub fn close_overlay(&mut self, id: OverlayId) -> bool {
        self.overlays.close(&mut self.input, id)
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Shows a transient status line. Only the newest message is cleared by
    /// its timer.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
        self.status_token = self.status_token.saturating_add(1);
        schedule_status_clear(&self.handle, self.status_token);
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub(crate) fn allocate_controller_id(&mut self) -> ControllerId {
        let id = ControllerId::new(self.next_controller);
        self.next_controller = self.next_controller.saturating_add(1);
        id
    }

    pub(crate) fn install_frame(&mut self, layer: Layer) -> FrameId {
        self.input.push(layer)
    }

    pub(crate) fn release_frame(&mut self, frame: FrameId) -> bool {
        self.input.remove(frame).is_some()
    }

    #[cfg(test)]
    pub(crate) fn drain_events(&self) -> Vec<UiEvent> {
        self.rx.try_iter().collect()
    }
}

pub fn run_app(app: &mut App, controller: &mut TableController) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut result = Ok(());
    loop {
        process_ui_events(app, controller);
        if app.should_quit() {
            break;
        }

        if let Err(error) = terminal.draw(|frame| render(frame, app, controller)) {
            result = Err(error).context("draw frame");
            break;
        }

        match event::poll(POLL_INTERVAL).context("poll event") {
            Ok(false) => {}
            Ok(true) => match event::read().context("read event") {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(app, controller, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            },
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

/// Drains every pending UI event. Each event is applied whole, so a frame
/// drawn afterwards never sees half of an update.
pub fn process_ui_events(app: &mut App, controller: &mut TableController) {
    while let Ok(event) = app.rx.try_recv() {
        match event {
            UiEvent::RefreshLoaded {
                controller: target,
                generation,
                result,
            } => {
                if target == controller.id() {
                    controller.apply_refresh(generation, result);
                }
            }
            UiEvent::RefreshTick {
                controller: target,
                generation,
            } => {
                tracing::trace!(controller = %target, generation, "refresh tick");
            }
            UiEvent::ClearStatus { token } if token == app.status_token => {
                app.status = None;
            }
            UiEvent::ClearStatus { .. } => {}
            UiEvent::OpenOverlay {
                id,
                dialog,
                on_done,
            } => {
                app.overlays.open(&mut app.input, id, dialog, on_done);
            }
            UiEvent::CloseOverlay { id } => {
                app.overlays.close(&mut app.input, id);
            }
            UiEvent::Progress { id, ratio, message } => {
                app.overlays.update_progress(id, ratio, message);
            }
            UiEvent::Update {
                controller: Some(target),
                ..
            } if target != controller.id() => {
                tracing::debug!(controller = %target, "update for another controller dropped");
            }
            UiEvent::Update { update, .. } => update(app, controller),
            UiEvent::Quit => app.quit = true,
        }
    }
}

/// Walks the input chain from the top frame until one handles the key.
/// Returns true when the application should exit.
pub fn handle_key_event(app: &mut App, controller: &mut TableController, key: KeyEvent) -> bool {
    for frame in app.input.chain() {
        let Some(layer) = app.input.payload(frame).copied() else {
            continue;
        };
        let propagation = match layer {
            Layer::Overlay(id) => app.overlays.handle_key(&mut app.input, id, key),
            Layer::Controller(id) if id == controller.id() => match key_stroke(key) {
                Some(stroke) => controller.handle_key(stroke),
                None => Propagation::Forward,
            },
            Layer::Controller(_) => Propagation::Forward,
            Layer::Global => handle_global_key(app, controller, key),
        };
        if propagation == Propagation::Handled {
            break;
        }
    }
    app.quit
}

fn handle_global_key(app: &mut App, controller: &TableController, key: KeyEvent) -> Propagation {
    if is_ctrl(key, 'q') {
        app.quit = true;
        return Propagation::Handled;
    }
    match (key.code, key.modifiers) {
        (KeyCode::Esc, KeyModifiers::NONE) | (KeyCode::Char('q'), KeyModifiers::NONE)
            if controller.navigation().is_at_root() =>
        {
            app.quit = true;
            Propagation::Handled
        }
        _ => Propagation::Forward,
    }
}

fn schedule_status_clear(handle: &UiHandle, token: u64) {
    let sender = handle.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_DELAY);
        let _ = sender.send(UiEvent::ClearStatus { token });
    });
}
