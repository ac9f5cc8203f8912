// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::app::{UiEvent, UiHandle};
use anyhow::{Context, Result, bail};
use gridline_app::ControllerId;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

pub type FetchFn = Arc<dyn Fn() -> Result<Vec<Vec<String>>> + Send + Sync>;

struct RefreshTimer {
    // Dropping the sender disconnects the ticker's receiver.
    stop_tx: Sender<()>,
    interval: Duration,
}

#[derive(Default)]
struct RefreshState {
    timer: Option<RefreshTimer>,
    generation: u64,
}

/// At most one background ticker per controller. Start and stop share one
/// mutex, and every start or stop bumps the generation so results from a
/// retired ticker can be told apart from current ones.
pub struct RefreshScheduler {
    controller: ControllerId,
    state: Mutex<RefreshState>,
    live: Arc<AtomicUsize>,
}

impl fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("RefreshScheduler")
            .field("controller", &self.controller)
            .field("interval", &state.timer.as_ref().map(|timer| timer.interval))
            .field("generation", &state.generation)
            .field("live", &self.live_timers())
            .finish()
    }
}

impl RefreshScheduler {
    pub fn new(controller: ControllerId) -> Self {
        Self {
            controller,
            state: Mutex::new(RefreshState::default()),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Stops any running ticker, then starts a new one. Returns the
    /// generation the new ticker tags its results with.
    pub fn start(&self, interval: Duration, fetch: FetchFn, ui: UiHandle) -> Result<u64> {
        if interval.is_zero() {
            bail!("refresh interval must be positive");
        }

        let mut state = self.lock();
        retire(&mut state);
        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;

        let (stop_tx, stop_rx) = mpsc::channel();
        let ticker = Ticker {
            controller: self.controller,
            generation,
            interval,
            stop_rx,
            fetch,
            ui,
            _live: LiveGuard::enter(&self.live),
        };
        thread::Builder::new()
            .name(format!("gridline-refresh-{}", self.controller))
            .spawn(move || ticker.run())
            .context("spawn refresh thread")?;

        state.timer = Some(RefreshTimer { stop_tx, interval });
        tracing::debug!(controller = %self.controller, generation, ?interval, "auto refresh started");
        Ok(generation)
    }

    /// Returns whether a ticker was running. Safe to call at any time.
    pub fn stop(&self) -> bool {
        let mut state = self.lock();
        let stopped = retire(&mut state);
        if stopped {
            state.generation = state.generation.wrapping_add(1);
            tracing::debug!(controller = %self.controller, "auto refresh stopped");
        }
        stopped
    }

    pub fn is_running(&self) -> bool {
        self.lock().timer.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.lock().timer.as_ref().map(|timer| timer.interval)
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Ticker threads that have not exited yet. A retired ticker blocked in
    /// a slow fetch stays counted until that fetch returns.
    pub fn live_timers(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn retire(state: &mut RefreshState) -> bool {
    state.timer.take().is_some()
}

struct LiveGuard(Arc<AtomicUsize>);

impl LiveGuard {
    fn enter(live: &Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(live))
    }
}

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

struct Ticker {
    controller: ControllerId,
    generation: u64,
    interval: Duration,
    stop_rx: Receiver<()>,
    fetch: FetchFn,
    ui: UiHandle,
    _live: LiveGuard,
}

impl Ticker {
    fn run(self) {
        let mut deadline = Instant::now().checked_add(self.interval);
        loop {
            if !self.wait(deadline) {
                break;
            }

            self.ui.send(UiEvent::RefreshTick {
                controller: self.controller,
                generation: self.generation,
            });
            let result = (self.fetch)().map_err(|error| format!("{error:#}"));

            if !matches!(self.stop_rx.try_recv(), Err(TryRecvError::Empty)) {
                break;
            }
            let delivered = self.ui.send(UiEvent::RefreshLoaded {
                controller: self.controller,
                generation: self.generation,
                result,
            });
            if !delivered {
                break;
            }

            deadline = next_deadline(deadline, self.interval, Instant::now());
        }
        tracing::trace!(controller = %self.controller, generation = self.generation, "ticker exited");
    }

    /// Blocks until `deadline`, or until stopped. A deadline past the end of
    /// the clock never fires.
    fn wait(&self, deadline: Option<Instant>) -> bool {
        let Some(deadline) = deadline else {
            let _ = self.stop_rx.recv();
            return false;
        };
        let wait = deadline.saturating_duration_since(Instant::now());
        matches!(
            self.stop_rx.recv_timeout(wait),
            Err(RecvTimeoutError::Timeout)
        )
    }
}

/// The first deadline after `now` on the `interval` grid. A fetch slower than
/// the interval skips the ticks it overran.
fn next_deadline(deadline: Option<Instant>, interval: Duration, now: Instant) -> Option<Instant> {
    let mut next = deadline?.checked_add(interval)?;
    while next <= now {
        next = next.checked_add(interval)?;
    }
    Some(next)
}
