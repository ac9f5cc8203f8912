// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use gridline_app::{ActionEvent, Claim, Payload, RowSelection};
use std::collections::VecDeque;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

const FAKE_HEADERS: [&str; 4] = ["ID", "Name", "Status", "Node"];

const SERVICE_NAMES: [&str; 16] = [
    "api", "auth", "billing", "cache", "cron", "edge", "gateway", "indexer", "ingest", "mailer",
    "metrics", "queue", "router", "search", "storage", "web",
];

const STATUSES: [&str; 5] = ["up", "down", "pending", "degraded", "restarting"];

const NODES: [&str; 6] = ["node-a", "node-b", "node-c", "node-d", "node-e", "node-f"];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Deterministic table rows shaped like a service listing.
#[derive(Debug, Clone)]
pub struct RowFaker {
    rng: DeterministicRng,
}

impl RowFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
        }
    }

    pub fn headers() -> Vec<String> {
        FAKE_HEADERS.iter().map(|header| (*header).to_owned()).collect()
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn row(&mut self, id: usize) -> Vec<String> {
        let name = format!("{}-{}", self.pick(&SERVICE_NAMES), id);
        vec![
            id.to_string(),
            name,
            self.pick(&STATUSES).to_owned(),
            self.pick(&NODES).to_owned(),
        ]
    }

    /// Rows with ids `1..=count`, so every row has a distinct identity.
    pub fn rows(&mut self, count: usize) -> Vec<Vec<String>> {
        (1..=count).map(|id| self.row(id)).collect()
    }

    pub fn shuffled(&mut self, mut rows: Vec<Vec<String>>) -> Vec<Vec<String>> {
        for index in (1..rows.len()).rev() {
            let swap = self.rng.int_n(index + 1);
            rows.swap(index, swap);
        }
        rows
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

pub fn table(rows: &[&[&str]]) -> Vec<Vec<String>> {
    rows.iter().map(|row| strings(row)).collect()
}

pub fn scenario_headers() -> Vec<String> {
    strings(&["ID", "Name", "Status"])
}

pub fn scenario_rows() -> Vec<Vec<String>> {
    table(&[&["1", "a", "up"], &["2", "b", "down"]])
}

pub fn scenario_rows_reordered() -> Vec<Vec<String>> {
    table(&[&["2", "b", "down"], &["1", "a", "up"]])
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAction {
    pub name: String,
    pub payload: Payload,
}

#[derive(Debug)]
struct RecorderState {
    actions: Vec<RecordedAction>,
    selected_rows: Vec<usize>,
    reply: Result<Claim, String>,
}

/// Records action and row-selection callbacks. Clones share one log.
#[derive(Debug, Clone)]
pub struct ActionRecorder {
    state: Arc<Mutex<RecorderState>>,
}

impl Default for ActionRecorder {
    fn default() -> Self {
        Self::new(Claim::Declined)
    }
}

impl ActionRecorder {
    pub fn new(reply: Claim) -> Self {
        Self {
            state: Arc::new(Mutex::new(RecorderState {
                actions: Vec::new(),
                selected_rows: Vec::new(),
                reply: Ok(reply),
            })),
        }
    }

    pub fn claiming() -> Self {
        Self::new(Claim::Claimed)
    }

    pub fn failing(message: impl Into<String>) -> Self {
        let recorder = Self::default();
        recorder.lock().reply = Err(message.into());
        recorder
    }

    pub fn set_reply(&self, reply: Claim) {
        self.lock().reply = Ok(reply);
    }

    pub fn action_callback(&self) -> impl FnMut(&ActionEvent) -> Result<Claim> + 'static {
        let state = Arc::clone(&self.state);
        move |event| {
            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            state.actions.push(RecordedAction {
                name: event.name().to_owned(),
                payload: event.payload.clone(),
            });
            state.reply.clone().map_err(|message| anyhow!(message))
        }
    }

    pub fn row_callback(&self) -> impl FnMut(&RowSelection) + 'static {
        let state = Arc::clone(&self.state);
        move |selection| {
            state
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .selected_rows
                .push(selection.index);
        }
    }

    pub fn actions(&self) -> Vec<RecordedAction> {
        self.lock().actions.clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.lock()
            .actions
            .iter()
            .map(|action| action.name.clone())
            .collect()
    }

    pub fn count(&self, name: &str) -> usize {
        self.lock()
            .actions
            .iter()
            .filter(|action| action.name == name)
            .count()
    }

    pub fn selected_rows(&self) -> Vec<usize> {
        self.lock().selected_rows.clone()
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.actions.clear();
        state.selected_rows.clear();
    }

    fn lock(&self) -> MutexGuard<'_, RecorderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

type ScriptedResponse = Result<Vec<Vec<String>>, String>;

/// A fetch function that replays scripted responses, then repeats the
/// fallback rows. Counts every call.
#[derive(Debug, Clone)]
pub struct ScriptedFetch {
    calls: Arc<AtomicUsize>,
    script: Arc<Mutex<VecDeque<ScriptedResponse>>>,
    fallback: Arc<Vec<Vec<String>>>,
}

impl ScriptedFetch {
    pub fn new(fallback: Vec<Vec<String>>) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: Arc::new(fallback),
        }
    }

    pub fn then_rows(self, rows: Vec<Vec<String>>) -> Self {
        self.push(Ok(rows));
        self
    }

    pub fn then_error(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn function(&self) -> impl Fn() -> Result<Vec<Vec<String>>> + Send + Sync + 'static {
        let fetch = self.clone();
        move || fetch.next()
    }

    fn next(&self) -> Result<Vec<Vec<String>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match scripted {
            Some(Ok(rows)) => Ok(rows),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(self.fallback.as_ref().clone()),
        }
    }

    fn push(&self, response: ScriptedResponse) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }
}

/// Builds a directory tree. Entries ending in `/` become directories;
/// everything else becomes a file whose contents are its own path.
pub fn temp_tree(entries: &[&str]) -> Result<tempfile::TempDir> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    for entry in entries {
        let path = dir.path().join(entry.trim_end_matches('/'));
        if entry.ends_with('/') {
            fs::create_dir_all(&path).with_context(|| format!("create {}", path.display()))?;
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&path, entry.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    }
    Ok(dir)
}
