// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::app::{App, Layer, UiHandle};
use crate::log_panel::LogPanel;
use crate::refresh::{FetchFn, RefreshScheduler};
use anyhow::{Result, bail};
use gridline_app::{
    ActionEvent, Claim, ControllerId, FrameId, HELP_KEY, KeyBindingTable, KeyRoute, KeyStroke,
    KeySymbol, NavigationStack, Propagation, RowSelection, TableCommand, TableStore, resolve_key,
};
use ratatui::widgets::TableState;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

pub type RowSelectedFn = Box<dyn FnMut(&RowSelection)>;
pub type ActionFn = Box<dyn FnMut(&ActionEvent) -> Result<Claim>>;

/// The interactive table view: table store, key dispatch, navigation
/// stack, and auto-refresh for one titled view.
pub struct TableController {
    id: ControllerId,
    title: String,
    store: TableStore,
    bindings: KeyBindingTable,
    navigation: NavigationStack,
    help_expanded: bool,
    fetch: Option<FetchFn>,
    on_row_selected: Option<RowSelectedFn>,
    on_action: Option<ActionFn>,
    refresh: RefreshScheduler,
    ui: UiHandle,
    log: LogPanel,
    frame: Option<FrameId>,
    pub(crate) viewport: TableState,
}

impl fmt::Debug for TableController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableController")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("rows", &self.store.row_count())
            .field("views", &self.navigation.views())
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

impl TableController {
    /// Creates the controller, installs its input frame above whatever is
    /// on top, and seeds the built-in key bindings.
    pub fn new(app: &mut App, title: impl Into<String>) -> Self {
        let title = title.into();
        let id = app.allocate_controller_id();
        let frame = app.install_frame(Layer::Controller(id));
        Self {
            id,
            navigation: NavigationStack::new(title.clone()),
            title,
            store: TableStore::new(),
            bindings: KeyBindingTable::with_standard_keys(),
            help_expanded: false,
            fetch: None,
            on_row_selected: None,
            on_action: None,
            refresh: RefreshScheduler::new(id),
            ui: app.handle().for_controller(id),
            log: LogPanel::default(),
            frame: Some(frame),
            viewport: TableState::default(),
        }
    }

    pub fn id(&self) -> ControllerId {
        self.id
    }

    /// A UI handle whose updates are tagged for this controller.
    pub fn ui_handle(&self) -> UiHandle {
        self.ui.clone()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn store(&self) -> &TableStore {
        &self.store
    }

    pub fn bindings(&self) -> &KeyBindingTable {
        &self.bindings
    }

    pub fn navigation(&self) -> &NavigationStack {
        &self.navigation
    }

    pub fn log_panel(&self) -> &LogPanel {
        &self.log
    }

    pub fn help_expanded(&self) -> bool {
        self.help_expanded
    }

    pub fn set_help_expanded(&mut self, expanded: bool) {
        self.help_expanded = expanded;
    }

    pub fn set_log_capacity(&mut self, capacity: usize) {
        self.log.set_capacity(capacity);
    }

    pub fn set_headers(&mut self, headers: Vec<String>) {
        self.store.set_headers(headers);
    }

    pub fn set_data(&mut self, rows: Vec<Vec<String>>) {
        self.store.set_data(rows);
    }

    pub fn update_row(&mut self, index: usize, row: Vec<String>) {
        self.store.update_row(index, row);
    }

    pub fn set_selection_key(&mut self, key: Option<String>) {
        self.store.set_selection_key(key);
    }

    pub fn set_fetch(
        &mut self,
        fetch: impl Fn() -> Result<Vec<Vec<String>>> + Send + Sync + 'static,
    ) -> Result<()> {
        if self.fetch.is_some() {
            bail!("fetch function already set; callbacks can be set at most once per kind");
        }
        self.fetch = Some(Arc::new(fetch));
        Ok(())
    }

    pub fn set_on_row_selected(
        &mut self,
        callback: impl FnMut(&RowSelection) + 'static,
    ) -> Result<()> {
        if self.on_row_selected.is_some() {
            bail!("row selected callback already set; callbacks can be set at most once per kind");
        }
        self.on_row_selected = Some(Box::new(callback));
        Ok(())
    }

    pub fn set_on_action(
        &mut self,
        callback: impl FnMut(&ActionEvent) -> Result<Claim> + 'static,
    ) -> Result<()> {
        if self.on_action.is_some() {
            bail!("action callback already set; callbacks can be set at most once per kind");
        }
        self.on_action = Some(Box::new(callback));
        Ok(())
    }

    pub fn add_key_binding(&mut self, key: KeySymbol, description: impl Into<String>) {
        self.bindings.bind(key, description);
    }

    pub fn register_standard_keys(&mut self) {
        self.bindings.register_standard_keys();
    }

    /// Confirms a row: highlight, row callback, then a `rowSelected` action.
    /// Out-of-range indexes do nothing.
    pub fn select_by_index(&mut self, index: usize) -> bool {
        let Some(selection) = self.store.select(index) else {
            return false;
        };
        if let Some(callback) = self.on_row_selected.as_mut() {
            callback(&selection);
        }
        self.emit_action(ActionEvent::row_selected(&selection));
        true
    }

    /// Moves the cursor without firing selection callbacks.
    pub fn move_cursor_to(&mut self, index: usize) -> bool {
        let row_count = self.store.row_count();
        self.store
            .selection_mut()
            .move_to(index, row_count)
            .is_some()
    }

    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    pub fn push_view(&mut self, name: impl Into<String>) {
        self.navigation.push(name);
    }

    pub fn pop_view(&mut self) -> Option<String> {
        self.navigation.pop()
    }

    pub fn clear_views(&mut self) {
        self.navigation.clear();
    }

    pub fn set_view_stack(&mut self, views: Vec<String>) {
        self.navigation.set(views);
    }

    pub fn copy_navigation_stack_from(&mut self, other: &TableController) {
        self.navigation.copy_from(&other.navigation);
    }

    pub fn current_view(&self) -> Option<&str> {
        self.navigation.current()
    }

    pub fn start_auto_refresh(&mut self, interval: Duration) -> Result<()> {
        let Some(fetch) = self.fetch.clone() else {
            bail!("auto refresh needs a fetch function; call set_fetch first");
        };
        self.refresh.start(interval, fetch, self.ui.clone())?;
        self.log(
            Level::INFO,
            format!("auto refresh every {}", format_interval(interval)),
        );
        Ok(())
    }

    pub fn stop_auto_refresh(&mut self) {
        if self.refresh.stop() {
            self.log(Level::INFO, "auto refresh stopped");
        }
    }

    /// Restarts a running ticker with the same interval so fetches begun
    /// before a host-side change are dropped. Returns false when auto
    /// refresh is off.
    pub fn restart_auto_refresh(&mut self) -> Result<bool> {
        let (Some(interval), Some(fetch)) = (self.refresh.interval(), self.fetch.clone()) else {
            return Ok(false);
        };
        self.refresh.start(interval, fetch, self.ui.clone())?;
        Ok(true)
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.refresh.is_running()
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        self.refresh.interval()
    }

    /// Generation tag that background results must carry to be applied.
    pub fn refresh_generation(&self) -> u64 {
        self.refresh.generation()
    }

    pub fn live_refresh_timers(&self) -> usize {
        self.refresh.live_timers()
    }

    /// Runs the fetch function on the calling thread. Failures are logged
    /// and leave the table as it was.
    pub fn refresh_data(&mut self) -> bool {
        let Some(fetch) = self.fetch.clone() else {
            tracing::debug!(view = %self.title, "refresh skipped: no fetch function");
            return false;
        };
        let result = fetch().map_err(|error| format!("{error:#}"));
        self.apply_fetch_result(result)
    }

    /// Applies a background fetch result. Results from a retired ticker are
    /// dropped.
    pub fn apply_refresh(&mut self, generation: u64, result: Result<Vec<Vec<String>>, String>) {
        let current = self.refresh.generation();
        if generation != current {
            tracing::debug!(view = %self.title, generation, current, "stale refresh dropped");
            return;
        }
        self.apply_fetch_result(result);
    }

    pub fn handle_key(&mut self, stroke: KeyStroke) -> Propagation {
        match resolve_key(stroke, &self.navigation, &self.bindings) {
            KeyRoute::NavigateBack => self.navigate_back(),
            KeyRoute::Refresh => {
                self.refresh_data();
            }
            KeyRoute::OfferHelp => {
                if self.emit_action(ActionEvent::keypress(HELP_KEY)) == Claim::Declined {
                    self.help_expanded = !self.help_expanded;
                }
            }
            KeyRoute::Custom(symbol) => {
                self.emit_action(ActionEvent::keypress(symbol));
            }
            KeyRoute::Table(command) => self.apply_table_command(command),
            KeyRoute::Forward => return Propagation::Forward,
        }
        Propagation::Handled
    }

    pub fn log(&mut self, level: Level, message: impl Into<String>) {
        let message = message.into();
        match level {
            Level::ERROR => tracing::error!(view = %self.title, "{message}"),
            Level::WARN => tracing::warn!(view = %self.title, "{message}"),
            Level::INFO => tracing::info!(view = %self.title, "{message}"),
            Level::DEBUG => tracing::debug!(view = %self.title, "{message}"),
            _ => tracing::trace!(view = %self.title, "{message}"),
        }
        self.log.push(level, message);
    }

    /// Stops refreshing and gives up the input frame. Safe to call twice.
    pub fn destroy(&mut self, app: &mut App) {
        self.refresh.stop();
        if let Some(frame) = self.frame.take() {
            app.release_frame(frame);
        }
    }

    fn navigate_back(&mut self) {
        let Some(from) = self.navigation.pop() else {
            return;
        };
        let to = self.navigation.current().map(str::to_owned);
        self.emit_action(ActionEvent::back(&from, to.as_deref()));
        self.emit_action(ActionEvent::navigate_back(&from, to.as_deref()));
    }

    fn apply_table_command(&mut self, command: TableCommand) {
        let row_count = self.store.row_count();
        match command {
            TableCommand::MoveRow(delta) => {
                self.store.selection_mut().move_by(delta, row_count);
            }
            TableCommand::JumpFirstRow => {
                self.store.selection_mut().jump_first(row_count);
            }
            TableCommand::JumpLastRow => {
                self.store.selection_mut().jump_last(row_count);
            }
            TableCommand::Confirm => {
                if let Some(row) = self.store.selected_row() {
                    self.select_by_index(row);
                }
            }
            TableCommand::ClearSelection => self.clear_selection(),
        }
    }

    fn apply_fetch_result(&mut self, result: Result<Vec<Vec<String>>, String>) -> bool {
        match result {
            Ok(rows) => {
                let count = rows.len();
                let restored = self.store.set_data(rows);
                tracing::debug!(view = %self.title, rows = count, ?restored, "table refreshed");
                true
            }
            Err(error) => {
                self.log(Level::ERROR, format!("refresh failed: {error}"));
                false
            }
        }
    }

    fn emit_action(&mut self, event: ActionEvent) -> Claim {
        let Some(callback) = self.on_action.as_mut() else {
            return Claim::Declined;
        };
        match callback(&event) {
            Ok(claim) => claim,
            Err(error) => {
                tracing::debug!(action = event.name(), "action handler declined: {error:#}");
                Claim::Declined
            }
        }
    }
}

impl Drop for TableController {
    fn drop(&mut self) {
        self.refresh.stop();
    }
}

fn format_interval(interval: Duration) -> String {
    let millis = interval.as_millis();
    if millis % 60_000 == 0 {
        format!("{}m", millis / 60_000)
    } else if millis % 1_000 == 0 {
        format!("{}s", millis / 1_000)
    } else {
        format!("{millis}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::{TableController, format_interval};
    use crate::app::App;
    use gridline_app::{Highlight, KeyStroke, KeySymbol, Propagation};
    use gridline_testkit::{ActionRecorder, scenario_headers, scenario_rows};
    use std::time::Duration;

    fn controller() -> (App, TableController) {
        let mut app = App::new();
        let mut controller = TableController::new(&mut app, "Pods");
        controller.set_headers(scenario_headers());
        controller.set_data(scenario_rows());
        (app, controller)
    }

    fn press(controller: &mut TableController, symbol: KeySymbol) -> Propagation {
        controller.handle_key(KeyStroke::plain(symbol))
    }

    #[test]
    fn callbacks_can_be_set_once_per_kind() {
        let (_app, mut controller) = controller();
        let recorder = ActionRecorder::default();
        assert!(controller.set_on_action(recorder.action_callback()).is_ok());
        let error = controller
            .set_on_action(recorder.action_callback())
            .expect_err("second action callback should fail");
        assert!(error.to_string().contains("at most once"));

        assert!(controller.set_fetch(|| Ok(Vec::new())).is_ok());
        assert!(controller.set_fetch(|| Ok(Vec::new())).is_err());
        assert!(controller.set_on_row_selected(|_| {}).is_ok());
        assert!(controller.set_on_row_selected(|_| {}).is_err());
    }

    #[test]
    fn select_by_index_fires_row_callback_then_action() {
        let (_app, mut controller) = controller();
        let recorder = ActionRecorder::default();
        controller
            .set_on_row_selected(recorder.row_callback())
            .expect("row callback");
        controller
            .set_on_action(recorder.action_callback())
            .expect("action callback");

        assert!(controller.select_by_index(1));
        assert_eq!(recorder.selected_rows(), vec![1]);
        let actions = recorder.actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].name, "rowSelected");
        assert_eq!(
            actions[0].payload.get("fields").and_then(|fields| fields.get("Status")),
            Some(&serde_json::json!("down"))
        );
    }

    #[test]
    fn move_cursor_to_skips_selection_callbacks() {
        let (_app, mut controller) = controller();
        let recorder = ActionRecorder::default();
        controller
            .set_on_action(recorder.action_callback())
            .expect("action callback");

        assert!(controller.move_cursor_to(1));
        assert!(!controller.move_cursor_to(9));
        assert_eq!(controller.store().selected_row(), Some(1));
        assert_eq!(controller.store().selection().highlight(), Highlight::Cursor);
        assert!(recorder.actions().is_empty());
    }

    #[test]
    fn out_of_range_selection_is_silent() {
        let (_app, mut controller) = controller();
        let recorder = ActionRecorder::default();
        controller
            .set_on_action(recorder.action_callback())
            .expect("action callback");
        assert!(!controller.select_by_index(9));
        assert!(recorder.actions().is_empty());
        assert!(controller.log_panel().is_empty());
    }

    #[test]
    fn cursor_movement_fires_no_callbacks_until_enter() {
        let (_app, mut controller) = controller();
        let recorder = ActionRecorder::default();
        controller
            .set_on_action(recorder.action_callback())
            .expect("action callback");

        press(&mut controller, KeySymbol::Char('j'));
        press(&mut controller, KeySymbol::Down);
        assert_eq!(controller.store().selected_row(), Some(1));
        assert_eq!(controller.store().selection().highlight(), Highlight::Cursor);
        assert!(recorder.actions().is_empty());

        press(&mut controller, KeySymbol::Enter);
        assert_eq!(recorder.names(), vec!["rowSelected".to_owned()]);
        assert_eq!(
            controller.store().selection().highlight(),
            Highlight::Confirmed
        );

        press(&mut controller, KeySymbol::Char('c'));
        assert_eq!(controller.store().selected_row(), None);
    }

    #[test]
    fn custom_binding_fires_one_keypress_action_and_stops_propagation() {
        let (_app, mut controller) = controller();
        let recorder = ActionRecorder::default();
        controller
            .set_on_action(recorder.action_callback())
            .expect("action callback");
        controller.add_key_binding(KeySymbol::Char('C'), "Connect");

        let propagation = press(&mut controller, KeySymbol::Char('C'));
        assert_eq!(propagation, Propagation::Handled);
        let actions = recorder.actions();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].name, "keypress");
        assert_eq!(
            serde_json::Value::Object(actions[0].payload.clone()),
            serde_json::json!({"key": "C"})
        );
    }

    #[test]
    fn back_fires_back_then_navigate_back() {
        let (_app, mut controller) = controller();
        let recorder = ActionRecorder::default();
        controller
            .set_on_action(recorder.action_callback())
            .expect("action callback");
        controller.push_view("web-1");

        assert_eq!(press(&mut controller, KeySymbol::Esc), Propagation::Handled);
        assert_eq!(
            recorder.names(),
            vec!["back".to_owned(), "navigate_back".to_owned()]
        );
        assert_eq!(controller.current_view(), Some("Pods"));

        assert_eq!(press(&mut controller, KeySymbol::Esc), Propagation::Forward);
        assert_eq!(recorder.actions().len(), 2);
    }

    #[test]
    fn claimed_help_key_skips_the_builtin_toggle() {
        let (_app, mut controller) = controller();
        let recorder = ActionRecorder::claiming();
        controller
            .set_on_action(recorder.action_callback())
            .expect("action callback");

        press(&mut controller, KeySymbol::Char('?'));
        assert!(!controller.help_expanded());
        assert_eq!(recorder.count("keypress"), 1);

        recorder.set_reply(gridline_app::Claim::Declined);
        press(&mut controller, KeySymbol::Char('?'));
        assert!(controller.help_expanded());
    }

    #[test]
    fn failing_action_handler_counts_as_declined() {
        let (_app, mut controller) = controller();
        let recorder = ActionRecorder::failing("not handled");
        controller
            .set_on_action(recorder.action_callback())
            .expect("action callback");

        press(&mut controller, KeySymbol::Char('?'));
        assert!(controller.help_expanded());
    }

    #[test]
    fn help_toggles_without_an_action_callback() {
        let (_app, mut controller) = controller();
        press(&mut controller, KeySymbol::Char('?'));
        assert!(controller.help_expanded());
        press(&mut controller, KeySymbol::Char('?'));
        assert!(!controller.help_expanded());
    }

    #[test]
    fn refresh_key_runs_the_fetch_function() {
        let (_app, mut controller) = controller();
        controller
            .set_fetch(|| Ok(vec![vec!["9".to_owned(), "z".to_owned(), "up".to_owned()]]))
            .expect("fetch");
        press(&mut controller, KeySymbol::Char('R'));
        assert_eq!(controller.store().row_count(), 1);
    }

    #[test]
    fn refresh_without_fetch_is_a_no_op() {
        let (_app, mut controller) = controller();
        assert!(!controller.refresh_data());
        assert_eq!(controller.store().rows(), scenario_rows().as_slice());
        assert!(controller.log_panel().is_empty());
    }

    #[test]
    fn start_auto_refresh_requires_a_fetch_function() {
        let (_app, mut controller) = controller();
        assert!(controller.start_auto_refresh(Duration::from_secs(1)).is_err());
        assert!(!controller.is_auto_refreshing());
    }

    #[test]
    fn stale_generations_are_dropped() -> anyhow::Result<()> {
        let (_app, mut controller) = controller();
        controller.set_fetch(|| Ok(Vec::new()))?;
        controller.start_auto_refresh(Duration::from_secs(60))?;
        controller.stop_auto_refresh();

        controller.apply_refresh(1, Ok(Vec::new()));
        assert_eq!(controller.store().row_count(), 2);
        Ok(())
    }

    #[test]
    fn destroy_releases_the_input_frame() -> anyhow::Result<()> {
        let (mut app, mut controller) = controller();
        controller.set_fetch(|| Ok(Vec::new()))?;
        controller.start_auto_refresh(Duration::from_secs(60))?;
        assert_eq!(app.input().len(), 2);

        controller.destroy(&mut app);
        controller.destroy(&mut app);
        assert_eq!(app.input().len(), 1);
        assert!(!controller.is_auto_refreshing());
        Ok(())
    }

    #[test]
    fn intervals_format_in_their_largest_whole_unit() {
        assert_eq!(format_interval(Duration::from_secs(120)), "2m");
        assert_eq!(format_interval(Duration::from_secs(5)), "5s");
        assert_eq!(format_interval(Duration::from_millis(1500)), "1500ms");
    }
}
