// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::config::Config;
use anyhow::{Context, Result};
use gridline_app::{
    ActionEvent, ActionKind, Claim, Details, KeySymbol, RowSelection, format_details,
};
use gridline_tui::dialogs::{
    ConfirmDialog, DirectoryPicker, ListPicker, MessageDialog, ProgressDialog,
};
use gridline_tui::{App, DialogResult, TableController, UiHandle};
use std::collections::BTreeMap;
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::Level;

pub const HEADERS: [&str; 4] = ["Name", "Kind", "Size", "Modified"];
const NAME: &str = "Name";
const KIND: &str = "Kind";

const BINDINGS: [(char, &str); 6] = [
    ('o', "Open directory"),
    ('h', "Toggle hidden"),
    ('x', "Report"),
    ('l', "Jump to entry"),
    ('i', "Info"),
    ('p', "Scan sizes"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    Other,
}

impl EntryKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Directory => "dir",
            Self::File => "file",
            Self::Symlink => "link",
            Self::Other => "other",
        }
    }

    fn of(metadata: &Metadata) -> Self {
        let kind = metadata.file_type();
        if kind.is_dir() {
            Self::Directory
        } else if kind.is_symlink() {
            Self::Symlink
        } else if kind.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
    pub modified: Option<OffsetDateTime>,
}

impl Entry {
    pub fn from_metadata(name: impl Into<String>, metadata: &Metadata) -> Self {
        let kind = EntryKind::of(metadata);
        Self {
            name: name.into(),
            kind,
            size: if kind == EntryKind::File {
                metadata.len()
            } else {
                0
            },
            modified: metadata.modified().ok().map(OffsetDateTime::from),
        }
    }

    pub fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.kind.label().to_owned(),
            match self.kind {
                EntryKind::File => human_size(self.size),
                _ => "-".to_owned(),
            },
            self.modified.map(format_timestamp).unwrap_or_default(),
        ]
    }
}

/// Directory listing with sub-directories first, then by name.
pub fn list_entries(dir: &Path, show_hidden: bool) -> Result<Vec<Entry>> {
    let reader = fs::read_dir(dir).with_context(|| format!("read directory {}", dir.display()))?;
    let mut entries = Vec::new();
    for item in reader {
        let item = item.with_context(|| format!("read entry in {}", dir.display()))?;
        let name = item.file_name().to_string_lossy().into_owned();
        if !show_hidden && name.starts_with('.') {
            continue;
        }
        match item.metadata() {
            Ok(metadata) => entries.push(Entry::from_metadata(name, &metadata)),
            // Removed between listing and stat.
            Err(error) => tracing::debug!(entry = %name, "skipping entry: {error}"),
        }
    }
    entries.sort_by_key(|entry| (entry.kind != EntryKind::Directory, entry.name.to_lowercase()));
    Ok(entries)
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .unwrap_or_default()
}

/// Total bytes of regular files below `root`. Unreadable directories count
/// as empty and symlinks are not followed.
pub fn tree_size(root: &Path) -> u64 {
    let mut total = 0_u64;
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let Ok(reader) = fs::read_dir(&dir) else {
            continue;
        };
        for item in reader.flatten() {
            let Ok(metadata) = fs::symlink_metadata(item.path()) else {
                continue;
            };
            if metadata.is_dir() {
                pending.push(item.path());
            } else if metadata.is_file() {
                total = total.saturating_add(metadata.len());
            }
        }
    }
    total
}

/// Filesystem facts shown by the info dialog.
struct PathDetails {
    name: String,
    path: PathBuf,
    entry: Entry,
    bytes: u64,
    read_only: bool,
}

impl PathDetails {
    fn read(name: &str, path: &Path) -> Result<Self> {
        let metadata = fs::symlink_metadata(path)
            .with_context(|| format!("read metadata for {}", path.display()))?;
        Ok(Self {
            name: name.to_owned(),
            path: path.to_path_buf(),
            entry: Entry::from_metadata(name, &metadata),
            bytes: metadata.len(),
            read_only: metadata.permissions().readonly(),
        })
    }
}

impl Details for PathDetails {
    fn name(&self) -> &str {
        &self.name
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("path", self.path.display().to_string()),
            ("kind", self.entry.kind.label().to_owned()),
            (
                "size",
                format!("{} ({} bytes)", human_size(self.bytes), self.bytes),
            ),
            (
                "modified",
                self.entry
                    .modified
                    .map(format_timestamp)
                    .unwrap_or_else(|| "unknown".to_owned()),
            ),
            ("read-only", if self.read_only { "yes" } else { "no" }.to_owned()),
        ]
    }
}

/// Where the browser is looking. The fetch function reads it from the
/// refresh thread; everything else writes it on the UI thread.
#[derive(Debug)]
struct Location {
    root: PathBuf,
    below: Vec<String>,
    show_hidden: bool,
}

impl Location {
    fn current(&self) -> PathBuf {
        let mut path = self.root.clone();
        path.extend(&self.below);
        path
    }
}

type SharedLocation = Arc<Mutex<Location>>;

fn lock(location: &SharedLocation) -> MutexGuard<'_, Location> {
    location.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builds the directory browser view on top of `app`.
pub fn install(app: &mut App, config: &Config, root: PathBuf) -> Result<TableController> {
    let mut controller = TableController::new(app, config.title());
    controller.set_headers(HEADERS.iter().map(|header| (*header).to_owned()).collect());
    controller.set_selection_key(Some(config.selection_key().to_owned()));
    controller.set_log_capacity(config.log_lines());
    controller.set_help_expanded(config.help_expanded());
    for (key, description) in BINDINGS {
        controller.add_key_binding(KeySymbol::Char(key), description);
    }

    let location = Arc::new(Mutex::new(Location {
        root,
        below: Vec::new(),
        show_hidden: config.show_hidden(),
    }));

    let fetch_location = Arc::clone(&location);
    controller.set_fetch(move || {
        let (dir, show_hidden) = {
            let location = lock(&fetch_location);
            (location.current(), location.show_hidden)
        };
        Ok(list_entries(&dir, show_hidden)?
            .iter()
            .map(Entry::row)
            .collect())
    })?;

    let ui = controller.ui_handle();
    let row_ui = ui.clone();
    let row_location = Arc::clone(&location);
    controller.set_on_row_selected(move |selection| {
        on_row_selected(&row_ui, &row_location, selection);
    })?;
    controller.set_on_action(move |event| on_action(&ui, &location, event))?;
    Ok(controller)
}

fn on_row_selected(ui: &UiHandle, location: &SharedLocation, selection: &RowSelection) {
    let Some(name) = selection.field(NAME).map(str::to_owned) else {
        return;
    };
    let location = Arc::clone(location);
    if selection.field(KIND) == Some(EntryKind::Directory.label()) {
        ui.update(move |app, controller| enter_directory(app, controller, &location, name));
        return;
    }

    let path = lock(&location).current().join(&name);
    ui.update(move |app, _| show_details(app, &name, &path));
}

fn on_action(ui: &UiHandle, location: &SharedLocation, event: &ActionEvent) -> Result<Claim> {
    let location = Arc::clone(location);
    match event.kind {
        ActionKind::NavigateBack => {
            ui.update(move |_, controller| {
                relocate(controller, &location);
                controller.refresh_data();
            });
        }
        ActionKind::Keypress => match event.key() {
            Some("o") => open_directory_picker(ui, location),
            Some("h") => {
                ui.update(move |app, controller| toggle_hidden(app, controller, &location));
            }
            Some("x") => {
                let done_ui = ui.clone();
                ui.update(move |app, controller| confirm_report(app, controller, done_ui));
            }
            Some("l") => {
                let done_ui = ui.clone();
                ui.update(move |app, controller| open_jump_list(app, controller, done_ui));
            }
            Some("i") => {
                ui.update(move |app, controller| {
                    match selected_fields(controller).and_then(|fields| fields.get(NAME).cloned())
                    {
                        Some(name) => {
                            let path = lock(&location).current().join(&name);
                            show_details(app, &name, &path);
                        }
                        None => app.set_status("select an entry first"),
                    }
                });
            }
            Some("p") => {
                let scan_ui = ui.clone();
                ui.update(move |app, controller| start_scan(app, controller, &location, scan_ui));
            }
            _ => return Ok(Claim::Declined),
        },
        ActionKind::RowSelected | ActionKind::Back => return Ok(Claim::Declined),
    }
    Ok(Claim::Claimed)
}

/// Points the fetch function at the current navigation path and retires
/// listings already in flight for the old one.
fn relocate(controller: &mut TableController, location: &SharedLocation) {
    lock(location).below = controller
        .navigation()
        .views()
        .iter()
        .skip(1)
        .cloned()
        .collect();
    retire_in_flight(controller);
}

fn retire_in_flight(controller: &mut TableController) {
    if let Err(error) = controller.restart_auto_refresh() {
        controller.log(Level::WARN, format!("restart auto refresh: {error:#}"));
    }
}

fn enter_directory(
    app: &mut App,
    controller: &mut TableController,
    location: &SharedLocation,
    name: String,
) {
    controller.push_view(name.clone());
    relocate(controller, location);
    controller.clear_selection();
    if controller.refresh_data() {
        return;
    }
    controller.pop_view();
    relocate(controller, location);
    app.set_status(format!("cannot open {name}"));
}

fn show_details(app: &mut App, name: &str, path: &Path) {
    let dialog = match PathDetails::read(name, path) {
        Ok(details) => MessageDialog::info(details.name(), format_details(&details)),
        Err(error) => MessageDialog::error(format!("{error:#}")),
    };
    app.open_overlay(Box::new(dialog), None);
}

fn selected_fields(controller: &TableController) -> Option<BTreeMap<String, String>> {
    let row = controller.store().selected_row()?;
    controller.store().row_fields(row)
}

fn open_directory_picker(ui: &UiHandle, location: SharedLocation) {
    let (start, show_hidden) = {
        let location = lock(&location);
        (location.current(), location.show_hidden)
    };
    let picker = DirectoryPicker::new("Open directory", start).with_hidden(show_hidden);
    let done_ui = ui.clone();
    ui.open_overlay(
        Box::new(picker),
        Some(Box::new(move |result, _cancelled| {
            if let Some(DialogResult::Directory(root)) = result {
                done_ui.update(move |app, controller| {
                    change_root(app, controller, &location, root);
                });
            }
        })),
    );
}

fn change_root(
    app: &mut App,
    controller: &mut TableController,
    location: &SharedLocation,
    root: PathBuf,
) {
    lock(location).root = root.clone();
    controller.clear_views();
    relocate(controller, location);
    controller.clear_selection();
    controller.refresh_data();
    controller.log(Level::INFO, format!("browsing {}", root.display()));
    app.set_status(format!("browsing {}", root.display()));
}

fn toggle_hidden(app: &mut App, controller: &mut TableController, location: &SharedLocation) {
    let show_hidden = {
        let mut location = lock(location);
        location.show_hidden = !location.show_hidden;
        location.show_hidden
    };
    retire_in_flight(controller);
    controller.refresh_data();
    app.set_status(if show_hidden {
        "showing hidden entries"
    } else {
        "hiding hidden entries"
    });
}

fn confirm_report(app: &mut App, controller: &mut TableController, ui: UiHandle) {
    let Some(fields) = selected_fields(controller) else {
        app.set_status("select an entry first");
        return;
    };
    let field = |header: &str| fields.get(header).cloned().unwrap_or_default();
    let name = field(NAME);
    let summary = format!(
        "{name}: {}, {}, modified {}",
        field(KIND),
        field("Size"),
        field("Modified")
    );

    app.open_overlay(
        Box::new(ConfirmDialog::new("Report", format!("Report on {name}?"))),
        Some(Box::new(move |result, _cancelled| {
            if result == Some(DialogResult::Confirmed(true)) {
                ui.update(move |app, controller| {
                    controller.log(Level::INFO, summary.clone());
                    app.set_status(summary);
                });
            }
        })),
    );
}

fn open_jump_list(app: &mut App, controller: &mut TableController, ui: UiHandle) {
    let names = controller
        .store()
        .rows()
        .iter()
        .filter_map(|row| row.first().cloned())
        .collect::<Vec<_>>();
    if names.is_empty() {
        app.set_status("nothing to jump to");
        return;
    }

    app.open_overlay(
        Box::new(ListPicker::new("Jump to", names)),
        Some(Box::new(move |result, _cancelled| {
            let Some(DialogResult::Selected { item, .. }) = result else {
                return;
            };
            ui.update(move |app, controller| {
                // Rows may have been refreshed since the list was built.
                let index = controller
                    .store()
                    .rows()
                    .iter()
                    .position(|row| row.first() == Some(&item));
                match index {
                    Some(index) => {
                        controller.move_cursor_to(index);
                    }
                    None => app.set_status(format!("{item} is gone")),
                }
            });
        })),
    );
}

fn start_scan(
    app: &mut App,
    controller: &mut TableController,
    location: &SharedLocation,
    ui: UiHandle,
) {
    let (dir, show_hidden) = {
        let location = lock(location);
        (location.current(), location.show_hidden)
    };
    let progress = app.open_overlay(
        Box::new(ProgressDialog::new("Scan", format!("scanning {}", dir.display())).pinned()),
        None,
    );

    let spawned = thread::Builder::new()
        .name("gridline-scan".to_owned())
        .spawn(move || {
            let summary = match list_entries(&dir, show_hidden) {
                Ok(entries) => {
                    let count = entries.len();
                    let mut total = 0_u64;
                    for (done, entry) in entries.iter().enumerate() {
                        let path = dir.join(&entry.name);
                        total = total.saturating_add(match entry.kind {
                            EntryKind::Directory => tree_size(&path),
                            _ => entry.size,
                        });
                        let ratio = (done + 1) as f64 / count as f64;
                        ui.update_progress(progress, ratio, Some(entry.name.clone()));
                    }
                    Ok(format!("scanned {count} entries, {}", human_size(total)))
                }
                Err(error) => Err(format!("{error:#}")),
            };
            ui.close_overlay(progress);
            ui.update(move |app, controller| match summary {
                Ok(summary) => {
                    controller.log(Level::INFO, summary.clone());
                    app.set_status(summary);
                }
                Err(error) => {
                    controller.log(Level::ERROR, format!("scan failed: {error}"));
                    app.open_overlay(Box::new(MessageDialog::error(error)), None);
                }
            });
        });
    if let Err(error) = spawned {
        app.close_overlay(progress);
        controller.log(Level::ERROR, format!("spawn scan thread: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::{EntryKind, PathDetails, human_size, install, list_entries, tree_size};
    use crate::config::Config;
    use anyhow::Result;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use gridline_app::{Details, format_details};
    use gridline_testkit::temp_tree;
    use gridline_tui::{App, TableController, UiEvent, handle_key_event, process_ui_events};
    use std::path::Path;
    use std::thread;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(app: &mut App, controller: &mut TableController, code: KeyCode) {
        handle_key_event(app, controller, key(code));
        process_ui_events(app, controller);
    }

    fn type_text(app: &mut App, controller: &mut TableController, text: &str) {
        for ch in text.chars() {
            press(app, controller, KeyCode::Char(ch));
        }
    }

    fn names(controller: &TableController) -> Vec<String> {
        controller
            .store()
            .rows()
            .iter()
            .filter_map(|row| row.first().cloned())
            .collect()
    }

    fn browser(entries: &[&str]) -> Result<(TempDir, App, TableController)> {
        let dir = temp_tree(entries)?;
        let mut app = App::new();
        let mut controller = install(&mut app, &Config::default(), dir.path().to_path_buf())?;
        assert!(controller.refresh_data());
        Ok((dir, app, controller))
    }

    fn cursor_on(controller: &mut TableController, name: &str) {
        let index = names(controller)
            .iter()
            .position(|candidate| candidate == name)
            .expect("entry listed");
        assert!(controller.move_cursor_to(index));
    }

    #[test]
    fn listing_puts_directories_first_and_hides_dotfiles() -> Result<()> {
        let dir = temp_tree(&["zeta/", "alpha.txt", "Beta/", ".hidden"])?;
        let entries = list_entries(dir.path(), false)?;
        let listed = entries
            .iter()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(listed, vec!["Beta", "zeta", "alpha.txt"]);
        assert_eq!(entries[0].kind, EntryKind::Directory);

        let file = entries[2].row();
        assert_eq!(file[1], "file");
        assert_eq!(file[2], "9 B");
        assert_eq!(entries[0].row()[2], "-");

        assert_eq!(list_entries(dir.path(), true)?.len(), 4);
        Ok(())
    }

    #[test]
    fn human_sizes_use_binary_units() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(1536), "1.5 KiB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MiB");
    }

    #[test]
    fn tree_size_sums_nested_files() -> Result<()> {
        let dir = temp_tree(&["a/b/c.txt", "a/d.txt"])?;
        assert_eq!(tree_size(&dir.path().join("a")), "a/b/c.txt".len() as u64 + 7);
        assert_eq!(tree_size(Path::new("/definitely/not/here")), 0);
        Ok(())
    }

    #[test]
    fn path_details_list_kind_and_exact_size() -> Result<()> {
        let dir = temp_tree(&["notes.txt"])?;
        let details = PathDetails::read("notes.txt", &dir.path().join("notes.txt"))?;
        assert_eq!(details.name(), "notes.txt");

        let text = format_details(&details);
        assert!(text.contains("kind:      file"));
        assert!(text.contains("size:      9 B (9 bytes)"));
        assert!(text.contains("read-only: no"));

        assert!(PathDetails::read("gone", &dir.path().join("gone")).is_err());
        Ok(())
    }

    #[test]
    fn enter_on_a_directory_drills_down_and_esc_comes_back() -> Result<()> {
        let (_dir, mut app, mut controller) = browser(&["src/main.rs", "README.md"])?;
        assert_eq!(names(&controller), vec!["src", "README.md"]);

        cursor_on(&mut controller, "src");
        press(&mut app, &mut controller, KeyCode::Enter);
        assert_eq!(controller.current_view(), Some("src"));
        assert_eq!(names(&controller), vec!["main.rs"]);
        assert_eq!(controller.navigation().breadcrumb_text(), "Files › src");

        press(&mut app, &mut controller, KeyCode::Esc);
        assert_eq!(controller.current_view(), Some("Files"));
        assert_eq!(names(&controller), vec!["src", "README.md"]);
        Ok(())
    }

    #[test]
    fn parent_listing_in_flight_during_drill_down_is_dropped() -> Result<()> {
        let (_dir, mut app, mut controller) = browser(&["src/main.rs", "README.md"])?;
        controller.start_auto_refresh(Duration::from_secs(3600))?;
        let before = controller.refresh_generation();
        let parent_listing = controller.store().rows().to_vec();

        cursor_on(&mut controller, "src");
        press(&mut app, &mut controller, KeyCode::Enter);
        assert!(controller.refresh_generation() > before);

        app.handle().send(UiEvent::RefreshLoaded {
            controller: controller.id(),
            generation: before,
            result: Ok(parent_listing),
        });
        process_ui_events(&mut app, &mut controller);
        assert_eq!(names(&controller), vec!["main.rs"]);
        assert!(controller.is_auto_refreshing());

        controller.stop_auto_refresh();
        Ok(())
    }

    #[test]
    fn enter_on_a_file_opens_its_details() -> Result<()> {
        let (_dir, mut app, mut controller) = browser(&["README.md"])?;
        cursor_on(&mut controller, "README.md");
        press(&mut app, &mut controller, KeyCode::Enter);
        assert_eq!(app.overlays().top_title(), Some("README.md"));
        assert_eq!(controller.current_view(), Some("Files"));
        Ok(())
    }

    #[test]
    fn hidden_toggle_relists_the_directory() -> Result<()> {
        let (_dir, mut app, mut controller) = browser(&[".env", "main.rs"])?;
        assert_eq!(names(&controller), vec!["main.rs"]);
        press(&mut app, &mut controller, KeyCode::Char('h'));
        assert_eq!(names(&controller), vec![".env", "main.rs"]);
        assert_eq!(app.status(), Some("showing hidden entries"));
        Ok(())
    }

    #[test]
    fn picking_a_directory_replaces_the_root_and_resets_navigation() -> Result<()> {
        let (_dir, mut app, mut controller) = browser(&["docs/guide.md", "src/lib.rs"])?;
        cursor_on(&mut controller, "src");
        press(&mut app, &mut controller, KeyCode::Enter);
        assert_eq!(controller.navigation().depth(), 2);

        press(&mut app, &mut controller, KeyCode::Char('o'));
        assert_eq!(app.overlays().top_title(), Some("Open directory"));
        // Back at the root the cursor rests on the directory we came from.
        press(&mut app, &mut controller, KeyCode::Backspace);
        press(&mut app, &mut controller, KeyCode::Up);
        press(&mut app, &mut controller, KeyCode::Enter);
        press(&mut app, &mut controller, KeyCode::Char('s'));

        assert!(app.overlays().is_empty());
        assert_eq!(controller.navigation().views(), ["Files".to_owned()]);
        assert_eq!(names(&controller), vec!["guide.md"]);
        Ok(())
    }

    #[test]
    fn jump_list_moves_the_cursor_by_name() -> Result<()> {
        let (_dir, mut app, mut controller) = browser(&["Cargo.toml", "README.md", "src/"])?;
        press(&mut app, &mut controller, KeyCode::Char('l'));
        assert_eq!(app.overlays().top_title(), Some("Jump to"));

        type_text(&mut app, &mut controller, "read");
        press(&mut app, &mut controller, KeyCode::Enter);
        assert!(app.overlays().is_empty());
        let selected = controller.store().selected_row().expect("cursor placed");
        assert_eq!(names(&controller)[selected], "README.md");
        Ok(())
    }

    #[test]
    fn report_needs_a_selection_and_a_confirmation() -> Result<()> {
        let (_dir, mut app, mut controller) = browser(&["notes.txt"])?;
        press(&mut app, &mut controller, KeyCode::Char('x'));
        assert_eq!(app.status(), Some("select an entry first"));

        cursor_on(&mut controller, "notes.txt");
        press(&mut app, &mut controller, KeyCode::Char('x'));
        assert_eq!(app.overlays().top_title(), Some("Report"));
        press(&mut app, &mut controller, KeyCode::Char('y'));
        let status = app.status().unwrap_or_default();
        assert!(status.starts_with("notes.txt: file, 9 B"), "got {status}");
        Ok(())
    }

    #[test]
    fn scan_reports_through_progress_and_status() -> Result<()> {
        let (_dir, mut app, mut controller) = browser(&["a/b.txt", "c.txt"])?;
        press(&mut app, &mut controller, KeyCode::Char('p'));

        let deadline = Instant::now() + Duration::from_secs(5);
        while !app
            .status()
            .is_some_and(|status| status.starts_with("scanned"))
        {
            assert!(Instant::now() < deadline, "scan never finished");
            thread::sleep(Duration::from_millis(10));
            process_ui_events(&mut app, &mut controller);
        }
        assert!(app.overlays().is_empty());
        assert_eq!(app.status(), Some("scanned 2 entries, 12 B"));
        Ok(())
    }
}
