// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::app::App;
use crate::controller::TableController;
use crate::log_panel::LogPanel;
use gridline_app::{
    BREADCRUMB_SEPARATOR, Highlight, KeyBindingTable, NavigationStack, TableStore,
};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use tracing::Level;

const LOG_PANEL_HEIGHT: u16 = 6;

const NAVIGATION_HELP: [(&str, &str); 6] = [
    ("j/k", "Move"),
    ("g/G", "First/last"),
    ("PgUp/PgDn", "Page"),
    ("ctrl+u/d", "Half page"),
    ("enter", "Select"),
    ("c", "Clear selection"),
];

pub fn render(frame: &mut Frame<'_>, app: &App, controller: &mut TableController) {
    let help = help_rows(controller.bindings(), controller.help_expanded());
    let help_height = if controller.help_expanded() {
        u16::try_from(help.len()).unwrap_or(u16::MAX).saturating_add(2)
    } else {
        1
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(help_height),
            Constraint::Length(LOG_PANEL_HEIGHT),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let header = Paragraph::new(breadcrumb_line(controller.navigation())).block(
        Block::default()
            .title(controller.title().to_owned())
            .borders(Borders::ALL),
    );
    frame.render_widget(header, layout[0]);

    render_table(frame, layout[1], controller);
    render_help(frame, layout[2], help, controller.help_expanded());
    render_log(frame, layout[3], controller.log_panel());

    let status = Paragraph::new(app.status().unwrap_or_default().to_owned())
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(status, layout[4]);

    app.overlays().render(frame);
}

/// Breadcrumb trail with the active view emphasized.
pub(crate) fn breadcrumb_line(navigation: &NavigationStack) -> Line<'_> {
    let mut spans = Vec::new();
    for (index, crumb) in navigation.breadcrumbs().into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(
                BREADCRUMB_SEPARATOR,
                Style::default().fg(Color::DarkGray),
            ));
        }
        let style = if crumb.active {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(crumb.name, style));
    }
    Line::from(spans)
}

/// Compact help is a single row of `key desc` pairs; expanded help lists one
/// binding per row followed by the table navigation keys.
pub(crate) fn help_rows(bindings: &KeyBindingTable, expanded: bool) -> Vec<String> {
    if !expanded {
        let pairs = bindings
            .iter()
            .map(|binding| format!("{} {}", binding.key.label(), binding.description))
            .collect::<Vec<_>>();
        return vec![pairs.join("  ")];
    }

    let width = bindings
        .iter()
        .map(|binding| binding.key.label().chars().count())
        .chain(NAVIGATION_HELP.iter().map(|(key, _)| key.chars().count()))
        .max()
        .unwrap_or(0);
    bindings
        .iter()
        .map(|binding| (binding.key.label(), binding.description.clone()))
        .chain(
            NAVIGATION_HELP
                .iter()
                .map(|(key, description)| ((*key).to_owned(), (*description).to_owned())),
        )
        .map(|(key, description)| format!("{key:<width$}  {description}"))
        .collect()
}

fn render_table(frame: &mut Frame<'_>, area: Rect, controller: &mut TableController) {
    let table = table_widget(controller.store());
    let selected = controller.store().selected_row();
    controller.viewport.select(selected);
    frame.render_stateful_widget(table, area, &mut controller.viewport);
}

fn table_widget(store: &TableStore) -> Table<'static> {
    let widths = vec![Constraint::Min(8); store.column_count().max(1)];
    let header = Row::new(store.headers().iter().map(|label| {
        Cell::from(label.clone()).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let selection = store.selection();
    let rows = (0..store.row_count())
        .map(|index| {
            let cells = store
                .display_row(index)
                .unwrap_or_default()
                .into_iter()
                .map(|cell| Cell::from(cell.to_owned()))
                .collect::<Vec<_>>();
            let style = match selection.highlight_for(index) {
                Highlight::Confirmed => Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
                Highlight::Cursor => Style::default().bg(Color::DarkGray),
                Highlight::None => Style::default(),
            };
            Row::new(cells).style(style)
        })
        .collect::<Vec<_>>();

    let title = match store.selected_row() {
        Some(row) => format!("{} of {}", row + 1, store.row_count()),
        None => format!("{} rows", store.row_count()),
    };
    Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL))
}

fn render_help(frame: &mut Frame<'_>, area: Rect, rows: Vec<String>, expanded: bool) {
    let lines = rows.into_iter().map(Line::from).collect::<Vec<_>>();
    let mut help = Paragraph::new(lines).style(Style::default().fg(Color::Gray));
    if expanded {
        help = help.block(Block::default().title("keys").borders(Borders::ALL));
    }
    frame.render_widget(help, area);
}

fn render_log(frame: &mut Frame<'_>, area: Rect, log: &LogPanel) {
    let visible = usize::from(area.height.saturating_sub(2));
    let lines = log
        .recent(visible)
        .map(|entry| Line::from(Span::styled(entry.line(), level_style(entry.level))))
        .collect::<Vec<_>>();
    let panel = Paragraph::new(lines).block(Block::default().title("log").borders(Borders::ALL));
    frame.render_widget(panel, area);
}

fn level_style(level: Level) -> Style {
    let color = if level == Level::ERROR {
        Color::Red
    } else if level == Level::WARN {
        Color::Yellow
    } else if level == Level::INFO {
        Color::White
    } else {
        Color::DarkGray
    };
    Style::default().fg(color)
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let percent_x = percent_x.min(100);
    let percent_y = percent_y.min(100);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
