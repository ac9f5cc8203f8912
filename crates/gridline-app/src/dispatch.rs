// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{
    BACK_KEY, HELP_KEY, KeyBindingTable, KeyStroke, KeySymbol, NavigationStack, REFRESH_KEY,
};

pub const HALF_PAGE_ROWS: isize = 10;
pub const FULL_PAGE_ROWS: isize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableCommand {
    MoveRow(isize),
    JumpFirstRow,
    JumpLastRow,
    Confirm,
    ClearSelection,
}

/// Where a keypress goes. Evaluated in order: navigation intercept,
/// built-ins, custom bindings, table navigation, then fall-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRoute {
    NavigateBack,
    Refresh,
    OfferHelp,
    Custom(KeySymbol),
    Table(TableCommand),
    Forward,
}

pub fn resolve_key(
    stroke: KeyStroke,
    navigation: &NavigationStack,
    bindings: &KeyBindingTable,
) -> KeyRoute {
    if stroke.is_plain() {
        match stroke.symbol {
            BACK_KEY if !navigation.is_at_root() => return KeyRoute::NavigateBack,
            // Root ESC belongs to the enclosing context.
            BACK_KEY => return KeyRoute::Forward,
            REFRESH_KEY => return KeyRoute::Refresh,
            HELP_KEY => return KeyRoute::OfferHelp,
            symbol if bindings.contains(symbol) => return KeyRoute::Custom(symbol),
            _ => {}
        }
    }

    match table_command_for_stroke(stroke) {
        Some(command) => KeyRoute::Table(command),
        None => KeyRoute::Forward,
    }
}

pub fn table_command_for_stroke(stroke: KeyStroke) -> Option<TableCommand> {
    if stroke.control {
        return match stroke.symbol {
            KeySymbol::Char('d') => Some(TableCommand::MoveRow(HALF_PAGE_ROWS)),
            KeySymbol::Char('u') => Some(TableCommand::MoveRow(-HALF_PAGE_ROWS)),
            KeySymbol::Char('n') => Some(TableCommand::MoveRow(1)),
            KeySymbol::Char('p') => Some(TableCommand::MoveRow(-1)),
            _ => None,
        };
    }
    if stroke.alt {
        return None;
    }

    match stroke.symbol {
        KeySymbol::Char('j') | KeySymbol::Down => Some(TableCommand::MoveRow(1)),
        KeySymbol::Char('k') | KeySymbol::Up => Some(TableCommand::MoveRow(-1)),
        KeySymbol::PageDown => Some(TableCommand::MoveRow(FULL_PAGE_ROWS)),
        KeySymbol::PageUp => Some(TableCommand::MoveRow(-FULL_PAGE_ROWS)),
        KeySymbol::Char('g') | KeySymbol::Home => Some(TableCommand::JumpFirstRow),
        KeySymbol::Char('G') | KeySymbol::End => Some(TableCommand::JumpLastRow),
        KeySymbol::Enter => Some(TableCommand::Confirm),
        KeySymbol::Char('c') => Some(TableCommand::ClearSelection),
        _ => None,
    }
}
