// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gridline_app::{KeyStroke, KeySymbol};

/// Translates a terminal key event. Shift is folded into the character;
/// keys the binding table cannot name return `None`.
pub fn key_stroke(key: KeyEvent) -> Option<KeyStroke> {
    let symbol = match key.code {
        KeyCode::Char(ch) => KeySymbol::Char(ch),
        KeyCode::Esc => KeySymbol::Esc,
        KeyCode::Enter => KeySymbol::Enter,
        KeyCode::Tab => KeySymbol::Tab,
        KeyCode::BackTab => KeySymbol::BackTab,
        KeyCode::Backspace => KeySymbol::Backspace,
        KeyCode::Delete => KeySymbol::Delete,
        KeyCode::Insert => KeySymbol::Insert,
        KeyCode::Up => KeySymbol::Up,
        KeyCode::Down => KeySymbol::Down,
        KeyCode::Left => KeySymbol::Left,
        KeyCode::Right => KeySymbol::Right,
        KeyCode::Home => KeySymbol::Home,
        KeyCode::End => KeySymbol::End,
        KeyCode::PageUp => KeySymbol::PageUp,
        KeyCode::PageDown => KeySymbol::PageDown,
        KeyCode::F(number) => KeySymbol::F(number),
        _ => return None,
    };

    Some(KeyStroke {
        symbol,
        control: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
    })
}

pub(crate) fn is_ctrl(key: KeyEvent, ch: char) -> bool {
    key.code == KeyCode::Char(ch) && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub(crate) fn is_plain_char(key: KeyEvent) -> Option<char> {
    match (key.code, key.modifiers) {
        (KeyCode::Char(ch), modifiers)
            if modifiers.is_empty() || modifiers == KeyModifiers::SHIFT =>
        {
            Some(ch)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_ctrl, is_plain_char, key_stroke};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use gridline_app::{KeyStroke, KeySymbol};

    #[test]
    fn shifted_characters_stay_plain() {
        let stroke = key_stroke(KeyEvent::new(KeyCode::Char('C'), KeyModifiers::SHIFT));
        assert_eq!(stroke, Some(KeyStroke::plain(KeySymbol::Char('C'))));
    }

    #[test]
    fn control_chords_set_the_control_flag() {
        let stroke = key_stroke(KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL));
        assert_eq!(stroke, Some(KeyStroke::ctrl('d')));
        assert!(is_ctrl(
            KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL),
            'u'
        ));
    }

    #[test]
    fn unnamed_keys_are_dropped() {
        assert_eq!(
            key_stroke(KeyEvent::new(KeyCode::CapsLock, KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn plain_char_rejects_modified_keys() {
        assert_eq!(
            is_plain_char(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some('a')
        );
        assert_eq!(
            is_plain_char(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::ALT)),
            None
        );
    }
}
