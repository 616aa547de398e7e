use std::collections::HashMap;

use crossterm::event::{KeyCode, ModifierKeyCode};

/// Logical key action, decoupled from the raw terminal key code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyToken {
    /// Always lowercase
    Letter(char),
    Space,
    Back,
    Enter,
    Shift,
    Left,
    Right,
    Quit,
}

impl KeyToken {
    /// Whether the key-down acknowledges with a click and counts toward WPM.
    /// Arrows and SHIFT stay silent; QUIT ends the loop before anything else.
    pub fn is_counted(&self) -> bool {
        !matches!(
            self,
            KeyToken::Left | KeyToken::Right | KeyToken::Shift | KeyToken::Quit
        )
    }

    /// Label drawn on the key cap
    pub fn label(&self) -> String {
        match self {
            KeyToken::Letter(c) => c.to_ascii_uppercase().to_string(),
            KeyToken::Space => "Space".to_string(),
            KeyToken::Back => "Back".to_string(),
            KeyToken::Enter => "Enter".to_string(),
            KeyToken::Shift => "Shift".to_string(),
            KeyToken::Left => "Left".to_string(),
            KeyToken::Right => "Right".to_string(),
            KeyToken::Quit => "Esc".to_string(),
        }
    }
}

/// Lookup table from raw key codes to tokens, built once at start-up
#[derive(Debug, Clone)]
pub struct KeyMap {
    table: HashMap<KeyCode, KeyToken>,
}

impl KeyMap {
    /// The single supported layout: US QWERTY letters plus the editing keys.
    pub fn qwerty() -> Self {
        let mut table = HashMap::new();

        for c in 'a'..='z' {
            table.insert(KeyCode::Char(c), KeyToken::Letter(c));
            // shifted letters arrive uppercase; there is no case concept here
            table.insert(KeyCode::Char(c.to_ascii_uppercase()), KeyToken::Letter(c));
        }

        table.insert(KeyCode::Char(' '), KeyToken::Space);
        table.insert(KeyCode::Backspace, KeyToken::Back);
        table.insert(KeyCode::Enter, KeyToken::Enter);
        table.insert(
            KeyCode::Modifier(ModifierKeyCode::LeftShift),
            KeyToken::Shift,
        );
        table.insert(
            KeyCode::Modifier(ModifierKeyCode::RightShift),
            KeyToken::Shift,
        );
        table.insert(KeyCode::Left, KeyToken::Left);
        table.insert(KeyCode::Right, KeyToken::Right);
        table.insert(KeyCode::Esc, KeyToken::Quit);

        Self { table }
    }

    pub fn map(&self, code: KeyCode) -> Option<KeyToken> {
        self.table.get(&code).copied()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::qwerty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_map_to_lowercase_tokens() {
        let keymap = KeyMap::qwerty();
        assert_eq!(keymap.map(KeyCode::Char('q')), Some(KeyToken::Letter('q')));
        assert_eq!(keymap.map(KeyCode::Char('Q')), Some(KeyToken::Letter('q')));
        assert_eq!(keymap.map(KeyCode::Char('m')), Some(KeyToken::Letter('m')));
    }

    #[test]
    fn test_editing_keys() {
        let keymap = KeyMap::qwerty();
        assert_eq!(keymap.map(KeyCode::Char(' ')), Some(KeyToken::Space));
        assert_eq!(keymap.map(KeyCode::Backspace), Some(KeyToken::Back));
        assert_eq!(keymap.map(KeyCode::Enter), Some(KeyToken::Enter));
        assert_eq!(keymap.map(KeyCode::Left), Some(KeyToken::Left));
        assert_eq!(keymap.map(KeyCode::Right), Some(KeyToken::Right));
        assert_eq!(keymap.map(KeyCode::Esc), Some(KeyToken::Quit));
    }

    #[test]
    fn test_both_shift_keys_map_to_shift() {
        let keymap = KeyMap::qwerty();
        assert_eq!(
            keymap.map(KeyCode::Modifier(ModifierKeyCode::LeftShift)),
            Some(KeyToken::Shift)
        );
        assert_eq!(
            keymap.map(KeyCode::Modifier(ModifierKeyCode::RightShift)),
            Some(KeyToken::Shift)
        );
    }

    #[test]
    fn test_unmapped_codes_are_ignored() {
        let keymap = KeyMap::qwerty();
        assert_eq!(keymap.map(KeyCode::Char('1')), None);
        assert_eq!(keymap.map(KeyCode::Char(';')), None);
        assert_eq!(keymap.map(KeyCode::Up), None);
        assert_eq!(keymap.map(KeyCode::Tab), None);
        assert_eq!(keymap.map(KeyCode::F(1)), None);
    }

    #[test]
    fn test_table_size() {
        // 26 letters in two cases, space, backspace, enter, two shifts, two arrows, esc
        assert_eq!(KeyMap::qwerty().table.len(), 26 * 2 + 8);
    }

    #[test]
    fn test_counted_tokens() {
        assert!(KeyToken::Letter('a').is_counted());
        assert!(KeyToken::Space.is_counted());
        assert!(KeyToken::Back.is_counted());
        assert!(KeyToken::Enter.is_counted());
        assert!(!KeyToken::Shift.is_counted());
        assert!(!KeyToken::Left.is_counted());
        assert!(!KeyToken::Right.is_counted());
        assert!(!KeyToken::Quit.is_counted());
    }

    #[test]
    fn test_labels() {
        assert_eq!(KeyToken::Letter('k').label(), "K");
        assert_eq!(KeyToken::Space.label(), "Space");
        assert_eq!(KeyToken::Back.label(), "Back");
        assert_eq!(KeyToken::Enter.label(), "Enter");
    }
}
