use unicode_width::UnicodeWidthChar;

use crate::keymap::KeyToken;

/// Drawn in place of a line break; the text strip is a single row
pub const NEWLINE_GLYPH: char = '↵';

/// The typed text plus an insertion cursor.
///
/// Every operation clamps instead of failing, so `cursor <= len()` holds
/// after any sequence of calls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    content: Vec<char>,
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn delete_backward(&mut self) {
        if self.cursor > 0 {
            self.content.remove(self.cursor - 1);
            self.cursor -= 1;
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.content.len());
    }

    pub fn clear_all(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Applies the edit bound to `token`. SHIFT clears the whole buffer;
    /// QUIT leaves it untouched.
    pub fn apply(&mut self, token: KeyToken) {
        match token {
            KeyToken::Letter(c) => self.insert_char(c.to_ascii_lowercase()),
            KeyToken::Space => self.insert_char(' '),
            KeyToken::Enter => self.insert_newline(),
            KeyToken::Back => self.delete_backward(),
            KeyToken::Left => self.move_left(),
            KeyToken::Right => self.move_right(),
            KeyToken::Shift => self.clear_all(),
            KeyToken::Quit => {}
        }
    }

    pub fn content(&self) -> String {
        self.content.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn before_cursor(&self) -> String {
        self.content[..self.cursor].iter().collect()
    }

    pub(crate) fn chars(&self) -> &[char] {
        &self.content
    }

    /// Rendered form of the content, with line breaks made visible
    pub fn display(&self) -> String {
        self.content.iter().map(|&c| display_char(c)).collect()
    }

    /// Columns occupied by the whole rendered content
    pub fn display_width(&self) -> usize {
        columns(&self.content)
    }

    /// Columns occupied by the rendered content left of the cursor
    pub fn width_before_cursor(&self) -> usize {
        columns(&self.content[..self.cursor])
    }
}

pub fn display_char(c: char) -> char {
    if c == '\n' {
        NEWLINE_GLYPH
    } else {
        c
    }
}

fn columns(chars: &[char]) -> usize {
    chars
        .iter()
        .map(|&c| display_char(c).width().unwrap_or(0))
        .sum()
}
