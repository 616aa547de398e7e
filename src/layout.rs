//! Static geometry of the frame: title row, key caps, WPM counter and the
//! text strip. Units are terminal cells.

use ratatui::layout::Rect;

use crate::keymap::KeyToken;

pub const KEY_WIDTH: u16 = 5;
pub const WIDE_KEY_WIDTH: u16 = 7;
pub const KEY_HEIGHT: u16 = 3;
pub const KEY_SPACING: u16 = 1;
pub const KEY_STEP: u16 = KEY_WIDTH + KEY_SPACING;
/// Six keys and the five gaps between them
pub const SPACE_WIDTH: u16 = KEY_WIDTH * 6 + KEY_SPACING * 5;
pub const WPM_COUNTER_WIDTH: u16 = 9;
pub const CLOSE_BUTTON_WIDTH: u16 = 3;
/// Rows above the first key row (title plus a gap)
pub const KEYBOARD_TOP: u16 = 2;
pub const TEXT_STRIP_HEIGHT: u16 = 3;

pub const LETTER_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// Widest row: the bottom letters, ENTER and the WPM counter
pub const KEYBOARD_WIDTH: u16 =
    2 * KEY_STEP / 2 + 7 * KEY_STEP + WIDE_KEY_WIDTH + KEY_SPACING + WPM_COUNTER_WIDTH;
pub const KEYBOARD_HEIGHT: u16 = 4 * KEY_HEIGHT;

pub const MIN_WIDTH: u16 = KEYBOARD_WIDTH;
pub const MIN_HEIGHT: u16 = KEYBOARD_TOP + KEYBOARD_HEIGHT + 1 + TEXT_STRIP_HEIGHT;

/// Rectangles for one frame size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardLayout {
    pub area: Rect,
    pub title: Rect,
    pub close_button: Rect,
    pub keys: Vec<(KeyToken, Rect)>,
    pub wpm_counter: Rect,
    pub text_strip: Rect,
}

impl KeyboardLayout {
    pub fn compute(area: Rect) -> Self {
        let origin_x = area.x + area.width.saturating_sub(KEYBOARD_WIDTH) / 2;
        let top = area.y.saturating_add(KEYBOARD_TOP);
        let clip = |rect: Rect| rect.intersection(area);

        let mut keys = Vec::with_capacity(visible_tokens().len());

        for (i, letters) in LETTER_ROWS.iter().enumerate() {
            let row = i as u16;
            // each row is indented by half a key more than the one above
            let row_x = origin_x + row * KEY_STEP / 2;
            let y = top + row * KEY_HEIGHT;

            for (j, c) in letters.chars().enumerate() {
                let x = row_x + j as u16 * KEY_STEP;
                keys.push((
                    KeyToken::Letter(c),
                    clip(Rect::new(x, y, KEY_WIDTH, KEY_HEIGHT)),
                ));
            }

            let trailing_x = row_x + letters.len() as u16 * KEY_STEP;
            match i {
                1 => keys.push((
                    KeyToken::Back,
                    clip(Rect::new(trailing_x, y, WIDE_KEY_WIDTH, KEY_HEIGHT)),
                )),
                2 => keys.push((
                    KeyToken::Enter,
                    clip(Rect::new(trailing_x, y, WIDE_KEY_WIDTH, KEY_HEIGHT)),
                )),
                _ => {}
            }
        }

        let space_x = origin_x + (KEYBOARD_WIDTH - SPACE_WIDTH) / 2;
        keys.push((
            KeyToken::Space,
            clip(Rect::new(space_x, top + 3 * KEY_HEIGHT, SPACE_WIDTH, KEY_HEIGHT)),
        ));

        // right of ENTER on the bottom letter row
        let wpm_counter = clip(Rect::new(
            origin_x + KEYBOARD_WIDTH - WPM_COUNTER_WIDTH,
            top + 2 * KEY_HEIGHT,
            WPM_COUNTER_WIDTH,
            KEY_HEIGHT,
        ));

        let close_button = clip(Rect::new(
            area.right().saturating_sub(CLOSE_BUTTON_WIDTH + 1),
            area.y,
            CLOSE_BUTTON_WIDTH,
            1,
        ));

        let text_strip = clip(Rect::new(
            area.x,
            area.bottom().saturating_sub(TEXT_STRIP_HEIGHT),
            area.width,
            TEXT_STRIP_HEIGHT,
        ));

        Self {
            area,
            title: clip(Rect::new(area.x, area.y, area.width, 1)),
            close_button,
            keys,
            wpm_counter,
            text_strip,
        }
    }

    pub fn key_rect(&self, token: KeyToken) -> Option<Rect> {
        self.keys
            .iter()
            .find(|(t, _)| *t == token)
            .map(|(_, rect)| *rect)
    }

    /// Inside of the text strip border; its width is the scroll viewport
    pub fn text_viewport(&self) -> Rect {
        let strip = self.text_strip;
        Rect::new(
            strip.x.saturating_add(1),
            strip.y.saturating_add(1),
            strip.width.saturating_sub(2),
            strip.height.saturating_sub(2),
        )
    }
}

/// Whether `area` has room for the whole keyboard and the text strip
pub fn fits(area: Rect) -> bool {
    area.width >= MIN_WIDTH && area.height >= MIN_HEIGHT
}

/// Keys drawn on screen, in row order
pub fn visible_tokens() -> Vec<KeyToken> {
    let mut tokens: Vec<KeyToken> = Vec::new();
    for (i, letters) in LETTER_ROWS.iter().enumerate() {
        tokens.extend(letters.chars().map(KeyToken::Letter));
        match i {
            1 => tokens.push(KeyToken::Back),
            2 => tokens.push(KeyToken::Enter),
            _ => {}
        }
    }
    tokens.push(KeyToken::Space);
    tokens
}

pub fn hit(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.right() && row >= rect.y && row < rect.bottom()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_layout() -> KeyboardLayout {
        KeyboardLayout::compute(Rect::new(0, 0, 80, 24))
    }

    #[test]
    fn test_visible_key_count() {
        // 26 letters plus BACK, ENTER and SPACE
        assert_eq!(visible_tokens().len(), 29);
        assert_eq!(full_layout().keys.len(), 29);
    }

    #[test]
    fn test_keyboard_dimensions() {
        assert_eq!(KEYBOARD_WIDTH, 65);
        assert_eq!(MIN_HEIGHT, 18);
    }

    #[test]
    fn test_keys_do_not_overlap() {
        let layout = full_layout();
        let mut rects: Vec<Rect> = layout.keys.iter().map(|(_, r)| *r).collect();
        rects.push(layout.wpm_counter);

        for (i, a) in rects.iter().enumerate() {
            for b in rects.iter().skip(i + 1) {
                assert!(!a.intersects(*b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_keys_inside_frame_and_above_text_strip() {
        let layout = full_layout();
        for (token, rect) in &layout.keys {
            assert!(!rect.is_empty(), "{token:?} clipped away");
            assert!(rect.bottom() <= layout.text_strip.y, "{token:?} hits the text strip");
            assert!(rect.right() <= layout.area.right());
        }
    }

    #[test]
    fn test_rows_are_staggered() {
        let layout = full_layout();
        let q = layout.key_rect(KeyToken::Letter('q')).unwrap();
        let a = layout.key_rect(KeyToken::Letter('a')).unwrap();
        let z = layout.key_rect(KeyToken::Letter('z')).unwrap();
        assert_eq!(a.x - q.x, KEY_STEP / 2);
        assert_eq!(z.x - q.x, KEY_STEP);
        assert_eq!(a.y - q.y, KEY_HEIGHT);
    }

    #[test]
    fn test_wide_keys_and_wpm_counter_position() {
        let layout = full_layout();
        let back = layout.key_rect(KeyToken::Back).unwrap();
        let enter = layout.key_rect(KeyToken::Enter).unwrap();
        assert_eq!(back.width, WIDE_KEY_WIDTH);
        assert_eq!(enter.width, WIDE_KEY_WIDTH);

        assert_eq!(layout.wpm_counter.y, enter.y);
        assert!(layout.wpm_counter.x > enter.right());
    }

    #[test]
    fn test_space_bar_is_centred() {
        let layout = full_layout();
        let space = layout.key_rect(KeyToken::Space).unwrap();
        assert_eq!(space.width, SPACE_WIDTH);
        let q = layout.key_rect(KeyToken::Letter('q')).unwrap();
        let left_gap = space.x - q.x;
        let right_gap = (q.x + KEYBOARD_WIDTH) - space.right();
        assert_eq!(left_gap, right_gap);
    }

    #[test]
    fn test_close_button_hit() {
        let layout = full_layout();
        let close = layout.close_button;
        assert_eq!(close.y, 0);
        assert!(hit(close, close.x, 0));
        assert!(hit(close, close.x + 2, 0));
        assert!(!hit(close, close.x + 3, 0));
        assert!(!hit(close, close.x, 1));
    }

    #[test]
    fn test_text_viewport() {
        let layout = full_layout();
        let viewport = layout.text_viewport();
        assert_eq!(viewport.width, 78);
        assert_eq!(viewport.height, 1);
        assert_eq!(viewport.y, 22);
    }

    #[test]
    fn test_small_frame_is_clipped() {
        let area = Rect::new(0, 0, 20, 6);
        let layout = KeyboardLayout::compute(area);
        assert!(!fits(area));
        // keys outside the frame collapse to empty rects
        for (_, rect) in layout.keys.iter().filter(|(_, r)| !r.is_empty()) {
            assert!(rect.right() <= area.right());
            assert!(rect.bottom() <= area.bottom());
        }
    }

    #[test]
    fn test_fits_at_minimum_size() {
        assert!(fits(Rect::new(0, 0, MIN_WIDTH, MIN_HEIGHT)));
        assert!(!fits(Rect::new(0, 0, MIN_WIDTH - 1, MIN_HEIGHT)));
        assert!(!fits(Rect::new(0, 0, MIN_WIDTH, MIN_HEIGHT - 1)));
    }

    #[test]
    fn test_offset_area() {
        let area = Rect::new(10, 5, 80, 24);
        let layout = KeyboardLayout::compute(area);
        assert!(fits(area));
        assert_eq!(layout.title.y, 5);
        assert_eq!(layout.text_strip.bottom(), area.bottom());
    }
}
