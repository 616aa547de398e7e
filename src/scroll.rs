//! Horizontal scrolling of the text strip.
//!
//! Offsets are in layout units (terminal columns at runtime) and are never
//! positive: the text starts at `margin + offset` inside the viewport.

/// Fraction of the viewport past which the view follows the cursor
pub const FOLLOW_RATIO: f64 = 0.75;

/// Offset that keeps the cursor between the left margin and the follow mark.
///
/// `cursor_x` is the margin plus the width of the text before the cursor.
pub fn recompute(
    cursor_x: f64,
    viewport_width: f64,
    total_text_width: f64,
    current_offset: f64,
    margin: f64,
) -> f64 {
    let follow_mark = viewport_width * FOLLOW_RATIO;
    let on_screen = cursor_x + current_offset;

    let offset = if on_screen > follow_mark {
        follow_mark - cursor_x
    } else if on_screen < margin {
        margin - cursor_x
    } else {
        current_offset
    };

    clamp_offset(offset, viewport_width, total_text_width, margin)
}

/// Restrict `offset` so the view never scrolls past either end of the text.
/// At the far end the text stops one margin short of the right edge, which
/// keeps an end-of-text cursor on screen.
pub fn clamp_offset(offset: f64, viewport_width: f64, total_text_width: f64, margin: f64) -> f64 {
    let lowest = (-(total_text_width - (viewport_width - 2.0 * margin))).min(0.0);
    offset.clamp(lowest, 0.0)
}

/// Wheel scrolling: each notch moves the text by `step` towards the end
/// (negative notches) or the start (positive notches).
pub fn nudge(
    offset: f64,
    notches: i32,
    step: f64,
    viewport_width: f64,
    total_text_width: f64,
    margin: f64,
) -> f64 {
    clamp_offset(
        offset + f64::from(notches) * step,
        viewport_width,
        total_text_width,
        margin,
    )
}

/// Current scroll position of the text strip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollView {
    offset: f64,
    margin: f64,
    wheel_step: f64,
}

impl ScrollView {
    pub fn new(margin: f64, wheel_step: f64) -> Self {
        Self {
            offset: 0.0,
            margin,
            wheel_step,
        }
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Per-frame follow step
    pub fn follow(&mut self, cursor_x: f64, viewport_width: f64, total_text_width: f64) {
        self.offset = recompute(
            cursor_x,
            viewport_width,
            total_text_width,
            self.offset,
            self.margin,
        );
    }

    pub fn scroll(&mut self, notches: i32, viewport_width: f64, total_text_width: f64) {
        self.offset = nudge(
            self.offset,
            notches,
            self.wheel_step,
            viewport_width,
            total_text_width,
            self.margin,
        );
    }

    pub fn reset(&mut self) {
        self.offset = 0.0;
    }
}
