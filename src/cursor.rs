/// Frames between visibility flips when blinking is on
pub const DEFAULT_BLINK_PERIOD_FRAMES: u32 = 30;

/// Text cursor visibility. A disabled blink keeps the cursor always shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorBlink {
    enabled: bool,
    period_frames: u32,
    frames: u32,
    visible: bool,
}

impl CursorBlink {
    pub fn new(enabled: bool, period_frames: u32) -> Self {
        Self {
            enabled,
            period_frames: period_frames.max(1),
            frames: 0,
            visible: true,
        }
    }

    /// Call once per drawn frame.
    pub fn advance(&mut self) {
        if !self.enabled {
            return;
        }
        self.frames += 1;
        if self.frames >= self.period_frames {
            self.visible = !self.visible;
            self.frames = 0;
        }
    }

    /// Show the cursor immediately, e.g. after an edit.
    pub fn reset(&mut self) {
        self.frames = 0;
        self.visible = true;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl Default for CursorBlink {
    fn default() -> Self {
        Self::new(false, DEFAULT_BLINK_PERIOD_FRAMES)
    }
}
