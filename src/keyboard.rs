use ratatui::layout::Rect;

use crate::keymap::KeyToken;
use crate::layout::{visible_tokens, KeyboardLayout};

/// One key cap on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCap {
    pub token: KeyToken,
    pub label: String,
    pub rect: Rect,
    pub pressed: bool,
    pressed_at_ms: Option<u64>,
}

impl KeyCap {
    fn new(token: KeyToken) -> Self {
        Self {
            token,
            label: token.label(),
            rect: Rect::default(),
            pressed: false,
            pressed_at_ms: None,
        }
    }
}

/// Pressed state for every visible key.
///
/// When the terminal does not report key releases, `auto_release_ms` lets a
/// highlighted key fade after a fixed hold time instead.
#[derive(Debug, Clone)]
pub struct Keyboard {
    caps: Vec<KeyCap>,
    auto_release_ms: Option<u64>,
}

impl Keyboard {
    pub fn new(auto_release_ms: Option<u64>) -> Self {
        Self {
            caps: visible_tokens().into_iter().map(KeyCap::new).collect(),
            auto_release_ms,
        }
    }

    pub fn set_auto_release(&mut self, auto_release_ms: Option<u64>) {
        self.auto_release_ms = auto_release_ms;
    }

    pub fn auto_release_ms(&self) -> Option<u64> {
        self.auto_release_ms
    }

    /// Copy the cap rectangles out of a freshly computed layout.
    pub fn relayout(&mut self, layout: &KeyboardLayout) {
        for cap in &mut self.caps {
            cap.rect = layout.key_rect(cap.token).unwrap_or_default();
        }
    }

    /// Returns false for tokens without a cap (arrows, SHIFT, QUIT).
    pub fn press(&mut self, token: KeyToken, now_ms: u64) -> bool {
        match self.cap_mut(token) {
            Some(cap) => {
                cap.pressed = true;
                cap.pressed_at_ms = Some(now_ms);
                true
            }
            None => false,
        }
    }

    pub fn release(&mut self, token: KeyToken) -> bool {
        match self.cap_mut(token) {
            Some(cap) => {
                cap.pressed = false;
                cap.pressed_at_ms = None;
                true
            }
            None => false,
        }
    }

    /// Release caps held longer than the auto-release time.
    pub fn release_stale(&mut self, now_ms: u64) {
        let Some(hold) = self.auto_release_ms else {
            return;
        };
        for cap in &mut self.caps {
            if let Some(at) = cap.pressed_at_ms {
                if now_ms.saturating_sub(at) >= hold {
                    cap.pressed = false;
                    cap.pressed_at_ms = None;
                }
            }
        }
    }

    pub fn is_pressed(&self, token: KeyToken) -> bool {
        self.get(token).is_some_and(|cap| cap.pressed)
    }

    pub fn get(&self, token: KeyToken) -> Option<&KeyCap> {
        self.caps.iter().find(|cap| cap.token == token)
    }

    pub fn caps(&self) -> &[KeyCap] {
        &self.caps
    }

    fn cap_mut(&mut self, token: KeyToken) -> Option<&mut KeyCap> {
        self.caps.iter_mut().find(|cap| cap.token == token)
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new(None)
    }
}
