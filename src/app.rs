use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::config::Config;
use crate::cursor::CursorBlink;
use crate::keyboard::Keyboard;
use crate::keymap::{KeyMap, KeyToken};
use crate::layout::{self, KeyboardLayout};
use crate::runtime::AppEvent;
use crate::scroll::ScrollView;
use crate::sound::ClickSound;
use crate::text_buffer::TextBuffer;
use crate::wpm::{WpmCounter, WpmPhase};

/// All state of the running keyboard, owned by the main loop
pub struct App {
    pub buffer: TextBuffer,
    pub wpm: WpmCounter,
    pub keyboard: Keyboard,
    pub scroll: ScrollView,
    pub blink: CursorBlink,
    keymap: KeyMap,
    sound: Box<dyn ClickSound>,
    layout: KeyboardLayout,
    running: bool,
}

impl App {
    pub fn new(config: &Config, sound: Box<dyn ClickSound>, area: Rect, now_ms: u64) -> Self {
        let layout = KeyboardLayout::compute(area);
        let mut keyboard = Keyboard::new(Some(config.release_after_ms));
        keyboard.relayout(&layout);

        Self {
            buffer: TextBuffer::new(),
            wpm: WpmCounter::new(config.wpm_interval_ms, now_ms),
            keyboard,
            scroll: ScrollView::new(
                f64::from(config.scroll_margin),
                f64::from(config.wheel_step),
            ),
            blink: CursorBlink::new(config.cursor_blink, config.blink_period_frames),
            keymap: KeyMap::qwerty(),
            sound,
            layout,
            running: true,
        }
    }

    /// Single dispatch point for everything the terminal reports.
    pub fn handle_event(&mut self, event: &AppEvent, now_ms: u64) {
        match event {
            AppEvent::Key(key) => self.handle_key(key, now_ms),
            AppEvent::Mouse(mouse) => self.handle_mouse(mouse),
            AppEvent::Resize(width, height) => self.resize(Rect::new(0, 0, *width, *height)),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent, now_ms: u64) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }
        // other chords are shortcuts, not typing; releases still clear highlights
        if key.kind != KeyEventKind::Release
            && key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return;
        }

        let Some(token) = self.keymap.map(key.code) else {
            return;
        };

        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.key_down(token, now_ms),
            KeyEventKind::Release => self.key_up(token),
        }
    }

    pub fn key_down(&mut self, token: KeyToken, now_ms: u64) {
        if token == KeyToken::Quit {
            self.quit();
            return;
        }

        if token.is_counted() {
            self.sound.play();
            self.wpm.record_press();
        }

        self.buffer.apply(token);
        if token == KeyToken::Shift {
            self.scroll.reset();
        }
        self.blink.reset();
        self.keyboard.press(token, now_ms);
    }

    pub fn key_up(&mut self, token: KeyToken) {
        self.keyboard.release(token);
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_wheel(1),
            MouseEventKind::ScrollDown => self.scroll_wheel(-1),
            MouseEventKind::Down(MouseButton::Left) => self.click(mouse.column, mouse.row),
            _ => {}
        }
    }

    /// Positive notches move back toward the start of the text.
    pub fn scroll_wheel(&mut self, notches: i32) {
        let viewport = self.viewport_width();
        let total = self.text_width();
        self.scroll.scroll(notches, viewport, total);
    }

    pub fn click(&mut self, column: u16, row: u16) {
        if layout::hit(self.layout.close_button, column, row) {
            tracing::info!("close button clicked");
            self.quit();
        }
    }

    pub fn resize(&mut self, area: Rect) {
        self.layout = KeyboardLayout::compute(area);
        self.keyboard.relayout(&self.layout);
    }

    /// Per-frame bookkeeping after the frame's events have been applied.
    pub fn on_frame(&mut self, now_ms: u64) {
        if let WpmPhase::Reporting(estimate) = self.wpm.tick(now_ms) {
            tracing::debug!(estimate, "wpm window closed");
        }
        self.keyboard.release_stale(now_ms);
        self.blink.advance();

        let cursor_x = self.cursor_x();
        let viewport = self.viewport_width();
        let total = self.text_width();
        self.scroll.follow(cursor_x, viewport, total);
    }

    /// Cursor position inside the text viewport before scrolling
    pub fn cursor_x(&self) -> f64 {
        self.scroll.margin() + self.buffer.width_before_cursor() as f64
    }

    pub fn text_width(&self) -> f64 {
        self.buffer.display_width() as f64
    }

    pub fn viewport_width(&self) -> f64 {
        f64::from(self.layout.text_viewport().width)
    }

    pub fn layout(&self) -> &KeyboardLayout {
        &self.layout
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn quit(&mut self) {
        self.running = false;
    }
}
