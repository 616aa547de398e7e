/// Length of one measurement window
pub const DEFAULT_INTERVAL_MS: u64 = 1000;

/// Five letters plus the separating space
pub const CHARS_PER_WORD: f64 = 6.0;

/// Words per minute for `presses` keypresses over `elapsed_ms`.
pub fn calculate_wpm(presses: u32, elapsed_ms: u64) -> u32 {
    if elapsed_ms == 0 {
        return 0;
    }
    let minutes = elapsed_ms as f64 / 60_000.0;
    let words = f64::from(presses) / CHARS_PER_WORD;
    (words / minutes).round() as u32
}

/// Outcome of a frame tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WpmPhase {
    /// Still inside the current window
    Accumulating,
    /// A window just closed and produced this estimate
    Reporting(u32),
}

/// Windowed keypress counter.
///
/// The displayed estimate is the rate of the last closed window, so it
/// lags live typing by up to one interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WpmCounter {
    presses: u32,
    window_start_ms: u64,
    estimate: u32,
    interval_ms: u64,
}

impl WpmCounter {
    pub fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            presses: 0,
            window_start_ms: now_ms,
            estimate: 0,
            interval_ms,
        }
    }

    pub fn record_press(&mut self) {
        self.presses = self.presses.saturating_add(1);
    }

    pub fn tick(&mut self, now_ms: u64) -> WpmPhase {
        let elapsed = now_ms.saturating_sub(self.window_start_ms);
        if elapsed <= self.interval_ms {
            return WpmPhase::Accumulating;
        }

        self.estimate = calculate_wpm(self.presses, elapsed);
        self.presses = 0;
        self.window_start_ms = now_ms;
        WpmPhase::Reporting(self.estimate)
    }

    pub fn estimate(&self) -> u32 {
        self.estimate
    }

    pub fn presses(&self) -> u32 {
        self.presses
    }
}
