pub const TIMER_HZ: u32 = 60;
pub const TIMER_INTERVAL_MS: f64 = 1_000.0 / TIMER_HZ as f64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    pub count: u8,
}

impl Timer {
    pub fn new(init_count: u8) -> Self {
        Self { count: init_count }
    }

    pub fn set(&mut self, value: u8) {
        self.count = value;
    }

    pub fn get(&self) -> u8 {
        self.count
    }

    pub fn tick(&mut self) {
        self.count = self.count.saturating_sub(1);
    }
}

/// Delay and sound timers, decremented at 60 Hz of wall-clock time no matter
/// how many instructions run in between.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerClock {
    pub delay: Timer,
    pub sound: Timer,
    accumulator_ms: f64,
}

impl TimerClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Feed `delta_ms` of elapsed time and return how many 60 Hz ticks it
    /// completed. Negative or non-finite deltas count as no time at all.
    pub fn advance(&mut self, delta_ms: f64) -> u32 {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.accumulator_ms += delta_ms;
        }
        let intervals = (self.accumulator_ms / TIMER_INTERVAL_MS).floor();
        self.accumulator_ms %= TIMER_INTERVAL_MS;
        // both timers are at zero after 255 ticks, the rest is only counted
        let applied = intervals.min(u8::MAX as f64) as u8;
        for _ in 0..applied {
            self.delay.tick();
            self.sound.tick();
        }
        intervals as u32
    }

    pub fn pending_ms(&self) -> f64 {
        self.accumulator_ms
    }
}
