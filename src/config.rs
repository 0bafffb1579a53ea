/// Instructions executed per `Emulator::step` call unless configured otherwise.
pub const DEFAULT_CYCLES_PER_STEP: u32 = 10;

/// Knobs for the interpreter core. Timer frequency is fixed at 60 Hz and
/// deliberately not part of this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub cycles_per_step: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cycles_per_step: DEFAULT_CYCLES_PER_STEP,
        }
    }
}

impl Config {
    pub fn with_cycles_per_step(mut self, cycles: u32) -> Self {
        self.cycles_per_step = cycles;
        self
    }
}
