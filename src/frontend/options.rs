use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, DEFAULT_CYCLES_PER_STEP};

#[derive(Parser, Debug)]
#[command(name = "emuchip", version, about = "Run a CHIP-8 program in a window")]
pub struct Options {
    /// Program image, loaded raw at 0x200
    #[arg(value_name = "ROM")]
    pub rom: PathBuf,

    /// Window magnification (1, 2, 4, 8, 16 or 32)
    #[arg(long, default_value_t = 16)]
    pub scale: u32,

    /// Instructions executed per frame
    #[arg(long, default_value_t = DEFAULT_CYCLES_PER_STEP)]
    pub cycles_per_step: u32,

    /// Frame rate cap for the window
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Beeper pitch in Hz
    #[arg(long, default_value_t = 440.0)]
    pub tone_hz: f32,

    /// Never open an audio stream
    #[arg(long, default_value_t = false)]
    pub mute: bool,
}

impl Options {
    pub fn config(&self) -> Config {
        Config::default().with_cycles_per_step(self.cycles_per_step)
    }
}
