use std::fs;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use log::{info, warn};

use emuchip::frontend::{Options, Screen, Sound};
use emuchip::Emulator;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Options::parse();

    let rom = fs::read(&opts.rom).with_context(|| format!("reading {}", opts.rom.display()))?;
    let mut emu = Emulator::with_config(opts.config());
    emu.load(&rom)
        .with_context(|| format!("loading {}", opts.rom.display()))?;
    info!("running {} ({} bytes)", opts.rom.display(), rom.len());

    let mut screen = Screen::new(opts.scale, opts.fps)?;
    let sound = if opts.mute {
        None
    } else {
        match Sound::new(opts.tone_hz) {
            Ok(sound) => Some(sound),
            Err(err) => {
                warn!("audio disabled: {err:#}");
                None
            }
        }
    };

    let mut last_frame = Instant::now();
    while screen.is_running() {
        for (key, pressed) in screen.key_events() {
            emu.set_key(key as usize, pressed);
        }

        let now = Instant::now();
        let delta_ms = now.duration_since(last_frame).as_secs_f64() * 1_000.0;
        last_frame = now;
        emu.step(delta_ms);

        if let Some(sound) = &sound {
            sound.set_active(emu.is_sound_active());
        }
        screen.sync(emu.framebuffer())?;
    }
    Ok(())
}
