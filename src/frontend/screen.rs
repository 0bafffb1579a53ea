use std::time::Duration;

use anyhow::Context;
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use super::keymap::key_to_num;
use crate::display::{FrameBuffer, HEIGHT, WIDTH};

const ON_COLOUR: u32 = from_rgb(0, 127, 255);
const OFF_COLOUR: u32 = from_rgb(0, 0, 0);

const fn from_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

fn scale_for(factor: u32) -> Scale {
    match factor {
        0 | 1 => Scale::X1,
        2 => Scale::X2,
        3 | 4 => Scale::X4,
        5..=8 => Scale::X8,
        9..=16 => Scale::X16,
        _ => Scale::X32,
    }
}

/// Expand the 1-bit screen into 0RGB pixels for minifb.
pub fn rasterize(fb: &FrameBuffer, pixel_buffer: &mut [u32]) {
    for (dst, &on) in pixel_buffer.iter_mut().zip(fb.pixels()) {
        *dst = if on { ON_COLOUR } else { OFF_COLOUR };
    }
}

pub struct Screen {
    window: Window,
    pixel_buffer: Vec<u32>,
}

impl Screen {
    pub fn new(scale: u32, fps: u32) -> anyhow::Result<Self> {
        let mut window = Window::new(
            "emuchip - ESC to exit",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale: scale_for(scale),
                ..WindowOptions::default()
            },
        )
        .context("opening window")?;
        if fps > 0 {
            window.limit_update_rate(Some(Duration::from_secs_f64(1.0 / fps as f64)));
        }
        Ok(Self {
            window,
            pixel_buffer: vec![OFF_COLOUR; WIDTH * HEIGHT],
        })
    }

    pub fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// Pad key transitions since the last frame, as (key, pressed).
    pub fn key_events(&self) -> Vec<(u8, bool)> {
        let pressed = self
            .window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(key_to_num)
            .map(|k| (k, true));
        let released = self
            .window
            .get_keys_released()
            .into_iter()
            .filter_map(key_to_num)
            .map(|k| (k, false));
        pressed.chain(released).collect()
    }

    pub fn sync(&mut self, fb: &FrameBuffer) -> anyhow::Result<()> {
        rasterize(fb, &mut self.pixel_buffer);
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
            .context("presenting frame")
    }
}
