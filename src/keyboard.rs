use log::warn;

pub const KEY_COUNT: usize = 16;

/// Up/down state of the sixteen hex keys, fed by host key events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Self {
            keys: [false; KEY_COUNT],
        }
    }

    pub fn reset(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    /// Indices past 0xF are dropped with a warning.
    pub fn set(&mut self, index: usize, pressed: bool) {
        match self.keys.get_mut(index) {
            Some(key) => *key = pressed,
            None => warn!("ignoring event for key index {index}, the pad has {KEY_COUNT} keys"),
        }
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    /// Lowest-numbered key currently held.
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&down| down).map(|k| k as u8)
    }
}
