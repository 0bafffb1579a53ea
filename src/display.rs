pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// The 64x32 monochrome screen. Pixels stay lit until cleared or XORed off.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bit_buffer: Box<[bool; WIDTH * HEIGHT]>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.bit_buffer.chunks(WIDTH) {
            let line: String = row.iter().map(|&on| if on { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: Box::new([false; WIDTH * HEIGHT]),
        }
    }

    pub fn clear(&mut self) {
        self.bit_buffer.fill(false);
    }

    /// XOR `sprite` onto the screen with its top-left corner at (x, y).
    /// Each byte is one row, most significant bit leftmost. Coordinates wrap
    /// around both edges. Returns true when a lit pixel was switched off.
    pub fn draw(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (i, &row) in sprite.iter().enumerate() {
            for j in 0..8 {
                let bit = (row >> (7 - j)) & 1 == 1;
                if !bit {
                    continue;
                }
                let nx = (x as usize + j) % WIDTH;
                let ny = (y as usize + i) % HEIGHT;
                let index = ny * WIDTH + nx;
                if self.bit_buffer[index] {
                    collision = true;
                }
                self.bit_buffer[index] ^= true;
            }
        }
        collision
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[(y % HEIGHT) * WIDTH + (x % WIDTH)]
    }

    /// Row-major pixels.
    pub fn pixels(&self) -> &[bool] {
        &self.bit_buffer[..]
    }

    pub fn snapshot(&self) -> Vec<bool> {
        self.bit_buffer.to_vec()
    }

    pub fn lit_pixels(&self) -> usize {
        self.bit_buffer.iter().filter(|&&on| on).count()
    }

    pub fn width(&self) -> usize {
        WIDTH
    }

    pub fn height(&self) -> usize {
        HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_sets_pixels_msb_first() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.draw(0, 0, &[0b1000_0001]));
        assert!(fb.pixel(0, 0));
        assert!(!fb.pixel(1, 0));
        assert!(fb.pixel(7, 0));
        assert_eq!(fb.lit_pixels(), 2);
    }

    #[test]
    fn draw_wraps_instead_of_clipping() {
        let mut fb = FrameBuffer::new();
        fb.draw(62, 31, &[0xF0, 0xF0]);
        assert!(fb.pixel(62, 31));
        assert!(fb.pixel(63, 31));
        assert!(fb.pixel(0, 31));
        assert!(fb.pixel(1, 31));
        assert!(fb.pixel(62, 0));
        assert!(fb.pixel(1, 0));
        assert_eq!(fb.lit_pixels(), 8);
    }

    #[test]
    fn collision_reported_when_pixel_turns_off() {
        let mut fb = FrameBuffer::new();
        fb.draw(10, 10, &[0x80]);
        assert!(fb.draw(10, 10, &[0xC0]));
        assert!(!fb.pixel(10, 10));
        assert!(fb.pixel(11, 10));
    }

    #[test]
    fn clear_blanks_everything() {
        let mut fb = FrameBuffer::new();
        fb.draw(5, 5, &[0xFF; 15]);
        fb.clear();
        assert_eq!(fb.lit_pixels(), 0);
        assert_eq!(fb.snapshot().len(), WIDTH * HEIGHT);
    }
}
