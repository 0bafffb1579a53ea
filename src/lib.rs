// 16 8-bit data registers named V0 to VF
// I -> address register (12 bits used)
// 16 level call stack
//
// Delay timer & Sound timer: count down at 60 times / s until 0,
// the host beeps while the sound timer is non-zero
//
// Display res: 64 width, 32 height
//
// opcodes are 2 bytes (big-endian)
//      NNN: address
//      NN: 8-bit constant
//      N: 4-bit constant
//      X and Y: 4-bit register identifier
//
// The host calls `Emulator::step` once per frame: a fixed batch of
// instructions runs, then the timers catch up with wall-clock time.

pub mod config;
pub mod decode;
pub mod display;
pub mod emulator;
pub mod error;
pub mod keyboard;
pub mod memory;
pub mod registers;
pub mod timer;

#[cfg(feature = "frontend")]
pub mod frontend;

pub use config::Config;
pub use decode::OpCode;
pub use display::{FrameBuffer, HEIGHT, WIDTH};
pub use emulator::{Emulator, RunState};
pub use error::{Error, Result};
