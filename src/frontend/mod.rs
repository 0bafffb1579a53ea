//! Desktop host: window, keyboard and beeper around the interpreter core.

pub mod keymap;
pub mod options;
pub mod screen;
pub mod sound;

pub use options::Options;
pub use screen::Screen;
pub use sound::Sound;
