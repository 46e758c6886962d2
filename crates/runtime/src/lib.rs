pub mod playback;
pub mod timer;

pub use playback::*;
pub use timer::*;
