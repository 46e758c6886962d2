pub mod camera;
pub mod config;
pub mod dashboard;
pub mod format;
pub mod interaction;
pub mod snapshot;
pub mod surface;
pub mod timeline;
pub mod tooltip;
pub mod zones;

pub use camera::*;
pub use config::*;
pub use dashboard::*;
pub use interaction::*;
pub use surface::*;
