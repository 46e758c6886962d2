pub mod forecast;
pub mod loader;
pub mod zones;

pub use forecast::*;
pub use loader::*;
pub use zones::*;
