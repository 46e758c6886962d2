pub mod choropleth;
pub mod layer;
pub mod symbology;

pub use layer::*;
