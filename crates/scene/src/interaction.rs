use crate::camera::ViewState;
use crate::tooltip::{Size, TooltipState};

/// Pointer hover reported by the renderer.
///
/// `feature` is the picked feature's index in the zone collection, `None`
/// when the pointer is over empty map. `tooltip_size` is the measured size
/// of the tooltip box once its content is written.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HoverEvent {
    pub feature: Option<usize>,
    pub x: f64,
    pub y: f64,
    pub map_size: Size,
    pub tooltip_size: Size,
}

/// Decisions the renderer delegates back to the application.
pub trait MapInteraction {
    fn on_hover(&self, event: &HoverEvent) -> TooltipState;
    fn on_view_change(&self, candidate: ViewState) -> ViewState;
}
