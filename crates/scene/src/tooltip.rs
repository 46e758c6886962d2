use foundation::ZoneId;

use crate::format::round_trips;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub title: String,
    pub zone_id: ZoneId,
    pub predicted_trips: i64,
}

impl TooltipContent {
    pub fn new(title: String, zone_id: ZoneId, prediction: f64) -> Self {
        Self {
            title,
            zone_id,
            predicted_trips: round_trips(prediction),
        }
    }

    pub fn rows(&self) -> [String; 2] {
        [
            format!("TLC Zone: {}", self.zone_id),
            format!("Predicted trips: {}", self.predicted_trips),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TooltipState {
    Hidden,
    Visible {
        content: TooltipContent,
        left: f64,
        top: f64,
    },
}

/// Top-left corner for a tooltip next to the pointer.
///
/// The box sits `pad` px below-right of the pointer and is pushed back
/// inside the map near the right/bottom edges; the left/top edge wins when
/// the map is smaller than the box.
pub fn place_tooltip(x: f64, y: f64, map: Size, tip: Size, pad: f64) -> (f64, f64) {
    let left = (x + pad).min(map.width - tip.width - pad).max(pad);
    let top = (y + pad).min(map.height - tip.height - pad).max(pad);
    (left, top)
}

#[cfg(test)]
mod tests {
    use super::{Size, TooltipContent, place_tooltip};
    use foundation::ZoneId;
    use pretty_assertions::assert_eq;

    const MAP: Size = Size::new(800.0, 600.0);
    const TIP: Size = Size::new(200.0, 80.0);

    #[test]
    fn offsets_from_pointer_in_open_space() {
        assert_eq!(place_tooltip(100.0, 100.0, MAP, TIP, 12.0), (112.0, 112.0));
    }

    #[test]
    fn flips_inside_near_right_and_bottom_edges() {
        assert_eq!(place_tooltip(790.0, 590.0, MAP, TIP, 12.0), (588.0, 508.0));
    }

    #[test]
    fn never_leaves_top_left_padding() {
        let tiny = Size::new(100.0, 50.0);
        assert_eq!(place_tooltip(50.0, 20.0, tiny, TIP, 12.0), (12.0, 12.0));
    }

    #[test]
    fn content_rounds_prediction() {
        let c = TooltipContent::new("JFK Airport".to_string(), ZoneId(132), 410.5);
        assert_eq!(
            c.rows(),
            ["TLC Zone: 132".to_string(), "Predicted trips: 411".to_string()]
        );
    }
}
