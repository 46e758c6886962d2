use foundation::ZoneId;
use serde::Serialize;

use crate::layer::LayerId;
use crate::symbology::{Rgba, ZONE_OUTLINE, color_for, elevation_for};

pub const ZONES_LAYER_ID: LayerId = LayerId("zones-layer");

/// Keys the renderer compares to decide whether per-feature accessors changed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTriggers {
    pub get_fill_color: [usize; 1],
    pub get_elevation: [usize; 1],
}

/// Animation durations (milliseconds) for accessor changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transitions {
    pub get_fill_color: u32,
    pub get_elevation: u32,
}

/// Declarative description of the extruded zone layer.
///
/// `fill_colors` and `elevations` are indexed by feature position in the
/// zone collection, so the renderer's accessors are plain array lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoroplethLayer {
    pub id: LayerId,
    pub pickable: bool,
    pub stroked: bool,
    pub filled: bool,
    pub extruded: bool,
    pub wireframe: bool,
    pub line_width_min_pixels: f64,
    pub line_color: Rgba,
    pub fill_colors: Vec<Rgba>,
    pub elevations: Vec<f64>,
    pub update_triggers: UpdateTriggers,
    pub transitions: Transitions,
}

impl ChoroplethLayer {
    /// Builds the layer for one hour.
    ///
    /// `value_for` resolves a feature's zone to its predicted value; features
    /// without an id are passed `None`. `change_key` must change whenever the
    /// values do (the selected hour index).
    pub fn build<I, F>(features: I, value_for: F, change_key: usize, transition_ms: u32) -> Self
    where
        I: IntoIterator<Item = Option<ZoneId>>,
        F: Fn(Option<ZoneId>) -> f64,
    {
        let (fill_colors, elevations): (Vec<Rgba>, Vec<f64>) = features
            .into_iter()
            .map(|zone| {
                let v = value_for(zone);
                (color_for(v), elevation_for(v))
            })
            .unzip();

        Self {
            id: ZONES_LAYER_ID,
            pickable: true,
            stroked: true,
            filled: true,
            extruded: true,
            wireframe: false,
            line_width_min_pixels: ZONE_OUTLINE.width_min_px,
            line_color: ZONE_OUTLINE.color,
            fill_colors,
            elevations,
            update_triggers: UpdateTriggers {
                get_fill_color: [change_key],
                get_elevation: [change_key],
            },
            transitions: Transitions {
                get_fill_color: transition_ms,
                get_elevation: transition_ms,
            },
        }
    }

    pub fn feature_count(&self) -> usize {
        self.fill_colors.len()
    }
}
