use foundation::{GeoBounds, Span};
use serde::{Deserialize, Serialize};

/// Camera as the renderer sees it. Angles are degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl ViewState {
    pub const fn new(longitude: f64, latitude: f64, zoom: f64, pitch: f64, bearing: f64) -> Self {
        Self {
            longitude,
            latitude,
            zoom,
            pitch,
            bearing,
        }
    }
}

/// Region the camera may never leave.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewLimits {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

pub const VIEW_LIMITS: ViewLimits = ViewLimits {
    min_lon: -74.8,
    max_lon: -73.2,
    min_lat: 40.2,
    max_lat: 41.1,
    min_zoom: 8.2,
    max_zoom: 13.8,
};

pub const DESKTOP_VIEW: ViewState = ViewState::new(-73.95, 40.73, 10.0, 45.0, 0.0);
pub const MOBILE_VIEW: ViewState = ViewState::new(-73.95, 40.73, 9.6, 35.0, 0.0);

impl ViewLimits {
    pub fn bounds(&self) -> GeoBounds {
        GeoBounds::new(self.min_lon, self.max_lon, self.min_lat, self.max_lat)
    }

    pub fn zoom(&self) -> Span {
        Span::new(self.min_zoom, self.max_zoom)
    }

    /// Pins longitude, latitude and zoom; pitch and bearing pass through.
    pub fn clamp(&self, view: ViewState) -> ViewState {
        let (longitude, latitude) = self.bounds().clamp_lon_lat(view.longitude, view.latitude);
        ViewState {
            longitude,
            latitude,
            zoom: self.zoom().clamp(view.zoom),
            ..view
        }
    }

    pub fn contains(&self, view: &ViewState) -> bool {
        self.bounds().contains(view.longitude, view.latitude)
            && (self.min_zoom..=self.max_zoom).contains(&view.zoom)
    }
}

impl Default for ViewLimits {
    fn default() -> Self {
        VIEW_LIMITS
    }
}

pub fn clamp_view_state(view: ViewState) -> ViewState {
    VIEW_LIMITS.clamp(view)
}
