use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::camera::{DESKTOP_VIEW, MOBILE_VIEW, VIEW_LIMITS, ViewLimits, ViewState};

pub const ZONES_URL: &str = "./data/taxi_zones.geojson";
pub const FORECAST_URLS: [&str; 2] = [
    "./data/forecast_latest.json",
    "/data/forecast/forecast_latest.json",
];

/// Viewer settings. Every field has a default, so a host override may name
/// any subset, down to single fields of the nested camera settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub zones_url: String,
    /// Tried in order; the first successful response wins.
    pub forecast_urls: Vec<String>,
    pub playback_interval_ms: u64,
    pub transition_ms: u32,
    pub top_zone_count: usize,
    pub tooltip_padding_px: f64,
    pub mobile_breakpoint_px: u32,
    pub view_limits: ViewLimits,
    pub max_pitch: f64,
    pub desktop_view: ViewState,
    pub mobile_view: ViewState,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zones_url: ZONES_URL.to_string(),
            forecast_urls: FORECAST_URLS.iter().map(|s| s.to_string()).collect(),
            playback_interval_ms: 420,
            transition_ms: 450,
            top_zone_count: 5,
            tooltip_padding_px: 12.0,
            mobile_breakpoint_px: 900,
            view_limits: VIEW_LIMITS,
            max_pitch: 60.0,
            desktop_view: DESKTOP_VIEW,
            mobile_view: MOBILE_VIEW,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidJson(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidJson(reason) => write!(f, "invalid viewer config: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ViewerConfig {
    /// Applies a JSON override on top of the defaults. Objects merge key by
    /// key; lists and scalars replace the default outright.
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let invalid = |e: serde_json::Error| ConfigError::InvalidJson(e.to_string());
        let patch: Value = serde_json::from_str(payload).map_err(invalid)?;
        let mut merged = serde_json::to_value(Self::default()).map_err(invalid)?;
        merge_json(&mut merged, patch);
        serde_json::from_value(merged).map_err(invalid)
    }

    pub fn playback_interval(&self) -> Duration {
        Duration::from_millis(self.playback_interval_ms)
    }

    pub fn mobile_media_query(&self) -> String {
        format!("(max-width: {}px)", self.mobile_breakpoint_px)
    }

    /// Framing used at startup and on every resize, already clamped.
    pub fn initial_view(&self, mobile: bool) -> ViewState {
        let view = if mobile {
            self.mobile_view
        } else {
            self.desktop_view
        };
        self.view_limits.clamp(view)
    }
}

fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerConfig;
    use crate::camera::{DESKTOP_VIEW, MOBILE_VIEW, VIEW_LIMITS, ViewLimits, ViewState};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn defaults_are_stable() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.zones_url, "./data/taxi_zones.geojson");
        assert_eq!(
            cfg.forecast_urls,
            vec![
                "./data/forecast_latest.json".to_string(),
                "/data/forecast/forecast_latest.json".to_string(),
            ]
        );
        assert_eq!(cfg.playback_interval(), Duration::from_millis(420));
        assert_eq!(cfg.transition_ms, 450);
        assert_eq!(cfg.top_zone_count, 5);
        assert_eq!(cfg.mobile_media_query(), "(max-width: 900px)");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let cfg = ViewerConfig::from_json_str(
            r#"{"forecast_urls": ["/forecast.json"], "playback_interval_ms": 1000}"#,
        )
        .unwrap();
        assert_eq!(cfg.forecast_urls, vec!["/forecast.json".to_string()]);
        assert_eq!(cfg.playback_interval_ms, 1000);
        assert_eq!(cfg.transition_ms, 450);
        assert_eq!(cfg.view_limits, ViewerConfig::default().view_limits);
    }

    #[test]
    fn initial_view_depends_on_breakpoint() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.initial_view(false), DESKTOP_VIEW);
        assert_eq!(cfg.initial_view(true), MOBILE_VIEW);
    }

    #[test]
    fn initial_view_is_clamped() {
        let mut cfg = ViewerConfig::default();
        cfg.desktop_view.zoom = 3.0;
        assert_eq!(cfg.initial_view(false).zoom, 8.2);
    }

    #[test]
    fn nested_limit_override_keeps_other_limits() {
        let cfg = ViewerConfig::from_json_str(r#"{"view_limits": {"min_zoom": 9.0}}"#).unwrap();
        assert_eq!(
            cfg.view_limits,
            ViewLimits {
                min_zoom: 9.0,
                ..VIEW_LIMITS
            }
        );
    }

    #[test]
    fn nested_view_override_keeps_that_views_defaults() {
        let cfg = ViewerConfig::from_json_str(
            r#"{"desktop_view": {"zoom": 11.0}, "mobile_view": {"bearing": 20.0}}"#,
        )
        .unwrap();
        assert_eq!(
            cfg.desktop_view,
            ViewState {
                zoom: 11.0,
                ..DESKTOP_VIEW
            }
        );
        assert_eq!(
            cfg.mobile_view,
            ViewState {
                bearing: 20.0,
                ..MOBILE_VIEW
            }
        );
    }

    #[test]
    fn rejects_malformed_override() {
        assert!(ViewerConfig::from_json_str("{").is_err());
        assert!(ViewerConfig::from_json_str(r#"{"top_zone_count": "five"}"#).is_err());
        assert!(ViewerConfig::from_json_str(r#"{"view_limits": {"min_zoom": null}}"#).is_err());
    }
}
