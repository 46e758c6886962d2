use std::fmt;

use foundation::ZoneId;
use layers::choropleth::ChoroplethLayer;
use runtime::PlaybackState;

use crate::format::group_thousands;

/// One entry of the ranked zone list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneLine {
    pub zone_id: ZoneId,
    pub name: String,
    pub trips: i64,
}

impl fmt::Display for ZoneLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} trips", self.name, group_thousands(self.trips))
    }
}

/// Output side of the dashboard. Implemented by the DOM in the browser and
/// by recorders in tests.
pub trait DashboardSurface {
    /// Called once before the first hour is shown.
    fn configure_timeline(&mut self, hour_count: usize);
    /// Slider position and hour label.
    fn show_hour(&mut self, index: usize, label: &str);
    fn show_top_zones(&mut self, lines: &[ZoneLine]);
    fn render_layer(&mut self, layer: &ChoroplethLayer);
    fn show_playback(&mut self, state: PlaybackState);
}
