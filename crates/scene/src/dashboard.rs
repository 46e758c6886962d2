//! The viewer's single owned application state.
//!
//! Every hour change, from the slider or from playback, goes through
//! [`Dashboard::set_hour`], which rebuilds the hour snapshot and pushes label,
//! ranking and layer to the surface in one step.

use formats::{ForecastDocument, ZoneCollection};
use layers::choropleth::ChoroplethLayer;
use runtime::{IntervalTimer, Playback, PlaybackState, next_index};
use tracing::debug;

use crate::camera::ViewState;
use crate::config::ViewerConfig;
use crate::format::round_trips;
use crate::interaction::{HoverEvent, MapInteraction};
use crate::snapshot::HourSnapshot;
use crate::surface::{DashboardSurface, ZoneLine};
use crate::timeline::{Timeline, format_hour_label};
use crate::tooltip::{TooltipContent, TooltipState, place_tooltip};
use crate::zones::ZoneDirectory;

/// Label shown when the forecast has no hours at all.
pub const NO_HOURS_LABEL: &str = "No forecast hours";

#[derive(Debug)]
pub struct Dashboard<T: IntervalTimer> {
    config: ViewerConfig,
    zones: ZoneDirectory,
    forecast: ForecastDocument,
    timeline: Timeline,
    snapshot: HourSnapshot,
    playback: Playback<T>,
}

impl<T: IntervalTimer> Dashboard<T> {
    pub fn new(
        zones: &ZoneCollection,
        forecast: ForecastDocument,
        config: ViewerConfig,
        timer: T,
    ) -> Self {
        let timeline = Timeline::from_rows(&forecast.predictions);
        let snapshot = HourSnapshot::project(&forecast.predictions, &timeline, 0);
        let playback = Playback::new(timer, config.playback_interval());
        Self {
            config,
            zones: ZoneDirectory::from_collection(zones),
            forecast,
            timeline,
            snapshot,
            playback,
        }
    }

    /// First paint: slider range, hour 0, stopped playback.
    pub fn start(&mut self, surface: &mut impl DashboardSurface) {
        surface.configure_timeline(self.timeline.len());
        self.set_hour(0, surface);
        surface.show_playback(self.playback.state());
    }

    /// Selects hour `index` and refreshes everything derived from it.
    ///
    /// Callers pass indices in `0..hours`; anything larger is clamped to the
    /// last hour.
    pub fn set_hour(&mut self, index: usize, surface: &mut impl DashboardSurface) {
        debug_assert!(
            self.timeline.is_empty() || index < self.timeline.len(),
            "hour index {index} out of range"
        );
        let index = self.timeline.clamp_index(index);
        self.snapshot = HourSnapshot::project(&self.forecast.predictions, &self.timeline, index);
        let layer = self.layer();
        debug!(
            index,
            hour = self.snapshot.hour(),
            rows = self.snapshot.rows().len(),
            features = layer.feature_count(),
            "hour selected"
        );

        surface.show_hour(index, &self.hour_label());
        surface.show_top_zones(&self.top_zone_lines());
        surface.render_layer(&layer);
    }

    /// Manual slider movement: playback stops before the hour changes.
    /// Indices come from the page, so anything past the end lands on the
    /// last hour.
    pub fn scrub(&mut self, index: usize, surface: &mut impl DashboardSurface) {
        if self.playback.stop() {
            surface.show_playback(PlaybackState::Stopped);
        }
        let index = self.timeline.clamp_index(index);
        self.set_hour(index, surface);
    }

    /// Slider input as delivered by the form control. Returns `false` and
    /// changes nothing when the value is not an index.
    pub fn scrub_input(&mut self, raw: &str, surface: &mut impl DashboardSurface) -> bool {
        match raw.trim().parse::<usize>() {
            Ok(index) => {
                self.scrub(index, surface);
                true
            }
            Err(_) => false,
        }
    }

    pub fn play(&mut self, surface: &mut impl DashboardSurface) {
        self.playback.play();
        surface.show_playback(PlaybackState::Playing);
    }

    pub fn pause(&mut self, surface: &mut impl DashboardSurface) {
        self.playback.stop();
        surface.show_playback(PlaybackState::Stopped);
    }

    pub fn toggle_playback(&mut self, surface: &mut impl DashboardSurface) -> PlaybackState {
        let state = self.playback.toggle();
        surface.show_playback(state);
        state
    }

    /// One playback step; ignored unless playing.
    pub fn tick(&mut self, surface: &mut impl DashboardSurface) {
        if !self.playback.is_playing() {
            return;
        }
        let next = next_index(self.snapshot.index(), self.timeline.len());
        self.set_hour(next, surface);
    }

    pub fn hour_label(&self) -> String {
        self.snapshot
            .hour()
            .map(format_hour_label)
            .unwrap_or_else(|| NO_HOURS_LABEL.to_string())
    }

    pub fn top_zone_lines(&self) -> Vec<ZoneLine> {
        self.snapshot
            .top_rows(self.config.top_zone_count)
            .into_iter()
            .map(|row| ZoneLine {
                zone_id: row.zone_id,
                name: self.zones.name(row.zone_id),
                trips: round_trips(row.prediction),
            })
            .collect()
    }

    pub fn layer(&self) -> ChoroplethLayer {
        ChoroplethLayer::build(
            self.zones.feature_ids(),
            |zone| zone.map_or(0.0, |id| self.snapshot.prediction(id)),
            self.snapshot.index(),
            self.config.transition_ms,
        )
    }

    /// Tooltip text for a hovered feature; `None` for features without an id.
    pub fn tooltip_content(&self, feature: usize) -> Option<TooltipContent> {
        let (zone_id, title) = self.zones.feature_label(feature)?;
        Some(TooltipContent::new(
            title,
            zone_id,
            self.snapshot.prediction(zone_id),
        ))
    }

    pub fn initial_view(&self, mobile: bool) -> ViewState {
        self.config.initial_view(mobile)
    }

    pub fn selected_index(&self) -> usize {
        self.snapshot.index()
    }

    pub fn snapshot(&self) -> &HourSnapshot {
        &self.snapshot
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn zones(&self) -> &ZoneDirectory {
        &self.zones
    }

    pub fn forecast(&self) -> &ForecastDocument {
        &self.forecast
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn playback(&self) -> &Playback<T> {
        &self.playback
    }
}

impl<T: IntervalTimer> MapInteraction for Dashboard<T> {
    fn on_hover(&self, event: &HoverEvent) -> TooltipState {
        let Some(content) = event.feature.and_then(|f| self.tooltip_content(f)) else {
            return TooltipState::Hidden;
        };
        let (left, top) = place_tooltip(
            event.x,
            event.y,
            event.map_size,
            event.tooltip_size,
            self.config.tooltip_padding_px,
        );
        TooltipState::Visible { content, left, top }
    }

    fn on_view_change(&self, candidate: ViewState) -> ViewState {
        self.config.view_limits.clamp(candidate)
    }
}
