//! Offline checks for the viewer's datasets.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use formats::{Datasets, FetchError, ForecastDocument, LoadError, Source, ZoneCollection};
use foundation::ZoneId;
use scene::format::round_trips;
use scene::snapshot::HourSnapshot;
use scene::timeline::{Timeline, format_hour_label};
use scene::zones::ZoneDirectory;
use scene::{ViewerConfig, ZoneLine};
use serde::Serialize;
use tracing::debug;

/// Resolves dataset locations against a directory, the way a static file
/// server would resolve them against its web root.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, location: &str) -> PathBuf {
        let rel = location.trim_start_matches("./").trim_start_matches('/');
        self.root.join(rel)
    }
}

impl Source for FileSource {
    async fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        let path = self.resolve(location);
        fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => FetchError::Transport(format!("{} not found", path.display())),
            _ => FetchError::Transport(format!("read {}: {e}", path.display())),
        })
    }
}

/// Runs the startup loader against a directory.
pub fn load_from_dir(
    root: &Path,
    zones_location: &str,
    forecast_locations: &[String],
) -> Result<Datasets, LoadError> {
    debug!(root = %root.display(), zones_location, ?forecast_locations, "loading datasets");
    let source = FileSource::new(root);
    pollster::block_on(formats::load_datasets(
        &source,
        zones_location,
        forecast_locations,
    ))
}

/// Same as [`load_from_dir`] with the viewer's default locations.
pub fn load_defaults(root: &Path) -> Result<Datasets, LoadError> {
    let cfg = ViewerConfig::default();
    load_from_dir(root, &cfg.zones_url, &cfg.forecast_urls)
}

pub fn read_forecast(path: &Path) -> Result<ForecastDocument, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    ForecastDocument::from_json_str(&text).map_err(|e| format!("{path:?}: {e}"))
}

pub fn read_zones(path: &Path) -> Result<ZoneCollection, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    ZoneCollection::from_geojson_str(&text).map_err(|e| format!("{path:?}: {e}"))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSummary {
    pub rows: usize,
    pub hours: usize,
    pub zones: usize,
    pub first_hour: Option<String>,
    pub last_hour: Option<String>,
    pub generated_at: Option<String>,
    pub timezone: Option<String>,
    pub horizon_hours: Option<u32>,
    pub model_path: Option<String>,
    pub weather_source: Option<String>,
    /// `(declared, actual)` when the declared row count disagrees.
    pub prediction_count_mismatch: Option<(u64, usize)>,
}

pub fn summarize(doc: &ForecastDocument) -> ForecastSummary {
    let timeline = Timeline::from_rows(&doc.predictions);
    let zones: BTreeSet<ZoneId> = doc.predictions.iter().map(|r| r.zone_id).collect();
    ForecastSummary {
        rows: doc.predictions.len(),
        hours: timeline.len(),
        zones: zones.len(),
        first_hour: timeline.hours().first().cloned(),
        last_hour: timeline.hours().last().cloned(),
        generated_at: doc.generated_at.clone(),
        timezone: doc.timezone.clone(),
        horizon_hours: doc.horizon_hours,
        model_path: doc.model_path.clone(),
        weather_source: doc.weather_source.clone(),
        prediction_count_mismatch: doc.prediction_count_mismatch(),
    }
}

impl fmt::Display for ForecastSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rows:   {}", self.rows)?;
        writeln!(f, "hours:  {}", self.hours)?;
        writeln!(f, "zones:  {}", self.zones)?;
        if let (Some(first), Some(last)) = (&self.first_hour, &self.last_hour) {
            writeln!(f, "range:  {first} .. {last}")?;
        }
        let meta = [
            ("generated_at", self.generated_at.clone()),
            ("timezone", self.timezone.clone()),
            ("horizon", self.horizon_hours.map(|h| format!("{h}h"))),
            ("model", self.model_path.clone()),
            ("weather", self.weather_source.clone()),
        ];
        for (key, value) in meta {
            if let Some(value) = value {
                writeln!(f, "{key}: {value}")?;
            }
        }
        if let Some((declared, actual)) = self.prediction_count_mismatch {
            writeln!(f, "warning: prediction_count says {declared}, file has {actual} rows")?;
        }
        Ok(())
    }
}

/// Ranked zones for one hour, as the viewer's sidebar shows them.
#[derive(Debug, Clone, PartialEq)]
pub struct HourRanking {
    pub label: String,
    pub lines: Vec<ZoneLine>,
}

pub fn rank_hour(
    doc: &ForecastDocument,
    zones: Option<&ZoneCollection>,
    hour: usize,
    limit: usize,
) -> Result<HourRanking, String> {
    let timeline = Timeline::from_rows(&doc.predictions);
    let Some(hour_key) = timeline.get(hour) else {
        return Err(format!(
            "hour {hour} out of range (forecast has {} hours)",
            timeline.len()
        ));
    };
    let directory = zones.map(ZoneDirectory::from_collection).unwrap_or_default();
    let snapshot = HourSnapshot::project(&doc.predictions, &timeline, hour);
    let lines = snapshot
        .top_rows(limit)
        .into_iter()
        .map(|row| ZoneLine {
            zone_id: row.zone_id,
            name: directory.name(row.zone_id),
            trips: round_trips(row.prediction),
        })
        .collect();
    Ok(HourRanking {
        label: format_hour_label(hour_key),
        lines,
    })
}

/// Cross-check of forecast zone ids against the zone dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Ids with forecast rows but no zone feature; these never render.
    pub missing_from_zones: Vec<ZoneId>,
    /// Zones that will always show zero demand.
    pub zones_without_forecast: Vec<ZoneId>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.missing_from_zones.is_empty()
    }
}

pub fn validate(doc: &ForecastDocument, zones: &ZoneCollection) -> ValidationReport {
    let known: BTreeSet<ZoneId> = zones.zone_ids().collect();
    let forecast: BTreeSet<ZoneId> = doc.predictions.iter().map(|r| r.zone_id).collect();
    ValidationReport {
        missing_from_zones: forecast.difference(&known).copied().collect(),
        zones_without_forecast: known.difference(&forecast).copied().collect(),
    }
}

pub fn join_ids(ids: &[ZoneId]) -> String {
    ids.iter().map(ZoneId::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::{FileSource, load_defaults, load_from_dir, rank_hour, summarize, validate};
    use formats::{ForecastDocument, ForecastRow, LoadError, ZoneCollection};
    use foundation::ZoneId;
    use pretty_assertions::assert_eq;
    use std::fs;

    const ZONES: &str = r#"{"type": "FeatureCollection", "features": [
        {"type": "Feature", "properties": {"LocationID": 1, "zone": "Newark Airport"}, "geometry": null},
        {"type": "Feature", "properties": {"LocationID": 2, "zone": "Jamaica Bay"}, "geometry": null},
        {"type": "Feature", "properties": {"LocationID": 4}, "geometry": null}
    ]}"#;

    const FORECAST: &str = r#"{
        "generated_at": "2024-01-01T00:00:00Z",
        "prediction_count": 4,
        "predictions": [
            {"PULocationID": 1, "hour": "2024-01-01T00:00", "prediction": 12.4},
            {"PULocationID": 2, "hour": "2024-01-01T00:00", "prediction": 1500.6},
            {"PULocationID": 3, "hour": "2024-01-01T01:00", "prediction": 7}
        ]
    }"#;

    fn zones() -> ZoneCollection {
        ZoneCollection::from_geojson_str(ZONES).unwrap()
    }

    fn forecast() -> ForecastDocument {
        ForecastDocument::from_json_str(FORECAST).unwrap()
    }

    #[test]
    fn summary_counts_rows_hours_and_zones() {
        let s = summarize(&forecast());
        assert_eq!((s.rows, s.hours, s.zones), (3, 2, 3));
        assert_eq!(s.first_hour.as_deref(), Some("2024-01-01T00:00"));
        assert_eq!(s.last_hour.as_deref(), Some("2024-01-01T01:00"));
        assert_eq!(s.prediction_count_mismatch, Some((4, 3)));
        assert!(s.to_string().contains("warning: prediction_count says 4"));
    }

    #[test]
    fn ranking_uses_zone_names_when_available() {
        let z = zones();
        let ranked = rank_hour(&forecast(), Some(&z), 0, 5).unwrap();
        assert_eq!(ranked.label, "Mon, Jan 1, 12:00 AM");
        let text: Vec<String> = ranked.lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(
            text,
            vec![
                "Jamaica Bay: 1,501 trips".to_string(),
                "Newark Airport: 12 trips".to_string(),
            ]
        );
    }

    #[test]
    fn ranking_without_zones_falls_back_to_ids() {
        let ranked = rank_hour(&forecast(), None, 1, 5).unwrap();
        assert_eq!(ranked.lines[0].name, "Zone 3");
    }

    #[test]
    fn ranking_rejects_unknown_hour() {
        assert!(rank_hour(&forecast(), None, 2, 5).is_err());
        assert!(rank_hour(&ForecastDocument::new(Vec::new()), None, 0, 5).is_err());
    }

    #[test]
    fn validation_reports_both_directions() {
        let report = validate(&forecast(), &zones());
        assert_eq!(report.missing_from_zones, vec![ZoneId(3)]);
        assert_eq!(report.zones_without_forecast, vec![ZoneId(4)]);
        assert!(!report.is_ok());

        let clean = ForecastDocument::new(vec![ForecastRow::new(1, "2024-01-01T00:00", 1.0)]);
        assert!(validate(&clean, &zones()).is_ok());
    }

    #[test]
    fn file_source_strips_web_prefixes() {
        let src = FileSource::new("/srv/www");
        assert_eq!(
            src.resolve("./data/taxi_zones.geojson"),
            std::path::PathBuf::from("/srv/www/data/taxi_zones.geojson")
        );
        assert_eq!(
            src.resolve("/data/forecast/forecast_latest.json"),
            std::path::PathBuf::from("/srv/www/data/forecast/forecast_latest.json")
        );
    }

    #[test]
    fn loader_falls_back_to_second_forecast_location() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data/forecast")).unwrap();
        fs::write(dir.path().join("data/taxi_zones.geojson"), ZONES).unwrap();
        fs::write(
            dir.path().join("data/forecast/forecast_latest.json"),
            FORECAST,
        )
        .unwrap();

        let loaded = load_defaults(dir.path()).unwrap();
        assert_eq!(loaded.forecast_location, "/data/forecast/forecast_latest.json");
        assert_eq!(loaded.forecast.predictions.len(), 3);
        assert_eq!(loaded.zones.len(), 3);
    }

    #[test]
    fn loader_fails_when_no_forecast_exists() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("data")).unwrap();
        fs::write(dir.path().join("data/taxi_zones.geojson"), ZONES).unwrap();

        let err = load_from_dir(
            dir.path(),
            "./data/taxi_zones.geojson",
            &["./data/forecast_latest.json".to_string()],
        )
        .unwrap_err();
        assert_eq!(
            err,
            LoadError::ForecastUnavailable {
                tried: vec!["./data/forecast_latest.json".to_string()],
            }
        );
    }
}
