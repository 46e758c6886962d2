//! Startup data loading.
//!
//! Both datasets are fetched concurrently through a [`Source`]. The forecast
//! is taken from the first candidate location that answers successfully;
//! anything else ends in a [`LoadError`].

use futures_util::future::join;
use tracing::{info, warn};

use crate::forecast::ForecastDocument;
use crate::zones::ZoneCollection;

/// Why a single location could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The location answered with a non-success status.
    Status(u16),
    /// Nothing usable came back (network failure, missing file, ...).
    Transport(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "HTTP status {code}"),
            FetchError::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Where dataset bytes come from: HTTP in the browser, files in the CLI.
#[allow(async_fn_in_trait)]
pub trait Source {
    async fn fetch_text(&self, location: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    ZonesUnavailable { location: String, reason: FetchError },
    ForecastUnavailable { tried: Vec<String> },
    Parse { location: String, reason: String },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::ZonesUnavailable { location, reason } => {
                write!(f, "could not load zones from {location}: {reason}")
            }
            LoadError::ForecastUnavailable { tried } => {
                write!(
                    f,
                    "could not load forecast file from known paths ({})",
                    tried.join(", ")
                )
            }
            LoadError::Parse { location, reason } => {
                write!(f, "failed to parse {location}: {reason}")
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Everything the viewer needs before its first render.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub zones: ZoneCollection,
    pub forecast: ForecastDocument,
    /// Candidate the forecast was actually read from.
    pub forecast_location: String,
}

/// Returns `(location, body)` for the first candidate that answers successfully.
pub async fn fetch_first_available<S: Source>(
    source: &S,
    locations: &[String],
) -> Result<(String, String), LoadError> {
    for location in locations {
        match source.fetch_text(location).await {
            Ok(body) => return Ok((location.clone(), body)),
            Err(err) => warn!(%location, %err, "forecast candidate unavailable, trying next"),
        }
    }
    Err(LoadError::ForecastUnavailable {
        tried: locations.to_vec(),
    })
}

pub async fn load_forecast<S: Source>(
    source: &S,
    locations: &[String],
) -> Result<(ForecastDocument, String), LoadError> {
    let (location, body) = fetch_first_available(source, locations).await?;
    let forecast = ForecastDocument::from_json_str(&body).map_err(|e| LoadError::Parse {
        location: location.clone(),
        reason: e.to_string(),
    })?;
    if let Some((declared, actual)) = forecast.prediction_count_mismatch() {
        warn!(%location, declared, actual, "forecast prediction_count disagrees with rows");
    }
    info!(%location, rows = forecast.predictions.len(), "forecast loaded");
    Ok((forecast, location))
}

pub async fn load_zones<S: Source>(source: &S, location: &str) -> Result<ZoneCollection, LoadError> {
    let body = source
        .fetch_text(location)
        .await
        .map_err(|reason| LoadError::ZonesUnavailable {
            location: location.to_string(),
            reason,
        })?;
    let zones = ZoneCollection::from_geojson_str(&body).map_err(|e| LoadError::Parse {
        location: location.to_string(),
        reason: e.to_string(),
    })?;
    info!(%location, features = zones.len(), "zones loaded");
    Ok(zones)
}

/// Loads zones and forecast concurrently; both must succeed.
pub async fn load_datasets<S: Source>(
    source: &S,
    zones_location: &str,
    forecast_locations: &[String],
) -> Result<Datasets, LoadError> {
    let (zones, forecast) = join(
        load_zones(source, zones_location),
        load_forecast(source, forecast_locations),
    )
    .await;
    let zones = zones?;
    let (forecast, forecast_location) = forecast?;
    Ok(Datasets {
        zones,
        forecast,
        forecast_location,
    })
}

#[cfg(test)]
mod tests {
    use super::{FetchError, LoadError, Source, load_datasets, load_forecast};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapSource {
        responses: HashMap<String, Result<String, FetchError>>,
        requested: RefCell<Vec<String>>,
    }

    impl MapSource {
        fn with(mut self, location: &str, response: Result<&str, FetchError>) -> Self {
            self.responses
                .insert(location.to_string(), response.map(str::to_string));
            self
        }
    }

    impl Source for MapSource {
        async fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
            self.requested.borrow_mut().push(location.to_string());
            self.responses
                .get(location)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::Transport("connection refused".to_string())))
        }
    }

    const FORECAST: &str =
        r#"{"predictions": [{"PULocationID": 1, "hour": "2024-01-01T00:00", "prediction": 5}]}"#;
    const ZONES: &str = r#"{"type": "FeatureCollection", "features": []}"#;

    fn candidates() -> Vec<String> {
        vec![
            "./data/forecast_latest.json".to_string(),
            "/data/forecast/forecast_latest.json".to_string(),
        ]
    }

    #[test]
    fn falls_back_to_second_candidate() {
        let source = MapSource::default()
            .with("./data/forecast_latest.json", Err(FetchError::Status(404)))
            .with("/data/forecast/forecast_latest.json", Ok(FORECAST));
        let (doc, location) = pollster::block_on(load_forecast(&source, &candidates())).unwrap();
        assert_eq!(location, "/data/forecast/forecast_latest.json");
        assert_eq!(doc.predictions.len(), 1);
    }

    #[test]
    fn stops_at_first_success() {
        let source = MapSource::default()
            .with("./data/forecast_latest.json", Ok(FORECAST))
            .with("/data/forecast/forecast_latest.json", Ok(FORECAST));
        pollster::block_on(load_forecast(&source, &candidates())).unwrap();
        assert_eq!(
            source.requested.borrow().clone(),
            vec!["./data/forecast_latest.json".to_string()]
        );
    }

    #[test]
    fn all_candidates_failing_is_a_load_error() {
        let source = MapSource::default()
            .with("./data/forecast_latest.json", Err(FetchError::Status(500)));
        let err = pollster::block_on(load_forecast(&source, &candidates())).unwrap_err();
        assert_eq!(
            err,
            LoadError::ForecastUnavailable {
                tried: candidates()
            }
        );
    }

    #[test]
    fn unparseable_success_does_not_try_next() {
        let source = MapSource::default()
            .with("./data/forecast_latest.json", Ok("<html>"))
            .with("/data/forecast/forecast_latest.json", Ok(FORECAST));
        let err = pollster::block_on(load_forecast(&source, &candidates())).unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
        assert_eq!(source.requested.borrow().len(), 1);
    }

    #[test]
    fn loads_both_datasets() {
        let source = MapSource::default()
            .with("./data/taxi_zones.geojson", Ok(ZONES))
            .with("/data/forecast/forecast_latest.json", Ok(FORECAST));
        let data = pollster::block_on(load_datasets(
            &source,
            "./data/taxi_zones.geojson",
            &candidates(),
        ))
        .unwrap();
        assert!(data.zones.is_empty());
        assert_eq!(data.forecast.predictions.len(), 1);
        assert_eq!(data.forecast_location, "/data/forecast/forecast_latest.json");
    }

    #[test]
    fn missing_zones_fail_even_with_forecast() {
        let source = MapSource::default().with("./data/forecast_latest.json", Ok(FORECAST));
        let err = pollster::block_on(load_datasets(
            &source,
            "./data/taxi_zones.geojson",
            &candidates(),
        ))
        .unwrap_err();
        assert!(matches!(err, LoadError::ZonesUnavailable { .. }));
        assert!(err.to_string().contains("taxi_zones.geojson"));
    }

    #[test]
    fn empty_candidate_list_fails() {
        let source = MapSource::default();
        let err = pollster::block_on(load_forecast(&source, &[])).unwrap_err();
        assert_eq!(err, LoadError::ForecastUnavailable { tried: vec![] });
    }
}
