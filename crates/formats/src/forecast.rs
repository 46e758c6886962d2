use foundation::ZoneId;
use serde::{Deserialize, Serialize};

/// One predicted trip count for a zone at a given hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    #[serde(rename = "PULocationID", with = "zone_id_json")]
    pub zone_id: ZoneId,
    /// ISO-8601 timestamp, kept verbatim so hour keys compare exactly.
    pub hour: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub prediction: f64,
}

impl ForecastRow {
    pub fn new(zone_id: impl Into<ZoneId>, hour: impl Into<String>, prediction: f64) -> Self {
        Self {
            zone_id: zone_id.into(),
            hour: hour.into(),
            prediction,
        }
    }
}

/// Forecast file as written by the serving pipeline.
///
/// Only `predictions` is required; the remaining fields are descriptive and
/// may be absent in hand-made fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDocument {
    pub predictions: Vec<ForecastRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon_hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_source: Option<String>,
}

#[derive(Debug)]
pub enum ForecastError {
    InvalidJson(String),
}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastError::InvalidJson(reason) => write!(f, "invalid forecast document: {reason}"),
        }
    }
}

impl std::error::Error for ForecastError {}

impl ForecastDocument {
    pub fn new(predictions: Vec<ForecastRow>) -> Self {
        Self {
            predictions,
            generated_at: None,
            timezone: None,
            horizon_hours: None,
            zone_count: None,
            prediction_count: None,
            model_path: None,
            weather_source: None,
        }
    }

    pub fn from_json_str(payload: &str) -> Result<Self, ForecastError> {
        serde_json::from_str(payload).map_err(|e| ForecastError::InvalidJson(e.to_string()))
    }

    /// Declared row count versus parsed row count, when they disagree.
    pub fn prediction_count_mismatch(&self) -> Option<(u64, usize)> {
        let declared = self.prediction_count?;
        let actual = self.predictions.len();
        (declared != actual as u64).then_some((declared, actual))
    }
}

/// Accepts integer numbers, integral floats (`132.0`) and numeric strings.
mod zone_id_json {
    use foundation::ZoneId;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(id: &ZoneId, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u32(id.get())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<ZoneId, D::Error> {
        let value = Value::deserialize(d)?;
        super::zone_id_from_value(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid zone id: {value}")))
    }
}

pub(crate) fn zone_id_from_value(value: &serde_json::Value) -> Option<ZoneId> {
    use serde_json::Value;
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return u32::try_from(u).ok().map(ZoneId);
            }
            let f = n.as_f64()?;
            (f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64).then(|| ZoneId(f as u32))
        }
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

// `null` predictions show up when the pipeline writes NaN; they render as zero demand.
fn lenient_f64<'de, D: serde::Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(0.0))
}
