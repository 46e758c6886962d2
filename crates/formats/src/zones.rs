use foundation::ZoneId;
use serde_json::{Map, Value};

use crate::forecast::zone_id_from_value;

/// Property keys carrying the zone id, in lookup order.
pub const ZONE_ID_KEYS: [&str; 2] = ["PULocationID", "LocationID"];
pub const ZONE_NAME_KEY: &str = "zone";

/// The parts of a zone feature this crate reads; geometry stays opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneFeature {
    pub zone_id: Option<ZoneId>,
    pub name: Option<String>,
}

/// Zone boundary FeatureCollection.
///
/// Keeps the original GeoJSON so it can be handed to the renderer untouched;
/// `features` is parallel to the collection's feature array.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneCollection {
    pub features: Vec<ZoneFeature>,
    geojson: Value,
}

#[derive(Debug)]
pub enum ZoneCollectionError {
    InvalidJson(String),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for ZoneCollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneCollectionError::InvalidJson(reason) => write!(f, "JSON parse error: {reason}"),
            ZoneCollectionError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            ZoneCollectionError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for ZoneCollectionError {}

impl ZoneCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, ZoneCollectionError> {
        let value: Value = serde_json::from_str(payload)
            .map_err(|e| ZoneCollectionError::InvalidJson(e.to_string()))?;
        Self::from_geojson_value(value)
    }

    pub fn from_geojson_value(value: Value) -> Result<Self, ZoneCollectionError> {
        let obj = value
            .as_object()
            .ok_or(ZoneCollectionError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(ZoneCollectionError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(ZoneCollectionError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(ZoneCollectionError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val
                .as_object()
                .ok_or(ZoneCollectionError::InvalidFeature {
                    index,
                    reason: "feature must be an object".to_string(),
                })?;

            let feat_type = feat_obj.get("type").and_then(|v| v.as_str()).ok_or(
                ZoneCollectionError::InvalidFeature {
                    index,
                    reason: "feature missing type".to_string(),
                },
            )?;
            if feat_type != "Feature" {
                return Err(ZoneCollectionError::InvalidFeature {
                    index,
                    reason: format!("unexpected feature type: {feat_type}"),
                });
            }

            let empty = Map::new();
            let properties = feat_obj
                .get("properties")
                .and_then(|v| v.as_object())
                .unwrap_or(&empty);

            features.push(ZoneFeature {
                zone_id: zone_id_from_properties(properties),
                name: zone_name_from_properties(properties),
            });
        }

        Ok(Self {
            features,
            geojson: value,
        })
    }

    pub fn geojson(&self) -> &Value {
        &self.geojson
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Ids in feature order, skipping features without a usable id.
    pub fn zone_ids(&self) -> impl Iterator<Item = ZoneId> + '_ {
        self.features.iter().filter_map(|f| f.zone_id)
    }
}

pub fn zone_id_from_properties(properties: &Map<String, Value>) -> Option<ZoneId> {
    ZONE_ID_KEYS
        .iter()
        .filter_map(|key| properties.get(*key))
        .find_map(zone_id_from_value)
}

fn zone_name_from_properties(properties: &Map<String, Value>) -> Option<String> {
    properties
        .get(ZONE_NAME_KEY)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
