use std::collections::BTreeMap;

use formats::ZoneCollection;
use foundation::ZoneId;

/// Zone names plus the id of every feature, in feature order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneDirectory {
    names: BTreeMap<ZoneId, String>,
    features: Vec<(Option<ZoneId>, Option<String>)>,
}

impl ZoneDirectory {
    pub fn from_collection(zones: &ZoneCollection) -> Self {
        let mut names = BTreeMap::new();
        let mut features = Vec::with_capacity(zones.len());
        for feature in &zones.features {
            if let Some(id) = feature.zone_id {
                let name = feature.name.clone().unwrap_or_else(|| id.fallback_name());
                names.insert(id, name);
            }
            features.push((feature.zone_id, feature.name.clone()));
        }
        Self { names, features }
    }

    /// Display name for `id`, synthesized when the zone is unknown or unnamed.
    pub fn name(&self, id: ZoneId) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.fallback_name())
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn feature_ids(&self) -> impl Iterator<Item = Option<ZoneId>> + '_ {
        self.features.iter().map(|(id, _)| *id)
    }

    /// Zone id and the feature's own label, for hover.
    pub fn feature_label(&self, index: usize) -> Option<(ZoneId, String)> {
        let (id, name) = self.features.get(index)?;
        let id = (*id)?;
        Some((id, name.clone().unwrap_or_else(|| id.fallback_name())))
    }
}

#[cfg(test)]
mod tests {
    use super::ZoneDirectory;
    use formats::ZoneCollection;
    use foundation::ZoneId;
    use pretty_assertions::assert_eq;

    fn directory() -> ZoneDirectory {
        let zones = ZoneCollection::from_geojson_str(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"PULocationID": 1, "zone": "Newark Airport"}, "geometry": null},
                {"type": "Feature", "properties": {"PULocationID": 2}, "geometry": null},
                {"type": "Feature", "properties": {}, "geometry": null}
            ]}"#,
        )
        .unwrap();
        ZoneDirectory::from_collection(&zones)
    }

    #[test]
    fn names_fall_back_to_zone_label() {
        let dir = directory();
        assert_eq!(dir.name(ZoneId(1)), "Newark Airport");
        assert_eq!(dir.name(ZoneId(2)), "Zone 2");
        assert_eq!(dir.name(ZoneId(265)), "Zone 265");
    }

    #[test]
    fn feature_ids_follow_feature_order() {
        let dir = directory();
        assert_eq!(
            dir.feature_ids().collect::<Vec<_>>(),
            vec![Some(ZoneId(1)), Some(ZoneId(2)), None]
        );
        assert_eq!(dir.len(), 3);
    }

    #[test]
    fn feature_label_needs_an_id() {
        let dir = directory();
        assert_eq!(
            dir.feature_label(0),
            Some((ZoneId(1), "Newark Airport".to_string()))
        );
        assert_eq!(dir.feature_label(1), Some((ZoneId(2), "Zone 2".to_string())));
        assert_eq!(dir.feature_label(2), None);
        assert_eq!(dir.feature_label(99), None);
    }
}
