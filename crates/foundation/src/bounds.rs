use crate::clamp;

/// Longitude/latitude box in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    pub const fn new(min_lon: f64, max_lon: f64, min_lat: f64, max_lat: f64) -> Self {
        GeoBounds {
            min_lon,
            max_lon,
            min_lat,
            max_lat,
        }
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.min_lon..=self.max_lon).contains(&lon) && (self.min_lat..=self.max_lat).contains(&lat)
    }

    /// Pins `(lon, lat)` to the box; each axis is clamped independently.
    pub fn clamp_lon_lat(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            clamp(lon, self.min_lon, self.max_lon),
            clamp(lat, self.min_lat, self.max_lat),
        )
    }
}

/// Closed numeric range, used for zoom and pitch limits.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Span { min, max }
    }

    pub fn clamp(&self, v: f64) -> f64 {
        clamp(v, self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoBounds, Span};

    #[test]
    fn clamps_each_axis_independently() {
        let b = GeoBounds::new(-74.8, -73.2, 40.2, 41.1);
        assert_eq!(b.clamp_lon_lat(-80.0, 40.7), (-74.8, 40.7));
        assert_eq!(b.clamp_lon_lat(-74.0, 45.0), (-74.0, 41.1));
        assert!(b.contains(-74.0, 40.7));
        assert!(!b.contains(-80.0, 40.7));
    }

    #[test]
    fn span_clamp_is_idempotent() {
        let s = Span::new(8.2, 13.8);
        let once = s.clamp(20.0);
        assert_eq!(once, 13.8);
        assert_eq!(s.clamp(once), once);
    }
}
