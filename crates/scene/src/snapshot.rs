use std::collections::BTreeMap;

use formats::ForecastRow;
use foundation::ZoneId;

use crate::timeline::Timeline;

/// Forecast rows and per-zone lookup for one selected hour.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourSnapshot {
    index: usize,
    hour: Option<String>,
    rows: Vec<ForecastRow>,
    lookup: BTreeMap<ZoneId, f64>,
    max_prediction: f64,
}

impl HourSnapshot {
    pub fn empty() -> Self {
        Self {
            max_prediction: 1.0,
            ..Self::default()
        }
    }

    /// Projects `rows` onto `timeline[index]`.
    ///
    /// Zones missing from that hour are absent from the lookup. If a zone
    /// repeats within the hour, the last row wins.
    pub fn project(rows: &[ForecastRow], timeline: &Timeline, index: usize) -> Self {
        let Some(hour) = timeline.get(index) else {
            return Self {
                index,
                ..Self::empty()
            };
        };

        let current: Vec<ForecastRow> = rows.iter().filter(|r| r.hour == hour).cloned().collect();
        let lookup: BTreeMap<ZoneId, f64> =
            current.iter().map(|r| (r.zone_id, r.prediction)).collect();
        let max_prediction = current
            .iter()
            .map(|r| r.prediction)
            .fold(1.0_f64, f64::max);

        Self {
            index,
            hour: Some(hour.to_string()),
            rows: current,
            lookup,
            max_prediction,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn hour(&self) -> Option<&str> {
        self.hour.as_deref()
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn lookup(&self) -> &BTreeMap<ZoneId, f64> {
        &self.lookup
    }

    /// Predicted value for `zone`; zones without a row predict 0.
    pub fn prediction(&self, zone: ZoneId) -> f64 {
        self.lookup.get(&zone).copied().unwrap_or(0.0)
    }

    /// At least 1, so it is always safe to divide by.
    pub fn max_prediction(&self) -> f64 {
        self.max_prediction
    }

    /// The `n` highest rows, descending. Ties keep forecast order.
    pub fn top_rows(&self, n: usize) -> Vec<&ForecastRow> {
        let mut sorted: Vec<&ForecastRow> = self.rows.iter().collect();
        sorted.sort_by(|a, b| b.prediction.total_cmp(&a.prediction));
        sorted.truncate(n);
        sorted
    }
}
