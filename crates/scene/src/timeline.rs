use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime};
use formats::ForecastRow;

const HOUR_LABEL_FORMAT: &str = "%a, %b %-d, %-I:%M %p";

/// Distinct forecast hours in ascending order.
///
/// Hours are compared as strings; the pipeline writes a single offset per
/// file, so lexical order is chronological.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    hours: Vec<String>,
}

impl Timeline {
    pub fn from_rows(rows: &[ForecastRow]) -> Self {
        let distinct: BTreeSet<&str> = rows.iter().map(|r| r.hour.as_str()).collect();
        Self {
            hours: distinct.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn hours(&self) -> &[String] {
        &self.hours
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.hours.get(index).map(String::as_str)
    }

    /// Largest valid index; 0 for an empty timeline.
    pub fn last_index(&self) -> usize {
        self.hours.len().saturating_sub(1)
    }

    pub fn clamp_index(&self, index: usize) -> usize {
        index.min(self.last_index())
    }
}

/// Human label for an hour key, e.g. `Mon, Jan 1, 2:00 PM`.
///
/// Offsets are honoured as written; keys that are not timestamps are shown
/// verbatim.
pub fn format_hour_label(hour: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(hour) {
        return dt.format(HOUR_LABEL_FORMAT).to_string();
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(hour, fmt).ok())
        .map(|dt| dt.format(HOUR_LABEL_FORMAT).to_string())
        .unwrap_or_else(|| hour.to_string())
}

#[cfg(test)]
mod tests {
    use super::{Timeline, format_hour_label};
    use formats::ForecastRow;
    use pretty_assertions::assert_eq;

    #[test]
    fn hours_are_distinct_and_sorted() {
        let rows = vec![
            ForecastRow::new(1, "2024-01-01T02:00", 1.0),
            ForecastRow::new(2, "2024-01-01T00:00", 1.0),
            ForecastRow::new(1, "2024-01-01T01:00", 1.0),
            ForecastRow::new(2, "2024-01-01T02:00", 1.0),
        ];
        let t = Timeline::from_rows(&rows);
        assert_eq!(
            t.hours(),
            &[
                "2024-01-01T00:00".to_string(),
                "2024-01-01T01:00".to_string(),
                "2024-01-01T02:00".to_string(),
            ]
        );
        assert_eq!(t.last_index(), 2);
        assert_eq!(t.clamp_index(9), 2);
    }

    #[test]
    fn empty_timeline_has_index_zero() {
        let t = Timeline::from_rows(&[]);
        assert!(t.is_empty());
        assert_eq!(t.last_index(), 0);
        assert_eq!(t.get(0), None);
    }

    #[test]
    fn labels_offset_timestamps_in_their_own_zone() {
        assert_eq!(
            format_hour_label("2024-01-01T14:00:00-05:00"),
            "Mon, Jan 1, 2:00 PM"
        );
    }

    #[test]
    fn labels_naive_timestamps() {
        assert_eq!(format_hour_label("2024-01-01T00:00"), "Mon, Jan 1, 12:00 AM");
        assert_eq!(format_hour_label("2024-07-04T09:30:00"), "Thu, Jul 4, 9:30 AM");
    }

    #[test]
    fn unparseable_labels_pass_through() {
        assert_eq!(format_hour_label("hour-7"), "hour-7");
    }
}
