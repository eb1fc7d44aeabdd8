//! PriceSeries — the fundamental input unit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Ordered closing prices for a single instrument.
///
/// Time is implicit: every computation indexes by position unless the caller
/// asks for `time_positions`. Timestamps are either present for every price
/// or absent altogether.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    #[serde(with = "crate::serde_float::vec")]
    pub closes: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<Vec<NaiveDateTime>>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, closes: Vec<f64>) -> Self {
        Self {
            symbol: symbol.into(),
            closes,
            timestamps: None,
        }
    }

    /// Attach timestamps. Dropped silently when the lengths disagree.
    pub fn with_timestamps(mut self, timestamps: Vec<NaiveDateTime>) -> Self {
        if timestamps.len() == self.closes.len() {
            self.timestamps = Some(timestamps);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    /// The window of `lookback` closes ending at `end` (inclusive).
    ///
    /// Returns `None` when the window would start before index 0 or `end` is
    /// out of range.
    pub fn window(&self, end: usize, lookback: usize) -> Option<&[f64]> {
        if lookback == 0 || end >= self.closes.len() || end + 1 < lookback {
            return None;
        }
        Some(&self.closes[end + 1 - lookback..=end])
    }

    /// Keep only the first `n` observations.
    pub fn truncate(&mut self, n: usize) {
        self.closes.truncate(n);
        if let Some(ts) = self.timestamps.as_mut() {
            ts.truncate(n);
        }
    }

    /// Seconds since the first timestamp, for placing points on a real time
    /// axis. `None` when the series has no timestamps.
    pub fn time_positions(&self) -> Option<Vec<f64>> {
        let ts = self.timestamps.as_ref()?;
        let first = *ts.first()?;
        Some(
            ts.iter()
                .map(|t| (*t - first).num_milliseconds() as f64 / 1000.0)
                .collect(),
        )
    }
}

/// Which orientation of the series a statistic was computed on.
///
/// `Negative` means the sign-inverted series: peaks become troughs, so the
/// visibility graph sees the series "from below".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Apply the orientation to a window of values.
    pub fn orient(self, values: &[f64]) -> Vec<f64> {
        match self {
            Direction::Positive => values.to_vec(),
            Direction::Negative => values.iter().map(|v| -v).collect(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Positive => "pos",
            Direction::Negative => "neg",
        }
    }

    pub fn flip(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> PriceSeries {
        PriceSeries::new("AUDNZD", vec![1.0, 2.0, 3.0, 4.0, 5.0])
    }

    #[test]
    fn window_returns_trailing_slice() {
        let s = sample();
        assert_eq!(s.window(2, 3), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(s.window(4, 2), Some(&[4.0, 5.0][..]));
        assert_eq!(s.window(0, 1), Some(&[1.0][..]));
    }

    #[test]
    fn window_rejects_partial_and_out_of_range() {
        let s = sample();
        assert_eq!(s.window(1, 3), None);
        assert_eq!(s.window(5, 1), None);
        assert_eq!(s.window(3, 0), None);
    }

    #[test]
    fn timestamps_must_match_length() {
        let ts = NaiveDate::from_ymd_opt(2022, 1, 3)
            .unwrap()
            .and_hms_opt(3, 0, 0)
            .unwrap();
        let s = sample().with_timestamps(vec![ts; 2]);
        assert!(s.timestamps.is_none());
        let s = sample().with_timestamps(vec![ts; 5]);
        assert_eq!(s.timestamps.as_ref().map(Vec::len), Some(5));
    }

    #[test]
    fn truncate_keeps_timestamps_aligned() {
        let ts = NaiveDate::from_ymd_opt(2022, 1, 3)
            .unwrap()
            .and_hms_opt(3, 0, 0)
            .unwrap();
        let mut s = sample().with_timestamps(vec![ts; 5]);
        s.truncate(3);
        assert_eq!(s.len(), 3);
        assert_eq!(s.timestamps.unwrap().len(), 3);
    }

    #[test]
    fn negative_direction_inverts_sign() {
        assert_eq!(Direction::Negative.orient(&[1.0, -2.0]), vec![-1.0, 2.0]);
        assert_eq!(Direction::Positive.orient(&[1.0, -2.0]), vec![1.0, -2.0]);
        assert_eq!(Direction::Positive.flip(), Direction::Negative);
    }

    #[test]
    fn time_positions_are_seconds_from_first_bar() {
        let day = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let ts = vec![
            day.and_hms_opt(3, 0, 0).unwrap(),
            day.and_hms_opt(3, 10, 0).unwrap(),
            day.and_hms_opt(3, 20, 0).unwrap(),
            day.and_hms_opt(4, 0, 0).unwrap(),
            day.and_hms_opt(4, 10, 30).unwrap(),
        ];
        let s = sample().with_timestamps(ts);
        assert_eq!(
            s.time_positions(),
            Some(vec![0.0, 600.0, 1200.0, 3600.0, 4230.0])
        );
        assert_eq!(sample().time_positions(), None);
    }

    #[test]
    fn series_serialization_roundtrip() {
        let s = sample();
        let json = serde_json::to_string(&s).unwrap();
        let back: PriceSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
