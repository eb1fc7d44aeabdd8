//! Windows where the positive-direction statistic peaks and bottoms out.

use serde::{Deserialize, Serialize};

/// One extreme window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremeWindow {
    /// Index of the statistic (last bar of the window).
    pub index: usize,
    pub value: f64,
    /// First bar of the window.
    pub start: usize,
    pub closes: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowExtremes {
    pub max: ExtremeWindow,
    pub min: ExtremeWindow,
}

/// Locate the maximum and minimum finite values of `positive` and slice the
/// `lookback` closes ending at each.
///
/// Ties resolve to the earliest index. Returns `None` when no value is finite
/// or the slices are misaligned.
pub fn find_extremes(positive: &[f64], lookback: usize, closes: &[f64]) -> Option<WindowExtremes> {
    if lookback == 0 || positive.len() != closes.len() {
        return None;
    }
    let mut max: Option<(usize, f64)> = None;
    let mut min: Option<(usize, f64)> = None;
    for (i, &v) in positive.iter().enumerate() {
        if !v.is_finite() || i + 1 < lookback {
            continue;
        }
        if max.map_or(true, |(_, m)| v > m) {
            max = Some((i, v));
        }
        if min.map_or(true, |(_, m)| v < m) {
            min = Some((i, v));
        }
    }

    let window = |(index, value): (usize, f64)| {
        let start = index + 1 - lookback;
        ExtremeWindow {
            index,
            value,
            start,
            closes: closes[start..=index].to_vec(),
        }
    };
    Some(WindowExtremes {
        max: window(max?),
        min: window(min?),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vislab_core::shortest_path_length;

    #[test]
    fn picks_max_and_min_windows() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let pos = [f64::NAN, f64::NAN, 1.5, 1.2, 1.5, 1.1];
        let ext = find_extremes(&pos, 3, &closes).unwrap();
        assert_eq!(ext.max.index, 2);
        assert_eq!(ext.max.start, 0);
        assert_eq!(ext.max.closes, vec![1.0, 2.0, 3.0]);
        assert_eq!(ext.min.index, 5);
        assert_eq!(ext.min.closes, vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn none_when_nothing_finite() {
        let closes = [1.0, 2.0];
        assert!(find_extremes(&[f64::NAN, f64::NAN], 2, &closes).is_none());
        assert!(find_extremes(&[1.0], 1, &closes).is_none());
        assert!(find_extremes(&[1.0, 1.0], 0, &closes).is_none());
    }

    #[test]
    fn windows_have_lookback_length() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 1.3 + 0.01 * (i as f64 * 0.9).sin())
            .collect();
        let pl = shortest_path_length(&closes, 12).unwrap();
        let ext = find_extremes(&pl.positive, 12, &closes).unwrap();
        assert_eq!(ext.max.closes.len(), 12);
        assert_eq!(ext.min.closes.len(), 12);
        assert!(ext.max.value >= ext.min.value);
    }
}
