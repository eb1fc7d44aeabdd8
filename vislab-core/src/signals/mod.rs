//! Long/short/combined signals from the path-length comparison.
//!
//! - long  = 1 where pos > neg, else 0
//! - short = -1 where pos < neg, else 0
//! - combined = long + short
//!
//! Comparisons involving `NaN` are false, so warmup indices stay flat.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Position held for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Short,
    Flat,
    Long,
}

impl Position {
    pub fn from_value(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Position::Short),
            0 => Some(Position::Flat),
            1 => Some(Position::Long),
            _ => None,
        }
    }
}

/// Which leg of the strategy a series belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Leg {
    Long,
    Short,
    Combined,
}

impl Leg {
    pub const ALL: [Leg; 3] = [Leg::Long, Leg::Short, Leg::Combined];

    pub fn label(self) -> &'static str {
        match self {
            Leg::Long => "Long",
            Leg::Short => "Short",
            Leg::Combined => "Combined",
        }
    }
}

/// The three per-index signal series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSet {
    pub long: Vec<i8>,
    pub short: Vec<i8>,
    pub combined: Vec<i8>,
}

impl SignalSet {
    /// Derive signals from aligned positive/negative statistics.
    pub fn from_path_lengths(positive: &[f64], negative: &[f64]) -> Result<Self> {
        if positive.len() != negative.len() {
            return Err(CoreError::mismatch(
                "positive",
                positive.len(),
                "negative",
                negative.len(),
            ));
        }
        let long: Vec<i8> = positive
            .iter()
            .zip(negative)
            .map(|(p, n)| i8::from(p > n))
            .collect();
        let short: Vec<i8> = positive
            .iter()
            .zip(negative)
            .map(|(p, n)| if p < n { -1 } else { 0 })
            .collect();
        let combined = long.iter().zip(&short).map(|(l, s)| l + s).collect();
        Ok(Self {
            long,
            short,
            combined,
        })
    }

    pub fn len(&self) -> usize {
        self.combined.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combined.is_empty()
    }

    pub fn leg(&self, leg: Leg) -> &[i8] {
        match leg {
            Leg::Long => &self.long,
            Leg::Short => &self.short,
            Leg::Combined => &self.combined,
        }
    }

    /// Combined signal as positions.
    pub fn positions(&self) -> Vec<Position> {
        self.combined
            .iter()
            .map(|&v| Position::from_value(v).unwrap_or(Position::Flat))
            .collect()
    }

    /// Bars spent long, short and flat under the combined signal.
    pub fn exposure(&self) -> Exposure {
        let mut e = Exposure::default();
        for p in self.positions() {
            match p {
                Position::Long => e.long_bars += 1,
                Position::Short => e.short_bars += 1,
                Position::Flat => e.flat_bars += 1,
            }
        }
        e
    }
}

/// Bar counts per combined position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exposure {
    pub long_bars: usize,
    pub short_bars: usize,
    pub flat_bars: usize,
}
