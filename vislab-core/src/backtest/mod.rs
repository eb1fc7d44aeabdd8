//! Signal backtest on next-period log returns.
//!
//! `r[i] = ln(close[i+1]) - ln(close[i])`, so the signal at `i` earns the move
//! from `i` to `i+1`. The last index has no next bar and its return is `NaN`.
//! No position sizing, no costs.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CoreError, Result};
use crate::signals::{Exposure, Leg, SignalSet};

/// Next-period log return for every index; `NaN` at the last index.
pub fn log_returns(closes: &[f64]) -> Vec<f64> {
    let mut r = vec![f64::NAN; closes.len()];
    for (slot, pair) in r.iter_mut().zip(closes.windows(2)) {
        *slot = pair[1].ln() - pair[0].ln();
    }
    r
}

/// Element-wise `signal * return`.
pub fn strategy_returns(signal: &[i8], returns: &[f64]) -> Result<Vec<f64>> {
    if signal.len() != returns.len() {
        return Err(CoreError::mismatch(
            "signal",
            signal.len(),
            "returns",
            returns.len(),
        ));
    }
    Ok(signal
        .iter()
        .zip(returns)
        .map(|(&s, &r)| f64::from(s) * r)
        .collect())
}

/// Running sum of returns, skipping non-finite entries.
///
/// A non-finite entry repeats the previous total so the curve stays plottable.
pub fn cumulative_returns(returns: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    returns
        .iter()
        .map(|&r| {
            if r.is_finite() {
                total += r;
            }
            total
        })
        .collect()
}

/// Sum of positive returns and sum of absolute negative returns.
pub fn gross_profit_loss(returns: &[f64]) -> (f64, f64) {
    returns
        .iter()
        .filter(|r| r.is_finite())
        .fold((0.0, 0.0), |(gp, gl), &r| {
            if r > 0.0 {
                (gp + r, gl)
            } else if r < 0.0 {
                (gp, gl - r)
            } else {
                (gp, gl)
            }
        })
}

/// Profit factor: gross profit / gross loss.
///
/// Non-finite returns are ignored. The result is never negative or `NaN`:
/// no losses with some profit gives `+∞`, no losses and no profit gives `0.0`.
pub fn profit_factor(returns: &[f64]) -> f64 {
    let (gross_profit, gross_loss) = gross_profit_loss(returns);
    if gross_loss == 0.0 {
        return if gross_profit > 0.0 { f64::INFINITY } else { 0.0 };
    }
    gross_profit / gross_loss
}

/// Return series and summary for one leg of the strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegResult {
    pub leg: Leg,
    #[serde(with = "crate::serde_float::vec")]
    pub returns: Vec<f64>,
    pub cumulative: Vec<f64>,
    pub gross_profit: f64,
    pub gross_loss: f64,
    #[serde(with = "crate::serde_float")]
    pub profit_factor: f64,
    pub total_return: f64,
    pub winning_bars: usize,
    pub losing_bars: usize,
}

impl LegResult {
    fn from_returns(leg: Leg, returns: Vec<f64>) -> Self {
        let (gross_profit, gross_loss) = gross_profit_loss(&returns);
        let cumulative = cumulative_returns(&returns);
        let total_return = cumulative.last().copied().unwrap_or(0.0);
        let winning_bars = returns.iter().filter(|r| r.is_finite() && **r > 0.0).count();
        let losing_bars = returns.iter().filter(|r| r.is_finite() && **r < 0.0).count();
        Self {
            leg,
            profit_factor: profit_factor(&returns),
            returns,
            cumulative,
            gross_profit,
            gross_loss,
            total_return,
            winning_bars,
            losing_bars,
        }
    }
}

/// Everything the backtest produces for one statistic series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    #[serde(with = "crate::serde_float::vec")]
    pub log_returns: Vec<f64>,
    pub signals: SignalSet,
    pub long: LegResult,
    pub short: LegResult,
    pub combined: LegResult,
    pub exposure: Exposure,
}

impl BacktestReport {
    pub fn leg(&self, leg: Leg) -> &LegResult {
        match leg {
            Leg::Long => &self.long,
            Leg::Short => &self.short,
            Leg::Combined => &self.combined,
        }
    }

    /// `(Long, Short, Combined)` profit factors.
    pub fn profit_factors(&self) -> [(Leg, f64); 3] {
        Leg::ALL.map(|leg| (leg, self.leg(leg).profit_factor))
    }
}

/// Composer for signals, returns and profit factors.
pub struct Backtest;

impl Backtest {
    /// Run the long/short/combined backtest.
    ///
    /// All three inputs must have the same length.
    pub fn run(closes: &[f64], positive: &[f64], negative: &[f64]) -> Result<BacktestReport> {
        if closes.len() != positive.len() {
            return Err(CoreError::mismatch(
                "closes",
                closes.len(),
                "positive",
                positive.len(),
            ));
        }
        let signals = SignalSet::from_path_lengths(positive, negative)?;
        Self::run_signals(closes, signals)
    }

    /// Backtest a precomputed signal set.
    pub fn run_signals(closes: &[f64], signals: SignalSet) -> Result<BacktestReport> {
        if closes.len() != signals.len() {
            return Err(CoreError::mismatch(
                "closes",
                closes.len(),
                "signals",
                signals.len(),
            ));
        }
        if let Some((index, &value)) = closes
            .iter()
            .enumerate()
            .find(|(_, c)| c.is_finite() && **c <= 0.0)
        {
            warn!(index, value, "non-positive close; its log returns are excluded");
        }

        let r = log_returns(closes);
        let long = LegResult::from_returns(Leg::Long, strategy_returns(&signals.long, &r)?);
        let short = LegResult::from_returns(Leg::Short, strategy_returns(&signals.short, &r)?);
        let combined =
            LegResult::from_returns(Leg::Combined, strategy_returns(&signals.combined, &r)?);

        for leg in [&long, &short, &combined] {
            if leg.profit_factor.is_infinite() {
                warn!(leg = leg.leg.label(), "no losing bars; profit factor is unbounded");
            }
        }
        debug!(
            bars = closes.len(),
            long_pf = long.profit_factor,
            short_pf = short.profit_factor,
            combined_pf = combined.profit_factor,
            "backtest complete"
        );

        let exposure = signals.exposure();
        Ok(BacktestReport {
            log_returns: r,
            signals,
            long,
            short,
            combined,
            exposure,
        })
    }
}
