mod engine;
mod rules;

pub use engine::SignalEngine;

use crate::types::{AnalysisSummary, Direction, Recommendation, Signal};

/// Explicit accumulator threaded through the rule functions. Signals keep
/// their detection order; nothing is ever removed within a run.
#[derive(Debug, Default)]
pub struct SignalAccumulator {
    signals: Vec<Signal>,
    observations: Vec<String>,
}

impl SignalAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buy(&mut self, reason: impl Into<String>) {
        self.signals.push(Signal {
            direction: Direction::Buy,
            reason: reason.into(),
        });
    }

    pub fn sell(&mut self, reason: impl Into<String>) {
        self.signals.push(Signal {
            direction: Direction::Sell,
            reason: reason.into(),
        });
    }

    pub fn observe(&mut self, text: impl Into<String>) {
        self.observations.push(text.into());
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Close out the run: count directions, apply the majority vote
    /// (tie, including zero/zero, is Neutral) and attach risk factors.
    pub fn into_summary(self, risk_factors: Vec<String>) -> AnalysisSummary {
        let buy_count = self
            .signals
            .iter()
            .filter(|s| s.direction == Direction::Buy)
            .count();
        let sell_count = self
            .signals
            .iter()
            .filter(|s| s.direction == Direction::Sell)
            .count();

        let recommendation = if buy_count > sell_count {
            Recommendation::Buy
        } else if sell_count > buy_count {
            Recommendation::Sell
        } else {
            Recommendation::Neutral
        };

        AnalysisSummary {
            signals: self.signals,
            observations: self.observations,
            risk_factors,
            buy_count,
            sell_count,
            recommendation,
        }
    }
}
