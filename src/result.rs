//! Calculation output: per-position plan plus mode summary.

use crate::types::{Action, Mode};

/// Differences at or below this many dollars are not worth a trade.
///
/// The engine classifies actions by exact sign; this threshold is only
/// applied when counting or displaying trades.
pub const TRADE_TOLERANCE: f64 = 0.01;

/// One position after rebalancing math has been applied.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CalculatedPosition {
    pub ticker: String,
    pub current_amount: f64,
    /// Share of the current total value, 0-100.
    pub current_percent: f64,
    pub target_percent: f64,
    /// Dollar target (against the post-cash-flow total in contribution and
    /// withdrawal modes).
    pub target_amount: f64,
    /// Dollars to move: positive buys, negative sells.
    pub difference: f64,
    pub action: Action,
    /// Holding after the plan runs (contribution and withdrawal only).
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub new_amount: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub new_percent: Option<f64>,
}

impl CalculatedPosition {
    /// True if the position needs a trade larger than `tolerance` dollars.
    #[inline]
    pub fn is_actionable(&self, tolerance: f64) -> bool {
        self.difference.abs() > tolerance
    }
}

/// Mode-specific totals attached to a result.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged, rename_all_fields = "camelCase"))]
pub enum ModeData {
    AddOnly {
        total_to_add: f64,
        new_total_value: f64,
    },
    SellOnly {
        total_to_sell: f64,
        new_total_value: f64,
    },
    Contribution {
        contribution_amount: f64,
        new_total_value: f64,
        total_allocated: f64,
    },
    Withdrawal {
        withdrawal_amount: f64,
        new_total_value: f64,
        total_sold: f64,
    },
    /// Standard mode carries no extra data; serializes as `{}`.
    None {},
}

impl ModeData {
    /// Portfolio value once the plan has run, if the mode changes it.
    pub fn new_total_value(&self) -> Option<f64> {
        match *self {
            ModeData::AddOnly {
                new_total_value, ..
            }
            | ModeData::SellOnly {
                new_total_value, ..
            }
            | ModeData::Contribution {
                new_total_value, ..
            }
            | ModeData::Withdrawal {
                new_total_value, ..
            } => Some(new_total_value),
            ModeData::None {} => None,
        }
    }
}

/// Full output of [`calculate_rebalancing`](crate::calculate_rebalancing).
///
/// Produced fresh on every call and never mutated by the engine afterwards.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RebalancingResult {
    /// Sum of current amounts before any cash flow.
    pub total_value: f64,
    pub positions: Vec<CalculatedPosition>,
    pub mode: Mode,
    pub mode_data: ModeData,
}

impl RebalancingResult {
    /// Positions the plan buys.
    pub fn buys(&self) -> impl Iterator<Item = &CalculatedPosition> {
        self.positions.iter().filter(|p| p.action == Action::Buy)
    }

    /// Positions the plan sells.
    pub fn sells(&self) -> impl Iterator<Item = &CalculatedPosition> {
        self.positions.iter().filter(|p| p.action == Action::Sell)
    }

    /// Value after the plan, falling back to the current total in standard mode.
    pub fn new_total_value(&self) -> f64 {
        self.mode_data.new_total_value().unwrap_or(self.total_value)
    }

    /// Number of positions whose trade exceeds `tolerance` dollars.
    pub fn trade_count(&self, tolerance: f64) -> usize {
        self.positions
            .iter()
            .filter(|p| p.is_actionable(tolerance))
            .count()
    }

    /// Serialize with the camelCase field names downstream consumers expect.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
