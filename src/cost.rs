//! Rough cost of executing a plan: trading fees plus capital-gains tax on sells.

use std::fmt;

use crate::format::{format_currency, format_percent};
use crate::result::{RebalancingResult, TRADE_TOLERANCE};
use crate::types::Action;

/// Inputs to the cost estimate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CostAssumptions {
    /// Flat fee per trade in dollars.
    pub fee_per_trade: f64,
    /// Assumed cost basis as a fraction of a sell's proceeds; the rest is gain.
    pub cost_basis_ratio: f64,
    pub tax_rate: f64,
}

impl Default for CostAssumptions {
    fn default() -> Self {
        Self {
            fee_per_trade: 0.0,
            cost_basis_ratio: 0.8,
            tax_rate: 0.15,
        }
    }
}

/// Estimated cost of a plan.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CostEstimate {
    pub trades: usize,
    pub buys: usize,
    pub sells: usize,
    pub trading_costs: f64,
    pub capital_gains: f64,
    pub estimated_taxes: f64,
    /// Total cost as a percent of the pre-plan portfolio value.
    pub cost_percent: f64,
}

impl CostEstimate {
    pub fn total(&self) -> f64 {
        self.trading_costs + self.estimated_taxes
    }
}

impl fmt::Display for CostEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} fees + {} tax = {} ({} of portfolio, {} trades)",
            format_currency(self.trading_costs),
            format_currency(self.estimated_taxes),
            format_currency(self.total()),
            format_percent(self.cost_percent),
            self.trades,
        )
    }
}

/// Estimate fees and taxes for every trade above [`TRADE_TOLERANCE`].
pub fn estimate_cost(result: &RebalancingResult, assumptions: &CostAssumptions) -> CostEstimate {
    let mut buys = 0;
    let mut sells = 0;
    let mut sell_volume = 0.0_f64;

    for pos in &result.positions {
        if !pos.is_actionable(TRADE_TOLERANCE) {
            continue;
        }
        match pos.action {
            Action::Buy => buys += 1,
            Action::Sell => {
                sells += 1;
                sell_volume += pos.difference.abs();
            }
            Action::Hold => {}
        }
    }

    let trades = buys + sells;
    let trading_costs = trades as f64 * assumptions.fee_per_trade;
    let capital_gains = sell_volume * (1.0 - assumptions.cost_basis_ratio);
    let estimated_taxes = capital_gains * assumptions.tax_rate;
    let cost_percent = if result.total_value > 0.0 {
        (trading_costs + estimated_taxes) / result.total_value * 100.0
    } else {
        0.0
    };

    CostEstimate {
        trades,
        buys,
        sells,
        trading_costs,
        capital_gains,
        estimated_taxes,
        cost_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::calculate_rebalancing;
    use crate::types::{Mode, Position};

    fn drifted() -> RebalancingResult {
        calculate_rebalancing(
            &[
                Position::new("VTI", 70_000.0, 60.0),
                Position::new("BND", 30_000.0, 40.0),
            ],
            Mode::Standard,
            0.0,
        )
    }

    #[test]
    fn default_assumptions() {
        let a = CostAssumptions::default();
        assert_eq!(a.fee_per_trade, 0.0);
        assert_eq!(a.cost_basis_ratio, 0.8);
        assert_eq!(a.tax_rate, 0.15);
    }

    #[test]
    fn sells_generate_taxable_gains() {
        let cost = estimate_cost(&drifted(), &CostAssumptions::default());

        assert_eq!(cost.trades, 2);
        assert_eq!(cost.buys, 1);
        assert_eq!(cost.sells, 1);
        assert_eq!(cost.trading_costs, 0.0);
        // 10,000 sold, 20% is gain, taxed at 15%
        assert!((cost.capital_gains - 2_000.0).abs() < 1e-6);
        assert!((cost.estimated_taxes - 300.0).abs() < 1e-6);
        assert!((cost.cost_percent - 0.3).abs() < 1e-9);
    }

    #[test]
    fn fees_scale_with_trade_count() {
        let assumptions = CostAssumptions {
            fee_per_trade: 4.95,
            ..CostAssumptions::default()
        };
        let cost = estimate_cost(&drifted(), &assumptions);
        assert!((cost.trading_costs - 9.9).abs() < 1e-9);
        assert!((cost.total() - 309.9).abs() < 1e-6);
    }

    #[test]
    fn sub_cent_differences_are_not_trades() {
        let result = calculate_rebalancing(
            &[
                Position::new("VTI", 60.005, 60.0),
                Position::new("BND", 39.995, 40.0),
            ],
            Mode::Standard,
            0.0,
        );
        let cost = estimate_cost(&result, &CostAssumptions::default());
        assert_eq!(cost.trades, 0);
        assert_eq!(cost.total(), 0.0);
    }

    #[test]
    fn display_summary() {
        let cost = estimate_cost(&drifted(), &CostAssumptions::default());
        assert_eq!(
            cost.to_string(),
            "$0.00 fees + $300.00 tax = $300.00 (0.30% of portfolio, 2 trades)"
        );
    }
}
