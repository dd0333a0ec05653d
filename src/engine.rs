//! CURRENT→TARGET rebalancing engine.
//!
//! Turns validated positions into a buy/sell/hold plan under one of five
//! [`Mode`]s. Every function here is pure: no I/O, no shared state, no
//! errors. Bad input (zero totals, targets not summing to 100) is the
//! caller's problem and is rejected by [`RebalanceRequest`](crate::RebalanceRequest)
//! before it reaches this module.

use crate::result::{CalculatedPosition, ModeData, RebalancingResult};
use crate::types::{Action, Mode, Position};

/// Compute a rebalancing plan.
///
/// # Arguments
/// - `positions`: holdings with current value and target percent (0-100)
/// - `mode`: which trades are allowed
/// - `mode_amount`: cash to add (contribution) or raise (withdrawal);
///   ignored by the other modes
///
/// A contribution or withdrawal with `mode_amount <= 0` runs the standard
/// arithmetic but keeps its mode label, with no mode data.
///
/// ```
/// use folio::{calculate_rebalancing, Action, Mode, Position};
///
/// let positions = [
///     Position::new("VTI", 35_000.0, 60.0),
///     Position::new("BND", 15_000.0, 30.0),
///     Position::new("CASH", 5_000.0, 10.0),
/// ];
/// let result = calculate_rebalancing(&positions, Mode::Standard, 0.0);
///
/// assert_eq!(result.total_value, 55_000.0);
/// assert_eq!(result.positions[0].action, Action::Sell);
/// assert!((result.positions[0].difference + 2_000.0).abs() < 1e-6);
/// ```
pub fn calculate_rebalancing(
    positions: &[Position],
    mode: Mode,
    mode_amount: f64,
) -> RebalancingResult {
    let total_value: f64 = positions.iter().map(|p| p.amount).sum();

    match mode {
        Mode::Contribution if mode_amount > 0.0 => contribute(positions, total_value, mode_amount),
        Mode::Withdrawal if mode_amount > 0.0 => withdraw(positions, total_value, mode_amount),
        _ => rebalance(positions, total_value, mode),
    }
}

/// Standard, add-only and sell-only: targets are measured against the
/// current total and the mode only filters which differences survive.
fn rebalance(positions: &[Position], total_value: f64, mode: Mode) -> RebalancingResult {
    let calcs: Vec<CalculatedPosition> = positions
        .iter()
        .map(|pos| {
            let target_amount = pos.target_percent / 100.0 * total_value;
            let raw = target_amount - pos.amount;

            let difference = match mode {
                Mode::AddOnly if raw <= 0.0 => 0.0,
                Mode::SellOnly if raw >= 0.0 => 0.0,
                _ => raw,
            };

            CalculatedPosition {
                ticker: pos.ticker.clone(),
                current_amount: pos.amount,
                current_percent: pos.amount / total_value * 100.0,
                target_percent: pos.target_percent,
                target_amount,
                difference,
                action: Action::from_difference(difference),
                new_amount: None,
                new_percent: None,
            }
        })
        .collect();

    let mode_data = match mode {
        Mode::AddOnly => {
            let total_to_add: f64 = calcs
                .iter()
                .filter(|c| c.difference > 0.0)
                .map(|c| c.difference)
                .sum();
            ModeData::AddOnly {
                total_to_add,
                new_total_value: total_value + total_to_add,
            }
        }
        Mode::SellOnly => {
            let total_to_sell: f64 = calcs
                .iter()
                .filter(|c| c.difference < 0.0)
                .map(|c| c.difference.abs())
                .sum();
            ModeData::SellOnly {
                total_to_sell,
                new_total_value: total_value - total_to_sell,
            }
        }
        _ => ModeData::None {},
    };

    RebalancingResult {
        total_value,
        positions: calcs,
        mode,
        mode_data,
    }
}

/// Allocate `contribution` of new cash without selling anything.
///
/// First pass: each position buys up to its target share of the new total.
/// If that allocates less than the contribution, the remainder is spread
/// over every position in proportion to its target percent (not its
/// shortfall). If it allocates more, which happens whenever a position is
/// already above its new target, the buys are scaled down to fit.
fn contribute(positions: &[Position], total_value: f64, contribution: f64) -> RebalancingResult {
    let new_total = total_value + contribution;

    let first_pass: Vec<f64> = positions
        .iter()
        .map(|pos| (pos.target_percent / 100.0 * new_total - pos.amount).max(0.0))
        .collect();
    let allocated: f64 = first_pass.iter().sum();

    let adds: Vec<f64> = if allocated > contribution {
        let scale = contribution / allocated;
        first_pass.iter().map(|a| a * scale).collect()
    } else if allocated < contribution {
        let remainder = contribution - allocated;
        let total_target: f64 = positions.iter().map(|p| p.target_percent).sum();
        if total_target > 0.0 {
            first_pass
                .iter()
                .zip(positions)
                .map(|(a, pos)| a + pos.target_percent / total_target * remainder)
                .collect()
        } else {
            first_pass
        }
    } else {
        first_pass
    };

    let calcs = positions
        .iter()
        .zip(adds)
        .map(|(pos, add)| with_cash_flow(pos, total_value, new_total, add))
        .collect();

    RebalancingResult {
        total_value,
        positions: calcs,
        mode: Mode::Contribution,
        mode_data: ModeData::Contribution {
            contribution_amount: contribution,
            new_total_value: new_total,
            total_allocated: contribution,
        },
    }
}

/// Raise `withdrawal` in cash without buying anything.
///
/// Mirror of [`contribute`], except that an unfunded remainder is taken from
/// every position in proportion to its *current amount*, not its target.
fn withdraw(positions: &[Position], total_value: f64, withdrawal: f64) -> RebalancingResult {
    let new_total = total_value - withdrawal;

    let first_pass: Vec<f64> = positions
        .iter()
        .map(|pos| (pos.amount - pos.target_percent / 100.0 * new_total).max(0.0))
        .collect();
    let sold: f64 = first_pass.iter().sum();

    let sales: Vec<f64> = if sold > withdrawal {
        let scale = withdrawal / sold;
        first_pass.iter().map(|s| s * scale).collect()
    } else if sold < withdrawal && total_value > 0.0 {
        let remainder = withdrawal - sold;
        first_pass
            .iter()
            .zip(positions)
            .map(|(s, pos)| s + pos.amount / total_value * remainder)
            .collect()
    } else {
        first_pass
    };

    let calcs = positions
        .iter()
        .zip(sales)
        .map(|(pos, sale)| with_cash_flow(pos, total_value, new_total, -sale))
        .collect();

    RebalancingResult {
        total_value,
        positions: calcs,
        mode: Mode::Withdrawal,
        mode_data: ModeData::Withdrawal {
            withdrawal_amount: withdrawal,
            new_total_value: new_total,
            total_sold: withdrawal,
        },
    }
}

/// Build a position whose target is measured against the post-flow total.
fn with_cash_flow(
    pos: &Position,
    total_value: f64,
    new_total: f64,
    difference: f64,
) -> CalculatedPosition {
    let new_amount = pos.amount + difference;
    CalculatedPosition {
        ticker: pos.ticker.clone(),
        current_amount: pos.amount,
        current_percent: pos.amount / total_value * 100.0,
        target_percent: pos.target_percent,
        target_amount: pos.target_percent / 100.0 * new_total,
        difference,
        action: Action::from_difference(difference),
        new_amount: Some(new_amount),
        new_percent: Some(new_amount / new_total * 100.0),
    }
}
