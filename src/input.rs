//! Parse-and-validate boundary.
//!
//! User input arrives as text ([`RawPosition`]). This module turns it into
//! typed [`Position`]s and checks the preconditions the engine relies on:
//! targets summing to 100, a positive total, a sensible cash amount.

use crate::engine::calculate_rebalancing;
use crate::error::InputError;
use crate::result::RebalancingResult;
use crate::types::{Mode, Position, RawPosition};

/// Allowed deviation of the target sum from 100, in percentage points.
pub const TARGET_SUM_TOLERANCE: f64 = 0.01;

/// Longest ticker accepted.
pub const MAX_TICKER_LEN: usize = 10;

/// Parse a dollar amount such as `"$12,500.50"`.
pub fn parse_amount(text: &str) -> Result<f64, InputError> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(InputError::InvalidAmount(text.trim().to_string())),
    }
}

/// Parse a target percentage such as `"60"` or `"60%"`.
pub fn parse_percent(text: &str) -> Result<f64, InputError> {
    let cleaned: String = text.trim().chars().filter(|c| *c != '%').collect();
    match cleaned.trim().parse::<f64>() {
        Ok(v) if (0.0..=100.0).contains(&v) => Ok(v),
        _ => Err(InputError::InvalidTarget(text.trim().to_string())),
    }
}

/// Trim and uppercase a ticker, rejecting empty or overlong symbols.
pub fn normalize_ticker(text: &str) -> Result<String, InputError> {
    let ticker = text.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(InputError::EmptyTicker);
    }
    if ticker.chars().count() > MAX_TICKER_LEN {
        return Err(InputError::InvalidTicker(ticker));
    }
    Ok(ticker)
}

impl Position {
    /// Validate one text record.
    pub fn parse(raw: &RawPosition) -> Result<Self, InputError> {
        Ok(Position {
            ticker: normalize_ticker(&raw.ticker)?,
            amount: parse_amount(&raw.amount)?,
            target_percent: parse_percent(&raw.target_percent)?,
        })
    }
}

/// Validate a list of text records.
///
/// Rows with a blank field are skipped, like half-filled rows in a form.
/// Fails if nothing is left or any complete row is invalid.
pub fn parse_positions(raw: &[RawPosition]) -> Result<Vec<Position>, InputError> {
    let positions = raw
        .iter()
        .filter(|r| r.is_complete())
        .map(Position::parse)
        .collect::<Result<Vec<_>, _>>()?;

    if positions.is_empty() {
        return Err(InputError::NoPositions);
    }
    Ok(positions)
}

/// Sum of target percents.
pub fn target_sum(positions: &[Position]) -> f64 {
    positions.iter().map(|p| p.target_percent).sum()
}

/// Check that targets add up to 100 within [`TARGET_SUM_TOLERANCE`].
pub fn validate_targets(positions: &[Position]) -> Result<(), InputError> {
    let total = target_sum(positions);
    if (total - 100.0).abs() > TARGET_SUM_TOLERANCE {
        return Err(InputError::TargetSum { total });
    }
    Ok(())
}

/// Check the cash amount for modes that need one.
///
/// Withdrawals must leave something behind: `amount < total_value`.
pub fn validate_mode_amount(mode: Mode, amount: f64, total_value: f64) -> Result<(), InputError> {
    if !mode.requires_amount() {
        return Ok(());
    }
    if !(amount.is_finite() && amount > 0.0) {
        return Err(InputError::MissingModeAmount { mode });
    }
    if mode == Mode::Withdrawal && amount >= total_value {
        return Err(InputError::InsufficientFunds {
            requested: amount,
            available: total_value,
        });
    }
    Ok(())
}

/// A calculation whose inputs have passed every boundary check.
///
/// ```
/// use folio::{Mode, RawPosition, RebalanceRequest, parse_positions};
///
/// let raw = vec![
///     RawPosition::new("vti", "$30,000", "60"),
///     RawPosition::new("bnd", "15000", "30%"),
///     RawPosition::new("cash", "5000", "10"),
/// ];
/// let positions = parse_positions(&raw).unwrap();
/// let request = RebalanceRequest::new(positions, Mode::Contribution, 5_000.0).unwrap();
/// let result = request.calculate();
///
/// assert_eq!(result.positions[0].ticker, "VTI");
/// assert_eq!(result.new_total_value(), 55_000.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RebalanceRequest {
    positions: Vec<Position>,
    mode: Mode,
    mode_amount: f64,
}

impl RebalanceRequest {
    pub fn new(positions: Vec<Position>, mode: Mode, mode_amount: f64) -> Result<Self, InputError> {
        if positions.is_empty() {
            return Err(InputError::NoPositions);
        }
        validate_targets(&positions)?;

        let total_value: f64 = positions.iter().map(|p| p.amount).sum();
        if total_value <= 0.0 {
            return Err(InputError::ZeroTotalValue);
        }
        validate_mode_amount(mode, mode_amount, total_value)?;

        Ok(Self {
            positions,
            mode,
            mode_amount: if mode.requires_amount() { mode_amount } else { 0.0 },
        })
    }

    /// Parse text records and validate them in one step.
    pub fn from_raw(raw: &[RawPosition], mode: Mode, mode_amount: f64) -> Result<Self, InputError> {
        Self::new(parse_positions(raw)?, mode, mode_amount)
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn mode_amount(&self) -> f64 {
        self.mode_amount
    }

    /// Run the engine.
    pub fn calculate(&self) -> RebalancingResult {
        calculate_rebalancing(&self.positions, self.mode, self.mode_amount)
    }
}
