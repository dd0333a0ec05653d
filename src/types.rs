//! Core types: Position, RawPosition, Mode, Action

use std::fmt;
use std::str::FromStr;

use crate::error::ParseModeError;

/// A holding as typed by a user or read from a file: every field is text.
///
/// Nothing in the engine consumes this directly. Convert it with
/// [`Position::parse`](crate::Position::parse) or
/// [`parse_positions`](crate::parse_positions) first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RawPosition {
    pub ticker: String,
    pub amount: String,
    pub target_percent: String,
}

impl RawPosition {
    pub fn new(
        ticker: impl Into<String>,
        amount: impl Into<String>,
        target_percent: impl Into<String>,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            amount: amount.into(),
            target_percent: target_percent.into(),
        }
    }

    /// True when every field holds something other than whitespace.
    pub fn is_complete(&self) -> bool {
        !self.ticker.trim().is_empty()
            && !self.amount.trim().is_empty()
            && !self.target_percent.trim().is_empty()
    }
}

/// A validated holding: current dollar value and target allocation (0-100).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Position {
    pub ticker: String,
    pub amount: f64,
    pub target_percent: f64,
}

impl Position {
    pub fn new(ticker: impl Into<String>, amount: f64, target_percent: f64) -> Self {
        Self {
            ticker: ticker.into(),
            amount,
            target_percent,
        }
    }

    /// Back to the text form used by files and the saved-portfolio store.
    pub fn to_raw(&self) -> RawPosition {
        RawPosition {
            ticker: self.ticker.clone(),
            amount: self.amount.to_string(),
            target_percent: self.target_percent.to_string(),
        }
    }
}

/// Rebalancing policy: which trades a plan may contain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Mode {
    /// Buy and sell freely until every position sits on its target.
    #[default]
    Standard,
    /// Only buy; overweight positions are held.
    AddOnly,
    /// Only sell; underweight positions are held.
    SellOnly,
    /// Invest new cash toward the targets.
    Contribution,
    /// Raise cash while moving toward the targets.
    Withdrawal,
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Standard,
        Mode::AddOnly,
        Mode::SellOnly,
        Mode::Contribution,
        Mode::Withdrawal,
    ];

    /// Contribution and withdrawal need a positive cash amount.
    #[inline]
    pub fn requires_amount(self) -> bool {
        matches!(self, Mode::Contribution | Mode::Withdrawal)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Standard => "standard",
            Mode::AddOnly => "add-only",
            Mode::SellOnly => "sell-only",
            Mode::Contribution => "contribution",
            Mode::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

/// What to do with a position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl Action {
    /// Classify a dollar difference by its exact sign.
    ///
    /// Positive buys, negative sells, exactly zero holds. NaN holds too,
    /// since it compares false both ways.
    #[inline]
    pub fn from_difference(difference: f64) -> Self {
        if difference > 0.0 {
            Action::Buy
        } else if difference < 0.0 {
            Action::Sell
        } else {
            Action::Hold
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Hold => write!(f, "HOLD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_round_trips_through_text() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>().unwrap(), mode);
        }
    }

    #[test]
    fn mode_parse_is_case_insensitive() {
        assert_eq!(" Add-Only ".parse::<Mode>().unwrap(), Mode::AddOnly);
        assert_eq!("WITHDRAWAL".parse::<Mode>().unwrap(), Mode::Withdrawal);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = "rebalance-all".parse::<Mode>().unwrap_err();
        assert!(err.to_string().contains("rebalance-all"));
    }

    #[test]
    fn only_cash_modes_require_amount() {
        assert!(Mode::Contribution.requires_amount());
        assert!(Mode::Withdrawal.requires_amount());
        assert!(!Mode::Standard.requires_amount());
        assert!(!Mode::AddOnly.requires_amount());
        assert!(!Mode::SellOnly.requires_amount());
    }

    #[test]
    fn action_from_sign() {
        assert_eq!(Action::from_difference(0.01), Action::Buy);
        assert_eq!(Action::from_difference(-1e-13), Action::Sell);
        assert_eq!(Action::from_difference(0.0), Action::Hold);
        assert_eq!(Action::from_difference(-0.0), Action::Hold);
        assert_eq!(Action::from_difference(f64::NAN), Action::Hold);
    }

    #[test]
    fn action_display() {
        assert_eq!(format!("{}", Action::Buy), "BUY");
        assert_eq!(format!("{}", Action::Sell), "SELL");
        assert_eq!(format!("{}", Action::Hold), "HOLD");
    }

    #[test]
    fn raw_completeness() {
        assert!(RawPosition::new("VTI", "100", "50").is_complete());
        assert!(!RawPosition::new("VTI", " ", "50").is_complete());
        assert!(!RawPosition::default().is_complete());
    }
}
