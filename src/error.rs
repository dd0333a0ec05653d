//! Validation errors raised at the input boundary.
//!
//! The engine itself never fails; everything here is produced before a
//! calculation runs.

use std::fmt;

/// Errors returned while turning user input into a rebalance request.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("ticker must not be empty")]
    EmptyTicker,

    #[error("invalid ticker \"{0}\" (at most 10 characters)")]
    InvalidTicker(String),

    #[error("invalid amount \"{0}\"")]
    InvalidAmount(String),

    #[error("invalid target \"{0}\" (expected 0-100)")]
    InvalidTarget(String),

    #[error("please add at least one complete position")]
    NoPositions,

    #[error("{}", target_sum_message(.total))]
    TargetSum { total: f64 },

    #[error("{mode} needs an amount greater than $0")]
    MissingModeAmount { mode: crate::Mode },

    #[error("cannot withdraw ${requested:.2} from a portfolio worth ${available:.2}")]
    InsufficientFunds { requested: f64, available: f64 },

    #[error("portfolio total value is zero")]
    ZeroTotalValue,
}

fn target_sum_message(total: &f64) -> String {
    let total = *total;
    let diff = total - 100.0;
    let direction = if diff > 0.0 { "too high" } else { "too low" };
    format!(
        "target allocations add up to {total:.2}%, which is {:.2}% {direction}; they must add up to exactly 100%",
        diff.abs()
    )
}

/// Unrecognized rebalancing mode name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode \"{0}\" (expected standard, add-only, sell-only, contribution or withdrawal)")]
pub struct ParseModeError(pub String);

/// What went wrong on a single import line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineErrorKind {
    /// CSV row without exactly three columns.
    ColumnCount,
    /// Free-text row that could not be split into ticker, amount and target.
    Unparseable(String),
    Ticker(String),
    Amount(String),
    Target(String),
}

/// One rejected import line (1-based line number).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("Line {line}: {kind}")]
pub struct LineError {
    pub line: usize,
    pub kind: LineErrorKind,
}

impl fmt::Display for LineErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineErrorKind::ColumnCount => write!(f, "Expected 3 columns (Ticker,Amount,Target%)"),
            LineErrorKind::Unparseable(line) => write!(f, "Could not parse \"{line}\""),
            LineErrorKind::Ticker(t) => write!(f, "Invalid ticker \"{t}\""),
            LineErrorKind::Amount(a) => write!(f, "Invalid amount \"{a}\""),
            LineErrorKind::Target(t) => write!(f, "Invalid target \"{t}\""),
        }
    }
}

/// Failure to import a CSV or free-text portfolio.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ImportError {
    #[error("no valid positions found")]
    Empty,

    #[error("{}", join_lines(.0))]
    Invalid(Vec<LineError>),
}

fn join_lines(errors: &[LineError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
