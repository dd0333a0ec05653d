//! CSV and free-text portfolio import.
//!
//! Both parsers validate every line, collect all failures, and only succeed
//! when the whole input is clean.

use crate::error::{ImportError, LineError, LineErrorKind};
use crate::input::{MAX_TICKER_LEN, parse_amount, parse_percent};
use crate::types::Position;

/// Parse `Ticker,Amount,Target%` rows, with an optional header line.
///
/// ```
/// let positions = folio::parse_csv("Ticker,Amount,Target\nVTI,30000,60\nBND,20000,40%").unwrap();
/// assert_eq!(positions.len(), 2);
/// assert_eq!(positions[1].target_percent, 40.0);
/// ```
pub fn parse_csv(text: &str) -> Result<Vec<Position>, ImportError> {
    let lines: Vec<&str> = text.trim().lines().collect();
    let start = match lines.first() {
        Some(first) if first.to_lowercase().contains("ticker") => 1,
        _ => 0,
    };

    let mut positions = Vec::new();
    let mut errors = Vec::new();

    for (idx, line) in lines.iter().enumerate().skip(start) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;

        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        let [ticker, amount, target] = parts.as_slice() else {
            errors.push(LineError {
                line: line_no,
                kind: LineErrorKind::ColumnCount,
            });
            continue;
        };

        match validate_line(ticker.to_uppercase(), amount, target) {
            Ok(pos) => positions.push(pos),
            Err(kind) => errors.push(LineError {
                line: line_no,
                kind,
            }),
        }
    }

    finish(positions, errors)
}

/// Parse loosely formatted lines such as `VTI 30000 60%` or `VTI, $30000, 60`.
///
/// A line containing a comma must split into exactly three comma-separated
/// fields; otherwise the first three whitespace-separated tokens are used.
/// Non-letters are stripped from tickers.
pub fn parse_text(text: &str) -> Result<Vec<Position>, ImportError> {
    let mut positions = Vec::new();
    let mut errors = Vec::new();

    for (idx, line) in text.trim().lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;

        let fields: Option<(&str, &str, &str)> = if line.contains(',') {
            let parts: Vec<&str> = line.split(',').map(str::trim).collect();
            match parts.as_slice() {
                [t, a, p] => Some((*t, *a, *p)),
                _ => None,
            }
        } else {
            let mut tokens = line.split_whitespace();
            match (tokens.next(), tokens.next(), tokens.next()) {
                (Some(t), Some(a), Some(p)) => Some((t, a, p)),
                _ => None,
            }
        };

        let Some((ticker, amount, target)) =
            fields.filter(|(t, a, p)| !t.is_empty() && !a.is_empty() && !p.is_empty())
        else {
            errors.push(LineError {
                line: line_no,
                kind: LineErrorKind::Unparseable(line.to_string()),
            });
            continue;
        };

        let ticker: String = ticker
            .to_uppercase()
            .chars()
            .filter(|c| c.is_ascii_uppercase())
            .collect();

        match validate_line(ticker, amount, target) {
            Ok(pos) => positions.push(pos),
            Err(kind) => errors.push(LineError {
                line: line_no,
                kind,
            }),
        }
    }

    finish(positions, errors)
}

fn validate_line(ticker: String, amount: &str, target: &str) -> Result<Position, LineErrorKind> {
    if ticker.is_empty() || ticker.chars().count() > MAX_TICKER_LEN {
        return Err(LineErrorKind::Ticker(ticker));
    }
    let amount = parse_amount(amount).map_err(|_| LineErrorKind::Amount(amount.to_string()))?;
    let target_percent =
        parse_percent(target).map_err(|_| LineErrorKind::Target(target.to_string()))?;
    Ok(Position {
        ticker,
        amount,
        target_percent,
    })
}

fn finish(positions: Vec<Position>, errors: Vec<LineError>) -> Result<Vec<Position>, ImportError> {
    if positions.is_empty() && errors.is_empty() {
        return Err(ImportError::Empty);
    }
    if !errors.is_empty() {
        return Err(ImportError::Invalid(errors));
    }
    Ok(positions)
}
