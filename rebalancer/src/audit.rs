//! JSONL audit trail logging.
//!
//! Each command that computes a plan or changes the store appends events to
//! an audit.jsonl file, one JSON object per line.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use folio::{Mode, RebalancingResult, TRADE_TOLERANCE};
use serde::Serialize;

use crate::error::Result;

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<std::fs::File>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Convenience: log the start of a calculation.
pub fn log_calc_started(
    audit: &mut AuditLog,
    portfolio: &str,
    mode: Mode,
    mode_amount: f64,
) -> Result<()> {
    audit.log(
        "calc_started",
        serde_json::json!({
            "portfolio": portfolio,
            "mode": mode.as_str(),
            "amount": mode_amount,
        }),
    )
}

/// Convenience: log a computed plan.
pub fn log_result(audit: &mut AuditLog, result: &RebalancingResult) -> Result<()> {
    let trades: Vec<_> = result
        .positions
        .iter()
        .filter(|p| p.is_actionable(TRADE_TOLERANCE))
        .map(|p| {
            serde_json::json!({
                "ticker": p.ticker,
                "action": p.action.to_string(),
                "difference": p.difference,
            })
        })
        .collect();

    audit.log(
        "result_computed",
        serde_json::json!({
            "mode": result.mode.as_str(),
            "total_value": result.total_value,
            "new_total_value": result.new_total_value(),
            "trades": trades,
        }),
    )
}

/// Convenience: log a store write.
pub fn log_portfolio_saved(audit: &mut AuditLog, name: &str, positions: usize) -> Result<()> {
    audit.log(
        "portfolio_saved",
        serde_json::json!({ "name": name, "positions": positions }),
    )
}

/// Convenience: log a store removal.
pub fn log_portfolio_deleted(audit: &mut AuditLog, name: &str) -> Result<()> {
    audit.log("portfolio_deleted", serde_json::json!({ "name": name }))
}
