//! Plain-text tables for terminal output.
//!
//! Each report is a borrowed view with a `Display` impl, so commands can
//! format it into their output and tests can inspect the text.

use std::fmt;

use folio::format::{format_currency, format_percent};
use folio::{
    AssetClassGroup, ClosestModel, CostEstimate, Drift, HealthScore, MODEL_PORTFOLIOS,
    ModeData, ModelComparison, RebalancingResult, TRADE_TOLERANCE,
};

use crate::store::SavedPortfolio;

/// Per-position plan plus the mode summary.
pub struct PlanReport<'a> {
    pub name: &'a str,
    pub result: &'a RebalancingResult,
}

fn mode_summary(mode_data: &ModeData) -> Option<String> {
    match *mode_data {
        ModeData::AddOnly {
            total_to_add,
            new_total_value,
        } => Some(format!(
            "Add {} -> new total {}",
            format_currency(total_to_add),
            format_currency(new_total_value)
        )),
        ModeData::SellOnly {
            total_to_sell,
            new_total_value,
        } => Some(format!(
            "Sell {} -> new total {}",
            format_currency(total_to_sell),
            format_currency(new_total_value)
        )),
        ModeData::Contribution {
            contribution_amount,
            new_total_value,
            total_allocated,
        } => Some(format!(
            "Contribute {} ({} allocated) -> new total {}",
            format_currency(contribution_amount),
            format_currency(total_allocated),
            format_currency(new_total_value)
        )),
        ModeData::Withdrawal {
            withdrawal_amount,
            new_total_value,
            total_sold,
        } => Some(format!(
            "Withdraw {} ({} sold) -> new total {}",
            format_currency(withdrawal_amount),
            format_currency(total_sold),
            format_currency(new_total_value)
        )),
        ModeData::None {} => None,
    }
}

impl fmt::Display for PlanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        writeln!(
            f,
            "{}: {} total, mode {}",
            self.name,
            format_currency(result.total_value),
            result.mode
        )?;
        writeln!(f, "\nREBALANCING PLAN:")?;
        writeln!(
            f,
            "  {:8} {:>14} {:>9} {:>9} {:>14} {:>14}  {}",
            "Ticker", "Current", "Cur %", "Target %", "Target", "Difference", "Action"
        )?;

        for pos in &result.positions {
            write!(
                f,
                "  {:8} {:>14} {:>9} {:>9} {:>14} {:>14}  {}",
                pos.ticker,
                format_currency(pos.current_amount),
                format_percent(pos.current_percent),
                format_percent(pos.target_percent),
                format_currency(pos.target_amount),
                format_currency(pos.difference),
                pos.action,
            )?;
            if let (Some(amount), Some(pct)) = (pos.new_amount, pos.new_percent) {
                write!(
                    f,
                    "  -> {} ({})",
                    format_currency(amount),
                    format_percent(pct)
                )?;
            }
            writeln!(f)?;
        }

        if let Some(summary) = mode_summary(&result.mode_data) {
            writeln!(f, "\n{summary}")?;
        }

        let trades = result.trade_count(TRADE_TOLERANCE);
        if trades == 0 {
            writeln!(f, "\nNo rebalancing needed: portfolio matches target.")
        } else {
            writeln!(
                f,
                "\n{trades} trade(s): {} buy, {} sell",
                result
                    .buys()
                    .filter(|p| p.is_actionable(TRADE_TOLERANCE))
                    .count(),
                result
                    .sells()
                    .filter(|p| p.is_actionable(TRADE_TOLERANCE))
                    .count(),
            )
        }
    }
}

/// Asset-class rollup.
pub struct GroupTable<'a>(pub &'a [AssetClassGroup]);

impl fmt::Display for GroupTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ASSET CLASSES:")?;
        for g in self.0 {
            writeln!(
                f,
                "  {:22} {:>9} -> {:>9} {:>14}  {:4}  [{}]",
                g.asset_class.name(),
                format_percent(g.current_percent),
                format_percent(g.target_percent),
                format_currency(g.difference),
                g.action.to_string(),
                g.tickers.join(", "),
            )?;
        }
        Ok(())
    }
}

/// Health score, issues and drift.
pub struct HealthReport<'a> {
    pub health: &'a HealthScore,
    pub drift: &'a Drift,
}

impl fmt::Display for HealthReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let health = self.health;
        writeln!(
            f,
            "HEALTH: {}/100 ({}, {})",
            health.score, health.rating, health.color
        )?;
        for issue in &health.issues {
            writeln!(f, "  - {issue}")?;
        }
        writeln!(
            f,
            "DRIFT: {} ({})",
            format_percent(self.drift.percentage),
            self.drift.status
        )
    }
}

pub struct CostLine<'a>(pub &'a CostEstimate);

impl fmt::Display for CostLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Est. cost: {}", self.0)
    }
}

/// Side-by-side allocation against a model, with suggestions.
pub struct ComparisonReport<'a> {
    pub comparison: &'a ModelComparison,
    pub suggestions: &'a [String],
}

impl fmt::Display for ComparisonReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let model = self.comparison.model;
        writeln!(
            f,
            "COMPARED TO {} ({}, {}):",
            model.name, model.risk_level, model.description
        )?;
        writeln!(
            f,
            "  {:22} {:>9} {:>9} {:>9}",
            "Asset class", "Yours", "Model", "Diff"
        )?;
        for row in &self.comparison.rows {
            writeln!(
                f,
                "  {:22} {:>9} {:>9} {:>9}",
                row.asset_class.name(),
                format_percent(row.user),
                format_percent(row.model),
                format_percent(row.difference),
            )?;
        }
        writeln!(f)?;
        for s in self.suggestions {
            writeln!(f, "  * {s}")?;
        }
        Ok(())
    }
}

pub struct ClosestLine<'a>(pub &'a ClosestModel);

impl fmt::Display for ClosestLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Closest model: {} ({}), total difference {}",
            self.0.model.name,
            self.0.model.key,
            format_percent(self.0.difference)
        )
    }
}

/// Built-in model portfolios.
pub struct ModelTable;

impl fmt::Display for ModelTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MODEL PORTFOLIOS:")?;
        for m in &MODEL_PORTFOLIOS {
            let allocation: Vec<String> = m
                .allocations
                .iter()
                .map(|(class, w)| format!("{class} {w:.0}%"))
                .collect();
            writeln!(
                f,
                "  {:18} {:22} {:12} {}",
                m.key,
                m.name,
                m.risk_level,
                allocation.join(" / ")
            )?;
        }
        Ok(())
    }
}

/// Saved-portfolio listing.
pub struct SavedList<'a> {
    pub entries: &'a [SavedPortfolio],
    pub max: usize,
}

impl fmt::Display for SavedList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return writeln!(f, "No saved portfolios.");
        }
        writeln!(f, "SAVED PORTFOLIOS ({}/{}):", self.entries.len(), self.max)?;
        for e in self.entries {
            writeln!(
                f,
                "  {:20} {:>3} positions  saved {}",
                e.name,
                e.positions.len(),
                e.saved_at.format("%Y-%m-%d %H:%M UTC"),
            )?;
        }
        Ok(())
    }
}

/// One saved portfolio's positions as stored.
pub struct SavedDetail<'a>(pub &'a SavedPortfolio);

impl fmt::Display for SavedDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entry = self.0;
        writeln!(
            f,
            "{} (saved {}):",
            entry.name,
            entry.saved_at.format("%Y-%m-%d %H:%M UTC")
        )?;
        for p in &entry.positions {
            writeln!(
                f,
                "  {:8} {:>14} {:>8}%",
                p.ticker, p.amount, p.target_percent
            )?;
        }
        Ok(())
    }
}
