//! Command implementations.
//!
//! Each command returns the text to print so the binary stays a thin
//! dispatcher and tests can check the output.

use std::io::IsTerminal;

use folio::{
    Mode, RebalanceRequest, RebalancingResult, calculate_drift, calculate_portfolio_health,
    compare_to_model, estimate_cost, find_closest_model, generate_suggestions,
    group_by_asset_class,
};

use crate::audit::{self, AuditLog};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::portfolio_file::{self, LoadedPortfolio};
use crate::report::{
    ClosestLine, ComparisonReport, CostLine, GroupTable, HealthReport, ModelTable, PlanReport,
    SavedDetail, SavedList,
};
use crate::store::{PortfolioStore, SaveOutcome};

/// Options for `calc`.
#[derive(Debug, Clone, Default)]
pub struct CalcOptions {
    /// Path or `@saved-name`.
    pub portfolio: String,
    /// Falls back to the configured default mode.
    pub mode: Option<Mode>,
    pub amount: f64,
    pub group: bool,
    pub json: bool,
}

fn store(config: &Config) -> PortfolioStore {
    PortfolioStore::new(config.store_path(), config.storage.max_portfolios)
}

fn load(config: &Config, portfolio: &str) -> Result<LoadedPortfolio> {
    portfolio_file::load(portfolio, &store(config))
}

/// Validate and run the engine on a loaded portfolio.
fn compute(
    loaded: &LoadedPortfolio,
    mode: Mode,
    amount: f64,
) -> Result<RebalancingResult> {
    let request = RebalanceRequest::new(loaded.positions.clone(), mode, amount).inspect_err(
        |e| log::warn!("portfolio \"{}\" rejected: {e}", loaded.name),
    )?;
    let result = request.calculate();
    for pos in &result.positions {
        log::debug!(
            "{}: {:.2} -> {:.2} ({})",
            pos.ticker,
            pos.current_amount,
            pos.target_amount,
            pos.action
        );
    }
    Ok(result)
}

/// Full plan: positions, mode summary, groups, health, drift and cost.
pub fn calc(config: &Config, opts: &CalcOptions) -> Result<String> {
    let loaded = load(config, &opts.portfolio)?;
    let mode = opts.mode.unwrap_or(config.defaults.mode);

    let mut audit = AuditLog::open(&config.audit_path())?;
    audit::log_calc_started(&mut audit, &loaded.name, mode, opts.amount)?;

    let result = compute(&loaded, mode, opts.amount)?;
    audit::log_result(&mut audit, &result)?;
    log::info!(
        "calculated {} plan for \"{}\" ({} positions)",
        mode,
        loaded.name,
        result.positions.len()
    );

    let groups = group_by_asset_class(&result.positions);
    let health = calculate_portfolio_health(&result.positions);
    let drift = calculate_drift(&result.positions);
    let cost = estimate_cost(&result, &config.cost_assumptions());

    if opts.json {
        let mut doc = serde_json::json!({
            "name": loaded.name,
            "result": result,
            "health": health,
            "drift": drift,
            "cost": cost,
        });
        if opts.group {
            doc["groups"] = serde_json::json!(groups);
        }
        return serde_json::to_string_pretty(&doc).map_err(Error::Render);
    }

    let mut out = PlanReport {
        name: &loaded.name,
        result: &result,
    }
    .to_string();
    if opts.group {
        out += &format!("\n{}", GroupTable(&groups));
    }
    let report = HealthReport {
        health: &health,
        drift: &drift,
    };
    out += &format!("\n{report}{}", CostLine(&cost));
    Ok(out)
}

/// Health score and drift only.
pub fn health(config: &Config, portfolio: &str) -> Result<String> {
    let loaded = load(config, portfolio)?;
    let result = compute(&loaded, Mode::Standard, 0.0)?;
    Ok(HealthReport {
        health: &calculate_portfolio_health(&result.positions),
        drift: &calculate_drift(&result.positions),
    }
    .to_string())
}

/// Compare against `model`, or against the closest model when `None`.
pub fn compare(config: &Config, portfolio: &str, model: Option<&str>) -> Result<String> {
    let loaded = load(config, portfolio)?;
    let result = compute(&loaded, Mode::Standard, 0.0)?;
    let groups = group_by_asset_class(&result.positions);

    let mut out = String::new();
    let key = match model {
        Some(key) => key.to_string(),
        None => {
            let closest =
                find_closest_model(&groups).ok_or_else(|| Error::UnknownModel("none".into()))?;
            out += &format!("{}\n", ClosestLine(&closest));
            closest.model.key.to_string()
        }
    };

    let cmp = compare_to_model(&groups, &key).ok_or_else(|| Error::UnknownModel(key.clone()))?;
    let suggestions = generate_suggestions(&cmp);
    out += &ComparisonReport {
        comparison: &cmp,
        suggestions: &suggestions,
    }
    .to_string();
    Ok(out)
}

pub fn models() -> String {
    ModelTable.to_string()
}

/// Ask before a destructive action unless `force` is set.
fn confirm(prompt: &str, force: bool) -> Result<()> {
    if force {
        return Ok(());
    }
    if !std::io::stdin().is_terminal() {
        log::warn!("cannot ask \"{prompt}\" without a terminal");
        return Err(Error::Aborted("no terminal to confirm; pass --force".into()));
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| Error::Aborted(format!("confirmation prompt failed: {e}")))?;
    if confirmed {
        Ok(())
    } else {
        Err(Error::Aborted("nothing changed".into()))
    }
}

/// Validate a portfolio file and store it under `name`.
pub fn save(config: &Config, name: &str, portfolio: &str, force: bool) -> Result<String> {
    let name = name.trim();
    let store = store(config);
    let loaded = load(config, portfolio)?;
    // saved portfolios must be calculable as-is
    RebalanceRequest::new(loaded.positions.clone(), Mode::Standard, 0.0)?;

    if store.contains(name) {
        confirm(&format!("Overwrite saved portfolio \"{name}\"?"), force)?;
    }
    let outcome = store.save(name, &loaded.positions)?;

    let mut audit = AuditLog::open(&config.audit_path())?;
    audit::log_portfolio_saved(&mut audit, name, loaded.positions.len())?;

    Ok(match outcome {
        SaveOutcome::Created => format!("Saved \"{name}\" ({} positions).", loaded.positions.len()),
        SaveOutcome::Replaced => format!("Replaced \"{name}\" ({} positions).", loaded.positions.len()),
    })
}

pub fn list(config: &Config) -> String {
    let store = store(config);
    SavedList {
        entries: &store.list(),
        max: store.max_portfolios(),
    }
    .to_string()
}

pub fn show(config: &Config, name: &str) -> Result<String> {
    let entry = store(config)
        .get(name)
        .ok_or_else(|| Error::NotFound(name.to_string()))?;
    Ok(SavedDetail(&entry).to_string())
}

/// Remove a saved portfolio. A missing name is reported, not an error.
pub fn delete(config: &Config, name: &str, force: bool) -> Result<String> {
    let name = name.trim();
    let store = store(config);
    if !store.contains(name) {
        return Ok(format!("No saved portfolio named \"{name}\"."));
    }
    confirm(&format!("Delete saved portfolio \"{name}\"?"), force)?;

    if store.delete(name)? {
        let mut audit = AuditLog::open(&config.audit_path())?;
        audit::log_portfolio_deleted(&mut audit, name)?;
    }
    Ok(format!("Deleted \"{name}\"."))
}
