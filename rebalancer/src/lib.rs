//! folio-rebalancer: command-line front end for the folio rebalancing engine.
//!
//! Loads a portfolio from a JSON, CSV or text file (or a saved name),
//! validates it, computes a plan in the requested mode and prints it with
//! health, drift, model comparison and a cost estimate. Saved portfolios
//! live in a small JSON store; every calculation and store change is
//! appended to a JSONL audit trail.

pub mod audit;
pub mod commands;
pub mod config;
pub mod error;
pub mod portfolio_file;
pub mod report;
pub mod store;
