//! # folio
//!
//! A deterministic portfolio rebalancing calculator.
//!
//! ## Features
//!
//! - **Five modes**: standard, add-only, sell-only, contribution, withdrawal
//! - **Cash flows never cross**: contributions only buy, withdrawals only sell
//! - **Validated boundary**: text input is parsed once into typed positions
//! - **Analysis**: asset-class grouping, health score, drift, model comparison,
//!   cost estimate
//! - **Pure**: every calculation is a function of its inputs, safe to call
//!   from any thread
//!
//! ## Quick Start
//!
//! ```
//! use folio::{Action, Mode, Position, calculate_rebalancing};
//!
//! let positions = vec![
//!     Position::new("VTI", 70_000.0, 60.0),
//!     Position::new("BND", 30_000.0, 40.0),
//! ];
//!
//! let result = calculate_rebalancing(&positions, Mode::Standard, 0.0);
//!
//! assert_eq!(result.total_value, 100_000.0);
//! assert_eq!(result.positions[0].action, Action::Sell);
//! assert_eq!(result.positions[0].difference, -10_000.0);
//! assert_eq!(result.positions[1].action, Action::Buy);
//! ```
//!
//! ## Cash Flows
//!
//! A contribution is spread across underweight positions and never sells:
//!
//! ```
//! use folio::{Mode, ModeData, Position, calculate_rebalancing};
//!
//! let positions = vec![
//!     Position::new("VTI", 70_000.0, 60.0),
//!     Position::new("BND", 30_000.0, 40.0),
//! ];
//!
//! let result = calculate_rebalancing(&positions, Mode::Contribution, 5_000.0);
//! assert!(result.sells().next().is_none());
//!
//! let ModeData::Contribution { total_allocated, .. } = result.mode_data else {
//!     unreachable!();
//! };
//! assert!((total_allocated - 5_000.0).abs() < 1e-6);
//! ```
//!
//! ## Validated Input
//!
//! User input usually arrives as text. [`RebalanceRequest`] checks targets,
//! totals, and the cash amount before the engine runs:
//!
//! ```
//! use folio::{InputError, Mode, RawPosition, RebalanceRequest};
//!
//! let raw = vec![
//!     RawPosition::new("VTI", "$60,000", "60"),
//!     RawPosition::new("BND", "40000", "30"),
//! ];
//! let err = RebalanceRequest::from_raw(&raw, Mode::Standard, 0.0).unwrap_err();
//! assert!(matches!(err, InputError::TargetSum { .. }));
//! ```
//!
//! ## Analysis
//!
//! ```
//! use folio::{Mode, Position, calculate_rebalancing, find_closest_model, group_by_asset_class};
//!
//! let positions = vec![
//!     Position::new("VTI", 60_000.0, 60.0),
//!     Position::new("VXUS", 30_000.0, 30.0),
//!     Position::new("BND", 10_000.0, 10.0),
//! ];
//! let result = calculate_rebalancing(&positions, Mode::Standard, 0.0);
//! let groups = group_by_asset_class(&result.positions);
//!
//! let closest = find_closest_model(&groups).unwrap();
//! assert_eq!(closest.model.key, "three-fund");
//! ```

pub mod asset_class;
pub mod cost;
mod engine;
mod error;
pub mod format;
pub mod health;
mod import;
mod input;
pub mod model;
mod result;
mod types;

// Re-export public API
pub use asset_class::{AssetClass, AssetClassGroup, asset_class_of, group_by_asset_class};
pub use cost::{CostAssumptions, CostEstimate, estimate_cost};
pub use engine::calculate_rebalancing;
pub use error::{ImportError, InputError, LineError, LineErrorKind, ParseModeError};
pub use health::{Drift, HealthScore, calculate_drift, calculate_portfolio_health};
pub use import::{parse_csv, parse_text};
pub use input::{
    MAX_TICKER_LEN, RebalanceRequest, TARGET_SUM_TOLERANCE, parse_amount, parse_percent,
    parse_positions, target_sum, validate_mode_amount, validate_targets,
};
pub use model::{
    ClosestModel, MODEL_PORTFOLIOS, ModelComparison, ModelPortfolio, compare_to_model,
    find_closest_model, generate_suggestions,
};
pub use result::{CalculatedPosition, ModeData, RebalancingResult, TRADE_TOLERANCE};
pub use types::{Action, Mode, Position, RawPosition};
