//! Reference model portfolios and comparison against a grouped plan.

use rustc_hash::FxHashMap;

use crate::asset_class::{AssetClass, AssetClassGroup};

/// Stock tilt (percentage points) beyond which a portfolio is called more
/// aggressive or conservative than its model.
const STOCK_TILT_THRESHOLD: f64 = 5.0;
/// Per-class and bond gap reported as over/underweight.
const CLASS_GAP_THRESHOLD: f64 = 10.0;

/// A named reference allocation by asset class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelPortfolio {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub risk_level: &'static str,
    pub allocations: &'static [(AssetClass, f64)],
}

impl ModelPortfolio {
    /// Model weight for a class, zero if absent.
    pub fn allocation(&self, class: AssetClass) -> f64 {
        self.allocations
            .iter()
            .find(|(c, _)| *c == class)
            .map_or(0.0, |(_, w)| *w)
    }
}

/// Built-in models, in the order ties are broken.
pub const MODEL_PORTFOLIOS: [ModelPortfolio; 5] = [
    ModelPortfolio {
        key: "60-40-classic",
        name: "60/40 Classic",
        description: "Traditional balanced portfolio",
        risk_level: "Moderate",
        allocations: &[(AssetClass::UsStocks, 60.0), (AssetClass::Bonds, 40.0)],
    },
    ModelPortfolio {
        key: "three-fund",
        name: "Three-Fund Portfolio",
        description: "Diversified global portfolio",
        risk_level: "Moderate",
        allocations: &[
            (AssetClass::UsStocks, 60.0),
            (AssetClass::InternationalStocks, 30.0),
            (AssetClass::Bonds, 10.0),
        ],
    },
    ModelPortfolio {
        key: "aggressive-growth",
        name: "Aggressive Growth",
        description: "High equity allocation",
        risk_level: "Aggressive",
        allocations: &[
            (AssetClass::UsStocks, 60.0),
            (AssetClass::InternationalStocks, 20.0),
            (AssetClass::Bonds, 20.0),
        ],
    },
    ModelPortfolio {
        key: "conservative",
        name: "Conservative",
        description: "Low risk, income focused",
        risk_level: "Conservative",
        allocations: &[
            (AssetClass::UsStocks, 25.0),
            (AssetClass::InternationalStocks, 15.0),
            (AssetClass::Bonds, 60.0),
        ],
    },
    ModelPortfolio {
        key: "moderate",
        name: "Moderate",
        description: "Balanced growth and income",
        risk_level: "Moderate",
        allocations: &[
            (AssetClass::UsStocks, 42.0),
            (AssetClass::InternationalStocks, 18.0),
            (AssetClass::Bonds, 40.0),
        ],
    },
];

/// Find a built-in model by key.
pub fn model_by_key(key: &str) -> Option<&'static ModelPortfolio> {
    MODEL_PORTFOLIOS.iter().find(|m| m.key == key)
}

/// A plan's allocation next to a model's.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelComparison {
    pub model: &'static ModelPortfolio,
    /// `(class, user %, model %, user - model)` over the union of classes,
    /// user classes first in group order, then model-only classes.
    pub rows: Vec<ComparisonRow>,
    /// User stocks minus model stocks (US + International).
    pub stocks_diff: f64,
    pub bonds_diff: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComparisonRow {
    pub asset_class: AssetClass,
    pub user: f64,
    pub model: f64,
    pub difference: f64,
}

impl ModelComparison {
    /// Sum of absolute per-class differences.
    pub fn total_difference(&self) -> f64 {
        self.rows.iter().map(|r| r.difference.abs()).sum()
    }
}

fn user_allocations(groups: &[AssetClassGroup]) -> FxHashMap<AssetClass, f64> {
    groups
        .iter()
        .map(|g| (g.asset_class, g.current_percent))
        .collect()
}

fn stocks(alloc: impl Fn(AssetClass) -> f64) -> f64 {
    AssetClass::ALL
        .into_iter()
        .filter(|c| c.is_stock())
        .map(alloc)
        .sum()
}

/// Compare grouped positions to the model named `key`.
///
/// Returns `None` for an unknown key.
pub fn compare_to_model(groups: &[AssetClassGroup], key: &str) -> Option<ModelComparison> {
    let model = model_by_key(key)?;
    Some(compare(groups, model))
}

fn compare(groups: &[AssetClassGroup], model: &'static ModelPortfolio) -> ModelComparison {
    let user = user_allocations(groups);
    let user_of = |c: AssetClass| user.get(&c).copied().unwrap_or(0.0);

    let mut classes: Vec<AssetClass> = groups.iter().map(|g| g.asset_class).collect();
    for &(class, _) in model.allocations {
        if !classes.contains(&class) {
            classes.push(class);
        }
    }

    let rows = classes
        .into_iter()
        .map(|class| {
            let u = user_of(class);
            let m = model.allocation(class);
            ComparisonRow {
                asset_class: class,
                user: u,
                model: m,
                difference: u - m,
            }
        })
        .collect();

    ModelComparison {
        model,
        rows,
        stocks_diff: stocks(user_of) - stocks(|c| model.allocation(c)),
        bonds_diff: user_of(AssetClass::Bonds) - model.allocation(AssetClass::Bonds),
    }
}

/// Human-readable observations about a comparison.
///
/// Always returns at least one line.
pub fn generate_suggestions(cmp: &ModelComparison) -> Vec<String> {
    let name = cmp.model.name;
    let mut out = Vec::new();

    if cmp.stocks_diff.abs() > STOCK_TILT_THRESHOLD {
        let (tilt, dir) = if cmp.stocks_diff > 0.0 {
            ("aggressive", "higher")
        } else {
            ("conservative", "lower")
        };
        out.push(format!(
            "Your portfolio is {:.1}% more {tilt} than {name} ({dir} stock allocation)",
            cmp.stocks_diff.abs()
        ));
    }

    for row in &cmp.rows {
        if row.difference.abs() > CLASS_GAP_THRESHOLD {
            let weight = if row.difference > 0.0 {
                "overweight"
            } else {
                "underweight"
            };
            out.push(format!(
                "You're {weight} {} by {:.1}% compared to {name}",
                row.asset_class,
                row.difference.abs()
            ));
        }
    }

    if cmp.bonds_diff.abs() > CLASS_GAP_THRESHOLD {
        let gap = cmp.bonds_diff.abs();
        if cmp.bonds_diff > 0.0 {
            out.push(format!(
                "You have {gap:.1}% more bonds than {name}, providing more stability but potentially lower returns"
            ));
        } else {
            out.push(format!(
                "You have {gap:.1}% fewer bonds than {name}, increasing growth potential but also volatility"
            ));
        }
    }

    if out.is_empty() {
        out.push(format!("Your portfolio closely matches the {name} allocation"));
    }
    out
}

/// The nearest model to a grouped plan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosestModel {
    pub model: &'static ModelPortfolio,
    /// Total absolute per-class difference.
    pub difference: f64,
}

/// Model with the smallest total absolute difference; earlier models win ties.
pub fn find_closest_model(groups: &[AssetClassGroup]) -> Option<ClosestModel> {
    let mut best: Option<ClosestModel> = None;
    for model in &MODEL_PORTFOLIOS {
        let difference = compare(groups, model).total_difference();
        if best.is_none_or(|b| difference < b.difference) {
            best = Some(ClosestModel { model, difference });
        }
    }
    best
}
