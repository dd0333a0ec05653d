//! Ticker → asset class mapping and grouped views of a plan.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::result::CalculatedPosition;
use crate::types::Action;

/// Coarse category a ticker belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AssetClass {
    #[cfg_attr(feature = "serde", serde(rename = "US Stocks"))]
    UsStocks,
    #[cfg_attr(feature = "serde", serde(rename = "International Stocks"))]
    InternationalStocks,
    Bonds,
    #[cfg_attr(feature = "serde", serde(rename = "Gold/Commodities"))]
    GoldCommodities,
    Cash,
    #[cfg_attr(feature = "serde", serde(rename = "Real Estate"))]
    RealEstate,
    Other,
}

/// Chart color for names that are not an asset class.
pub const FALLBACK_COLOR: &str = "#9CA3AF";

impl AssetClass {
    pub const ALL: [AssetClass; 7] = [
        AssetClass::UsStocks,
        AssetClass::InternationalStocks,
        AssetClass::Bonds,
        AssetClass::GoldCommodities,
        AssetClass::Cash,
        AssetClass::RealEstate,
        AssetClass::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AssetClass::UsStocks => "US Stocks",
            AssetClass::InternationalStocks => "International Stocks",
            AssetClass::Bonds => "Bonds",
            AssetClass::GoldCommodities => "Gold/Commodities",
            AssetClass::Cash => "Cash",
            AssetClass::RealEstate => "Real Estate",
            AssetClass::Other => "Other",
        }
    }

    /// Look up a class by its display name.
    pub fn from_name(name: &str) -> Option<Self> {
        AssetClass::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Stable hex color for charts.
    pub fn color(self) -> &'static str {
        match self {
            AssetClass::UsStocks => "#3B82F6",
            AssetClass::InternationalStocks => "#8B5CF6",
            AssetClass::Bonds => "#10B981",
            AssetClass::GoldCommodities => "#F59E0B",
            AssetClass::Cash => "#6B7280",
            AssetClass::RealEstate => "#EF4444",
            AssetClass::Other => "#EC4899",
        }
    }

    #[inline]
    pub fn is_stock(self) -> bool {
        matches!(self, AssetClass::UsStocks | AssetClass::InternationalStocks)
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map a ticker (any case) to its asset class; unknown tickers are `Other`.
pub fn asset_class_of(ticker: &str) -> AssetClass {
    match ticker.trim().to_ascii_uppercase().as_str() {
        "VTI" | "VOO" | "SPY" | "VTSAX" | "VT" | "VTSMX" | "SCHB" | "ITOT" | "IVV" | "VUG"
        | "VTV" => AssetClass::UsStocks,
        "VXUS" | "VTIAX" | "VEU" | "VGTSX" | "IXUS" | "SCHF" | "VWO" | "VWILX" | "IEMG" => {
            AssetClass::InternationalStocks
        }
        "BND" | "AGG" | "VBTLX" | "VBMFX" | "BIV" | "VCIT" | "VCLT" | "TLT" | "IEF" | "SHY"
        | "VGIT" | "VGLT" => AssetClass::Bonds,
        "GLD" | "IAU" | "GLDM" | "SLV" | "DBC" | "GSG" => AssetClass::GoldCommodities,
        "CASH" | "VMFXX" | "VMMXX" | "SPAXX" | "FDRXX" => AssetClass::Cash,
        "VNQ" | "VGSLX" | "REIT" | "SCHH" | "IYR" => AssetClass::RealEstate,
        _ => AssetClass::Other,
    }
}

/// Chart color for an asset class given by display name.
///
/// Same name, same color, every call. Unrecognized names get [`FALLBACK_COLOR`].
pub fn asset_class_color(name: &str) -> &'static str {
    AssetClass::from_name(name).map_or(FALLBACK_COLOR, AssetClass::color)
}

/// Plan positions aggregated by asset class.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AssetClassGroup {
    pub asset_class: AssetClass,
    /// Member tickers in input order.
    pub tickers: Vec<String>,
    pub current_amount: f64,
    pub current_percent: f64,
    pub target_percent: f64,
    pub target_amount: f64,
    pub difference: f64,
    /// Derived from the summed difference, not from member actions.
    pub action: Action,
    pub positions: Vec<CalculatedPosition>,
}

impl AssetClassGroup {
    fn new(asset_class: AssetClass) -> Self {
        Self {
            asset_class,
            tickers: Vec::new(),
            current_amount: 0.0,
            current_percent: 0.0,
            target_percent: 0.0,
            target_amount: 0.0,
            difference: 0.0,
            action: Action::Hold,
            positions: Vec::new(),
        }
    }

    fn add(&mut self, pos: &CalculatedPosition) {
        self.tickers.push(pos.ticker.clone());
        self.current_amount += pos.current_amount;
        self.current_percent += pos.current_percent;
        self.target_percent += pos.target_percent;
        self.target_amount += pos.target_amount;
        self.difference += pos.difference;
        self.positions.push(pos.clone());
    }
}

/// Aggregate plan positions by asset class, largest current holding first.
///
/// Percentages are summed directly; they already share one denominator.
pub fn group_by_asset_class(positions: &[CalculatedPosition]) -> Vec<AssetClassGroup> {
    let mut index: FxHashMap<AssetClass, usize> = FxHashMap::default();
    let mut groups: Vec<AssetClassGroup> = Vec::new();

    for pos in positions {
        let class = asset_class_of(&pos.ticker);
        let slot = *index.entry(class).or_insert_with(|| {
            groups.push(AssetClassGroup::new(class));
            groups.len() - 1
        });
        groups[slot].add(pos);
    }

    for group in &mut groups {
        group.action = Action::from_difference(group.difference);
    }

    // stable: ties keep first-seen order
    groups.sort_by(|a, b| b.current_amount.total_cmp(&a.current_amount));
    groups
}

/// Distinct asset classes present, sorted by display name.
pub fn unique_asset_classes(positions: &[CalculatedPosition]) -> Vec<AssetClass> {
    let mut classes: Vec<AssetClass> = positions
        .iter()
        .map(|p| asset_class_of(&p.ticker))
        .collect();
    classes.sort_by_key(|c| c.name());
    classes.dedup();
    classes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(ticker: &str, current: f64, pct: f64, target: f64, diff: f64) -> CalculatedPosition {
        CalculatedPosition {
            ticker: ticker.into(),
            current_amount: current,
            current_percent: pct,
            target_percent: target,
            target_amount: current + diff,
            difference: diff,
            action: Action::from_difference(diff),
            new_amount: None,
            new_percent: None,
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(asset_class_of("vti"), AssetClass::UsStocks);
        assert_eq!(asset_class_of("Vxus"), AssetClass::InternationalStocks);
        assert_eq!(asset_class_of("TLT"), AssetClass::Bonds);
        assert_eq!(asset_class_of("gldm"), AssetClass::GoldCommodities);
        assert_eq!(asset_class_of("SPAXX"), AssetClass::Cash);
        assert_eq!(asset_class_of("VNQ"), AssetClass::RealEstate);
        assert_eq!(asset_class_of("AAPL"), AssetClass::Other);
    }

    #[test]
    fn only_equity_classes_are_stocks() {
        let stocks: Vec<_> = AssetClass::ALL.into_iter().filter(|c| c.is_stock()).collect();
        assert_eq!(
            stocks,
            vec![AssetClass::UsStocks, AssetClass::InternationalStocks]
        );
    }

    #[test]
    fn colors_are_deterministic() {
        for class in AssetClass::ALL {
            assert_eq!(asset_class_color(class.name()), class.color());
            assert_eq!(asset_class_color(class.name()), asset_class_color(class.name()));
        }
        assert_eq!(asset_class_color("Crypto"), FALLBACK_COLOR);
    }

    #[test]
    fn groups_sum_members_and_rederive_action() {
        let positions = vec![
            calc("VTI", 30_000.0, 50.0, 40.0, -6_000.0),
            calc("BND", 20_000.0, 33.3, 40.0, 4_000.0),
            calc("VOO", 10_000.0, 16.7, 20.0, 2_000.0),
        ];
        let groups = group_by_asset_class(&positions);

        assert_eq!(groups.len(), 2);
        let us = &groups[0];
        assert_eq!(us.asset_class, AssetClass::UsStocks);
        assert_eq!(us.tickers, vec!["VTI", "VOO"]);
        assert_eq!(us.current_amount, 40_000.0);
        assert!((us.current_percent - 66.7).abs() < 1e-9);
        assert_eq!(us.target_percent, 60.0);
        assert_eq!(us.difference, -4_000.0);
        // VOO alone is a buy, the class as a whole sells
        assert_eq!(us.action, Action::Sell);
        assert_eq!(us.positions.len(), 2);
    }

    #[test]
    fn groups_sorted_by_current_amount_descending() {
        let positions = vec![
            calc("CASH", 1_000.0, 10.0, 10.0, 0.0),
            calc("BND", 5_000.0, 50.0, 50.0, 0.0),
            calc("AAPL", 4_000.0, 40.0, 40.0, 0.0),
        ];
        let groups = group_by_asset_class(&positions);
        let order: Vec<AssetClass> = groups.iter().map(|g| g.asset_class).collect();

        assert_eq!(
            order,
            vec![AssetClass::Bonds, AssetClass::Other, AssetClass::Cash]
        );
        assert!(groups.iter().all(|g| g.action == Action::Hold));
    }

    #[test]
    fn ties_keep_input_order() {
        let positions = vec![
            calc("GLD", 100.0, 50.0, 50.0, 0.0),
            calc("VNQ", 100.0, 50.0, 50.0, 0.0),
        ];
        let groups = group_by_asset_class(&positions);
        assert_eq!(groups[0].asset_class, AssetClass::GoldCommodities);
        assert_eq!(groups[1].asset_class, AssetClass::RealEstate);
    }

    #[test]
    fn empty_input_has_no_groups() {
        assert!(group_by_asset_class(&[]).is_empty());
    }

    #[test]
    fn unique_classes_sorted_by_name() {
        let positions = vec![
            calc("VTI", 1.0, 1.0, 1.0, 0.0),
            calc("BND", 1.0, 1.0, 1.0, 0.0),
            calc("VOO", 1.0, 1.0, 1.0, 0.0),
            calc("CASH", 1.0, 1.0, 1.0, 0.0),
        ];
        assert_eq!(
            unique_asset_classes(&positions),
            vec![AssetClass::Bonds, AssetClass::Cash, AssetClass::UsStocks]
        );
    }
}
