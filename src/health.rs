//! Portfolio health score and drift classification.
//!
//! Both are pure functions of each position's current and target percent.

use std::fmt;

use crate::result::CalculatedPosition;

/// Display bucket shared by health ratings and drift statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StatusColor {
    Green,
    Blue,
    Yellow,
    Red,
}

impl fmt::Display for StatusColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusColor::Green => write!(f, "green"),
            StatusColor::Blue => write!(f, "blue"),
            StatusColor::Yellow => write!(f, "yellow"),
            StatusColor::Red => write!(f, "red"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealthRating {
    Excellent,
    Good,
    Fair,
    #[cfg_attr(feature = "serde", serde(rename = "Needs Attention"))]
    NeedsAttention,
}

impl HealthRating {
    fn from_score(score: u8) -> Self {
        match score {
            90.. => HealthRating::Excellent,
            70..=89 => HealthRating::Good,
            50..=69 => HealthRating::Fair,
            _ => HealthRating::NeedsAttention,
        }
    }

    pub fn color(self) -> StatusColor {
        match self {
            HealthRating::Excellent => StatusColor::Green,
            HealthRating::Good => StatusColor::Blue,
            HealthRating::Fair => StatusColor::Yellow,
            HealthRating::NeedsAttention => StatusColor::Red,
        }
    }
}

impl fmt::Display for HealthRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthRating::Excellent => write!(f, "Excellent"),
            HealthRating::Good => write!(f, "Good"),
            HealthRating::Fair => write!(f, "Fair"),
            HealthRating::NeedsAttention => write!(f, "Needs Attention"),
        }
    }
}

/// 0-100 composite score with one issue per applied penalty.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthScore {
    pub score: u8,
    pub issues: Vec<String>,
    pub rating: HealthRating,
    pub color: StatusColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DriftStatus {
    Minimal,
    Moderate,
    Significant,
    High,
}

impl fmt::Display for DriftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriftStatus::Minimal => write!(f, "Minimal"),
            DriftStatus::Moderate => write!(f, "Moderate"),
            DriftStatus::Significant => write!(f, "Significant"),
            DriftStatus::High => write!(f, "High"),
        }
    }
}

/// Aggregate allocation drift in percentage points.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drift {
    pub percentage: f64,
    pub status: DriftStatus,
    pub color: StatusColor,
}

/// `Σ|current - target| / 2`.
///
/// Halved because with both sides summing to 100 every overweight point is
/// matched by an underweight point elsewhere.
pub fn total_drift(positions: &[CalculatedPosition]) -> f64 {
    positions
        .iter()
        .map(|p| (p.current_percent - p.target_percent).abs())
        .sum::<f64>()
        / 2.0
}

/// Score a plan's positions for concentration, drift and diversification.
///
/// Penalties stack: concentration (up to 30), drift (5, 15 or 25) and
/// position count (20 below three positions, 10 above twenty).
pub fn calculate_portfolio_health(positions: &[CalculatedPosition]) -> HealthScore {
    let mut score = 100.0_f64;
    let mut issues = Vec::new();

    let max_position = positions
        .iter()
        .map(|p| p.current_percent)
        .fold(f64::NEG_INFINITY, f64::max);
    if max_position > 70.0 {
        score -= ((max_position - 70.0) * 2.0).min(30.0);
        issues.push(format!(
            "High concentration: {max_position:.1}% in one position"
        ));
    } else if max_position > 50.0 {
        score -= (max_position - 50.0).min(15.0);
        issues.push("Moderate concentration in top position".to_string());
    }

    let drift = total_drift(positions);
    if drift > 20.0 {
        score -= 25.0;
        issues.push(format!("High portfolio drift: {drift:.1}%"));
    } else if drift > 10.0 {
        score -= 15.0;
        issues.push(format!("Moderate portfolio drift: {drift:.1}%"));
    } else if drift > 5.0 {
        score -= 5.0;
        issues.push(format!("Minor portfolio drift: {drift:.1}%"));
    }

    let count = positions.len();
    if count < 3 {
        score -= 20.0;
        let plural = if count == 1 { "" } else { "s" };
        issues.push(format!(
            "Low diversification: only {count} position{plural}"
        ));
    } else if count > 20 {
        score -= 10.0;
        issues.push(format!("Over-diversification: {count} positions"));
    }

    let score = score.round().clamp(0.0, 100.0) as u8;
    let rating = HealthRating::from_score(score);

    HealthScore {
        score,
        issues,
        rating,
        color: rating.color(),
    }
}

/// Classify total drift: under 5 minimal, under 10 moderate, under 20
/// significant, otherwise high.
pub fn calculate_drift(positions: &[CalculatedPosition]) -> Drift {
    let percentage = total_drift(positions);
    let (status, color) = if percentage < 5.0 {
        (DriftStatus::Minimal, StatusColor::Green)
    } else if percentage < 10.0 {
        (DriftStatus::Moderate, StatusColor::Yellow)
    } else if percentage < 20.0 {
        (DriftStatus::Significant, StatusColor::Red)
    } else {
        (DriftStatus::High, StatusColor::Red)
    };

    Drift {
        percentage,
        status,
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    fn at(current: f64, target: f64) -> CalculatedPosition {
        CalculatedPosition {
            ticker: "X".into(),
            current_amount: current,
            current_percent: current,
            target_percent: target,
            target_amount: target,
            difference: target - current,
            action: Action::from_difference(target - current),
            new_amount: None,
            new_percent: None,
        }
    }

    #[test]
    fn perfect_portfolio_scores_100() {
        let positions = vec![at(40.0, 40.0), at(35.0, 35.0), at(25.0, 25.0)];
        let health = calculate_portfolio_health(&positions);

        assert_eq!(health.score, 100);
        assert!(health.issues.is_empty());
        assert_eq!(health.rating, HealthRating::Excellent);
        assert_eq!(health.color, StatusColor::Green);
    }

    #[test]
    fn high_concentration_penalty_is_capped() {
        // 90% in one position: (90-70)*2 = 40 → capped at 30
        let positions = vec![at(90.0, 90.0), at(5.0, 5.0), at(5.0, 5.0)];
        let health = calculate_portfolio_health(&positions);

        assert_eq!(health.score, 70);
        assert_eq!(health.issues, vec!["High concentration: 90.0% in one position"]);
        assert_eq!(health.rating, HealthRating::Good);
        assert_eq!(health.color, StatusColor::Blue);
    }

    #[test]
    fn moderate_concentration() {
        let positions = vec![at(60.0, 60.0), at(20.0, 20.0), at(20.0, 20.0)];
        let health = calculate_portfolio_health(&positions);

        assert_eq!(health.score, 90);
        assert_eq!(health.issues, vec!["Moderate concentration in top position"]);
    }

    #[test]
    fn drift_tiers() {
        // drift 6 → minor
        let minor = vec![at(46.0, 40.0), at(29.0, 35.0), at(25.0, 25.0)];
        assert_eq!(calculate_portfolio_health(&minor).score, 95);

        // drift 12 → moderate
        let moderate = vec![at(47.0, 35.0), at(23.0, 35.0), at(30.0, 30.0)];
        let health = calculate_portfolio_health(&moderate);
        assert_eq!(health.score, 85);
        assert_eq!(health.issues, vec!["Moderate portfolio drift: 12.0%"]);

        // drift 25 → high
        let high = vec![at(45.0, 20.0), at(15.0, 40.0), at(40.0, 40.0)];
        let health = calculate_portfolio_health(&high);
        assert_eq!(health.score, 75);
        assert_eq!(health.issues, vec!["High portfolio drift: 25.0%"]);
    }

    #[test]
    fn penalties_stack() {
        // two positions, 80% concentration (-20), drift 30 (-25), count (-20)
        let positions = vec![at(80.0, 50.0), at(20.0, 50.0)];
        let health = calculate_portfolio_health(&positions);

        assert_eq!(health.score, 35);
        assert_eq!(health.issues.len(), 3);
        assert_eq!(health.issues[2], "Low diversification: only 2 positions");
        assert_eq!(health.rating, HealthRating::NeedsAttention);
        assert_eq!(health.color, StatusColor::Red);
    }

    #[test]
    fn single_position_wording() {
        let health = calculate_portfolio_health(&[at(100.0, 100.0)]);
        assert!(health.issues.contains(&"Low diversification: only 1 position".to_string()));
        // -30 concentration, -20 count
        assert_eq!(health.score, 50);
        assert_eq!(health.rating, HealthRating::Fair);
    }

    #[test]
    fn over_diversified() {
        let positions: Vec<_> = (0..25).map(|_| at(4.0, 4.0)).collect();
        let health = calculate_portfolio_health(&positions);
        assert_eq!(health.score, 90);
        assert_eq!(health.issues, vec!["Over-diversification: 25 positions"]);
    }

    #[test]
    fn empty_list_only_pays_diversification() {
        let health = calculate_portfolio_health(&[]);
        assert_eq!(health.score, 80);
        assert_eq!(health.issues, vec!["Low diversification: only 0 positions"]);
    }

    #[test]
    fn all_penalties_on_one_position() {
        let positions = vec![at(100.0, 0.0)];
        // -30 concentration, -25 drift, -20 count
        assert_eq!(calculate_portfolio_health(&positions).score, 25);
    }

    #[test]
    fn fractional_score_rounds() {
        // 55.4% top position → -5.4 → 94.6 → 95
        let positions = vec![at(55.4, 55.4), at(24.6, 24.6), at(20.0, 20.0)];
        assert_eq!(calculate_portfolio_health(&positions).score, 95);
    }

    #[test]
    fn drift_classification() {
        let d = calculate_drift(&[at(52.0, 50.0), at(48.0, 50.0)]);
        assert_eq!(d.percentage, 2.0);
        assert_eq!(d.status, DriftStatus::Minimal);
        assert_eq!(d.color, StatusColor::Green);

        let d = calculate_drift(&[at(57.0, 50.0), at(43.0, 50.0)]);
        assert_eq!(d.status, DriftStatus::Moderate);
        assert_eq!(d.color, StatusColor::Yellow);

        let d = calculate_drift(&[at(60.0, 50.0), at(40.0, 50.0)]);
        assert_eq!(d.status, DriftStatus::Significant);
        assert_eq!(d.color, StatusColor::Red);

        let d = calculate_drift(&[at(70.0, 50.0), at(30.0, 50.0)]);
        assert_eq!(d.status, DriftStatus::High);
        assert_eq!(d.color, StatusColor::Red);
    }
}
