//! Edge-case tests: adversarial inputs to every public API.

use folio::{
    Action, ImportError, InputError, Mode, ModeData, Position, RawPosition, RebalanceRequest,
    calculate_drift, calculate_portfolio_health, calculate_rebalancing, find_closest_model,
    group_by_asset_class, parse_csv, parse_positions, parse_text,
};

// ============================================================================
// Degenerate portfolios
// ============================================================================

#[test]
fn empty_positions() {
    let result = calculate_rebalancing(&[], Mode::Standard, 0.0);
    assert_eq!(result.total_value, 0.0);
    assert!(result.positions.is_empty());
    assert!(group_by_asset_class(&result.positions).is_empty());
    assert_eq!(calculate_drift(&result.positions).percentage, 0.0);
}

#[test]
fn zero_total_yields_nan_percentages_without_panicking() {
    let positions = vec![Position::new("VTI", 0.0, 100.0)];
    let result = calculate_rebalancing(&positions, Mode::Standard, 0.0);

    assert!(result.positions[0].current_percent.is_nan());
    assert_eq!(result.positions[0].difference, 0.0);
    assert_eq!(result.positions[0].action, Action::Hold);
}

#[test]
fn zero_total_contribution_spreads_by_target() {
    let positions = vec![
        Position::new("VTI", 0.0, 70.0),
        Position::new("BND", 0.0, 30.0),
    ];
    let result = calculate_rebalancing(&positions, Mode::Contribution, 1_000.0);

    assert!((result.positions[0].difference - 700.0).abs() < 1e-9);
    assert!((result.positions[1].difference - 300.0).abs() < 1e-9);
}

#[test]
fn single_position_portfolio() {
    let positions = vec![Position::new("VTI", 10_000.0, 100.0)];
    for mode in Mode::ALL {
        let result = calculate_rebalancing(&positions, mode, 0.0);
        assert_eq!(result.positions[0].action, Action::Hold, "mode {mode}");
    }
}

#[test]
fn zero_target_position_is_fully_sold() {
    let positions = vec![
        Position::new("VTI", 5_000.0, 100.0),
        Position::new("OLD", 5_000.0, 0.0),
    ];
    let result = calculate_rebalancing(&positions, Mode::Standard, 0.0);
    assert_eq!(result.positions[1].difference, -5_000.0);
    assert_eq!(result.positions[1].target_amount, 0.0);
}

#[test]
fn zero_target_position_receives_nothing_from_contribution() {
    let positions = vec![
        Position::new("VTI", 5_000.0, 100.0),
        Position::new("OLD", 5_000.0, 0.0),
    ];
    let result = calculate_rebalancing(&positions, Mode::Contribution, 500.0);
    assert_eq!(result.positions[1].difference, 0.0);
    assert_eq!(result.positions[1].action, Action::Hold);
}

#[test]
fn duplicate_tickers_are_independent_rows() {
    let positions = vec![
        Position::new("VTI", 1_000.0, 50.0),
        Position::new("VTI", 3_000.0, 50.0),
    ];
    let result = calculate_rebalancing(&positions, Mode::Standard, 0.0);
    assert_eq!(result.positions[0].action, Action::Buy);
    assert_eq!(result.positions[1].action, Action::Sell);

    let groups = group_by_asset_class(&result.positions);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].tickers, vec!["VTI", "VTI"]);
}

#[test]
fn huge_amounts_stay_finite() {
    let positions = vec![
        Position::new("VTI", 1e15, 50.0),
        Position::new("BND", 1e12, 50.0),
    ];
    let result = calculate_rebalancing(&positions, Mode::Contribution, 1e14);
    assert!(result.positions.iter().all(|p| p.difference.is_finite()));
    assert!(result.positions.iter().all(|p| p.difference >= 0.0));
}

// ============================================================================
// Cash-flow amounts
// ============================================================================

#[test]
fn non_positive_cash_amount_falls_back_to_standard() {
    let positions = vec![
        Position::new("VTI", 7_000.0, 60.0),
        Position::new("BND", 3_000.0, 40.0),
    ];
    for mode in [Mode::Contribution, Mode::Withdrawal] {
        for amount in [0.0, -100.0] {
            let result = calculate_rebalancing(&positions, mode, amount);
            assert_eq!(result.mode, mode);
            assert_eq!(result.mode_data, ModeData::None {});
            assert_eq!(result.positions[0].difference, -1_000.0);
            assert!(result.positions[0].new_amount.is_none());
        }
    }
}

#[test]
fn withdrawal_larger_than_portfolio_is_rejected_at_boundary() {
    let positions = vec![Position::new("VTI", 1_000.0, 100.0)];
    let err = RebalanceRequest::new(positions, Mode::Withdrawal, 1_000.0).unwrap_err();
    assert!(matches!(err, InputError::InsufficientFunds { .. }));
}

#[test]
fn nan_cash_amount_is_rejected_at_boundary() {
    let positions = vec![Position::new("VTI", 1_000.0, 100.0)];
    let err = RebalanceRequest::new(positions, Mode::Contribution, f64::NAN).unwrap_err();
    assert_eq!(
        err,
        InputError::MissingModeAmount {
            mode: Mode::Contribution
        }
    );
}

// ============================================================================
// Text input
// ============================================================================

#[test]
fn target_sum_errors_name_direction() {
    let raw = vec![
        RawPosition::new("VTI", "100", "60"),
        RawPosition::new("BND", "100", "50"),
    ];
    let err = RebalanceRequest::from_raw(&raw, Mode::Standard, 0.0).unwrap_err();
    assert!(err.to_string().contains("too high"), "{err}");

    let raw = vec![RawPosition::new("VTI", "100", "90")];
    let err = RebalanceRequest::from_raw(&raw, Mode::Standard, 0.0).unwrap_err();
    assert!(err.to_string().contains("too low"), "{err}");
}

#[test]
fn whitespace_only_rows_count_as_incomplete() {
    let raw = vec![
        RawPosition::new("  ", " ", "\t"),
        RawPosition::new("VTI", "1", "100"),
    ];
    assert_eq!(parse_positions(&raw).unwrap().len(), 1);
}

#[test]
fn unknown_mode_string_is_rejected() {
    assert!("rebalance".parse::<Mode>().is_err());
    assert_eq!(" Add-Only ".parse::<Mode>().unwrap(), Mode::AddOnly);
}

#[test]
fn import_of_blank_text() {
    assert_eq!(parse_csv("   \n\n").unwrap_err(), ImportError::Empty);
    assert_eq!(parse_text("").unwrap_err(), ImportError::Empty);
}

#[test]
fn import_error_lists_every_line() {
    let err = parse_text("VTI 100\nBND abc 30\nGLD 10 10").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Line 1:"), "{message}");
    assert!(message.contains("Line 2:"), "{message}");
    assert!(!message.contains("Line 3:"), "{message}");
}

// ============================================================================
// Analysis
// ============================================================================

#[test]
fn health_of_unknown_tickers() {
    let positions = vec![
        Position::new("AAPL", 1.0, 34.0),
        Position::new("MSFT", 1.0, 33.0),
        Position::new("GOOG", 1.0, 33.0),
    ];
    let result = calculate_rebalancing(&positions, Mode::Standard, 0.0);
    let groups = group_by_asset_class(&result.positions);

    assert_eq!(groups.len(), 1);
    assert!(calculate_portfolio_health(&result.positions).score >= 90);
    // everything is "Other", far from every model
    let closest = find_closest_model(&groups).unwrap();
    assert!(closest.difference >= 200.0 - 1e-9);
}
