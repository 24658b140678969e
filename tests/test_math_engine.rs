use approx::assert_abs_diff_eq;
use holdem_engine::cards::parse_board;
use holdem_engine::math_engine::*;
use holdem_engine::outs::count_outs;
use holdem_engine::report::ToJson;
use holdem_engine::EngineError;

#[test]
fn test_pot_odds() {
    let odds = pot_odds(100.0, 50.0).unwrap();
    assert_abs_diff_eq!(odds, 0.3333, epsilon = 0.001);
}

#[test]
fn test_pot_odds_pot_sized_bet() {
    // villain bets 100 into 100: call 100 to win 300
    let odds = pot_odds(200.0, 100.0).unwrap();
    assert_abs_diff_eq!(odds, 1.0 / 3.0, epsilon = 1e-9);
}

#[test]
fn test_nothing_to_call() {
    assert_eq!(pot_odds(80.0, 0.0).unwrap(), 0.0);
    assert!(should_call(0.0, 80.0, 0.0).unwrap());
}

#[test]
fn test_negative_money_rejected() {
    assert!(matches!(pot_odds(-5.0, 10.0), Err(EngineError::InvalidArgument(_))));
    assert!(matches!(expected_value(0.5, 100.0, -1.0), Err(EngineError::InvalidArgument(_))));
    assert!(matches!(pot_odds_report(10.0, -2.0), Err(EngineError::InvalidArgument(_))));
}

#[test]
fn test_ev() {
    assert_abs_diff_eq!(expected_value(0.5, 200.0, 50.0).unwrap(), 75.0, epsilon = 1e-9);
    assert_abs_diff_eq!(expected_value(0.0, 200.0, 50.0).unwrap(), -50.0, epsilon = 1e-9);
    assert_abs_diff_eq!(expected_value(1.0, 200.0, 50.0).unwrap(), 200.0, epsilon = 1e-9);
}

#[test]
fn test_required_equity_matches_break_even_ev() {
    let pot = 120.0;
    let call = 40.0;
    let needed = required_equity(pot, call).unwrap();
    // at exactly the break-even equity, winning the pot offsets the lost call
    let ev = expected_value(needed, pot, call).unwrap();
    assert_abs_diff_eq!(ev, 0.0, epsilon = 1e-9);
}

#[test]
fn test_report_and_json() {
    let report = pot_odds_report(150.0, 50.0).unwrap();
    assert_eq!(report.ratio, "3.00:1");
    assert_abs_diff_eq!(report.percentage(), 25.0, epsilon = 1e-9);
    assert_eq!(report.pot_after_call, 200.0);
    assert_eq!(report.to_string(), "Calling 50.00 into 150.00: 3.00:1 odds, need 25.0% equity");

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["ratio"], "3.00:1");
}

#[test]
fn test_draw_odds_versus_price() {
    let hole = parse_board("Ah5h").unwrap();
    let board = parse_board("Kh9h2c").unwrap();
    let outs = count_outs(&hole, &board).unwrap();
    let flush = outs.groups.iter().find(|g| g.count() == 9).unwrap();
    // roughly 35% to get there by the river; a half-pot bet asks for a third
    assert!(flush.probability > 0.34 && flush.probability < 0.36);
    assert!(should_call(flush.probability, 100.0, 50.0).unwrap());
    assert!(!should_call(flush.probability, 100.0, 100.0).unwrap());
}
