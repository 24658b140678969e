use holdem_engine::cards::parse_board;
use holdem_engine::ranges::*;
use holdem_engine::EngineError;

fn h(notation: &str) -> StartingHand {
    normalize_notation(notation).unwrap()
}

// -------------------------------------------------------------------------
// Canonical notation
// -------------------------------------------------------------------------

#[test]
fn test_canonicalize_examples() {
    assert_eq!(canonicalize("A♥", "K♠").unwrap().to_string(), "AKo");
    assert_eq!(canonicalize("A♥", "K♥").unwrap().to_string(), "AKs");
    assert_eq!(canonicalize("kh", "ah").unwrap().to_string(), "AKs");
    assert_eq!(canonicalize("10s", "10d").unwrap().to_string(), "TT");
}

#[test]
fn test_malformed_notation_is_an_error() {
    let r = canonicalize("A♥", "Z♠");
    assert!(matches!(r, Err(EngineError::InvalidHandNotation(_))));
    assert!(normalize_notation("AKz").is_err());
}

#[test]
fn test_already_canonical_inputs() {
    assert_eq!(h("AKs"), h("AhKh"));
    assert_eq!(h("ak"), h("AKo"));
    assert_eq!(h("QQ"), h("Q♣Q♦"));
    assert_eq!("T9s".parse::<StartingHand>().unwrap(), h("9sTs"));
}

#[test]
fn test_serde_as_notation() {
    let json = serde_json::to_string(&h("AJs")).unwrap();
    assert_eq!(json, "\"AJs\"");
    let back: StartingHand = serde_json::from_str("\"ja\"").unwrap();
    assert_eq!(back, h("AJo"));
}

#[test]
fn test_hand_combos() {
    assert_eq!(hand_combos("AKs").unwrap().len(), 4);
    assert_eq!(hand_combos("AKo").unwrap().len(), 12);
    let pairs = hand_combos("77").unwrap();
    assert_eq!(pairs.len(), 6);
    assert!(pairs.iter().all(|(a, b)| a.rank == b.rank && a.suit != b.suit));
}

// -------------------------------------------------------------------------
// Range membership
// -------------------------------------------------------------------------

#[test]
fn test_is_in_range_named_and_predicates() {
    assert!(is_in_range("AA", "premium").unwrap());
    assert!(is_in_range("8s7s", "suited_connector").unwrap());
    assert!(!is_in_range("8s7d", "suited_connector").unwrap());
    assert!(is_in_range("KQo", "broadway").unwrap());
    assert!(is_in_range("A4s", "ace_x_suited").unwrap());
    assert!(is_in_range("QJo", "high_sum:23").unwrap());
    assert!(!is_in_range("QTo", "high_sum:23").unwrap());
    assert!(is_in_range("72o", "any").unwrap());
}

#[test]
fn test_unknown_range_is_false() {
    assert!(!is_in_range("AA", "tight_is_right").unwrap());
    assert!(!is_in_range("AA", "high_sum:abc").unwrap());
}

#[test]
fn test_opening_ranges_widen_by_position() {
    let utg = STANDARD_RANGES.get("open_utg").unwrap();
    let btn = STANDARD_RANGES.get("open_btn").unwrap();
    assert!(utg.total_combos() < btn.total_combos());
    for hand in utg.hands() {
        assert!(btn.contains(&hand), "{} opens UTG but not BTN", hand);
    }
}

#[test]
fn test_contains_cards() {
    let range = parse_range("JJ+, AQs+").unwrap();
    let cards = parse_board("AhQh").unwrap();
    assert!(range.contains_cards(cards[0], cards[1]));
    let cards = parse_board("AhQd").unwrap();
    assert!(!range.contains_cards(cards[0], cards[1]));
}

#[test]
fn test_custom_table() {
    let mut table = RangeTable::new();
    table.insert("defend", parse_range("22+, A2s+, KTs+").unwrap());
    let m = check_ranges(&table, "3c3d", &["defend", "suited"]).unwrap();
    assert_eq!(m.notation, "33");
    assert_eq!(m.matched_range_name, "defend");

    // predicate names resolve even in a custom table
    let m = check_ranges(&table, "9h4h", &["defend", "suited"]).unwrap();
    assert_eq!(m.matched_range_name, "suited");
}

#[test]
fn test_composed_standard_ranges() {
    let btn = STANDARD_RANGES.get("threebet_btn").unwrap();
    assert!(matches!(btn, Range::Union(_)));
    for hand in ["QQ", "AKo", "88", "KQo", "A5s", "T9s"] {
        assert!(btn.contains(&h(hand)), "{} should 3-bet from the button", hand);
    }
    assert!(!btn.contains(&h("72o")));
    assert!(!btn.contains(&h("A4s")));

    let playable = STANDARD_RANGES.get("playable").unwrap();
    for hand in ["AA", "JTs", "A2s", "54s", "JTo"] {
        assert!(playable.contains(&h(hand)), "{} should be playable", hand);
    }
    assert!(!is_in_range("72o", "playable").unwrap());
}

#[test]
fn test_union_with_predicate_in_custom_table() {
    let mut table = RangeTable::new();
    let defend = Range::union(vec![
        parse_range("22+").unwrap(),
        Range::Predicate(HandPredicate::SuitedConnector),
    ]);
    table.insert("defend", defend);
    assert!(table.contains("defend", &h("55")));
    assert!(table.contains("defend", &h("65s")));
    assert!(!table.contains("defend", &h("65o")));

    let cards = parse_board("6h5h").unwrap();
    assert!(table.get("defend").unwrap().contains_cards(cards[0], cards[1]));
}

#[test]
fn test_parse_range_errors() {
    assert!(parse_range("AA, XYs").is_err());
    assert!(parse_range("AKq").is_err());
}

// -------------------------------------------------------------------------
// Tiers
// -------------------------------------------------------------------------

#[test]
fn test_every_hand_gets_a_tier() {
    let mut premium = 0;
    for hand in StartingHand::all() {
        if classify_tier(&hand) == Tier::Premium {
            premium += 1;
        }
    }
    // TT-AA, AJs-AKs, AKo
    assert_eq!(premium, 5 + 3 + 1);
    assert!(Tier::Premium > Tier::Strong && Tier::Speculative > Tier::Weak);
}
