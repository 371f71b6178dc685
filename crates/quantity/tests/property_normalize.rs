// Property-based tests for numeral normalization and the selection contract.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use sharecount_quantity::{extract_quantity, is_reasonable, normalize, normalize_with, CommaPolicy};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Group an integer's digits in threes with `sep`.
fn group(n: u64, sep: char) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

fn canonical(int: u64, cents: u8) -> f64 {
    format!("{int}.{cents:02}").parse().unwrap()
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Strings drawn from the characters a numeral capture can contain, plus noise.
fn arb_numeral_ish() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => r"[0-9.,'’]{0,16}",
        1 => r"[0-9a-zA-Z $€.,'’-]{0,24}",
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => r"[a-zA-Z :=()]{0,20}[0-9]{1,7}[ ]?(shares|units|pcs)?[a-zA-Z :]{0,20}",
        1 => r"(Quantity|Holding|Lot size|Qty)[:]? [0-9.,']{1,12} ?(shares|units)?",
        1 => r"[ -~]{0,60}",
    ]
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn plain_integers_parse_exactly(n in 0u64..1_000_000_000_000) {
        prop_assert_eq!(normalize(&n.to_string()), Some(n as f64));
    }

    #[test]
    fn us_grouping_with_cents(int in 0u64..100_000_000, cents in 0u8..100) {
        let raw = format!("{}.{cents:02}", group(int, ','));
        prop_assert_eq!(normalize(&raw), Some(canonical(int, cents)));
    }

    #[test]
    fn european_grouping_with_cents(int in 0u64..100_000_000, cents in 0u8..100) {
        let raw = format!("{},{cents:02}", group(int, '.'));
        prop_assert_eq!(normalize(&raw), Some(canonical(int, cents)));
    }

    #[test]
    fn swiss_grouping_with_cents(int in 0u64..100_000_000, cents in 0u8..100, typographic in any::<bool>()) {
        let sep = if typographic { '\u{2019}' } else { '\'' };
        let raw = format!("{}.{cents:02}", group(int, sep));
        prop_assert_eq!(normalize(&raw), Some(canonical(int, cents)));
    }

    #[test]
    fn us_integer_grouping(int in 1_000u64..1_000_000_000) {
        prop_assert_eq!(normalize(&group(int, ',')), Some(int as f64));
    }

    #[test]
    fn policy_only_touches_three_digit_comma(int in 0u64..1000, frac in 0u64..1000) {
        let two = format!("{int},{:02}", frac % 100);
        prop_assert_eq!(
            normalize_with(&two, CommaPolicy::Thousands),
            normalize_with(&two, CommaPolicy::Decimal)
        );
    }

    #[test]
    fn normalize_never_panics(raw in arb_numeral_ish()) {
        if let Some(v) = normalize(&raw) {
            prop_assert!(v.is_finite());
            prop_assert!(v >= 0.0);
        }
    }
}

// ---------------------------------------------------------------------------
// Selection contract
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn answers_pass_reasonableness(
        text in arb_text(),
        price in prop::option::of(0.01f64..10_000.0),
        value in prop::option::of(0.0f64..10_000_000.0),
    ) {
        if let Some(q) = extract_quantity(&text, None, None, value, price) {
            prop_assert!(is_reasonable(q), "{} from {:?}", q, text);
        }
    }

    #[test]
    fn extraction_is_deterministic(
        text in arb_text(),
        price in prop::option::of(0.01f64..10_000.0),
        value in prop::option::of(0.0f64..10_000_000.0),
    ) {
        let a = extract_quantity(&text, None, None, value, price);
        let b = extract_quantity(&text, None, None, value, price);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn identifier_sized_integers_never_selected(n in 1_000_000_000u64..1_000_000_000_000) {
        let text = format!("Quantity: {n} shares");
        prop_assert_eq!(extract_quantity(&text, None, None, None, None), None);
    }
}
