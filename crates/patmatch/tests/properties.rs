//! Property-based tests for the match engine.
//!
//! Values are generated as small random trees; every property must hold for
//! all of them.

use patmatch::{
    all_of, cons, literal_equals, mapping_shape, matches, wildcard, Context, IntoPattern,
    MatchResult, Matcher, Pattern, SeqKind, Value, ValueModel,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::None),
        any::<bool>().prop_map(Value::Bool),
        (-100i64..100).prop_map(Value::Int),
        (-1.0e6f64..1.0e6).prop_map(Value::Float),
        "[a-z]{0,6}".prop_map(Value::Str),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Tuple),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..4).prop_map(|entries| Value::map(entries)),
        ]
    })
}

fn arb_items() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(arb_value(), 0..5)
}

fn wildcards(kind: SeqKind, len: usize) -> Pattern {
    Pattern::Sequence {
        kind,
        items: (0..len).map(|_| wildcard()).collect(),
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn literal_matches_itself(v in arb_value()) {
        prop_assert!(matches(&literal_equals(v.clone()), &v).unwrap());
    }

    #[test]
    fn literal_rejects_unequal_values(v in arb_value(), w in arb_value()) {
        let expected = v.deep_eq(&w);
        prop_assert_eq!(matches(&literal_equals(v), &w).unwrap(), expected);
    }

    #[test]
    fn sequence_kind_is_significant(items in arb_items()) {
        let len = items.len();
        let as_list = Value::List(items.clone());
        let as_tuple = Value::Tuple(items.clone());

        prop_assert!(!matches(&literal_equals(as_tuple.clone()), &as_list).unwrap());
        prop_assert!(!matches(&literal_equals(as_list.clone()), &as_tuple).unwrap());
        prop_assert!(!matches(&wildcards(SeqKind::Tuple, len), &as_list).unwrap());
        prop_assert!(!matches(&wildcards(SeqKind::List, len), &as_tuple).unwrap());
        prop_assert!(matches(&wildcards(SeqKind::List, len), &as_list).unwrap());
    }

    #[test]
    fn sequence_length_is_significant(items in arb_items(), k in 0usize..6) {
        let value = Value::List(items.clone());
        let expected = k == items.len();
        prop_assert_eq!(matches(&wildcards(SeqKind::List, k), &value).unwrap(), expected);
    }

    #[test]
    fn repeated_capture_sees_equal_values(x in arb_value(), y in arb_value()) {
        let ctx = Context::new();
        let pattern = (ctx.capture("a"), ctx.capture("a")).into_pattern();

        prop_assert!(matches(&pattern, &Value::tuple([x.clone(), x.clone()])).unwrap());
        prop_assert!(ctx.get("a").unwrap().deep_eq(&x));

        let fresh = Context::new();
        let pattern = (fresh.capture("a"), fresh.capture("a")).into_pattern();
        let consistent = x.deep_eq(&y);
        prop_assert_eq!(matches(&pattern, &Value::tuple([x, y])).unwrap(), consistent);
        prop_assert_eq!(fresh.contains("a"), consistent);
    }

    #[test]
    fn failed_match_commits_nothing(x in arb_value(), y in arb_value(), z in arb_value()) {
        let ctx = Context::new();
        let pattern = (
            ctx.capture("a"),
            all_of!(ctx.capture("b"), ctx.capture("c")),
            literal_equals("never-generated"),
        )
            .into_pattern();
        prop_assert!(!matches(&pattern, &Value::tuple([x, y, z])).unwrap());
        prop_assert!(ctx.is_empty());
    }

    #[test]
    fn wildcard_matches_and_binds_nothing(v in arb_value()) {
        let result = Matcher::new().match_extract(&wildcard(), &v).unwrap();
        match result {
            MatchResult::Match(bindings) => prop_assert!(bindings.is_empty()),
            MatchResult::NoMatch => prop_assert!(false, "wildcard rejected {}", v),
        }
    }

    #[test]
    fn mapping_ignores_extra_keys(
        entries in prop::collection::vec(("[a-z]{1,4}", arb_value()), 1..5)
    ) {
        let key = entries[0].0.clone();
        let map = Value::map(entries);
        let ctx = Context::new();
        let pattern = mapping_shape().entry(key.as_str(), ctx.capture("v")).into_pattern();

        prop_assert!(matches(&pattern, &map).unwrap());
        let expected = map.lookup(&Value::from(key.as_str())).cloned();
        prop_assert_eq!(Some(ctx.get("v").unwrap()), expected);
    }

    #[test]
    fn cons_splits_head_and_tail(items in arb_items()) {
        let ctx = Context::new();
        let pattern = cons(ctx.capture("h"), ctx.capture("t"));
        let value = Value::List(items.clone());

        let matched = matches(&pattern, &value).unwrap();
        prop_assert_eq!(matched, !items.is_empty());
        if matched {
            prop_assert_eq!(ctx.get("h").unwrap(), items[0].clone());
            prop_assert_eq!(ctx.get("t").unwrap(), Value::List(items[1..].to_vec()));
        } else {
            prop_assert!(ctx.is_empty());
        }
    }
}
