//! Property tests for [`defaults_union`].

use lineage_class::defaults_union;
use proptest::prelude::*;
use serde_json::{Map, Value};

fn arb_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::String),
    ]
}

fn arb_map() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::vec(("[a-e]", arb_scalar()), 0..6)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every key of the primary map keeps the primary's value.
    #[test]
    fn prop_primary_keys_win(primary in arb_map(), secondary in arb_map()) {
        let merged = defaults_union(&Value::Object(primary.clone()), &Value::Object(secondary));
        let merged = merged.as_object().cloned().unwrap_or_default();
        for (key, value) in &primary {
            prop_assert_eq!(merged.get(key), Some(value));
        }
    }

    /// The merged key set is exactly the union of both key sets.
    #[test]
    fn prop_key_set_is_union(primary in arb_map(), secondary in arb_map()) {
        let merged = defaults_union(&Value::Object(primary.clone()), &Value::Object(secondary.clone()));
        let merged = merged.as_object().cloned().unwrap_or_default();
        prop_assert_eq!(merged.len(), primary.keys().chain(secondary.keys().filter(|key| !primary.contains_key(*key))).count());
        for key in primary.keys().chain(secondary.keys()) {
            prop_assert!(merged.contains_key(key));
        }
        for (key, value) in &secondary {
            if !primary.contains_key(key) {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }

    /// Merging with an empty map is the identity, whichever side it is on.
    #[test]
    fn prop_empty_is_identity(map in arb_map()) {
        let map = Value::Object(map);
        let empty = Value::Object(Map::new());
        prop_assert_eq!(&defaults_union(&map, &empty), &map);
        prop_assert_eq!(&defaults_union(&empty, &map), &map);
    }
}
