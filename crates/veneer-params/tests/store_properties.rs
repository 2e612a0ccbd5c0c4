//! Property tests for the param store allow-list.

use std::collections::BTreeMap;

use proptest::prelude::*;
use veneer_params::{parse_query, ParamStore, Params};

const EXPECTED: [&str; 3] = ["id", "postId", "tab"];

fn key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("id".to_string()),
        Just("postId".to_string()),
        Just("tab".to_string()),
        "[a-z]{1,6}",
    ]
}

fn raw_params() -> impl Strategy<Value = Params> {
    proptest::collection::btree_map(key(), "[ -~]{0,12}", 0..8)
        .prop_map(|map: BTreeMap<String, String>| map.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_stored_params_are_subset_of_expected(raw in raw_params()) {
        let store = ParamStore::with_defaults(EXPECTED);
        store.set_params(raw.clone());

        for key in store.params().keys() {
            prop_assert!(EXPECTED.contains(&key));
            prop_assert!(raw.contains_key(key));
        }
    }

    #[test]
    fn prop_stored_query_is_subset_of_expected(raw in raw_params()) {
        let store = ParamStore::with_defaults(EXPECTED);
        let state = store.replace(&Params::new(), &raw);

        prop_assert!(state.query.keys().all(|k| EXPECTED.contains(&k)));
        prop_assert_eq!(state, store.state());
    }

    #[test]
    fn prop_expected_keys_survive(value in "[a-zA-Z0-9]{1,10}") {
        let store = ParamStore::with_defaults(EXPECTED);
        store.set_params(Params::from_iter([("id", value.as_str())]));
        prop_assert_eq!(store.get_param("id"), Some(value));
    }
}

#[test]
fn test_debug_query_dropped() {
    let store = ParamStore::with_defaults(["id"]);
    store.set_query(parse_query("?debug=1"));
    assert!(store.query().is_empty());
}
