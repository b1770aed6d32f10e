//! Property tests for the repeated-key form codec.

use std::collections::BTreeMap;

use integrations_elastic_email::codec::{decode, encode, FormSource, FormValue};
use proptest::prelude::*;

fn key() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_ ]{0,8}"
}

fn value() -> impl Strategy<Value = String> {
    "[ -~]{0,12}"
}

proptest! {
    #[test]
    fn decode_inverts_encode(
        map in prop::collection::btree_map(key(), prop::collection::vec(value(), 1..4), 0..6)
    ) {
        let source = FormSource::Map(
            map.iter()
                .map(|(k, values)| (k.clone(), FormValue::from(values.clone())))
                .collect(),
        );

        let decoded = decode(&encode(&source).unwrap()).unwrap();

        let expected: BTreeMap<String, Vec<Option<String>>> = map
            .into_iter()
            .map(|(k, values)| (k, values.into_iter().map(Some).collect()))
            .collect();
        prop_assert_eq!(decoded, expected);
    }

    #[test]
    fn scalar_decodes_to_single_element_list(k in key(), v in value()) {
        let source = FormSource::pairs([(k.clone(), v.clone())]);
        let decoded = decode(&encode(&source).unwrap()).unwrap();
        prop_assert_eq!(&decoded[&k], &vec![Some(v)]);
    }
}
