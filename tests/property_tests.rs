//! Property-based tests: generated scalars survive writing and re-parsing, and
//! arbitrary input never panics the parser.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use serde_tomlet::{from_str, parse, to_string, Error};

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Wrapper<T> {
    v: T,
}

fn roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: T,
) -> bool {
    let wrapped = Wrapper { v: value };
    match to_string(&wrapped) {
        Ok(serialized) => match from_str::<Wrapper<T>>(&serialized) {
            Ok(deserialized) => wrapped == deserialized,
            Err(e) => {
                eprintln!("Deserialize failed: {}", e);
                eprintln!("Serialized was: {}", serialized);
                false
            }
        },
        Err(e) => {
            eprintln!("Serialize failed: {}", e);
            false
        }
    }
}

proptest! {
    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(n));
    }

    #[test]
    fn prop_u32(n in any::<u32>()) {
        prop_assert!(roundtrip(n));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(roundtrip(b));
    }

    #[test]
    fn prop_string(s in any::<String>()) {
        prop_assert!(roundtrip(s));
    }

    #[test]
    fn prop_f64_bits(f in any::<f64>()) {
        let text = to_string(&Wrapper { v: f }).unwrap();
        let back: Wrapper<f64> = from_str(&text).unwrap();
        if f.is_nan() {
            prop_assert!(back.v.is_nan());
        } else {
            prop_assert_eq!(back.v.to_bits(), f.to_bits());
        }
    }

    #[test]
    fn prop_vec_i64(v in prop::collection::vec(any::<i64>(), 0..20)) {
        prop_assert!(roundtrip(v));
    }

    #[test]
    fn prop_nested_vec_string(v in prop::collection::vec(prop::collection::vec(".*", 0..4), 0..4)) {
        prop_assert!(roundtrip(v));
    }

    #[test]
    fn prop_option_i64(opt in proptest::option::of(any::<i64>())) {
        prop_assert!(roundtrip(opt));
    }

    #[test]
    fn prop_parse_never_panics(input in "[a-z0-9 =\\[\\]{}.,\"'#\\n\\\\_+-]{0,64}") {
        if let Err(err) = parse(&input) {
            prop_assert!(!matches!(err, Error::Internal(_)), "{}", err);
        }
    }

    #[test]
    fn prop_parse_arbitrary_text(input in any::<String>()) {
        if let Err(err) = parse(&input) {
            prop_assert!(!matches!(err, Error::Internal(_)), "{}", err);
        }
    }
}
