//! Property-based tests: typed round trips, and agreement with `serde_json`
//! on what compact JSON text looks like.

use chrono::NaiveDate;
use json_mapper::{from_str, parse, to_string, RecordShape, Shape, Shaped};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

fn roundtrip<T>(value: &T) -> bool
where
    T: Serialize + for<'de> Deserialize<'de> + Shaped + PartialEq + std::fmt::Debug,
{
    match to_string(value) {
        Ok(serialized) => match from_str::<T>(&serialized) {
            Ok(deserialized) => *value == deserialized,
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

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Person {
    name: String,
    birthdate: NaiveDate,
    hobbies: Option<Vec<String>>,
}

impl Shaped for Person {
    fn shape() -> Shape {
        RecordShape::all_args("Person")
            .field("name", Shape::String)
            .field("birthdate", Shape::Date)
            .field("hobbies", <Option<Vec<String>>>::shape())
            .build()
    }
}

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (1i32..=9999, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| {
        NaiveDate::from_ymd_opt(y, m, d).expect("day 1..=28 exists in every month")
    })
}

fn json_strategy() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        any::<i64>().prop_map(serde_json::Value::from),
        any::<String>().prop_map(serde_json::Value::String),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(serde_json::Value::Array),
            prop::collection::vec(("[a-z]{1,8}", inner), 0..8).prop_map(|members| {
                serde_json::Value::Object(members.into_iter().collect())
            }),
        ]
    })
}

proptest! {
    #[test]
    fn prop_i32(n in any::<i32>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u32(n in any::<u32>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_u64(n in any::<u64>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_i8(n in any::<i8>()) {
        prop_assert!(roundtrip(&n));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(roundtrip(&b));
    }

    #[test]
    fn prop_f64(f in -1.0e9f64..1.0e9) {
        prop_assert!(roundtrip(&f));
    }

    #[test]
    fn prop_string(s in any::<String>()) {
        prop_assert!(roundtrip(&s));
    }

    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        prop_assert!(roundtrip(&v));
    }

    #[test]
    fn prop_option_i32(opt in proptest::option::of(any::<i32>())) {
        prop_assert!(roundtrip(&opt));
    }

    #[test]
    fn prop_date(date in date_strategy()) {
        prop_assert!(roundtrip(&date));
    }

    #[test]
    fn prop_person(
        name in "[A-Za-z ]{0,24}",
        birthdate in date_strategy(),
        hobbies in proptest::option::of(prop::collection::vec("[a-z]{1,10}", 0..4)),
    ) {
        let person = Person { name, birthdate, hobbies };
        prop_assert!(roundtrip(&person));
    }

    // Compact output matches serde_json byte for byte on float-free documents.
    #[test]
    fn prop_compact_output_matches_serde_json(doc in json_strategy()) {
        let expected = serde_json::to_string(&doc).unwrap();
        let parsed = parse(&expected).unwrap();
        prop_assert_eq!(parsed.to_string(), expected);
    }

    // Whatever the parser accepts from serde_json's pretty output, it reads as
    // the same tree serde_json does.
    #[test]
    fn prop_pretty_input_parses_like_serde_json(doc in json_strategy()) {
        let pretty = serde_json::to_string_pretty(&doc).unwrap();
        let parsed = parse(&pretty).unwrap();
        let reread: serde_json::Value = serde_json::from_str(&parsed.to_string()).unwrap();
        prop_assert_eq!(reread, doc);
    }
}
