//! Codec configuration, override precedence and error reporting.

use chrono::NaiveDate;
use json_mapper::{
    Codec, CodecOptions, DateEncoding, Error, JsonNode, Module, Override, Record, RecordShape,
    Shape, ShapeKey, Value,
};

fn person_shape() -> Shape {
    RecordShape::all_args("Person")
        .field("name", Shape::String)
        .field("birthdate", Shape::Date)
        .build()
}

fn tree_shape() -> Shape {
    RecordShape::all_args("TreeNode")
        .field("label", Shape::String)
        .field("children", Shape::sequence(Shape::lazy(tree_shape)))
        .build()
}

fn nested_sequences(depth: usize) -> Value {
    let mut value = Value::from(1);
    for _ in 0..depth {
        value = Value::Sequence(vec![value]);
    }
    value
}

#[test]
fn test_default_options() {
    let options = CodecOptions::default();
    assert!(options.fail_on_unknown_properties);
    assert_eq!(options.date_encoding, DateEncoding::Array);
    assert!(!options.pretty);
}

#[test]
fn test_later_module_wins() {
    let first = Module::new("first").with_encoder(ShapeKey::Integer, |_| Ok(JsonNode::from("one")));
    let second = Module::new("second").with_encoder(ShapeKey::Integer, |_| Ok(JsonNode::from("two")));
    let codec = Codec::builder()
        .register_module(first)
        .register_module(second)
        .build();

    assert_eq!(codec.encode(&Value::from(7)).unwrap(), r#""two""#);
    assert_eq!(codec.registry().len(), 1);
}

#[test]
fn test_separate_modules_for_writing_and_reading_compose() {
    let writer = Module::new("wrap").with_encoder(ShapeKey::String, |value| {
        let mut wrapped = json_mapper::JsonMap::new();
        wrapped.insert("string".to_string(), JsonNode::from(value.as_str().unwrap_or_default()));
        Ok(JsonNode::Object(wrapped))
    });
    let reader = Module::new("unwrap").with_decoder(ShapeKey::String, |node| {
        Ok(Value::from(node.get("string").map(JsonNode::as_text).unwrap_or_default()))
    });
    let codec = Codec::builder()
        .register_module(writer)
        .register_module(reader)
        .build();

    let json = codec.encode(&Value::from("x")).unwrap();
    assert_eq!(json, r#"{"string":"x"}"#);
    assert_eq!(codec.decode(&json, &Shape::String).unwrap(), Value::from("x"));
}

#[test]
fn test_single_override_replaces_module_entry() {
    let codec = Codec::builder()
        .register_module(Module::iso_dates())
        .with_override(
            ShapeKey::Date,
            Override::new().with_encoder(|_| Ok(JsonNode::from("redacted"))),
        )
        .build();
    let date = Value::from(NaiveDate::from_ymd_opt(1980, 9, 15).unwrap());
    assert_eq!(codec.encode(&date).unwrap(), r#""redacted""#);
}

#[test]
fn test_override_applies_inside_records() {
    let codec = Codec::builder()
        .with_override(
            ShapeKey::Record("Person".to_string()),
            Override::new().with_encoder(|value| {
                let name = value.get("name").and_then(Value::as_str).unwrap_or_default();
                Ok(JsonNode::from(name))
            }),
        )
        .build();
    let people = Value::from(vec![
        Record::new("Person").with_field("name", "Juan Garcia"),
        Record::new("Person").with_field("name", "Manuel Perez"),
    ]);
    assert_eq!(codec.encode(&people).unwrap(), r#"["Juan Garcia","Manuel Perez"]"#);
}

#[test]
fn test_iso_dates_by_option() {
    let codec = Codec::with_options(CodecOptions::new().with_date_encoding(DateEncoding::Iso8601));
    let person: Value = Record::new("Person")
        .with_field("name", "Manuel Perez")
        .with_field("birthdate", NaiveDate::from_ymd_opt(1987, 7, 23).unwrap())
        .into();
    let json = codec.encode(&person).unwrap();
    assert_eq!(json, r#"{"name":"Manuel Perez","birthdate":"1987-07-23"}"#);
    assert_eq!(codec.decode(&json, &person_shape()).unwrap(), person);
}

#[test]
fn test_pretty_output_with_custom_indent() {
    let codec = Codec::with_options(CodecOptions::pretty().with_indent(4));
    let person: Value = Record::new("Person").with_field("name", "Juan Garcia").into();
    assert_eq!(
        codec.encode(&person).unwrap(),
        "{\n    \"name\": \"Juan Garcia\"\n}"
    );
}

#[test]
fn test_mismatch_reports_nested_path() {
    let shape = Shape::mapping(Shape::sequence(person_shape()));
    let json = r#"{"people":[{"name":"Juan Garcia","birthdate":[1980,9,15]},{"name":5,"birthdate":[1987,7,23]}]}"#;
    let err = Codec::new().decode(json, &shape).unwrap_err();
    match err {
        Error::ShapeMismatch {
            path,
            expected,
            found,
        } => {
            assert_eq!(path.to_string(), "$.people[1].name");
            assert_eq!(expected, "string");
            assert_eq!(found, "integer");
        }
        other => panic!("Expected shape mismatch, got {:?}", other),
    }
}

#[test]
fn test_malformed_text_reports_line() {
    let err = Codec::new().decode_tree("[1,\n 2,\n x]").unwrap_err();
    match err {
        Error::Malformed { line, offset, .. } => {
            assert_eq!(line, 3);
            assert!(offset >= 8);
        }
        other => panic!("Expected malformed text, got {:?}", other),
    }
}

#[test]
fn test_trailing_content_is_malformed() {
    let err = Codec::new().decode("[1] [2]", &Shape::Any).unwrap_err();
    assert!(matches!(err, Error::Malformed { .. }));
}

#[test]
fn test_big_integers() {
    let codec = Codec::new();
    let json = "123456789012345678901234567890";

    let err = codec.decode(json, &Shape::Integer).unwrap_err();
    match err {
        Error::ShapeMismatch { expected, .. } => assert_eq!(expected, "integer in 64-bit range"),
        other => panic!("Expected shape mismatch, got {:?}", other),
    }

    let value = codec.decode(json, &Shape::BigInteger).unwrap();
    assert!(matches!(value, Value::BigInt(_)));
    assert_eq!(codec.encode(&value).unwrap(), json);
}

#[test]
fn test_unsigned_extremes_round_trip() {
    let json = json_mapper::to_string(&u64::MAX).unwrap();
    assert_eq!(json, "18446744073709551615");
    assert_eq!(json_mapper::from_str::<u64>(&json).unwrap(), u64::MAX);

    let sizes: Vec<usize> = json_mapper::from_str("[0, 4294967296]").unwrap();
    assert_eq!(sizes, vec![0, 4_294_967_296]);
}

#[test]
fn test_narrow_integer_overflow_is_a_shape_mismatch() {
    let err = json_mapper::from_str::<i32>("3000000000").unwrap_err();
    match err {
        Error::ShapeMismatch { path, expected, found } => {
            assert!(path.is_root());
            assert_eq!(expected, format!("integer in range {}..={}", i32::MIN, i32::MAX));
            assert_eq!(found, "integer 3000000000");
        }
        other => panic!("Expected shape mismatch, got {:?}", other),
    }

    let err = json_mapper::from_str::<Vec<u8>>("[1, -1]").unwrap_err();
    match err {
        Error::ShapeMismatch { path, .. } => assert_eq!(path.to_string(), "$[1]"),
        other => panic!("Expected shape mismatch, got {:?}", other),
    }
}

#[test]
fn test_invalid_calendar_date() {
    let err = Codec::new().decode("[1980,2,30]", &Shape::Date).unwrap_err();
    assert!(matches!(err, Error::InvalidDate { .. }));

    let err = Codec::new().decode(r#""1980-13-01""#, &Shape::Date).unwrap_err();
    assert!(matches!(err, Error::InvalidDate { .. }));
}

#[test]
fn test_optional_field_null_handling() {
    let shape = RecordShape::all_args("Contact")
        .field("email", Shape::optional(Shape::String))
        .field("phone", Shape::optional(Shape::nullable(Shape::String)))
        .build();
    let value = Codec::new()
        .decode(r#"{"email":null,"phone":null}"#, &shape)
        .unwrap();
    assert_eq!(value.get("email"), Some(&Value::absent()));
    assert_eq!(value.get("phone"), Some(&Value::Optional(Some(Box::new(Value::Null)))));
}

#[test]
fn test_present_null_is_written() {
    let contact: Value = Record::new("Contact")
        .with_field("email", Value::absent())
        .with_field("phone", Value::Optional(Some(Box::new(Value::Null))))
        .into();
    assert_eq!(Codec::new().encode(&contact).unwrap(), r#"{"phone":null}"#);
}

#[test]
fn test_self_referencing_shape() {
    let json = r#"{"label":"root","children":[{"label":"leaf","children":[]}]}"#;
    let codec = Codec::new();
    let tree = codec.decode(json, &tree_shape()).unwrap();
    let children = tree.get("children").and_then(Value::as_sequence).unwrap();
    assert_eq!(children[0].get("label"), Some(&Value::from("leaf")));
    assert_eq!(codec.encode(&tree).unwrap(), json);
}

#[test]
fn test_runaway_nesting_is_a_cyclic_reference() {
    let codec = Codec::with_options(CodecOptions::new().with_max_depth(4));
    assert!(codec.encode(&nested_sequences(4)).is_ok());

    let err = codec.encode(&nested_sequences(8)).unwrap_err();
    assert!(matches!(err, Error::CyclicReference { .. }));
}

#[test]
fn test_codec_shared_across_threads() {
    let codec = Codec::builder().register_module(Module::iso_dates()).build();
    let date = Value::from(NaiveDate::from_ymd_opt(1980, 9, 15).unwrap());

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let codec = codec.clone();
            let date = date.clone();
            scope.spawn(move || {
                assert_eq!(codec.encode(&date).unwrap(), r#""1980-09-15""#);
            });
        }
    });
}
