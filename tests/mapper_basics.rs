//! Everyday mapping scenarios: plain values, lists, maps and small person
//! records, with and without overrides.

use chrono::NaiveDate;
use json_mapper::{
    json, Codec, CodecOptions, Error, JsonNode, Module, Record, RecordShape, Shape, ShapeKey,
    Shaped, Value,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const PERSON_V2_JSON: &str = r#"{"name":"Juan Garcia","birthdate":[1980,9,15],"hobbies":["football","squash"]}"#;
const PERSON_V2_LIST_JSON: &str = r#"[{"name":"Juan Garcia","birthdate":[1980,9,15],"hobbies":["football","squash"]},{"name":"Manuel Perez","birthdate":"1987-07-23"}]"#;
const PERSON_JSON: &str = r#"{"name":"Juan Garcia","birthdate":[1980,9,15]}"#;

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct PersonName {
    name: String,
}

impl Shaped for PersonName {
    fn shape() -> Shape {
        RecordShape::all_args("PersonName")
            .field("name", Shape::String)
            .build()
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Person {
    name: String,
    birthdate: NaiveDate,
}

impl Shaped for Person {
    fn shape() -> Shape {
        RecordShape::all_args("Person")
            .field("name", Shape::String)
            .field("birthdate", Shape::Date)
            .build()
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
struct PersonEC {
    name: String,
    birthdate: Option<NaiveDate>,
}

impl Shaped for PersonEC {
    fn shape() -> Shape {
        RecordShape::no_args("PersonEC")
            .field("name", Shape::String)
            .field("birthdate", Shape::nullable(Shape::Date))
            .build()
    }
}

#[derive(Deserialize, Debug, PartialEq)]
struct PersonAnnotated {
    name: String,
    birthdate: NaiveDate,
}

impl Shaped for PersonAnnotated {
    fn shape() -> Shape {
        RecordShape::all_args("PersonAnnotated")
            .field("name", Shape::String)
            .field("birthdate", Shape::Date)
            .ignore_unknown()
            .build()
    }
}

#[derive(Deserialize, Debug, PartialEq)]
struct PersonV2 {
    name: String,
    birthdate: NaiveDate,
    hobbies: Option<Vec<String>>,
}

impl Shaped for PersonV2 {
    fn shape() -> Shape {
        RecordShape::all_args("PersonV2")
            .field("name", Shape::String)
            .field("birthdate", Shape::Date)
            .field_or_null("hobbies", Shape::sequence(Shape::String))
            .build()
    }
}

fn person(name: &str, y: i32, m: u32, d: u32) -> Person {
    Person {
        name: name.to_string(),
        birthdate: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
    }
}

fn string_wrapping_module() -> Module {
    Module::new("string-objects")
        .with_encoder(ShapeKey::String, |value| {
            let text = value.as_str().unwrap_or_default();
            Ok(json!({ "string": text }))
        })
        .with_decoder(ShapeKey::String, |node| match node.get("string") {
            Some(JsonNode::String(s)) => Ok(Value::from(s.as_str())),
            _ => Err(Error::custom("expected an object with a `string` member")),
        })
}

// Serialization

#[test]
fn test_simple_string_is_not_an_object() {
    let json = Codec::new().write("Juan Garcia").unwrap();
    assert_eq!(json, "\"Juan Garcia\"");
}

#[test]
fn test_string_override_wraps_into_object() {
    let codec = Codec::builder()
        .register_module(string_wrapping_module())
        .build();
    let json = codec.write("Juan Garcia").unwrap();
    assert_eq!(json, r#"{"string":"Juan Garcia"}"#);
}

#[test]
fn test_list_of_strings() {
    let names = vec!["Juan Garcia", "Manuel Perez"];
    let json = Codec::new().write(&names).unwrap();
    assert_eq!(json, r#"["Juan Garcia","Manuel Perez"]"#);
}

#[test]
fn test_sorted_map_of_strings() {
    let mut names = BTreeMap::new();
    names.insert("name2".to_string(), "Manuel Perez".to_string());
    names.insert("name1".to_string(), "Juan Garcia".to_string());
    let json = Codec::new().write(&names).unwrap();
    assert_eq!(json, r#"{"name1":"Juan Garcia","name2":"Manuel Perez"}"#);
}

#[test]
fn test_list_of_person_names() {
    let names = vec![
        PersonName {
            name: "Juan Garcia".into(),
        },
        PersonName {
            name: "Manuel Perez".into(),
        },
    ];
    let json = Codec::new().write(&names).unwrap();
    assert_eq!(json, r#"[{"name":"Juan Garcia"},{"name":"Manuel Perez"}]"#);
}

#[test]
fn test_list_of_people_with_array_dates() {
    let people = vec![
        person("Juan Garcia", 1980, 9, 15),
        person("Manuel Perez", 1987, 7, 23),
    ];
    let json = Codec::new().write(&people).unwrap();
    assert_eq!(
        json,
        r#"[{"name":"Juan Garcia","birthdate":[1980,9,15]},{"name":"Manuel Perez","birthdate":[1987,7,23]}]"#
    );
}

#[test]
fn test_list_of_people_with_iso_date_module() {
    let codec = Codec::builder().register_module(Module::iso_dates()).build();
    let people = vec![
        person("Juan Garcia", 1980, 9, 15),
        person("Manuel Perez", 1987, 7, 23),
    ];
    let json = codec.write(&people).unwrap();
    assert_eq!(
        json,
        r#"[{"name":"Juan Garcia","birthdate":"1980-09-15"},{"name":"Manuel Perez","birthdate":"1987-07-23"}]"#
    );
}

// Deserialization

#[test]
fn test_list_of_strings_without_shape_details() {
    let codec = Codec::new();
    let list = codec.decode(r#"["Juan Garcia","Manuel Perez"]"#, &Shape::Any).unwrap();
    assert_eq!(list, Value::from(vec!["Juan Garcia", "Manuel Perez"]));
}

#[test]
fn test_list_of_string_objects_with_decoder_override() {
    let codec = Codec::builder()
        .register_module(string_wrapping_module())
        .build();
    let json = r#"[{"string":"Juan Garcia"},{"string":"Manuel Perez"}]"#;
    let values: Vec<String> = codec.read(json).unwrap();
    assert_eq!(values, vec!["Juan Garcia", "Manuel Perez"]);
}

#[test]
fn test_list_of_string_objects_through_tree() {
    let json = r#"[{"string":"Juan Garcia"},{"string":"Manuel Perez"}]"#;
    let tree = Codec::new().decode_tree(json).unwrap();
    assert_eq!(tree.find_values_as_text("string"), vec!["Juan Garcia", "Manuel Perez"]);
}

#[test]
fn test_all_args_record_requires_every_field() {
    let codec = Codec::new();
    let err = codec.read::<Person>(r#"{"name":"Juan Garcia"}"#).unwrap_err();
    match err {
        Error::RequiredFieldMissing { field, path } => {
            assert_eq!(field, "birthdate");
            assert_eq!(path.to_string(), "$");
        }
        other => panic!("Expected missing field, got {:?}", other),
    }

    let complete: Person = codec.read(PERSON_JSON).unwrap();
    assert_eq!(complete, person("Juan Garcia", 1980, 9, 15));
}

#[test]
fn test_no_args_record_decodes() {
    let value: PersonEC = Codec::new().read(PERSON_JSON).unwrap();
    assert_eq!(value.name, "Juan Garcia");
    assert_eq!(value.birthdate, NaiveDate::from_ymd_opt(1980, 9, 15));
}

#[test]
fn test_no_args_record_leaves_missing_fields_at_default() {
    let value: PersonEC = Codec::new().read("{}").unwrap();
    assert_eq!(value, PersonEC::default());
}

#[test]
fn test_annotated_record_decodes() {
    let value: PersonAnnotated = Codec::new().read(PERSON_JSON).unwrap();
    assert_eq!(value.name, "Juan Garcia");
    assert_eq!(value.birthdate, NaiveDate::from_ymd_opt(1980, 9, 15).unwrap());
}

#[test]
fn test_unknown_property_fails_by_default() {
    let err = Codec::new().read::<PersonEC>(PERSON_V2_JSON).unwrap_err();
    match err {
        Error::UnknownProperty { property, .. } => assert_eq!(property, "hobbies"),
        other => panic!("Expected unknown property, got {:?}", other),
    }
}

#[test]
fn test_unknown_property_ignored_when_configured() {
    let codec = Codec::with_options(CodecOptions::new().with_fail_on_unknown_properties(false));
    let value: PersonEC = codec.read(PERSON_V2_JSON).unwrap();
    assert_eq!(value.name, "Juan Garcia");
    assert_eq!(value.birthdate, NaiveDate::from_ymd_opt(1980, 9, 15));
}

#[test]
fn test_unknown_property_ignored_by_record() {
    let value: PersonAnnotated = Codec::new().read(PERSON_V2_JSON).unwrap();
    assert_eq!(value.name, "Juan Garcia");
}

#[test]
fn test_object_as_generic_mapping() {
    let value = Codec::new()
        .decode(PERSON_V2_JSON, &Shape::mapping(Shape::Any))
        .unwrap();
    assert_eq!(value.get("name"), Some(&Value::from("Juan Garcia")));
    assert_eq!(value.get("birthdate"), Some(&Value::from(vec![1980, 9, 15])));
    assert_eq!(value.get("hobbies"), Some(&Value::from(vec!["football", "squash"])));
}

#[test]
fn test_list_of_objects_as_mappings() {
    let shape = Shape::sequence(Shape::mapping(Shape::Any));
    let value = Codec::new().decode(PERSON_V2_LIST_JSON, &shape).unwrap();
    let people = value.as_sequence().unwrap();
    assert_eq!(people[0].get("name"), Some(&Value::from("Juan Garcia")));
    assert_eq!(people[1].get("name"), Some(&Value::from("Manuel Perez")));
}

#[test]
fn test_list_of_records_with_missing_field_as_null() {
    let value = Codec::new()
        .decode(PERSON_V2_LIST_JSON, &Shape::sequence(PersonV2::shape()))
        .unwrap();
    let people = value.as_sequence().unwrap();
    assert_eq!(people[1].get("hobbies"), Some(&Value::Null));

    let typed: Vec<PersonV2> = Codec::new().read(PERSON_V2_LIST_JSON).unwrap();
    assert_eq!(typed[0].name, "Juan Garcia");
    assert_eq!(typed[1].name, "Manuel Perez");
    assert_eq!(typed[1].birthdate, NaiveDate::from_ymd_opt(1987, 7, 23).unwrap());
    assert_eq!(typed[1].hobbies, None);
}

#[test]
fn test_list_of_records_with_optional_field() {
    let shape = Shape::sequence(
        RecordShape::all_args("PersonV2Optional")
            .field("name", Shape::String)
            .field("birthdate", Shape::Date)
            .field("hobbies", Shape::optional(Shape::sequence(Shape::String)))
            .build(),
    );
    let value = Codec::new().decode(PERSON_V2_LIST_JSON, &shape).unwrap();
    let people = value.as_sequence().unwrap();

    let hobbies = people[0].get("hobbies").and_then(Value::as_present);
    assert_eq!(hobbies.and_then(Value::as_sequence).map(Vec::len), Some(2));
    assert_eq!(people[1].get("hobbies"), Some(&Value::absent()));
}

#[test]
fn test_record_values_round_trip_through_shape() {
    let original: Value = Record::new("Person")
        .with_field("name", "Manuel Perez")
        .with_field("birthdate", NaiveDate::from_ymd_opt(1987, 7, 23).unwrap())
        .into();
    let codec = Codec::new();
    let json = codec.encode(&original).unwrap();
    assert_eq!(codec.decode(&json, &Person::shape()).unwrap(), original);
}
