//! Typed JSON writing and reading with shape descriptors.
//!
//! Run with: cargo run --example simple

use chrono::NaiveDate;
use json_mapper::{from_str, to_string, to_string_pretty, RecordShape, Shape, Shaped};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Serialize, Deserialize, PartialEq)]
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

fn main() -> Result<(), Box<dyn Error>> {
    let people = vec![
        Person {
            name: "Juan Garcia".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1980, 9, 15).ok_or("bad date")?,
            hobbies: Some(vec!["football".to_string(), "squash".to_string()]),
        },
        Person {
            name: "Manuel Perez".to_string(),
            birthdate: NaiveDate::from_ymd_opt(1987, 7, 23).ok_or("bad date")?,
            hobbies: None,
        },
    ];

    let json = to_string(&people)?;
    println!("Compact output:\n{}\n", json);
    println!("Pretty output:\n{}\n", to_string_pretty(&people)?);

    let people_back: Vec<Person> = from_str(&json)?;
    assert_eq!(people, people_back);
    println!("Round-trip successful");

    match from_str::<Vec<Person>>(r#"[{"name":"Juan Garcia","birthdate":[1980,9,15],"age":44}]"#) {
        Ok(_) => println!("Unexpectedly accepted an unknown property"),
        Err(e) => println!("Rejected as expected: {}", e),
    }

    Ok(())
}
