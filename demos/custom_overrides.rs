//! Overrides, modules and codec options.
//!
//! Run with: cargo run --example custom_overrides

use chrono::NaiveDate;
use json_mapper::{
    json, Codec, CodecOptions, Error, JsonNode, Module, Record, RecordShape, Shape, ShapeKey,
    Value,
};

fn wrapped_strings() -> Module {
    Module::new("wrapped-strings")
        .with_encoder(ShapeKey::String, |value| {
            let text = value.as_str().unwrap_or_default();
            Ok(json!({ "string": text }))
        })
        .with_decoder(ShapeKey::String, |node| match node.get("string") {
            Some(JsonNode::String(s)) => Ok(Value::from(s.as_str())),
            _ => Err(Error::custom("expected {\"string\": ...}")),
        })
}

fn main() -> Result<(), Error> {
    let person: Value = Record::new("Person")
        .with_field("name", "Juan Garcia")
        .with_field(
            "birthdate",
            NaiveDate::from_ymd_opt(1980, 9, 15).ok_or_else(|| Error::custom("bad date"))?,
        )
        .into();
    let shape = RecordShape::no_args("Person")
        .field("name", Shape::String)
        .field("birthdate", Shape::Date)
        .build();

    println!("Default:        {}", Codec::new().encode(&person)?);

    let iso = Codec::builder().register_module(Module::iso_dates()).build();
    println!("ISO dates:      {}", iso.encode(&person)?);

    let wrapped = Codec::builder()
        .register_module(wrapped_strings())
        .register_module(Module::iso_dates())
        .build();
    let json = wrapped.encode(&person)?;
    println!("Wrapped:        {}", json);
    println!("Decoded back:   {:?}", wrapped.decode(&json, &shape)?);

    let lenient = Codec::builder()
        .options(CodecOptions::pretty().with_fail_on_unknown_properties(false))
        .build();
    let value = lenient.decode(
        r#"{"name":"Manuel Perez","birthdate":"1987-07-23","hobbies":["football"]}"#,
        &shape,
    )?;
    println!("Lenient pretty:\n{}", lenient.encode(&value)?);

    Ok(())
}
