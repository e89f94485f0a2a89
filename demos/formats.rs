//! The same message in every framing.
//!
//! Run with: cargo run --example formats

use std::sync::Arc;

use protojs::{
    from_str, message, to_string, CodecOptions, EnumDescriptor, FieldDescriptor, FieldType, Format,
    MessageDescriptor, Value,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let unit = Arc::new(EnumDescriptor::new("Unit", [("CELSIUS", 0), ("KELVIN", 1)]));
    let descriptor = MessageDescriptor::builder("Reading")
        .field(FieldDescriptor::new(1, "sensor", FieldType::String))
        .field(FieldDescriptor::new(2, "ok", FieldType::Bool))
        .field(FieldDescriptor::new(4, "values", FieldType::Double).repeated())
        .field(FieldDescriptor::new(6, "unit", FieldType::Enum(unit)))
        .build()?;

    let mut reading = message! {
        1 => "sensor-7",
        2 => true,
        4 => [21.5, 22.0, 1e-9],
    };
    reading.set(6, Value::Enum(1));

    for format in [
        Format::Array,
        Format::ArrayStartingAtOne,
        Format::ObjectByTag,
        Format::ObjectByName,
    ] {
        let options = CodecOptions::new().with_format(format);
        let text = to_string(&reading, &descriptor, options)?;
        println!("{:<20} {}", format!("{format:?}:"), text);
        assert_eq!(from_str(&text, &descriptor, options)?, reading);
    }

    let numeric = CodecOptions::array().with_booleans_as_numbers(true);
    println!("{:<20} {}", "Array, numeric bool:", to_string(&reading, &descriptor, numeric)?);

    Ok(())
}
