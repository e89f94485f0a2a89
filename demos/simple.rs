//! Describe a message, encode it and read it back.
//!
//! Run with: cargo run --example simple

use protojs::{
    from_str, message, to_string, CodecOptions, FieldDescriptor, FieldType, MessageDescriptor,
    Value,
};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let descriptor = MessageDescriptor::builder("User")
        .field(FieldDescriptor::new(1, "id", FieldType::Int64))
        .field(FieldDescriptor::new(2, "name", FieldType::String))
        .field(FieldDescriptor::new(3, "email", FieldType::String))
        .field(FieldDescriptor::new(5, "roles", FieldType::String).repeated())
        .build()?;

    let user = message! {
        1 => 9_007_199_254_740_993_i64,
        2 => "Alice Johnson",
        5 => ["admin", "billing"],
    };

    let text = to_string(&user, &descriptor, CodecOptions::array())?;
    println!("Encoded:\n{}\n", text);

    let back = from_str(&text, &descriptor, CodecOptions::array())?;
    assert_eq!(user, back);
    println!("id survives intact: {:?}", back.get(1).and_then(Value::as_i64));
    println!("Round-trip successful");

    Ok(())
}
