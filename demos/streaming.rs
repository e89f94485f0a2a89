//! Several messages written to and read from one chunked stream.
//!
//! Run with: cargo run --example streaming

use protojs::stream::{ReaderInput, WriterOutput};
use protojs::{
    message, CodecOptions, Decoder, Encoder, FieldDescriptor, FieldType, Message,
    MessageDescriptor,
};
use std::error::Error;
use std::io::Cursor;

fn main() -> Result<(), Box<dyn Error>> {
    let descriptor = MessageDescriptor::builder("Event")
        .field(FieldDescriptor::new(1, "seq", FieldType::UInt64))
        .field(FieldDescriptor::new(2, "kind", FieldType::String))
        .field(FieldDescriptor::new(3, "payload", FieldType::Bytes))
        .build()?;
    let options = CodecOptions::object_by_tag();

    let events: Vec<Message> = (1..=3_u64)
        .map(|seq| {
            message! {
                1 => seq,
                2 => if seq % 2 == 0 { "tick" } else { "tock" },
                3 => vec![seq as u8, 0xff],
            }
        })
        .collect();

    let mut output = WriterOutput::new(Vec::new());
    {
        let mut encoder = Encoder::new(&mut output, options);
        for event in &events {
            encoder.encode(event, &descriptor)?;
        }
    }
    let wire = output.finish()?;
    println!("Wire text: {}", String::from_utf8_lossy(&wire));

    // Read back through a deliberately small buffer.
    let mut input = ReaderInput::with_capacity(Cursor::new(wire), 5);
    let mut decoder = Decoder::new(&mut input, options);
    for expected in &events {
        let mut event = Message::new();
        decoder.decode(&mut event, &descriptor)?;
        assert_eq!(&event, expected);
        println!("Decoded event at byte {}: {:?}", decoder.offset(), event);
    }
    decoder.end()?;

    Ok(())
}
