//! # protojs
//!
//! A JSON-like text codec for schema-defined messages with numbered, typed
//! fields (the protocol buffer data model).
//!
//! ## Key Features
//!
//! - **Three framings**: positional PB-lite arrays, objects keyed by field
//!   number, objects keyed by field name (plus the legacy one-based array)
//! - **Precision preserving**: 64-bit integers travel as quoted decimals
//! - **Streaming**: reads and writes through chunked byte streams with
//!   pushback, so the input never has to be contiguous
//! - **Dynamic**: messages are built against runtime descriptors; no code
//!   generation is needed
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```rust
//! use protojs::{
//!     from_str, message, to_string, CodecOptions, FieldDescriptor, FieldType, MessageDescriptor,
//! };
//!
//! let descriptor = MessageDescriptor::builder("User")
//!     .field(FieldDescriptor::new(1, "id", FieldType::Int64))
//!     .field(FieldDescriptor::new(2, "name", FieldType::String))
//!     .field(FieldDescriptor::new(4, "tags", FieldType::String).repeated())
//!     .build()
//!     .unwrap();
//!
//! let user = message! {
//!     1 => 9_007_199_254_740_993_i64,
//!     2 => "Alice",
//!     4 => ["admin", "ops"],
//! };
//!
//! let text = to_string(&user, &descriptor, CodecOptions::array()).unwrap();
//! assert_eq!(text, r#"["9007199254740993","Alice",null,["admin","ops"]]"#);
//!
//! let back = from_str(&text, &descriptor, CodecOptions::array()).unwrap();
//! assert_eq!(back, user);
//! ```
//!
//! ### Object Framings
//!
//! ```rust
//! use protojs::{message, to_string, CodecOptions, FieldDescriptor, FieldType, MessageDescriptor};
//!
//! let descriptor = MessageDescriptor::builder("Flag")
//!     .field(FieldDescriptor::new(1, "on", FieldType::Bool))
//!     .build()
//!     .unwrap();
//! let flag = message! { 1 => true };
//!
//! let by_tag = to_string(&flag, &descriptor, CodecOptions::object_by_tag()).unwrap();
//! let by_name = to_string(&flag, &descriptor, CodecOptions::object_by_name()).unwrap();
//! assert_eq!(by_tag, r#"{"1":true}"#);
//! assert_eq!(by_name, r#"{"on":true}"#);
//! ```
//!
//! ## Streams
//!
//! [`encode`] and [`decode`] work on any [`OutputStream`] / [`InputStream`].
//! After [`decode`] returns, the input stream is positioned right after the
//! message, so several messages can be read back to back. The `to_*` and
//! `from_*` helpers wrap the common cases; the `from_*` helpers also reject
//! anything but whitespace after the message.
//!
//! ## Logging
//!
//! The codec emits [`tracing`] events under the `protojs::decode` and
//! `protojs::encode` targets: `trace` at the start of each message, `debug`
//! when an unknown field is skipped. No subscriber is installed.
//!
//! ## Format Reference
//!
//! The wire format is documented in the [`grammar`] module.
//!
//! ## Examples
//!
//! See the `demos/` directory:
//!
//! - **`simple.rs`** - describe, encode and decode one message
//! - **`formats.rs`** - the same message in every framing
//! - **`streaming.rs`** - several messages over a chunked stream
//!
//! Run any example with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod macros;
pub mod message;
pub mod options;
pub mod schema;
pub mod ser;
pub mod stream;
pub mod text;
pub mod value;

pub use de::Decoder;
pub use error::{Error, ErrorCategory, Result};
pub use message::Message;
pub use options::{CodecOptions, Format, UnknownFields};
pub use schema::{
    EnumDescriptor, EnumValue, FieldDescriptor, FieldType, MessageDescriptor,
    MessageDescriptorBuilder,
};
pub use ser::Encoder;
pub use stream::{InputStream, OutputStream};
pub use value::{FieldValue, Value};

use std::io;

use stream::{ReaderInput, SliceInput, WriterOutput};

/// Encode `message` into `output`.
///
/// # Errors
///
/// Returns an error if a value does not match its field descriptor, a float
/// is not finite, or the stream cannot accept more bytes.
pub fn encode<O>(
    message: &Message,
    descriptor: &MessageDescriptor,
    options: CodecOptions,
    output: &mut O,
) -> Result<()>
where
    O: OutputStream + ?Sized,
{
    Encoder::new(output, options).encode(message, descriptor)
}

/// Decode one message from `input` into `message`.
///
/// The stream is left right after the message's closing bracket; trailing
/// bytes are not examined.
///
/// # Examples
///
/// ```rust
/// use protojs::stream::SliceInput;
/// use protojs::{
///     decode, CodecOptions, FieldDescriptor, FieldType, Message, MessageDescriptor, Value,
/// };
///
/// let descriptor = MessageDescriptor::builder("Point")
///     .field(FieldDescriptor::new(1, "x", FieldType::Int32))
///     .build()
///     .unwrap();
///
/// let mut input = SliceInput::with_chunk_size(b"[7] rest", 3);
/// let mut point = Message::new();
/// decode(&mut point, &descriptor, CodecOptions::array(), &mut input).unwrap();
///
/// assert_eq!(point.get(1), Some(&Value::Int32(7)));
/// assert_eq!(input.remaining(), b" rest");
/// ```
///
/// # Errors
///
/// Returns an error on the first grammar or schema violation, or if the
/// stream fails.
pub fn decode<I>(
    message: &mut Message,
    descriptor: &MessageDescriptor,
    options: CodecOptions,
    input: &mut I,
) -> Result<()>
where
    I: InputStream + ?Sized,
{
    Decoder::new(input, options).decode(message, descriptor)
}

/// Encode `message` to a byte vector.
///
/// # Errors
///
/// See [`encode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_vec(
    message: &Message,
    descriptor: &MessageDescriptor,
    options: CodecOptions,
) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(128);
    encode(message, descriptor, options, &mut out)?;
    Ok(out)
}

/// Encode `message` to a string.
///
/// # Errors
///
/// See [`encode`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string(
    message: &Message,
    descriptor: &MessageDescriptor,
    options: CodecOptions,
) -> Result<String> {
    let bytes = to_vec(message, descriptor, options)?;
    String::from_utf8(bytes).map_err(|e| Error::invalid_string(e.to_string()))
}

/// Encode `message` to a writer, returning the writer once everything is flushed.
///
/// # Examples
///
/// ```rust
/// use protojs::{message, to_writer, CodecOptions, FieldDescriptor, FieldType, MessageDescriptor};
///
/// let descriptor = MessageDescriptor::builder("Point")
///     .field(FieldDescriptor::new(1, "x", FieldType::Int32))
///     .build()
///     .unwrap();
///
/// let point = message! { 1 => 3 };
/// let buffer = to_writer(Vec::new(), &point, &descriptor, CodecOptions::array()).unwrap();
/// assert_eq!(buffer, b"[3]");
/// ```
///
/// # Errors
///
/// See [`encode`]. Write failures of the writer are reported as [`Error::Io`].
pub fn to_writer<W>(
    writer: W,
    message: &Message,
    descriptor: &MessageDescriptor,
    options: CodecOptions,
) -> Result<W>
where
    W: io::Write,
{
    let mut output = WriterOutput::new(writer);
    encode(message, descriptor, options, &mut output)?;
    Ok(output.finish()?)
}

/// Decode one complete message from bytes.
///
/// Only whitespace may follow the message.
///
/// # Errors
///
/// See [`decode`]. Also fails with [`Error::TrailingCharacters`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(
    bytes: &[u8],
    descriptor: &MessageDescriptor,
    options: CodecOptions,
) -> Result<Message> {
    let mut input = SliceInput::new(bytes);
    read_complete(&mut input, descriptor, options)
}

/// Decode one complete message from a string.
///
/// # Errors
///
/// See [`from_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str(
    text: &str,
    descriptor: &MessageDescriptor,
    options: CodecOptions,
) -> Result<Message> {
    from_slice(text.as_bytes(), descriptor, options)
}

/// Decode one complete message from a reader.
///
/// # Examples
///
/// ```rust
/// use protojs::{from_reader, CodecOptions, FieldDescriptor, FieldType, MessageDescriptor};
/// use std::io::Cursor;
///
/// let descriptor = MessageDescriptor::builder("Point")
///     .field(FieldDescriptor::new(1, "x", FieldType::Int32))
///     .build()
///     .unwrap();
///
/// let input = Cursor::new(b"{\"x\":1}\n");
/// let point = from_reader(input, &descriptor, CodecOptions::object_by_name()).unwrap();
/// assert!(point.has(1));
/// ```
///
/// # Errors
///
/// See [`from_slice`]. Read failures are reported as [`Error::Io`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(
    reader: R,
    descriptor: &MessageDescriptor,
    options: CodecOptions,
) -> Result<Message>
where
    R: io::Read,
{
    let mut input = ReaderInput::new(reader);
    read_complete(&mut input, descriptor, options)
}

fn read_complete<I>(
    input: &mut I,
    descriptor: &MessageDescriptor,
    options: CodecOptions,
) -> Result<Message>
where
    I: InputStream + ?Sized,
{
    let mut message = Message::new();
    let mut decoder = Decoder::new(input, options);
    decoder.decode(&mut message, descriptor)?;
    decoder.end()?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message;
    use std::sync::Arc;

    fn user() -> MessageDescriptor {
        let address = Arc::new(
            MessageDescriptor::builder("Address")
                .field(FieldDescriptor::new(1, "city", FieldType::String))
                .build()
                .unwrap(),
        );
        MessageDescriptor::builder("User")
            .field(FieldDescriptor::new(1, "id", FieldType::UInt64))
            .field(FieldDescriptor::new(2, "active", FieldType::Bool))
            .field(FieldDescriptor::new(3, "address", FieldType::Message(address)))
            .build()
            .unwrap()
    }

    #[test]
    fn test_roundtrip_all_formats() {
        let value = message! {
            1 => u64::MAX,
            2 => false,
            3 => message! { 1 => "Oslo" },
        };
        for format in [
            Format::Array,
            Format::ObjectByTag,
            Format::ObjectByName,
            Format::ArrayStartingAtOne,
        ] {
            let options = CodecOptions::new().with_format(format);
            let text = to_string(&value, &user(), options).unwrap();
            assert_eq!(from_str(&text, &user(), options).unwrap(), value, "{format:?}: {text}");
        }
    }

    #[test]
    fn test_trailing_characters() {
        let err = from_str("[] x", &user(), CodecOptions::array()).unwrap_err();
        assert!(matches!(err, Error::TrailingCharacters { offset: 3 }));
        assert!(from_str(" [] \n", &user(), CodecOptions::array()).is_ok());
    }

    #[test]
    fn test_to_writer() {
        let options = CodecOptions::object_by_name();
        let out = to_writer(Vec::new(), &message! { 2 => true }, &user(), options).unwrap();
        assert_eq!(out, br#"{"active":true}"#);
    }

    #[test]
    fn test_from_reader_chunks() {
        let text = br#"{"1":"12","3":{"1":"x"}}"#;
        let mut reader = ReaderInput::with_capacity(&text[..], 2);
        let mut message = Message::new();
        decode(&mut message, &user(), CodecOptions::object_by_tag(), &mut reader).unwrap();
        assert_eq!(message.get(1), Some(&Value::UInt64(12)));
    }
}
