//! Message encoding.
//!
//! This module provides the [`Encoder`], which walks a [`Message`] against its
//! [`MessageDescriptor`] and writes one of the wire framings.
//!
//! ## Overview
//!
//! - **Array framings**: present fields in ascending number order, every
//!   skipped slot before a present field written as `null`, nothing after
//!   the last present field
//! - **Object framings**: present fields in declaration order, keyed by
//!   number or name
//! - **64-bit integers**: always quoted so that no precision is lost
//! - **Undeclared entries**: message entries whose number the descriptor
//!   does not declare are not written
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use protojs::{
//!     to_string, CodecOptions, FieldDescriptor, FieldType, Message, MessageDescriptor, Value,
//! };
//!
//! let descriptor = MessageDescriptor::builder("Sparse")
//!     .field(FieldDescriptor::new(2, "id", FieldType::UInt64))
//!     .field(FieldDescriptor::new(5, "name", FieldType::String))
//!     .build()
//!     .unwrap();
//! let mut message = Message::new();
//! message.set(2, Value::UInt64(u64::MAX));
//! message.set(5, Value::from("x"));
//!
//! let text = to_string(&message, &descriptor, CodecOptions::array()).unwrap();
//! assert_eq!(text, r#"[null,"18446744073709551615",null,null,"x"]"#);
//! ```
//!
//! ## Direct Encoder Usage
//!
//! ```rust
//! use protojs::{
//!     CodecOptions, Encoder, FieldDescriptor, FieldType, Message, MessageDescriptor, Value,
//! };
//!
//! let descriptor = MessageDescriptor::builder("Tick")
//!     .field(FieldDescriptor::new(1, "seq", FieldType::UInt32))
//!     .build()
//!     .unwrap();
//! let mut tick = Message::new();
//! tick.set(1, Value::UInt32(7));
//!
//! let mut out = Vec::new();
//! let mut encoder = Encoder::new(&mut out, CodecOptions::object_by_name());
//! encoder.encode(&tick, &descriptor).unwrap();
//! encoder.encode(&tick, &descriptor).unwrap();
//! assert_eq!(out, br#"{"seq":7}{"seq":7}"#);
//! ```

use std::io::Write;

use tracing::trace;

use crate::schema::{FieldDescriptor, FieldType, MessageDescriptor};
use crate::stream::OutputStream;
use crate::text::{escape_bytes, escape_str, format_f32, format_f64};
use crate::value::FieldValue;
use crate::{CodecOptions, Error, Message, Result, Value};

/// Pending output is handed to the stream once it grows past this size.
const FLUSH_THRESHOLD: usize = 4096;

/// Writes messages to an [`OutputStream`].
pub struct Encoder<'a, O: OutputStream + ?Sized> {
    output: &'a mut O,
    options: CodecOptions,
    scratch: Vec<u8>,
}

impl<'a, O: OutputStream + ?Sized> Encoder<'a, O> {
    pub fn new(output: &'a mut O, options: CodecOptions) -> Self {
        Encoder {
            output,
            options,
            scratch: Vec::with_capacity(256),
        }
    }

    /// Encodes `message` and writes it to the stream.
    ///
    /// # Errors
    ///
    /// Fails when a stored value does not match its field descriptor, when a
    /// float is not finite, and when the stream cannot take more bytes.
    pub fn encode(&mut self, message: &Message, descriptor: &MessageDescriptor) -> Result<()> {
        trace!(
            target: "protojs::encode",
            message = descriptor.name(),
            format = ?self.options.format,
            "encoding message"
        );
        let result = self.write_message(message, descriptor).and_then(|()| self.flush());
        if result.is_err() {
            self.scratch.clear();
        }
        result
    }

    fn flush(&mut self) -> Result<()> {
        if !self.scratch.is_empty() {
            self.output.write_all(&self.scratch)?;
            self.scratch.clear();
        }
        Ok(())
    }

    fn flush_if_full(&mut self) -> Result<()> {
        if self.scratch.len() >= FLUSH_THRESHOLD {
            self.flush()?;
        }
        Ok(())
    }

    fn write_message(&mut self, message: &Message, descriptor: &MessageDescriptor) -> Result<()> {
        let (open, close) = self.options.format.brackets();
        self.scratch.push(open);
        if self.options.format.is_array() {
            self.write_slots(message, descriptor)?;
        } else {
            self.write_members(message, descriptor)?;
        }
        self.scratch.push(close);

        for number in message.numbers() {
            if descriptor.field_by_number(*number).is_none() {
                trace!(
                    target: "protojs::encode",
                    message = descriptor.name(),
                    field = number,
                    "entry without a declared field not written"
                );
            }
        }
        Ok(())
    }

    fn write_slots(&mut self, message: &Message, descriptor: &MessageDescriptor) -> Result<()> {
        let first_slot = self.options.format.first_slot();
        let mut next_index: u32 = 0;
        for field in descriptor.fields_by_number() {
            let Some(stored) = message.field(field.number()) else {
                continue;
            };
            let index = field.number() - first_slot;
            while next_index < index {
                if next_index > 0 {
                    self.scratch.push(b',');
                }
                self.scratch.extend_from_slice(b"null");
                next_index += 1;
                self.flush_if_full()?;
            }
            if next_index > 0 {
                self.scratch.push(b',');
            }
            self.write_field(field, stored)?;
            next_index = index + 1;
            self.flush_if_full()?;
        }
        Ok(())
    }

    fn write_members(&mut self, message: &Message, descriptor: &MessageDescriptor) -> Result<()> {
        let by_name = !matches!(self.options.format, crate::Format::ObjectByTag);
        let mut first = true;
        for field in descriptor.fields() {
            let Some(stored) = message.field(field.number()) else {
                continue;
            };
            if !first {
                self.scratch.push(b',');
            }
            first = false;

            self.scratch.push(b'"');
            if by_name {
                escape_str(&mut self.scratch, field.name());
            } else {
                write!(self.scratch, "{}", field.number())?;
            }
            self.scratch.extend_from_slice(b"\":");
            self.write_field(field, stored)?;
            self.flush_if_full()?;
        }
        Ok(())
    }

    fn write_field(&mut self, field: &FieldDescriptor, stored: &FieldValue) -> Result<()> {
        match (field.is_repeated(), stored) {
            (false, FieldValue::Single(value)) => self.write_value(field, value),
            (true, FieldValue::Repeated(values)) => {
                self.scratch.push(b'[');
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.scratch.push(b',');
                    }
                    self.write_value(field, value)?;
                    self.flush_if_full()?;
                }
                self.scratch.push(b']');
                Ok(())
            }
            (true, FieldValue::Single(value)) => Err(Error::type_mismatch(
                field.name(),
                format!("list of {}", field.field_type()),
                format!("single {}", value.kind_name()),
            )),
            (false, FieldValue::Repeated(_)) => Err(Error::type_mismatch(
                field.name(),
                field.field_type().to_string(),
                "list",
            )),
        }
    }

    fn write_value(&mut self, field: &FieldDescriptor, value: &Value) -> Result<()> {
        let mismatch = || {
            Error::type_mismatch(
                field.name(),
                field.field_type().to_string(),
                value.kind_name(),
            )
        };
        match field.field_type() {
            FieldType::Bool => {
                let Value::Bool(b) = value else {
                    return Err(mismatch());
                };
                let text: &[u8] = match (self.options.booleans_as_numbers, b) {
                    (true, true) => b"1",
                    (true, false) => b"0",
                    (false, true) => b"true",
                    (false, false) => b"false",
                };
                self.scratch.extend_from_slice(text);
            }
            FieldType::Int32 => {
                let Value::Int32(n) = value else {
                    return Err(mismatch());
                };
                write!(self.scratch, "{n}")?;
            }
            FieldType::UInt32 => {
                let Value::UInt32(n) = value else {
                    return Err(mismatch());
                };
                write!(self.scratch, "{n}")?;
            }
            FieldType::Enum(_) => {
                let Value::Enum(n) = value else {
                    return Err(mismatch());
                };
                write!(self.scratch, "{n}")?;
            }
            FieldType::Int64 => {
                let Value::Int64(n) = value else {
                    return Err(mismatch());
                };
                if field.is_int64_as_number() {
                    write!(self.scratch, "{n}")?;
                } else {
                    write!(self.scratch, "\"{n}\"")?;
                }
            }
            FieldType::UInt64 => {
                let Value::UInt64(n) = value else {
                    return Err(mismatch());
                };
                if field.is_int64_as_number() {
                    write!(self.scratch, "{n}")?;
                } else {
                    write!(self.scratch, "\"{n}\"")?;
                }
            }
            FieldType::Float => {
                let Value::Float(v) = value else {
                    return Err(mismatch());
                };
                self.scratch.extend_from_slice(format_f32(*v)?.as_bytes());
            }
            FieldType::Double => {
                let Value::Double(v) = value else {
                    return Err(mismatch());
                };
                self.scratch.extend_from_slice(format_f64(*v)?.as_bytes());
            }
            FieldType::String => {
                let Value::String(s) = value else {
                    return Err(mismatch());
                };
                self.scratch.push(b'"');
                escape_str(&mut self.scratch, s);
                self.scratch.push(b'"');
            }
            FieldType::Bytes => {
                let Value::Bytes(bytes) = value else {
                    return Err(mismatch());
                };
                self.scratch.push(b'"');
                escape_bytes(&mut self.scratch, bytes);
                self.scratch.push(b'"');
            }
            FieldType::Message(nested) => {
                let Value::Message(message) = value else {
                    return Err(mismatch());
                };
                self.write_message(message, nested)?;
            }
        }
        Ok(())
    }
}
