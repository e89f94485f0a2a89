//! Message decoding.
//!
//! This module provides the [`Decoder`], a recursive-descent reader that
//! fills a [`Message`] from one of the wire framings.
//!
//! ## Overview
//!
//! - **Array framings**: element `i` is field `i + 1` (or field `i` in the
//!   legacy framing); `null` elements are empty slots
//! - **Object framings**: keys are decimal field numbers or field names
//! - **Unknown fields**: skipped or rejected according to
//!   [`UnknownFields`]
//! - **Stream position**: after a successful call the input stream sits right
//!   after the closing bracket of the message
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use protojs::{from_str, CodecOptions, FieldDescriptor, FieldType, MessageDescriptor, Value};
//!
//! let descriptor = MessageDescriptor::builder("User")
//!     .field(FieldDescriptor::new(1, "id", FieldType::Int64))
//!     .field(FieldDescriptor::new(2, "name", FieldType::String))
//!     .build()
//!     .unwrap();
//!
//! let user = from_str(r#"["42","Alice"]"#, &descriptor, CodecOptions::array()).unwrap();
//! assert_eq!(user.get(1), Some(&Value::Int64(42)));
//! assert_eq!(user.get(2).and_then(Value::as_str), Some("Alice"));
//! ```
//!
//! ## Direct Decoder Usage
//!
//! A [`Decoder`] can read several messages from one stream:
//!
//! ```rust
//! use protojs::stream::SliceInput;
//! use protojs::{CodecOptions, Decoder, FieldDescriptor, FieldType, Message, MessageDescriptor};
//!
//! let descriptor = MessageDescriptor::builder("Tick")
//!     .field(FieldDescriptor::new(1, "seq", FieldType::UInt32))
//!     .build()
//!     .unwrap();
//!
//! let mut input = SliceInput::new(b"[1] [2]");
//! let mut decoder = Decoder::new(&mut input, CodecOptions::array());
//! let mut first = Message::new();
//! let mut second = Message::new();
//! decoder.decode(&mut first, &descriptor).unwrap();
//! decoder.decode(&mut second, &descriptor).unwrap();
//! decoder.end().unwrap();
//! assert_eq!(second.size(1), 1);
//! ```

use std::str::FromStr;

use tracing::{debug, trace};

use crate::lexer::{Lexer, Token};
use crate::schema::{FieldDescriptor, FieldType, MessageDescriptor};
use crate::stream::InputStream;
use crate::text::{parse_numeric_bool, unescape_bytes, unescape_str};
use crate::{CodecOptions, Error, Format, Message, Result, UnknownFields, Value};

/// Reads messages from an [`InputStream`].
///
/// Unconsumed input is returned to the stream when the decoder is dropped.
pub struct Decoder<'a, I: InputStream + ?Sized> {
    lexer: Lexer<'a, I>,
    options: CodecOptions,
}

impl<'a, I: InputStream + ?Sized> Decoder<'a, I> {
    pub fn new(input: &'a mut I, options: CodecOptions) -> Self {
        Decoder {
            lexer: Lexer::new(input),
            options,
        }
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.lexer.offset()
    }

    /// Decodes one message into `message`.
    ///
    /// Fields already present in `message` are kept unless the input sets
    /// them again; repeated fields are appended to.
    ///
    /// # Errors
    ///
    /// Fails on the first grammar or schema violation. `message` may then
    /// hold some of the fields read before the failure.
    pub fn decode(&mut self, message: &mut Message, descriptor: &MessageDescriptor) -> Result<()> {
        trace!(
            target: "protojs::decode",
            message = descriptor.name(),
            format = ?self.options.format,
            offset = self.offset(),
            "decoding message"
        );
        let token = self.lexer.read_token(false)?;
        self.decode_message(message, descriptor, token)
    }

    /// Checks that only whitespace remains in the stream.
    pub fn end(&mut self) -> Result<()> {
        if self.lexer.is_at_end()? {
            Ok(())
        } else {
            Err(Error::TrailingCharacters {
                offset: self.offset(),
            })
        }
    }

    fn decode_message(
        &mut self,
        message: &mut Message,
        descriptor: &MessageDescriptor,
        token: Token,
    ) -> Result<()> {
        let open = if self.options.format.is_array() {
            Token::ArrayOpen
        } else {
            Token::ObjectOpen
        };
        if token != open {
            let expected = format!("{open} to open {}", descriptor.name());
            return Err(self.lexer.unexpected(token, &expected));
        }
        self.lexer.expect(open)?;

        match self.options.format {
            Format::Array | Format::ArrayStartingAtOne => self.decode_array(message, descriptor),
            Format::ObjectByTag | Format::ObjectByName => self.decode_object(message, descriptor),
        }
    }

    fn decode_array(
        &mut self,
        message: &mut Message,
        descriptor: &MessageDescriptor,
    ) -> Result<()> {
        if self.lexer.read_token(false)? == Token::ArrayClose {
            return self.lexer.expect(Token::ArrayClose);
        }

        let first_slot = self.options.format.first_slot();
        let mut index: u32 = 0;
        loop {
            let token = self.lexer.read_token(false)?;
            match token {
                Token::Comma | Token::ArrayClose => {
                    return Err(Error::syntax(self.offset(), "empty array element"));
                }
                Token::Null => {}
                _ => {
                    let number = index.saturating_add(first_slot);
                    match descriptor.field_by_number(number) {
                        Some(field) => self.decode_field(message, field, token)?,
                        None => self.unknown_field(descriptor, &number.to_string(), token)?,
                    }
                }
            }

            match self.lexer.read_token(true)? {
                Token::Comma => {}
                Token::ArrayClose => return Ok(()),
                other => return Err(self.lexer.unexpected(other, "`,` or `]`")),
            }
            index = index
                .checked_add(1)
                .ok_or_else(|| Error::syntax(self.offset(), "array has too many elements"))?;
        }
    }

    fn decode_object(
        &mut self,
        message: &mut Message,
        descriptor: &MessageDescriptor,
    ) -> Result<()> {
        if self.lexer.read_token(false)? == Token::ObjectClose {
            return self.lexer.expect(Token::ObjectClose);
        }

        loop {
            self.lexer.expect(Token::StringStart)?;
            let key_offset = self.offset();
            let raw = self.lexer.read_string()?;
            let (key, field) = match self.options.format {
                Format::ObjectByTag => {
                    let key = unescape_str(&raw)?;
                    let number = parse_tag(key.as_bytes()).ok_or_else(|| {
                        Error::syntax(key_offset, "object key is not a field number")
                    })?;
                    (number.to_string(), descriptor.field_by_number(number))
                }
                _ => {
                    let name = unescape_str(&raw)?;
                    let field = descriptor.field_by_name(&name);
                    (name, field)
                }
            };
            self.lexer.expect(Token::Colon)?;

            let token = self.lexer.read_token(false)?;
            match field {
                Some(field) => self.decode_field(message, field, token)?,
                None => self.unknown_field(descriptor, &key, token)?,
            }

            match self.lexer.read_token(true)? {
                Token::Comma => {}
                Token::ObjectClose => return Ok(()),
                other => return Err(self.lexer.unexpected(other, "`,` or `}`")),
            }
        }
    }

    fn unknown_field(
        &mut self,
        descriptor: &MessageDescriptor,
        key: &str,
        token: Token,
    ) -> Result<()> {
        match self.options.unknown_fields {
            UnknownFields::Reject => Err(Error::unknown_field(descriptor.name(), key)),
            UnknownFields::Skip => {
                debug!(
                    target: "protojs::decode",
                    message = descriptor.name(),
                    field = key,
                    offset = self.offset(),
                    "skipping unknown field"
                );
                self.lexer.skip_value(token, 0)
            }
        }
    }

    /// Decodes the value of `field` whose first token has been peeked.
    /// `null` leaves the field untouched.
    fn decode_field(
        &mut self,
        message: &mut Message,
        field: &FieldDescriptor,
        token: Token,
    ) -> Result<()> {
        if token == Token::Null {
            return Ok(());
        }
        if !field.is_repeated() {
            let value = self.decode_value(field, token)?;
            message.set(field.number(), value);
            return Ok(());
        }

        if token != Token::ArrayOpen {
            let expected = format!("`[` for repeated field `{}`", field.name());
            return Err(self.lexer.unexpected(token, &expected));
        }
        self.lexer.expect(Token::ArrayOpen)?;
        if self.lexer.read_token(false)? == Token::ArrayClose {
            return self.lexer.expect(Token::ArrayClose);
        }
        loop {
            let token = self.lexer.read_token(false)?;
            if token == Token::Null {
                return Err(Error::syntax(
                    self.offset(),
                    format!("null element in repeated field `{}`", field.name()),
                ));
            }
            let value = self.decode_value(field, token)?;
            message.add(field.number(), value);

            match self.lexer.read_token(true)? {
                Token::Comma => {}
                Token::ArrayClose => return Ok(()),
                other => return Err(self.lexer.unexpected(other, "`,` or `]`")),
            }
        }
    }

    fn decode_value(&mut self, field: &FieldDescriptor, token: Token) -> Result<Value> {
        match field.field_type() {
            FieldType::Bool => self.decode_bool(token).map(Value::Bool),
            FieldType::Int32 => self.bare_number(token, "int32").map(Value::Int32),
            FieldType::UInt32 => self.bare_number(token, "uint32").map(Value::UInt32),
            FieldType::Enum(_) => self.bare_number(token, "enum").map(Value::Enum),
            FieldType::Int64 if field.is_int64_as_number() => {
                self.bare_number(token, "int64").map(Value::Int64)
            }
            FieldType::UInt64 if field.is_int64_as_number() => {
                self.bare_number(token, "uint64").map(Value::UInt64)
            }
            FieldType::Int64 => self.quoted_number(token, "int64").map(Value::Int64),
            FieldType::UInt64 => self.quoted_number(token, "uint64").map(Value::UInt64),
            FieldType::Float => {
                let (offset, text) = self.number_text(token, "float")?;
                let v: f32 = parse_number(offset, "float", text.as_str())?;
                if v.is_finite() {
                    Ok(Value::Float(v))
                } else {
                    Err(Error::invalid_number(offset, "float", text))
                }
            }
            FieldType::Double => {
                let (offset, text) = self.number_text(token, "double")?;
                let v: f64 = parse_number(offset, "double", text.as_str())?;
                if v.is_finite() {
                    Ok(Value::Double(v))
                } else {
                    Err(Error::invalid_number(offset, "double", text))
                }
            }
            FieldType::String => {
                let raw = self.string(token)?;
                unescape_str(&raw).map(Value::String)
            }
            FieldType::Bytes => {
                let raw = self.string(token)?;
                unescape_bytes(&raw).map(Value::Bytes)
            }
            FieldType::Message(nested) => {
                let mut message = Message::new();
                self.decode_message(&mut message, nested, token)?;
                Ok(Value::Message(message))
            }
        }
    }

    fn decode_bool(&mut self, token: Token) -> Result<bool> {
        if self.options.booleans_as_numbers {
            let (offset, text) = self.number_text(token, "bool")?;
            return parse_numeric_bool(&text)
                .ok_or_else(|| Error::invalid_number(offset, "bool", text));
        }
        match token {
            Token::True => Ok(true),
            Token::False => Ok(false),
            other => Err(self.lexer.unexpected(other, "`true` or `false`")),
        }
    }

    fn number_text(&mut self, token: Token, kind: &'static str) -> Result<(usize, String)> {
        if token != Token::NumberStart {
            return Err(self.lexer.unexpected(token, kind));
        }
        let offset = self.offset();
        let text = self.lexer.read_number()?;
        Ok((offset, text))
    }

    fn bare_number<T: FromStr>(&mut self, token: Token, kind: &'static str) -> Result<T> {
        let (offset, text) = self.number_text(token, kind)?;
        parse_number(offset, kind, &text)
    }

    fn quoted_number<T: FromStr>(&mut self, token: Token, kind: &'static str) -> Result<T> {
        if token != Token::StringStart {
            return Err(self.lexer.unexpected(token, &format!("quoted {kind}")));
        }
        let offset = self.offset();
        let text = self.lexer.read_number_from_string()?;
        parse_number(offset, kind, &text)
    }

    fn string(&mut self, token: Token) -> Result<Vec<u8>> {
        if token != Token::StringStart {
            return Err(self.lexer.unexpected(token, "string"));
        }
        self.lexer.expect(Token::StringStart)?;
        self.lexer.read_string()
    }
}

fn parse_number<T: FromStr>(offset: usize, kind: &'static str, text: &str) -> Result<T> {
    text.parse()
        .map_err(|_| Error::invalid_number(offset, kind, text))
}

/// Parses an object key of the tag framing: a non-zero decimal field number.
fn parse_tag(raw: &[u8]) -> Option<u32> {
    if raw.is_empty() || !raw.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(raw)
        .ok()?
        .parse()
        .ok()
        .filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::SliceInput;
    use std::sync::Arc;

    fn scalars() -> MessageDescriptor {
        MessageDescriptor::builder("Scalars")
            .field(FieldDescriptor::new(1, "flag", FieldType::Bool))
            .field(FieldDescriptor::new(2, "small", FieldType::Int32))
            .field(FieldDescriptor::new(3, "big", FieldType::Int64))
            .field(FieldDescriptor::new(4, "ratio", FieldType::Double))
            .field(FieldDescriptor::new(5, "label", FieldType::String))
            .field(FieldDescriptor::new(6, "list", FieldType::UInt32).repeated())
            .build()
            .unwrap()
    }

    fn decode_with(
        text: &str,
        descriptor: &MessageDescriptor,
        options: CodecOptions,
    ) -> Result<Message> {
        let mut input = SliceInput::with_chunk_size(text.as_bytes(), 1);
        let mut message = Message::new();
        Decoder::new(&mut input, options).decode(&mut message, descriptor)?;
        Ok(message)
    }

    fn array(text: &str) -> Result<Message> {
        decode_with(text, &scalars(), CodecOptions::array())
    }

    fn by_tag(text: &str) -> Result<Message> {
        decode_with(text, &scalars(), CodecOptions::object_by_tag())
    }

    #[test]
    fn test_array_slots() {
        let m = array(r#"[true,-7,"12",0.5,"hi",[1,2]]"#).unwrap();
        assert_eq!(m.get(1), Some(&Value::Bool(true)));
        assert_eq!(m.get(2), Some(&Value::Int32(-7)));
        assert_eq!(m.get(3), Some(&Value::Int64(12)));
        assert_eq!(m.get(4), Some(&Value::Double(0.5)));
        assert_eq!(m.get(5), Some(&Value::from("hi")));
        assert_eq!(m.get_repeated(6), &[Value::UInt32(1), Value::UInt32(2)]);
    }

    #[test]
    fn test_legacy_array_skips_slot_zero() {
        let m = decode_with(
            "[null,false,3]",
            &scalars(),
            CodecOptions::new().with_format(Format::ArrayStartingAtOne),
        )
        .unwrap();
        assert_eq!(m.get(1), Some(&Value::Bool(false)));
        assert_eq!(m.get(2), Some(&Value::Int32(3)));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn test_nulls_are_absent() {
        let m = array("[null,null,null,null,\"x\"]").unwrap();
        assert_eq!(m.len(), 1);
        let m = by_tag(r#"{"5":null}"#).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn test_empty_elements_fail() {
        for text in ["[1,,3]", "[,1]", "[true,]"] {
            let err = array(text).unwrap_err();
            assert!(matches!(err, Error::Syntax { .. }), "{text}: {err}");
        }
    }

    #[test]
    fn test_object_keys() {
        let m = by_tag(r#"{ "2" : 5 , "label" : "no" }"#);
        assert!(matches!(m, Err(Error::Syntax { .. })));

        let by_name = CodecOptions::object_by_name();
        let m = decode_with(r#"{"small":5,"label":"yes"}"#, &scalars(), by_name).unwrap();
        assert_eq!(m.get(2), Some(&Value::Int32(5)));

        for key in ["0", "-1", "+1", "", "1a"] {
            let text = format!(r#"{{"{key}":1}}"#);
            assert!(by_tag(&text).is_err(), "{key}");
        }
    }

    #[test]
    fn test_escaped_keys() {
        let m = by_tag(r#"{"\u0032":5}"#).unwrap();
        assert_eq!(m.get(2), Some(&Value::Int32(5)));

        let by_name = CodecOptions::object_by_name();
        let m = decode_with(r#"{"\u0073mall":6}"#, &scalars(), by_name).unwrap();
        assert_eq!(m.get(2), Some(&Value::Int32(6)));

        assert!(by_tag(r#"{"\u0030":1}"#).is_err());
    }

    #[test]
    fn test_single_quotes_rejected() {
        let err = array("[null,null,null,null,'hi']").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }), "{err}");

        let by_name = CodecOptions::object_by_name();
        let err = decode_with("{'label':\"hi\"}", &scalars(), by_name).unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }), "{err}");
    }

    #[test]
    fn test_unknown_field_policy() {
        let skip = CodecOptions::object_by_tag();
        let m = decode_with(r#"{"99":{"a":[1,2]},"2":1}"#, &scalars(), skip).unwrap();
        assert_eq!(m.get(2), Some(&Value::Int32(1)));
        assert_eq!(m.len(), 1);

        let reject = skip.with_unknown_fields(UnknownFields::Reject);
        let err = decode_with(r#"{"99":1}"#, &scalars(), reject).unwrap_err();
        assert_eq!(err, Error::unknown_field("Scalars", "99"));

        let reject = CodecOptions::array().with_unknown_fields(UnknownFields::Reject);
        let err = decode_with("[true,1,\"1\",1,\"s\",[],7]", &scalars(), reject).unwrap_err();
        assert_eq!(err, Error::unknown_field("Scalars", "7"));
    }

    #[test]
    fn test_bool_modes_are_strict() {
        let numeric = CodecOptions::array().with_booleans_as_numbers(true);
        let m = decode_with("[1]", &scalars(), numeric).unwrap();
        assert_eq!(m.get(1), Some(&Value::Bool(true)));
        let m = decode_with("[0]", &scalars(), numeric).unwrap();
        assert_eq!(m.get(1), Some(&Value::Bool(false)));
        assert!(decode_with("[2]", &scalars(), numeric).is_err());
        assert!(decode_with("[true]", &scalars(), numeric).is_err());
        assert!(array("[1]").is_err());
    }

    #[test]
    fn test_int64_requires_quotes() {
        let err = array("[null,null,12]").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }), "{err}");
    }

    #[test]
    fn test_int64_as_number_field() {
        let d = MessageDescriptor::builder("Totals")
            .field(FieldDescriptor::new(1, "signed", FieldType::Int64).int64_as_number())
            .field(FieldDescriptor::new(2, "unsigned", FieldType::UInt64).int64_as_number())
            .build()
            .unwrap();
        let text = "[-9223372036854775808,18446744073709551615]";
        let m = decode_with(text, &d, CodecOptions::array()).unwrap();
        assert_eq!(m.get(1), Some(&Value::Int64(i64::MIN)));
        assert_eq!(m.get(2), Some(&Value::UInt64(u64::MAX)));

        assert!(decode_with(r#"["1"]"#, &d, CodecOptions::array()).is_err());
        assert!(decode_with("[null,18446744073709551616]", &d, CodecOptions::array()).is_err());
    }

    #[test]
    fn test_integer_width() {
        assert!(matches!(
            array("[null,2147483648]"),
            Err(Error::InvalidNumber { kind: "int32", .. })
        ));
        assert!(array("[null,1.0]").is_err());
        assert!(array("[null,null,null,null,null,[-1]]").is_err());
    }

    #[test]
    fn test_repeated_rules() {
        assert!(array("[null,null,null,null,null,[1,null]]").is_err());
        assert!(array("[null,null,null,null,null,1]").is_err());
        let m = by_tag(r#"{"6":[1],"6":[2,3]}"#).unwrap();
        assert_eq!(m.size(6), 3);
        let m = by_tag(r#"{"6":[]}"#).unwrap();
        assert!(!m.has(6));
    }

    #[test]
    fn test_last_singular_wins() {
        let m = by_tag(r#"{"2":1,"2":2}"#).unwrap();
        assert_eq!(m.get(2), Some(&Value::Int32(2)));
    }

    #[test]
    fn test_nested_message() {
        let inner = Arc::new(scalars());
        let outer = MessageDescriptor::builder("Outer")
            .field(FieldDescriptor::new(1, "inner", FieldType::Message(inner.clone())))
            .field(FieldDescriptor::new(2, "many", FieldType::Message(inner)).repeated())
            .build()
            .unwrap();
        let m = decode_with("[[true],[[],[false]]]", &outer, CodecOptions::array()).unwrap();
        let first = m.get(1).and_then(Value::as_message).unwrap();
        assert_eq!(first.get(1), Some(&Value::Bool(true)));
        assert_eq!(m.size(2), 2);
        assert!(m.get_at(2, 0).and_then(Value::as_message).unwrap().is_empty());
    }

    #[test]
    fn test_wrong_opening_bracket() {
        let err = array("{}").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
        assert!(array("").unwrap_err().is_eof());
    }

    #[test]
    fn test_truncated_input_is_eof() {
        for text in ["[", "[true", "[true,", r#"[true,1,"12"#] {
            let err = array(text).unwrap_err();
            assert!(err.is_eof(), "{text}: {err}");
        }
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(parse_tag(b"17"), Some(17));
        assert_eq!(parse_tag(b"0"), None);
        assert_eq!(parse_tag(b"4294967296"), None);
        assert_eq!(parse_tag(b" 1"), None);
    }
}
