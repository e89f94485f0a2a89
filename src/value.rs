//! Dynamic field values.
//!
//! This module provides the [`Value`] enum, the in-memory form of a single
//! field element, and [`FieldValue`], which holds either one value (singular
//! field) or a list (repeated field).
//!
//! ## Usage Patterns
//!
//! ### Creating Values
//!
//! ```rust
//! use protojs::Value;
//!
//! let flag = Value::from(true);
//! let id = Value::from(9_007_199_254_740_993_i64);
//! let name = Value::from("Alice");
//! let raw = Value::Bytes(vec![0, 1, 2]);
//! ```
//!
//! ### Extracting Values
//!
//! ```rust
//! use protojs::Value;
//!
//! let value = Value::from(42_u32);
//! assert_eq!(value.as_u32(), Some(42));
//! assert_eq!(value.as_i32(), None);
//! assert_eq!(value.kind_name(), "uint32");
//! ```
//!
//! Values serialize through serde as their natural JSON-like shape, which is
//! convenient for debugging output. That is not the wire encoding: use
//! [`to_string`](crate::to_string) for that.

use serde::{Serialize, Serializer};

use crate::Message;

/// A single field element.
///
/// Each variant matches one [`FieldType`](crate::FieldType). Enum values are
/// carried as their number.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    UInt32(u32),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Enum(i32),
    Message(Message),
}

impl Value {
    /// Name of the variant, spelled like the matching field type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use protojs::Value;
    ///
    /// assert_eq!(Value::Double(1.0).kind_name(), "double");
    /// assert_eq!(Value::Enum(3).kind_name(), "enum");
    /// ```
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int32(_) => "int32",
            Value::Int64(_) => "int64",
            Value::UInt32(_) => "uint32",
            Value::UInt64(_) => "uint64",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Enum(_) => "enum",
            Value::Message(_) => "message",
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_u32(&self) -> Option<u32> {
        match self {
            Value::UInt32(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// If the value is a string, returns it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use protojs::Value;
    ///
    /// assert_eq!(Value::from("hi").as_str(), Some("hi"));
    /// assert_eq!(Value::Bytes(b"hi".to_vec()).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_enum(&self) -> Option<i32> {
        match self {
            Value::Enum(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Value::Message(m) => Some(m),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_message_mut(&mut self) -> Option<&mut Message> {
        match self {
            Value::Message(m) => Some(m),
            _ => None,
        }
    }
}

/// The stored form of one field of a [`Message`].
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Single(Value),
    /// Never empty when stored in a message.
    Repeated(Vec<Value>),
}

impl FieldValue {
    /// Number of elements: 1 for a singular field.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            FieldValue::Single(_) => 1,
            FieldValue::Repeated(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_repeated(&self) -> bool {
        matches!(self, FieldValue::Repeated(_))
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int32(v) | Value::Enum(v) => serializer.serialize_i32(*v),
            Value::Int64(v) => serializer.serialize_i64(*v),
            Value::UInt32(v) => serializer.serialize_u32(*v),
            Value::UInt64(v) => serializer.serialize_u64(*v),
            Value::Float(v) => serializer.serialize_f32(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => serializer.serialize_bytes(b),
            Value::Message(m) => m.serialize(serializer),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FieldValue::Single(v) => v.serialize(serializer),
            FieldValue::Repeated(values) => values.serialize(serializer),
        }
    }
}

// From implementations for creating Value from primitives
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int64(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::UInt32(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::UInt64(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<Message> for Value {
    fn from(value: Message) -> Self {
        Value::Message(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(-1_i32), Value::Int32(-1));
        assert_eq!(Value::from(u64::MAX), Value::UInt64(u64::MAX));
        assert_eq!(Value::from(1.5_f32), Value::Float(1.5));
        assert_eq!(Value::from(b"ab".to_vec()), Value::Bytes(vec![b'a', b'b']));
    }

    #[test]
    fn test_accessors_are_strict() {
        let v = Value::Int64(7);
        assert_eq!(v.as_i64(), Some(7));
        assert_eq!(v.as_i32(), None);
        assert_eq!(v.as_u64(), None);
        assert_eq!(Value::Enum(2).as_i32(), None);
        assert_eq!(Value::Enum(2).as_enum(), Some(2));
    }

    #[test]
    fn test_serialize_json_shape() {
        let mut inner = Message::new();
        inner.set(1, Value::from("x"));
        let v = Value::Message(inner);
        assert_eq!(serde_json::to_string(&v).unwrap(), r#"{"1":"x"}"#);
        assert_eq!(
            serde_json::to_string(&FieldValue::Repeated(vec![Value::Int32(1), Value::Int32(2)]))
                .unwrap(),
            "[1,2]"
        );
    }

    #[test]
    fn test_field_value_len() {
        assert_eq!(FieldValue::Single(Value::Bool(false)).len(), 1);
        assert!(FieldValue::Repeated(vec![]).is_empty());
        assert!(FieldValue::Repeated(vec![Value::Bool(true)]).is_repeated());
    }
}
