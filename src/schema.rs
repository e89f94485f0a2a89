//! Message and field descriptors.
//!
//! A [`MessageDescriptor`] is the schema of one message type: an ordered list
//! of [`FieldDescriptor`]s plus lookup indexes by number and by name. Nested
//! message and enum types are carried inside [`FieldType`] behind an [`Arc`],
//! so a descriptor tree is immutable, cheap to share between threads, and
//! cannot contain cycles.
//!
//! Descriptors are built in code with [`MessageDescriptor::builder`] or loaded
//! through serde; both paths run the same validation.
//!
//! ## Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use protojs::{FieldDescriptor, FieldType, MessageDescriptor};
//!
//! let point = Arc::new(
//!     MessageDescriptor::builder("Point")
//!         .field(FieldDescriptor::new(1, "x", FieldType::Int32))
//!         .field(FieldDescriptor::new(2, "y", FieldType::Int32))
//!         .build()
//!         .unwrap(),
//! );
//! let path = MessageDescriptor::builder("Path")
//!     .field(FieldDescriptor::new(1, "points", FieldType::Message(point)).repeated())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(path.field_by_name("points").map(|f| f.number()), Some(1));
//! assert_eq!(path.nested_types().count(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Largest field number a message may declare.
pub const MAX_FIELD_NUMBER: u32 = 536_870_911;

/// Declared type of a field.
///
/// Message and enum types carry their nested descriptor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Bool,
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float,
    Double,
    String,
    Bytes,
    Enum(Arc<EnumDescriptor>),
    Message(Arc<MessageDescriptor>),
}

impl FieldType {
    /// Short lowercase name used in error messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Int32 => "int32",
            FieldType::Int64 => "int64",
            FieldType::UInt32 => "uint32",
            FieldType::UInt64 => "uint64",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::String => "string",
            FieldType::Bytes => "bytes",
            FieldType::Enum(_) => "enum",
            FieldType::Message(_) => "message",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Enum(e) => write!(f, "enum {}", e.name()),
            FieldType::Message(m) => write!(f, "message {}", m.name()),
            other => f.write_str(other.name()),
        }
    }
}

/// One named value of an enum type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

/// Schema of an enum type. Values travel on the wire as bare integers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    name: String,
    values: Vec<EnumValue>,
}

impl EnumDescriptor {
    /// # Examples
    ///
    /// ```rust
    /// use protojs::EnumDescriptor;
    ///
    /// let color = EnumDescriptor::new("Color", [("RED", 0), ("GREEN", 1)]);
    /// assert_eq!(color.value_name(1), Some("GREEN"));
    /// assert_eq!(color.value_number("RED"), Some(0));
    /// ```
    pub fn new<N: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = (N, i32)>,
    ) -> Self {
        EnumDescriptor {
            name: name.into(),
            values: values
                .into_iter()
                .map(|(name, number)| EnumValue {
                    name: name.into(),
                    number,
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn values(&self) -> &[EnumValue] {
        &self.values
    }

    /// Name of the first value declared with `number`.
    #[must_use]
    pub fn value_name(&self, number: i32) -> Option<&str> {
        self.values
            .iter()
            .find(|v| v.number == number)
            .map(|v| v.name.as_str())
    }

    #[must_use]
    pub fn value_number(&self, name: &str) -> Option<i32> {
        self.values.iter().find(|v| v.name == name).map(|v| v.number)
    }
}

/// Schema of a single field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    number: u32,
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    repeated: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    int64_as_number: bool,
}

impl FieldDescriptor {
    /// Creates a singular field.
    pub fn new(number: u32, name: impl Into<String>, field_type: FieldType) -> Self {
        FieldDescriptor {
            number,
            name: name.into(),
            field_type,
            repeated: false,
            int64_as_number: false,
        }
    }

    /// Marks the field as repeated.
    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    /// Sends an `int64` or `uint64` field as a bare JSON number instead of a
    /// quoted decimal.
    ///
    /// Values beyond 2^53 lose precision in readers that hold numbers in
    /// doubles.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use protojs::{
    ///     message, to_string, CodecOptions, FieldDescriptor, FieldType, MessageDescriptor,
    /// };
    ///
    /// let descriptor = MessageDescriptor::builder("Counter")
    ///     .field(FieldDescriptor::new(1, "hits", FieldType::Int64).int64_as_number())
    ///     .build()
    ///     .unwrap();
    ///
    /// let counter = message! { 1 => 12_i64 };
    /// let text = to_string(&counter, &descriptor, CodecOptions::array()).unwrap();
    /// assert_eq!(text, "[12]");
    /// ```
    #[must_use]
    pub fn int64_as_number(mut self) -> Self {
        self.int64_as_number = true;
        self
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    #[must_use]
    pub fn is_repeated(&self) -> bool {
        self.repeated
    }

    #[must_use]
    pub fn is_int64_as_number(&self) -> bool {
        self.int64_as_number
    }
}

/// Schema of a message type.
///
/// Fields keep their declaration order, which is the order used by the
/// object framings. The positional framings walk fields by ascending number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MessageDef")]
pub struct MessageDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
    #[serde(skip)]
    by_number: IndexMap<u32, usize>,
    #[serde(skip)]
    by_name: IndexMap<String, usize>,
    #[serde(skip)]
    number_order: Vec<usize>,
}

#[derive(Deserialize)]
struct MessageDef {
    name: String,
    #[serde(default)]
    fields: Vec<FieldDescriptor>,
}

impl TryFrom<MessageDef> for MessageDescriptor {
    type Error = Error;

    fn try_from(def: MessageDef) -> Result<Self> {
        MessageDescriptor::new(def.name, def.fields)
    }
}

impl MessageDescriptor {
    /// Validates `fields` and builds the lookup indexes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSchema`] for an empty message or field name, a
    /// field number of zero or above [`MAX_FIELD_NUMBER`], a duplicated field
    /// number or name, or `int64_as_number` on a field that is not 64-bit.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_schema("message name is empty"));
        }

        let mut by_number = IndexMap::with_capacity(fields.len());
        let mut by_name = IndexMap::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if field.number == 0 || field.number > MAX_FIELD_NUMBER {
                return Err(Error::invalid_schema(format!(
                    "field `{}` of `{name}` has number {} outside 1..={MAX_FIELD_NUMBER}",
                    field.name, field.number
                )));
            }
            if field.int64_as_number
                && !matches!(field.field_type, FieldType::Int64 | FieldType::UInt64)
            {
                return Err(Error::invalid_schema(format!(
                    "field `{}` of `{name}` is {}, not a 64-bit integer",
                    field.name, field.field_type
                )));
            }
            if field.name.is_empty() {
                return Err(Error::invalid_schema(format!(
                    "field {} of `{name}` has an empty name",
                    field.number
                )));
            }
            if by_number.insert(field.number, index).is_some() {
                return Err(Error::invalid_schema(format!(
                    "duplicate field number {} in `{name}`",
                    field.number
                )));
            }
            if by_name.insert(field.name.clone(), index).is_some() {
                return Err(Error::invalid_schema(format!(
                    "duplicate field name `{}` in `{name}`",
                    field.name
                )));
            }
        }

        let mut number_order: Vec<usize> = (0..fields.len()).collect();
        number_order.sort_by_key(|&i| fields[i].number);

        Ok(MessageDescriptor {
            name,
            fields,
            by_number,
            by_name,
            number_order,
        })
    }

    pub fn builder(name: impl Into<String>) -> MessageDescriptorBuilder {
        MessageDescriptorBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Fields in ascending field-number order.
    pub fn fields_by_number(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.number_order.iter().map(|&i| &self.fields[i])
    }

    #[must_use]
    pub fn field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
        self.by_number.get(&number).map(|&i| &self.fields[i])
    }

    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Message types referenced directly by this message's fields.
    pub fn nested_types(&self) -> impl Iterator<Item = &Arc<MessageDescriptor>> {
        self.fields.iter().filter_map(|f| match &f.field_type {
            FieldType::Message(m) => Some(m),
            _ => None,
        })
    }
}

/// Incremental construction of a [`MessageDescriptor`].
#[derive(Clone, Debug)]
pub struct MessageDescriptorBuilder {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl MessageDescriptorBuilder {
    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// # Errors
    ///
    /// See [`MessageDescriptor::new`].
    pub fn build(self) -> Result<MessageDescriptor> {
        MessageDescriptor::new(self.name, self.fields)
    }
}
