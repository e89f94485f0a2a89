//! Configuration options for the codec.
//!
//! This module provides types to choose the wire framing and decoding policy:
//!
//! - [`CodecOptions`]: Main configuration struct
//! - [`Format`]: Choice of framing (positional array, tag-keyed or name-keyed object)
//! - [`UnknownFields`]: What the decoder does with fields the descriptor does not declare
//!
//! The same options value must be used to encode and to decode a message.
//!
//! ## Examples
//!
//! ```rust
//! use protojs::{
//!     to_string, CodecOptions, FieldDescriptor, FieldType, Format, Message, MessageDescriptor,
//!     Value,
//! };
//!
//! let descriptor = MessageDescriptor::builder("Flag")
//!     .field(FieldDescriptor::new(1, "on", FieldType::Bool))
//!     .build()
//!     .unwrap();
//! let mut message = Message::new();
//! message.set(1, Value::Bool(true));
//!
//! let options = CodecOptions::new()
//!     .with_format(Format::ObjectByName)
//!     .with_booleans_as_numbers(true);
//! assert_eq!(to_string(&message, &descriptor, options).unwrap(), r#"{"on":1}"#);
//! ```

/// Wire framing for a message.
///
/// - **Array**: positional PB-lite array, field `n` at index `n - 1`
/// - **ObjectByTag**: object keyed by the decimal field number
/// - **ObjectByName**: object keyed by the field name
/// - **ArrayStartingAtOne**: legacy positional array, field `n` at index `n`
///
/// # Examples
///
/// ```rust
/// use protojs::Format;
///
/// assert!(Format::Array.is_array());
/// assert_eq!(Format::Array.first_slot(), 1);
/// assert_eq!(Format::ArrayStartingAtOne.first_slot(), 0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Array,
    ObjectByTag,
    ObjectByName,
    ArrayStartingAtOne,
}

impl Format {
    /// Returns `true` for the positional framings.
    #[must_use]
    pub const fn is_array(self) -> bool {
        matches!(self, Format::Array | Format::ArrayStartingAtOne)
    }

    /// Field number stored at index 0 of a positional array.
    ///
    /// Only meaningful for the array framings.
    #[must_use]
    pub const fn first_slot(self) -> u32 {
        match self {
            Format::ArrayStartingAtOne => 0,
            _ => 1,
        }
    }

    /// Opening and closing bracket of a message in this framing.
    #[must_use]
    pub const fn brackets(self) -> (u8, u8) {
        if self.is_array() {
            (b'[', b']')
        } else {
            (b'{', b'}')
        }
    }
}

/// Decoder policy for fields absent from the descriptor.
///
/// The policy applies uniformly: an unrecognized name (`ObjectByName`), an
/// undeclared number (`ObjectByTag`), and an occupied array slot with no
/// declared field (array framings) are all treated the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UnknownFields {
    /// Consume and drop the value.
    #[default]
    Skip,
    /// Fail with [`Error::UnknownField`](crate::Error::UnknownField).
    Reject,
}

/// Configuration options for encoding and decoding.
///
/// # Examples
///
/// ```rust
/// use protojs::{CodecOptions, Format, UnknownFields};
///
/// // Default: PB-lite arrays, literal booleans, unknown fields skipped
/// let options = CodecOptions::new();
/// assert_eq!(options.format, Format::Array);
///
/// // Custom configuration
/// let options = CodecOptions::object_by_tag()
///     .with_booleans_as_numbers(true)
///     .with_unknown_fields(UnknownFields::Reject);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CodecOptions {
    pub format: Format,
    pub booleans_as_numbers: bool,
    pub unknown_fields: UnknownFields,
}

impl CodecOptions {
    /// Creates default options (PB-lite array framing).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn array() -> Self {
        Self::new().with_format(Format::Array)
    }

    #[must_use]
    pub fn object_by_tag() -> Self {
        Self::new().with_format(Format::ObjectByTag)
    }

    #[must_use]
    pub fn object_by_name() -> Self {
        Self::new().with_format(Format::ObjectByName)
    }

    /// Sets the wire framing.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Writes and reads booleans as `1`/`0` instead of `true`/`false`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use protojs::CodecOptions;
    ///
    /// let options = CodecOptions::new().with_booleans_as_numbers(true);
    /// assert!(options.booleans_as_numbers);
    /// ```
    #[must_use]
    pub fn with_booleans_as_numbers(mut self, enabled: bool) -> Self {
        self.booleans_as_numbers = enabled;
        self
    }

    #[must_use]
    pub fn with_unknown_fields(mut self, policy: UnknownFields) -> Self {
        self.unknown_fields = policy;
        self
    }
}
