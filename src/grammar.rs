//! Wire Format Reference
//!
//! This module documents the text encoding implemented by this library.
//!
//! # Overview
//!
//! Messages are written as JSON-like text in one of three framings. All
//! framings share the same scalar rules; they differ only in how a field is
//! located inside its message.
//!
//! # Framings
//!
//! ## Array (PB-lite)
//!
//! A message is a JSON array. Field number `n` lives at index `n - 1`.
//! Present fields are written in ascending number order and every empty slot
//! before a present field is written as `null`. Nothing is written after the
//! last present field.
//!
//! ```text
//! fields: 1 => true, 3 => "x"
//! [true,null,"x"]
//! ```
//!
//! The legacy variant (`ArrayStartingAtOne`) places field `n` at index `n`,
//! so index 0 is always a `null` placeholder:
//!
//! ```text
//! [null,true,null,"x"]
//! ```
//!
//! ## Object keyed by tag
//!
//! ```text
//! {"1":true,"3":"x"}
//! ```
//!
//! Keys are quoted decimal field numbers greater than zero.
//!
//! ## Object keyed by name
//!
//! ```text
//! {"enabled":true,"label":"x"}
//! ```
//!
//! Both object framings write fields in declaration order.
//!
//! # Scalars
//!
//! | Field type | Written as | Example |
//! |------------|------------|---------|
//! | `bool` | `true` / `false`, or `1` / `0` when booleans are numeric | `true` |
//! | `int32`, `uint32`, `enum` | bare decimal | `-42` |
//! | `int64`, `uint64` | quoted decimal | `"9223372036854775807"` |
//! | `float`, `double` | bare JSON number | `2.5e-10` |
//! | `string` | quoted, escaped | `"a\"b"` |
//! | `bytes` | quoted, escaped byte per character | `"\u00ff\u0001"` |
//! | message | nested framing | `[1,"x"]` |
//!
//! Repeated fields are JSON arrays of their elements: `[1,2,3]`.
//!
//! 64-bit integers are quoted because many JSON consumers hold numbers in
//! IEEE doubles, which represent integers exactly only up to 2^53.
//!
//! ## Escapes
//!
//! Newline, carriage return and tab are written as `\n`, `\r`, `\t`; the
//! quote characters and backslash as `\"`, `\'`, `\\`; every other control
//! byte as `\u00XX`. In `bytes` fields bytes at or above `0x80` are also
//! written as `\u00XX`, so a `bytes` value is always ASCII on the wire.
//!
//! When reading, `\b`, `\f` and `\/` are also accepted. A `\uXXXX` escape
//! decodes to the full character in a `string` field (surrogate pairs are
//! combined) and to the single low byte of the code unit in a `bytes` field.
//!
//! ## Numbers
//!
//! ```text
//! number   = [ "-" ] ( "0" | digit1-9 *digit ) [ fraction ] [ exponent ]
//! fraction = "." 1*digit
//! exponent = ( "e" | "E" ) [ "+" | "-" ] 1*digit
//! ```
//!
//! A number ends in front of `"`, `,`, `}`, `]` or whitespace. Numeric
//! literals are limited to 64 bytes. Integers must fit their field type
//! exactly: `1.0` is not an `int32`. NaN and the infinities cannot be encoded.
//!
//! # Reading Rules
//!
//! - Whitespace (space, tab, CR, LF) is allowed between tokens
//! - `null` marks an empty slot in the array framings and an absent field in
//!   the object framings; it is not allowed inside a repeated field
//! - Empty array elements (`[1,,3]`) and trailing commas are errors
//! - A singular field that appears twice keeps the last value; a repeated
//!   field that appears twice is concatenated
//! - Fields the descriptor does not declare are skipped or rejected, as
//!   configured; they are never kept
//!
//! # Limitations
//!
//! - **Unknown fields**: never written, never preserved
//! - **Enum names**: enums travel as numbers only
//! - **Skipped values**: nesting deeper than 128 levels is rejected

// This module contains only documentation; no implementation code
