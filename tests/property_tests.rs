//! Property-based tests for the round trip guarantees of every field type.

use proptest::prelude::*;
use protojs::stream::SliceInput;
use protojs::{
    decode, from_str, to_string, to_vec, CodecOptions, FieldDescriptor, FieldType, Format, Message,
    MessageDescriptor, Value,
};

fn format_strategy() -> impl Strategy<Value = Format> {
    prop_oneof![
        Just(Format::Array),
        Just(Format::ObjectByTag),
        Just(Format::ObjectByName),
        Just(Format::ArrayStartingAtOne),
    ]
}

fn descriptor() -> MessageDescriptor {
    MessageDescriptor::builder("Everything")
        .field(FieldDescriptor::new(1, "flag", FieldType::Bool))
        .field(FieldDescriptor::new(2, "i32", FieldType::Int32))
        .field(FieldDescriptor::new(3, "i64", FieldType::Int64))
        .field(FieldDescriptor::new(4, "u32", FieldType::UInt32))
        .field(FieldDescriptor::new(5, "u64", FieldType::UInt64))
        .field(FieldDescriptor::new(6, "f32", FieldType::Float))
        .field(FieldDescriptor::new(7, "f64", FieldType::Double))
        .field(FieldDescriptor::new(8, "text", FieldType::String))
        .field(FieldDescriptor::new(9, "blob", FieldType::Bytes))
        .field(FieldDescriptor::new(10, "bare_i64", FieldType::Int64).int64_as_number())
        .field(FieldDescriptor::new(11, "bare_u64", FieldType::UInt64).int64_as_number())
        .field(FieldDescriptor::new(12, "list", FieldType::Int64).repeated())
        .build()
        .unwrap()
}

fn roundtrip(message: &Message, format: Format) -> bool {
    let options = CodecOptions::new().with_format(format);
    match to_string(message, &descriptor(), options) {
        Ok(text) => match from_str(&text, &descriptor(), options) {
            Ok(decoded) => decoded == *message,
            Err(e) => {
                eprintln!("Decode failed: {}", e);
                eprintln!("Encoded was: {}", text);
                false
            }
        },
        Err(e) => {
            eprintln!("Encode failed: {}", e);
            false
        }
    }
}

fn single(number: u32, value: Value) -> Message {
    let mut m = Message::new();
    m.set(number, value);
    m
}

proptest! {
    #[test]
    fn prop_bool(b in any::<bool>(), format in format_strategy()) {
        prop_assert!(roundtrip(&single(1, Value::Bool(b)), format));
    }

    #[test]
    fn prop_int32(n in any::<i32>(), format in format_strategy()) {
        prop_assert!(roundtrip(&single(2, Value::Int32(n)), format));
    }

    #[test]
    fn prop_int64(n in any::<i64>(), format in format_strategy()) {
        prop_assert!(roundtrip(&single(3, Value::Int64(n)), format));
    }

    #[test]
    fn prop_uint32(n in any::<u32>(), format in format_strategy()) {
        prop_assert!(roundtrip(&single(4, Value::UInt32(n)), format));
    }

    #[test]
    fn prop_uint64(n in any::<u64>(), format in format_strategy()) {
        prop_assert!(roundtrip(&single(5, Value::UInt64(n)), format));
    }

    #[test]
    fn prop_float(
        f in any::<f32>().prop_filter("finite", |f| f.is_finite()),
        format in format_strategy(),
    ) {
        prop_assert!(roundtrip(&single(6, Value::Float(f)), format));
    }

    #[test]
    fn prop_double(
        f in any::<f64>().prop_filter("finite", |f| f.is_finite()),
        format in format_strategy(),
    ) {
        prop_assert!(roundtrip(&single(7, Value::Double(f)), format));
    }

    #[test]
    fn prop_int64_as_number(n in any::<i64>(), u in any::<u64>(), format in format_strategy()) {
        let mut m = Message::new();
        m.set(10, Value::Int64(n));
        m.set(11, Value::UInt64(u));
        prop_assert!(roundtrip(&m, format));
    }

    #[test]
    fn prop_string(s in any::<String>(), format in format_strategy()) {
        prop_assert!(roundtrip(&single(8, Value::String(s)), format));
    }

    #[test]
    fn prop_bytes(b in prop::collection::vec(any::<u8>(), 0..64), format in format_strategy()) {
        prop_assert!(roundtrip(&single(9, Value::Bytes(b)), format));
    }

    #[test]
    fn prop_bytes_are_ascii_on_the_wire(b in prop::collection::vec(any::<u8>(), 0..64)) {
        let m = single(9, Value::Bytes(b));
        let bytes = to_vec(&m, &descriptor(), CodecOptions::array()).unwrap();
        prop_assert!(bytes.is_ascii());
    }

    #[test]
    fn prop_repeated(v in prop::collection::vec(any::<i64>(), 1..20), format in format_strategy()) {
        let mut m = Message::new();
        for n in v {
            m.add(12, Value::Int64(n));
        }
        prop_assert!(roundtrip(&m, format));
    }

    #[test]
    fn prop_sparse_fields(
        flag in proptest::option::of(any::<bool>()),
        u32v in proptest::option::of(any::<u32>()),
        text in proptest::option::of("[a-z ]{0,12}"),
        format in format_strategy(),
    ) {
        let mut m = Message::new();
        if let Some(b) = flag {
            m.set(1, Value::Bool(b));
        }
        if let Some(n) = u32v {
            m.set(4, Value::UInt32(n));
        }
        if let Some(s) = text {
            m.set(8, Value::String(s));
        }
        prop_assert!(roundtrip(&m, format));
    }

    #[test]
    fn prop_chunk_size_independent(
        n in any::<i64>(),
        s in any::<String>(),
        chunk in 1_usize..16,
        format in format_strategy(),
    ) {
        let mut m = Message::new();
        m.set(3, Value::Int64(n));
        m.set(8, Value::String(s));
        let options = CodecOptions::new().with_format(format);
        let bytes = to_vec(&m, &descriptor(), options).unwrap();

        let mut input = SliceInput::with_chunk_size(&bytes, chunk);
        let mut decoded = Message::new();
        decode(&mut decoded, &descriptor(), options, &mut input).unwrap();
        prop_assert_eq!(decoded, m);
    }

    #[test]
    fn prop_garbage_never_panics(text in "[\\[\\]{}\",:0-9a-z\\\\ ]{0,40}") {
        let _ = from_str(&text, &descriptor(), CodecOptions::array());
        let _ = from_str(&text, &descriptor(), CodecOptions::object_by_name());
    }
}
