use protojs::{message, Message, Value};

#[test]
fn test_message_macro_empty() {
    let m = message! {};
    assert!(m.is_empty());
    assert_eq!(m, Message::new());
}

#[test]
fn test_message_macro_scalars() {
    let m = message! {
        1 => true,
        2 => -7,
        3 => 7_i64,
        4 => 7_u32,
        5 => 7_u64,
        6 => 0.5_f32,
        7 => 0.25,
        8 => "text",
        9 => String::from("owned"),
        10 => vec![1_u8, 2],
    };

    assert_eq!(m.get(1), Some(&Value::Bool(true)));
    assert_eq!(m.get(2), Some(&Value::Int32(-7)));
    assert_eq!(m.get(3), Some(&Value::Int64(7)));
    assert_eq!(m.get(4), Some(&Value::UInt32(7)));
    assert_eq!(m.get(5), Some(&Value::UInt64(7)));
    assert_eq!(m.get(6), Some(&Value::Float(0.5)));
    assert_eq!(m.get(7), Some(&Value::Double(0.25)));
    assert_eq!(m.get(8), Some(&Value::String("text".to_string())));
    assert_eq!(m.get(9), Some(&Value::String("owned".to_string())));
    assert_eq!(m.get(10), Some(&Value::Bytes(vec![1, 2])));
    assert_eq!(m.len(), 10);
}

#[test]
fn test_message_macro_without_trailing_comma() {
    let m = message! { 1 => 1, 2 => 2 };
    assert_eq!(m.len(), 2);
}

#[test]
fn test_message_macro_repeated() {
    let m = message! {
        1 => ["a", "b", "c"],
        2 => [1, 2,],
    };
    assert_eq!(m.size(1), 3);
    assert_eq!(m.get_at(1, 2).and_then(Value::as_str), Some("c"));
    assert_eq!(m.get_repeated(2), &[Value::Int32(1), Value::Int32(2)]);
    assert_eq!(m.get(1), None);
}

#[test]
fn test_message_macro_empty_repeated_is_absent() {
    let m = message! { 4 => [] };
    assert!(!m.has(4));
    assert_eq!(m.size(4), 0);
}

#[test]
fn test_message_macro_expressions() {
    let base = 40;
    let name = "dyn";
    let m = message! {
        1 => base + 2,
        2 => format!("{name}-{base}"),
        3 => [base, base * 2],
    };
    assert_eq!(m.get(1), Some(&Value::Int32(42)));
    assert_eq!(m.get(2).and_then(Value::as_str), Some("dyn-40"));
    assert_eq!(m.size(3), 2);
}

#[test]
fn test_message_macro_nested() {
    let m = message! {
        1 => message! {
            1 => message! { 1 => "deep" },
        },
        2 => [message! { 1 => 1 }, message! {}],
    };

    let deep = m
        .get(1)
        .and_then(Value::as_message)
        .and_then(|inner| inner.get(1))
        .and_then(Value::as_message)
        .and_then(|inner| inner.get(1))
        .and_then(Value::as_str);
    assert_eq!(deep, Some("deep"));
    assert_eq!(m.size(2), 2);
    assert!(m.get_at(2, 1).and_then(Value::as_message).map_or(false, Message::is_empty));
}

#[test]
fn test_message_macro_last_singular_wins() {
    let m = message! { 1 => "first", 1 => "second" };
    assert_eq!(m.get(1).and_then(Value::as_str), Some("second"));
}
