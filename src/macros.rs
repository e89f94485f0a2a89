/// Builds a [`Message`](crate::Message) from `number => value` pairs.
///
/// A bracketed list adds each element to a repeated field; any other
/// expression sets a singular field through [`Value::from`](crate::Value).
///
/// # Examples
///
/// ```rust
/// use protojs::{message, Value};
///
/// let m = message! {
///     1 => "Alice",
///     2 => 42_i64,
///     3 => [10_u32, 20_u32],
///     4 => message! { 1 => true },
/// };
///
/// assert_eq!(m.get(1).and_then(Value::as_str), Some("Alice"));
/// assert_eq!(m.get(2), Some(&Value::Int64(42)));
/// assert_eq!(m.size(3), 2);
/// assert!(m.get(4).and_then(Value::as_message).is_some());
/// ```
#[macro_export]
macro_rules! message {
    (@fields $m:ident) => {};

    // Repeated field
    (@fields $m:ident $n:literal => [ $($elem:expr),* $(,)? ] $(, $($rest:tt)*)?) => {
        $( $m.add($n, $crate::Value::from($elem)); )*
        $crate::message!(@fields $m $($($rest)*)?);
    };

    // Singular field
    (@fields $m:ident $n:literal => $value:expr $(, $($rest:tt)*)?) => {
        $m.set($n, $crate::Value::from($value));
        $crate::message!(@fields $m $($($rest)*)?);
    };

    ($($body:tt)*) => {{
        #[allow(unused_mut)]
        let mut message = $crate::Message::new();
        $crate::message!(@fields message $($body)*);
        message
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Message, Value};

    #[test]
    fn test_message_macro_empty() {
        assert_eq!(message! {}, Message::new());
    }

    #[test]
    fn test_message_macro_fields() {
        let m = message! {
            1 => true,
            2 => -5,
            5 => "text",
        };
        assert_eq!(m.get(1), Some(&Value::Bool(true)));
        assert_eq!(m.get(2), Some(&Value::Int32(-5)));
        assert_eq!(m.get(5), Some(&Value::String("text".to_string())));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn test_message_macro_repeated() {
        let m = message! { 3 => [1.5, 2.5], 4 => [] };
        assert_eq!(m.get_repeated(3), &[Value::Double(1.5), Value::Double(2.5)]);
        assert!(!m.has(4));
    }

    #[test]
    fn test_message_macro_nested() {
        let m = message! { 1 => message! { 2 => vec![0_u8, 1] } };
        let inner = m.get(1).and_then(Value::as_message).unwrap();
        assert_eq!(inner.get(2), Some(&Value::Bytes(vec![0, 1])));
    }
}
