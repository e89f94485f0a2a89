//! Dynamic message container.
//!
//! [`Message`] maps field numbers to [`FieldValue`]s. It is a wrapper around
//! [`IndexMap`], so iteration follows insertion order while equality ignores
//! it. The accessor surface mirrors the usual generated-message API:
//! `has`, `size`, `get`, `set`, `add`, and `clear`.
//!
//! A repeated field with no elements is indistinguishable from an absent one;
//! the accessors never store an empty list.
//!
//! ## Examples
//!
//! ```rust
//! use protojs::{Message, Value};
//!
//! let mut message = Message::new();
//! message.set(1, Value::from("Alice"));
//! message.add(2, Value::from(10));
//! message.add(2, Value::from(20));
//!
//! assert!(message.has(1));
//! assert_eq!(message.size(2), 2);
//! assert_eq!(message.get(1).and_then(Value::as_str), Some("Alice"));
//! assert_eq!(message.get_repeated(2), &[Value::from(10), Value::from(20)]);
//! ```

use std::slice;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::value::{FieldValue, Value};

/// A message value: field number to stored field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Message(IndexMap<u32, FieldValue>);

impl Message {
    /// Creates an empty message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use protojs::Message;
    ///
    /// let message = Message::new();
    /// assert!(message.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Message(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Message(IndexMap::with_capacity(capacity))
    }

    /// Returns `true` if field `number` is present.
    #[must_use]
    pub fn has(&self, number: u32) -> bool {
        self.0.contains_key(&number)
    }

    /// Number of elements in field `number`: 0 if absent, 1 if singular.
    #[must_use]
    pub fn size(&self, number: u32) -> usize {
        self.0.get(&number).map_or(0, FieldValue::len)
    }

    /// Returns the value of a singular field.
    ///
    /// Returns `None` if the field is absent or stored as a list.
    #[must_use]
    pub fn get(&self, number: u32) -> Option<&Value> {
        match self.0.get(&number)? {
            FieldValue::Single(v) => Some(v),
            FieldValue::Repeated(_) => None,
        }
    }

    /// Returns element `index` of field `number`; a singular field has one element.
    #[must_use]
    pub fn get_at(&self, number: u32, index: usize) -> Option<&Value> {
        self.get_repeated(number).get(index)
    }

    /// Returns all elements of field `number`, empty if absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use protojs::{Message, Value};
    ///
    /// let mut message = Message::new();
    /// message.set(1, Value::from(true));
    /// assert_eq!(message.get_repeated(1).len(), 1);
    /// assert!(message.get_repeated(2).is_empty());
    /// ```
    #[must_use]
    pub fn get_repeated(&self, number: u32) -> &[Value] {
        match self.0.get(&number) {
            None => &[],
            Some(FieldValue::Single(v)) => slice::from_ref(v),
            Some(FieldValue::Repeated(values)) => values,
        }
    }

    /// Returns the stored form of field `number`.
    #[must_use]
    pub fn field(&self, number: u32) -> Option<&FieldValue> {
        self.0.get(&number)
    }

    /// Sets a singular field, returning what was stored before.
    pub fn set(&mut self, number: u32, value: Value) -> Option<FieldValue> {
        self.0.insert(number, FieldValue::Single(value))
    }

    /// Appends an element to a repeated field.
    ///
    /// A field currently holding a singular value becomes a two-element list.
    pub fn add(&mut self, number: u32, value: Value) {
        let field = self
            .0
            .entry(number)
            .or_insert_with(|| FieldValue::Repeated(Vec::new()));
        if let FieldValue::Single(first) = field {
            let first = std::mem::replace(first, Value::Bool(false));
            *field = FieldValue::Repeated(vec![first]);
        }
        if let FieldValue::Repeated(values) = field {
            values.push(value);
        }
    }

    /// Replaces a repeated field. An empty list clears the field.
    pub fn set_repeated(&mut self, number: u32, values: Vec<Value>) -> Option<FieldValue> {
        if values.is_empty() {
            self.clear(number)
        } else {
            self.0.insert(number, FieldValue::Repeated(values))
        }
    }

    /// Removes field `number`, returning its stored form.
    pub fn clear(&mut self, number: u32) -> Option<FieldValue> {
        self.0.shift_remove(&number)
    }

    /// Number of present fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over present fields, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, u32, FieldValue> {
        self.0.iter()
    }

    /// Returns an iterator over present field numbers, in insertion order.
    pub fn numbers(&self) -> indexmap::map::Keys<'_, u32, FieldValue> {
        self.0.keys()
    }
}

impl Serialize for Message {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (number, field) in &self.0 {
            map.serialize_entry(number, field)?;
        }
        map.end()
    }
}

impl IntoIterator for Message {
    type Item = (u32, FieldValue);
    type IntoIter = indexmap::map::IntoIter<u32, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Message {
    type Item = (&'a u32, &'a FieldValue);
    type IntoIter = indexmap::map::Iter<'a, u32, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(u32, FieldValue)> for Message {
    /// Collects fields; empty lists are dropped.
    fn from_iter<T: IntoIterator<Item = (u32, FieldValue)>>(iter: T) -> Self {
        Message(
            iter.into_iter()
                .filter(|(_, field)| !field.is_empty())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces() {
        let mut m = Message::new();
        assert!(m.set(3, Value::Int32(1)).is_none());
        assert_eq!(m.set(3, Value::Int32(2)), Some(FieldValue::Single(Value::Int32(1))));
        assert_eq!(m.get(3), Some(&Value::Int32(2)));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_add_promotes_single() {
        let mut m = Message::new();
        m.set(1, Value::Int32(1));
        m.add(1, Value::Int32(2));
        assert_eq!(m.get(1), None);
        assert_eq!(m.get_repeated(1), &[Value::Int32(1), Value::Int32(2)]);
        assert_eq!(m.get_at(1, 1), Some(&Value::Int32(2)));
    }

    #[test]
    fn test_empty_repeated_is_absent() {
        let mut m = Message::new();
        m.set_repeated(4, vec![Value::Bool(true)]);
        assert!(m.has(4));
        m.set_repeated(4, Vec::new());
        assert!(!m.has(4));
        assert_eq!(m.size(4), 0);

        let collected: Message = vec![(1, FieldValue::Repeated(vec![]))].into_iter().collect();
        assert!(collected.is_empty());
    }

    #[test]
    fn test_equality_ignores_order() {
        let mut a = Message::new();
        a.set(1, Value::Bool(true));
        a.set(2, Value::Bool(false));
        let mut b = Message::new();
        b.set(2, Value::Bool(false));
        b.set(1, Value::Bool(true));
        assert_eq!(a, b);
    }

    #[test]
    fn test_clear() {
        let mut m = Message::new();
        m.set(1, Value::from("a"));
        m.set(2, Value::from("b"));
        assert!(m.clear(1).is_some());
        assert!(m.clear(1).is_none());
        assert_eq!(m.numbers().copied().collect::<Vec<_>>(), vec![2]);
    }
}
