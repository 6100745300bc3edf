//! Ordered map type for JSON objects.
//!
//! [`JsonMap`] wraps [`IndexMap`] so object members keep the order in which they
//! were inserted (or parsed). Output order is therefore the caller's contract:
//! build the map in the order you want the members written.
//!
//! ## Examples
//!
//! ```rust
//! use json_mapper::{JsonMap, JsonNode};
//!
//! let mut map = JsonMap::new();
//! map.insert("name1".to_string(), JsonNode::from("Juan Garcia"));
//! map.insert("name2".to_string(), JsonNode::from("Manuel Perez"));
//!
//! let keys: Vec<_> = map.keys().cloned().collect();
//! assert_eq!(keys, vec!["name1", "name2"]);
//! ```

use crate::JsonNode;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

/// An insertion-ordered map of string keys to JSON nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonMap(IndexMap<String, JsonNode>);

impl JsonMap {
    #[must_use]
    pub fn new() -> Self {
        JsonMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        JsonMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key was already present its value is replaced in place (the key
    /// keeps its original position) and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json_mapper::{JsonMap, JsonNode};
    ///
    /// let mut map = JsonMap::new();
    /// assert!(map.insert("key".to_string(), JsonNode::from(42)).is_none());
    /// assert!(map.insert("key".to_string(), JsonNode::from(43)).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: JsonNode) -> Option<JsonNode> {
        self.0.insert(key, value)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&JsonNode> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut JsonNode> {
        self.0.get_mut(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Removes a key, preserving the order of the remaining members.
    pub fn remove(&mut self, key: &str) -> Option<JsonNode> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, JsonNode> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, JsonNode> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, JsonNode> {
        self.0.iter()
    }
}

impl From<HashMap<String, JsonNode>> for JsonMap {
    fn from(map: HashMap<String, JsonNode>) -> Self {
        JsonMap(map.into_iter().collect())
    }
}

impl From<BTreeMap<String, JsonNode>> for JsonMap {
    fn from(map: BTreeMap<String, JsonNode>) -> Self {
        JsonMap(map.into_iter().collect())
    }
}

impl From<JsonMap> for HashMap<String, JsonNode> {
    fn from(map: JsonMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for JsonMap {
    type Item = (String, JsonNode);
    type IntoIter = indexmap::map::IntoIter<String, JsonNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a JsonMap {
    type Item = (&'a String, &'a JsonNode);
    type IntoIter = indexmap::map::Iter<'a, String, JsonNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, JsonNode)> for JsonMap {
    fn from_iter<T: IntoIterator<Item = (String, JsonNode)>>(iter: T) -> Self {
        JsonMap(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_btreemap_conversion_is_sorted() {
        let mut source = BTreeMap::new();
        source.insert("name2".to_string(), JsonNode::from("Manuel Perez"));
        source.insert("name1".to_string(), JsonNode::from("Juan Garcia"));

        let map = JsonMap::from(source);
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name1", "name2"]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut map: JsonMap = vec![
            ("a".to_string(), JsonNode::from(1)),
            ("b".to_string(), JsonNode::from(2)),
            ("c".to_string(), JsonNode::from(3)),
        ]
        .into_iter()
        .collect();

        assert_eq!(map.remove("b"), Some(JsonNode::from(2)));
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }
}
