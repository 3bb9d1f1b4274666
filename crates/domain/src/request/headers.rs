//! HTTP header map

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered map of HTTP headers.
///
/// Insertion order is kept for display and transmission; comparisons go
/// through [`Headers::canonical`], where order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    items: IndexMap<String, String>,
}

impl Headers {
    /// Creates an empty header map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing the value of an identical key in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.items.insert(name.into(), value.into());
    }

    /// Sets a header, replacing any existing key that matches ignoring ASCII case.
    ///
    /// Used when a later source (such as auth) must win over whatever
    /// spelling the user typed.
    pub fn set_ignore_case(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.items.retain(|k, _| !k.eq_ignore_ascii_case(&name));
        self.items.insert(name, value.into());
    }

    /// Gets a header value by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items.get(name).map(String::as_str)
    }

    /// Gets a header value by name, ignoring ASCII case.
    #[must_use]
    pub fn get_ignore_case(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Removes every spelling of a header, keeping the order of the rest.
    ///
    /// Returns the number of removed entries.
    pub fn remove_ignore_case(&mut self, name: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|k, _| !k.eq_ignore_ascii_case(name));
        before - self.items.len()
    }

    /// Iterates headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no headers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the order-independent form of this map.
    #[must_use]
    pub fn canonical(&self) -> BTreeMap<&str, &str> {
        self.iter().collect()
    }

    /// Consumes the map, returning the ordered entries.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.items
    }

    /// Copies every header of `other` over this map; `other` wins on collision.
    pub fn merge_over(&mut self, other: &Self) {
        for (name, value) in other.iter() {
            self.set_ignore_case(name, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            items: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
