// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse prop maps.
//!
//! This module provides [`Props`], the map type used both for the props a
//! component receives and for the derived state a binding collects.
//!
//! # Implementation
//!
//! Entries live in a key-sorted `SmallVec` and are found by binary search.
//! Components rarely carry more than a handful of props, so the first eight
//! entries are stored inline and lookups stay cache friendly.

use alloc::borrow::Cow;
use core::fmt;
use smallvec::SmallVec;

use crate::value::PropValue;

/// Key of a single prop.
pub type PropKey = Cow<'static, str>;

/// Default inline capacity for prop entries.
const INLINE_CAPACITY: usize = 8;

/// A small map from prop names to [`PropValue`]s.
///
/// Iteration is always in key order. Equality (`==`) is *shallow*: two maps
/// are equal when they hold the same keys and every pair of values is equal,
/// which for [`PropValue::Shared`] means the same allocation.
///
/// # Example
///
/// ```rust
/// use understory_dnd::Props;
///
/// let props = Props::new().with("id", 1).with("label", "Box");
/// assert_eq!(props.get("id").and_then(|v| v.as_int()), Some(1));
///
/// // Later maps win on merge, like spreading state over props.
/// let state = Props::new().with("label", "Dragging");
/// let merged = props.merged(&state);
/// assert_eq!(merged.get("label").and_then(|v| v.as_str()), Some("Dragging"));
/// assert_eq!(merged.len(), 2);
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct Props {
    entries: SmallVec<[(PropKey, PropValue); INLINE_CAPACITY]>,
}

impl Props {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this map with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<PropKey>, value: impl Into<PropValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Sets `key` to `value`, returning the previous value if there was one.
    pub fn set(&mut self, key: impl Into<PropKey>, value: impl Into<PropValue>) -> Option<PropValue> {
        let key = key.into();
        let value = value.into();
        match self.search(&key) {
            Ok(index) => Some(core::mem::replace(&mut self.entries[index].1, value)),
            Err(index) => {
                self.entries.insert(index, (key, value));
                None
            }
        }
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.search(key).ok().map(|index| &self.entries[index].1)
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.search(key)
            .ok()
            .map(|index| self.entries.remove(index).1)
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.search(key).is_ok()
    }

    /// Returns the number of entries.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> + '_ {
        self.entries.iter().map(|(key, value)| (key.as_ref(), value))
    }

    /// Iterates over keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(key, _)| key.as_ref())
    }

    /// Returns a copy of this map with every entry of `overrides` applied on top.
    #[must_use]
    pub fn merged(&self, overrides: &Self) -> Self {
        let mut merged = self.clone();
        merged.extend(
            overrides
                .entries
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        merged
    }

    fn search(&self, key: &str) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|(probe, _)| (**probe).cmp(key))
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<PropKey>, V: Into<PropValue>> Extend<(K, V)> for Props {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}

impl<K: Into<PropKey>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut props = Self::new();
        props.extend(iter);
        props
    }
}

impl<K: Into<PropKey>, V: Into<PropValue>, const N: usize> From<[(K, V); N]> for Props {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}
