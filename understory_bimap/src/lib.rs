// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Bimap: a map that can be read from either side.
//!
//! [`BiMap`] pairs unique keys with unique values. Every key maps to exactly
//! one value and every value maps back to exactly one key, so lookups, edits,
//! and removals work by key or by value at the same cost.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_bimap::{BiMap, BiMapError};
//!
//! let mut ports = BiMap::new();
//! ports.insert("http", 80).unwrap();
//! ports.insert("https", 443).unwrap();
//!
//! assert_eq!(ports.get_value("https"), Some(&443));
//! assert_eq!(ports.get_key(&80), Some(&"http"));
//!
//! // Both sides are unique.
//! assert_eq!(ports.insert("web", 80), Err(BiMapError::DuplicateValue));
//!
//! // Re-pair from either side.
//! assert_eq!(ports.set_value("http", 8080), Ok(80));
//! assert_eq!(ports.set_key(&443, "tls"), Ok("https"));
//! assert_eq!(ports.remove_by_value(&8080), Some(("http", 8080)));
//! assert_eq!(ports.len(), 1);
//! ```
//!
//! Keys and values are hashed through separate [`BuildHasher`]s, chosen with
//! [`BiMap::with_hashers`].
//!
//! Iteration order is unspecified. Pairs start out in insertion order, but a
//! removal moves the most recently stored pair into the freed slot.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::mem;
use core::slice;

use hashbrown::{DefaultHashBuilder, HashTable};

/// Error returned by the fallible [`BiMap`] operations.
///
/// A failed call leaves the map unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BiMapError {
    /// The key is already paired with a value.
    DuplicateKey,
    /// The value is already paired with a key.
    DuplicateValue,
    /// No pair has the requested key.
    KeyNotFound,
    /// No pair has the requested value.
    ValueNotFound,
}

impl fmt::Display for BiMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DuplicateKey => "key is already in the map",
            Self::DuplicateValue => "value is already in the map",
            Self::KeyNotFound => "key not found",
            Self::ValueNotFound => "value not found",
        })
    }
}

impl core::error::Error for BiMapError {}

/// A one-to-one map between keys and values.
///
/// Pairs are stored once, in a `Vec<(K, V)>`. Two hash tables map key and
/// value hashes to pair positions, so neither side needs to be `Clone`.
#[derive(Clone)]
pub struct BiMap<K, V, SK = DefaultHashBuilder, SV = DefaultHashBuilder> {
    pairs: Vec<(K, V)>,
    by_key: HashTable<usize>,
    by_value: HashTable<usize>,
    key_hasher: SK,
    value_hasher: SV,
}

impl<K, V> BiMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty map with room for `capacity` pairs.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hashers(
            capacity,
            DefaultHashBuilder::default(),
            DefaultHashBuilder::default(),
        )
    }
}

impl<K, V, SK, SV> BiMap<K, V, SK, SV> {
    /// Creates an empty map that hashes keys with `key_hasher` and values with
    /// `value_hasher`.
    #[must_use]
    pub fn with_hashers(key_hasher: SK, value_hasher: SV) -> Self {
        Self::with_capacity_and_hashers(0, key_hasher, value_hasher)
    }

    /// Creates an empty map with room for `capacity` pairs and explicit hashers.
    #[must_use]
    pub fn with_capacity_and_hashers(capacity: usize, key_hasher: SK, value_hasher: SV) -> Self {
        Self {
            pairs: Vec::with_capacity(capacity),
            by_key: HashTable::with_capacity(capacity),
            by_value: HashTable::with_capacity(capacity),
            key_hasher,
            value_hasher,
        }
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if the map holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The hasher used for keys.
    #[must_use]
    pub fn key_hasher(&self) -> &SK {
        &self.key_hasher
    }

    /// The hasher used for values.
    #[must_use]
    pub fn value_hasher(&self) -> &SV {
        &self.value_hasher
    }

    /// Iterates over `(key, value)` pairs.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            pairs: self.pairs.iter(),
        }
    }

    /// Iterates over the keys.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> + DoubleEndedIterator + '_ {
        self.pairs.iter().map(|(key, _)| key)
    }

    /// Iterates over the values.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + DoubleEndedIterator + '_ {
        self.pairs.iter().map(|(_, value)| value)
    }

    /// Removes every pair.
    pub fn clear(&mut self) {
        self.pairs.clear();
        self.by_key.clear();
        self.by_value.clear();
    }
}

impl<K, V, SK, SV> BiMap<K, V, SK, SV>
where
    K: Hash + Eq,
    V: Hash + Eq,
    SK: BuildHasher,
    SV: BuildHasher,
{
    /// Builds a map from `(key, value)` pairs.
    ///
    /// # Errors
    ///
    /// Stops at the first pair whose key or value is already present, reporting
    /// [`BiMapError::DuplicateKey`] or [`BiMapError::DuplicateValue`].
    pub fn try_from_pairs<I>(pairs: I) -> Result<Self, BiMapError>
    where
        I: IntoIterator<Item = (K, V)>,
        SK: Default,
        SV: Default,
    {
        let pairs = pairs.into_iter();
        let mut map = Self::with_capacity_and_hashers(
            pairs.size_hint().0,
            SK::default(),
            SV::default(),
        );
        map.try_extend(pairs)?;
        Ok(map)
    }

    /// Returns `true` if `key` is paired with some value.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.key_position(key).is_some()
    }

    /// Returns `true` if `value` is paired with some key.
    #[must_use]
    pub fn contains_value<Q>(&self, value: &Q) -> bool
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.value_position(value).is_some()
    }

    /// Returns `true` if `key` is paired with exactly `value`.
    #[must_use]
    pub fn contains_pair<QK, QV>(&self, key: &QK, value: &QV) -> bool
    where
        K: Borrow<QK>,
        V: Borrow<QV>,
        QK: Hash + Eq + ?Sized,
        QV: Hash + Eq + ?Sized,
    {
        self.key_position(key)
            .is_some_and(|position| self.pairs[position].1.borrow() == value)
    }

    /// The value paired with `key`.
    #[must_use]
    pub fn get_value<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.key_position(key)
            .map(|position| &self.pairs[position].1)
    }

    /// The key paired with `value`.
    #[must_use]
    pub fn get_key<Q>(&self, value: &Q) -> Option<&K>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.value_position(value)
            .map(|position| &self.pairs[position].0)
    }

    /// Adds a new pair.
    ///
    /// # Errors
    ///
    /// [`BiMapError::DuplicateKey`] if `key` is present, otherwise
    /// [`BiMapError::DuplicateValue`] if `value` is present.
    pub fn insert(&mut self, key: K, value: V) -> Result<(), BiMapError> {
        if self.contains_key(&key) {
            return Err(BiMapError::DuplicateKey);
        }
        if self.contains_value(&value) {
            return Err(BiMapError::DuplicateValue);
        }
        let position = self.pairs.len();
        self.pairs.push((key, value));
        self.index_key(position);
        self.index_value(position);
        Ok(())
    }

    /// Inserts each pair in turn.
    ///
    /// # Errors
    ///
    /// Stops at the first conflicting pair, as [`BiMap::insert`] would report
    /// it. Pairs inserted before the conflict stay in the map.
    pub fn try_extend<I>(&mut self, pairs: I) -> Result<(), BiMapError>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in pairs {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Pairs `key` with `value` instead of its current value, returning the old value.
    ///
    /// # Errors
    ///
    /// [`BiMapError::KeyNotFound`] if `key` is absent, or
    /// [`BiMapError::DuplicateValue`] if `value` is already in the map, even
    /// when it is the value `key` holds now.
    pub fn set_value<Q>(&mut self, key: &Q, value: V) -> Result<V, BiMapError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = self.key_position(key).ok_or(BiMapError::KeyNotFound)?;
        if self.contains_value(&value) {
            return Err(BiMapError::DuplicateValue);
        }
        self.unindex_value(position);
        let old = mem::replace(&mut self.pairs[position].1, value);
        self.index_value(position);
        Ok(old)
    }

    /// Pairs `value` with `key` instead of its current key, returning the old key.
    ///
    /// # Errors
    ///
    /// [`BiMapError::ValueNotFound`] if `value` is absent, or
    /// [`BiMapError::DuplicateKey`] if `key` is already in the map.
    pub fn set_key<Q>(&mut self, value: &Q, key: K) -> Result<K, BiMapError>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = self
            .value_position(value)
            .ok_or(BiMapError::ValueNotFound)?;
        if self.contains_key(&key) {
            return Err(BiMapError::DuplicateKey);
        }
        self.unindex_key(position);
        let old = mem::replace(&mut self.pairs[position].0, key);
        self.index_key(position);
        Ok(old)
    }

    /// Removes the pair holding `key`.
    pub fn remove_by_key<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = self.key_position(key)?;
        Some(self.remove_position(position))
    }

    /// Removes the pair holding `value`.
    pub fn remove_by_value<Q>(&mut self, value: &Q) -> Option<(K, V)>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = self.value_position(value)?;
        Some(self.remove_position(position))
    }

    /// Removes the pair only if `key` is paired with exactly `value`.
    pub fn remove_pair<QK, QV>(&mut self, key: &QK, value: &QV) -> Option<(K, V)>
    where
        K: Borrow<QK>,
        V: Borrow<QV>,
        QK: Hash + Eq + ?Sized,
        QV: Hash + Eq + ?Sized,
    {
        let position = self.key_position(key)?;
        if self.pairs[position].1.borrow() != value {
            return None;
        }
        Some(self.remove_position(position))
    }

    fn key_position<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.key_hasher.hash_one(key);
        self.by_key
            .find(hash, |&slot| self.pairs[slot].0.borrow() == key)
            .copied()
    }

    fn value_position<Q>(&self, value: &Q) -> Option<usize>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.value_hasher.hash_one(value);
        self.by_value
            .find(hash, |&slot| self.pairs[slot].1.borrow() == value)
            .copied()
    }

    /// Swap-removes the pair at `position` and re-points the pair moved into it.
    fn remove_position(&mut self, position: usize) -> (K, V) {
        self.unindex_key(position);
        self.unindex_value(position);
        let last = self.pairs.len() - 1;
        let removed = self.pairs.swap_remove(position);
        if position != last {
            let key_hash = self.key_hasher.hash_one(&self.pairs[position].0);
            let value_hash = self.value_hasher.hash_one(&self.pairs[position].1);
            if let Some(slot) = self.by_key.find_mut(key_hash, |&slot| slot == last) {
                *slot = position;
            }
            if let Some(slot) = self.by_value.find_mut(value_hash, |&slot| slot == last) {
                *slot = position;
            }
        }
        removed
    }

    /// Maps the key at `position`. `pairs[position]` must already hold it.
    fn index_key(&mut self, position: usize) {
        let Self {
            pairs,
            by_key,
            key_hasher,
            ..
        } = self;
        let hash = key_hasher.hash_one(&pairs[position].0);
        by_key.insert_unique(hash, position, |&slot| key_hasher.hash_one(&pairs[slot].0));
    }

    fn index_value(&mut self, position: usize) {
        let Self {
            pairs,
            by_value,
            value_hasher,
            ..
        } = self;
        let hash = value_hasher.hash_one(&pairs[position].1);
        by_value.insert_unique(hash, position, |&slot| {
            value_hasher.hash_one(&pairs[slot].1)
        });
    }

    fn unindex_key(&mut self, position: usize) {
        let hash = self.key_hasher.hash_one(&self.pairs[position].0);
        let found = self.by_key.find_entry(hash, |&slot| slot == position);
        debug_assert!(found.is_ok(), "pair {position} missing from the key index");
        if let Ok(found) = found {
            found.remove();
        }
    }

    fn unindex_value(&mut self, position: usize) {
        let hash = self.value_hasher.hash_one(&self.pairs[position].1);
        let found = self.by_value.find_entry(hash, |&slot| slot == position);
        debug_assert!(found.is_ok(), "pair {position} missing from the value index");
        if let Ok(found) = found {
            found.remove();
        }
    }
}

impl<K, V> Default for BiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, SK, SV> fmt::Debug for BiMap<K, V, SK, SV> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.pairs.iter().map(|(key, value)| (key, value)))
            .finish()
    }
}

/// Two maps are equal when they hold the same pairs, in any order.
impl<K, V, SK, SV> PartialEq for BiMap<K, V, SK, SV>
where
    K: Hash + Eq,
    V: Hash + Eq,
    SK: BuildHasher,
    SV: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.contains_pair(key, value))
    }
}

impl<K, V, SK, SV> Eq for BiMap<K, V, SK, SV>
where
    K: Hash + Eq,
    V: Hash + Eq,
    SK: BuildHasher,
    SV: BuildHasher,
{
}

/// Iterator over the `(key, value)` pairs of a [`BiMap`].
#[derive(Clone, Debug)]
pub struct Iter<'a, K, V> {
    pairs: slice::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.pairs.next().map(|(key, value)| (key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pairs.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.pairs.next_back().map(|(key, value)| (key, value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V, SK, SV> IntoIterator for &'a BiMap<K, V, SK, SV> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, SK, SV> IntoIterator for BiMap<K, V, SK, SV> {
    type Item = (K, V);
    type IntoIter = alloc::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indexed<K: Hash + Eq, V: Hash + Eq>(map: &BiMap<K, V>) {
        assert_eq!(map.by_key.len(), map.pairs.len());
        assert_eq!(map.by_value.len(), map.pairs.len());
        for (position, (key, value)) in map.pairs.iter().enumerate() {
            assert_eq!(map.key_position(key), Some(position));
            assert_eq!(map.value_position(value), Some(position));
        }
    }

    #[test]
    fn swap_remove_repoints_the_moved_pair() {
        let mut map: BiMap<u32, char> =
            BiMap::try_from_pairs([(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')]).unwrap();
        assert_eq!(map.remove_by_key(&1), Some((1, 'a')));
        assert_eq!(map.pairs[0], (4, 'd'));
        assert_indexed(&map);

        assert_eq!(map.remove_by_value(&'d'), Some((4, 'd')));
        assert_indexed(&map);
    }

    #[test]
    fn removing_the_last_pair_moves_nothing() {
        let mut map: BiMap<u32, char> = BiMap::try_from_pairs([(1, 'a'), (2, 'b')]).unwrap();
        assert_eq!(map.remove_by_key(&2), Some((2, 'b')));
        assert_eq!(map.pairs, [(1, 'a')]);
        assert_indexed(&map);
    }

    #[test]
    fn re_pairing_keeps_both_indexes_in_step() {
        let mut map: BiMap<u32, char> = BiMap::try_from_pairs([(1, 'a'), (2, 'b')]).unwrap();
        assert_eq!(map.set_value(&1, 'z'), Ok('a'));
        assert_eq!(map.set_key(&'b', 9), Ok(2));
        assert_eq!(map.pairs, [(1, 'z'), (9, 'b')]);
        assert_indexed(&map);
    }

    #[test]
    fn draining_from_the_front_stays_consistent() {
        let mut map: BiMap<u32, u64> =
            BiMap::try_from_pairs((0..32).map(|n| (n, u64::from(n) * 10))).unwrap();
        while !map.is_empty() {
            let key = map.pairs[0].0;
            map.remove_by_key(&key).unwrap();
            assert_indexed(&map);
        }
        assert!(map.is_empty());
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "missing from the key index")]
    fn removal_with_a_stale_index_is_caught() {
        let mut map: BiMap<u32, char> = BiMap::try_from_pairs([(1, 'a'), (2, 'b')]).unwrap();
        map.by_key.clear();
        map.remove_position(0);
    }
}
