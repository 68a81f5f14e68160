// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory List Set: an insertion-ordered list of unique elements.
//!
//! [`ListSet`] behaves like a `Vec<T>` that refuses duplicates. Elements keep
//! the position they were inserted at, can be read and replaced by index, and
//! membership checks are hashed rather than scanned. It is a good fit for
//! ordered registries (tab strips, layer stacks, recently-used lists) where
//! both "is this present?" and "what is at slot 3?" are common questions.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_list_set::ListSet;
//!
//! let mut layers = ListSet::new();
//! assert!(layers.insert("background"));
//! assert!(layers.insert("sprites"));
//! assert!(!layers.insert("background"), "duplicates are refused");
//!
//! assert!(layers.insert_at(1, "terrain"));
//! assert_eq!(layers.as_slice(), ["background", "terrain", "sprites"]);
//! assert_eq!(layers.index_of("sprites"), Some(2));
//!
//! assert!(layers.remove("background"));
//! assert_eq!(layers.index_of("sprites"), Some(1));
//! ```
//!
//! Set algebra (union, intersection, and so on) is deliberately not provided;
//! collect into a `HashSet` for that.
//!
//! ## Features
//!
//! - `serde`: (de)serializes the list as a plain sequence. Repeated elements
//!   in the input keep their first position.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

#[cfg(feature = "serde")]
mod serde_impl;

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::mem;

use hashbrown::{DefaultHashBuilder, HashTable};

/// Error returned by the checked positional operations of [`ListSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListSetError {
    /// The index was past the end of the list.
    OutOfBounds {
        /// The requested index.
        index: usize,
        /// The list length at the time of the call.
        len: usize,
    },
    /// The element is already in the list.
    Duplicate,
}

impl fmt::Display for ListSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { index, len } => {
                write!(f, "index {index} is out of bounds for a list of length {len}")
            }
            Self::Duplicate => f.write_str("element is already in the list"),
        }
    }
}

impl core::error::Error for ListSetError {}

/// An ordered list whose elements are unique.
///
/// Elements live in a `Vec<T>`; a hash table maps each element to its
/// position. Insertions and removals in the middle re-index the positions that
/// moved, so they cost O(n) like the underlying `Vec` operation.
#[derive(Clone)]
pub struct ListSet<T, S = DefaultHashBuilder> {
    items: Vec<T>,
    index: HashTable<usize>,
    hash_builder: S,
}

impl<T> ListSet<T> {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Creates an empty list with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, DefaultHashBuilder::default())
    }
}

impl<T, S> ListSet<T, S> {
    /// Creates an empty list that hashes with `hash_builder`.
    #[must_use]
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates an empty list with room for `capacity` elements that hashes with `hash_builder`.
    #[must_use]
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            index: HashTable::with_capacity(capacity),
            hash_builder,
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The elements in order.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Returns the element at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    /// Consumes the list, returning the elements in order.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T, S> ListSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Returns `true` if `item` is in the list.
    #[must_use]
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index_of(item).is_some()
    }

    /// Position of `item`, if present.
    #[must_use]
    pub fn index_of<Q>(&self, item: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let hash = self.hash_builder.hash_one(item);
        self.index
            .find(hash, |&slot| self.items[slot].borrow() == item)
            .copied()
    }

    /// Appends `item` unless it is already present. Returns `true` if it was added.
    pub fn insert(&mut self, item: T) -> bool {
        if self.contains(&item) {
            return false;
        }
        let position = self.items.len();
        let hash = self.hash_builder.hash_one(&item);
        self.items.push(item);
        self.index_position(hash, position);
        true
    }

    /// Inserts `item` at `index`, shifting later elements back.
    ///
    /// Returns `false`, leaving the list untouched, if `index > len` or `item`
    /// is already present.
    pub fn insert_at(&mut self, index: usize, item: T) -> bool {
        self.try_insert_at(index, item).is_ok()
    }

    /// Inserts `item` at `index`, shifting later elements back.
    ///
    /// # Errors
    ///
    /// [`ListSetError::OutOfBounds`] if `index > len`, or
    /// [`ListSetError::Duplicate`] if `item` is already present.
    pub fn try_insert_at(&mut self, index: usize, item: T) -> Result<(), ListSetError> {
        let len = self.items.len();
        if index > len {
            return Err(ListSetError::OutOfBounds { index, len });
        }
        if self.contains(&item) {
            return Err(ListSetError::Duplicate);
        }
        let hash = self.hash_builder.hash_one(&item);
        self.items.insert(index, item);
        for slot in self.index.iter_mut() {
            if *slot >= index {
                *slot += 1;
            }
        }
        self.index_position(hash, index);
        Ok(())
    }

    /// Replaces the element at `index` with `item`, returning the old element.
    ///
    /// # Errors
    ///
    /// [`ListSetError::OutOfBounds`] if `index >= len`, or
    /// [`ListSetError::Duplicate`] if `item` is already present anywhere in the
    /// list, including at `index` itself.
    pub fn set(&mut self, index: usize, item: T) -> Result<T, ListSetError> {
        let len = self.items.len();
        if index >= len {
            return Err(ListSetError::OutOfBounds { index, len });
        }
        if self.contains(&item) {
            return Err(ListSetError::Duplicate);
        }
        self.unindex_position(index);
        let hash = self.hash_builder.hash_one(&item);
        let old = mem::replace(&mut self.items[index], item);
        self.index_position(hash, index);
        Ok(old)
    }

    /// Removes `item` if present. Returns `true` if it was removed.
    pub fn remove<Q>(&mut self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index_of(item) {
            Some(index) => {
                self.remove_position(index);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the element at `index`, shifting later elements forward.
    ///
    /// # Errors
    ///
    /// [`ListSetError::OutOfBounds`] if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> Result<T, ListSetError> {
        let len = self.items.len();
        if index >= len {
            return Err(ListSetError::OutOfBounds { index, len });
        }
        Ok(self.remove_position(index))
    }

    fn remove_position(&mut self, index: usize) -> T {
        self.unindex_position(index);
        let removed = self.items.remove(index);
        for slot in self.index.iter_mut() {
            if *slot > index {
                *slot -= 1;
            }
        }
        removed
    }

    /// Maps `position` in the table. `items[position]` must already hold the element.
    fn index_position(&mut self, hash: u64, position: usize) {
        let Self {
            items,
            index,
            hash_builder,
        } = self;
        index.insert_unique(hash, position, |&slot| hash_builder.hash_one(&items[slot]));
    }

    fn unindex_position(&mut self, position: usize) {
        let hash = self.hash_builder.hash_one(&self.items[position]);
        let found = self.index.find_entry(hash, |&slot| slot == position);
        debug_assert!(found.is_ok(), "position {position} missing from the index");
        if let Ok(found) = found {
            found.remove();
        }
    }
}

impl<T> Default for ListSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, S> fmt::Debug for ListSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

impl<T: PartialEq, S> PartialEq for ListSet<T, S> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq, S> Eq for ListSet<T, S> {}

impl<'a, T, S> IntoIterator for &'a ListSet<T, S> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T, S> IntoIterator for ListSet<T, S> {
    type Item = T;
    type IntoIter = alloc::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T, S> Extend<T> for ListSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Appends each element that is not already present.
    fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.insert(item);
        }
    }
}

impl<T: Hash + Eq> FromIterator<T> for ListSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(items: I) -> Self {
        let items = items.into_iter();
        let mut set = Self::with_capacity(items.size_hint().0);
        set.extend(items);
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_indexed<T: Hash + Eq>(set: &ListSet<T>) {
        assert_eq!(set.index.len(), set.items.len());
        for (position, item) in set.items.iter().enumerate() {
            assert_eq!(set.index_of(item), Some(position));
        }
    }

    #[test]
    fn insert_at_front_reindexes_suffix() {
        let mut set: ListSet<u32> = (1..=4).collect();
        assert!(set.insert_at(0, 0));
        assert_eq!(set.as_slice(), [0, 1, 2, 3, 4]);
        assert_indexed(&set);
    }

    #[test]
    fn remove_in_middle_reindexes_suffix() {
        let mut set: ListSet<u32> = (0..6).collect();
        assert_eq!(set.remove_at(2), Ok(2));
        assert!(set.remove(&4));
        assert_eq!(set.as_slice(), [0, 1, 3, 5]);
        assert_indexed(&set);
    }

    #[test]
    fn set_swaps_index_entry() {
        let mut set: ListSet<char> = ['a', 'b', 'c'].into_iter().collect();
        assert_eq!(set.set(1, 'z'), Ok('b'));
        assert!(!set.contains(&'b'));
        assert_eq!(set.index_of(&'z'), Some(1));
        assert_indexed(&set);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "missing from the index")]
    fn removal_with_a_stale_index_is_caught() {
        let mut set: ListSet<u32> = (0..3).collect();
        set.index.clear();
        let _ = set.remove_at(1);
    }

    #[test]
    fn many_front_removals_stay_consistent() {
        let mut set: ListSet<u32> = (0..64).collect();
        while !set.is_empty() {
            set.remove_at(0).unwrap();
            assert_indexed(&set);
        }
    }
}
