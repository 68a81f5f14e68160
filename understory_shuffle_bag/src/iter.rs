// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Borrowing iterator over distinct elements.

use alloc::vec;
use alloc::vec::Vec;
use core::iter::FusedIterator;
use core::slice;

use crate::entry::WeightedEntry;

/// Iterator over the distinct elements of a
/// [`WeightedShuffleBag`](crate::WeightedShuffleBag), in insertion order.
#[derive(Clone, Debug)]
pub struct Iter<'a, T> {
    inner: Inner<'a, T>,
}

#[derive(Clone, Debug)]
enum Inner<'a, T> {
    /// The registry is known to be duplicate-free.
    Registry(slice::Iter<'a, WeightedEntry<T>>),
    /// Only the listed positions are yielded.
    Positions {
        entries: &'a [WeightedEntry<T>],
        positions: vec::IntoIter<usize>,
    },
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn registry(entries: &'a [WeightedEntry<T>]) -> Self {
        Self {
            inner: Inner::Registry(entries.iter()),
        }
    }

    pub(crate) fn positions(entries: &'a [WeightedEntry<T>], positions: Vec<usize>) -> Self {
        Self {
            inner: Inner::Positions {
                entries,
                positions: positions.into_iter(),
            },
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Registry(entries) => entries.next().map(WeightedEntry::element),
            Inner::Positions { entries, positions } => {
                let entries: &'a [WeightedEntry<T>] = *entries;
                positions.next().map(|position| entries[position].element())
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            Inner::Registry(entries) => entries.size_hint(),
            Inner::Positions { positions, .. } => positions.size_hint(),
        }
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            Inner::Registry(entries) => entries.next_back().map(WeightedEntry::element),
            Inner::Positions { entries, positions } => {
                let entries: &'a [WeightedEntry<T>] = *entries;
                positions
                    .next_back()
                    .map(|position| entries[position].element())
            }
        }
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}
