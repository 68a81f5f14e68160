// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry snapshots and the rebuild pass that restores derived state.
//!
//! Only the registry of [`WeightedEntry`] values is meant to be persisted.
//! After [`WeightedShuffleBag::restore`] the bag is [`SyncState::Dirty`]: its
//! element index and draw sequence are stale until [`WeightedShuffleBag::reconcile`]
//! rebuilds them. Every `&mut self` operation reconciles first, and `&self`
//! queries answer from the registry directly while dirty, so callers only need
//! to reconcile by hand to control when the rebuild cost is paid.

use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};

use hashbrown::HashTable;

use crate::bag::WeightedShuffleBag;
use crate::entry::WeightedEntry;

/// Whether a bag's derived state matches its registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum SyncState {
    /// Index and draw sequence agree with the registry.
    #[default]
    Clean,
    /// The registry was replaced; derived state is rebuilt on next mutable access.
    Dirty,
}

impl<T, R, S> WeightedShuffleBag<T, R, S> {
    /// Whether the derived state is up to date.
    #[must_use]
    pub fn sync_state(&self) -> SyncState {
        self.state
    }

    /// Replaces the registry wholesale, as a deserializer would.
    ///
    /// The bag becomes [`SyncState::Dirty`]. The registry may hold the same
    /// element more than once; the rebuild merges such entries into the first
    /// occurrence by summing their frequencies.
    pub fn restore(&mut self, registry: Vec<WeightedEntry<T>>) {
        self.entries = registry;
        self.index.clear();
        self.draws.clear();
        self.state = SyncState::Dirty;
    }

    /// Consumes the bag, returning its registry.
    #[must_use]
    pub fn into_persistable(self) -> Vec<WeightedEntry<T>> {
        self.entries
    }

    /// Snapshot of the registry, suitable for [`WeightedShuffleBag::from_persistable`].
    #[must_use]
    pub fn to_persistable(&self) -> Vec<WeightedEntry<T>>
    where
        T: Clone,
    {
        self.entries.clone()
    }
}

impl<T, R, S> WeightedShuffleBag<T, R, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Rebuilds the element index and draw sequence if the registry was replaced.
    ///
    /// Entries are visited in order. The first occurrence of an element keeps its
    /// place; later duplicates are removed from the registry and their frequency
    /// is added onto the first occurrence. The cursor is dropped so the next
    /// draw starts a new epoch. Does nothing when already clean.
    pub fn reconcile(&mut self) {
        if self.state == SyncState::Clean {
            return;
        }
        self.index.clear();
        self.draws.clear();

        let Self {
            entries,
            index,
            draws,
            hash_builder,
            ..
        } = self;
        let mut position = 0;
        while position < entries.len() {
            let hash = hash_builder.hash_one(entries[position].element());
            let existing = index
                .find(hash, |&slot| {
                    entries[slot].element() == entries[position].element()
                })
                .copied();
            match existing {
                None => {
                    index.insert_unique(hash, position, |&slot| {
                        hash_builder.hash_one(entries[slot].element())
                    });
                    draws.push_copies(position, entries[position].frequency());
                    position += 1;
                }
                Some(first) => {
                    let duplicate = entries.remove(position);
                    let merged = &mut entries[first];
                    let stored = merged.frequency();
                    let added = duplicate.frequency().min(u32::MAX - stored);
                    merged.set_frequency(stored + added);
                    draws.push_copies(first, added);
                    log::debug!(
                        "merged duplicate registry entry at {position} into {first} (+{added})"
                    );
                }
            }
        }

        self.draws.invalidate();
        self.state = SyncState::Clean;
    }

    /// Registry positions holding the first occurrence of each element.
    pub(crate) fn first_occurrences(&self) -> Vec<usize> {
        let mut seen = HashTable::<usize>::with_capacity(self.entries.len());
        let mut positions = Vec::with_capacity(self.entries.len());
        for (position, entry) in self.entries.iter().enumerate() {
            let hash = self.hash_builder.hash_one(entry.element());
            if seen
                .find(hash, |&slot| self.entries[slot].element() == entry.element())
                .is_none()
            {
                seen.insert_unique(hash, position, |&slot| {
                    self.hash_builder.hash_one(self.entries[slot].element())
                });
                positions.push(position);
            }
        }
        positions
    }
}
