// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The weighted shuffle bag container.

use alloc::vec::Vec;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

use hashbrown::{DefaultHashBuilder, HashTable};
use rand::Rng;
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;

use crate::draw::DrawSequence;
use crate::entry::WeightedEntry;
use crate::error::BagError;
use crate::iter::Iter;
use crate::reconcile::SyncState;

/// An insertion-ordered set of weighted elements with shuffled random draws.
///
/// Each distinct element occupies one registry entry and carries a frequency.
/// Draws walk a shuffled sequence in which every element appears exactly
/// `frequency` times, so over a full shuffle epoch each element is drawn in
/// proportion to its weight. Enumeration always follows insertion order.
///
/// - `T` is compared with [`Eq`] and hashed through `S`.
/// - `R` is the random source used to shuffle each epoch. Inject a seeded
///   generator (see [`WeightedShuffleBag::with_rng`]) for reproducible draws.
///
/// Adds and removes never reshuffle. Newly added weight is appended to the tail
/// of the current epoch and is drawn last until [`WeightedShuffleBag::reshuffle`]
/// is called or the epoch runs out.
#[derive(Clone)]
pub struct WeightedShuffleBag<T, R = SmallRng, S = DefaultHashBuilder> {
    pub(crate) entries: Vec<WeightedEntry<T>>,
    /// Registry positions keyed by element hash.
    pub(crate) index: HashTable<usize>,
    pub(crate) draws: DrawSequence,
    pub(crate) state: SyncState,
    pub(crate) hash_builder: S,
    pub(crate) rng: R,
}

#[cfg(feature = "std")]
impl<T> WeightedShuffleBag<T> {
    /// Creates an empty bag seeded from the operating system.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty bag with room for `capacity` distinct elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_rng(capacity, SmallRng::from_os_rng())
    }
}

impl<T, R> WeightedShuffleBag<T, R> {
    /// Creates an empty bag that shuffles with `rng`.
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self::with_capacity_and_rng(0, rng)
    }

    /// Creates an empty bag with room for `capacity` distinct elements.
    #[must_use]
    pub fn with_capacity_and_rng(capacity: usize, rng: R) -> Self {
        Self::with_rng_and_hasher(capacity, rng, DefaultHashBuilder::default())
    }

    /// Builds a bag from a persisted registry.
    ///
    /// The entries are stored as given; the index and draw sequence are rebuilt
    /// on first mutable access, merging any duplicate elements.
    /// See [`WeightedShuffleBag::restore`].
    #[must_use]
    pub fn from_persistable(registry: Vec<WeightedEntry<T>>, rng: R) -> Self {
        let mut bag = Self::with_rng(rng);
        bag.restore(registry);
        bag
    }

    /// Builds a bag from `(element, frequency)` pairs, such as the contents of a map.
    ///
    /// Frequencies of 0 are stored as 1. Like [`WeightedShuffleBag::from_persistable`],
    /// the derived state is rebuilt lazily.
    #[must_use]
    pub fn from_frequencies<I>(frequencies: I, rng: R) -> Self
    where
        I: IntoIterator<Item = (T, u32)>,
    {
        Self::from_persistable(
            frequencies.into_iter().map(WeightedEntry::from).collect(),
            rng,
        )
    }
}

impl<T, R, S> WeightedShuffleBag<T, R, S> {
    /// Creates an empty bag with an explicit random source and hasher.
    #[must_use]
    pub fn with_rng_and_hasher(capacity: usize, rng: R, hash_builder: S) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashTable::with_capacity(capacity),
            draws: DrawSequence::with_capacity(capacity),
            state: SyncState::Clean,
            hash_builder,
            rng,
        }
    }

    /// Returns `true` if the bag holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct elements the registry can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// The registry as stored, in insertion order.
    ///
    /// While [`WeightedShuffleBag::sync_state`] is [`SyncState::Dirty`] this
    /// may still contain unmerged duplicates.
    #[must_use]
    pub fn entries(&self) -> &[WeightedEntry<T>] {
        &self.entries
    }

    /// Position of the next draw within the current shuffle epoch.
    ///
    /// `None` when the next read starts a new epoch.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.draws.cursor()
    }

    /// The hasher used for element lookups.
    #[must_use]
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Mutable access to the random source, for reseeding.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Flags the draw sequence to be shuffled on the next read.
    ///
    /// Shuffling is deferred until [`WeightedShuffleBag::current`] or
    /// [`WeightedShuffleBag::next_random`] runs, so repeated calls cost nothing.
    pub fn reshuffle(&mut self) {
        self.draws.invalidate();
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.draws.clear();
        self.state = SyncState::Clean;
    }
}

impl<T, R, S> WeightedShuffleBag<T, R, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Number of distinct elements. Frequencies are not counted.
    #[must_use]
    pub fn len(&self) -> usize {
        match self.state {
            SyncState::Clean => self.entries.len(),
            SyncState::Dirty => self.first_occurrences().len(),
        }
    }

    /// Sum of all frequencies: the number of draws in one shuffle epoch.
    #[must_use]
    pub fn total_frequency(&self) -> usize {
        match self.state {
            SyncState::Clean => self.draws.len(),
            SyncState::Dirty => self
                .entries
                .iter()
                .map(|entry| entry.frequency() as usize)
                .sum(),
        }
    }

    /// Returns `true` if `element` is in the bag.
    #[must_use]
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.state {
            SyncState::Clean => self.position_of(element).is_some(),
            SyncState::Dirty => self
                .entries
                .iter()
                .any(|entry| entry.element().borrow() == element),
        }
    }

    /// The stored frequency of `element`, or 0 if it is absent.
    #[must_use]
    pub fn frequency<Q>(&self, element: &Q) -> u32
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.state {
            SyncState::Clean => self
                .position_of(element)
                .map_or(0, |position| self.entries[position].frequency()),
            SyncState::Dirty => self
                .entries
                .iter()
                .filter(|entry| entry.element().borrow() == element)
                .fold(0_u32, |sum, entry| sum.saturating_add(entry.frequency())),
        }
    }

    /// Iterates over the distinct elements in insertion order.
    pub fn iter(&self) -> Iter<'_, T> {
        match self.state {
            SyncState::Clean => Iter::registry(&self.entries),
            SyncState::Dirty => Iter::positions(&self.entries, self.first_occurrences()),
        }
    }

    /// Adds `count` to the weight of `element`, appending it if absent.
    ///
    /// The new draw slots go to the tail of the current epoch; call
    /// [`WeightedShuffleBag::reshuffle`] to mix them in. A frequency saturates at
    /// `u32::MAX`.
    ///
    /// # Errors
    ///
    /// [`BagError::InvalidArgument`] if `count` is 0. The bag is left untouched.
    pub fn add(&mut self, element: T, count: u32) -> Result<(), BagError> {
        if count == 0 {
            return Err(BagError::InvalidArgument { argument: "count" });
        }
        self.reconcile();
        self.push_weight(element, count);
        Ok(())
    }

    /// Adds `element` with a weight of 1, or bumps its frequency by 1.
    pub fn insert(&mut self, element: T) {
        self.reconcile();
        self.push_weight(element, 1);
    }

    /// Removes up to `count` from the weight of `element`.
    ///
    /// Returns the weight actually removed. If `count` covers the whole stored
    /// frequency, the element leaves the bag and later entries shift down by one.
    /// Otherwise the frequency drops by exactly `count` and stays at least 1.
    /// Like [`WeightedShuffleBag::add`], this does not reshuffle.
    ///
    /// # Errors
    ///
    /// [`BagError::InvalidArgument`] if `count` is 0. The bag is left untouched.
    pub fn remove<Q>(&mut self, element: &Q, count: u32) -> Result<u32, BagError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if count == 0 {
            return Err(BagError::InvalidArgument { argument: "count" });
        }
        self.reconcile();
        let Some(position) = self.position_of(element) else {
            return Ok(0);
        };
        let stored = self.entries[position].frequency();
        if stored > count {
            self.entries[position].set_frequency(stored - count);
            self.draws.strip(position, count);
            Ok(count)
        } else {
            self.remove_entry_at(position);
            Ok(stored)
        }
    }

    /// Removes a single unit of weight from `element`. Returns `true` if anything was removed.
    pub fn remove_one<Q>(&mut self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        matches!(self.remove(element, 1), Ok(removed) if removed > 0)
    }

    /// Removes `element` entirely, returning the frequency it had (0 if absent).
    pub fn remove_all_of<Q>(&mut self, element: &Q) -> u32
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.reconcile();
        match self.position_of(element) {
            Some(position) => self.remove_entry_at(position).frequency(),
            None => 0,
        }
    }

    /// Clones the distinct elements, in insertion order, into `destination[offset..]`.
    ///
    /// # Errors
    ///
    /// [`BagError::DestinationTooSmall`] if `destination` cannot hold every element
    /// from `offset` on. Nothing is written in that case.
    pub fn copy_to(&self, destination: &mut [T], offset: usize) -> Result<(), BagError>
    where
        T: Clone,
    {
        let required = offset.saturating_add(self.len());
        if destination.len() < required {
            return Err(BagError::DestinationTooSmall {
                required,
                available: destination.len(),
            });
        }
        for (slot, element) in destination[offset..].iter_mut().zip(self.iter()) {
            slot.clone_from(element);
        }
        Ok(())
    }

    /// Clones the registry entries into `destination[offset..]`, reconciling first.
    ///
    /// # Errors
    ///
    /// [`BagError::DestinationTooSmall`] if `destination` cannot hold every entry
    /// from `offset` on. Nothing is written in that case.
    pub fn copy_entries_to(
        &mut self,
        destination: &mut [WeightedEntry<T>],
        offset: usize,
    ) -> Result<(), BagError>
    where
        T: Clone,
    {
        self.reconcile();
        let required = offset.saturating_add(self.entries.len());
        if destination.len() < required {
            return Err(BagError::DestinationTooSmall {
                required,
                available: destination.len(),
            });
        }
        destination[offset..required].clone_from_slice(&self.entries);
        Ok(())
    }

    /// Looks up the registry position of `element`. Only valid while clean.
    fn position_of<Q>(&self, element: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        debug_assert_eq!(
            self.state,
            SyncState::Clean,
            "index lookups need a reconciled bag"
        );
        let hash = self.hash_builder.hash_one(element);
        self.index
            .find(hash, |&position| {
                self.entries[position].element().borrow() == element
            })
            .copied()
    }

    /// Adds weight without validating `count`. The bag must be clean.
    fn push_weight(&mut self, element: T, count: u32) {
        let (position, added) = match self.position_of(&element) {
            Some(position) => {
                let entry = &mut self.entries[position];
                let stored = entry.frequency();
                let added = count.min(u32::MAX - stored);
                entry.set_frequency(stored + added);
                (position, added)
            }
            None => {
                let position = self.entries.len();
                let hash = self.hash_builder.hash_one(&element);
                self.entries.push(WeightedEntry::new(element, count));
                let Self {
                    entries,
                    index,
                    hash_builder,
                    ..
                } = self;
                index.insert_unique(hash, position, |&slot| {
                    hash_builder.hash_one(entries[slot].element())
                });
                (position, count)
            }
        };
        self.draws.push_copies(position, added);
    }

    /// Deletes the registry entry at `position`, shifting every later position
    /// down by one in both the index and the draw sequence.
    fn remove_entry_at(&mut self, position: usize) -> WeightedEntry<T> {
        let hash = self
            .hash_builder
            .hash_one(self.entries[position].element());
        let found = self.index.find_entry(hash, |&slot| slot == position);
        debug_assert!(
            found.is_ok(),
            "registry position {position} missing from the element index"
        );
        match found {
            Ok(found) => {
                found.remove();
            }
            Err(_) => log::warn!("registry position {position} missing from the element index"),
        }
        let removed = self.entries.remove(position);
        for slot in self.index.iter_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        self.draws.strip_and_shift(position);
        log::trace!(
            "removed registry entry {position} with frequency {}",
            removed.frequency()
        );
        removed
    }
}

impl<T, R, S> WeightedShuffleBag<T, R, S>
where
    T: Hash + Eq,
    R: Rng,
    S: BuildHasher,
{
    /// The element under the cursor, or `None` if the bag is empty.
    ///
    /// With a single distinct element it is returned directly and the cursor is
    /// dropped, so growing the bag later starts a fresh epoch. Otherwise, if the
    /// cursor has no valid slot, the draw sequence is shuffled and the cursor
    /// restarts at the first slot. Repeated calls return the same element.
    pub fn current(&mut self) -> Option<&T> {
        self.reconcile();
        match self.entries.len() {
            0 => {
                self.draws.invalidate();
                None
            }
            1 => {
                self.draws.invalidate();
                Some(self.entries[0].element())
            }
            _ => {
                let position = self.draws.current(&mut self.rng)?;
                Some(self.entries[position].element())
            }
        }
    }

    /// Advances the cursor and returns the element under it.
    ///
    /// Once every slot of the epoch has been drawn, the next call shuffles and
    /// starts a new epoch.
    pub fn next_random(&mut self) -> Option<&T> {
        self.reconcile();
        if self.entries.len() > 1 {
            self.draws.advance();
        }
        self.current()
    }
}

#[cfg(feature = "std")]
impl<T, R, S> Default for WeightedShuffleBag<T, R, S>
where
    R: SeedableRng,
    S: Default,
{
    fn default() -> Self {
        Self::with_rng_and_hasher(0, R::from_os_rng(), S::default())
    }
}

impl<T: fmt::Debug, R, S> fmt::Debug for WeightedShuffleBag<T, R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedShuffleBag")
            .field("entries", &self.entries)
            .field("state", &self.state)
            .field("cursor", &self.draws.cursor())
            .finish_non_exhaustive()
    }
}

impl<'a, T, R, S> IntoIterator for &'a WeightedShuffleBag<T, R, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, R, S> Extend<T> for WeightedShuffleBag<T, R, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, elements: I) {
        self.reconcile();
        for element in elements {
            self.push_weight(element, 1);
        }
    }
}

impl<T, R, S> Extend<(T, u32)> for WeightedShuffleBag<T, R, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Adds each `(element, count)` pair; a count of 0 adds 1.
    fn extend<I: IntoIterator<Item = (T, u32)>>(&mut self, weighted: I) {
        self.reconcile();
        for (element, count) in weighted {
            self.push_weight(element, count.max(1));
        }
    }
}

#[cfg(feature = "std")]
impl<T: Hash + Eq> FromIterator<T> for WeightedShuffleBag<T> {
    fn from_iter<I: IntoIterator<Item = T>>(elements: I) -> Self {
        let elements = elements.into_iter();
        let mut bag = Self::with_capacity(elements.size_hint().0);
        bag.extend(elements);
        bag
    }
}

#[cfg(feature = "std")]
impl<T: Hash + Eq> FromIterator<(T, u32)> for WeightedShuffleBag<T> {
    fn from_iter<I: IntoIterator<Item = (T, u32)>>(weighted: I) -> Self {
        let weighted = weighted.into_iter();
        let mut bag = Self::with_capacity(weighted.size_hint().0);
        bag.extend(weighted);
        bag
    }
}
