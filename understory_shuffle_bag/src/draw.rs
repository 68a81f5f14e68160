// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frequency-expanded draw sequence and its epoch cursor.

use alloc::vec::Vec;
use core::iter;

use rand::Rng;
use rand::seq::SliceRandom;

/// Registry positions expanded by frequency, plus a cursor into them.
///
/// A position `i` appears exactly `frequency(i)` times. The slots are shuffled
/// lazily: [`DrawSequence::invalidate`] only drops the cursor, and the next
/// [`DrawSequence::current`] call shuffles and restarts at slot 0.
#[derive(Clone, Debug, Default)]
pub(crate) struct DrawSequence {
    slots: Vec<usize>,
    /// `None` means the next read starts a new shuffle epoch.
    cursor: Option<usize>,
}

impl DrawSequence {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            cursor: None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn cursor(&self) -> Option<usize> {
        self.cursor.filter(|&cursor| cursor < self.slots.len())
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.cursor = None;
    }

    pub(crate) fn invalidate(&mut self) {
        self.cursor = None;
    }

    /// Appends `count` copies of `position` at the tail, leaving the order of existing slots alone.
    pub(crate) fn push_copies(&mut self, position: usize, count: u32) {
        self.slots.extend(iter::repeat_n(position, count as usize));
    }

    /// Moves the cursor one slot forward. A dropped cursor stays dropped.
    pub(crate) fn advance(&mut self) {
        if let Some(cursor) = &mut self.cursor {
            *cursor = cursor.saturating_add(1);
        }
    }

    /// Returns the registry position under the cursor, starting a new epoch if
    /// the cursor is dropped or has run past the last slot.
    pub(crate) fn current<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.slots.is_empty() {
            self.cursor = None;
            return None;
        }
        let cursor = match self.cursor {
            Some(cursor) if cursor < self.slots.len() => cursor,
            _ => {
                self.slots.shuffle(rng);
                self.cursor = Some(0);
                log::trace!("shuffled {} draw slots for a new epoch", self.slots.len());
                0
            }
        };
        Some(self.slots[cursor])
    }

    /// Removes the first `count` slots holding `position`.
    ///
    /// Used when an entry's frequency shrinks but the entry itself stays, so no
    /// other position moves.
    pub(crate) fn strip(&mut self, position: usize, count: u32) {
        let mut remaining = count;
        self.slots.retain(|&slot| {
            if remaining > 0 && slot == position {
                remaining -= 1;
                false
            } else {
                true
            }
        });
    }

    /// Removes every slot holding `position` and shifts larger positions down
    /// by one, mirroring a `Vec::remove(position)` on the registry.
    pub(crate) fn strip_and_shift(&mut self, position: usize) {
        self.slots.retain_mut(|slot| {
            if *slot == position {
                return false;
            }
            if *slot > position {
                *slot -= 1;
            }
            true
        });
    }

    #[cfg(test)]
    pub(crate) fn occurrences(&self, position: usize) -> usize {
        self.slots.iter().filter(|&&slot| slot == position).count()
    }
}
