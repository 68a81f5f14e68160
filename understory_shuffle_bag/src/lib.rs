// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Shuffle Bag: weighted random draws without replacement per epoch.
//!
//! [`WeightedShuffleBag`] is an insertion-ordered set in which every distinct
//! element carries an integer weight, its **frequency**. Random draws walk a
//! shuffled sequence where each element appears exactly `frequency` times, so
//! within one **shuffle epoch** every element is drawn exactly as often as its
//! weight, and over many epochs the draw distribution matches the weights.
//! Once the sequence is exhausted, the next draw reshuffles it.
//!
//! This is the classic "shuffle bag" used for loot tables, music playlists, and
//! tile randomizers: random-looking, but never starving an element for longer
//! than an epoch.
//!
//! ## Minimal example
//!
//! ```rust
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use understory_shuffle_bag::WeightedShuffleBag;
//!
//! let mut loot = WeightedShuffleBag::with_rng(SmallRng::seed_from_u64(7));
//! loot.add("common", 3).unwrap();
//! loot.add("rare", 1).unwrap();
//!
//! // One epoch is four draws: three "common", one "rare", in shuffled order.
//! let mut epoch: Vec<&str> = (0..4).map(|_| *loot.next_random().unwrap()).collect();
//! epoch.sort_unstable();
//! assert_eq!(epoch, ["common", "common", "common", "rare"]);
//!
//! // Enumeration ignores weights and follows insertion order.
//! assert!(loot.iter().eq(["common", "rare"].iter()));
//! ```
//!
//! ## Concepts
//!
//! - **Registry**: the ordered list of [`WeightedEntry`] values. This is the
//!   only part of a bag worth persisting.
//! - **Draw sequence**: registry positions repeated by frequency and shuffled
//!   lazily. [`WeightedShuffleBag::current`] reads the slot under the cursor;
//!   [`WeightedShuffleBag::next_random`] advances first.
//! - **Reshuffle**: [`WeightedShuffleBag::reshuffle`] only drops the cursor.
//!   The shuffle itself happens on the next read, so calling it repeatedly is free.
//! - **Reconciliation**: after [`WeightedShuffleBag::restore`] (or
//!   deserialization) the bag is [`SyncState::Dirty`] and its derived state is
//!   rebuilt on the next mutable access, merging duplicate elements.
//!
//! Adds and removes are incremental and never reshuffle. Added weight joins the
//! tail of the current epoch, so it is drawn last until the next reshuffle.
//!
//! ## Features
//!
//! - `std` (default): entropy-seeded constructors such as
//!   [`WeightedShuffleBag::new`], plus [`Default`] and [`FromIterator`].
//! - `serde`: (de)serializes the registry. Frequencies below 1 in the input
//!   are floored to 1.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bag;
mod draw;
mod entry;
mod error;
mod iter;
mod reconcile;
#[cfg(feature = "serde")]
mod serde_impl;

pub use bag::WeightedShuffleBag;
pub use entry::WeightedEntry;
pub use error::BagError;
pub use iter::Iter;
pub use reconcile::SyncState;
