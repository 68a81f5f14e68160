// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serde support.
//!
//! A bag serializes as the sequence of its registry entries. Deserializing
//! restores that registry and leaves the bag dirty, so duplicate entries in the
//! input are merged on first use rather than rejected.

#[cfg(feature = "std")]
use alloc::vec::Vec;

#[cfg(feature = "std")]
use serde::{Deserialize, Deserializer};
use serde::{Serialize, Serializer};

use crate::bag::WeightedShuffleBag;
#[cfg(feature = "std")]
use crate::entry::WeightedEntry;

/// Wire form of [`WeightedEntry`](crate::WeightedEntry) frequencies.
///
/// Frequencies are written and read as `i64` so that hand-edited or corrupted
/// values below 1 (including negatives) still load, floored to 1.
pub(crate) mod frequency {
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<Z>(frequency: &u32, serializer: Z) -> Result<Z::Ok, Z::Error>
    where
        Z: Serializer,
    {
        serializer.serialize_i64(i64::from(*frequency))
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = i64::deserialize(deserializer)?;
        Ok(u32::try_from(raw.max(1)).unwrap_or(u32::MAX))
    }
}

impl<T: Serialize, R, S> Serialize for WeightedShuffleBag<T, R, S> {
    fn serialize<Z>(&self, serializer: Z) -> Result<Z::Ok, Z::Error>
    where
        Z: Serializer,
    {
        serializer.collect_seq(self.entries())
    }
}

#[cfg(feature = "std")]
impl<'de, T, R, S> Deserialize<'de> for WeightedShuffleBag<T, R, S>
where
    T: Deserialize<'de>,
    R: rand::SeedableRng,
    S: Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let registry = Vec::<WeightedEntry<T>>::deserialize(deserializer)?;
        let mut bag = Self::with_rng_and_hasher(registry.len(), R::from_os_rng(), S::default());
        bag.restore(registry);
        Ok(bag)
    }
}
