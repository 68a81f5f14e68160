// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Serde support.
//!
//! A list serializes as the plain sequence of its elements. Loading rebuilds
//! the index from that sequence; repeated elements keep their first position
//! and later copies are dropped.

use alloc::vec::Vec;
use core::hash::{BuildHasher, Hash};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ListSet;

impl<T: Serialize, S> Serialize for ListSet<T, S> {
    fn serialize<Z>(&self, serializer: Z) -> Result<Z::Ok, Z::Error>
    where
        Z: Serializer,
    {
        serializer.collect_seq(self.as_slice())
    }
}

impl<'de, T, S> Deserialize<'de> for ListSet<T, S>
where
    T: Deserialize<'de> + Hash + Eq,
    S: BuildHasher + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = Vec::<T>::deserialize(deserializer)?;
        let mut set = Self::with_capacity_and_hasher(items.len(), S::default());
        set.extend(items);
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use crate::ListSet;

    #[test]
    fn serializes_as_a_plain_sequence() {
        let set: ListSet<&str> = ["b", "a", "c"].into_iter().collect();
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["b","a","c"]"#);
    }

    #[test]
    fn loading_drops_repeated_elements() {
        let set: ListSet<String> = serde_json::from_str(r#"["x","y","x","z","y"]"#).unwrap();
        assert_eq!(set.as_slice(), ["x", "y", "z"]);
        assert_eq!(set.index_of("z"), Some(2));
    }

    #[test]
    fn round_trips_through_a_binary_format() {
        let mut set: ListSet<u32> = (0..5).collect();
        set.remove_at(1).unwrap();
        set.insert_at(0, 700);

        let bytes = postcard::to_allocvec(&set).unwrap();
        let loaded: ListSet<u32> = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(loaded, set);
        assert_eq!(loaded.index_of(&700), Some(0));
        assert_eq!(loaded.into_vec(), Vec::from([700, 0, 2, 3, 4]));
    }
}
