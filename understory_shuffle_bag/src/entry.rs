// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Weighted registry entries.

/// An element paired with its draw weight.
///
/// The frequency is the number of times the element's slot appears in one
/// shuffle epoch. It never drops below 1: constructing or updating an entry
/// with 0 stores 1 instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedEntry<T> {
    element: T,
    #[cfg_attr(
        feature = "serde",
        serde(with = "crate::serde_impl::frequency")
    )]
    frequency: u32,
}

impl<T> WeightedEntry<T> {
    /// Creates an entry, flooring `frequency` at 1.
    #[must_use]
    pub fn new(element: T, frequency: u32) -> Self {
        Self {
            element,
            frequency: frequency.max(1),
        }
    }

    /// The element this entry weighs.
    #[must_use]
    pub fn element(&self) -> &T {
        &self.element
    }

    /// The number of slots this element occupies per shuffle epoch. Always at least 1.
    #[must_use]
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Sets the frequency, flooring it at 1.
    pub fn set_frequency(&mut self, frequency: u32) {
        self.frequency = frequency.max(1);
    }

    /// Consumes the entry, returning the element.
    #[must_use]
    pub fn into_element(self) -> T {
        self.element
    }

    /// Consumes the entry, returning `(element, frequency)`.
    #[must_use]
    pub fn into_parts(self) -> (T, u32) {
        (self.element, self.frequency)
    }
}

impl<T> From<(T, u32)> for WeightedEntry<T> {
    fn from((element, frequency): (T, u32)) -> Self {
        Self::new(element, frequency)
    }
}
