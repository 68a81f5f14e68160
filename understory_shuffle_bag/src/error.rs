// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by bag operations.

use core::fmt;

/// Error returned by [`WeightedShuffleBag`](crate::WeightedShuffleBag) operations.
///
/// Every fallible operation validates its arguments before touching the bag,
/// so an error never leaves the bag partially updated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BagError {
    /// A count argument was zero; adds and removes require at least 1.
    InvalidArgument {
        /// Name of the offending argument.
        argument: &'static str,
    },
    /// The destination slice cannot hold every element at the requested offset.
    DestinationTooSmall {
        /// Slots needed from the start of the slice.
        required: usize,
        /// Length of the slice.
        available: usize,
    },
}

impl fmt::Display for BagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { argument } => {
                write!(f, "`{argument}` must be at least 1")
            }
            Self::DestinationTooSmall {
                required,
                available,
            } => write!(
                f,
                "destination holds {available} slots but {required} are required"
            ),
        }
    }
}

impl core::error::Error for BagError {}
