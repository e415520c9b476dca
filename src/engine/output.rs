//! Filter run results.
//!
//! ## Purpose
//!
//! This module defines [`FilterResult`], the immutable output of one
//! filter run (grid axes plus one dense array per requested quantity),
//! and [`FilterOutcome`], which distinguishes a completed run from a
//! cancelled one.
//!
//! ## Design notes
//!
//! * **Immutable**: a result is produced by exactly one run and never
//!   mutated afterwards.
//! * **On-Demand Conversion**: converted views are computed when asked for
//!   and not cached; the internal SI arrays are the stored form.
//! * **No Partial Results**: a cancelled run yields
//!   [`FilterOutcome::Cancelled`] with no arrays at all, so a partially
//!   written cell can never be mistaken for a computed value.
//!
//! ## Non-goals
//!
//! * This module does not serialize results; persistence belongs to the
//!   caller.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::ToString;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::string::ToString;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::EgtfError;
use crate::primitives::grid::GridData;
use crate::primitives::quantity::{Converter, Quantity};

// ============================================================================
// Filter Result
// ============================================================================

/// Immutable output of one completed filter run.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult<T> {
    /// Location axis of the output grid in \[m\].
    locations: Vec<T>,

    /// Time axis of the output grid in \[s\].
    times: Vec<T>,

    /// Filtered internal arrays per requested quantity, in request order.
    data: Vec<(Quantity, GridData<T>)>,
}

impl<T: Float> FilterResult<T> {
    /// Assemble a result from its axes and per-quantity arrays.
    pub(crate) fn new(
        locations: Vec<T>,
        times: Vec<T>,
        data: Vec<(Quantity, GridData<T>)>,
    ) -> Self {
        Self { locations, times, data }
    }

    /// Location axis of the output grid in \[m\].
    pub fn locations(&self) -> &[T] {
        &self.locations
    }

    /// Time axis of the output grid in \[s\].
    pub fn times(&self) -> &[T] {
        &self.times
    }

    /// Quantities computed in this result, in request order.
    pub fn quantities(&self) -> impl Iterator<Item = &Quantity> {
        self.data.iter().map(|(quantity, _)| quantity)
    }

    /// Whether the given quantity was computed in this result.
    pub fn contains(&self, quantity: &Quantity) -> bool {
        self.data.iter().any(|(q, _)| q == quantity)
    }

    /// Internal SI array of the given quantity.
    pub fn values(&self, quantity: &Quantity) -> Result<&GridData<T>, EgtfError> {
        self.data
            .iter()
            .find(|(q, _)| q == quantity)
            .map(|(_, values)| values)
            .ok_or_else(|| EgtfError::UnknownQuantity { name: quantity.name().to_string() })
    }

    /// Internal SI value of a quantity at location index `i`, time index
    /// `j`.
    pub fn value(&self, quantity: &Quantity, i: usize, j: usize) -> Result<T, EgtfError> {
        Ok(self.values(quantity)?.get(i, j))
    }

    /// Converted view of the given quantity.
    pub fn converted<C: Converter<T>>(
        &self,
        quantity: &Quantity,
        converter: &C,
    ) -> Result<C::Output, EgtfError> {
        Ok(converter.convert(self.values(quantity)?))
    }
}

// ============================================================================
// Filter Outcome
// ============================================================================

/// Outcome of one filter run: completed with a result, or cancelled.
///
/// Cancellation is a cooperative outcome distinct from both success and
/// failure; configuration and data errors are reported as [`EgtfError`]
/// instead.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome<T> {
    /// The run completed; all requested arrays are fully populated.
    Completed(FilterResult<T>),

    /// The run was cancelled between batches; no result is available.
    Cancelled,
}

impl<T: Float> FilterOutcome<T> {
    /// The result of a completed run, or `None` when cancelled.
    pub fn into_result(self) -> Option<FilterResult<T>> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Cancelled => None,
        }
    }

    /// The result of a completed run, or `None` when cancelled.
    pub fn result(&self) -> Option<&FilterResult<T>> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Cancelled => None,
        }
    }

    /// Whether the run was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
