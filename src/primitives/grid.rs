//! Output grid axes and dense 2-D value arrays.
//!
//! ## Purpose
//!
//! This module defines [`Grid`], the two ordered axis sequences whose
//! Cartesian product is the set of estimation points, and [`GridData`],
//! the dense `[location][time]` array holding filtered values for one
//! quantity.
//!
//! ## Design notes
//!
//! * **Validated Construction**: axes must be non-empty, finite, and
//!   strictly ascending; violations are rejected before any computation.
//! * **Immutable Sharing**: a grid never changes after construction and is
//!   shared read-only across worker threads.
//! * **Explicit Missing Marker**: cells without any contributing data hold
//!   NaN, written only through the explicit missing path so that a missing
//!   cell is always distinguishable from a computed zero.
//!
//! ## Invariants
//!
//! * Axis values are finite and strictly increasing.
//! * `GridData` always holds `num_locations * num_times` values.
//!
//! ## Non-goals
//!
//! * This module does not interpolate between grid points.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::EgtfError;

// ============================================================================
// Grid
// ============================================================================

/// Output grid: ascending locations in \[m\] times ascending times in \[s\].
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    /// Location axis in \[m\], strictly ascending.
    locations: Vec<T>,

    /// Time axis in \[s\], strictly ascending.
    times: Vec<T>,
}

impl<T: Float> Grid<T> {
    /// Create a grid from its two axes.
    ///
    /// Both axes must be non-empty, finite, and strictly ascending. A
    /// single-element axis is valid and degenerates the filter to pure
    /// temporal or pure spatial smoothing.
    pub fn new(locations: Vec<T>, times: Vec<T>) -> Result<Self, EgtfError> {
        Self::validate_axis("location", &locations)?;
        Self::validate_axis("time", &times)?;
        Ok(Self { locations, times })
    }

    fn validate_axis(axis: &'static str, values: &[T]) -> Result<(), EgtfError> {
        if values.is_empty() {
            return Err(EgtfError::EmptyGridAxis { axis });
        }
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(EgtfError::NonFiniteAxisValue {
                    axis,
                    index,
                    value: value.to_f64().unwrap_or(f64::NAN),
                });
            }
            if index > 0 && value <= values[index - 1] {
                return Err(EgtfError::NonAscendingGridAxis { axis, index });
            }
        }
        Ok(())
    }

    /// Location axis in \[m\].
    pub fn locations(&self) -> &[T] {
        &self.locations
    }

    /// Time axis in \[s\].
    pub fn times(&self) -> &[T] {
        &self.times
    }

    /// Number of estimation points (`locations * times`).
    pub fn num_cells(&self) -> usize {
        self.locations.len() * self.times.len()
    }
}

// ============================================================================
// Grid Data
// ============================================================================

/// Dense `[location][time]` array of filtered values for one quantity.
///
/// Missing cells hold NaN; use [`GridData::is_missing`] rather than
/// comparing against NaN directly.
#[derive(Debug, Clone, PartialEq)]
pub struct GridData<T> {
    /// Row-major values, `values[i * num_times + j]` for location `i`,
    /// time `j`.
    values: Vec<T>,

    /// Number of time steps per location row.
    num_times: usize,
}

impl<T: Float> GridData<T> {
    /// Create an array of the given dimensions with every cell missing.
    pub fn new_missing(num_locations: usize, num_times: usize) -> Self {
        Self { values: vec![T::nan(); num_locations * num_times], num_times }
    }

    /// The missing-value marker.
    pub fn missing() -> T {
        T::nan()
    }

    /// Whether a value is the missing marker.
    pub fn is_missing_value(value: T) -> bool {
        value.is_nan()
    }

    /// Number of location rows.
    pub fn num_locations(&self) -> usize {
        if self.num_times == 0 { 0 } else { self.values.len() / self.num_times }
    }

    /// Number of time steps per location row.
    pub fn num_times(&self) -> usize {
        self.num_times
    }

    /// Value at location index `i`, time index `j`.
    pub fn get(&self, i: usize, j: usize) -> T {
        self.values[i * self.num_times + j]
    }

    /// Set the value at location index `i`, time index `j`.
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        self.values[i * self.num_times + j] = value;
    }

    /// Whether the cell at location index `i`, time index `j` is missing.
    pub fn is_missing(&self, i: usize, j: usize) -> bool {
        Self::is_missing_value(self.get(i, j))
    }

    /// Row-major view of all values.
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Copy the values into a nested `[location][time]` structure.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.values.chunks(self.num_times).map(|row| row.to_vec()).collect()
    }
}
