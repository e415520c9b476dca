//! Ordered store of input measurements with rectangle range queries.
//!
//! ## Purpose
//!
//! This module defines [`DataPoint`], one measurement at a location and
//! time carrying one or more quantity values, and [`DataPointIndex`], the
//! ordered store the filter queries once per grid point for all samples
//! inside the kernel's bounding rectangle.
//!
//! ## Design notes
//!
//! * **Nested Ordering**: samples are grouped into location buckets sorted
//!   ascending, each holding time buckets sorted ascending; a rectangle
//!   query is two nested binary searches, `O(log n + k)` for `k` hits.
//! * **Inclusive Bounds**: both edges of both query ranges are inclusive,
//!   so data exactly at `x ± x_max` or `t ± t_max` contributes.
//! * **Independent Duplicates**: repeated insertion at one `(location,
//!   time)` appends; every inserted value enters the weighted sum, with no
//!   implicit deduplication.
//! * **Eager Rejection**: non-finite locations, times, or values fail at
//!   insertion with the offending sample identified, never silently
//!   dropped.
//!
//! ## Invariants
//!
//! * Location buckets are strictly ascending by location; time buckets are
//!   strictly ascending by time within each location.
//! * Every stored value is finite.
//!
//! ## Non-goals
//!
//! * This module does not weight or filter samples (see
//!   `algorithms::estimator`).
//! * This module does not parse sensor formats; values arrive in SI units.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::EgtfError;
use crate::primitives::quantity::Quantity;

// ============================================================================
// Data Point
// ============================================================================

/// One input measurement: a location, a time, and per-quantity SI values.
///
/// Not every quantity needs to be present on every point.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint<T> {
    /// Location in \[m\] along the 1-D reference line.
    location: T,

    /// Time in \[s\].
    time: T,

    /// Measured SI values by quantity.
    values: Vec<(Quantity, T)>,
}

impl<T: Float> DataPoint<T> {
    /// Create a point at the given location and time with no values yet.
    pub fn new(location: T, time: T) -> Self {
        Self { location, time, values: Vec::new() }
    }

    /// Add a measured SI value for a quantity.
    pub fn with(mut self, quantity: Quantity, value: T) -> Self {
        self.values.push((quantity, value));
        self
    }

    /// Location in \[m\].
    pub fn location(&self) -> T {
        self.location
    }

    /// Time in \[s\].
    pub fn time(&self) -> T {
        self.time
    }

    /// Measured values by quantity.
    pub fn values(&self) -> &[(Quantity, T)] {
        &self.values
    }
}

// ============================================================================
// Buckets
// ============================================================================

/// All samples sharing one `(location, time)` cell, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucket<T> {
    /// Time in \[s\].
    time: T,

    /// Samples at this location and time.
    entries: Vec<(Quantity, T)>,
}

impl<T: Float> TimeBucket<T> {
    /// Time in \[s\].
    pub fn time(&self) -> T {
        self.time
    }

    /// Samples at this location and time, in insertion order.
    pub fn entries(&self) -> &[(Quantity, T)] {
        &self.entries
    }
}

/// All samples at one location, ordered by time.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationBucket<T> {
    /// Location in \[m\].
    location: T,

    /// Time buckets, strictly ascending by time.
    times: Vec<TimeBucket<T>>,
}

impl<T: Float> LocationBucket<T> {
    /// Location in \[m\].
    pub fn location(&self) -> T {
        self.location
    }

    /// Time buckets with `from <= time <= to` (empty for an inverted
    /// range).
    pub fn times_in(&self, from: T, to: T) -> &[TimeBucket<T>] {
        let lo = self.times.partition_point(|b| b.time < from);
        let hi = self.times.partition_point(|b| b.time <= to);
        &self.times[lo.min(hi)..hi]
    }

    /// All time buckets at this location.
    pub fn times(&self) -> &[TimeBucket<T>] {
        &self.times
    }
}

// ============================================================================
// Data Point Index
// ============================================================================

/// Ordered store of all input samples, queried by the filter for the
/// samples inside a kernel's bounding rectangle.
///
/// The index is built once per configuration and may be reused across
/// multiple filter runs; during a run it is read-only and shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPointIndex<T> {
    /// Location buckets, strictly ascending by location.
    buckets: Vec<LocationBucket<T>>,

    /// Number of stored quantity values.
    len: usize,
}

impl<T: Float> DataPointIndex<T> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self { buckets: Vec::new(), len: 0 }
    }

    /// Number of stored quantity values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a data point with all its quantity values.
    ///
    /// Fails on a non-finite location, time, or value; nothing is stored
    /// on failure.
    pub fn insert(&mut self, point: DataPoint<T>) -> Result<(), EgtfError> {
        if point.values.is_empty() {
            Self::check_finite(point.location, point.time, T::zero())?;
        }
        for &(_, value) in point.values() {
            Self::check_finite(point.location, point.time, value)?;
        }
        let DataPoint { location, time, values } = point;
        for (quantity, value) in values {
            self.push(location, time, quantity, value);
        }
        Ok(())
    }

    /// Insert a single SI value for a quantity.
    pub fn insert_point(
        &mut self,
        quantity: &Quantity,
        location: T,
        time: T,
        value: T,
    ) -> Result<(), EgtfError> {
        Self::check_finite(location, time, value)?;
        self.push(location, time, quantity.clone(), value);
        Ok(())
    }

    /// Insert independent samples from parallel slices.
    ///
    /// `locations`, `times`, and `values` must have equal lengths.
    pub fn insert_vector(
        &mut self,
        quantity: &Quantity,
        locations: &[T],
        times: &[T],
        values: &[T],
    ) -> Result<(), EgtfError> {
        if locations.len() != times.len() || times.len() != values.len() {
            return Err(EgtfError::MismatchedInputs {
                locations: locations.len(),
                times: times.len(),
                values: values.len(),
            });
        }
        for i in 0..values.len() {
            Self::check_finite(locations[i], times[i], values[i])?;
        }
        for i in 0..values.len() {
            self.push(locations[i], times[i], quantity.clone(), values[i]);
        }
        Ok(())
    }

    /// Insert a `[location][time]` matrix of samples.
    ///
    /// `values` must hold one row per location, each of the time axis
    /// length.
    pub fn insert_grid(
        &mut self,
        quantity: &Quantity,
        locations: &[T],
        times: &[T],
        values: &[Vec<T>],
    ) -> Result<(), EgtfError> {
        if values.len() != locations.len() || values.iter().any(|row| row.len() != times.len()) {
            return Err(EgtfError::MismatchedInputs {
                locations: locations.len(),
                times: times.len(),
                values: values.iter().map(|row| row.len()).sum(),
            });
        }
        for (i, row) in values.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                Self::check_finite(locations[i], times[j], value)?;
            }
        }
        for (i, row) in values.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                self.push(locations[i], times[j], quantity.clone(), value);
            }
        }
        Ok(())
    }

    /// Location buckets with `from <= location <= to` (empty for an
    /// inverted range).
    pub fn locations_in(&self, from: T, to: T) -> &[LocationBucket<T>] {
        let lo = self.buckets.partition_point(|b| b.location < from);
        let hi = self.buckets.partition_point(|b| b.location <= to);
        &self.buckets[lo.min(hi)..hi]
    }

    /// All location buckets.
    pub fn locations(&self) -> &[LocationBucket<T>] {
        &self.buckets
    }

    /// Remove all samples from before the given time.
    ///
    /// Useful in live usage where older data is no longer required before
    /// re-filtering.
    pub fn clear_before(&mut self, time: T) {
        let mut removed = 0;
        for bucket in &mut self.buckets {
            let cut = bucket.times.partition_point(|b| b.time < time);
            removed += bucket.times[..cut].iter().map(|b| b.entries.len()).sum::<usize>();
            bucket.times.drain(..cut);
        }
        self.buckets.retain(|b| !b.times.is_empty());
        self.len -= removed;
    }

    fn check_finite(location: T, time: T, value: T) -> Result<(), EgtfError> {
        if !location.is_finite() || !time.is_finite() || !value.is_finite() {
            return Err(EgtfError::NonFiniteSample {
                location: location.to_f64().unwrap_or(f64::NAN),
                time: time.to_f64().unwrap_or(f64::NAN),
                value: value.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(())
    }

    fn push(&mut self, location: T, time: T, quantity: Quantity, value: T) {
        let i = self.buckets.partition_point(|b| b.location < location);
        if i == self.buckets.len() || self.buckets[i].location != location {
            self.buckets.insert(i, LocationBucket { location, times: Vec::new() });
        }
        let bucket = &mut self.buckets[i];
        let j = bucket.times.partition_point(|b| b.time < time);
        if j == bucket.times.len() || bucket.times[j].time != time {
            bucket.times.insert(j, TimeBucket { time, entries: Vec::new() });
        }
        bucket.times[j].entries.push((quantity, value));
        self.len += 1;
    }
}
