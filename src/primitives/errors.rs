//! Error types for filter configuration and input data.
//!
//! ## Purpose
//!
//! This module defines [`EgtfError`], the single error type returned by all
//! fallible operations in the crate: grid and kernel construction, data
//! insertion, engine configuration, and result lookups.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: configuration errors are raised at construction or at
//!   `run` entry, never mid-computation.
//! * **Carried Context**: each variant stores the offending values so the
//!   caller can identify which input was malformed.
//! * **No-Std**: the type is available without `std`; the `Error` trait
//!   implementation is gated on the `std` feature.
//!
//! ## Key concepts
//!
//! * **Configuration errors**: invalid kernel ranges, non-ascending grid
//!   axes, non-finite parameters, cyclic derived-quantity dependencies.
//! * **Data errors**: non-finite samples and mismatched bulk-input lengths,
//!   rejected at insertion.
//! * **Lookup errors**: requesting a quantity that was not computed.
//!
//! ## Non-goals
//!
//! * Missing values and cancellation are not errors and have no variant
//!   here; they are explicit outcomes of a successful run.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::string::String;
#[cfg(feature = "std")]
use std::string::String;

use core::fmt;

// ============================================================================
// Error Type
// ============================================================================

/// Error type for filter configuration, input data, and result lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum EgtfError {
    /// A grid axis contains no values.
    EmptyGridAxis {
        /// Axis name (`"location"` or `"time"`).
        axis: &'static str,
    },

    /// A grid axis is not strictly ascending.
    NonAscendingGridAxis {
        /// Axis name (`"location"` or `"time"`).
        axis: &'static str,
        /// Index of the first value that does not exceed its predecessor.
        index: usize,
    },

    /// A grid axis contains a non-finite value.
    NonFiniteAxisValue {
        /// Axis name (`"location"` or `"time"`).
        axis: &'static str,
        /// Index of the offending value.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// A kernel range or shape scale is not positive.
    InvalidKernelRange {
        /// Parameter name (`"x_max"`, `"t_max"`, `"sigma"`, `"tau"`).
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// An engine parameter is not finite.
    NonFiniteParameter {
        /// Parameter name.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// An engine parameter that must be strictly positive is not.
    NonPositiveParameter {
        /// Parameter name.
        name: &'static str,
        /// The offending value.
        value: f64,
    },

    /// The progress batch size is zero.
    InvalidBatchSize(usize),

    /// A builder parameter was set more than once.
    DuplicateParameter {
        /// Name of the duplicated parameter.
        parameter: &'static str,
    },

    /// A data sample with a non-finite location, time, or value was
    /// rejected at insertion.
    NonFiniteSample {
        /// Sample location in \[m\].
        location: f64,
        /// Sample time in \[s\].
        time: f64,
        /// Sample value in SI units.
        value: f64,
    },

    /// Bulk-insertion slices have unequal lengths.
    MismatchedInputs {
        /// Number of locations supplied.
        locations: usize,
        /// Number of times supplied.
        times: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// A quantity was registered twice, or a derived quantity shares a name
    /// with a measured one.
    DuplicateQuantity {
        /// Name of the duplicated quantity.
        name: String,
    },

    /// Derived-quantity dependencies form a cycle.
    CyclicDependency {
        /// Name of a quantity on the cycle.
        name: String,
    },

    /// The blend reference quantity is registered as derived; the reference
    /// must be directly measured.
    DerivedReference {
        /// Name of the reference quantity.
        name: String,
    },

    /// A quantity was requested from a result that did not compute it.
    UnknownQuantity {
        /// Name of the unknown quantity.
        name: String,
    },
}

// ============================================================================
// Display
// ============================================================================

impl fmt::Display for EgtfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGridAxis { axis } => {
                write!(f, "Empty {} axis (grid axes must contain at least one value)", axis)
            }
            Self::NonAscendingGridAxis { axis, index } => {
                write!(
                    f,
                    "Non-ascending {} axis at index {} (grid axes must be strictly increasing)",
                    axis, index
                )
            }
            Self::NonFiniteAxisValue { axis, index, value } => {
                write!(f, "Non-finite {} axis value at index {}: {}", axis, index, value)
            }
            Self::InvalidKernelRange { name, value } => {
                write!(f, "Invalid kernel {}: {} (must be > 0)", name, value)
            }
            Self::NonFiniteParameter { name, value } => {
                write!(f, "Invalid {}: {} (must be finite)", name, value)
            }
            Self::NonPositiveParameter { name, value } => {
                write!(f, "Invalid {}: {} (must be > 0 and finite)", name, value)
            }
            Self::InvalidBatchSize(got) => {
                write!(f, "Invalid batch_size: {} (must be at least 1)", got)
            }
            Self::DuplicateParameter { parameter } => {
                write!(f, "Parameter '{}' was set multiple times", parameter)
            }
            Self::NonFiniteSample { location, time, value } => {
                write!(
                    f,
                    "Non-finite sample at location {}, time {}: value {}",
                    location, time, value
                )
            }
            Self::MismatchedInputs { locations, times, values } => {
                write!(
                    f,
                    "Unequal lengths: {} locations, {} times, {} values",
                    locations, times, values
                )
            }
            Self::DuplicateQuantity { name } => {
                write!(f, "Quantity '{}' is defined more than once", name)
            }
            Self::CyclicDependency { name } => {
                write!(f, "Cyclic dependency involving derived quantity '{}'", name)
            }
            Self::DerivedReference { name } => {
                write!(
                    f,
                    "Reference quantity '{}' is derived (the blend reference must be measured)",
                    name
                )
            }
            Self::UnknownQuantity { name } => {
                write!(f, "Quantity '{}' was not computed in this result", name)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EgtfError {}
