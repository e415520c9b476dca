//! Input validation for engine configuration.
//!
//! ## Purpose
//!
//! This module provides validation for the engine's numerical
//! configuration: wave speeds, blend thresholds, and batching. Grid axes
//! and kernel ranges validate themselves at construction; everything else
//! is checked here before a run starts.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: validation stops at the first error encountered.
//! * **Eager**: all checks run at build or `run` entry, never mid-run.
//! * **Generics**: validation is generic over `Float` types.
//!
//! ## Invariants
//!
//! * Validation logic is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * This module does not correct invalid inputs.
//! * This module does not validate data samples (handled at insertion by
//!   the data-point index).

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::EgtfError;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for engine configuration.
///
/// All methods return `Result<(), EgtfError>` and fail fast upon the
/// first violation.
pub struct Validator;

impl Validator {
    /// Validate a wave speed or threshold for finiteness.
    pub fn validate_finite<T: Float>(value: T, name: &'static str) -> Result<(), EgtfError> {
        if !value.is_finite() {
            return Err(EgtfError::NonFiniteParameter {
                name,
                value: value.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(())
    }

    /// Validate the blend transition width (must be finite and positive).
    pub fn validate_speed_range<T: Float>(value: T) -> Result<(), EgtfError> {
        if !value.is_finite() || value <= T::zero() {
            return Err(EgtfError::NonPositiveParameter {
                name: "speed_range",
                value: value.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(())
    }

    /// Validate the progress batch size (columns per notification).
    pub fn validate_batch_size(batch_size: usize) -> Result<(), EgtfError> {
        if batch_size == 0 {
            return Err(EgtfError::InvalidBatchSize(batch_size));
        }
        Ok(())
    }

    /// Validate that no builder parameter was set multiple times.
    pub fn validate_no_duplicates(
        duplicate_param: Option<&'static str>,
    ) -> Result<(), EgtfError> {
        if let Some(parameter) = duplicate_param {
            return Err(EgtfError::DuplicateParameter { parameter });
        }
        Ok(())
    }
}
