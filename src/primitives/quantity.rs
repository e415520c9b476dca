//! Physical quantities and output converters.
//!
//! ## Purpose
//!
//! This module defines [`Quantity`], the identifier for one filtered
//! variable (speed, flow, density, ...), and [`Converter`], the strategy
//! for turning a filtered internal array into a caller-facing
//! representation.
//!
//! ## Design notes
//!
//! * **Value Objects**: quantities are immutable, compared and hashed by
//!   name, and created once at configuration time; many filter runs may
//!   share the same instances.
//! * **SI Internals**: all stored and filtered values are SI-equivalent
//!   doubles; converters apply only on output.
//! * **Strategy Converters**: converters are pure, stateless values;
//!   plain functions plug in through [`FnConverter`].
//!
//! ## Key concepts
//!
//! * **Reference quantity**: the quantity marked `is_speed` is the
//!   conventional reference for the congestion blend.
//!
//! ## Non-goals
//!
//! * This module does not define derived quantities (see
//!   `evaluation::derived`).
//! * This module does not perform unit conversion of inputs; samples are
//!   inserted in SI units.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::borrow::Cow;
#[cfg(feature = "std")]
use std::borrow::Cow;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::grid::GridData;

// ============================================================================
// Quantity
// ============================================================================

/// Identifier for one physical variable handled by the filter.
///
/// Quantities are compared by name; the name must be unique within one
/// filter configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity {
    /// Stable name, e.g. `"speed"`.
    name: Cow<'static, str>,

    /// Whether this quantity is a speed, making it the conventional
    /// reference for the congestion blend.
    speed: bool,
}

impl Quantity {
    /// Create a quantity with the given name.
    pub fn new(name: &str) -> Self {
        Self { name: Cow::Owned(name.into()), speed: false }
    }

    /// Create a speed quantity with the given name.
    pub fn new_speed(name: &str) -> Self {
        Self { name: Cow::Owned(name.into()), speed: true }
    }

    /// The standard speed quantity in \[m/s\].
    pub fn speed() -> Self {
        Self { name: Cow::Borrowed("speed"), speed: true }
    }

    /// The standard flow quantity in \[1/s\].
    pub fn flow() -> Self {
        Self { name: Cow::Borrowed("flow"), speed: false }
    }

    /// The standard density quantity in \[1/m\].
    pub fn density() -> Self {
        Self { name: Cow::Borrowed("density"), speed: false }
    }

    /// Stable name of this quantity.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this quantity is a speed.
    pub fn is_speed(&self) -> bool {
        self.speed
    }
}

// ============================================================================
// Converter
// ============================================================================

/// Strategy converting a filtered internal array to an output
/// representation.
///
/// Converters are pure and stateless, and safe to share across concurrent
/// filter runs. Wrap a plain function in [`FnConverter`] to use it as a
/// converter.
pub trait Converter<T: Float>: Send + Sync {
    /// Output representation.
    type Output;

    /// Convert the internal SI-value array to the output representation.
    fn convert(&self, values: &GridData<T>) -> Self::Output;
}

/// Converter returning the internal SI values unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityConverter;

impl<T: Float> Converter<T> for IdentityConverter {
    type Output = GridData<T>;

    fn convert(&self, values: &GridData<T>) -> GridData<T> {
        values.clone()
    }
}

/// Converter wrapping a pure function or closure.
#[derive(Debug, Clone, Copy)]
pub struct FnConverter<F>(
    /// The wrapped conversion function.
    pub F,
);

impl<T, K, F> Converter<T> for FnConverter<F>
where
    T: Float,
    F: Fn(&GridData<T>) -> K + Send + Sync,
{
    type Output = K;

    fn convert(&self, values: &GridData<T>) -> K {
        (self.0)(values)
    }
}
