//! Adaptive combination of the two regime estimates.
//!
//! ## Purpose
//!
//! This module combines the free-flow and congested regime estimates of a
//! grid point into a single adaptive estimate, using a smooth
//! condition-dependent mixing weight derived from the reference quantity
//! (conventionally speed).
//!
//! ## Design notes
//!
//! * **Sigmoid Transition**: the mixing weight is
//!   `w = 0.5 * (1 + tanh((v_crit - u) / delta_v))` with `u` the lower of
//!   the two regime estimates of the reference quantity; low reference
//!   speeds push the weight toward the congested regime.
//! * **Graceful Degradation**: a quantity with data in only one regime
//!   takes that regime's estimate; with data in neither, the cell is
//!   missing. A cell without reference data mixes both regimes equally.
//!
//! ## Invariants
//!
//! * The mixing weight is in `[0, 1]`.
//! * When both regime estimates of a quantity coincide, the blended value
//!   equals them for every mixing weight.
//!
//! ## Non-goals
//!
//! * This module does not estimate regimes (see `algorithms::estimator`).
//! * This module does not calibrate `v_crit`/`delta_v`; they are
//!   configuration.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::EgtfError;
use crate::primitives::grid::GridData;

// ============================================================================
// Congestion Blend
// ============================================================================

/// Mixing of free-flow and congested estimates around a critical speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CongestionBlend<T> {
    /// Flip-over speed below which traffic is considered congested,
    /// in \[m/s\].
    critical_speed: T,

    /// Width of the transition between regimes, in \[m/s\].
    speed_range: T,
}

impl<T: Float> CongestionBlend<T> {
    /// Create a blend around the given critical speed and transition
    /// width.
    pub fn new(critical_speed: T, speed_range: T) -> Result<Self, EgtfError> {
        if !critical_speed.is_finite() {
            return Err(EgtfError::NonFiniteParameter {
                name: "critical_speed",
                value: critical_speed.to_f64().unwrap_or(f64::NAN),
            });
        }
        if !speed_range.is_finite() || speed_range <= T::zero() {
            return Err(EgtfError::NonPositiveParameter {
                name: "speed_range",
                value: speed_range.to_f64().unwrap_or(f64::NAN),
            });
        }
        Ok(Self { critical_speed, speed_range })
    }

    /// Flip-over speed in \[m/s\].
    pub fn critical_speed(&self) -> T {
        self.critical_speed
    }

    /// Transition width in \[m/s\].
    pub fn speed_range(&self) -> T {
        self.speed_range
    }

    /// Mixing weight of the congested regime, in `[0, 1]`.
    ///
    /// `reference_congested` and `reference_free` are the regime estimates
    /// of the reference quantity; the lower available one drives the
    /// sigmoid. With no reference data the regimes mix equally.
    pub fn mixing_weight(&self, reference_congested: Option<T>, reference_free: Option<T>) -> T {
        let half = T::from(0.5).unwrap();
        let u = match (reference_congested, reference_free) {
            (Some(congested), Some(free)) => congested.min(free),
            (Some(congested), None) => congested,
            (None, Some(free)) => free,
            (None, None) => return half,
        };
        let w = half * (T::one() + ((self.critical_speed - u) / self.speed_range).tanh());
        w.max(T::zero()).min(T::one())
    }

    /// Blend one quantity's regime estimates with the given mixing weight.
    ///
    /// A quantity with data in only one regime takes that regime's
    /// estimate; with data in neither the result is the missing marker.
    pub fn blend_value(&self, mixing_weight: T, congested: Option<T>, free: Option<T>) -> T {
        match (congested, free) {
            (Some(congested), Some(free)) => {
                mixing_weight * congested + (T::one() - mixing_weight) * free
            }
            (Some(congested), None) => congested,
            (None, Some(free)) => free,
            (None, None) => GridData::<T>::missing(),
        }
    }
}
