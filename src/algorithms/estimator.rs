//! Weighted local averaging under one propagation-speed regime.
//!
//! ## Purpose
//!
//! This module computes, at a single grid point, the kernel-weighted
//! average of every quantity over the candidate samples, under one
//! assumed propagation speed (free flow or congestion). It is invoked
//! twice per grid point, once per regime, over the same candidate set.
//!
//! ## Design notes
//!
//! * **One Pass**: candidates are walked once per regime; the kernel
//!   weight is evaluated once per candidate and applied to all of its
//!   quantity values.
//! * **Explicit Missing**: a quantity whose weights sum to zero has no
//!   estimate; the accumulator reports `None` instead of dividing by a
//!   near-zero denominator.
//! * **Independent Duplicates**: every candidate entry contributes to the
//!   weighted sum, including repeated samples at one location and time.
//!
//! ## Invariants
//!
//! * Accumulated weights are non-negative.
//! * Estimates are returned aligned with the quantity list supplied at
//!   construction.
//!
//! ## Non-goals
//!
//! * This module does not select candidates (the caller queries the index
//!   once per grid point).
//! * This module does not mix regimes (see `algorithms::blend`).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::math::kernel::Kernel;
use crate::primitives::quantity::Quantity;

// ============================================================================
// Weighted Mean
// ============================================================================

/// Accumulator for one weighted mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedMean<T> {
    /// Weighted sum of values.
    numerator: T,

    /// Sum of weights.
    denominator: T,
}

impl<T: Float> WeightedMean<T> {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self { numerator: T::zero(), denominator: T::zero() }
    }

    /// Add a value with a weight.
    pub fn add(&mut self, value: T, weight: T) {
        self.numerator = self.numerator + value * weight;
        self.denominator = self.denominator + weight;
    }

    /// The weighted mean, or `None` when no weight has accumulated.
    pub fn mean(&self) -> Option<T> {
        if self.denominator > T::zero() {
            Some(self.numerator / self.denominator)
        } else {
            None
        }
    }

    /// Sum of accumulated weights.
    pub fn weight_sum(&self) -> T {
        self.denominator
    }
}

impl<T: Float> Default for WeightedMean<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Candidates
// ============================================================================

/// One candidate sample cell relative to the estimation point.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a, T> {
    /// Signed spatial offset, estimation location minus data location,
    /// in \[m\].
    pub dx: T,

    /// Signed temporal offset, estimation time minus data time, in \[s\].
    pub dt: T,

    /// Quantity values measured at the data cell.
    pub values: &'a [(Quantity, T)],
}

// ============================================================================
// Regime Estimate
// ============================================================================

/// Per-quantity weighted means under one assumed propagation speed.
///
/// Entries align with the quantity list the estimator was built with.
#[derive(Debug, Clone)]
pub struct RegimeEstimate<T> {
    /// One accumulator per quantity.
    means: Vec<WeightedMean<T>>,
}

impl<T: Float> RegimeEstimate<T> {
    /// Estimated value of the quantity at list index `k`, or `None` when
    /// no data contributed.
    pub fn value(&self, k: usize) -> Option<T> {
        self.means[k].mean()
    }

    /// Total weight accumulated for the quantity at list index `k`.
    pub fn weight_sum(&self, k: usize) -> T {
        self.means[k].weight_sum()
    }

    /// Number of quantities estimated.
    pub fn len(&self) -> usize {
        self.means.len()
    }

    /// Whether no quantities are estimated.
    pub fn is_empty(&self) -> bool {
        self.means.is_empty()
    }
}

// ============================================================================
// Regime Estimator
// ============================================================================

/// Computes per-quantity weighted means at a grid point under one assumed
/// propagation speed.
#[derive(Debug, Clone, Copy)]
pub struct RegimeEstimator<'a, T: Float> {
    /// Weighting kernel.
    kernel: &'a Kernel<T>,

    /// Quantities to estimate, defining the alignment of results.
    quantities: &'a [Quantity],
}

impl<'a, T: Float> RegimeEstimator<'a, T> {
    /// Create an estimator for the given kernel and quantity list.
    pub fn new(kernel: &'a Kernel<T>, quantities: &'a [Quantity]) -> Self {
        Self { kernel, quantities }
    }

    /// Estimate all quantities over the candidate set under one assumed
    /// propagation speed.
    pub fn estimate(
        &self,
        candidates: &[Candidate<'_, T>],
        propagation_speed: T,
    ) -> RegimeEstimate<T> {
        let mut means = vec![WeightedMean::new(); self.quantities.len()];
        for candidate in candidates {
            let weight = self.kernel.weight(propagation_speed, candidate.dx, candidate.dt);
            if weight <= T::zero() {
                continue;
            }
            for (quantity, value) in candidate.values {
                if let Some(k) = self.quantities.iter().position(|q| q == quantity) {
                    means[k].add(*value, weight);
                }
            }
        }
        RegimeEstimate { means }
    }
}
