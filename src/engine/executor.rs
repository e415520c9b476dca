//! Grid filter execution engine.
//!
//! ## Purpose
//!
//! This module orchestrates the full computation over the output grid: it
//! queries the data-point index once per grid point, runs the regime
//! estimator under both assumed propagation speeds, blends the regimes,
//! resolves derived quantities, assembles the result, and reports
//! progress.
//!
//! ## Design notes
//!
//! * **Independent Cells**: no grid cell depends on another; cells are
//!   computed column by column and may fan out across a rayon worker pool
//!   under the `parallel` feature.
//! * **Deterministic Assembly**: parallel batches are collected in column
//!   index order and every cell runs the same arithmetic, so parallel and
//!   sequential runs produce bit-identical results.
//! * **Shared Candidates**: the index query window depends only on the
//!   kernel bounds, never on the assumed speed, so one candidate set per
//!   cell serves both regime estimations.
//! * **Cooperative Cancellation**: the cancellation flag is polled once
//!   per batch of columns; a cancelled run returns no result.
//!
//! ## Invariants
//!
//! * Every cell of a completed result was fully computed; missing cells
//!   carry the explicit marker.
//! * Progress fractions dispatched to observers are non-decreasing.
//!
//! ## Non-goals
//!
//! * This module does not validate grid axes or kernel ranges (both
//!   validate at construction).
//! * This module does not convert output units (see
//!   `primitives::quantity`).

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::vec::Vec;

use core::ops::Range;

// External dependencies
use log::{debug, trace};
use num_traits::Float;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Internal dependencies
use crate::algorithms::blend::CongestionBlend;
use crate::algorithms::estimator::{Candidate, RegimeEstimator};
use crate::evaluation::derived::QuantityPlan;
use crate::math::kernel::Kernel;
use crate::primitives::errors::EgtfError;
use crate::primitives::grid::{Grid, GridData};
use crate::primitives::points::DataPointIndex;
use crate::primitives::progress::{
    CancellationToken, ObserverSet, ProgressAggregator, ProgressEvent,
};
use crate::primitives::quantity::Quantity;
use crate::engine::output::{FilterOutcome, FilterResult};
use crate::engine::validator::Validator;

// ============================================================================
// Configuration
// ============================================================================

/// Numerical configuration of the grid filter engine.
///
/// Wave speeds and blend thresholds are in SI units; see the API layer for
/// the literature defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig<T> {
    /// Shock wave speed in congestion, in \[m/s\] (typically negative).
    pub congested_wave_speed: T,

    /// Wave speed in free flow, in \[m/s\].
    pub free_flow_wave_speed: T,

    /// Flip-over speed below which traffic is congested, in \[m/s\].
    pub critical_speed: T,

    /// Width of the congestion transition, in \[m/s\].
    pub speed_range: T,

    /// Quantity driving the congestion blend, conventionally speed.
    pub reference_quantity: Quantity,

    /// Grid columns computed per progress batch.
    pub batch_size: usize,

    /// Whether to fan out across a worker pool (requires the `parallel`
    /// feature; ignored without it).
    pub parallel: bool,
}

impl<T: Float> FilterConfig<T> {
    /// Validate all configuration parameters, failing fast.
    pub fn validate(&self) -> Result<(), EgtfError> {
        Validator::validate_finite(self.congested_wave_speed, "congested_wave_speed")?;
        Validator::validate_finite(self.free_flow_wave_speed, "free_flow_wave_speed")?;
        Validator::validate_finite(self.critical_speed, "critical_speed")?;
        Validator::validate_speed_range(self.speed_range)?;
        Validator::validate_batch_size(self.batch_size)?;
        Ok(())
    }
}

// ============================================================================
// Executor
// ============================================================================

/// One-run executor over a grid, an index, a kernel, and a quantity plan.
#[derive(Debug)]
pub struct FilterExecutor<'a, T: Float> {
    /// Engine configuration.
    config: &'a FilterConfig<T>,

    /// Output grid.
    grid: &'a Grid<T>,

    /// Input samples, shared read-only.
    index: &'a DataPointIndex<T>,

    /// Weighting kernel, shared read-only.
    kernel: &'a Kernel<T>,

    /// Quantities to estimate and derive.
    plan: &'a QuantityPlan<'a, T>,

    /// Progress observers.
    observers: &'a ObserverSet,

    /// Cancellation flag polled between batches.
    cancel: &'a CancellationToken,

    /// Congestion blend built from the configuration.
    blend: CongestionBlend<T>,

    /// Atomic progress aggregation for this run.
    aggregator: ProgressAggregator,
}

impl<'a, T: Float + Send + Sync> FilterExecutor<'a, T> {
    /// Create an executor, validating the configuration.
    pub fn new(
        config: &'a FilterConfig<T>,
        grid: &'a Grid<T>,
        index: &'a DataPointIndex<T>,
        kernel: &'a Kernel<T>,
        plan: &'a QuantityPlan<'a, T>,
        observers: &'a ObserverSet,
        cancel: &'a CancellationToken,
    ) -> Result<Self, EgtfError> {
        config.validate()?;
        let blend = CongestionBlend::new(config.critical_speed, config.speed_range)?;
        let aggregator = ProgressAggregator::new(grid.num_cells());
        Ok(Self { config, grid, index, kernel, plan, observers, cancel, blend, aggregator })
    }

    /// Run the filter over the whole grid.
    pub fn execute(&self) -> FilterOutcome<T> {
        let n_locations = self.grid.locations().len();
        let n_times = self.grid.times().len();
        let n_requested = self.plan.requested().len();
        debug!(
            "filtering {} x {} grid cells, {} quantities, {} samples",
            n_locations,
            n_times,
            n_requested,
            self.index.len()
        );

        let columns = match self.compute_all_columns(n_locations, n_times, n_requested) {
            Some(columns) => columns,
            None => {
                debug!("filter run cancelled");
                return FilterOutcome::Cancelled;
            }
        };

        let mut arrays: Vec<GridData<T>> = self
            .plan
            .requested()
            .iter()
            .map(|_| GridData::new_missing(n_locations, n_times))
            .collect();
        for (i, column) in columns.iter().enumerate() {
            for (r, array) in arrays.iter_mut().enumerate() {
                for j in 0..n_times {
                    array.set(i, j, column[r * n_times + j]);
                }
            }
        }

        let data: Vec<(Quantity, GridData<T>)> =
            self.plan.requested().iter().cloned().zip(arrays).collect();
        debug!("filter run complete");
        FilterOutcome::Completed(FilterResult::new(
            self.grid.locations().to_vec(),
            self.grid.times().to_vec(),
            data,
        ))
    }

    /// Compute every grid column, batched; `None` when cancelled.
    fn compute_all_columns(
        &self,
        n_locations: usize,
        n_times: usize,
        n_requested: usize,
    ) -> Option<Vec<Vec<T>>> {
        let batch = self.config.batch_size;

        #[cfg(feature = "parallel")]
        if self.config.parallel {
            struct Interrupted;
            let n_batches = (n_locations + batch - 1) / batch;
            let batches: Result<Vec<Vec<Vec<T>>>, Interrupted> = (0..n_batches)
                .into_par_iter()
                .map(|b| {
                    if self.cancel.is_cancelled() {
                        return Err(Interrupted);
                    }
                    let start = b * batch;
                    let end = (start + batch).min(n_locations);
                    let columns: Vec<Vec<T>> =
                        (start..end).map(|i| self.compute_column(i, n_times, n_requested)).collect();
                    self.report_batch(start..end, n_times);
                    Ok(columns)
                })
                .collect();
            return match batches {
                Ok(batches) => Some(batches.into_iter().flatten().collect()),
                Err(Interrupted) => None,
            };
        }

        let mut columns: Vec<Vec<T>> = Vec::with_capacity(n_locations);
        let mut start = 0;
        while start < n_locations {
            if self.cancel.is_cancelled() {
                return None;
            }
            let end = (start + batch).min(n_locations);
            for i in start..end {
                columns.push(self.compute_column(i, n_times, n_requested));
            }
            self.report_batch(start..end, n_times);
            start = end;
        }
        Some(columns)
    }

    /// Compute one grid column; returns `n_requested * n_times` values.
    fn compute_column(&self, i: usize, n_times: usize, n_requested: usize) -> Vec<T> {
        let x = self.grid.locations()[i];
        let spatial =
            self.index.locations_in(self.kernel.from_location(x), self.kernel.to_location(x));
        let estimator = RegimeEstimator::new(self.kernel, self.plan.measured());
        let n_measured = self.plan.measured().len();
        let reference = self.plan.reference_index();

        let mut out = vec![GridData::<T>::missing(); n_requested * n_times];
        let mut cell = vec![GridData::<T>::missing(); self.plan.num_slots()];
        let mut candidates: Vec<Candidate<'_, T>> = Vec::new();
        let mut inputs: Vec<T> = Vec::new();

        for (j, &t) in self.grid.times().iter().enumerate() {
            candidates.clear();
            for bucket in spatial {
                let dx = x - bucket.location();
                for time_bucket in
                    bucket.times_in(self.kernel.from_time(t), self.kernel.to_time(t))
                {
                    candidates.push(Candidate {
                        dx,
                        dt: t - time_bucket.time(),
                        values: time_bucket.entries(),
                    });
                }
            }

            let congested = estimator.estimate(&candidates, self.config.congested_wave_speed);
            let free = estimator.estimate(&candidates, self.config.free_flow_wave_speed);
            let w = self.blend.mixing_weight(congested.value(reference), free.value(reference));
            for k in 0..n_measured {
                cell[k] = self.blend.blend_value(w, congested.value(k), free.value(k));
            }

            for (d, item) in self.plan.derived().iter().enumerate() {
                inputs.clear();
                let mut all_present = true;
                for &slot in self.plan.derived_deps(d) {
                    let value = cell[slot];
                    if GridData::<T>::is_missing_value(value) {
                        all_present = false;
                        break;
                    }
                    inputs.push(value);
                }
                cell[n_measured + d] =
                    if all_present { item.evaluate(&inputs) } else { GridData::<T>::missing() };
            }

            for (r, &slot) in self.plan.requested_slots().iter().enumerate() {
                out[r * n_times + j] = cell[slot];
            }
        }
        out
    }

    /// Record a completed batch and notify observers if progress advanced.
    fn report_batch(&self, columns: Range<usize>, n_times: usize) {
        let cells = (columns.end - columns.start) * n_times;
        if let Some(fraction) = self.aggregator.record(cells) {
            trace!("completed columns {}..{} ({:.1}%)", columns.start, columns.end, fraction * 100.0);
            self.observers.notify(&ProgressEvent::new(fraction, Some(columns)));
        }
    }
}
