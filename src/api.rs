//! High-level API for the grid filter.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point: a fluent
//! builder for configuring wave speeds and blend thresholds, and the
//! [`Egtf`] engine handle that owns observers, derived-quantity
//! registrations, and the cancellation flag across runs.
//!
//! ## Design notes
//!
//! * **Ergonomic**: fluent builder with literature defaults for every
//!   parameter.
//! * **Validated**: parameters are validated when `build()` is called,
//!   including detection of parameters set multiple times.
//! * **Reusable**: one engine may run many times over different grids,
//!   kernels, and indices; the index and kernel are supplied per run.
//!
//! ## Key concepts
//!
//! * **Configuration Flow**: `EgtfBuilder::new()` → chained setters →
//!   `build()` → [`Egtf::run`].
//! * **Defaults**: wave speeds and thresholds default to the published
//!   values c_cong = −18 km/h, c_free = 80 km/h, Δv = 10 km/h and
//!   v_crit = 80 km/h, stored in \[m/s\].
//!
//! ## Non-goals
//!
//! * This module does not construct grids, kernels, or indices; those are
//!   inputs built from the lower layers.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::engine::executor::{FilterConfig, FilterExecutor};
use crate::engine::validator::Validator;
use crate::evaluation::derived::{DerivedQuantity, DerivedSet};
use crate::math::kernel::Kernel;
use crate::primitives::errors::EgtfError;
use crate::primitives::grid::Grid;
use crate::primitives::points::DataPointIndex;
use crate::primitives::progress::{CancellationToken, ObserverSet, ProgressObserver};
use crate::primitives::quantity::Quantity;

// Publicly re-exported types
pub use crate::engine::output::{FilterOutcome, FilterResult};

// ============================================================================
// Defaults
// ============================================================================

/// Default shock wave speed in congestion, −18 km/h in \[m/s\].
pub const DEFAULT_CONGESTED_WAVE_SPEED: f64 = -18.0 / 3.6;

/// Default wave speed in free flow, 80 km/h in \[m/s\].
pub const DEFAULT_FREE_FLOW_WAVE_SPEED: f64 = 80.0 / 3.6;

/// Default congestion transition width, 10 km/h in \[m/s\].
pub const DEFAULT_SPEED_RANGE: f64 = 10.0 / 3.6;

/// Default flip-over speed, 80 km/h in \[m/s\].
pub const DEFAULT_CRITICAL_SPEED: f64 = 80.0 / 3.6;

/// Default number of grid columns per progress batch.
pub const DEFAULT_BATCH_SIZE: usize = 1;

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for configuring the grid filter engine.
#[derive(Debug, Clone)]
pub struct EgtfBuilder<T> {
    /// Shock wave speed in congestion in \[m/s\].
    congested_wave_speed: Option<T>,

    /// Wave speed in free flow in \[m/s\].
    free_flow_wave_speed: Option<T>,

    /// Flip-over speed in \[m/s\].
    critical_speed: Option<T>,

    /// Congestion transition width in \[m/s\].
    speed_range: Option<T>,

    /// Quantity driving the congestion blend.
    reference_quantity: Option<Quantity>,

    /// Grid columns per progress batch.
    batch_size: Option<usize>,

    /// Whether to fan out across a worker pool.
    parallel: Option<bool>,

    /// Tracks if any parameter was set multiple times (for validation).
    duplicate_param: Option<&'static str>,
}

impl<T: Float> Default for EgtfBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> EgtfBuilder<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            congested_wave_speed: None,
            free_flow_wave_speed: None,
            critical_speed: None,
            speed_range: None,
            reference_quantity: None,
            batch_size: None,
            parallel: None,
            duplicate_param: None,
        }
    }

    /// Set the shock wave speed in congestion in \[m/s\].
    pub fn congested_wave_speed(mut self, speed: T) -> Self {
        if self.congested_wave_speed.is_some() {
            self.duplicate_param = Some("congested_wave_speed");
        }
        self.congested_wave_speed = Some(speed);
        self
    }

    /// Set the wave speed in free flow in \[m/s\].
    pub fn free_flow_wave_speed(mut self, speed: T) -> Self {
        if self.free_flow_wave_speed.is_some() {
            self.duplicate_param = Some("free_flow_wave_speed");
        }
        self.free_flow_wave_speed = Some(speed);
        self
    }

    /// Set the flip-over speed below which traffic is congested in
    /// \[m/s\].
    pub fn critical_speed(mut self, speed: T) -> Self {
        if self.critical_speed.is_some() {
            self.duplicate_param = Some("critical_speed");
        }
        self.critical_speed = Some(speed);
        self
    }

    /// Set the congestion transition width in \[m/s\].
    pub fn speed_range(mut self, range: T) -> Self {
        if self.speed_range.is_some() {
            self.duplicate_param = Some("speed_range");
        }
        self.speed_range = Some(range);
        self
    }

    /// Set the quantity driving the congestion blend (default: speed).
    pub fn reference_quantity(mut self, quantity: Quantity) -> Self {
        if self.reference_quantity.is_some() {
            self.duplicate_param = Some("reference_quantity");
        }
        self.reference_quantity = Some(quantity);
        self
    }

    /// Set the number of grid columns per progress batch.
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        if self.batch_size.is_some() {
            self.duplicate_param = Some("batch_size");
        }
        self.batch_size = Some(batch_size);
        self
    }

    /// Enable or disable worker-pool execution (requires the `parallel`
    /// feature; ignored without it).
    pub fn parallel(mut self, parallel: bool) -> Self {
        if self.parallel.is_some() {
            self.duplicate_param = Some("parallel");
        }
        self.parallel = Some(parallel);
        self
    }

    /// Validate the configuration and build the engine.
    pub fn build(self) -> Result<Egtf<T>, EgtfError> {
        Validator::validate_no_duplicates(self.duplicate_param)?;
        let config = FilterConfig {
            congested_wave_speed: self
                .congested_wave_speed
                .unwrap_or_else(|| T::from(DEFAULT_CONGESTED_WAVE_SPEED).unwrap()),
            free_flow_wave_speed: self
                .free_flow_wave_speed
                .unwrap_or_else(|| T::from(DEFAULT_FREE_FLOW_WAVE_SPEED).unwrap()),
            critical_speed: self
                .critical_speed
                .unwrap_or_else(|| T::from(DEFAULT_CRITICAL_SPEED).unwrap()),
            speed_range: self
                .speed_range
                .unwrap_or_else(|| T::from(DEFAULT_SPEED_RANGE).unwrap()),
            reference_quantity: self.reference_quantity.unwrap_or_else(Quantity::speed),
            batch_size: self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            parallel: self.parallel.unwrap_or(false),
        };
        config.validate()?;
        Ok(Egtf {
            config,
            derived: DerivedSet::new(),
            observers: ObserverSet::new(),
            cancel: CancellationToken::new(),
        })
    }
}

// ============================================================================
// Engine Handle
// ============================================================================

/// The grid filter engine.
///
/// Owns the numerical configuration, progress observers, derived-quantity
/// registrations, and the cancellation flag. One engine may be run any
/// number of times; each run takes the grid, the data-point index, the
/// kernel, and the requested quantities.
#[derive(Debug)]
pub struct Egtf<T> {
    /// Validated numerical configuration.
    config: FilterConfig<T>,

    /// Registered derived quantities.
    derived: DerivedSet<T>,

    /// Registered progress observers.
    observers: ObserverSet,

    /// Cancellation flag shared with workers and callers.
    cancel: CancellationToken,
}

impl<T: Float + Send + Sync> Egtf<T> {
    /// Start configuring an engine.
    pub fn builder() -> EgtfBuilder<T> {
        EgtfBuilder::new()
    }

    /// An engine with the literature defaults.
    pub fn with_defaults() -> Self {
        EgtfBuilder::new().build().expect("default configuration is valid")
    }

    /// The engine configuration.
    pub fn config(&self) -> &FilterConfig<T> {
        &self.config
    }

    /// Register a derived quantity, available for every later run.
    pub fn register_derived(&mut self, derived: DerivedQuantity<T>) -> Result<(), EgtfError> {
        self.derived.register(derived)
    }

    /// Register a progress observer, notified on every later run.
    pub fn add_observer<O: ProgressObserver + 'static>(&mut self, observer: O) {
        self.observers.register(observer);
    }

    /// Token for cancelling a running filter from another thread.
    ///
    /// Cancellation persists across runs until [`CancellationToken::reset`]
    /// is called.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Request cancellation of the current (or next) run.
    pub fn interrupt(&self) {
        self.cancel.cancel();
    }

    /// Filter the requested quantities over the grid.
    ///
    /// Configuration and derived-dependency errors are raised before any
    /// computation. An empty index yields an all-missing result; a
    /// cancelled run yields [`FilterOutcome::Cancelled`].
    pub fn run(
        &self,
        grid: &Grid<T>,
        index: &DataPointIndex<T>,
        kernel: &Kernel<T>,
        quantities: &[Quantity],
    ) -> Result<FilterOutcome<T>, EgtfError> {
        let plan = self.derived.plan(quantities, &self.config.reference_quantity)?;
        let executor = FilterExecutor::new(
            &self.config,
            grid,
            index,
            kernel,
            &plan,
            &self.observers,
            &self.cancel,
        )?;
        Ok(executor.execute())
    }
}
