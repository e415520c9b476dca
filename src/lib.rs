//! # EGTF: Extended Generalized Treiber-Helbing Filter for Rust
//!
//! A fast, deterministic implementation of the Extended Generalized
//! Treiber-Helbing Filter (van Lint and Hoogendoorn, 2009), an extension
//! of the Adaptive Smoothing Method (Treiber and Helbing, 2002), for
//! reconstructing dense traffic state estimates over a space-time grid
//! from sparse, noisy point measurements.
//!
//! ## What is the EGTF?
//!
//! Traffic sensors deliver sparse, heterogeneous samples: loop detectors
//! measure at fixed locations, probe vehicles along trajectories. The
//! EGTF reconstructs a smooth field of any measured quantity (speed,
//! flow, density, ...) on a regular grid by averaging nearby samples with
//! an anisotropic kernel oriented along traffic waves.
//!
//! Perturbations propagate downstream with the traffic in free flow and
//! upstream against it in congestion, at characteristic wave speeds. The
//! filter therefore estimates every grid point twice, once per assumed
//! propagation speed, and blends the two estimates with a smooth
//! congestion-dependent weight derived from the local speed level.
//!
//! **Key properties:**
//! - Deterministic: repeated runs produce bit-identical results, with or
//!   without the worker pool
//! - Explicit missing values: cells outside all kernel supports carry a
//!   marker, never a fabricated number
//! - Embarrassingly parallel: grid cells are independent and fan out
//!   across a rayon worker pool under the `parallel` feature
//! - `no_std`-compatible core (with `alloc`)
//!
//! ## Quick Start
//!
//! ```rust
//! use egtf_rs::prelude::*;
//!
//! // Measurements: speed samples along a corridor, in SI units.
//! let speed = Quantity::speed();
//! let mut index = DataPointIndex::new();
//! index.insert_point(&speed, 1200.0, 30.0, 31.5)?;
//! index.insert_point(&speed, 1800.0, 60.0, 12.0)?;
//! index.insert_point(&speed, 2400.0, 90.0, 8.4)?;
//!
//! // Output grid and kernel.
//! let grid = Grid::new(
//!     (0..=30).map(|i| i as f64 * 100.0).collect(),
//!     (0..=24).map(|j| j as f64 * 5.0).collect(),
//! )?;
//! let kernel = Kernel::exponential(300.0, 30.0, 1500.0, 150.0)?;
//!
//! // Build the engine and filter.
//! let egtf = Egtf::builder().build()?;
//! let outcome = egtf.run(&grid, &index, &kernel, &[speed.clone()])?;
//!
//! let result = outcome.into_result().expect("not cancelled");
//! let values = result.values(&speed)?;
//! println!("cell (12, 6) = {}", values.get(12, 6));
//! # Result::<(), EgtfError>::Ok(())
//! ```
//!
//! ## Derived quantities
//!
//! Quantities can be computed from other filtered quantities instead of
//! being measured, resolved per grid cell after blending:
//!
//! ```rust
//! use egtf_rs::prelude::*;
//!
//! let mut egtf: Egtf<f64> = Egtf::builder().build()?;
//! egtf.register_derived(DerivedQuantity::flow_from_density_and_speed())?;
//! # Result::<(), EgtfError>::Ok(())
//! ```
//!
//! ## Progress and cancellation
//!
//! Long runs report a monotonically non-decreasing completion fraction to
//! any number of observers, and can be cancelled cooperatively between
//! batches:
//!
//! ```rust
//! use egtf_rs::prelude::*;
//!
//! let mut egtf: Egtf<f64> = Egtf::builder().batch_size(4).build()?;
//! egtf.add_observer(|event: &ProgressEvent| {
//!     let _ = event.fraction();
//! });
//! let token = egtf.cancellation_token();
//! // token.cancel() from any thread aborts the run between batches.
//! # let _ = token;
//! # Result::<(), EgtfError>::Ok(())
//! ```
//!
//! ## Configuration
//!
//! All traffic-flow parameters are configurable and default to the
//! published values:
//!
//! | Parameter | Default | Meaning |
//! |-----------|---------|---------|
//! | `congested_wave_speed` | −18 km/h | shock wave speed in congestion |
//! | `free_flow_wave_speed` | 80 km/h | wave speed in free flow |
//! | `critical_speed` | 80 km/h | flip-over speed of the blend |
//! | `speed_range` | 10 km/h | width of the blend transition |
//!
//! Kernel shapes are pluggable through [`math::kernel::KernelShape`];
//! exponential (default, `sigma` = 300 m, `tau` = 30 s), Gaussian, and
//! uniform shapes ship with the crate.
//!
//! ## References
//!
//! - van Lint, J. W. C. and Hoogendoorn, S. P. (2009). "A robust and
//!   efficient method for fusing heterogeneous data from traffic sensors
//!   on freeways." Computer Aided Civil and Infrastructure Engineering.
//! - Treiber, M. and Helbing, D. (2002). "Reconstructing the
//!   spatio-temporal traffic dynamics from stationary detector data."
//!   Cooper@tive Tr@nsport@tion Dyn@mics, 1:3.1-3.24.
//! - Schreiter, T., van Lint, J. W. C., Treiber, M. and Hoogendoorn,
//!   S. P. (2010). "Two fast implementations of the Adaptive Smoothing
//!   Method used in highway traffic state estimation." 13th International
//!   IEEE Conference on Intelligent Transportation Systems.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]

#[cfg(not(feature = "std"))]
#[macro_use]
extern crate alloc;

// ============================================================================
// Internal Modules
// ============================================================================

// Layer 1: Primitives - data structures and basic utilities.
//
// Contains errors, quantities and converters, the ordered data-point
// store, grid axes and arrays, and progress/cancellation primitives.
pub mod primitives;

// Layer 2: Math - pure mathematical functions.
//
// Contains the kernel shapes and the bounded spatiotemporal kernel.
pub mod math;

// Layer 3: Algorithms - the numerical core.
//
// Contains regime estimation (weighted local averages) and the
// congestion blend.
pub mod algorithms;

// Layer 4: Evaluation - post-processing.
//
// Contains derived quantities and their dependency resolution.
pub mod evaluation;

// Layer 5: Engine - orchestration and execution control.
//
// Contains configuration validation, the grid loop, and result assembly.
pub mod engine;

// High-level fluent API for the filter.
//
// Provides the `Egtf` builder and engine handle.
pub mod api;

// ============================================================================
// Prelude
// ============================================================================

/// Standard filter prelude.
///
/// This module is intended to be wildcard-imported for convenient access
/// to the most commonly used types:
///
/// ```
/// use egtf_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{Egtf, EgtfBuilder, FilterOutcome, FilterResult};
    pub use crate::evaluation::derived::DerivedQuantity;
    pub use crate::math::kernel::{
        ExpKernelShape, GaussKernelShape, Kernel, KernelShape, UniformKernelShape,
    };
    pub use crate::primitives::errors::EgtfError;
    pub use crate::primitives::grid::{Grid, GridData};
    pub use crate::primitives::points::{DataPoint, DataPointIndex};
    pub use crate::primitives::progress::{
        CancellationToken, ProgressEvent, ProgressObserver,
    };
    pub use crate::primitives::quantity::{Converter, FnConverter, IdentityConverter, Quantity};
}
