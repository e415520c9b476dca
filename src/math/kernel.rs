//! Anisotropic spatiotemporal weighting kernels.
//!
//! ## Purpose
//!
//! This module defines [`KernelShape`], the strategy computing a
//! measurement weight from a spatial offset, a temporal offset, and an
//! assumed propagation speed, and [`Kernel`], which bounds a shape to a
//! compact spatiotemporal support so the data-point query can be pruned.
//!
//! ## Design notes
//!
//! * **Moving Frame**: the shipped shapes decay with `|dx|` and with the
//!   temporal offset measured in a frame moving at the assumed propagation
//!   speed, `|dt - dx/c|`, which orients the kernel along traffic waves.
//! * **Speed-Independent Support**: the bounding rectangle depends only on
//!   `x_max` and `t_max`, never on the assumed speed, so one range query
//!   serves both regimes.
//! * **Pluggable Shapes**: the exact decay is a strategy; exponential
//!   (default), Gaussian, and uniform shapes are provided and any
//!   [`KernelShape`] implementation may be supplied.
//!
//! ## Invariants
//!
//! * Weights are non-negative and zero outside `|dx| <= x_max`,
//!   `|dt| <= t_max` (bounds inclusive).
//! * `weight(c, 0, 0)` is a global maximum of every shipped shape.
//!
//! ## Non-goals
//!
//! * This module does not select candidate data points (see
//!   `primitives::points`).
//! * This module does not calibrate `sigma`/`tau` from data; they are
//!   configuration.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::boxed::Box;
#[cfg(feature = "std")]
use std::boxed::Box;

use core::fmt::Debug;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::EgtfError;

// ============================================================================
// Kernel Shape
// ============================================================================

/// Strategy computing a measurement weight for one offset.
///
/// `dx` is the signed spatial offset (estimation location minus data
/// location) in \[m\], `dt` the signed temporal offset in \[s\], and
/// `propagation_speed` the assumed wave speed in \[m/s\]. Implementations
/// must be pure and return non-negative weights with a maximum at zero
/// offsets.
pub trait KernelShape<T: Float>: Debug + Send + Sync {
    /// Weight for the given propagation speed and offsets.
    fn weight(&self, propagation_speed: T, dx: T, dt: T) -> T;
}

/// Temporal offset in the frame moving at the propagation speed.
///
/// For `c = 0` only `dx = 0` keeps a finite frame offset; any other `dx`
/// maps to an infinite offset and thus zero weight in the decaying shapes.
#[inline]
fn moving_frame_offset<T: Float>(propagation_speed: T, dx: T, dt: T) -> T {
    if dx == T::zero() {
        dt
    } else {
        dt - dx / propagation_speed
    }
}

/// Exponential kernel shape, the default.
///
/// `weight = exp(-|dx|/sigma - |dt - dx/c|/tau)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpKernelShape<T> {
    /// Spatial decay scale in \[m\].
    sigma: T,

    /// Temporal decay scale in \[s\].
    tau: T,
}

impl<T: Float> ExpKernelShape<T> {
    /// Create an exponential shape with the given decay scales.
    pub fn new(sigma: T, tau: T) -> Result<Self, EgtfError> {
        validate_scale("sigma", sigma)?;
        validate_scale("tau", tau)?;
        Ok(Self { sigma, tau })
    }

    /// Spatial decay scale in \[m\].
    pub fn sigma(&self) -> T {
        self.sigma
    }

    /// Temporal decay scale in \[s\].
    pub fn tau(&self) -> T {
        self.tau
    }
}

impl<T: Float + Debug + Send + Sync> KernelShape<T> for ExpKernelShape<T> {
    fn weight(&self, propagation_speed: T, dx: T, dt: T) -> T {
        let shifted = moving_frame_offset(propagation_speed, dx, dt);
        (-(dx.abs() / self.sigma) - shifted.abs() / self.tau).exp()
    }
}

/// Gaussian kernel shape.
///
/// `weight = exp(-dx^2/(2 sigma^2) - (dt - dx/c)^2/(2 tau^2))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussKernelShape<T> {
    /// Spatial decay scale in \[m\].
    sigma: T,

    /// Temporal decay scale in \[s\].
    tau: T,
}

impl<T: Float> GaussKernelShape<T> {
    /// Create a Gaussian shape with the given decay scales.
    pub fn new(sigma: T, tau: T) -> Result<Self, EgtfError> {
        validate_scale("sigma", sigma)?;
        validate_scale("tau", tau)?;
        Ok(Self { sigma, tau })
    }

    /// Spatial decay scale in \[m\].
    pub fn sigma(&self) -> T {
        self.sigma
    }

    /// Temporal decay scale in \[s\].
    pub fn tau(&self) -> T {
        self.tau
    }
}

impl<T: Float + Debug + Send + Sync> KernelShape<T> for GaussKernelShape<T> {
    fn weight(&self, propagation_speed: T, dx: T, dt: T) -> T {
        let two = T::from(2.0).unwrap();
        let shifted = moving_frame_offset(propagation_speed, dx, dt);
        let sx = dx / self.sigma;
        let st = shifted / self.tau;
        (-(sx * sx) / two - (st * st) / two).exp()
    }
}

/// Uniform kernel shape: weight one everywhere inside the kernel support.
///
/// Mostly useful for testing and for pure box averaging; the support is
/// enforced by the enclosing [`Kernel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniformKernelShape;

impl<T: Float> KernelShape<T> for UniformKernelShape {
    fn weight(&self, _propagation_speed: T, _dx: T, _dt: T) -> T {
        T::one()
    }
}

fn validate_scale<T: Float>(name: &'static str, value: T) -> Result<(), EgtfError> {
    if value.is_nan() || value <= T::zero() {
        return Err(EgtfError::InvalidKernelRange {
            name,
            value: value.to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(())
}

// ============================================================================
// Kernel
// ============================================================================

/// Default spatial decay scale in \[m\].
pub const DEFAULT_SIGMA: f64 = 300.0;

/// Default temporal decay scale in \[s\].
pub const DEFAULT_TAU: f64 = 30.0;

/// A kernel shape bounded to a compact spatiotemporal support.
///
/// The support bounds `x_max`/`t_max` must be positive; positive infinity
/// is allowed and disables pruning on that axis. The weight is clamped to
/// zero outside the support regardless of the shape.
#[derive(Debug)]
pub struct Kernel<T: Float> {
    /// Maximum spatial influence radius in \[m\].
    x_max: T,

    /// Maximum temporal influence radius in \[s\].
    t_max: T,

    /// Weighting shape inside the support.
    shape: Box<dyn KernelShape<T>>,
}

impl<T: Float> Kernel<T> {
    /// Create a kernel from support bounds and a shape.
    pub fn new(x_max: T, t_max: T, shape: Box<dyn KernelShape<T>>) -> Result<Self, EgtfError>
    where
        T: 'static,
    {
        validate_scale("x_max", x_max)?;
        validate_scale("t_max", t_max)?;
        Ok(Self { x_max, t_max, shape })
    }

    /// Exponential kernel with the given decay scales and support bounds.
    pub fn exponential(sigma: T, tau: T, x_max: T, t_max: T) -> Result<Self, EgtfError>
    where
        T: Debug + Send + Sync + 'static,
    {
        Self::new(x_max, t_max, Box::new(ExpKernelShape::new(sigma, tau)?))
    }

    /// Gaussian kernel with the given decay scales and support bounds.
    pub fn gaussian(sigma: T, tau: T, x_max: T, t_max: T) -> Result<Self, EgtfError>
    where
        T: Debug + Send + Sync + 'static,
    {
        Self::new(x_max, t_max, Box::new(GaussKernelShape::new(sigma, tau)?))
    }

    /// Uniform kernel with the given support bounds.
    pub fn uniform(x_max: T, t_max: T) -> Result<Self, EgtfError>
    where
        T: 'static,
    {
        Self::new(x_max, t_max, Box::new(UniformKernelShape))
    }

    /// Default kernel: exponential shape with `sigma` = 300 m, `tau` =
    /// 30 s, and unbounded support.
    pub fn with_defaults() -> Self
    where
        T: Debug + Send + Sync + 'static,
    {
        Self {
            x_max: T::infinity(),
            t_max: T::infinity(),
            shape: Box::new(ExpKernelShape {
                sigma: T::from(DEFAULT_SIGMA).unwrap(),
                tau: T::from(DEFAULT_TAU).unwrap(),
            }),
        }
    }

    /// Maximum spatial influence radius in \[m\].
    pub fn x_max(&self) -> T {
        self.x_max
    }

    /// Maximum temporal influence radius in \[s\].
    pub fn t_max(&self) -> T {
        self.t_max
    }

    /// Lower location bound of the query rectangle for an estimation point.
    pub fn from_location(&self, location: T) -> T {
        location - self.x_max
    }

    /// Upper location bound of the query rectangle for an estimation point.
    pub fn to_location(&self, location: T) -> T {
        location + self.x_max
    }

    /// Lower time bound of the query rectangle for an estimation point.
    pub fn from_time(&self, time: T) -> T {
        time - self.t_max
    }

    /// Upper time bound of the query rectangle for an estimation point.
    pub fn to_time(&self, time: T) -> T {
        time + self.t_max
    }

    /// Weight for the given propagation speed and offsets, zero outside
    /// the support.
    pub fn weight(&self, propagation_speed: T, dx: T, dt: T) -> T {
        if dx.abs() > self.x_max || dt.abs() > self.t_max {
            return T::zero();
        }
        self.shape.weight(propagation_speed, dx, dt)
    }
}
