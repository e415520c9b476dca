//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides the pure mathematical building blocks of the
//! filter:
//! - Kernel shapes for spatiotemporal distance-based weighting
//! - The bounded kernel with its speed-independent query rectangle
//!
//! These are reusable functions with no orchestration logic.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Anisotropic spatiotemporal weighting kernels.
pub mod kernel;
