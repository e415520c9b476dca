//! Layer 4: Evaluation
//!
//! # Purpose
//!
//! This layer resolves outputs that are computed from other filtered
//! quantities rather than measured directly:
//! - Derived quantities, their dependency closure, and their evaluation
//!   order
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Derived quantities and dependency resolution.
pub mod derived;
