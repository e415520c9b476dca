//! Derived quantities and dependency resolution.
//!
//! ## Purpose
//!
//! This module defines [`DerivedQuantity`], an output computed from other
//! filtered quantities instead of being measured directly (for instance
//! flow as density times speed), and the planning that expands a request
//! into measured quantities plus derived quantities in dependency order.
//!
//! ## Design notes
//!
//! * **Declared Dependencies**: each derived quantity names its inputs at
//!   registration; the plan expands the transitive closure so every input
//!   is computed even when not requested.
//! * **Fail-Fast Cycles**: dependency cycles are detected when the plan is
//!   built, before any computation starts.
//! * **Per-Cell Evaluation**: rules are pure functions of the blended
//!   dependency values at one grid cell; a missing dependency makes the
//!   derived value missing.
//!
//! ## Invariants
//!
//! * Derived quantities in a plan are topologically ordered; every
//!   dependency slot precedes its dependent.
//! * The blend reference quantity is always part of the measured set.
//!
//! ## Non-goals
//!
//! * This module does not evaluate rules over whole arrays; evaluation is
//!   cell-wise inside the engine loop.

// Feature-gated imports
#[cfg(not(feature = "std"))]
use alloc::boxed::Box;
#[cfg(not(feature = "std"))]
use alloc::string::ToString;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::boxed::Box;
#[cfg(feature = "std")]
use std::string::ToString;
#[cfg(feature = "std")]
use std::vec::Vec;

use core::fmt;

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::EgtfError;
use crate::primitives::quantity::Quantity;

// ============================================================================
// Derived Quantity
// ============================================================================

/// Rule computing a derived value from its dependency values at one cell.
pub type DerivedRule<T> = Box<dyn Fn(&[T]) -> T + Send + Sync>;

/// A quantity computed from other filtered quantities.
pub struct DerivedQuantity<T> {
    /// The quantity this rule produces.
    quantity: Quantity,

    /// Input quantities, in the order the rule receives them.
    dependencies: Vec<Quantity>,

    /// Pure per-cell rule over the dependency values.
    rule: DerivedRule<T>,
}

impl<T: Float> DerivedQuantity<T> {
    /// Define a derived quantity from its dependencies and rule.
    ///
    /// The rule receives the blended dependency values in declaration
    /// order and is only called when all of them are present.
    pub fn new(
        quantity: Quantity,
        dependencies: Vec<Quantity>,
        rule: impl Fn(&[T]) -> T + Send + Sync + 'static,
    ) -> Self {
        Self { quantity, dependencies, rule: Box::new(rule) }
    }

    /// Flow derived as density times speed.
    pub fn flow_from_density_and_speed() -> Self {
        Self::new(
            Quantity::flow(),
            vec![Quantity::density(), Quantity::speed()],
            |values| values[0] * values[1],
        )
    }

    /// The quantity this rule produces.
    pub fn quantity(&self) -> &Quantity {
        &self.quantity
    }

    /// Input quantities, in rule order.
    pub fn dependencies(&self) -> &[Quantity] {
        &self.dependencies
    }

    /// Apply the rule to the dependency values of one cell.
    pub fn evaluate(&self, inputs: &[T]) -> T {
        (self.rule)(inputs)
    }
}

impl<T> fmt::Debug for DerivedQuantity<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedQuantity")
            .field("quantity", &self.quantity)
            .field("dependencies", &self.dependencies)
            .finish()
    }
}

// ============================================================================
// Derived Set
// ============================================================================

/// All derived quantities registered with an engine.
#[derive(Debug)]
pub struct DerivedSet<T> {
    /// Registered derived quantities, in registration order.
    items: Vec<DerivedQuantity<T>>,
}

impl<T: Float> Default for DerivedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> DerivedSet<T> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Register a derived quantity.
    ///
    /// Fails when a derived quantity with the same name is already
    /// registered.
    pub fn register(&mut self, derived: DerivedQuantity<T>) -> Result<(), EgtfError> {
        if self.items.iter().any(|d| d.quantity == derived.quantity) {
            return Err(EgtfError::DuplicateQuantity {
                name: derived.quantity.name().to_string(),
            });
        }
        self.items.push(derived);
        Ok(())
    }

    /// Registered derived quantities.
    pub fn items(&self) -> &[DerivedQuantity<T>] {
        &self.items
    }

    /// Number of registered derived quantities.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no derived quantities are registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn find(&self, quantity: &Quantity) -> Option<usize> {
        self.items.iter().position(|d| &d.quantity == quantity)
    }

    /// Expand a request into an execution plan.
    ///
    /// The plan lists the measured quantities to estimate (including the
    /// blend reference and all transitive dependencies) and the derived
    /// quantities in dependency order. Fails fast on a dependency cycle
    /// or a derived blend reference.
    pub fn plan<'a>(
        &'a self,
        requested: &[Quantity],
        reference: &Quantity,
    ) -> Result<QuantityPlan<'a, T>, EgtfError> {
        if self.find(reference).is_some() {
            return Err(EgtfError::DerivedReference { name: reference.name().to_string() });
        }

        // Deduplicate the request, preserving first occurrence.
        let mut requested_unique: Vec<Quantity> = Vec::new();
        for quantity in requested {
            if !requested_unique.contains(quantity) {
                requested_unique.push(quantity.clone());
            }
        }

        // Transitive closure of needed derived quantities.
        let mut needed = vec![false; self.items.len()];
        let mut worklist: Vec<usize> =
            requested_unique.iter().filter_map(|q| self.find(q)).collect();
        while let Some(i) = worklist.pop() {
            if needed[i] {
                continue;
            }
            needed[i] = true;
            for dep in &self.items[i].dependencies {
                if let Some(j) = self.find(dep) {
                    worklist.push(j);
                }
            }
        }

        // Measured closure: requested measured quantities in request
        // order, then dependencies, then the reference.
        let mut measured: Vec<Quantity> = Vec::new();
        for quantity in &requested_unique {
            if self.find(quantity).is_none() && !measured.contains(quantity) {
                measured.push(quantity.clone());
            }
        }
        for (i, item) in self.items.iter().enumerate() {
            if !needed[i] {
                continue;
            }
            for dep in &item.dependencies {
                if self.find(dep).is_none() && !measured.contains(dep) {
                    measured.push(dep.clone());
                }
            }
        }
        if !measured.contains(reference) {
            measured.push(reference.clone());
        }

        // Topological order over the needed derived quantities (Kahn).
        let mut indegree = vec![0usize; self.items.len()];
        for (i, item) in self.items.iter().enumerate() {
            if !needed[i] {
                continue;
            }
            indegree[i] =
                item.dependencies.iter().filter(|dep| self.find(dep).is_some()).count();
        }
        let mut queue: Vec<usize> =
            (0..self.items.len()).filter(|&i| needed[i] && indegree[i] == 0).collect();
        let mut order: Vec<usize> = Vec::new();
        while let Some(i) = queue.pop() {
            order.push(i);
            for (j, item) in self.items.iter().enumerate() {
                if !needed[j] {
                    continue;
                }
                let occurrences =
                    item.dependencies.iter().filter(|dep| **dep == self.items[i].quantity).count();
                if occurrences > 0 {
                    indegree[j] -= occurrences;
                    if indegree[j] == 0 {
                        queue.push(j);
                    }
                }
            }
        }
        if order.len() != needed.iter().filter(|&&n| n).count() {
            let stuck = (0..self.items.len())
                .find(|&i| needed[i] && !order.contains(&i))
                .expect("a needed derived quantity remains outside the order");
            return Err(EgtfError::CyclicDependency {
                name: self.items[stuck].quantity.name().to_string(),
            });
        }

        // Resolve dependency and request slots against the final layout:
        // measured quantities first, derived quantities after, in order.
        let derived: Vec<&DerivedQuantity<T>> = order.iter().map(|&i| &self.items[i]).collect();
        let slot_of = |quantity: &Quantity| -> usize {
            if let Some(k) = measured.iter().position(|q| q == quantity) {
                k
            } else {
                let d = derived
                    .iter()
                    .position(|item| item.quantity() == quantity)
                    .expect("every planned quantity is measured or derived");
                measured.len() + d
            }
        };
        let derived_deps: Vec<Vec<usize>> = derived
            .iter()
            .map(|item| item.dependencies.iter().map(&slot_of).collect())
            .collect();
        let requested_slots: Vec<usize> = requested_unique.iter().map(&slot_of).collect();
        let reference_index =
            measured.iter().position(|q| q == reference).expect("reference is measured");

        Ok(QuantityPlan {
            measured,
            derived,
            derived_deps,
            requested: requested_unique,
            requested_slots,
            reference_index,
        })
    }
}

// ============================================================================
// Quantity Plan
// ============================================================================

/// Execution plan for one run: measured quantities to estimate and
/// derived quantities in dependency order.
///
/// Cell value buffers are laid out as the measured quantities followed by
/// the derived quantities, and all slot indices refer to that layout.
#[derive(Debug)]
pub struct QuantityPlan<'a, T> {
    /// Measured quantities to estimate, reference included.
    measured: Vec<Quantity>,

    /// Derived quantities in dependency order.
    derived: Vec<&'a DerivedQuantity<T>>,

    /// Dependency slots per derived quantity, aligned with `derived`.
    derived_deps: Vec<Vec<usize>>,

    /// Requested quantities, deduplicated, in request order.
    requested: Vec<Quantity>,

    /// Output slot per requested quantity.
    requested_slots: Vec<usize>,

    /// Index of the blend reference within `measured`.
    reference_index: usize,
}

impl<'a, T: Float> QuantityPlan<'a, T> {
    /// Measured quantities to estimate, reference included.
    pub fn measured(&self) -> &[Quantity] {
        &self.measured
    }

    /// Derived quantities in dependency order.
    pub fn derived(&self) -> &[&'a DerivedQuantity<T>] {
        &self.derived
    }

    /// Dependency slots for the derived quantity at `derived()` index `d`.
    pub fn derived_deps(&self, d: usize) -> &[usize] {
        &self.derived_deps[d]
    }

    /// Requested quantities, deduplicated, in request order.
    pub fn requested(&self) -> &[Quantity] {
        &self.requested
    }

    /// Output slot per requested quantity.
    pub fn requested_slots(&self) -> &[usize] {
        &self.requested_slots
    }

    /// Index of the blend reference within the measured quantities.
    pub fn reference_index(&self) -> usize {
        self.reference_index
    }

    /// Total number of value slots per cell.
    pub fn num_slots(&self) -> usize {
        self.measured.len() + self.derived.len()
    }
}
