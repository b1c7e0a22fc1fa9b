//! Transformations applied to an [`ExecutionResult`] before measuring it.
//!
//! A refiner returns a new result with rewritten system and/or reference
//! alignments and appends its name to [`ExecutionResult::refinements`].
//! Refiners chain:
//!
//! ```rust
//! use concord::eval::ExecutionResult;
//! use concord::refine::{Refiner, ThresholdRefiner};
//! use concord_core::{Alignment, Correspondence};
//!
//! let system: Alignment = vec![
//!     Correspondence::new("a", "x").with_confidence(0.9),
//!     Correspondence::new("b", "y").with_confidence(0.2),
//! ].into();
//! let result = ExecutionResult::new(system, Alignment::new());
//!
//! let refined = ThresholdRefiner::new(0.5).refine(&result);
//! assert_eq!(refined.system.len(), 1);
//! assert_eq!(refined.refinements, vec!["threshold(0.5)".to_string()]);
//! ```

use crate::eval::ExecutionResult;

pub mod closure;
pub mod residual;
pub mod threshold;

pub use closure::{refine_alignment, ClosureRefiner};
pub use residual::ResidualRefiner;
pub use threshold::ThresholdRefiner;

/// Rewrites the alignments of an execution result.
pub trait Refiner {
    /// Name recorded in [`ExecutionResult::refinements`].
    fn name(&self) -> String;

    /// Produce the refined result. The input is not modified.
    fn refine(&self, result: &ExecutionResult) -> ExecutionResult;
}

/// Apply refiners left to right.
#[must_use]
pub fn refine_all(result: &ExecutionResult, refiners: &[&dyn Refiner]) -> ExecutionResult {
    refiners
        .iter()
        .fold(result.clone(), |current, refiner| refiner.refine(&current))
}
