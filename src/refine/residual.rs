//! Residual evaluation: how a matcher does on what a trivial baseline misses.
//!
//! Given a baseline run (typically exact label matching) on the same test
//! case, the reference loses every correspondence the baseline found, and
//! the system loses the baseline's *correct* correspondences. Precision and
//! recall then describe the non-trivial part of the task.

use super::Refiner;
use crate::eval::ExecutionResult;
use concord_core::Alignment;

/// Removes the baseline's findings from system and reference.
#[derive(Debug, Clone)]
pub struct ResidualRefiner {
    baseline: Alignment,
    baseline_name: String,
}

impl ResidualRefiner {
    /// Refiner against the system alignment of a baseline run.
    #[must_use]
    pub fn new(baseline: &ExecutionResult) -> Self {
        Self {
            baseline: baseline.system.clone(),
            baseline_name: baseline.matcher.clone(),
        }
    }

    /// Refiner against a bare baseline alignment.
    #[must_use]
    pub fn from_alignment(baseline: Alignment) -> Self {
        Self {
            baseline,
            baseline_name: String::new(),
        }
    }
}

impl Refiner for ResidualRefiner {
    fn name(&self) -> String {
        if self.baseline_name.is_empty() {
            "residual".to_string()
        } else {
            format!("residual({})", self.baseline_name)
        }
    }

    fn refine(&self, result: &ExecutionResult) -> ExecutionResult {
        let reference = result.reference.subtract(&self.baseline);
        let trivially_correct = self.baseline.intersection(&result.reference);
        let system = result.system.subtract(&trivially_correct);
        result.refined(self.name(), system, reference)
    }
}
