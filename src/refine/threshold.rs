//! Drop low-confidence system correspondences.

use super::Refiner;
use crate::eval::ExecutionResult;

/// Keeps system correspondences with confidence `>= threshold`. The
/// reference is left untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRefiner {
    threshold: f64,
}

impl ThresholdRefiner {
    /// Refiner cutting at `threshold`.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// The cut-off.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl Refiner for ThresholdRefiner {
    fn name(&self) -> String {
        format!("threshold({})", self.threshold)
    }

    fn refine(&self, result: &ExecutionResult) -> ExecutionResult {
        result.refined(self.name(), result.system.cut(self.threshold), result.reference.clone())
    }
}
