//! The input of every metric: one matcher's output on one test case.

use crate::error::{Error, Result};
use concord_core::{Alignment, Ontology, TripleOntology};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Shared, thread-safe ontology handle.
pub type SharedOntology = Arc<dyn Ontology + Send + Sync>;

/// How complete the reference alignment of a test case is.
///
/// A complete gold standard lists every correct correspondence, so anything
/// else the system returns is wrong. A partial one only says something about
/// the entities it mentions; the source/target flags state whether, for a
/// mentioned entity, all of its correct partners are listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoldStandardCompleteness {
    /// Every correct correspondence is in the reference.
    #[default]
    Complete,
    /// Partial, complete on both sides.
    PartialSourceCompleteTargetComplete,
    /// Partial, complete on the source side only.
    PartialSourceCompleteTargetIncomplete,
    /// Partial, complete on the target side only.
    PartialSourceIncompleteTargetComplete,
    /// Partial, no completeness guarantee.
    PartialSourceIncompleteTargetIncomplete,
}

impl GoldStandardCompleteness {
    /// Partial gold standard with the given completeness flags.
    #[must_use]
    pub fn partial(source_complete: bool, target_complete: bool) -> Self {
        match (source_complete, target_complete) {
            (true, true) => Self::PartialSourceCompleteTargetComplete,
            (true, false) => Self::PartialSourceCompleteTargetIncomplete,
            (false, true) => Self::PartialSourceIncompleteTargetComplete,
            (false, false) => Self::PartialSourceIncompleteTargetIncomplete,
        }
    }

    /// Whether the reference is complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Whether each source entity in the reference has all its partners listed.
    #[must_use]
    pub fn is_source_complete(&self) -> bool {
        matches!(
            self,
            Self::Complete
                | Self::PartialSourceCompleteTargetComplete
                | Self::PartialSourceCompleteTargetIncomplete
        )
    }

    /// Whether each target entity in the reference has all its partners listed.
    #[must_use]
    pub fn is_target_complete(&self) -> bool {
        matches!(
            self,
            Self::Complete
                | Self::PartialSourceCompleteTargetComplete
                | Self::PartialSourceIncompleteTargetComplete
        )
    }
}

/// System and reference alignment of one matcher run, plus context.
///
/// # Example
///
/// ```rust
/// use concord::eval::ExecutionResult;
/// use concord_core::{Alignment, Correspondence};
///
/// let system: Alignment = vec![Correspondence::new("a", "x")].into();
/// let reference = system.clone();
/// let result = ExecutionResult::new(system, reference)
///     .with_matcher("string-equality")
///     .with_test_case("anatomy");
/// assert_eq!(result.matcher, "string-equality");
/// ```
#[derive(Clone)]
pub struct ExecutionResult {
    /// Matcher name.
    pub matcher: String,
    /// Test case name.
    pub test_case: String,
    /// Alignment produced by the matcher.
    pub system: Alignment,
    /// Gold standard.
    pub reference: Alignment,
    /// Completeness of the gold standard.
    pub completeness: GoldStandardCompleteness,
    /// Correspondences removed from the system alignment before evaluation.
    pub exclusion: Option<Alignment>,
    /// Names of the refiners applied so far, in order.
    pub refinements: Vec<String>,
    source_ontology: Option<SharedOntology>,
    target_ontology: Option<SharedOntology>,
}

impl ExecutionResult {
    /// Create a result over a complete gold standard.
    #[must_use]
    pub fn new(system: Alignment, reference: Alignment) -> Self {
        Self {
            matcher: String::new(),
            test_case: String::new(),
            system,
            reference,
            completeness: GoldStandardCompleteness::Complete,
            exclusion: None,
            refinements: Vec::new(),
            source_ontology: None,
            target_ontology: None,
        }
    }

    /// Load system and reference alignments from JSON files.
    ///
    /// Matcher and test case names are taken from the file stems.
    pub fn from_files(system: impl AsRef<Path>, reference: impl AsRef<Path>) -> Result<Self> {
        let (system, reference) = (system.as_ref(), reference.as_ref());
        for path in [system, reference] {
            if !path.is_file() {
                return Err(Error::invalid_input(format!("no alignment file at {}", path.display())));
            }
        }
        Ok(Self::new(Alignment::from_json_file(system)?, Alignment::from_json_file(reference)?)
            .with_matcher(file_stem(system))
            .with_test_case(file_stem(reference)))
    }

    /// Load and attach the source and target ontologies (N-Triples or Turtle).
    pub fn with_ontology_files(self, source: impl AsRef<Path>, target: impl AsRef<Path>) -> Result<Self> {
        let source = TripleOntology::from_file(source)?;
        let target = TripleOntology::from_file(target)?;
        Ok(self.with_ontologies(Arc::new(source), Arc::new(target)))
    }

    /// Set the matcher name.
    #[must_use]
    pub fn with_matcher(mut self, name: impl Into<String>) -> Self {
        self.matcher = name.into();
        self
    }

    /// Set the test case name.
    #[must_use]
    pub fn with_test_case(mut self, name: impl Into<String>) -> Self {
        self.test_case = name.into();
        self
    }

    /// Set the gold standard completeness.
    #[must_use]
    pub fn with_completeness(mut self, completeness: GoldStandardCompleteness) -> Self {
        self.completeness = completeness;
        self
    }

    /// Exclude these correspondences from the system alignment during evaluation.
    #[must_use]
    pub fn with_exclusion(mut self, exclusion: Alignment) -> Self {
        self.exclusion = Some(exclusion);
        self
    }

    /// Attach the source and target ontologies.
    #[must_use]
    pub fn with_ontologies(mut self, source: SharedOntology, target: SharedOntology) -> Self {
        self.source_ontology = Some(source);
        self.target_ontology = Some(target);
        self
    }

    /// Source ontology, if attached.
    #[must_use]
    pub fn source_ontology(&self) -> Option<&(dyn Ontology + Send + Sync)> {
        self.source_ontology.as_deref()
    }

    /// Target ontology, if attached.
    #[must_use]
    pub fn target_ontology(&self) -> Option<&(dyn Ontology + Send + Sync)> {
        self.target_ontology.as_deref()
    }

    /// Same context with new alignments, recording the refiner that produced them.
    #[must_use]
    pub fn refined(&self, refiner: impl Into<String>, system: Alignment, reference: Alignment) -> Self {
        let mut out = self.clone();
        out.system = system;
        out.reference = reference;
        out.refinements.push(refiner.into());
        out
    }

    /// System alignment minus the exclusion alignment (a copy).
    #[must_use]
    pub fn evaluated_system(&self) -> Alignment {
        match &self.exclusion {
            Some(excluded) if !excluded.is_empty() => self.system.subtract(excluded),
            _ => self.system.clone(),
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_default()
}

impl std::fmt::Debug for ExecutionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionResult")
            .field("matcher", &self.matcher)
            .field("test_case", &self.test_case)
            .field("system", &self.system.len())
            .field("reference", &self.reference.len())
            .field("completeness", &self.completeness)
            .field("refinements", &self.refinements)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_core::Correspondence;

    #[test]
    fn test_completeness_flags() {
        let c = GoldStandardCompleteness::Complete;
        assert!(c.is_complete() && c.is_source_complete() && c.is_target_complete());

        let p = GoldStandardCompleteness::partial(false, true);
        assert!(!p.is_complete());
        assert!(!p.is_source_complete());
        assert!(p.is_target_complete());
    }

    #[test]
    fn test_exclusion_is_applied_to_a_copy() {
        let system: Alignment = vec![Correspondence::new("a", "x"), Correspondence::new("b", "y")].into();
        let excluded: Alignment = vec![Correspondence::new("b", "y")].into();
        let result = ExecutionResult::new(system, Alignment::new()).with_exclusion(excluded);
        assert_eq!(result.evaluated_system().len(), 1);
        assert_eq!(result.system.len(), 2);
    }

    #[test]
    fn test_refined_keeps_context() {
        let result = ExecutionResult::new(Alignment::new(), Alignment::new())
            .with_matcher("m")
            .with_completeness(GoldStandardCompleteness::partial(true, true));
        let refined = result.refined("threshold", Alignment::new(), Alignment::new());
        assert_eq!(refined.matcher, "m");
        assert_eq!(refined.completeness, result.completeness);
        assert_eq!(refined.refinements, vec!["threshold".to_string()]);
    }

    #[test]
    fn test_from_files_names_after_stems() {
        let dir = tempfile::tempdir().unwrap();
        let system = dir.path().join("lily.json");
        let reference = dir.path().join("anatomy.json");
        std::fs::write(&system, r#"[{"source": "a", "target": "x"}]"#).unwrap();
        std::fs::write(&reference, "[]").unwrap();

        let result = ExecutionResult::from_files(&system, &reference).unwrap();
        assert_eq!(result.matcher, "lily");
        assert_eq!(result.test_case, "anatomy");
        assert_eq!(result.system.len(), 1);

        let missing = ExecutionResult::from_files(dir.path().join("nope.json"), &reference);
        assert!(matches!(missing, Err(Error::InvalidInput(_))));
    }
}
