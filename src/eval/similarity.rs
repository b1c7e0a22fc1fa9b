//! How similar the outputs of different matchers are.
//!
//! The similarity of two system alignments is their Jaccard index
//! `|A ∩ B| / |A ∪ B|` (0 when both are empty). Over several test cases the
//! matrix is either computed on the pooled alignments (micro) or averaged over
//! the test cases both matchers were run on (macro).

use super::confusion::AggregationMode;
use super::execution::ExecutionResult;
use concord_core::Alignment;
use std::collections::{BTreeMap, BTreeSet};

/// Jaccard similarity of two alignments.
#[must_use]
pub fn alignment_similarity(a: &Alignment, b: &Alignment) -> f64 {
    let union = a.union(b).len();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).len() as f64 / union as f64
}

/// Median of the values; 0.0 for an empty slice.
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Pairwise similarity matrix between matchers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatcherSimilarity {
    similarities: BTreeMap<(String, String), f64>,
}

impl MatcherSimilarity {
    /// Empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the similarity of an ordered matcher pair.
    pub fn add(&mut self, first: impl Into<String>, second: impl Into<String>, similarity: f64) {
        self.similarities.insert((first.into(), second.into()), similarity);
    }

    /// Similarity of a matcher pair, if recorded.
    #[must_use]
    pub fn get(&self, first: &str, second: &str) -> Option<f64> {
        self.similarities
            .get(&(first.to_string(), second.to_string()))
            .copied()
    }

    /// Recorded `(first, second, similarity)` triples in matcher-name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.similarities
            .iter()
            .map(|((a, b), v)| (a.as_str(), b.as_str(), *v))
    }

    /// Number of recorded pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.similarities.len()
    }

    /// Whether no pair is recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.similarities.is_empty()
    }

    /// Matcher names, sorted.
    #[must_use]
    pub fn matchers(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self
            .similarities
            .keys()
            .flat_map(|(a, b)| [a.as_str(), b.as_str()])
            .collect();
        names.into_iter().collect()
    }

    /// Median over all recorded pairs.
    #[must_use]
    pub fn median_similarity(&self) -> f64 {
        let values: Vec<f64> = self.similarities.values().copied().collect();
        median(&values)
    }

    /// Median over pairs of different matchers.
    #[must_use]
    pub fn median_similarity_without_self_similarity(&self) -> f64 {
        let values: Vec<f64> = self
            .similarities
            .iter()
            .filter(|((a, b), _)| a != b)
            .map(|(_, v)| *v)
            .collect();
        median(&values)
    }
}

/// Up to two decimals, trailing zeros dropped (`0.5`, `1`, `0.33`).
fn format_similarity(value: f64) -> String {
    let text = format!("{:.2}", value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

impl std::fmt::Display for MatcherSimilarity {
    /// Comma separated matrix with an `x` corner cell; missing pairs are empty.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let matchers = self.matchers();
        write!(f, "x")?;
        for m in &matchers {
            write!(f, ",{}", m)?;
        }
        writeln!(f)?;
        for outer in &matchers {
            write!(f, "{}", outer)?;
            for inner in &matchers {
                match self.get(outer, inner) {
                    Some(v) => write!(f, ",{}", format_similarity(v))?,
                    None => write!(f, ",")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Builds [`MatcherSimilarity`] matrices from execution results.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatcherSimilarityMetric;

impl MatcherSimilarityMetric {
    /// Create the metric.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Matrix over the results of a single test case, keyed by matcher name.
    #[must_use]
    pub fn compute_test_case(&self, results: &[ExecutionResult]) -> MatcherSimilarity {
        let mut out = MatcherSimilarity::new();
        for outer in results {
            for inner in results {
                out.add(
                    outer.matcher.clone(),
                    inner.matcher.clone(),
                    alignment_similarity(&outer.system, &inner.system),
                );
            }
        }
        out
    }

    /// Matrix over results from several test cases.
    #[must_use]
    pub fn compute(&self, mode: AggregationMode, results: &[ExecutionResult]) -> MatcherSimilarity {
        let table = ResultTable::new(results);
        match mode {
            AggregationMode::Macro => self.macro_average(&table),
            AggregationMode::Micro => self.micro_average(&table),
            AggregationMode::None => {
                log::warn!("Invalid aggregation mode NONE for matcher similarity; falling back to micro average");
                self.micro_average(&table)
            }
        }
    }

    fn micro_average(&self, table: &ResultTable<'_>) -> MatcherSimilarity {
        let mut out = MatcherSimilarity::new();
        for outer in &table.matchers {
            for inner in &table.matchers {
                let mut outer_pool = Alignment::new();
                let mut inner_pool = Alignment::new();
                let mut compared = false;
                for test_case in &table.test_cases {
                    if let Some((o, i)) = table.pair(test_case, outer, inner) {
                        outer_pool.add_all(&o.system);
                        inner_pool.add_all(&i.system);
                        compared = true;
                    }
                }
                if compared {
                    out.add(*outer, *inner, alignment_similarity(&outer_pool, &inner_pool));
                }
            }
        }
        out
    }

    fn macro_average(&self, table: &ResultTable<'_>) -> MatcherSimilarity {
        let mut out = MatcherSimilarity::new();
        for outer in &table.matchers {
            for inner in &table.matchers {
                let mut sum = 0.0;
                let mut count = 0usize;
                for test_case in &table.test_cases {
                    if let Some((o, i)) = table.pair(test_case, outer, inner) {
                        sum += alignment_similarity(&o.system, &i.system);
                        count += 1;
                    }
                }
                if count > 0 {
                    out.add(*outer, *inner, sum / count as f64);
                }
            }
        }
        out
    }
}

/// Results indexed by (test case, matcher).
struct ResultTable<'a> {
    matchers: BTreeSet<&'a str>,
    test_cases: BTreeSet<&'a str>,
    results: BTreeMap<(&'a str, &'a str), &'a ExecutionResult>,
}

impl<'a> ResultTable<'a> {
    fn new(results: &'a [ExecutionResult]) -> Self {
        let mut table = Self {
            matchers: BTreeSet::new(),
            test_cases: BTreeSet::new(),
            results: BTreeMap::new(),
        };
        for r in results {
            table.matchers.insert(r.matcher.as_str());
            table.test_cases.insert(r.test_case.as_str());
            table.results.insert((r.test_case.as_str(), r.matcher.as_str()), r);
        }
        table
    }

    /// Both results of a test case, or `None` (logged) when one is missing.
    fn pair(&self, test_case: &str, outer: &str, inner: &str) -> Option<(&'a ExecutionResult, &'a ExecutionResult)> {
        let o = self.results.get(&(test_case, outer)).copied();
        let i = self.results.get(&(test_case, inner)).copied();
        match (o, i) {
            (Some(o), Some(i)) => Some((o, i)),
            (None, None) => None,
            (Some(_), None) | (None, Some(_)) => {
                log::info!(
                    "Only one of {} and {} was run on test case {}; excluding it from the similarity calculation",
                    outer,
                    inner,
                    test_case
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_core::Correspondence;

    fn alignment(pairs: &[(&str, &str)]) -> Alignment {
        pairs.iter().map(|(s, t)| Correspondence::new(*s, *t)).collect()
    }

    fn run(matcher: &str, test_case: &str, pairs: &[(&str, &str)]) -> ExecutionResult {
        ExecutionResult::new(alignment(pairs), Alignment::new())
            .with_matcher(matcher)
            .with_test_case(test_case)
    }

    #[test]
    fn test_jaccard() {
        let a = alignment(&[("a", "x"), ("b", "y")]);
        let b = alignment(&[("a", "x"), ("c", "z")]);
        assert!((alignment_similarity(&a, &b) - 1.0 / 3.0).abs() < 1e-12);
        assert!((alignment_similarity(&a, &a) - 1.0).abs() < 1e-12);
        assert_eq!(alignment_similarity(&Alignment::new(), &Alignment::new()), 0.0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 2.0, 3.0]), 2.5);
    }

    #[test]
    fn test_single_test_case_matrix() {
        let results = vec![
            run("m1", "tc", &[("a", "x"), ("b", "y")]),
            run("m2", "tc", &[("a", "x"), ("c", "z")]),
        ];
        let sim = MatcherSimilarityMetric::new().compute_test_case(&results);
        assert_eq!(sim.len(), 4);
        assert_eq!(sim.get("m1", "m1"), Some(1.0));
        assert!((sim.get("m1", "m2").unwrap() - 1.0 / 3.0).abs() < 1e-12);
        assert!((sim.median_similarity_without_self_similarity() - 1.0 / 3.0).abs() < 1e-12);
        assert!((sim.median_similarity() - (1.0 / 3.0 + 1.0) / 2.0).abs() < 1e-12);

        let text = sim.to_string();
        assert_eq!(text, "x,m1,m2\nm1,1,0.33\nm2,0.33,1\n");
    }

    #[test]
    fn test_micro_vs_macro() {
        let results = vec![
            run("m1", "tc1", &[("a", "x")]),
            run("m2", "tc1", &[("a", "x")]),
            run("m1", "tc2", &[("b", "y"), ("c", "z"), ("d", "w")]),
            run("m2", "tc2", &[("e", "v")]),
        ];
        let metric = MatcherSimilarityMetric::new();

        let macro_ = metric.compute(AggregationMode::Macro, &results);
        assert!((macro_.get("m1", "m2").unwrap() - 0.5).abs() < 1e-12);

        let micro = metric.compute(AggregationMode::Micro, &results);
        assert!((micro.get("m1", "m2").unwrap() - 1.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_missing_test_case_is_skipped() {
        let results = vec![
            run("m1", "tc1", &[("a", "x")]),
            run("m2", "tc1", &[("a", "x")]),
            run("m1", "tc2", &[("b", "y")]),
        ];
        let macro_ = MatcherSimilarityMetric::new().compute(AggregationMode::Macro, &results);
        assert_eq!(macro_.get("m1", "m2"), Some(1.0));
        assert_eq!(macro_.get("m1", "m1"), Some(1.0));
    }

    #[test]
    fn test_format_similarity() {
        assert_eq!(format_similarity(0.0), "0");
        assert_eq!(format_similarity(1.0), "1");
        assert_eq!(format_similarity(0.5), "0.5");
        assert_eq!(format_similarity(0.256), "0.26");
    }
}
