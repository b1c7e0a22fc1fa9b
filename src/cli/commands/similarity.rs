//! Similarity command - Jaccard similarity between matchers

use clap::Parser;
use serde::Serialize;

use super::super::output::{log_info, to_json, write_output};
use super::super::parser::{AggregationArg, OutputFormat};
use super::super::utils::{load_alignment, log_verbose};

use crate::eval::{AggregationMode, ExecutionResult, MatcherSimilarityMetric};
use concord_core::Alignment;

/// Compare the alignments of several matchers
#[derive(Parser, Debug)]
pub struct SimilarityArgs {
    /// A matcher's alignment for one test case, as MATCHER:TESTCASE:PATH
    #[arg(long = "result", value_name = "MATCHER:TESTCASE:PATH", required = true)]
    pub results: Vec<String>,

    /// Aggregation over test cases
    #[arg(long, value_name = "MODE", default_value = "micro")]
    pub aggregation: AggregationArg,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Write output to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Show progress details
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Serialize)]
struct SimilarityEntry<'a> {
    first: &'a str,
    second: &'a str,
    similarity: f64,
}

#[derive(Debug, Serialize)]
struct SimilarityReport<'a> {
    pairs: Vec<SimilarityEntry<'a>>,
    median: f64,
    median_without_self: f64,
}

/// Run the similarity command
pub fn run(args: SimilarityArgs) -> Result<(), String> {
    let mut results = Vec::with_capacity(args.results.len());
    for spec in &args.results {
        let (matcher, test_case, path) = parse_result_arg(spec)?;
        log_verbose(&format!("Loading {} for {} on {}", path, matcher, test_case), args.verbose);
        results.push(
            ExecutionResult::new(load_alignment(path)?, Alignment::new())
                .with_matcher(matcher)
                .with_test_case(test_case),
        );
    }

    let mode = AggregationMode::from(args.aggregation);
    let similarity = MatcherSimilarityMetric::new().compute(mode, &results);

    let content = match args.format {
        OutputFormat::Json => to_json(&SimilarityReport {
            pairs: similarity
                .entries()
                .map(|(first, second, similarity)| SimilarityEntry {
                    first,
                    second,
                    similarity,
                })
                .collect(),
            median: similarity.median_similarity(),
            median_without_self: similarity.median_similarity_without_self_similarity(),
        })?,
        OutputFormat::Human | OutputFormat::Markdown => format!(
            "{}\nMedian similarity: {:.4}\nMedian similarity without self similarity: {:.4}\n",
            similarity,
            similarity.median_similarity(),
            similarity.median_similarity_without_self_similarity()
        ),
    };
    write_output(&content, args.output.as_deref())?;
    log_info(
        &format!("Compared {} matcher(s) ({:?} average)", similarity.matchers().len(), mode),
        args.quiet,
    );
    Ok(())
}

/// Split `MATCHER:TESTCASE:PATH`; the path may itself contain colons.
fn parse_result_arg(spec: &str) -> Result<(&str, &str, &str), String> {
    let mut parts = spec.splitn(3, ':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(m), Some(t), Some(p)) if !m.is_empty() && !t.is_empty() && !p.is_empty() => Ok((m, t, p)),
        _ => Err(format!("Expected MATCHER:TESTCASE:PATH, got `{}`", spec)),
    }
}
