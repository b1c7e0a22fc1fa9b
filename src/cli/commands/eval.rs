//! Eval command - confusion matrix of system alignments against references

use clap::Parser;
use serde::Serialize;

use super::super::output::{color, log_info, percent, to_json, write_output};
use super::super::parser::{AggregationArg, OutputFormat};
use super::super::utils::{load_alignment, load_config, log_verbose};

use crate::eval::{
    AggregationMode, ConfusionMatrix, ConfusionMatrixMetric, ExecutionResult, GoldStandardCompleteness,
};
use crate::refine::{Refiner, ThresholdRefiner};

/// Compute precision, recall and F-measure
#[derive(Parser, Debug)]
pub struct EvalArgs {
    /// System alignment JSON (repeat for several test cases)
    #[arg(short, long = "system", value_name = "PATH", required = true)]
    pub systems: Vec<String>,

    /// Reference alignment JSON, paired with --system by position
    #[arg(short, long = "reference", value_name = "PATH", required = true)]
    pub references: Vec<String>,

    /// Correspondences to drop from every system alignment before evaluating
    #[arg(long, value_name = "PATH")]
    pub exclude: Option<String>,

    /// The references are partial gold standards
    #[arg(long)]
    pub partial: bool,

    /// Partial references list every partner of each source entity
    #[arg(long)]
    pub source_complete: bool,

    /// Partial references list every partner of each target entity
    #[arg(long)]
    pub target_complete: bool,

    /// Aggregation over several pairs
    #[arg(long, value_name = "MODE")]
    pub aggregation: Option<AggregationArg>,

    /// Drop system correspondences below this confidence
    #[arg(long, value_name = "FLOAT")]
    pub threshold: Option<f64>,

    /// Also report F-beta with this beta
    #[arg(long, value_name = "FLOAT")]
    pub beta: Option<f64>,

    /// Break results down by relation
    #[arg(long)]
    pub per_relation: bool,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Write output to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Load settings from a saved config
    #[arg(long, value_name = "NAME")]
    pub config: Option<String>,

    /// Show progress details
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Scores of one matrix, without the alignments.
#[derive(Debug, Serialize)]
struct MatrixSummary {
    label: String,
    tp: usize,
    fp: usize,
    #[serde(rename = "fn")]
    fn_count: usize,
    precision: f64,
    recall: f64,
    f1: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    f_beta: Option<f64>,
}

impl MatrixSummary {
    fn new(label: impl Into<String>, cm: &ConfusionMatrix, beta: Option<f64>) -> Self {
        Self {
            label: label.into(),
            tp: cm.tp(),
            fp: cm.fp(),
            fn_count: cm.fn_count(),
            precision: cm.precision(),
            recall: cm.recall(),
            f1: cm.f1(),
            f_beta: beta.map(|b| cm.f_beta(b)),
        }
    }
}

/// Run the eval command
pub fn run(args: EvalArgs) -> Result<(), String> {
    if args.systems.len() != args.references.len() {
        return Err(format!(
            "Got {} system and {} reference alignments; pass them in pairs",
            args.systems.len(),
            args.references.len()
        ));
    }
    let config = load_config(args.config.as_deref())?;
    let completeness = if args.partial || config.partial.unwrap_or(false) {
        GoldStandardCompleteness::partial(
            args.source_complete || config.source_complete.unwrap_or(false),
            args.target_complete || config.target_complete.unwrap_or(false),
        )
    } else {
        GoldStandardCompleteness::Complete
    };
    let mode: AggregationMode = args
        .aggregation
        .map(AggregationMode::from)
        .or(config.aggregation)
        .unwrap_or_default();
    let threshold = args.threshold.or(config.threshold);
    let beta = args.beta.or(config.beta);
    let exclusion = args.exclude.as_deref().map(load_alignment).transpose()?;

    let mut results = Vec::with_capacity(args.systems.len());
    for (system_path, reference_path) in args.systems.iter().zip(&args.references) {
        log_verbose(&format!("Evaluating {} against {}", system_path, reference_path), args.verbose);
        let mut result = ExecutionResult::from_files(system_path, reference_path)
            .map_err(|e| e.to_string())?
            .with_completeness(completeness);
        if let Some(excluded) = &exclusion {
            result = result.with_exclusion(excluded.clone());
        }
        if let Some(t) = threshold {
            result = ThresholdRefiner::new(t).refine(&result);
        }
        results.push(result);
    }

    let metric = ConfusionMatrixMetric::new();
    let matrices = metric.compute_all(&results);
    let mut rows: Vec<MatrixSummary> = results
        .iter()
        .zip(&matrices)
        .map(|(r, cm)| MatrixSummary::new(format!("{} / {}", r.matcher, r.test_case), cm, beta))
        .collect();
    if matrices.len() > 1 {
        let aggregated = ConfusionMatrixMetric::aggregate(mode, &matrices);
        let label = match mode {
            AggregationMode::Macro => "macro average",
            _ => "micro average",
        };
        rows.push(MatrixSummary::new(label, &aggregated, beta));
    }
    if args.per_relation {
        for result in &results {
            for (relation, cm) in metric.compute_per_relation(result) {
                rows.push(MatrixSummary::new(
                    format!("{} / {} [{}]", result.matcher, result.test_case, relation.name()),
                    &cm,
                    beta,
                ));
            }
        }
    }

    let content = match args.format {
        OutputFormat::Json => to_json(&rows)?,
        OutputFormat::Markdown => render_markdown(&rows, beta),
        OutputFormat::Human => render_human(&rows, beta),
    };
    write_output(&content, args.output.as_deref())?;
    log_info(&format!("Evaluated {} alignment pair(s)", results.len()), args.quiet);
    Ok(())
}

fn render_human(rows: &[MatrixSummary], beta: Option<f64>) -> String {
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!("{}\n", color("1", &row.label)));
        out.push_str(&format!("  TP {}  FP {}  FN {}\n", row.tp, row.fp, row.fn_count));
        out.push_str(&format!(
            "  Precision {}  Recall {}  F1 {}",
            percent(row.precision),
            percent(row.recall),
            percent(row.f1)
        ));
        if let (Some(b), Some(f)) = (beta, row.f_beta) {
            out.push_str(&format!("  F{} {}", b, percent(f)));
        }
        out.push('\n');
    }
    out
}

fn render_markdown(rows: &[MatrixSummary], beta: Option<f64>) -> String {
    let mut out = String::new();
    match beta {
        Some(b) => {
            out.push_str(&format!("| | TP | FP | FN | Precision | Recall | F1 | F{} |\n", b));
            out.push_str("|---|---|---|---|---|---|---|---|\n");
        }
        None => {
            out.push_str(ConfusionMatrix::markdown_header());
            out.push('\n');
        }
    }
    for row in rows {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {:.4} | {:.4} | {:.4} |",
            row.label, row.tp, row.fp, row.fn_count, row.precision, row.recall, row.f1
        ));
        if let Some(f) = row.f_beta {
            out.push_str(&format!(" {:.4} |", f));
        }
        out.push('\n');
    }
    out
}
