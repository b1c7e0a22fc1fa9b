//! Rank command - ranking metrics of system alignments ordered by confidence

use clap::Parser;
use serde::Serialize;

use super::super::output::{color, log_info, to_json, write_output};
use super::super::parser::OutputFormat;
use super::super::utils::{load_config, log_verbose};

use crate::eval::{
    ExecutionResult, GoldStandardCompleteness, RankingMetric, RankingMetricGroup, RankingResult,
    SameConfidenceRanking,
};

/// Compute NDCG, MAP, MRR, R-precision and HITS@K
#[derive(Parser, Debug)]
pub struct RankArgs {
    /// System alignment JSON (repeat for several test cases)
    #[arg(short, long = "system", value_name = "PATH", required = true)]
    pub systems: Vec<String>,

    /// Reference alignment JSON, paired with --system by position
    #[arg(short, long = "reference", value_name = "PATH", required = true)]
    pub references: Vec<String>,

    /// Order of equally confident correspondences
    /// (alphabetically, random, random-with-seed[:n], top, bottom)
    #[arg(long, value_name = "POLICY")]
    pub tie_break: Option<String>,

    /// K for HITS@K, P@K and R@K (default: size of the reference)
    #[arg(short, long, value_name = "N")]
    pub k: Option<usize>,

    /// Average over the source entities of the reference
    #[arg(long)]
    pub group_by_source: bool,

    /// Drop system correspondences of foreign sources that hit reference targets
    #[arg(long)]
    pub partial: bool,

    /// Also report F-beta@K with this beta
    #[arg(long, value_name = "FLOAT")]
    pub beta: Option<f64>,

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

#[derive(Debug, Serialize)]
struct RankRow {
    label: String,
    #[serde(flatten)]
    scores: RankingResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    f_beta_at_k: Option<f64>,
}

/// Run the rank command
pub fn run(args: RankArgs) -> Result<(), String> {
    if args.systems.len() != args.references.len() {
        return Err(format!(
            "Got {} system and {} reference alignments; pass them in pairs",
            args.systems.len(),
            args.references.len()
        ));
    }
    let config = load_config(args.config.as_deref())?;
    let tie_break = match &args.tie_break {
        Some(name) => name.parse::<SameConfidenceRanking>()?,
        None => config.tie_break()?.unwrap_or_default(),
    };
    let beta = args.beta.or(config.beta);
    let partial = args.partial || config.partial.unwrap_or(false);

    let mut metric = RankingMetric::new(tie_break).with_partial_reduction(partial);
    if let Some(k) = args.k.or(config.k) {
        metric = metric.with_k(k);
    }
    let group = RankingMetricGroup::from_metric(metric);

    let mut rows = Vec::with_capacity(args.systems.len());
    for (system_path, reference_path) in args.systems.iter().zip(&args.references) {
        log_verbose(&format!("Ranking {} against {}", system_path, reference_path), args.verbose);
        let result = ExecutionResult::from_files(system_path, reference_path)
            .map_err(|e| e.to_string())?
            .with_completeness(if partial {
                GoldStandardCompleteness::partial(false, false)
            } else {
                GoldStandardCompleteness::Complete
            });
        let scores = if args.group_by_source {
            group.compute(&result)
        } else {
            metric.compute(&result)
        };
        rows.push(RankRow {
            label: format!("{} / {}", result.matcher, result.test_case),
            f_beta_at_k: beta.map(|b| scores.f_beta_at_k(b)),
            scores,
        });
    }

    let content = match args.format {
        OutputFormat::Json => to_json(&rows)?,
        OutputFormat::Markdown => render_markdown(&rows),
        OutputFormat::Human => rows
            .iter()
            .map(|row| {
                let mut line = format!("{}\n  {}", color("1", &row.label), row.scores);
                if let Some(f) = row.f_beta_at_k {
                    line.push_str(&format!(" Fbeta@K={:.4}", f));
                }
                line + "\n"
            })
            .collect(),
    };
    write_output(&content, args.output.as_deref())?;
    log_info(&format!("Ranked {} system alignment(s) ({})", rows.len(), tie_break), args.quiet);
    Ok(())
}

fn render_markdown(rows: &[RankRow]) -> String {
    let mut out = String::from(
        "| | NDCG | MAP | MRR | R-Prec | HITS@K | P@K | R@K | F1@K | K |\n|---|---|---|---|---|---|---|---|---|---|\n",
    );
    for row in rows {
        let s = &row.scores;
        out.push_str(&format!(
            "| {} | {:.4} | {:.4} | {:.4} | {:.4} | {:.2} | {:.4} | {:.4} | {:.4} | {} |\n",
            row.label,
            s.ndcg,
            s.average_precision,
            s.reciprocal_rank,
            s.r_precision,
            s.hits_at_k,
            s.precision_at_k,
            s.recall_at_k,
            s.f1_at_k,
            s.k_of_hits_at_k
        ));
    }
    out
}
