//! CLI argument parsing and structure definitions

use clap::{Parser, Subcommand, ValueEnum};

use super::commands;

/// Ontology alignment evaluation CLI
#[derive(Parser)]
#[command(name = "concord")]
#[command(
    author,
    version,
    about = "Ontology alignment evaluation - precision/recall, ranking metrics, closure refinement",
    long_about = r#"
concord - evaluate ontology matchers against reference alignments

CAPABILITIES:
  • Confusion matrix - precision, recall, F-measure (complete or partial gold standards)
  • Ranking metrics  - NDCG, MAP, MRR, R-precision, HITS@K with tie-break policies
  • Refinement       - transitive closure over both class hierarchies
  • Hierarchies      - detect and break cycles in subclass graphs
  • Comparison       - Jaccard similarity between matchers

ALIGNMENT FILES:
  JSON lists of correspondences:
  [{"source": "http://a#X", "target": "http://b#Y", "relation": "=", "confidence": 0.9}]

EXAMPLES:
  concord eval -s system.json -r reference.json
  concord rank -s system.json -r reference.json --tie-break bottom
  concord refine -a reference.json --source-ontology a.ttl --target-ontology b.ttl
  concord cycles --ontology merged.nt --remove
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand)]
pub enum Commands {
    /// Precision, recall and F-measure of system alignments
    #[command(visible_alias = "e")]
    Eval(commands::EvalArgs),

    /// Ranking metrics of system alignments ordered by confidence
    #[command(visible_alias = "r")]
    Rank(commands::RankArgs),

    /// Infer subsumption/equivalence correspondences via the class hierarchies
    Refine(commands::RefineArgs),

    /// Detect or remove cycles in a hierarchy
    #[command(visible_alias = "c")]
    Cycles(commands::CyclesArgs),

    /// Jaccard similarity between matchers' alignments
    #[command(visible_alias = "sim")]
    Similarity(commands::SimilarityArgs),

    /// Describe an alignment (confidences, relations, arity, URI positions)
    #[command(visible_alias = "a")]
    Analyze(commands::AnalyzeArgs),

    /// Manage saved evaluation configs
    Config(commands::ConfigArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
    /// Markdown table
    Markdown,
}

/// Aggregation over several system/reference pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AggregationArg {
    /// Pool counts, then compute scores
    Micro,
    /// Average per-pair scores
    Macro,
}

impl From<AggregationArg> for crate::eval::AggregationMode {
    fn from(arg: AggregationArg) -> Self {
        match arg {
            AggregationArg::Micro => crate::eval::AggregationMode::Micro,
            AggregationArg::Macro => crate::eval::AggregationMode::Macro,
        }
    }
}
