//! Analyze command - descriptive statistics of an alignment

use clap::Parser;

use super::super::output::{to_json, write_output};
use super::super::parser::OutputFormat;
use super::super::utils::{file_label, load_alignment};

use crate::eval::{AlignmentAnalyzerMetric, ExecutionResult};
use concord_core::Alignment;

/// Report confidences, relations, mapping types, arity and URI positions
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Alignment JSON to analyze
    #[arg(short, long, value_name = "PATH")]
    pub alignment: String,

    /// Source ontology (.nt or .ttl); enables type and position checks
    #[arg(long, value_name = "PATH", requires = "target_ontology")]
    pub source_ontology: Option<String>,

    /// Target ontology (.nt or .ttl)
    #[arg(long, value_name = "PATH", requires = "source_ontology")]
    pub target_ontology: Option<String>,

    /// Matcher name used in the report (default: file name)
    #[arg(long)]
    pub matcher: Option<String>,

    /// Test case name used in the report
    #[arg(long)]
    pub test_case: Option<String>,

    /// Output format
    #[arg(long, default_value = "human")]
    pub format: OutputFormat,

    /// Write output to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,
}

/// Run the analyze command
pub fn run(args: AnalyzeArgs) -> Result<(), String> {
    let alignment = load_alignment(&args.alignment)?;
    let mut result = ExecutionResult::new(alignment, Alignment::new())
        .with_matcher(args.matcher.clone().unwrap_or_else(|| file_label(&args.alignment)))
        .with_test_case(args.test_case.clone().unwrap_or_default());
    if let (Some(source), Some(target)) = (&args.source_ontology, &args.target_ontology) {
        result = result
            .with_ontology_files(source, target)
            .map_err(|e| format!("Failed to load ontologies: {}", e))?;
    }

    let analysis = AlignmentAnalyzerMetric::new().compute(&result);
    let content = match args.format {
        OutputFormat::Json => to_json(&analysis)?,
        OutputFormat::Human | OutputFormat::Markdown => {
            let mut text = analysis.report();
            let problems = analysis.erroneous_report();
            if !problems.is_empty() {
                text.push_str(&format!("\n{}\n", problems));
            }
            text
        }
    };
    write_output(&content, args.output.as_deref())
}
