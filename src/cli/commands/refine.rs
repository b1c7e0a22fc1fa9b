//! Refine command - closure of an alignment over two class hierarchies

use clap::Parser;

use super::super::output::{log_success, write_output};
use super::super::utils::{load_alignment, load_ontology, log_verbose};

use crate::refine::refine_alignment;

/// Add every subsumption and equivalence implied by the alignment and the ontologies
#[derive(Parser, Debug)]
pub struct RefineArgs {
    /// Alignment JSON to refine
    #[arg(short, long, value_name = "PATH")]
    pub alignment: String,

    /// Source ontology (.nt or .ttl)
    #[arg(long, value_name = "PATH")]
    pub source_ontology: String,

    /// Target ontology (.nt or .ttl)
    #[arg(long, value_name = "PATH")]
    pub target_ontology: String,

    /// Write the refined alignment to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Show progress details
    #[arg(short, long)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Run the refine command
pub fn run(args: RefineArgs) -> Result<(), String> {
    let alignment = load_alignment(&args.alignment)?;
    let source = load_ontology(&args.source_ontology)?;
    log_verbose(
        &format!("Source ontology {}: {} triples", args.source_ontology, source.len()),
        args.verbose,
    );
    let target = load_ontology(&args.target_ontology)?;
    log_verbose(
        &format!("Target ontology {}: {} triples", args.target_ontology, target.len()),
        args.verbose,
    );

    let refined = refine_alignment(&source, &target, &alignment);
    let json = refined
        .to_json_string()
        .map_err(|e| format!("Failed to serialize alignment: {}", e))?;
    write_output(&(json + "\n"), args.output.as_deref())?;
    log_success(
        &format!(
            "Refined {} correspondence(s) into {} (+{})",
            alignment.len(),
            refined.len(),
            refined.len().saturating_sub(alignment.len())
        ),
        args.quiet,
    );
    Ok(())
}
