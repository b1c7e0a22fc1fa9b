//! concord - ontology alignment evaluation CLI
//!
//! # Usage
//!
//! ```bash
//! # Precision, recall, F-measure
//! concord eval -s system.json -r reference.json
//!
//! # Several test cases, macro averaged, partial gold standard
//! concord eval -s a.json -r a_ref.json -s b.json -r b_ref.json --aggregation macro --partial
//!
//! # Ranking metrics with pessimistic tie-breaking
//! concord rank -s system.json -r reference.json --tie-break bottom
//!
//! # Closure over both class hierarchies
//! concord refine -a reference.json --source-ontology a.ttl --target-ontology b.ttl
//!
//! # Cycles in a subclass graph
//! concord cycles --ontology merged.nt --remove
//! ```

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    use concord::cli::commands::*;
    use concord::cli::output::color;
    use concord::cli::parser::{Cli, Commands};

    let cli = Cli::parse();

    let result: Result<(), String> = match cli.command {
        Commands::Eval(args) => eval::run(args),
        Commands::Rank(args) => rank::run(args),
        Commands::Refine(args) => refine::run(args),
        Commands::Cycles(args) => cycles::run(args),
        Commands::Similarity(args) => similarity::run(args),
        Commands::Analyze(args) => analyze::run(args),
        Commands::Config(args) => config::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", color("31", "error:"), e);
            ExitCode::FAILURE
        }
    }
}
