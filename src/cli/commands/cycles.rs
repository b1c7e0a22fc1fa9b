//! Cycles command - detect and break cycles in a hierarchy

use clap::Parser;
use serde::Serialize;

use super::super::output::{color, log_info, log_success, to_json, write_output};
use super::super::parser::OutputFormat;
use super::super::utils::{load_ontology, log_verbose, read_input_file};

use concord_core::ontology::vocab::RDFS_SUB_CLASS_OF;
use concord_core::Ontology;
use concord_hierarchy::{AdjacencyMap, CycleDetection, CycleRemoval};

/// Find the elementary cycles of a graph, optionally breaking them
#[derive(Parser, Debug)]
pub struct CyclesArgs {
    /// Edge list: one `source target` pair per line (`#` starts a comment)
    #[arg(long, value_name = "PATH", conflicts_with = "ontology", required_unless_present = "ontology")]
    pub edges: Option<String>,

    /// Ontology whose rdfs:subClassOf statements form the graph
    #[arg(long, value_name = "PATH")]
    pub ontology: Option<String>,

    /// Print the edges that make the graph acyclic
    #[arg(long)]
    pub remove: bool,

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
struct CycleReport {
    cycles: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    removed_edges: Option<Vec<(String, String)>>,
}

/// Run the cycles command
pub fn run(args: CyclesArgs) -> Result<(), String> {
    let graph = match (&args.edges, &args.ontology) {
        (Some(path), _) => parse_edge_list(&read_input_file(path)?)?,
        (None, Some(path)) => {
            let ontology = load_ontology(path)?;
            let mut graph = AdjacencyMap::new();
            for (sub, sup) in ontology.resource_statements(RDFS_SUB_CLASS_OF) {
                graph
                    .entry(sub.to_string())
                    .or_insert_with(Default::default)
                    .insert(sup.to_string());
            }
            graph
        }
        (None, None) => return Err("Pass --edges or --ontology".to_string()),
    };
    log_verbose(
        &format!(
            "Graph: {} nodes with outgoing edges, {} edges",
            graph.len(),
            graph.values().map(|s| s.len()).sum::<usize>()
        ),
        args.verbose,
    );

    let detection = CycleDetection::from_graph(graph);
    let cycles = detection.cycles();
    let removed_edges = if args.remove {
        let removal = CycleRemoval::from_graph(detection.into_graph()).with_cycles(cycles.clone());
        Some(removal.edges_to_remove().into_iter().collect::<Vec<_>>())
    } else {
        None
    };
    let report = CycleReport { cycles, removed_edges };

    let content = match args.format {
        OutputFormat::Json => to_json(&report)?,
        OutputFormat::Human | OutputFormat::Markdown => render_text(&report),
    };
    write_output(&content, args.output.as_deref())?;
    if report.cycles.is_empty() {
        log_success("No cycles", args.quiet);
    } else {
        log_info(&format!("Found {} cycle(s)", report.cycles.len()), args.quiet);
    }
    Ok(())
}

/// Parse `source target` lines. Blank lines and `#` comments are skipped.
fn parse_edge_list(text: &str) -> Result<AdjacencyMap<String>, String> {
    let mut graph = AdjacencyMap::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(source), Some(target), None) => {
                graph
                    .entry(source.to_string())
                    .or_insert_with(Default::default)
                    .insert(target.to_string());
            }
            _ => return Err(format!("Line {}: expected `source target`, got `{}`", number + 1, line)),
        }
    }
    Ok(graph)
}

fn render_text(report: &CycleReport) -> String {
    let mut out = String::new();
    for cycle in &report.cycles {
        let mut path = cycle.join(" -> ");
        if let Some(first) = cycle.first() {
            path.push_str(&format!(" -> {}", first));
        }
        out.push_str(&path);
        out.push('\n');
    }
    if let Some(edges) = &report.removed_edges {
        out.push_str(&format!("{}\n", color("1", "Remove:")));
        for (source, target) in edges {
            out.push_str(&format!("  {} -> {}\n", source, target));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_edge_list() {
        let graph = parse_edge_list("# hierarchy\na b\n\nb a  # back\n").unwrap();
        assert!(graph["a"].contains("b"));
        assert!(graph["b"].contains("a"));
    }

    #[test]
    fn test_parse_edge_list_rejects_bad_line() {
        let err = parse_edge_list("a b c\n").unwrap_err();
        assert!(err.contains("Line 1"));
    }

    #[test]
    fn test_render_closes_cycle() {
        let report = CycleReport {
            cycles: vec![vec!["b".to_string(), "a".to_string()]],
            removed_edges: Some(vec![("a".to_string(), "b".to_string())]),
        };
        let text = render_text(&report);
        assert!(text.starts_with("b -> a -> b\n"));
        assert!(text.contains("  a -> b\n"));
    }
}
