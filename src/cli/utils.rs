//! Utility functions for CLI commands

use std::path::{Path, PathBuf};

use concord_core::{Alignment, TripleOntology};

use super::config::EvalConfig;

/// Read input from file
pub fn read_input_file(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read file {}: {}", path, e))
}

/// Load an alignment from a JSON file (a list of correspondences)
pub fn load_alignment(path: &str) -> Result<Alignment, String> {
    let content = read_input_file(path)?;
    Alignment::from_json_str(&content).map_err(|e| format!("Failed to parse alignment {}: {}", path, e))
}

/// Load an ontology from an N-Triples (`.nt`) or Turtle (`.ttl`) file
pub fn load_ontology(path: &str) -> Result<TripleOntology, String> {
    TripleOntology::from_file(path).map_err(|e| format!("Failed to load ontology {}: {}", path, e))
}

/// Log a message only in verbose mode
pub fn log_verbose(msg: &str, verbose: bool) {
    if verbose {
        eprintln!("{}", msg);
    }
}

/// Directory holding saved configs, created on first use
pub fn get_config_dir() -> Result<PathBuf, String> {
    use dirs::config_dir;
    if let Some(mut config) = config_dir() {
        config.push("concord");
        std::fs::create_dir_all(&config)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        Ok(config)
    } else {
        // Fallback to current directory
        Ok(PathBuf::from(".concord-config"))
    }
}

/// Load the named config, or an empty one when no name is given
pub fn load_config(name: Option<&str>) -> Result<EvalConfig, String> {
    match name {
        Some(name) => EvalConfig::load(&get_config_dir()?, name),
        None => Ok(EvalConfig::default()),
    }
}

/// File name without directories and extension, for labels
pub fn file_label(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_label() {
        assert_eq!(file_label("runs/anatomy/system.json"), "system");
        assert_eq!(file_label("plain"), "plain");
    }

    #[test]
    fn test_load_alignment_reports_path() {
        let err = load_alignment("/definitely/not/here.json").unwrap_err();
        assert!(err.contains("/definitely/not/here.json"));
    }
}
