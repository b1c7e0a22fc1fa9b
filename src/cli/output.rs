//! Output formatting utilities for CLI commands

use is_terminal::IsTerminal;
use std::io::{self, Write};

/// Log info message (respects quiet flag)
pub fn log_info(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", msg);
    }
}

/// Log a success line with a green check mark (respects quiet flag)
pub fn log_success(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{} {}", color("32", "✓"), msg);
    }
}

/// Write output to file or stdout
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), String> {
    if let Some(path) = path {
        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write to {}: {}", path, e))?;
    } else {
        print!("{}", content);
        io::stdout().flush().map_err(|e| format!("Failed to flush stdout: {}", e))?;
    }
    Ok(())
}

/// Wrap `text` in an ANSI color when stdout is a terminal
pub fn color(code: &str, text: &str) -> String {
    if io::stdout().is_terminal() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Format a score in [0, 1] as a percentage
pub fn percent(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Serialize to pretty JSON with a trailing newline
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value)
        .map(|s| s + "\n")
        .map_err(|e| format!("Failed to serialize output: {}", e))
}
