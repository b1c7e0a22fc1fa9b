//! Config command - saved evaluation settings

use clap::{Parser, Subcommand};
use std::fs;

use super::super::config::EvalConfig;
use super::super::output::color;
use super::super::parser::AggregationArg;
use super::super::utils::get_config_dir;

use crate::eval::{AggregationMode, SameConfidenceRanking};

/// Configuration management
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Action to perform
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Save settings as a named config
    Save {
        /// Config name
        #[arg(value_name = "NAME")]
        name: String,

        /// Aggregation over several pairs
        #[arg(long, value_name = "MODE")]
        aggregation: Option<AggregationArg>,

        /// Tie-break policy for ranking metrics
        #[arg(long, value_name = "POLICY")]
        tie_break: Option<String>,

        /// Seed for random-with-seed
        #[arg(long, value_name = "N")]
        seed: Option<u64>,

        /// K for HITS@K
        #[arg(short, long, value_name = "N")]
        k: Option<usize>,

        /// References are partial gold standards
        #[arg(long)]
        partial: bool,

        /// Partial references are source complete
        #[arg(long)]
        source_complete: bool,

        /// Partial references are target complete
        #[arg(long)]
        target_complete: bool,

        /// Confidence threshold for system alignments
        #[arg(long, value_name = "FLOAT")]
        threshold: Option<f64>,

        /// Beta of the additional F-measure
        #[arg(long, value_name = "FLOAT")]
        beta: Option<f64>,
    },

    /// List saved configs
    #[command(visible_alias = "ls")]
    List,

    /// Show config details
    Show {
        /// Config name
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Delete config
    Delete {
        /// Config name
        #[arg(value_name = "NAME")]
        name: String,
    },
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<(), String> {
    let config_dir = get_config_dir()?;

    match args.action {
        ConfigAction::Save {
            name,
            aggregation,
            tie_break,
            seed,
            k,
            partial,
            source_complete,
            target_complete,
            threshold,
            beta,
        } => {
            if let Some(policy) = &tie_break {
                policy.parse::<SameConfidenceRanking>()?;
            }
            let config = EvalConfig {
                aggregation: aggregation.map(AggregationMode::from),
                tie_break,
                seed,
                k,
                partial: partial.then_some(true),
                source_complete: source_complete.then_some(true),
                target_complete: target_complete.then_some(true),
                threshold,
                beta,
            };
            fs::create_dir_all(&config_dir)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
            config.save(&config_dir, &name)?;
            println!("{} Saved config: {}", color("32", "✓"), name);
        }
        ConfigAction::List => {
            if !config_dir.exists() {
                println!("No configs found");
                return Ok(());
            }

            let entries = fs::read_dir(&config_dir)
                .map_err(|e| format!("Failed to read config directory: {}", e))?;

            let mut configs: Vec<String> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.extension().and_then(|ext| ext.to_str()) == Some("toml"))
                .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .collect();
            configs.sort();

            if configs.is_empty() {
                println!("No configs found");
            } else {
                println!("Saved configs:");
                for config in configs {
                    println!("  {}", config);
                }
            }
        }
        ConfigAction::Show { name } => {
            let config = EvalConfig::load(&config_dir, &name)?;
            println!("Config: {}", name);
            print!("{}", config.to_toml_string()?);
            println!("# gold standard: {:?}", config.completeness());
        }
        ConfigAction::Delete { name } => {
            let config_file = config_dir.join(format!("{}.toml", name));
            if !config_file.exists() {
                return Err(format!("Config '{}' not found", name));
            }

            fs::remove_file(&config_file).map_err(|e| format!("Failed to delete config: {}", e))?;
            println!("{} Deleted config: {}", color("32", "✓"), name);
        }
    }

    Ok(())
}
