//! Command implementations for the concord CLI
//!
//! Each command has its own module with an `XArgs` struct and a `run` function.

pub mod analyze;
pub mod config;
pub mod cycles;
pub mod eval;
pub mod rank;
pub mod refine;
pub mod similarity;

// Re-export argument types for parser
pub use analyze::AnalyzeArgs;
pub use config::{ConfigAction, ConfigArgs};
pub use cycles::CyclesArgs;
pub use eval::EvalArgs;
pub use rank::RankArgs;
pub use refine::RefineArgs;
pub use similarity::SimilarityArgs;
