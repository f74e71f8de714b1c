//! Core business logic module
//!
//! This module contains the risk-detection pipeline:
//! - `rules` - Built-in rule functions and the `Rule` wrapper
//! - `evaluator` - Ordered rule registry and thresholds
//! - `explain` - Human-readable explanation text
//! - `runner` - Single-threaded batch runner
//! - `parallel` - Chunked multi-threaded batch runner
//! - `summary` - Batch narrative and recommendations
//! - `quality` - Advisory data-quality checks

pub mod evaluator;
pub mod explain;
pub mod parallel;
pub mod quality;
pub mod rules;
pub mod runner;
pub mod summary;

pub use evaluator::{RiskConfig, RuleEvaluator};
pub use explain::explain;
pub use parallel::ParallelRunner;
pub use quality::{assess_quality, QualityReport};
pub use rules::Rule;
pub use runner::BatchRunner;
pub use summary::{explain_summary, recommend, Recommendations, SummaryDocument};
