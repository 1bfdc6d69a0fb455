pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

#[cfg(feature = "lambda")]
pub use config::lambda::LambdaConfig;

pub use app::TriageService;
pub use config::TriageConfig;
pub use core::engine::TriageEngine;
pub use domain::model::{AnalysisResponse, CarePathway, SeverityTier, TriageResult};
pub use utils::error::{Result, TriageError};
