#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::{
    ExtraPatterns, GenerationConfig, RetrievalConfig, RulesConfig, ServiceConfig, TriageConfig,
};
