use crate::config::toml_config::TriageConfig;
use crate::utils::error::{Result, TriageError};
use std::env;

/// Lambda 環境的配置：可選的 TOML 檔加上環境變數覆蓋
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub triage: TriageConfig,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        let mut triage = match env::var("TRIAGE_CONFIG") {
            Ok(path) => TriageConfig::from_file(path)?,
            Err(_) => TriageConfig::default(),
        };

        if let Ok(endpoint) = env::var("OLLAMA_ENDPOINT") {
            triage.generation.endpoint = endpoint;
        }
        if let Ok(model) = env::var("OLLAMA_MODEL") {
            triage.generation.model = model;
        }
        if let Ok(email) = env::var("PUBMED_EMAIL") {
            triage.retrieval.contact_email = email;
        }
        if let Some(enabled) = parse_flag("RETRIEVAL_ENABLED")? {
            triage.retrieval.enabled = enabled;
        }
        if let Some(enabled) = parse_flag("GENERATION_ENABLED")? {
            triage.generation.enabled = enabled;
        }

        Ok(Self { triage })
    }
}

fn parse_flag(name: &str) -> Result<Option<bool>> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" => Ok(Some(false)),
            _ => Err(TriageError::InvalidConfigValueError {
                field: name.to_string(),
                value,
                reason: "Expected a boolean (true/false)".to_string(),
            }),
        },
        Err(_) => Ok(None),
    }
}

impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        self.triage.validate_config()?;
        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
