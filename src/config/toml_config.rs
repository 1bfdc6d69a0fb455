use crate::domain::model::SeverityTier;
use crate::utils::error::{Result, TriageError};
use crate::utils::validation::{
    validate_email, validate_non_empty_string, validate_positive_number, validate_range,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_PUBMED_ENDPOINT: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "medllama2";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    pub service: ServiceConfig,
    pub retrieval: RetrievalConfig,
    pub generation: GenerationConfig,
    pub rules: RulesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "symptom-triage".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub enabled: bool,
    pub endpoint: String,
    /// NCBI 要求的聯絡信箱
    pub contact_email: String,
    pub tool: String,
    pub max_results: usize,
    pub top_k: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub timeout_seconds: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_PUBMED_ENDPOINT.to_string(),
            contact_email: "medprompt@example.com".to_string(),
            tool: "symptom-triage".to_string(),
            max_results: 10,
            top_k: 3,
            chunk_size: 1000,
            chunk_overlap: 200,
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub timeout_seconds: u64,
    pub probe_timeout_seconds: u64,
    pub probe_ttl_seconds: u64,
    pub num_predict: u32,
    pub temperature: f32,
    pub num_ctx: u32,
    pub num_gpu: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: DEFAULT_OLLAMA_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: 15,
            probe_timeout_seconds: 5,
            probe_ttl_seconds: 30,
            num_predict: 256,
            temperature: 0.7,
            num_ctx: 2048,
            num_gpu: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub extra_patterns: ExtraPatterns,
}

/// 各分級額外樣式，附加在內建樣式之後
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraPatterns {
    pub emergency: Vec<String>,
    pub urgent: Vec<String>,
    pub semi_urgent: Vec<String>,
    pub routine: Vec<String>,
    pub self_care: Vec<String>,
}

impl ExtraPatterns {
    pub fn by_tier(&self) -> HashMap<SeverityTier, Vec<String>> {
        [
            (SeverityTier::Emergency, &self.emergency),
            (SeverityTier::Urgent, &self.urgent),
            (SeverityTier::SemiUrgent, &self.semi_urgent),
            (SeverityTier::Routine, &self.routine),
            (SeverityTier::SelfCare, &self.self_care),
        ]
        .into_iter()
        .filter(|(_, patterns)| !patterns.is_empty())
        .map(|(tier, patterns)| (tier, patterns.clone()))
        .collect()
    }

    pub fn len(&self) -> usize {
        self.emergency.len()
            + self.urgent.len()
            + self.semi_urgent.len()
            + self.routine.len()
            + self.self_care.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TriageConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TriageError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TriageError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PUBMED_EMAIL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TriageError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("service.name", &self.service.name)?;

        if self.retrieval.enabled {
            let retrieval = &self.retrieval;
            require_setting("retrieval.contact_email", &retrieval.contact_email)?;
            validate_url("retrieval.endpoint", &retrieval.endpoint)?;
            validate_email("retrieval.contact_email", &retrieval.contact_email)?;
            validate_non_empty_string("retrieval.tool", &retrieval.tool)?;
            validate_positive_number("retrieval.max_results", retrieval.max_results, 1)?;
            validate_positive_number("retrieval.top_k", retrieval.top_k, 1)?;
            validate_positive_number("retrieval.chunk_size", retrieval.chunk_size, 1)?;
            validate_range(
                "retrieval.chunk_overlap",
                retrieval.chunk_overlap,
                0,
                retrieval.chunk_size - 1,
            )?;
            validate_range("retrieval.timeout_seconds", retrieval.timeout_seconds, 1, 300)?;
        }

        if self.generation.enabled {
            let generation = &self.generation;
            require_setting("generation.model", &generation.model)?;
            validate_url("generation.endpoint", &generation.endpoint)?;
            validate_range("generation.timeout_seconds", generation.timeout_seconds, 1, 600)?;
            validate_range(
                "generation.probe_timeout_seconds",
                generation.probe_timeout_seconds,
                1,
                60,
            )?;
            validate_range("generation.temperature", generation.temperature, 0.0, 2.0)?;
            validate_positive_number("generation.num_ctx", generation.num_ctx as usize, 1)?;
        }

        Ok(())
    }
}

/// 啟用的元件必須提供的設定，空白視為未設定
fn require_setting(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TriageError::MissingConfigError {
            field: field.to_string(),
        });
    }
    Ok(())
}

impl Validate for TriageConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = TriageConfig::from_toml_str("").unwrap();

        assert_eq!(config.generation.model, "medllama2");
        assert_eq!(config.generation.endpoint, "http://localhost:11434");
        assert_eq!(config.generation.timeout_seconds, 15);
        assert_eq!(config.retrieval.chunk_size, 1000);
        assert_eq!(config.retrieval.chunk_overlap, 200);
        assert_eq!(config.retrieval.top_k, 3);
        assert!(config.rules.extra_patterns.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_sections() {
        let toml_content = r#"
[retrieval]
enabled = false

[generation]
model = "llama3"
timeout_seconds = 30

[rules.extra_patterns]
urgent = ["snake ?bite"]
"#;

        let config = TriageConfig::from_toml_str(toml_content).unwrap();

        assert!(!config.retrieval.enabled);
        assert_eq!(config.generation.model, "llama3");
        assert_eq!(config.generation.timeout_seconds, 30);
        assert_eq!(config.generation.num_predict, 256);

        let by_tier = config.rules.extra_patterns.by_tier();
        assert_eq!(by_tier.len(), 1);
        assert_eq!(by_tier[&SeverityTier::Urgent], vec!["snake ?bite".to_string()]);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_TRIAGE_OLLAMA", "http://ollama.internal:11434");

        let toml_content = r#"
[generation]
endpoint = "${TEST_TRIAGE_OLLAMA}"
"#;

        let config = TriageConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.generation.endpoint, "http://ollama.internal:11434");

        std::env::remove_var("TEST_TRIAGE_OLLAMA");
    }

    #[test]
    fn test_config_validation() {
        let mut config = TriageConfig::default();
        config.generation.endpoint = "invalid-url".to_string();
        assert!(config.validate().is_err());

        // 停用的元件不檢查
        config.generation.enabled = false;
        assert!(config.validate().is_ok());

        config.retrieval.chunk_overlap = config.retrieval.chunk_size;
        assert!(config.validate().is_err());

        let mut config = TriageConfig::default();
        config.retrieval.contact_email = "not-an-email".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_enabled_components_require_settings() {
        let mut config = TriageConfig::default();
        config.generation.model = "  ".to_string();

        match config.validate() {
            Err(TriageError::MissingConfigError { field }) => assert_eq!(field, "generation.model"),
            other => panic!("expected missing setting, got {:?}", other),
        }

        config.generation.enabled = false;
        config.retrieval.contact_email = String::new();
        match config.validate() {
            Err(TriageError::MissingConfigError { field }) => {
                assert_eq!(field, "retrieval.contact_email")
            }
            other => panic!("expected missing setting, got {:?}", other),
        }
    }
}
