use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Rule registry error in {tier} patterns: {source}")]
    RegistryError {
        tier: String,
        #[source]
        source: regex::Error,
    },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

/// 文獻檢索失敗的種類
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("context retrieval is not available")]
    Unavailable,

    #[error("symptom text is too short or empty")]
    InputTooShort,

    #[error("no PubMed articles found for query: {query}")]
    NoResults { query: String },

    #[error("failed to extract article data from PubMed")]
    EmptyArticles,

    #[error("PubMed request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected PubMed response: {message}")]
    InvalidResponse { message: String },
}

/// 文字生成失敗的種類，服務層依此選擇替代文字
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("generation request timed out")]
    Timeout,

    #[error("generation service unreachable: {0}")]
    Unreachable(String),

    #[error("model {model} not available")]
    ModelUnavailable { model: String },

    #[error("model error: {0}")]
    Model(String),

    #[error("malformed generation response: {0}")]
    MalformedResponse(String),

    #[error("generation response contained no text")]
    EmptyResponse,

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GenerationError::Timeout
        } else if e.is_connect() {
            GenerationError::Unreachable(e.to_string())
        } else if e.is_decode() {
            GenerationError::MalformedResponse(e.to_string())
        } else {
            GenerationError::Other(e.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TriageError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TriageError::RegistryError { .. }
            | TriageError::ConfigError { .. }
            | TriageError::MissingConfigError { .. }
            | TriageError::InvalidConfigValueError { .. }
            | TriageError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            TriageError::ApiError(_) => ErrorCategory::Network,
            TriageError::IoError(_) | TriageError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TriageError::ApiError(_) => ErrorSeverity::Medium,
            TriageError::ConfigError { .. }
            | TriageError::MissingConfigError { .. }
            | TriageError::InvalidConfigValueError { .. }
            | TriageError::ConfigValidationError { .. }
            | TriageError::SerializationError(_) => ErrorSeverity::High,
            TriageError::RegistryError { .. } | TriageError::IoError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TriageError::RegistryError { .. } => {
                "Check the [rules.extra_patterns] entries for invalid regular expressions"
            }
            TriageError::ApiError(_) => "Check network connectivity and the service endpoints",
            TriageError::IoError(_) => "Check that the file exists and is readable",
            TriageError::SerializationError(_) => "Check the output data for values JSON cannot represent",
            TriageError::ConfigError { .. }
            | TriageError::MissingConfigError { .. }
            | TriageError::InvalidConfigValueError { .. }
            | TriageError::ConfigValidationError { .. } => {
                "Review the configuration file or command line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TriageError::RegistryError { tier, .. } => {
                format!("The triage rules for the {} tier could not be loaded", tier)
            }
            TriageError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            TriageError::MissingConfigError { field } => {
                format!("Missing required setting '{}'", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TriageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_is_critical_configuration() {
        let source = regex::Regex::new("(unclosed").unwrap_err();
        let err = TriageError::RegistryError {
            tier: "urgent".to_string(),
            source,
        };

        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("urgent"));
    }

    #[test]
    fn test_http_client_error_is_network() {
        let source = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let err: TriageError = source.into();

        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_missing_setting_message() {
        let err = TriageError::MissingConfigError {
            field: "generation.model".to_string(),
        };

        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(
            err.user_friendly_message(),
            "Missing required setting 'generation.model'"
        );
    }
}
