use std::io::Write;
use symptom_triage::utils::error::{ErrorCategory, ErrorSeverity};
use symptom_triage::utils::validation::Validate;
use symptom_triage::{SeverityTier, TriageConfig, TriageError, TriageService};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_file() {
    let file = write_config(
        r#"
[service]
name = "triage-staging"

[retrieval]
contact_email = "ops@example.org"
top_k = 5

[generation]
endpoint = "http://gpu-box:11434"
model = "meditron"
temperature = 0.2
"#,
    );

    let config = TriageConfig::from_file(file.path()).unwrap();

    assert_eq!(config.service.name, "triage-staging");
    assert_eq!(config.retrieval.contact_email, "ops@example.org");
    assert_eq!(config.retrieval.top_k, 5);
    assert_eq!(config.retrieval.chunk_size, 1000);
    assert_eq!(config.generation.endpoint, "http://gpu-box:11434");
    assert_eq!(config.generation.model, "meditron");
    assert!((config.generation.temperature - 0.2).abs() < f32::EPSILON);
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file_is_io_error() {
    let err = TriageConfig::from_file("/nonexistent/triage.toml").unwrap_err();

    assert!(matches!(err, TriageError::IoError(_)));
    assert_eq!(err.category(), ErrorCategory::System);
}

#[test]
fn test_malformed_toml_is_config_error() {
    let file = write_config("[generation\nmodel = ");
    let err = TriageConfig::from_file(file.path()).unwrap_err();

    assert!(matches!(err, TriageError::ConfigValidationError { .. }));
    assert_eq!(err.severity(), ErrorSeverity::High);
}

#[test]
fn test_invalid_values_fail_validation() {
    let file = write_config(
        r#"
[retrieval]
endpoint = "ftp://pubmed.example"
"#,
    );
    let config = TriageConfig::from_file(file.path()).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.user_friendly_message().contains("retrieval.endpoint"));

    let file = write_config(
        r#"
[generation]
temperature = 3.5
"#,
    );
    let config = TriageConfig::from_file(file.path()).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_extra_patterns_extend_tiers() {
    let file = write_config(
        r#"
[retrieval]
enabled = false

[generation]
enabled = false

[rules.extra_patterns]
urgent = ["snake ?bite"]
self_care = ["hiccups"]
"#,
    );

    let config = TriageConfig::from_file(file.path()).unwrap();
    assert_eq!(config.rules.extra_patterns.len(), 2);

    let service = TriageService::from_config(&config).unwrap();
    assert_eq!(service.triage("snakebite on my ankle").severity, SeverityTier::Urgent);
    assert_eq!(service.triage("hiccups").severity, SeverityTier::SelfCare);

    // 內建樣式仍優先
    assert_eq!(
        service.triage("chest pain after a snake bite").severity,
        SeverityTier::Emergency
    );
}

#[test]
fn test_malformed_extra_pattern_fails_construction() {
    let mut config = TriageConfig::default();
    config.retrieval.enabled = false;
    config.generation.enabled = false;
    config.rules.extra_patterns.semi_urgent = vec!["(unclosed".to_string()];

    let err = TriageService::from_config(&config).err().unwrap();

    match &err {
        TriageError::RegistryError { tier, .. } => assert_eq!(tier, "semi-urgent"),
        other => panic!("expected registry error, got {:?}", other),
    }
    assert_eq!(err.severity(), ErrorSeverity::Critical);
}
