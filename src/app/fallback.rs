use crate::domain::model::SeverityTier;
use crate::utils::error::GenerationError;

pub const GENERIC_CONTEXT: &str = concat!(
    "Unable to retrieve specific medical literature at this time. ",
    "The analysis will proceed based on general medical knowledge."
);

pub const EMERGENCY_FALLBACK: &str = concat!(
    "MEDICAL EMERGENCY DETECTED: Your symptoms suggest a potentially life-threatening condition that requires IMMEDIATE medical attention. ",
    "Please call emergency services (911) or go to the nearest emergency room immediately. ",
    "Do not wait for the AI analysis to complete."
);

pub const TIMEOUT_FALLBACK: &str = concat!(
    "I apologize for the delay. The analysis is taking longer than expected. ",
    "Please try again with a more concise description of your main symptoms."
);

pub const MEMORY_FALLBACK: &str = concat!(
    "The medical AI model requires more memory than is currently available on this system. ",
    "Please try again later when more system resources are available, or consider using a smaller model."
);

pub const MALFORMED_FALLBACK: &str = concat!(
    "I apologize, but I encountered an issue processing your symptoms. ",
    "Please try again with a more concise description."
);

pub const NO_RESPONSE_FALLBACK: &str = "I'm sorry, but I couldn't generate a response.";

/// 生成失敗時的替代文字；Emergency 一律回傳急診指示
pub fn fallback_response(error: &GenerationError, severity: SeverityTier, model: &str) -> String {
    if severity == SeverityTier::Emergency {
        return EMERGENCY_FALLBACK.to_string();
    }

    match error {
        GenerationError::Timeout => TIMEOUT_FALLBACK.to_string(),
        GenerationError::Unreachable(_) | GenerationError::ModelUnavailable { .. } => format!(
            "I'm unable to connect to the medical AI service at the moment. Please ensure Ollama is running with the {} model loaded.",
            model
        ),
        GenerationError::Model(message) if message.contains("model requires more system memory") => {
            MEMORY_FALLBACK.to_string()
        }
        GenerationError::Model(message) => format!(
            "The medical AI encountered an error: {}. Please try again later.",
            message
        ),
        GenerationError::MalformedResponse(_) => MALFORMED_FALLBACK.to_string(),
        GenerationError::EmptyResponse => NO_RESPONSE_FALLBACK.to_string(),
        GenerationError::Other(message) => format!(
            "An unexpected error occurred: {}. Please try again with a simpler description.",
            message
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emergency_overrides_every_failure() {
        let failures = [
            GenerationError::Timeout,
            GenerationError::Unreachable("refused".to_string()),
            GenerationError::ModelUnavailable {
                model: "medllama2".to_string(),
            },
            GenerationError::Model("boom".to_string()),
            GenerationError::MalformedResponse("<html>".to_string()),
            GenerationError::EmptyResponse,
            GenerationError::Other("??".to_string()),
        ];

        for failure in &failures {
            let text = fallback_response(failure, SeverityTier::Emergency, "medllama2");
            assert!(text.contains("call emergency services (911)"));
        }
    }

    #[test]
    fn test_fallback_by_kind() {
        let severity = SeverityTier::Routine;

        assert_eq!(
            fallback_response(&GenerationError::Timeout, severity, "medllama2"),
            TIMEOUT_FALLBACK
        );
        assert!(fallback_response(
            &GenerationError::Unreachable("refused".to_string()),
            severity,
            "medllama2"
        )
        .contains("with the medllama2 model loaded"));
        assert_eq!(
            fallback_response(
                &GenerationError::Model("model requires more system memory (8 GiB)".to_string()),
                severity,
                "medllama2"
            ),
            MEMORY_FALLBACK
        );
        assert_eq!(
            fallback_response(
                &GenerationError::Model("bad weights".to_string()),
                severity,
                "medllama2"
            ),
            "The medical AI encountered an error: bad weights. Please try again later."
        );
        assert_eq!(
            fallback_response(
                &GenerationError::MalformedResponse("x".to_string()),
                severity,
                "medllama2"
            ),
            MALFORMED_FALLBACK
        );
        assert_eq!(
            fallback_response(&GenerationError::EmptyResponse, severity, "medllama2"),
            NO_RESPONSE_FALLBACK
        );
    }
}
