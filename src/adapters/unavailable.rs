use crate::domain::ports::{ContextRetriever, TextGenerator};
use crate::utils::error::{GenerationError, RetrievalError};
use async_trait::async_trait;

/// 停用檢索時使用，永遠回報不可用
#[derive(Debug, Clone, Default)]
pub struct UnavailableRetriever;

#[async_trait]
impl ContextRetriever for UnavailableRetriever {
    async fn retrieve(&self, _symptoms: &str) -> Result<String, RetrievalError> {
        Err(RetrievalError::Unavailable)
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// 停用生成時使用
#[derive(Debug, Clone, Default)]
pub struct UnavailableGenerator;

#[async_trait]
impl TextGenerator for UnavailableGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unreachable(
            "text generation is disabled".to_string(),
        ))
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_collaborators_always_fail() {
        let retriever = UnavailableRetriever;
        let generator = UnavailableGenerator;

        assert!(!retriever.is_available());
        assert!(!generator.is_available());
        assert!(matches!(
            tokio_test::block_on(retriever.retrieve("fever")),
            Err(RetrievalError::Unavailable)
        ));
        assert!(matches!(
            tokio_test::block_on(generator.generate("prompt")),
            Err(GenerationError::Unreachable(_))
        ));
    }
}
