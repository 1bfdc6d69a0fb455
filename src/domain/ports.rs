use crate::utils::error::{GenerationError, RetrievalError};
use async_trait::async_trait;

/// 醫學文獻背景資料來源
#[async_trait]
pub trait ContextRetriever: Send + Sync {
    async fn retrieve(&self, symptoms: &str) -> Result<String, RetrievalError>;

    /// 建構時決定，不做即時探測
    fn is_available(&self) -> bool;
}

/// 生成式文字服務
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    fn is_available(&self) -> bool;
}
