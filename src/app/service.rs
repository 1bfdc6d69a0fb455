use crate::adapters::{OllamaGenerator, PubMedRetriever, UnavailableGenerator, UnavailableRetriever};
use crate::app::fallback::{fallback_response, GENERIC_CONTEXT};
use crate::app::prompt::build_prompt;
use crate::config::toml_config::{TriageConfig, DEFAULT_MODEL};
use crate::core::engine::TriageEngine;
use crate::domain::model::{
    AnalysisResponse, ComponentState, ComponentStatus, HealthStatus, TriageResult,
};
use crate::domain::ports::{ContextRetriever, TextGenerator};
use crate::utils::error::Result;
use std::sync::Arc;

/// 對外的請求介面：分級、取得文獻背景、生成說明
///
/// 協作元件的實作在建構時決定一次，之後不再切換。
#[derive(Clone)]
pub struct TriageService {
    engine: Arc<TriageEngine>,
    retriever: Arc<dyn ContextRetriever>,
    generator: Arc<dyn TextGenerator>,
    model: String,
}

impl TriageService {
    pub fn new(
        engine: Arc<TriageEngine>,
        retriever: Arc<dyn ContextRetriever>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            engine,
            retriever,
            generator,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model_name(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn from_config(config: &TriageConfig) -> Result<Self> {
        let extra = config.rules.extra_patterns.by_tier();
        if !extra.is_empty() {
            tracing::info!(
                "🔧 Loading {} extra triage patterns",
                config.rules.extra_patterns.len()
            );
        }
        let engine = Arc::new(TriageEngine::with_extra_patterns(&extra)?);

        let retriever: Arc<dyn ContextRetriever> = if config.retrieval.enabled {
            tracing::info!("📚 PubMed retrieval enabled ({})", config.retrieval.endpoint);
            Arc::new(PubMedRetriever::new(config.retrieval.clone())?)
        } else {
            tracing::info!("📚 PubMed retrieval disabled");
            Arc::new(UnavailableRetriever)
        };

        let generator: Arc<dyn TextGenerator> = if config.generation.enabled {
            tracing::info!(
                "🤖 Ollama generation enabled ({}, model {})",
                config.generation.endpoint,
                config.generation.model
            );
            Arc::new(OllamaGenerator::new(config.generation.clone())?)
        } else {
            tracing::info!("🤖 Text generation disabled");
            Arc::new(UnavailableGenerator)
        };

        Ok(Self::new(engine, retriever, generator).with_model_name(&config.generation.model))
    }

    pub fn engine(&self) -> &TriageEngine {
        &self.engine
    }

    pub fn triage(&self, symptoms: &str) -> TriageResult {
        self.engine.triage(symptoms)
    }

    /// 永遠回傳結果；協作元件失敗時改用固定替代文字
    pub async fn analyze(&self, symptoms: &str) -> AnalysisResponse {
        let triage = self.engine.triage(symptoms);

        let context = match self.retriever.retrieve(symptoms).await {
            Ok(context) => {
                tracing::info!("📚 Retrieved medical context from PubMed");
                context
            }
            Err(e) => {
                tracing::warn!("⚠️ Error retrieving medical context: {}", e);
                GENERIC_CONTEXT.to_string()
            }
        };

        let prompt = build_prompt(symptoms, &triage, &context);

        let response = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    "⚠️ Text generation failed: {} (severity: {})",
                    e,
                    triage.severity
                );
                fallback_response(&e, triage.severity, &self.model)
            }
        };

        AnalysisResponse { response, triage }
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            components: ComponentStatus {
                triage: ComponentState::Active,
                rag: ComponentState::from_available(self.retriever.is_available()),
                llm: ComponentState::from_available(self.generator.is_available()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::fallback::{EMERGENCY_FALLBACK, TIMEOUT_FALLBACK};
    use crate::domain::model::{CarePathway, SeverityTier};
    use crate::utils::error::{GenerationError, RetrievalError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StaticRetriever(&'static str);

    #[async_trait]
    impl ContextRetriever for StaticRetriever {
        async fn retrieve(&self, _symptoms: &str) -> std::result::Result<String, RetrievalError> {
            Ok(self.0.to_string())
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    /// 記錄收到的提示詞
    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
        outcome: std::result::Result<String, GenerationError>,
    }

    impl RecordingGenerator {
        fn new(outcome: std::result::Result<String, GenerationError>) -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
                outcome,
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.outcome.clone()
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn service_with(
        retriever: Arc<dyn ContextRetriever>,
        generator: Arc<dyn TextGenerator>,
    ) -> TriageService {
        let engine = Arc::new(TriageEngine::new().unwrap());
        TriageService::new(engine, retriever, generator)
    }

    #[tokio::test]
    async fn test_analyze_passes_context_and_triage_into_prompt() {
        let generator = Arc::new(RecordingGenerator::new(Ok("Drink fluids.".to_string())));
        let service = service_with(Arc::new(StaticRetriever("Source 1:\nCold")), generator.clone());

        let response = service.analyze("common cold").await;

        assert_eq!(response.response, "Drink fluids.");
        assert_eq!(response.triage.severity, SeverityTier::SelfCare);
        assert_eq!(response.triage.pathway, CarePathway::SelfManagement);

        let prompts = generator.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- Severity: self-care"));
        assert!(prompts[0].contains("Source 1:\nCold"));
    }

    #[tokio::test]
    async fn test_retrieval_failure_uses_generic_context() {
        let generator = Arc::new(RecordingGenerator::new(Ok("ok".to_string())));
        let service = service_with(Arc::new(UnavailableRetriever), generator.clone());

        service.analyze("sore throat").await;

        assert!(generator.prompts()[0].contains(GENERIC_CONTEXT));
    }

    #[tokio::test]
    async fn test_emergency_fallback_on_generation_failure() {
        let service = service_with(
            Arc::new(UnavailableRetriever),
            Arc::new(RecordingGenerator::new(Err(GenerationError::Timeout))),
        );

        let response = service.analyze("crushing chest pain").await;
        assert_eq!(response.triage.severity, SeverityTier::Emergency);
        assert_eq!(response.response, EMERGENCY_FALLBACK);

        let response = service.analyze("runny nose").await;
        assert_eq!(response.response, TIMEOUT_FALLBACK);
    }

    #[test]
    fn test_health_reports_component_availability() {
        let service = service_with(Arc::new(UnavailableRetriever), Arc::new(UnavailableGenerator));
        let health = service.health();

        assert_eq!(health.status, "healthy");
        assert_eq!(health.components.triage, ComponentState::Active);
        assert_eq!(health.components.rag, ComponentState::Unavailable);
        assert_eq!(health.components.llm, ComponentState::Unavailable);
    }

    #[test]
    fn test_from_config_with_disabled_collaborators() {
        let mut config = TriageConfig::default();
        config.retrieval.enabled = false;
        config.generation.enabled = false;

        let service = TriageService::from_config(&config).unwrap();
        let health = service.health();

        assert_eq!(health.components.rag, ComponentState::Unavailable);
        assert_eq!(health.components.llm, ComponentState::Unavailable);
        assert_eq!(service.triage("chest pain").severity, SeverityTier::Emergency);
    }
}
