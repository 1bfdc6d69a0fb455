use crate::config::GenerationConfig;
use crate::domain::ports::TextGenerator;
use crate::utils::error::{GenerationError, Result as TriageResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

#[derive(Debug, Clone)]
struct ProbeRecord {
    checked_at: Instant,
    outcome: Result<(), GenerationError>,
}

/// Ollama `/api/generate` 用戶端
///
/// 每次生成前先確認服務與模型可用，探測結果依 `probe_ttl_seconds` 快取。
/// 快取過期後，探測期間鎖不釋放：同時進來的 `generate` 會等待同一次探測，
/// 最久約 `probe_timeout_seconds`，然後共用其結果。
pub struct OllamaGenerator {
    client: Client,
    config: GenerationConfig,
    probe_cache: Mutex<Option<ProbeRecord>>,
}

impl OllamaGenerator {
    pub fn new(config: GenerationConfig) -> TriageResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.probe_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            probe_cache: Mutex::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint.trim_end_matches('/'), path)
    }

    /// 確認 Ollama 可用且已載入設定的模型；同一時間只有一次探測請求
    pub async fn probe(&self) -> Result<(), GenerationError> {
        let ttl = Duration::from_secs(self.config.probe_ttl_seconds);
        let mut cache = self.probe_cache.lock().await;

        if let Some(record) = cache.as_ref() {
            if record.checked_at.elapsed() < ttl {
                return record.outcome.clone();
            }
        }

        let outcome = self.check_model().await;
        if let Err(e) = &outcome {
            tracing::warn!("⚠️ Ollama probe failed: {}", e);
        }
        *cache = Some(ProbeRecord {
            checked_at: Instant::now(),
            outcome: outcome.clone(),
        });
        outcome
    }

    async fn check_model(&self) -> Result<(), GenerationError> {
        let response = self
            .client
            .get(self.url("/api/tags"))
            .timeout(Duration::from_secs(self.config.probe_timeout_seconds))
            .send()
            .await
            .map_err(|e| {
                GenerationError::Unreachable(format!("Ollama service is not running: {}", e))
            })?;

        if response.status() != StatusCode::OK {
            return Err(GenerationError::Unreachable(format!(
                "Ollama health check failed with status {}",
                response.status()
            )));
        }

        let tags: TagsResponse = response.json().await.map_err(|_| {
            GenerationError::Unreachable("Error checking Ollama model availability".to_string())
        })?;

        let model = &self.config.model;
        let latest = format!("{}:latest", model);
        if tags
            .models
            .iter()
            .any(|tag| &tag.name == model || tag.name == latest)
        {
            Ok(())
        } else {
            Err(GenerationError::ModelUnavailable {
                model: model.clone(),
            })
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.probe().await?;

        let body = serde_json::json!({
            "model": self.config.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "num_predict": self.config.num_predict,
                "temperature": self.config.temperature,
                "num_ctx": self.config.num_ctx,
                "num_gpu": self.config.num_gpu,
            }
        });

        tracing::debug!("📡 Sending prompt to Ollama model {}", self.config.model);
        let response = self
            .client
            .post(self.url("/api/generate"))
            .json(&body)
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .send()
            .await?;

        let text = response.text().await?;
        parse_generation_body(&text)
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// 解析非串流的生成回應；含 `error` 欄位時視為模型錯誤，缺少 `response` 時為空回應
pub fn parse_generation_body(body: &str) -> Result<String, GenerationError> {
    let value: serde_json::Value = serde_json::from_str(body.trim())
        .map_err(|_| GenerationError::MalformedResponse(body.trim().to_string()))?;

    if let Some(error) = value.get("error") {
        let message = error
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        tracing::warn!("⚠️ Ollama error: {}", message);
        return Err(GenerationError::Model(message));
    }

    value
        .get("response")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or(GenerationError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config_for(server: &MockServer) -> GenerationConfig {
        GenerationConfig {
            endpoint: server.base_url(),
            timeout_seconds: 1,
            probe_timeout_seconds: 1,
            ..GenerationConfig::default()
        }
    }

    fn tags_mock<'a>(server: &'a MockServer, names: &[&str]) -> httpmock::Mock<'a> {
        let models: Vec<serde_json::Value> = names
            .iter()
            .map(|name| serde_json::json!({ "name": name }))
            .collect();
        server.mock(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(200)
                .json_body(serde_json::json!({ "models": models }));
        })
    }

    #[test]
    fn test_parse_generation_body() {
        assert_eq!(
            parse_generation_body(r#"{"response": "Rest and fluids."}"#).unwrap(),
            "Rest and fluids."
        );
        assert_eq!(
            parse_generation_body(r#"{"done": true}"#),
            Err(GenerationError::EmptyResponse)
        );
        assert_eq!(
            parse_generation_body(r#"{"error": "model requires more system memory"}"#),
            Err(GenerationError::Model(
                "model requires more system memory".to_string()
            ))
        );
        assert!(matches!(
            parse_generation_body("not json"),
            Err(GenerationError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_generate_success() {
        let server = MockServer::start();
        let tags = tags_mock(&server, &["medllama2:latest"]);
        let generate = server.mock(|when, then| {
            when.method(POST)
                .path("/api/generate")
                .json_body_partial(r#"{"model": "medllama2", "stream": false}"#);
            then.status(200)
                .json_body(serde_json::json!({ "response": "Likely a viral infection." }));
        });

        let generator = OllamaGenerator::new(config_for(&server)).unwrap();
        let text = generator.generate("prompt").await.unwrap();

        tags.assert();
        generate.assert();
        assert_eq!(text, "Likely a viral infection.");
    }

    #[tokio::test]
    async fn test_probe_result_is_cached() {
        let server = MockServer::start();
        let tags = tags_mock(&server, &["medllama2"]);
        let generate = server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200)
                .json_body(serde_json::json!({ "response": "ok" }));
        });

        let generator = OllamaGenerator::new(config_for(&server)).unwrap();
        generator.generate("first").await.unwrap();
        generator.generate("second").await.unwrap();

        tags.assert_hits(1);
        generate.assert_hits(2);
    }

    #[tokio::test]
    async fn test_missing_model() {
        let server = MockServer::start();
        tags_mock(&server, &["llama3:latest"]);

        let generator = OllamaGenerator::new(config_for(&server)).unwrap();
        let result = generator.generate("prompt").await;

        assert_eq!(
            result,
            Err(GenerationError::ModelUnavailable {
                model: "medllama2".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_health_check_failure_is_unreachable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(500);
        });

        let generator = OllamaGenerator::new(config_for(&server)).unwrap();
        let result = generator.generate("prompt").await;

        assert!(matches!(result, Err(GenerationError::Unreachable(_))));
    }

    #[tokio::test]
    async fn test_generate_timeout() {
        let server = MockServer::start();
        tags_mock(&server, &["medllama2"]);
        server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200)
                .delay(Duration::from_secs(3))
                .json_body(serde_json::json!({ "response": "too late" }));
        });

        let generator = OllamaGenerator::new(config_for(&server)).unwrap();
        let result = generator.generate("prompt").await;

        assert_eq!(result, Err(GenerationError::Timeout));
    }

    #[tokio::test]
    async fn test_concurrent_generates_share_one_probe() {
        let server = MockServer::start();
        let tags = server.mock(|when, then| {
            when.method(GET).path("/api/tags");
            then.status(200)
                .delay(Duration::from_millis(300))
                .json_body(serde_json::json!({ "models": [{ "name": "medllama2" }] }));
        });
        let generate = server.mock(|when, then| {
            when.method(POST).path("/api/generate");
            then.status(200)
                .json_body(serde_json::json!({ "response": "ok" }));
        });

        let generator = OllamaGenerator::new(config_for(&server)).unwrap();
        let (first, second, third) = tokio::join!(
            generator.generate("a"),
            generator.generate("b"),
            generator.generate("c")
        );

        assert!(first.is_ok() && second.is_ok() && third.is_ok());
        tags.assert_hits(1);
        generate.assert_hits(3);
    }
}
