#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "lambda")]
use std::sync::Arc;
#[cfg(feature = "lambda")]
use symptom_triage::domain::model::{AnalysisResponse, HealthStatus};
#[cfg(feature = "lambda")]
use symptom_triage::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use symptom_triage::{LambdaConfig, TriageService};

#[cfg(feature = "lambda")]
#[derive(Debug, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Request {
    AnalyzeSymptoms { symptoms: String },
    Health,
}

#[cfg(feature = "lambda")]
#[derive(Serialize)]
#[serde(untagged)]
pub enum Response {
    Analysis(AnalysisResponse),
    Health(HealthStatus),
}

#[cfg(feature = "lambda")]
async fn function_handler(
    service: Arc<TriageService>,
    event: LambdaEvent<Request>,
) -> Result<Response, Error> {
    match event.payload {
        Request::AnalyzeSymptoms { symptoms } => {
            tracing::info!("Analyzing symptoms ({} chars)", symptoms.len());
            let analysis = service.analyze(&symptoms).await;
            tracing::info!(
                "✅ Analysis completed (severity: {})",
                analysis.triage.severity
            );
            Ok(Response::Analysis(analysis))
        }
        Request::Health => Ok(Response::Health(service.health())),
    }
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    tracing::info!("Starting symptom-triage Lambda function");

    // 冷啟動時建立一次，之後的呼叫共用
    let lambda_config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    lambda_config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let service = Arc::new(
        TriageService::from_config(&lambda_config.triage)
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?,
    );

    run(service_fn(move |event: LambdaEvent<Request>| {
        let service = Arc::clone(&service);
        async move { function_handler(service, event).await }
    }))
    .await
}
