use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use std::io::Read;
use symptom_triage::utils::error::{ErrorSeverity, Result as TriageResult, TriageError};
use symptom_triage::utils::{logger, validation::Validate};
use symptom_triage::{CliConfig, TriageService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting symptom-triage CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match cli.resolve().and_then(|config| config.validate().map(|_| config)) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let service = match TriageService::from_config(&config) {
        Ok(service) => service,
        Err(e) => exit_with(&e),
    };

    if cli.health {
        return Ok(print_json(&service.health(), cli.pretty)?);
    }

    let symptoms = read_symptoms(&cli)?;

    if cli.explain {
        let assessment = service.engine().assess(&symptoms);
        return Ok(print_json(&assessment, cli.pretty)?);
    }

    if cli.offline {
        return Ok(print_json(&service.triage(&symptoms), cli.pretty)?);
    }

    let analysis = service.analyze(&symptoms).await;
    tracing::info!(
        "✅ Analysis completed (severity: {}, care pathway: {})",
        analysis.triage.severity,
        analysis.triage.pathway
    );
    Ok(print_json(&analysis, cli.pretty)?)
}

fn read_symptoms(cli: &CliConfig) -> anyhow::Result<String> {
    if let Some(symptoms) = &cli.symptoms {
        return Ok(symptoms.clone());
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read symptoms from stdin")?;
    Ok(buffer.trim_end().to_string())
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> TriageResult<()> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    println!("{}", output);
    Ok(())
}

fn exit_with(e: &TriageError) -> ! {
    tracing::error!(
        "❌ Startup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
