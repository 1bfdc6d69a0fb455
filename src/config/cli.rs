use crate::config::toml_config::TriageConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "symptom-triage")]
#[command(about = "Rule-based symptom triage with literature context and LLM explanation")]
pub struct CliConfig {
    /// Symptom description; read from stdin when omitted
    #[arg(short, long)]
    pub symptoms: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Run the rule engine only, without retrieval or generation
    #[arg(long)]
    pub offline: bool,

    /// Print the per-unit classification trace
    #[arg(long)]
    pub explain: bool,

    /// Print component availability and exit
    #[arg(long)]
    pub health: bool,

    /// Override the Ollama endpoint
    #[arg(long)]
    pub ollama_endpoint: Option<String>,

    /// Override the generation model
    #[arg(long)]
    pub model: Option<String>,

    /// Disable PubMed context retrieval
    #[arg(long)]
    pub no_retrieval: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// 載入配置檔（若有）並套用命令列覆蓋設定
    pub fn resolve(&self) -> Result<TriageConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                TriageConfig::from_file(path)?
            }
            None => TriageConfig::default(),
        };

        if let Some(endpoint) = &self.ollama_endpoint {
            config.generation.endpoint = endpoint.clone();
            tracing::info!("🔧 Ollama endpoint overridden to: {}", endpoint);
        }
        if let Some(model) = &self.model {
            config.generation.model = model.clone();
            tracing::info!("🔧 Model overridden to: {}", model);
        }
        if self.no_retrieval || self.offline {
            config.retrieval.enabled = false;
        }
        if self.offline {
            config.generation.enabled = false;
        }

        Ok(config)
    }
}
