use std::{path::PathBuf, str::FromStr, time::Duration};

use serde::Deserialize;
use serde_with::serde_as;
use strum::{Display, EnumString};

use crate::domain::qa::{IndexerConfig, QaConfig, QaError};

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub pinecone: PineconeSettings,
    pub llm: LlmSettings,
    pub data: DataSettings,
    pub retrieval: RetrievalSettings,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub port: u16,
    pub host: String,
    pub app_url: String,
    /// Create the vector index and upsert documents on startup
    #[serde(default = "default_true")]
    pub index_on_startup: bool,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct PineconeSettings {
    #[serde(default)]
    pub api_key: String,
    pub cloud: String,
    pub region: String,
    pub index_name: String,
    pub embedding_model: String,
    pub namespace: String,
    #[serde(default)]
    pub control_plane_url: Option<String>,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub ready_timeout_secs: u64,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct LlmSettings {
    pub model: String,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub temperature: f64,
    /// Zero disables the timeout
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Clone)]
pub struct DataSettings {
    pub faq_path: PathBuf,
    pub funds_path: PathBuf,
}

#[serde_as]
#[derive(Deserialize, Clone)]
pub struct RetrievalSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub default_top_k: usize,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub max_top_k: usize,
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub lexical_candidates: usize,
}

const PINECONE_API_KEY_VAR: &str = "PINECONE_API_KEY";

fn default_true() -> bool {
    true
}

impl PineconeSettings {
    /// Returns the configured API key, falling back to `PINECONE_API_KEY`.
    pub fn require_api_key(&self) -> Result<String, QaError> {
        self.api_key_or(std::env::var(PINECONE_API_KEY_VAR).ok())
    }

    fn api_key_or(&self, fallback: Option<String>) -> Result<String, QaError> {
        [Some(self.api_key.clone()), fallback]
            .into_iter()
            .flatten()
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .ok_or_else(|| {
                QaError::Configuration(format!(
                    "missing Pinecone credentials (set {} or QONFIDO_PINECONE__API_KEY)",
                    PINECONE_API_KEY_VAR
                ))
            })
    }

    pub fn indexer_config(&self) -> IndexerConfig {
        IndexerConfig {
            index_name: self.index_name.clone(),
            namespace: self.namespace.clone(),
            embedding_model: self.embedding_model.clone(),
            cloud: self.cloud.clone(),
            region: self.region.clone(),
            ready_timeout: Duration::from_secs(self.ready_timeout_secs),
            ..Default::default()
        }
    }
}

impl Settings {
    pub fn qa_config(&self) -> QaConfig {
        QaConfig {
            default_top_k: self.retrieval.default_top_k,
            max_top_k: self.retrieval.max_top_k,
            synthesis_timeout: (self.llm.timeout_secs > 0)
                .then(|| Duration::from_secs(self.llm.timeout_secs)),
        }
    }
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("current directory: {}", e)))?;
    let config_directory = base_path.join("config");

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .map_err(|e| config::ConfigError::Message(format!("Failed to parse APP_ENVIRONMENT: {}", e)))?;
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .add_source(config::File::from(config_directory.join("base.yaml")))
        .add_source(config::File::from(
            config_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("QONFIDO")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}
