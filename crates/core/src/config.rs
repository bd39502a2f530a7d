use serde::Deserialize;

use crate::error::{CampaignError, CampaignResult};
use crate::types::Channel;

/// Root application configuration. Loaded from environment variables
/// with the prefix `CAMPAIGN_EXPRESS__` and an optional TOML config file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub grounding: GroundingConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

/// Text-generation backend settings. Without an `api_key` the service runs
/// in stub mode and every generation call site uses its fallback.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

/// Customer-database lookup used to ground audience generation.
#[derive(Debug, Clone, Deserialize)]
pub struct GroundingConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_grounding_table")]
    pub table: String,
    #[serde(default = "default_product_column")]
    pub product_column: String,
    #[serde(default = "default_location_column")]
    pub location_column: String,
    #[serde(default = "default_behavior_column")]
    pub behavior_column: String,
    #[serde(default = "default_max_values")]
    pub max_values: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionMode {
    /// Fixed priority policy only.
    #[default]
    Deterministic,
    /// Ask the model first, validated against the fixed policy.
    Llm,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub decision_mode: DecisionMode,
    #[serde(default = "default_channel_routing")]
    pub channel_routing: bool,
    #[serde(default = "default_channel")]
    pub default_channel: Channel,
    #[serde(default = "default_max_segments")]
    pub max_segments: usize,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

// Default functions
fn default_node_id() -> String {
    "node-01".to_string()
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_http_port() -> u16 {
    9000
}
fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}
fn default_llm_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_llm_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_output_tokens() -> u32 {
    2048
}
fn default_llm_timeout_secs() -> u64 {
    60
}
fn default_retry_backoff_ms() -> u64 {
    500
}
fn default_grounding_table() -> String {
    "customers".to_string()
}
fn default_product_column() -> String {
    "products".to_string()
}
fn default_location_column() -> String {
    "location".to_string()
}
fn default_behavior_column() -> String {
    "behavior".to_string()
}
fn default_max_values() -> usize {
    25
}
fn default_channel_routing() -> bool {
    true
}
fn default_channel() -> Channel {
    Channel::Email
}
fn default_max_segments() -> usize {
    5
}
fn default_max_steps() -> usize {
    10
}
fn default_metrics_port() -> u16 {
    9091
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_llm_model(),
            base_url: default_llm_base_url(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_llm_timeout_secs(),
            max_retries: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl Default for GroundingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            database_url: None,
            table: default_grounding_table(),
            product_column: default_product_column(),
            location_column: default_location_column(),
            behavior_column: default_behavior_column(),
            max_values: default_max_values(),
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            decision_mode: DecisionMode::default(),
            channel_routing: default_channel_routing(),
            default_channel: default_channel(),
            max_segments: default_max_segments(),
            max_steps: default_max_steps(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node_id: default_node_id(),
            api: ApiConfig::default(),
            llm: LlmConfig::default(),
            grounding: GroundingConfig::default(),
            workflow: WorkflowConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl LlmConfig {
    /// The configured key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl AppConfig {
    /// Load configuration from environment variables and an optional config file.
    ///
    /// `GOOGLE_API_KEY` is used when `CAMPAIGN_EXPRESS__LLM__API_KEY` is unset.
    pub fn load(path: Option<&str>) -> CampaignResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix("CAMPAIGN_EXPRESS")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("api.cors_origins"),
        );

        let mut config: AppConfig = builder.build()?.try_deserialize()?;
        if config.llm.api_key().is_none() {
            config.llm.api_key = std::env::var("GOOGLE_API_KEY").ok();
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CampaignResult<()> {
        if self.workflow.max_segments == 0 {
            return Err(CampaignError::Config(
                "workflow.max_segments must be at least 1".to_string(),
            ));
        }
        if self.workflow.max_steps < 3 {
            return Err(CampaignError::Config(
                "workflow.max_steps must allow the three workflow steps".to_string(),
            ));
        }
        if self.grounding.enabled && self.grounding.database_url.is_none() {
            return Err(CampaignError::Config(
                "grounding.database_url is required when grounding is enabled".to_string(),
            ));
        }
        Ok(())
    }
}
