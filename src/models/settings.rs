//! Settings Models
//!
//! Application configuration stored in config.json.

use std::time::Duration;

use sales_assistant_geo::HereConfig;
use sales_assistant_llm::CortexConfig;
use serde::{Deserialize, Serialize};

/// Application configuration stored in config.json
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Agent, analyst, search and SQL settings
    #[serde(default)]
    pub cortex: CortexSettings,
    /// Geocoding and routing settings
    #[serde(default)]
    pub here: HereSettings,
}

/// Snowflake Cortex settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CortexSettings {
    /// e.g. `https://myorg-myaccount.snowflakecomputing.com`
    #[serde(default)]
    pub account_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// e.g. `PROGRAMMATIC_ACCESS_TOKEN`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_semantic_model_file")]
    pub semantic_model_file: String,
    #[serde(default = "default_search_service")]
    pub search_service: String,
    #[serde(default = "default_search_id_column")]
    pub search_id_column: String,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    /// Request timeout in milliseconds
    #[serde(default = "default_cortex_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_model() -> String {
    sales_assistant_llm::cortex::DEFAULT_MODEL.to_string()
}

fn default_semantic_model_file() -> String {
    "@pnp.etremblay.models/sales_metrics_model.yaml".to_string()
}

fn default_search_service() -> String {
    "pnp.etremblay.sales_conversation_search".to_string()
}

fn default_search_id_column() -> String {
    "conversation_id".to_string()
}

fn default_search_limit() -> u32 {
    10
}

fn default_cortex_timeout_ms() -> u64 {
    50_000
}

impl Default for CortexSettings {
    fn default() -> Self {
        Self {
            account_url: String::new(),
            token: None,
            token_type: None,
            model: default_model(),
            semantic_model_file: default_semantic_model_file(),
            search_service: default_search_service(),
            search_id_column: default_search_id_column(),
            search_limit: default_search_limit(),
            timeout_ms: default_cortex_timeout_ms(),
        }
    }
}

impl CortexSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Connection settings for the agent provider
    pub fn provider_config(&self) -> CortexConfig {
        CortexConfig {
            account_url: self.account_url.clone(),
            token: self.token.clone(),
            token_type: self.token_type.clone(),
            model: self.model.clone(),
            timeout: self.timeout(),
        }
    }
}

/// HERE map service settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HereSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,
    #[serde(default = "default_primary_routing_url")]
    pub primary_routing_url: String,
    #[serde(default = "default_secondary_routing_url")]
    pub secondary_routing_url: String,
    #[serde(default = "default_transport_mode")]
    pub transport_mode: String,
    /// Request timeout in seconds
    #[serde(default = "default_here_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_geocode_url() -> String {
    sales_assistant_geo::here::GEOCODE_URL.to_string()
}

fn default_primary_routing_url() -> String {
    sales_assistant_geo::here::ROUTING_V8_URL.to_string()
}

fn default_secondary_routing_url() -> String {
    sales_assistant_geo::here::ROUTING_V7_URL.to_string()
}

fn default_transport_mode() -> String {
    "car".to_string()
}

fn default_here_timeout_secs() -> u64 {
    30
}

impl Default for HereSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            geocode_url: default_geocode_url(),
            primary_routing_url: default_primary_routing_url(),
            secondary_routing_url: default_secondary_routing_url(),
            transport_mode: default_transport_mode(),
            timeout_secs: default_here_timeout_secs(),
        }
    }
}

impl HereSettings {
    pub fn client_config(&self) -> HereConfig {
        HereConfig {
            api_key: self.api_key.clone(),
            geocode_url: self.geocode_url.clone(),
            primary_routing_url: self.primary_routing_url.clone(),
            secondary_routing_url: self.secondary_routing_url.clone(),
            transport_mode: self.transport_mode.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

impl AppConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.cortex.model.trim().is_empty() {
            return Err("cortex.model must not be empty".to_string());
        }
        if self.cortex.timeout_ms == 0 {
            return Err("cortex.timeout_ms must be greater than 0".to_string());
        }
        if self.cortex.search_limit == 0 {
            return Err("cortex.search_limit must be greater than 0".to_string());
        }
        if self.here.timeout_secs == 0 {
            return Err("here.timeout_secs must be greater than 0".to_string());
        }
        if self.here.transport_mode.trim().is_empty() {
            return Err("here.transport_mode must not be empty".to_string());
        }
        Ok(())
    }
}
