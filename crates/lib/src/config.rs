//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.sweetmix/config.json`) and environment.
//! Secrets are usually supplied through the environment (`VERIFY_TOKEN`, `PAGE_TOKEN`,
//! `OPENAI_KEY`); the file carries endpoints and tuning.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP listener settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Messenger webhook and Send API settings.
    #[serde(default)]
    pub messenger: MessengerConfig,

    /// Completion service settings.
    #[serde(default)]
    pub completion: CompletionConfig,
}

/// Gateway bind and port.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port for HTTP (default 3000). Overridden by PORT env.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0"; the platform must reach the webhook).
    #[serde(default = "default_gateway_bind")]
    pub bind: String,
}

/// Messenger platform config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessengerConfig {
    /// Shared secret for the `hub.verify_token` handshake. Overridden by VERIFY_TOKEN env.
    pub verify_token: Option<String>,
    /// Page access token for the Send API. Overridden by PAGE_TOKEN env.
    pub page_token: Option<String>,
    /// Audio file sent for voice requests. Overridden by VOICE_SAMPLE_URL env.
    pub voice_sample_url: Option<String>,
    /// Graph API root (default "https://graph.facebook.com").
    #[serde(default = "default_graph_api_base")]
    pub graph_api_base: String,
    /// Graph API version segment (default "v20.0").
    #[serde(default = "default_graph_api_version")]
    pub graph_api_version: String,
}

/// Chat completion service config (OpenAI-compatible).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionConfig {
    /// Bearer key. Overridden by OPENAI_KEY env.
    pub api_key: Option<String>,
    /// API base including version (default "https://api.openai.com/v1").
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,
    #[serde(default = "default_completion_model")]
    pub model: String,
    #[serde(default = "default_completion_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_completion_temperature")]
    pub temperature: f32,
}

fn default_gateway_port() -> u16 {
    3000
}

fn default_gateway_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_graph_api_base() -> String {
    "https://graph.facebook.com".to_string()
}

fn default_graph_api_version() -> String {
    "v20.0".to_string()
}

fn default_completion_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_completion_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_completion_max_tokens() -> u32 {
    120
}

fn default_completion_temperature() -> f32 {
    0.9
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_gateway_port(),
            bind: default_gateway_bind(),
        }
    }
}

impl Default for MessengerConfig {
    fn default() -> Self {
        Self {
            verify_token: None,
            page_token: None,
            voice_sample_url: None,
            graph_api_base: default_graph_api_base(),
            graph_api_version: default_graph_api_version(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_completion_base_url(),
            model: default_completion_model(),
            max_tokens: default_completion_max_tokens(),
            temperature: default_completion_temperature(),
        }
    }
}

/// Trimmed, non-empty value of an env var.
fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

/// Env value wins over the configured one; blank values count as unset on both sides.
fn env_or(name: &str, configured: Option<&String>) -> Option<String> {
    env_value(name).or_else(|| {
        configured
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Resolve the webhook verify token: env VERIFY_TOKEN overrides config.
pub fn resolve_verify_token(config: &Config) -> Option<String> {
    env_or("VERIFY_TOKEN", config.messenger.verify_token.as_ref())
}

/// Resolve the page access token: env PAGE_TOKEN overrides config.
pub fn resolve_page_token(config: &Config) -> Option<String> {
    env_or("PAGE_TOKEN", config.messenger.page_token.as_ref())
}

/// Resolve the completion API key: env OPENAI_KEY overrides config.
pub fn resolve_completion_key(config: &Config) -> Option<String> {
    env_or("OPENAI_KEY", config.completion.api_key.as_ref())
}

/// Resolve the voice sample URL: env VOICE_SAMPLE_URL overrides config.
pub fn resolve_voice_sample_url(config: &Config) -> Option<String> {
    env_or("VOICE_SAMPLE_URL", config.messenger.voice_sample_url.as_ref())
}

/// Apply env PORT over the configured port. Unparseable values are ignored.
pub fn apply_port_env(config: &mut Config) {
    if let Some(raw) = env_value("PORT") {
        match raw.parse::<u16>() {
            Ok(p) => config.gateway.port = p,
            Err(_) => log::warn!("ignoring invalid PORT value: {}", raw),
        }
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("SWEETMIX_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".sweetmix").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path (or SWEETMIX_CONFIG_PATH / default). Missing file => default config.
/// PORT env is applied on top. Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let mut config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    apply_port_env(&mut config);
    Ok((config, path))
}
