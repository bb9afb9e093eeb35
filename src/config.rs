//! Run configuration loaded from config.json.
//!
//! The file mirrors the original key/value layout: an `OPENAI` section with
//! the completion parameters and a `NOTIFICATION` section with the user-facing
//! messages. It is loaded once at startup into an immutable [`Config`] that is
//! passed by reference to each stage of the pipeline.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Label that opens every structured response.
pub const TITLE_LABEL: &str = "Title";
/// Label holding the reference link.
pub const REFERENCE_LABEL: &str = "Reference";
/// Label holding the display text for the reference link.
pub const REFERENCE_TITLE_LABEL: &str = "Reference Title";

const CONFIG_FILE_NAME: &str = "config.json";

/// Errors raised while locating, reading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No config.json was found (looked in: {0})")]
    NotFound(String),
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}. Your configuration file may not have been configured correctly.")]
    Parse(#[from] serde_json::Error),
    #[error("{0} was not found in your configuration file, or it may not have been configured correctly.")]
    Missing(&'static str),
}

/// Complete run configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(rename = "OPENAI")]
    pub openai: OpenAiConfig,
    #[serde(rename = "NOTIFICATION", default)]
    pub notification: NotificationConfig,
}

/// Completion API parameters.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct OpenAiConfig {
    /// Bearer token for the completion API
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Number of completions to request
    #[serde(default = "default_n")]
    pub n: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub stop: Option<String>,
    /// Text placed before the OCR output in the prompt
    #[serde(default)]
    pub instruction: String,
    /// Caller-defined section labels, e.g. `["About", "Summary"]`
    #[serde(default, deserialize_with = "deserialize_response_keys")]
    pub response_keys: Vec<String>,
}

/// User-facing notification settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct NotificationConfig {
    pub network_error_msg: String,
    pub no_response_msg: String,
    /// Seconds the notification stays on screen
    pub timeout: u32,
}

fn default_max_tokens() -> u32 {
    16
}

fn default_n() -> u32 {
    1
}

fn default_temperature() -> f32 {
    1.0
}

fn default_endpoint() -> String {
    "https://api.openai.com/v1/completions".to_string()
}

fn default_model() -> String {
    "text-davinci-002".to_string()
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            network_error_msg: "Network Error Occurred".to_string(),
            no_response_msg: String::new(),
            timeout: 10,
        }
    }
}

/// RESPONSE_KEYS may be written as a JSON list or a comma-separated string.
fn deserialize_response_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Keys {
        List(Vec<String>),
        Joined(String),
    }

    let keys = match Keys::deserialize(deserializer)? {
        Keys::List(list) => list,
        Keys::Joined(joined) => joined.split(',').map(str::to_string).collect(),
    };

    Ok(keys
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect())
}

impl Config {
    /// Parses and validates a configuration from JSON text.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from `path`, or from the first default location
    /// that exists when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => find_config_path()?,
        };

        crate::log(&format!("Loading config from: {}", config_path.display()));

        let contents = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        let config = Self::from_json_str(&contents)?;

        crate::log(&format!(
            "Config loaded (model={}, max_tokens={}, n={}, {} response keys)",
            config.openai.model,
            config.openai.max_tokens,
            config.openai.n,
            config.openai.response_keys.len()
        ));

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.openai.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("API_KEY"));
        }
        if self.openai.endpoint.trim().is_empty() {
            return Err(ConfigError::Missing("ENDPOINT"));
        }
        if self.openai.model.trim().is_empty() {
            return Err(ConfigError::Missing("MODEL"));
        }
        Ok(())
    }

    /// Effective section labels: Title first, the configured keys, then the
    /// two reference labels last.
    pub fn categories(&self) -> Vec<String> {
        let reserved = [TITLE_LABEL, REFERENCE_LABEL, REFERENCE_TITLE_LABEL];

        let mut categories = vec![TITLE_LABEL.to_string()];
        for key in &self.openai.response_keys {
            if !reserved.contains(&key.as_str()) && !categories.contains(key) {
                categories.push(key.clone());
            }
        }
        categories.push(REFERENCE_LABEL.to_string());
        categories.push(REFERENCE_TITLE_LABEL.to_string());
        categories
    }

    /// Instruction placed before the OCR text in the prompt.
    ///
    /// An explicit INSTRUCTION wins. Otherwise, when response keys are
    /// configured, one is generated that asks for the labelled layout the
    /// response formatter expects.
    pub fn instruction(&self) -> String {
        if !self.openai.instruction.is_empty() || self.openai.response_keys.is_empty() {
            return self.openai.instruction.clone();
        }

        let labels = self
            .categories()
            .iter()
            .map(|label| format!("{}:", label))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Answer the text below. Structure the answer with the following labels, \
             each at the start of its own line:\n{}\n",
            labels
        )
    }
}

/// Returns the first existing config.json: next to the executable, then in
/// the user config directory.
fn find_config_path() -> Result<PathBuf, ConfigError> {
    let mut candidates = vec![crate::paths::get_exe_dir().join(CONFIG_FILE_NAME)];
    if let Some(user_path) = crate::paths::get_user_config_path() {
        candidates.push(user_path);
    }

    if let Some(found) = candidates.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let searched = candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(ConfigError::NotFound(searched))
}
