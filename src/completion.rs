//! Completion API client.
//!
//! Sends one blocking POST per run to a text-completion endpoint; there is no
//! retry.

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::OpenAiConfig;

/// Fixed wait for the whole request, including connect.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Failure to obtain a response from the completion API.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Request to completion API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Completion API returned HTTP {0}")]
    Status(StatusCode),
}

/// JSON body of a completion request.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub prompt: String,
    pub model: &'a str,
    pub max_tokens: u32,
    pub n: u32,
    pub stop: Option<&'a str>,
    pub temperature: f32,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(config: &'a OpenAiConfig, prompt: String) -> Self {
        Self {
            prompt,
            model: &config.model,
            max_tokens: config.max_tokens,
            n: config.n,
            stop: config.stop.as_deref(),
            temperature: config.temperature,
        }
    }
}

/// Decoded completion response. Only the candidate texts are used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub text: String,
}

impl CompletionResponse {
    /// Text of the first candidate, if the API returned any.
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.text.as_str())
    }
}

/// Anything that can turn a prompt into a completion.
pub trait Completer {
    fn complete(&self, prompt: &str) -> Result<CompletionResponse, CompletionError>;
}

/// Builds the prompt: instruction line(s), then the OCR text.
pub fn compose_prompt(instruction: &str, text: &str) -> String {
    format!("{}\n{}", instruction, text)
}

/// HTTP client for an OpenAI-style `/v1/completions` endpoint.
pub struct CompletionClient<'a> {
    config: &'a OpenAiConfig,
    http: Client,
}

impl<'a> CompletionClient<'a> {
    pub fn new(config: &'a OpenAiConfig) -> Result<Self, CompletionError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { config, http })
    }
}

impl Completer for CompletionClient<'_> {
    fn complete(&self, prompt: &str) -> Result<CompletionResponse, CompletionError> {
        let body = CompletionRequest::new(self.config, prompt.to_string());

        crate::log(&format!(
            "POST {} (model={}, prompt {} chars)",
            self.config.endpoint,
            body.model,
            body.prompt.chars().count()
        ));

        // json() also sets Content-Type: application/json
        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(CompletionError::Status(status));
        }

        let decoded: CompletionResponse = response.json()?;
        crate::log(&format!("Completion received ({} choices)", decoded.choices.len()));
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    fn config() -> Config {
        Config::from_json_str(
            r#"{"OPENAI": {"API_KEY": "sk-test", "MAX_TOKENS": 64, "N": 1, "TEMPERATURE": 0.5}}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let config = config();
        let request = CompletionRequest::new(&config.openai, "Explain:\nhello".to_string());

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "prompt": "Explain:\nhello",
                "model": "text-davinci-002",
                "max_tokens": 64,
                "n": 1,
                "stop": null,
                "temperature": 0.5
            })
        );
    }

    #[test]
    fn test_request_body_with_stop() {
        let mut config = config();
        config.openai.stop = Some("\n\n".to_string());
        let request = CompletionRequest::new(&config.openai, String::new());

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["stop"], "\n\n");
    }

    #[test]
    fn test_compose_prompt() {
        assert_eq!(compose_prompt("Explain:", "text"), "Explain:\ntext");
        assert_eq!(compose_prompt("", ""), "\n");
    }

    #[test]
    fn test_response_first_text() {
        let response: CompletionResponse = serde_json::from_str(
            r#"{"id": "cmpl-1", "choices": [{"text": "\nTitle: X", "index": 0}, {"text": "other"}]}"#,
        )
        .unwrap();
        assert_eq!(response.first_text(), Some("\nTitle: X"));
    }

    #[test]
    fn test_response_without_choices() {
        let response: CompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(response.first_text(), None);

        let response: CompletionResponse = serde_json::from_str(r#"{"object": "x"}"#).unwrap();
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn test_client_builds() {
        let config = config();
        assert!(CompletionClient::new(&config.openai).is_ok());
    }
}
