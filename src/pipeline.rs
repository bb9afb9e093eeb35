//! Run sequencing: capture → OCR → completion → formatted output.
//!
//! Every run ends in exactly one [`Outcome`], and each outcome shows exactly
//! one notification. Nothing is retried.

use std::path::Path;
use thiserror::Error;

use crate::capture;
use crate::completion::{compose_prompt, Completer, CompletionError};
use crate::config::{Config, ConfigError, NotificationConfig};
use crate::desktop::Desktop;
use crate::notify::{ClipboardSink, Notifier};
use crate::ocr;
use crate::response::{format_response, NotificationPayload};

/// Terminal failures of a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Network(#[from] CompletionError),
    #[error("Completion API returned no choices")]
    EmptyResponse,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NoResponse,
    NetworkError,
    ConfigError,
}

impl Outcome {
    /// Process exit code. Only network and config failures are non-zero.
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success | Outcome::NoResponse => 0,
            Outcome::NetworkError => 1,
            Outcome::ConfigError => 2,
        }
    }
}

impl PipelineError {
    pub fn outcome(&self) -> Outcome {
        match self {
            PipelineError::Config(_) => Outcome::ConfigError,
            PipelineError::Network(_) => Outcome::NetworkError,
            PipelineError::EmptyResponse => Outcome::NoResponse,
        }
    }

    /// Message shown to the user. Config errors describe themselves; the
    /// others use the configured fixed messages.
    pub fn user_message(&self, messages: &NotificationConfig) -> String {
        match self {
            PipelineError::Config(e) => e.to_string(),
            PipelineError::Network(_) => messages.network_error_msg.clone(),
            PipelineError::EmptyResponse => messages.no_response_msg.clone(),
        }
    }
}

/// Shows the error notification for `err` and returns the matching outcome.
pub fn report_failure(
    err: &PipelineError,
    messages: &NotificationConfig,
    notifier: &dyn Notifier,
) -> Outcome {
    crate::log(&format!("Run failed: {}", err));

    let note = NotificationPayload::error(err.user_message(messages));
    if let Err(e) = notifier.notify(&note) {
        crate::log(&format!("Failed to send error notification: {:#}", e));
    }
    err.outcome()
}

/// Captures a region (or uses `image`) and returns its OCR text.
///
/// Capture and OCR failures are logged and yield empty text; the run carries
/// on with it.
pub fn acquire_text(desktop: Desktop, image: Option<&Path>) -> String {
    let screenshot_path = crate::paths::get_screenshot_path();
    let path = match image {
        Some(p) => p,
        None => {
            if let Err(e) = capture::capture_region(desktop, &screenshot_path) {
                crate::log(&format!("Capture failed: {:#}", e));
            }
            screenshot_path.as_path()
        }
    };

    match ocr::read_text_from_image(path) {
        Ok(text) => text,
        Err(e) => {
            crate::log(&format!("OCR failed: {:#}", e));
            String::new()
        }
    }
}

/// Sends `question` to the completion API and returns the first candidate.
pub fn fetch_completion(
    config: &Config,
    question: &str,
    completer: &dyn Completer,
) -> Result<String, PipelineError> {
    let prompt = compose_prompt(&config.instruction(), question);
    let response = completer.complete(&prompt)?;
    response
        .first_text()
        .map(|text| text.trim().to_string())
        .ok_or(PipelineError::EmptyResponse)
}

/// Answers `question` and dispatches the result.
///
/// On success the notification is shown before the clipboard is written,
/// since the clipboard write may block until another application takes the
/// selection over.
pub fn answer(
    config: &Config,
    question: &str,
    rich_text: bool,
    completer: &dyn Completer,
    notifier: &dyn Notifier,
    clipboard: Option<&dyn ClipboardSink>,
) -> Outcome {
    let raw = match fetch_completion(config, question, completer) {
        Ok(raw) => raw,
        Err(e) => return report_failure(&e, &config.notification, notifier),
    };

    let formatted = format_response(question, &raw, &config.categories(), rich_text);

    if let Err(e) = notifier.notify(&formatted.notification) {
        crate::log(&format!("Failed to send notification: {:#}", e));
    }
    if let Some(clipboard) = clipboard {
        if let Err(e) = clipboard.write_text(&formatted.clipboard) {
            crate::log(&format!("Failed to write clipboard: {:#}", e));
        }
    }

    Outcome::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{Choice, CompletionResponse};
    use crate::response::Icon;
    use reqwest::StatusCode;
    use std::cell::RefCell;

    struct FakeCompleter {
        result: fn() -> Result<CompletionResponse, CompletionError>,
        prompts: RefCell<Vec<String>>,
    }

    impl FakeCompleter {
        fn new(result: fn() -> Result<CompletionResponse, CompletionError>) -> Self {
            Self {
                result,
                prompts: RefCell::new(Vec::new()),
            }
        }
    }

    impl Completer for FakeCompleter {
        fn complete(&self, prompt: &str) -> Result<CompletionResponse, CompletionError> {
            self.prompts.borrow_mut().push(prompt.to_string());
            (self.result)()
        }
    }

    #[derive(Default)]
    struct Recorder {
        notes: RefCell<Vec<NotificationPayload>>,
        clips: RefCell<Vec<String>>,
    }

    impl Notifier for Recorder {
        fn notify(&self, note: &NotificationPayload) -> anyhow::Result<()> {
            self.notes.borrow_mut().push(note.clone());
            Ok(())
        }
    }

    impl ClipboardSink for Recorder {
        fn write_text(&self, text: &str) -> anyhow::Result<()> {
            self.clips.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn config() -> Config {
        Config::from_json_str(
            r#"{
                "OPENAI": {"API_KEY": "k", "INSTRUCTION": "Explain:", "RESPONSE_KEYS": ["About"]},
                "NOTIFICATION": {"NETWORK_ERROR_MSG": "Offline", "NO_RESPONSE_MSG": "Nothing"}
            }"#,
        )
        .unwrap()
    }

    fn flag_response() -> Result<CompletionResponse, CompletionError> {
        Ok(CompletionResponse {
            choices: vec![Choice {
                text: "\n\nTitle: Flag Meaning\nAbout: The flag represents liberty.\n\
                       Reference: https://example.org\nReference Title: Example Org"
                    .to_string(),
            }],
        })
    }

    fn network_failure() -> Result<CompletionResponse, CompletionError> {
        Err(CompletionError::Status(StatusCode::SERVICE_UNAVAILABLE))
    }

    fn no_choices() -> Result<CompletionResponse, CompletionError> {
        Ok(CompletionResponse::default())
    }

    #[test]
    fn test_success_notifies_and_copies() {
        let config = config();
        let completer = FakeCompleter::new(flag_response);
        let sinks = Recorder::default();

        let outcome = answer(&config, "What is this flag?", false, &completer, &sinks, Some(&sinks));

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(completer.prompts.borrow().as_slice(), ["Explain:\nWhat is this flag?"]);

        let notes = sinks.notes.borrow();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Flag Meaning");
        assert_eq!(notes[0].icon, Icon::Success);

        let clips = sinks.clips.borrow();
        assert_eq!(clips.len(), 1);
        let clip = &clips[0];
        let question = clip.find(" - Question:\nWhat is this flag?").unwrap();
        let title = clip.find(" - Title:\nFlag Meaning").unwrap();
        let about = clip.find(" - About:\nThe flag represents liberty.").unwrap();
        let reference = clip.find(" - Reference:\nhttps://example.org").unwrap();
        assert!(question < title && title < about && about < reference);
    }

    #[test]
    fn test_rich_text_flag_passed_through() {
        let config = config();
        let completer = FakeCompleter::new(flag_response);
        let sinks = Recorder::default();

        answer(&config, "Q", true, &completer, &sinks, Some(&sinks));

        assert!(sinks.notes.borrow()[0]
            .message
            .contains("<a href=\"https://example.org\">Example Org</a>"));
    }

    #[test]
    fn test_network_failure_single_notification_no_clipboard() {
        let config = config();
        let completer = FakeCompleter::new(network_failure);
        let sinks = Recorder::default();

        let outcome = answer(&config, "Q", false, &completer, &sinks, Some(&sinks));

        assert_eq!(outcome, Outcome::NetworkError);
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(
            sinks.notes.borrow().as_slice(),
            [NotificationPayload::error("Offline")]
        );
        assert!(sinks.clips.borrow().is_empty());
    }

    #[test]
    fn test_no_choices_reports_no_response() {
        let config = config();
        let completer = FakeCompleter::new(no_choices);
        let sinks = Recorder::default();

        let outcome = answer(&config, "Q", false, &completer, &sinks, Some(&sinks));

        assert_eq!(outcome, Outcome::NoResponse);
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(
            sinks.notes.borrow().as_slice(),
            [NotificationPayload::error("Nothing")]
        );
        assert!(sinks.clips.borrow().is_empty());
    }

    #[test]
    fn test_empty_question_still_sent() {
        let config = config();
        let completer = FakeCompleter::new(flag_response);
        let sinks = Recorder::default();

        let outcome = answer(&config, "", false, &completer, &sinks, Some(&sinks));

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(completer.prompts.borrow().as_slice(), ["Explain:\n"]);
    }

    #[test]
    fn test_clipboard_optional() {
        let config = config();
        let completer = FakeCompleter::new(flag_response);
        let sinks = Recorder::default();

        let outcome = answer(&config, "Q", false, &completer, &sinks, None);

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(sinks.notes.borrow().len(), 1);
        assert!(sinks.clips.borrow().is_empty());
    }

    #[test]
    fn test_config_error_reported() {
        let sinks = Recorder::default();
        let err = PipelineError::from(Config::from_json_str(r#"{"OPENAI": {}}"#).unwrap_err());

        let outcome = report_failure(&err, &NotificationConfig::default(), &sinks);

        assert_eq!(outcome, Outcome::ConfigError);
        assert_eq!(outcome.exit_code(), 2);
        let notes = sinks.notes.borrow();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Error");
        assert!(notes[0].message.starts_with("API_KEY was not found"));
        assert!(sinks.clips.borrow().is_empty());
    }

    #[test]
    fn test_fetch_completion_trims_candidate() {
        let config = config();
        let completer = FakeCompleter::new(flag_response);

        let raw = fetch_completion(&config, "Q", &completer).unwrap();
        assert!(raw.starts_with("Title: Flag Meaning"));
    }

    #[test]
    fn test_acquire_text_unreadable_image_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");

        assert_eq!(acquire_text(Desktop::Other, Some(&missing)), "");
    }
}
