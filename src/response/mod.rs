//! Turns a raw completion into clipboard and notification content.
//!
//! This module provides:
//! - Section splitting on configured category labels (`parse_sections`)
//! - Rendering of the clipboard text and notification payload (`format_response`)

pub mod sections;

pub use sections::{parse_sections, ParsedResponse};

use crate::config::{REFERENCE_LABEL, REFERENCE_TITLE_LABEL, TITLE_LABEL};

/// Title used when the completion has no usable "Title" section.
pub const FALLBACK_TITLE: &str = "About";

/// Notification icon identifiers, resolved to `img/<id>.png`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
}

impl Icon {
    pub fn as_str(self) -> &'static str {
        match self {
            Icon::Success => "desktopGPT",
            Icon::Error => "error",
        }
    }
}

/// A desktop notification ready to be shown.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPayload {
    pub title: String,
    pub message: String,
    pub icon: Icon,
}

impl NotificationPayload {
    /// Error notification with the fixed "Error" title.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            message: message.into(),
            icon: Icon::Error,
        }
    }
}

/// Both outputs produced for a completion.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedResponse {
    pub notification: NotificationPayload,
    pub clipboard: String,
}

/// Formats a completion for the clipboard and a notification.
///
/// `categories` is the full label list with "Title" first and the reference
/// labels last. When `rich_text` is set and the reference fits on one line, the
/// notification shows the reference as a link labelled with its title; the
/// clipboard always gets the plain reference. Never fails: text without a
/// "Title" marker is passed through under the "About" title.
pub fn format_response(
    question: &str,
    raw: &str,
    categories: &[String],
    rich_text: bool,
) -> FormattedResponse {
    let mut sections = match parse_sections(raw, categories) {
        ParsedResponse::Unstructured(text) => return format_unstructured(question, text),
        ParsedResponse::Sections(sections) => sections,
    };

    let title = take_section(&mut sections, TITLE_LABEL)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| FALLBACK_TITLE.to_string());
    let reference = take_section(&mut sections, REFERENCE_LABEL).filter(|r| !r.is_empty());
    let reference_title = take_section(&mut sections, REFERENCE_TITLE_LABEL)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| title.clone());

    // Rich notification bodies are parsed as markup
    let markup = |text: &str| {
        if rich_text {
            escape_markup(text)
        } else {
            text.to_string()
        }
    };

    let mut body = String::new();
    let mut message = String::new();
    for (label, value) in &sections {
        body.push_str(&format!(" - {}:\n{}\n\n", label, value));
        message.push_str(&format!(" - {}:\n{}\n\n", markup(label), markup(value)));
    }

    let mut clipboard = format!(" - Question:\n{}\n\n - Title:\n{}\n\n{}", question, title, body);

    if let Some(reference) = &reference {
        clipboard.push_str(&format!(" - Reference:\n{}", reference));

        let single_line = !reference.contains('\n') && !reference_title.contains('\n');
        let rendered = if rich_text && single_line {
            format!(
                "<a href=\"{}\">{}</a>",
                escape_markup(reference),
                escape_markup(&reference_title)
            )
        } else {
            markup(reference)
        };
        message.push_str(&format!("\n - Reference:\n{}", rendered));
    }

    FormattedResponse {
        notification: NotificationPayload {
            title,
            message,
            icon: Icon::Success,
        },
        clipboard,
    }
}

fn format_unstructured(question: &str, text: String) -> FormattedResponse {
    FormattedResponse {
        clipboard: format!(" - Question:\n{}\n\n{}", question, text),
        notification: NotificationPayload {
            title: FALLBACK_TITLE.to_string(),
            message: text,
            icon: Icon::Success,
        },
    }
}

/// Escapes the characters that notification markup treats specially.
fn escape_markup(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Removes a section by label and returns its value.
fn take_section(sections: &mut Vec<(String, String)>, label: &str) -> Option<String> {
    let idx = sections.iter().position(|(l, _)| l == label)?;
    Some(sections.remove(idx).1)
}
