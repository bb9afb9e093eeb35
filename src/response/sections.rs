//! Splits a completion into labelled sections.
//!
//! Labels are located by their first occurrence in the text, so a label that
//! also appears inside another section's value takes that position instead of
//! its own line. This matches how responses have always been split and is not
//! guarded against.

use crate::config::TITLE_LABEL;

/// Outcome of splitting a completion on its category labels.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// No "Title" marker was found; the raw text is kept whole.
    Unstructured(String),
    /// `(label, value)` pairs in caller category order. Labels that were not
    /// found are absent.
    Sections(Vec<(String, String)>),
}

/// Splits `raw` into sections delimited by `categories`.
///
/// `categories` must start with "Title"; the text before the first "Title" is
/// discarded.
pub fn parse_sections(raw: &str, categories: &[String]) -> ParsedResponse {
    let Some(start) = raw.find(TITLE_LABEL) else {
        return ParsedResponse::Unstructured(raw.to_string());
    };
    let text = raw[start..].trim();

    let mut offsets: Vec<(usize, &str)> = categories
        .iter()
        .map(String::as_str)
        .filter(|label| !label.is_empty())
        .filter_map(|label| text.find(label).map(|pos| (pos, label)))
        .collect();
    // Stable: labels sharing an offset keep category order
    offsets.sort_by_key(|&(pos, _)| pos);

    let mut found: Vec<(&str, &str)> = Vec::with_capacity(offsets.len());
    for (i, &(pos, label)) in offsets.iter().enumerate() {
        let end = offsets.get(i + 1).map_or(text.len(), |&(next, _)| next);
        // A label sharing its offset with a later one owns an empty span
        let Some(rest) = text[pos..end].strip_prefix(label) else {
            continue;
        };
        found.push((label, section_value(rest)));
    }

    let sections = categories
        .iter()
        .filter_map(|category| {
            found
                .iter()
                .find(|(label, _)| *label == category.as_str())
                .map(|(label, value)| (label.to_string(), value.to_string()))
        })
        .collect();

    ParsedResponse::Sections(sections)
}

/// Strips the separator that follows a label and trims the value.
fn section_value(rest: &str) -> &str {
    let rest = rest.trim_start();
    rest.strip_prefix(':').unwrap_or(rest).trim()
}
