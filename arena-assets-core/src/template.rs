//! TEMPLATE.DAT: a text table keyed by "#..." delimiter lines. The game
//! looks up canned UI/dialogue text by these keys.

use std::collections::HashMap;

use serde::Serialize;

use crate::bytes;
use crate::{AssetError, Result};

pub const TEMPLATE_FILENAME: &str = "TEMPLATE.DAT";

/// Keyed template text. Keys keep their '#' prefix; values are cleaned at
/// parse time so callers never see trailing newlines or the '&' sentinel.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TemplateTextTable {
    entries: HashMap<String, String>,
}

impl TemplateTextTable {
    pub fn parse(data: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(data);

        let mut entries = HashMap::new();
        let mut key = String::new();
        let mut value = String::new();

        for line in bytes::lines(&text) {
            if line.is_empty() {
                return Err(AssetError::Format(format!(
                    "{}: empty line in keyed text",
                    TEMPLATE_FILENAME
                )));
            }

            if line.starts_with('#') {
                flush(&mut entries, &key, &value);

                // The key is the delimiter line minus whitespace and line
                // terminators.
                key = line
                    .chars()
                    .filter(|c| !matches!(c, ' ' | '\r' | '\n'))
                    .collect();
                value.clear();
            } else {
                // Line terminators were stripped by the line splitter except
                // the carriage return, which the flush step normalizes.
                value.push_str(line);
            }
        }

        // The record in progress when input runs out still counts.
        flush(&mut entries, &key, &value);

        Ok(TemplateTextTable { entries })
    }

    /// Looks up a template value. A missing key means the caller and the
    /// data disagree about the game version, which is unrecoverable.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| AssetError::MissingKey(format!("{}: {}", TEMPLATE_FILENAME, key)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

// There are multiple copies of some texts in the file; the first wins.
fn flush(entries: &mut HashMap<String, String>, key: &str, value: &str) {
    if key.is_empty() || entries.contains_key(key) {
        return;
    }

    let mut cleaned = value.replace('\r', "\n");

    while cleaned.ends_with('\n') {
        cleaned.pop();
    }

    // Most texts end with an ampersand sentinel; drop it.
    if cleaned.ends_with('&') {
        cleaned.pop();
    }

    entries.insert(key.to_string(), cleaned);
}
