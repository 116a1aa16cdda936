//! Core types shared by the capability providers

use serde::{Deserialize, Serialize};

/// A record shape requested from the structured model: a name plus the
/// string fields the record must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordShape {
    pub name: &'static str,
    pub fields: &'static [&'static str],
}

/// Shape for query classification: a single `query_type` label.
pub const QUERY_TYPE: RecordShape = RecordShape {
    name: "QueryClassifier",
    fields: &["query_type"],
};

/// Shape for project detail extraction.
pub const PROJECT_LOCATION: RecordShape = RecordShape {
    name: "ProjectLocation",
    fields: &["project_type", "city", "geo_state"],
};

/// Output of a structured model call. Providers return a parsed record
/// when the completion contains one, and fall back to the raw text
/// otherwise; interpreting the text is the caller's problem.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredResponse {
    Record(serde_json::Map<String, serde_json::Value>),
    Text(String),
}

/// Response from the web search provider. Hits are kept as raw JSON values
/// so callers can validate required fields themselves. A payload without a
/// `results` list deserializes as empty: zero hits, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// Find the first balanced JSON object embedded in a text payload,
/// tolerating prose around it. Returns the object as a string slice.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}
