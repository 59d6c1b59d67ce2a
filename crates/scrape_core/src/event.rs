use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

/// Prefix marking a data record in the scrape stream.
pub const DATA_PREFIX: &str = "data: ";

const FINAL_STEP: &str = "final";

/// Step indicator of a progress record; the server sends numbers or labels.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Number(Number),
    Label(String),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Whole floats print without a fraction, so `1.0` reads as step 1.
            Step::Number(n) if n.is_f64() => match n.as_f64() {
                Some(value) => write!(f, "{value}"),
                None => write!(f, "{n}"),
            },
            Step::Number(n) => write!(f, "{n}"),
            Step::Label(label) => f.write_str(label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressEvent {
    pub step: Step,
    #[serde(default, deserialize_with = "lenient_url")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_panel")]
    pub raw_content: Option<String>,
    #[serde(default, deserialize_with = "lenient_panel")]
    pub analysis: Option<String>,
}

/// Any JSON value is accepted as a URL; null reads as empty.
fn lenient_url<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

/// Panel text is present only when the value is truthy.
fn lenient_panel<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(truthy_text(&Value::deserialize(deserializer)?))
}

/// One record of the scrape stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    Progress(ProgressEvent),
    Final { structured_data: Value },
    Error { error: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid JSON in data record: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unrecognised record shape: {0}")]
    UnknownShape(String),
}

impl StreamEvent {
    /// Classify a decoded record: `error` wins, then `step == "final"`, then progress.
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        let Value::Object(mut fields) = value else {
            return Err(ParseError::UnknownShape(
                "record is not a JSON object".to_string(),
            ));
        };

        if let Some(error) = error_message(&fields) {
            return Ok(StreamEvent::Error { error });
        }

        if fields.get("step").and_then(Value::as_str) == Some(FINAL_STEP) {
            let structured_data = fields.remove("structured_data").unwrap_or(Value::Null);
            return Ok(StreamEvent::Final { structured_data });
        }

        if !fields.contains_key("step") {
            return Err(ParseError::UnknownShape(
                "record has neither `error` nor `step`".to_string(),
            ));
        }

        let progress: ProgressEvent = serde_json::from_value(Value::Object(fields))?;
        Ok(StreamEvent::Progress(progress))
    }
}

fn error_message(fields: &Map<String, Value>) -> Option<String> {
    truthy_text(fields.get("error")?)
}

/// Text of a truthy value. Null, false, zero and the empty string count as absent;
/// other non-strings are rendered as their JSON text.
fn truthy_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Parse one physical line. Lines without the data prefix yield `None`.
pub fn parse_line(line: &str) -> Option<Result<StreamEvent, ParseError>> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let payload = line.strip_prefix(DATA_PREFIX)?;
    Some(
        serde_json::from_str::<Value>(payload)
            .map_err(ParseError::from)
            .and_then(StreamEvent::from_value),
    )
}

/// Splits decoded text into data records.
///
/// Text after the last newline of a chunk is held back and prefixed to the next
/// chunk, so a record split across network reads is parsed once it is complete.
/// A record whose JSON itself contains a raw newline still cannot be framed and
/// comes out as a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventParser {
    partial_line: String,
}

impl EventParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one decoded chunk; returns the records completed by it, in order.
    pub fn push(&mut self, chunk: &str) -> Vec<Result<StreamEvent, ParseError>> {
        self.partial_line.push_str(chunk);
        let Some(last_newline) = self.partial_line.rfind('\n') else {
            return Vec::new();
        };

        let complete: String = self.partial_line.drain(..=last_newline).collect();
        complete.split('\n').filter_map(parse_line).collect()
    }

    /// Parse whatever is left once the stream has ended.
    pub fn finish(&mut self) -> Option<Result<StreamEvent, ParseError>> {
        let rest = std::mem::take(&mut self.partial_line);
        parse_line(&rest)
    }

    pub fn reset(&mut self) {
        self.partial_line.clear();
    }
}
