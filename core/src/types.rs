//! Request and verdict DTOs.
//!
//! # Design
//! `Verdict` is an enum in Rust but travels as a single JSON object whose
//! `ok` flag tells the caller which shape it got. The conversion goes through
//! a flat `WireVerdict` so serde handles both directions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;

/// The body of a validation request: `{ "url": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRequest {
    pub url: String,
}

impl CheckRequest {
    /// Parse a raw request body.
    ///
    /// `url` follows JavaScript truthiness: absent, `null`, `false`, `0` and
    /// `""` count as missing. Any other value is coerced the way `String(x)`
    /// would, so `["https://a/b.mp4"]` names `https://a/b.mp4` while `{}`
    /// becomes `[object Object]` and fails URL parsing later.
    pub fn from_json(body: &[u8]) -> Result<Self, ClientError> {
        let value: Value = serde_json::from_slice(body).map_err(|_| ClientError::InvalidJson)?;

        match value.get("url") {
            None | Some(Value::Null) | Some(Value::Bool(false)) => Err(ClientError::MissingUrl),
            Some(Value::String(s)) if s.is_empty() => Err(ClientError::MissingUrl),
            Some(Value::String(s)) => Ok(Self { url: s.clone() }),
            Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(ClientError::MissingUrl),
            Some(other) => Ok(Self {
                url: js_string(other),
            }),
        }
    }
}

/// String form of a JSON value under JavaScript's `String(x)`.
fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        // Array elements that are null become empty strings.
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Metadata reported for a target that validated as a direct file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectFile {
    pub direct_url: String,
    /// Raw `content-type` header, empty if absent.
    pub content_type: String,
    /// Raw `content-length` header, empty if absent.
    pub content_length: String,
}

/// Outcome of validating a target. Both variants are reported with HTTP 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireVerdict", try_from = "WireVerdict")]
pub enum Verdict {
    Direct(DirectFile),
    Rejected { reason: String },
}

impl Verdict {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Verdict::Rejected {
            reason: reason.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Verdict::Direct(_))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireVerdict {
    ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    direct_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_length: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl From<Verdict> for WireVerdict {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Direct(file) => WireVerdict {
                ok: true,
                direct_url: Some(file.direct_url),
                content_type: Some(file.content_type),
                content_length: Some(file.content_length),
                reason: None,
            },
            Verdict::Rejected { reason } => WireVerdict {
                ok: false,
                direct_url: None,
                content_type: None,
                content_length: None,
                reason: Some(reason),
            },
        }
    }
}

impl TryFrom<WireVerdict> for Verdict {
    type Error = String;

    fn try_from(wire: WireVerdict) -> Result<Self, Self::Error> {
        if wire.ok {
            let direct_url = wire.direct_url.ok_or("ok verdict without directUrl")?;
            Ok(Verdict::Direct(DirectFile {
                direct_url,
                content_type: wire.content_type.unwrap_or_default(),
                content_length: wire.content_length.unwrap_or_default(),
            }))
        } else {
            let reason = wire.reason.ok_or("rejected verdict without reason")?;
            Ok(Verdict::Rejected { reason })
        }
    }
}
