//! Metadata record parsing and validation
//!
//! A `.meta` sidecar is a small JSON object written by the recorder:
//!
//! ```json
//! {"did": "nest1", "stream_type": "main", "timestamp": 1735732800, "datetime": "..."}
//! ```
//!
//! Only `timestamp`, `did` and `stream_type` are read. The required-field
//! check is a truthiness check, not a presence check: a `timestamp` of `0`
//! or a `did` of `"0"` counts as missing and the record is skipped.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;

use crate::error::SkipReason;

/// Leading integer of a numeric string (`" 42abc"` -> `42`)
static LEADING_INT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t\n\r\x0B\x0C]*([+-]?[0-9]+)").expect("valid regex"));

/// A validated metadata record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataRecord {
    /// Start of the recording segment, seconds since epoch
    pub timestamp: i64,
    /// Recording device ("nest") identifier
    pub device_id: String,
    /// Stream variant label (e.g. "main", "sub")
    pub stream_type: String,
    /// Base name of the media asset this record describes
    pub video_name: String,
}

/// Sidecar body as written on disk, before validation
#[derive(Debug, Default, Deserialize)]
pub struct RawMetadata {
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default, rename = "did")]
    pub device_id: Option<Value>,
    #[serde(default)]
    pub stream_type: Option<Value>,
}

impl RawMetadata {
    /// Check required fields and coerce them into a [`MetadataRecord`]
    pub fn validate(self, video_name: &str) -> Result<MetadataRecord, SkipReason> {
        let timestamp = required(self.timestamp, "timestamp")?;
        let device_id = required(self.device_id, "did")?;
        let stream_type = required(self.stream_type, "stream_type")?;

        Ok(MetadataRecord {
            timestamp: coerce_timestamp(&timestamp).ok_or(SkipReason::WrongType("timestamp"))?,
            device_id: into_string(device_id, "did")?,
            stream_type: into_string(stream_type, "stream_type")?,
            video_name: video_name.to_string(),
        })
    }
}

/// Parse a sidecar body into a record named `video_name`
pub fn parse_record(video_name: &str, body: &[u8]) -> Result<MetadataRecord, SkipReason> {
    let value: Value = serde_json::from_slice(body).map_err(|_| SkipReason::Malformed)?;

    match &value {
        Value::Object(map) if !map.is_empty() => {}
        _ => return Err(SkipReason::NotAnObject),
    }

    let raw: RawMetadata = serde_json::from_value(value).map_err(|_| SkipReason::NotAnObject)?;
    raw.validate(video_name)
}

/// Loose truthiness: null, false, 0, 0.0, "", "0", [] and {} are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Integer value of a numeric string: its leading signed digits, or 0
pub fn leading_int(s: &str) -> i64 {
    let Some(digits) = LEADING_INT.captures(s).and_then(|c| c.get(1)) else {
        return 0;
    };
    let digits = digits.as_str();
    digits.parse::<i64>().unwrap_or(if digits.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    })
}

fn required(value: Option<Value>, field: &'static str) -> Result<Value, SkipReason> {
    match value {
        Some(v) if is_truthy(&v) => Ok(v),
        _ => Err(SkipReason::Missing(field)),
    }
}

fn coerce_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => Some(leading_int(s)),
        _ => None,
    }
}

fn into_string(value: Value, field: &'static str) -> Result<String, SkipReason> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(SkipReason::WrongType(field)),
    }
}
