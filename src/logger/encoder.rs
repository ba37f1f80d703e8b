//! Record encoding.
//!
//! Text records look like:
//! ```text
//! 2026-01-02 03:04:05.000 +00:00 [peer.gossip] -> INFO 00a connected peer=node1
//! ```
//! JSON records are one object per line with `ts`, `level`, `logger`, `seq`,
//! `msg` and the entry's fields.

use chrono::{DateTime, Local, SecondsFormat};
use serde_json::{Map, Value};
use std::fmt::Write as _;

use crate::level::Severity;
use crate::logger::field::Field;

const RESET: &str = "\x1b[0m";

/// A single log entry, borrowed from the call site.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub time: DateTime<Local>,
    pub severity: Severity,
    pub logger: &'a str,
    pub seq: u64,
    pub message: &'a str,
    /// Fields carried by the logger handle.
    pub context: &'a [Field],
    /// Fields passed with this call.
    pub fields: &'a [Field],
}

impl Entry<'_> {
    fn all_fields(&self) -> impl Iterator<Item = &Field> {
        self.context.iter().chain(self.fields.iter())
    }
}

/// Output format selected by the facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoder {
    Text { color: bool },
    Json,
}

impl Default for Encoder {
    fn default() -> Self {
        Encoder::Text { color: false }
    }
}

impl Encoder {
    /// Encode one entry, newline terminated.
    pub fn encode(&self, entry: &Entry<'_>) -> Vec<u8> {
        match self {
            Encoder::Text { color } => encode_text(entry, *color).into_bytes(),
            Encoder::Json => encode_json(entry),
        }
    }
}

fn encode_text(entry: &Entry<'_>, color: bool) -> String {
    // Level names are at least four characters.
    let level = &entry.severity.as_upper_str()[..4];
    let mut line = String::with_capacity(96 + entry.message.len());

    let _ = write!(
        line,
        "{} [{}] -> ",
        entry.time.format("%Y-%m-%d %H:%M:%S%.3f %Z"),
        entry.logger
    );
    if color {
        let _ = write!(line, "{}{} {:03x}{}", entry.severity.color_code(), level, entry.seq, RESET);
    } else {
        let _ = write!(line, "{} {:03x}", level, entry.seq);
    }
    line.push(' ');
    line.push_str(entry.message);

    for field in entry.all_fields() {
        let _ = write!(line, " {field}");
    }
    line.push('\n');
    line
}

fn encode_json(entry: &Entry<'_>) -> Vec<u8> {
    let mut object = Map::new();
    for field in entry.all_fields() {
        object.insert(field.key.clone(), field.value.clone());
    }
    // Reserved keys win over fields of the same name.
    object.insert(
        "ts".into(),
        Value::String(entry.time.to_rfc3339_opts(SecondsFormat::Millis, false)),
    );
    object.insert("level".into(), Value::String(entry.severity.as_str().into()));
    object.insert("logger".into(), Value::String(entry.logger.into()));
    object.insert("seq".into(), Value::from(entry.seq));
    object.insert("msg".into(), Value::String(entry.message.into()));

    let mut bytes = serde_json::to_vec(&Value::Object(object)).unwrap_or_default();
    bytes.push(b'\n');
    bytes
}
