use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One sync recorded in a tokens document's `changelog`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub date: String,
    pub changes: Vec<Change>,
    pub summary: Summary,
    pub notes: String,
}
impl ChangelogEntry {
    /// Blank or missing notes are replaced by a line built from the counts.
    pub fn new(changes: Vec<Change>, notes: Option<&str>, date: DateTime<Utc>) -> Self {
        let summary = Summary::of(&changes);
        let notes = match notes {
            Some(notes) if !notes.is_empty() => notes.to_string(),
            _ => summary.to_string(),
        };
        Self {
            date: date.to_rfc3339_opts(SecondsFormat::Micros, false),
            changes,
            summary,
            notes,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub added: usize,
    pub changed: usize,
    pub removed: usize,
}
impl Summary {
    pub fn of(changes: &[Change]) -> Self {
        changes.iter().fold(Self::default(), |mut summary, change| {
            match change {
                Change::Added { .. } => summary.added += 1,
                Change::Changed { .. } => summary.changed += 1,
                Change::Removed { .. } => summary.removed += 1,
            }
            summary
        })
    }
}
impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sync: +{} added, ~{} changed, -{} removed.",
            self.added, self.changed, self.removed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Change {
    Added {
        collection: String,
        group: String,
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<TokenDisplay>,
    },
    Removed {
        collection: String,
        group: String,
        name: String,
    },
    Changed {
        collection: String,
        group: String,
        name: String,
        before: TokenDisplay,
        after: TokenDisplay,
    },
}

/// Flat rendering of a token for the changelog: light/dark hex, or a scalar value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenDisplay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}
impl TokenDisplay {
    pub fn of(token: &Map<String, Value>) -> Self {
        let value = match (token.get("value"), token.contains_key("light")) {
            (Some(Value::Object(object)), false) => {
                Some(Value::String(Value::Object(object.clone()).to_string()))
            }
            (Some(value), false) => Some(value.clone()),
            _ => None,
        };
        Self {
            light: token.get("light").map(extract_hex),
            dark: token.get("dark").map(extract_hex),
            value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.light.is_none() && self.dark.is_none() && self.value.is_none()
    }
}

/// Hex of a mode value, which is either the bare hex string or `{ "hex": .. }`.
pub fn extract_hex(mode: &Value) -> Value {
    match mode {
        Value::Object(object) => object.get("hex").cloned().unwrap_or(Value::Null),
        Value::String(_) => mode.clone(),
        _ => Value::Null,
    }
}
