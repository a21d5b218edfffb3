//! Token level comparison of two `tokens.json` documents.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::changelog::{Change, ChangelogEntry, TokenDisplay};
use crate::{store, Result, TokensError};

/// Keys starting with this are bookkeeping (design-tool ids, restore data) and
/// never count as a change.
pub const METADATA_PREFIX: &str = "_";

/// The parts of a tokens document the differ walks. Everything else is ignored.
#[derive(Debug, Default, Deserialize)]
struct Snapshot {
    #[serde(default)]
    collections: IndexMap<String, SnapshotCollection>,
}

#[derive(Debug, Default, Deserialize)]
struct SnapshotCollection {
    #[serde(default)]
    groups: IndexMap<String, SnapshotGroup>,
}

#[derive(Debug, Default, Deserialize)]
struct SnapshotGroup {
    #[serde(default)]
    tokens: Option<Vec<Map<String, Value>>>,
    #[serde(default)]
    styles: Option<Vec<Map<String, Value>>>,
}
impl SnapshotGroup {
    /// `tokens` when present, otherwise `styles`.
    fn items(&self) -> &[Map<String, Value>] {
        self.tokens
            .as_deref()
            .or(self.styles.as_deref())
            .unwrap_or_default()
    }
}

/// A token located within a document.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatToken {
    pub collection: String,
    pub group: String,
    pub name: String,
    pub raw: Map<String, Value>,
}

/// Every token and style of `document`, keyed `collection/group/name`.
///
/// Duplicate keys resolve last-wins; each overwrite is logged.
pub fn flatten(document: &Value) -> Result<BTreeMap<String, FlatToken>> {
    let snapshot = Snapshot::deserialize(document)?;
    let mut tokens = BTreeMap::new();
    for (collection, coll) in &snapshot.collections {
        for (group, grp) in &coll.groups {
            for raw in grp.items() {
                let name = match raw.get("name") {
                    Some(Value::String(name)) => name.clone(),
                    _ => {
                        return Err(TokensError::MalformedToken {
                            collection: collection.clone(),
                            group: group.clone(),
                            reason: "token has no string `name`".to_string(),
                        })
                    }
                };
                let key = format!("{collection}/{group}/{name}");
                let token = FlatToken {
                    collection: collection.clone(),
                    group: group.clone(),
                    name,
                    raw: raw.clone(),
                };
                if tokens.insert(key.clone(), token).is_some() {
                    tracing::warn!(%key, "duplicate token, keeping the last one");
                }
            }
        }
    }
    Ok(tokens)
}

/// `token` without its metadata keys.
pub fn comparable(token: &Map<String, Value>) -> Map<String, Value> {
    token
        .iter()
        .filter(|(key, _)| !key.starts_with(METADATA_PREFIX))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// JSON equality where numbers compare by value, so `4` equals `4.0`.
pub fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a == b || a.as_f64() == b.as_f64(),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| same_value(a, b))
        }
        (Value::Object(a), Value::Object(b)) => same_fields(a, b),
        _ => a == b,
    }
}

fn same_fields(a: &Map<String, Value>, b: &Map<String, Value>) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|(key, value)| b.get(key).is_some_and(|other| same_value(value, other)))
}

/// Added, then removed, then changed tokens; each run sorted by key.
pub fn diff(old: &Value, new: &Value) -> Result<Vec<Change>> {
    let old = flatten(old)?;
    let new = flatten(new)?;

    let added = new
        .iter()
        .filter(|(key, _)| !old.contains_key(*key))
        .map(|(_, token)| {
            let display = TokenDisplay::of(&token.raw);
            Change::Added {
                collection: token.collection.clone(),
                group: token.group.clone(),
                name: token.name.clone(),
                value: (!display.is_empty()).then_some(display),
            }
        });

    let removed = old
        .iter()
        .filter(|(key, _)| !new.contains_key(*key))
        .map(|(_, token)| Change::Removed {
            collection: token.collection.clone(),
            group: token.group.clone(),
            name: token.name.clone(),
        });

    let changed = old.iter().filter_map(|(key, before)| {
        let after = new.get(key)?;
        if same_fields(&comparable(&before.raw), &comparable(&after.raw)) {
            return None;
        }
        Some(Change::Changed {
            collection: after.collection.clone(),
            group: after.group.clone(),
            name: after.name.clone(),
            before: TokenDisplay::of(&before.raw),
            after: TokenDisplay::of(&after.raw),
        })
    });

    Ok(added.chain(removed).chain(changed).collect())
}

/// Result of [`append_changelog`].
#[derive(Debug, Clone, PartialEq)]
pub enum DiffOutcome {
    /// Nothing differed; the new document was left untouched.
    Unchanged,
    Recorded {
        entry: ChangelogEntry,
        /// 1-based position of the entry in the changelog.
        position: usize,
    },
}

/// Diffs `old_path` against `new_path` and appends the changes to the new
/// document's changelog, rewriting it in place.
///
/// When nothing changed the new document is not written at all.
pub fn append_changelog(
    old_path: &Path,
    new_path: &Path,
    notes: Option<&str>,
    now: DateTime<Utc>,
) -> Result<DiffOutcome> {
    let old: Value = store::read_json(old_path)?;
    let mut new: Value = store::read_json(new_path)?;

    let changes = diff(&old, &new)?;
    if changes.is_empty() {
        tracing::info!("no changes detected, changelog left as is");
        return Ok(DiffOutcome::Unchanged);
    }

    let entry = ChangelogEntry::new(changes, notes, now);
    let position = push_entry(&mut new, &entry)?;
    store::write_json_pretty(new_path, &new)?;
    tracing::info!(position, path = %new_path.display(), "appended changelog entry");

    Ok(DiffOutcome::Recorded { entry, position })
}

fn push_entry(document: &mut Value, entry: &ChangelogEntry) -> Result<usize> {
    let Value::Object(root) = document else {
        return Err(TokensError::InvalidDocument(
            "tokens document is not an object".to_string(),
        ));
    };
    let entry = serde_json::to_value(entry)?;
    let changelog = root
        .entry("changelog")
        .or_insert_with(|| Value::Array(Vec::new()));
    let mut entries = match changelog.take() {
        Value::Array(entries) => entries,
        other => {
            tracing::warn!(found = %other, "changelog is not a list, starting a new one");
            Vec::new()
        }
    };
    entries.push(entry);
    let position = entries.len();
    *changelog = Value::Array(entries);
    Ok(position)
}
