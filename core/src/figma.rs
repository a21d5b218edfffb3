//! Shapes of the design-tool export: variable collections and text styles.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::color::Rgba;

#[derive(Debug, Clone, Deserialize)]
pub struct VariableCollection {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub modes: Vec<Mode>,
    #[serde(default)]
    pub variables: Vec<Variable>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Mode {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VariableType {
    Color,
    Float,
    String,
    Boolean,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Variable {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: VariableType,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Values keyed by mode name.
    #[serde(default)]
    pub values: IndexMap<String, ModeValue>,
}
impl Variable {
    pub fn value(&self, mode: &str) -> Option<&ModeValue> {
        self.values.get(mode)
    }

    /// Resolved value in `mode`, when the mode exists and resolved to something.
    pub fn resolved(&self, mode: &str) -> Option<&Resolved> {
        self.value(mode).and_then(|value| value.resolved.as_ref())
    }

    /// Slash separated path segment `index` of the variable name.
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.name.split('/').nth(index)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeValue {
    #[serde(default)]
    pub resolved: Option<Resolved>,
    /// Full path of the aliased variable.
    #[serde(default)]
    pub alias: Option<String>,
    /// `Some(None)` when the export carried an explicit `null` id.
    #[serde(default, deserialize_with = "present")]
    pub alias_id: Option<Option<String>>,
}

/// A value as resolved by the design tool in one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Resolved {
    Color(Rgba),
    Number(Number),
    Text(String),
    Flag(bool),
    Other(Value),
}
impl Resolved {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Resolved::Number(number) => number.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Resolved::Text(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub name: String,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_style: Option<String>,
    #[serde(default)]
    pub font_size: Option<Number>,
    #[serde(default)]
    pub line_height: Option<Number>,
    #[serde(default)]
    pub letter_spacing: Option<Number>,
}

/// Case-sensitive lookup by collection name.
pub fn find_collection<'a>(
    collections: &'a [VariableCollection],
    name: &str,
) -> Option<&'a VariableCollection> {
    collections.iter().find(|collection| collection.name == name)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
