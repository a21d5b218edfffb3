//! The `tokens.json` document written by the builder.

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Number, Value};

use crate::config::group_label;
use crate::figma::{Resolved, VariableCollection, VariableType};

#[derive(Debug, Clone, Serialize)]
pub struct TokensDocument {
    #[serde(rename = "exportedAt")]
    pub exported_at: String,
    pub collections: IndexMap<String, Collection>,
    /// Carried over verbatim from the previous document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changelog: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modes: Option<Vec<String>>,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<CollectionMeta>,
    pub groups: IndexMap<String, Group>,
}
impl Collection {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            modes: None,
            meta: None,
            groups: IndexMap::new(),
        }
    }

    pub fn with_modes(mut self, modes: &[&str]) -> Self {
        self.modes = Some(modes.iter().map(|m| m.to_string()).collect());
        self
    }

    pub fn with_meta(mut self, source: &VariableCollection) -> Self {
        self.meta = Some(CollectionMeta::from(source));
        self
    }

    /// Empty token groups for `keys`, in order.
    pub fn with_token_groups(mut self, keys: &[String]) -> Self {
        for key in keys {
            self.groups
                .insert(key.clone(), Group::new(key, GroupItems::Tokens(Vec::new())));
        }
        self
    }

    pub fn with_style_groups(mut self, keys: &[String]) -> Self {
        for key in keys {
            self.groups
                .insert(key.clone(), Group::new(key, GroupItems::Styles(Vec::new())));
        }
        self
    }

    /// Appends to a token group; unknown groups are ignored.
    pub fn push_token(&mut self, group: &str, token: Token) -> bool {
        match self.groups.get_mut(group).map(|g| &mut g.items) {
            Some(GroupItems::Tokens(tokens)) => {
                tokens.push(token);
                true
            }
            _ => false,
        }
    }

    pub fn push_style(&mut self, group: &str, style: StyleToken) -> bool {
        match self.groups.get_mut(group).map(|g| &mut g.items) {
            Some(GroupItems::Styles(styles)) => {
                styles.push(style);
                true
            }
            _ => false,
        }
    }

    pub fn drop_empty_groups(mut self) -> Self {
        self.groups.retain(|_, group| !group.items.is_empty());
        self
    }

    pub fn token_count(&self) -> usize {
        self.groups.values().map(|group| group.items.len()).sum()
    }
}

/// Ids needed to write values back into the design tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMeta {
    pub collection_id: String,
    /// Mode name to mode id.
    pub modes: IndexMap<String, String>,
}
impl From<&VariableCollection> for CollectionMeta {
    fn from(collection: &VariableCollection) -> Self {
        Self {
            collection_id: collection.id.clone(),
            modes: collection
                .modes
                .iter()
                .map(|mode| (mode.name.clone(), mode.id.clone()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    pub label: String,
    #[serde(flatten)]
    pub items: GroupItems,
}
impl Group {
    fn new(key: &str, items: GroupItems) -> Self {
        Self {
            label: group_label(key),
            items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupItems {
    Tokens(Vec<Token>),
    Styles(Vec<StyleToken>),
}
impl GroupItems {
    pub fn len(&self) -> usize {
        match self {
            GroupItems::Tokens(tokens) => tokens.len(),
            GroupItems::Styles(styles) => styles.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub name: String,
    pub type_: Option<VariableType>,
    /// `Some(None)` is written as an explicit `null`.
    pub value: Option<Option<Resolved>>,
    pub placement: ValuePlacement,
    pub description: String,
    pub ids: FigmaIds,
    pub light: Option<Swatch>,
    pub dark: Option<Swatch>,
}
impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", &self.name)?;
        if let Some(type_) = &self.type_ {
            map.serialize_entry("type", type_)?;
        }
        let value = self.value.as_ref();
        if let (ValuePlacement::Leading, Some(value)) = (self.placement, value) {
            map.serialize_entry("value", value)?;
        }
        map.serialize_entry("description", &self.description)?;
        map.serialize_entry("_figmaId", &self.ids.figma_id)?;
        if !self.ids.alias_ids.is_empty() {
            map.serialize_entry("_aliasIds", &self.ids.alias_ids)?;
        }
        if let (ValuePlacement::Trailing, Some(value)) = (self.placement, value) {
            map.serialize_entry("value", value)?;
        }
        if let Some(light) = &self.light {
            map.serialize_entry("light", light)?;
        }
        if let Some(dark) = &self.dark {
            map.serialize_entry("dark", dark)?;
        }
        map.end()
    }
}

/// Where a token's `value` goes: right after `name`/`type`, or after the ids
/// (typography tokens).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValuePlacement {
    #[default]
    Leading,
    Trailing,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FigmaIds {
    pub figma_id: String,
    /// Mode name to the id of the variable aliased in that mode.
    pub alias_ids: IndexMap<String, Option<String>>,
}

/// One mode's value of a colour collection token.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Swatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Resolved>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleToken {
    pub name: String,
    pub specimen: String,
    pub resolved: ResolvedStyle,
    pub recipe: Recipe,
}

/// The text style's own values, echoed as exported.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub font_family: Option<String>,
    pub font_style: Option<String>,
    pub font_size: Option<Number>,
    pub line_height: Option<Number>,
    pub letter_spacing: Option<Number>,
}

/// Typography variable names a text style is composed of.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    pub font_weight: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<String>,
}
