//! Reshapes the exported variable collections into the `tokens.json` collections.

use indexmap::IndexMap;

use crate::color::alias_suffix;
use crate::config::{BuildConfig, CollectionConfig, ColorConfig, SizeConfig};
use crate::document::{Collection, FigmaIds, Swatch, Token, ValuePlacement};
use crate::figma::{find_collection, Resolved, TextStyle, Variable, VariableCollection, VariableType};
use crate::styles::build_styles;

/// All output collections, keyed and ordered as they appear in `tokens.json`.
pub fn build_collections(
    variables: &[VariableCollection],
    text_styles: &[TextStyle],
    config: &BuildConfig,
) -> IndexMap<String, Collection> {
    let mut collections = IndexMap::new();
    collections.insert("color".to_string(), build_color(variables, &config.color));
    collections.insert(
        "typography".to_string(),
        build_typography(variables, &config.typography),
    );
    collections.insert(
        "size".to_string(),
        build_size(variables, &config.size, &config.color),
    );
    collections.insert(
        "styles".to_string(),
        build_styles(variables, text_styles, config),
    );
    collections.insert("state".to_string(), build_state(variables, &config.state));
    collections
}

const COLOR_MODES: &[&str] = &["Light", "Dark"];

pub fn build_color(variables: &[VariableCollection], config: &ColorConfig) -> Collection {
    let Some(source) = find_collection(variables, &config.collection) else {
        tracing::debug!(collection = %config.collection, "collection not found");
        return Collection::new("Color").with_modes(COLOR_MODES);
    };

    let mut collection = Collection::new("Color")
        .with_modes(COLOR_MODES)
        .with_meta(source)
        .with_token_groups(&config.groups);

    for variable in &source.variables {
        let group = variable.segment(0).unwrap_or_default();
        let swatch: fn(&Variable, &str) -> Swatch = match variable.type_ {
            VariableType::Color => color_swatch,
            VariableType::Float => float_swatch,
            _ => continue,
        };
        let token = Token {
            light: variable
                .value(&config.light_mode)
                .map(|_| swatch(variable, &config.light_mode)),
            dark: variable
                .value(&config.dark_mode)
                .map(|_| swatch(variable, &config.dark_mode)),
            ..token(variable)
        };
        if !collection.push_token(group, token) {
            tracing::debug!(variable = %variable.name, "no colour group, skipped");
        }
    }

    collection.drop_empty_groups()
}

fn color_swatch(variable: &Variable, mode: &str) -> Swatch {
    let value = variable.value(mode).cloned().unwrap_or_default();
    Swatch {
        hex: match value.resolved {
            Some(Resolved::Color(rgba)) => Some(rgba.to_hex()),
            _ => None,
        },
        alias: value.alias.as_deref().map(|alias| alias_suffix(alias).to_string()),
        value: None,
    }
}

fn float_swatch(variable: &Variable, mode: &str) -> Swatch {
    Swatch {
        value: variable.resolved(mode).cloned(),
        ..Swatch::default()
    }
}

pub fn build_typography(variables: &[VariableCollection], config: &CollectionConfig) -> Collection {
    let Some(source) = find_collection(variables, &config.collection) else {
        tracing::debug!(collection = %config.collection, "collection not found");
        return Collection::new("Typography");
    };

    let mut collection = Collection::new("Typography")
        .with_meta(source)
        .with_token_groups(&config.groups);

    for variable in &source.variables {
        // `font/<group>/...`
        let Some(group) = variable.segment(1) else {
            continue;
        };
        if variable.value(&config.mode).is_none() {
            continue;
        }
        let value = match variable.type_ {
            VariableType::String | VariableType::Float => {
                Some(variable.resolved(&config.mode).cloned())
            }
            _ => None,
        };
        let token = Token {
            value,
            placement: ValuePlacement::Trailing,
            ..token(variable)
        };
        collection.push_token(group, token);
    }

    collection.drop_empty_groups()
}

pub fn build_size(
    variables: &[VariableCollection],
    config: &SizeConfig,
    color: &ColorConfig,
) -> Collection {
    let Some(source) = find_collection(variables, &config.collection) else {
        tracing::debug!(collection = %config.collection, "collection not found");
        return Collection::new("Size");
    };

    let mut collection = Collection::new("Size")
        .with_meta(source)
        .with_token_groups(&config.groups);

    for variable in &source.variables {
        let group = variable.segment(0).unwrap_or_default();
        if variable.value(&config.mode).is_none() {
            continue;
        }
        collection.push_token(group, mode_token(variable, &config.mode));
    }

    // Stroke widths are authored next to the colours they apply to.
    if let Some(colors) = find_collection(variables, &color.collection) {
        let prefix = format!("{}/", config.stroke_group);
        for variable in &colors.variables {
            if !variable.name.starts_with(&prefix) || variable.value(&color.light_mode).is_none() {
                continue;
            }
            collection.push_token(&config.stroke_group, mode_token(variable, &color.light_mode));
        }
    }

    collection.drop_empty_groups()
}

const STATE_MODES: &[&str] = &["default"];

pub fn build_state(variables: &[VariableCollection], config: &CollectionConfig) -> Collection {
    let Some(source) = find_collection(variables, &config.collection) else {
        tracing::debug!(collection = %config.collection, "collection not found");
        return Collection::new("State")
            .with_modes(STATE_MODES)
            .with_token_groups(&config.groups);
    };

    let mut collection = Collection::new("State")
        .with_modes(STATE_MODES)
        .with_meta(source)
        .with_token_groups(&config.groups);

    // Every state variable lands in the first group, whatever its path.
    let Some(group) = config.groups.first() else {
        return collection;
    };
    for variable in &source.variables {
        if variable.value(&config.mode).is_none() {
            continue;
        }
        let token = Token {
            type_: Some(variable.type_),
            ..mode_token(variable, &config.mode)
        };
        collection.push_token(group, token);
    }

    collection
}

/// Token carrying `value` from a single mode; explicit `null` when unresolved.
fn mode_token(variable: &Variable, mode: &str) -> Token {
    Token {
        value: Some(variable.resolved(mode).cloned()),
        ..token(variable)
    }
}

fn token(variable: &Variable) -> Token {
    Token {
        name: variable.name.clone(),
        type_: None,
        value: None,
        placement: ValuePlacement::Leading,
        description: variable.description.clone(),
        ids: figma_ids(variable),
        light: None,
        dark: None,
    }
}

fn figma_ids(variable: &Variable) -> FigmaIds {
    FigmaIds {
        figma_id: variable.id.clone(),
        alias_ids: variable
            .values
            .iter()
            .filter_map(|(mode, value)| Some((mode.clone(), value.alias_id.clone()?)))
            .collect(),
    }
}
