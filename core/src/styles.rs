//! Text styles expressed as recipes of typography variables.

use serde_json::Number;

use crate::config::BuildConfig;
use crate::document::{Collection, Recipe, ResolvedStyle, StyleToken};
use crate::figma::{find_collection, TextStyle, VariableCollection, VariableType};

const HEADING_SPECIMEN: &str = "Fire";
const BODY_SPECIMEN: &str = "Through the darkness of future's past, the magician longs to see. \
One chants out between two worlds...Fire walk with me.";
const CODE_SPECIMEN: &str = "const greeting = 'Fire walk with me';";
const DIGITS_SPECIMEN: &str = "0123456789";

pub fn build_styles(
    variables: &[VariableCollection],
    text_styles: &[TextStyle],
    config: &BuildConfig,
) -> Collection {
    let lookup = find_collection(variables, &config.typography.collection)
        .map(|typography| TypographyLookup::new(typography, &config.typography.mode))
        .unwrap_or_default();

    let mut collection = Collection::new("Styles").with_style_groups(&config.styles.groups);
    for style in text_styles {
        let group = style.name.split('/').next().unwrap_or_default();
        if !collection.groups.contains_key(group) {
            tracing::debug!(style = %style.name, "no style group, skipped");
            continue;
        }
        collection.push_style(group, style_token(style, group, &lookup));
    }
    collection
}

fn style_token(style: &TextStyle, group: &str, lookup: &TypographyLookup) -> StyleToken {
    StyleToken {
        name: format!("text.{}", style.name.replace('/', ".")),
        specimen: specimen(group, &style.name).to_string(),
        resolved: ResolvedStyle {
            font_family: style.font_family.clone(),
            font_style: style.font_style.clone(),
            font_size: style.font_size.clone(),
            line_height: style.line_height.clone(),
            letter_spacing: style.letter_spacing.clone(),
        },
        recipe: lookup.recipe(style),
    }
}

fn specimen(group: &str, name: &str) -> &'static str {
    match group {
        "heading" => HEADING_SPECIMEN,
        "body" => BODY_SPECIMEN,
        "technical" if name.contains("code") => CODE_SPECIMEN,
        "technical" => DIGITS_SPECIMEN,
        _ => "",
    }
}

/// Reverse maps from resolved typography values to the variables holding them.
///
/// Later variables win when two resolve to the same value.
#[derive(Debug, Default)]
pub struct TypographyLookup {
    families: Vec<(String, String)>,
    weights: Vec<(String, String)>,
    sizes: Vec<(f64, String)>,
    heights: Vec<(f64, String)>,
}

impl TypographyLookup {
    pub fn new(typography: &VariableCollection, mode: &str) -> Self {
        let mut lookup = Self::default();
        for variable in &typography.variables {
            let Some(resolved) = variable.resolved(mode) else {
                continue;
            };
            let name = variable.name.clone();
            let text = resolved.as_str().map(str::to_string);
            let number = resolved.as_f64();
            match (variable.type_, text, number) {
                (VariableType::String, Some(text), _) if name.contains("family") => {
                    lookup.families.push((text, name))
                }
                (VariableType::String, Some(text), _) if name.contains("weight") => {
                    lookup.weights.push((text, name))
                }
                (VariableType::Float, _, Some(number)) if name.contains("size") => {
                    lookup.sizes.push((number, name))
                }
                (VariableType::Float, _, Some(number)) if name.contains("height") => {
                    lookup.heights.push((number, name))
                }
                _ => {}
            }
        }
        lookup
    }

    pub fn recipe(&self, style: &TextStyle) -> Recipe {
        let font_style = style.font_style.as_deref();
        Recipe {
            font_family: style
                .font_family
                .as_deref()
                .and_then(|family| find_text(&self.families, family)),
            font_weight: font_style
                .and_then(|weight| find_text(&self.weights, weight))
                .unwrap_or_else(|| {
                    let weight = font_style.unwrap_or("regular").to_lowercase();
                    format!("font/weight/{weight}")
                }),
            font_size: style
                .font_size
                .as_ref()
                .and_then(|size| find_number(&self.sizes, size)),
            line_height: style
                .line_height
                .as_ref()
                .and_then(|height| find_number(&self.heights, height)),
            letter_spacing: style.letter_spacing.as_ref().map(letter_spacing),
        }
    }
}

fn find_text(entries: &[(String, String)], key: &str) -> Option<String> {
    entries
        .iter()
        .rev()
        .find(|(value, _)| value == key)
        .map(|(_, name)| name.clone())
}

fn find_number(entries: &[(f64, String)], key: &Number) -> Option<String> {
    let key = key.as_f64()?;
    entries
        .iter()
        .rev()
        .find(|(value, _)| *value == key)
        .map(|(_, name)| name.clone())
}

fn letter_spacing(spacing: &Number) -> String {
    match spacing.as_f64() {
        Some(value) if value == -0.5 => "font/spacing/tight".to_string(),
        Some(value) if value == 0.0 => "font/spacing/normal".to_string(),
        _ => format!("font/spacing/{spacing}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::GroupItems;
    use serde_json::json;

    fn typography() -> Vec<VariableCollection> {
        serde_json::from_value(json!([{
            "id": "t", "name": "Typography", "modes": [{ "id": "1", "name": "Default" }],
            "variables": [
                { "id": "1", "name": "font/family/body", "type": "STRING", "values": { "Default": { "resolved": "Outfit" } } },
                { "id": "2", "name": "font/family/mono", "type": "STRING", "values": { "Default": { "resolved": "JetBrains Mono" } } },
                { "id": "3", "name": "font/weight/semibold", "type": "STRING", "values": { "Default": { "resolved": "SemiBold" } } },
                { "id": "4", "name": "font/size/1000", "type": "FLOAT", "values": { "Default": { "resolved": 48 } } },
                { "id": "5", "name": "font/height/1000", "type": "FLOAT", "values": { "Default": { "resolved": 60 } } },
                { "id": "6", "name": "font/size/100", "type": "FLOAT", "values": { "Default": { "resolved": 12 } } },
                { "id": "7", "name": "font/size/small", "type": "FLOAT", "values": { "Default": { "resolved": 12 } } },
                { "id": "8", "name": "font/size/none", "type": "FLOAT", "values": { "Default": { "resolved": null } } }
            ]
        }]))
        .unwrap()
    }

    fn style(value: serde_json::Value) -> TextStyle {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn recipe_refers_to_matching_variables() {
        let lookup = TypographyLookup::new(&typography()[0], "Default");
        let recipe = lookup.recipe(&style(json!({
            "name": "heading/xxlarge",
            "fontFamily": "Outfit",
            "fontStyle": "SemiBold",
            "fontSize": 48.0,
            "lineHeight": 60,
            "letterSpacing": -0.5
        })));

        assert_eq!(
            recipe,
            Recipe {
                font_family: Some("font/family/body".to_string()),
                font_weight: "font/weight/semibold".to_string(),
                font_size: Some("font/size/1000".to_string()),
                line_height: Some("font/height/1000".to_string()),
                letter_spacing: Some("font/spacing/tight".to_string()),
            }
        );
    }

    #[test]
    fn unmatched_values_are_left_out() {
        let lookup = TypographyLookup::new(&typography()[0], "Default");
        let recipe = lookup.recipe(&style(json!({
            "name": "body/small",
            "fontFamily": "Inter",
            "fontStyle": "Bold",
            "fontSize": 12,
            "lineHeight": 17,
            "letterSpacing": 0.25
        })));

        assert_eq!(recipe.font_family, None);
        assert_eq!(recipe.font_weight, "font/weight/bold");
        // the later of two variables holding 12 wins
        assert_eq!(recipe.font_size.as_deref(), Some("font/size/small"));
        assert_eq!(recipe.line_height, None);
        assert_eq!(recipe.letter_spacing.as_deref(), Some("font/spacing/0.25"));

        let bare = lookup.recipe(&style(json!({ "name": "body/bare", "letterSpacing": 0 })));
        assert_eq!(bare.font_weight, "font/weight/regular");
        assert_eq!(bare.letter_spacing.as_deref(), Some("font/spacing/normal"));
    }

    #[test]
    fn styles_are_grouped_with_specimens() {
        let styles: Vec<TextStyle> = serde_json::from_value(json!([
            { "name": "heading/large", "fontFamily": "Outfit", "fontSize": 48 },
            { "name": "technical/code", "fontFamily": "JetBrains Mono" },
            { "name": "technical/numeric" },
            { "name": "caption/small" }
        ]))
        .unwrap();
        let collection = build_styles(&typography(), &styles, &BuildConfig::default());

        assert_eq!(collection.groups.keys().collect::<Vec<_>>(), vec!["heading", "body", "technical"]);
        assert!(collection.groups["body"].items.is_empty());
        let GroupItems::Styles(technical) = &collection.groups["technical"].items else {
            panic!("technical holds tokens");
        };
        assert_eq!(technical[0].name, "text.technical.code");
        assert_eq!(technical[0].specimen, CODE_SPECIMEN);
        assert_eq!(technical[0].recipe.font_family.as_deref(), Some("font/family/mono"));
        assert_eq!(technical[1].specimen, DIGITS_SPECIMEN);

        assert_eq!(
            serde_json::to_value(&collection.groups["heading"]).unwrap(),
            json!({
                "label": "Heading",
                "styles": [{
                    "name": "text.heading.large",
                    "specimen": "Fire",
                    "resolved": {
                        "fontFamily": "Outfit",
                        "fontStyle": null,
                        "fontSize": 48,
                        "lineHeight": null,
                        "letterSpacing": null
                    },
                    "recipe": {
                        "fontFamily": "font/family/body",
                        "fontWeight": "font/weight/regular",
                        "fontSize": "font/size/1000"
                    }
                }]
            })
        );
    }

    #[test]
    fn styles_without_typography_still_build() {
        let styles = vec![style(json!({ "name": "body/medium", "fontStyle": "Medium" }))];
        let collection = build_styles(&[], &styles, &BuildConfig::default());
        let GroupItems::Styles(body) = &collection.groups["body"].items else {
            panic!("body holds tokens");
        };
        assert_eq!(body[0].recipe.font_weight, "font/weight/medium");
        assert_eq!(body[0].recipe.font_family, None);
    }
}
