use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

pub mod backup;
pub mod builder;
pub mod changelog;
pub mod color;
pub mod config;
pub mod diff;
pub mod document;
mod error;
pub mod figma;
pub mod store;
pub mod styles;

pub use config::BuildConfig;
pub use diff::{append_changelog, DiffOutcome};
pub use document::TokensDocument;
pub use error::{Result, TokensError};

use backup::BackupReport;
use figma::{TextStyle, VariableCollection};

/// What a build produced, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub output: PathBuf,
    pub collections: Vec<CollectionSummary>,
    pub backup: Option<BackupReport>,
    /// Changelog entries carried over from the previous output.
    pub preserved_entries: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSummary {
    pub name: String,
    pub groups: usize,
    pub tokens: usize,
}

/// Assembles the document from already loaded inputs.
pub fn build_document(
    variables: &[VariableCollection],
    text_styles: &[TextStyle],
    config: &BuildConfig,
    exported_at: DateTime<Utc>,
) -> TokensDocument {
    TokensDocument {
        exported_at: exported_at.to_rfc3339_opts(SecondsFormat::Micros, false),
        collections: builder::build_collections(variables, text_styles, config),
        changelog: None,
    }
}

/// Builds `tokens.json` at `output` from the two export files.
///
/// An existing output is backed up first and its `changelog` carried over;
/// an unreadable previous output simply contributes no changelog.
pub fn build(
    variables_path: &Path,
    styles_path: &Path,
    output: &Path,
    config: &BuildConfig,
) -> Result<BuildReport> {
    let variables: Vec<VariableCollection> = store::read_json(variables_path)?;
    tracing::info!(count = variables.len(), path = %variables_path.display(), "loaded variable collections");
    let text_styles: Vec<TextStyle> = store::read_json(styles_path)?;
    tracing::info!(count = text_styles.len(), path = %styles_path.display(), "loaded text styles");

    let now = Utc::now();
    let mut document = build_document(&variables, &text_styles, config, now);

    let backup = backup::backup_existing(output, &config.backups, now)?;
    document.changelog = previous_changelog(output);
    let preserved_entries = document
        .changelog
        .as_ref()
        .map(|changelog| changelog.as_array().map_or(0, Vec::len));
    if let Some(count) = preserved_entries {
        tracing::info!(count, "preserved changelog entries");
    }

    store::write_json_pretty(output, &document)?;
    tracing::info!(path = %output.display(), "wrote tokens");

    Ok(BuildReport {
        output: output.to_path_buf(),
        collections: document
            .collections
            .values()
            .map(|collection| CollectionSummary {
                name: collection.name.clone(),
                groups: collection.groups.len(),
                tokens: collection.token_count(),
            })
            .collect(),
        backup,
        preserved_entries,
    })
}

fn previous_changelog(output: &Path) -> Option<Value> {
    if !output.exists() {
        return None;
    }
    match store::read_json::<Value>(output) {
        Ok(Value::Object(mut previous)) => previous.remove("changelog"),
        Ok(_) => None,
        Err(err) => {
            tracing::debug!(%err, "previous output unreadable, no changelog to keep");
            None
        }
    }
}
