//! Timestamped copies of the previous `tokens.json`.
//!
//! Backups are named `tokens-YYYYMMDD-HHMMSS-mmm.json` (UTC). A second backup
//! taken within the same millisecond gets a `-N` suffix. Pruning orders backups
//! by the time in their name rather than by file modification time, so copied
//! or restored files keep their place; names that do not parse fall back to
//! their modification time.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use itertools::Itertools;

use crate::config::BackupConfig;
use crate::store::parent_dir;
use crate::{Result, TokensError};

const PREFIX: &str = "tokens-";
const SUFFIX: &str = ".json";

#[derive(Debug, Clone, PartialEq)]
pub struct BackupReport {
    pub path: PathBuf,
    pub pruned: Vec<PathBuf>,
}

/// Copies `output` into the backup directory, then prunes old copies.
///
/// Returns `None` when there is no previous output to back up.
pub fn backup_existing(
    output: &Path,
    config: &BackupConfig,
    now: DateTime<Utc>,
) -> Result<Option<BackupReport>> {
    if !output.exists() {
        return Ok(None);
    }

    let dir = parent_dir(output).join(&config.dir);
    fs::create_dir_all(&dir).map_err(|e| TokensError::io(&dir, e))?;

    let path = free_name(&dir, now);
    fs::copy(output, &path).map_err(|e| TokensError::io(&path, e))?;
    tracing::info!(path = %path.display(), "backed up previous tokens");

    let pruned = prune(&dir, config.keep)?;
    if !pruned.is_empty() {
        tracing::info!(count = pruned.len(), "pruned old backups");
    }

    Ok(Some(BackupReport { path, pruned }))
}

/// Deletes all but the `keep` most recent backups in `dir`, returning what was removed.
pub fn prune(dir: &Path, keep: usize) -> Result<Vec<PathBuf>> {
    let backups = list(dir)?;
    let excess = backups.len().saturating_sub(keep);
    let mut pruned = Vec::with_capacity(excess);
    for (path, _) in backups.into_iter().take(excess) {
        fs::remove_file(&path).map_err(|e| TokensError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "removed backup");
        pruned.push(path);
    }
    Ok(pruned)
}

/// Backups in `dir`, oldest first.
pub fn list(dir: &Path) -> Result<Vec<(PathBuf, BackupStamp)>> {
    let entries = fs::read_dir(dir).map_err(|e| TokensError::io(dir, e))?;
    let mut backups = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| TokensError::io(dir, e))?;
        let os_name = entry.file_name();
        let Some(name) = os_name.to_str() else {
            continue;
        };
        if !name.starts_with(PREFIX) || !name.ends_with(SUFFIX) {
            continue;
        }
        let stamp = match parse_name(name) {
            Some(stamp) => stamp,
            None => {
                let modified = entry
                    .metadata()
                    .and_then(|meta| meta.modified())
                    .map_err(|e| TokensError::io(entry.path(), e))?;
                BackupStamp {
                    time: DateTime::<Utc>::from(modified),
                    seq: 0,
                }
            }
        };
        backups.push((entry.path(), stamp));
    }
    Ok(backups
        .into_iter()
        .sorted_by(|(a_path, a), (b_path, b)| a.cmp(b).then_with(|| a_path.cmp(b_path)))
        .collect())
}

/// Position of a backup in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BackupStamp {
    pub time: DateTime<Utc>,
    /// Collision counter for backups taken within the same millisecond.
    pub seq: u32,
}

pub fn file_name(time: DateTime<Utc>, seq: u32) -> String {
    let stamp = time.format("%Y%m%d-%H%M%S-%3f");
    match seq {
        0 => format!("{PREFIX}{stamp}{SUFFIX}"),
        seq => format!("{PREFIX}{stamp}-{seq}{SUFFIX}"),
    }
}

fn free_name(dir: &Path, now: DateTime<Utc>) -> PathBuf {
    (0..)
        .map(|seq| dir.join(file_name(now, seq)))
        .find(|path| !path.exists())
        .unwrap_or_else(|| dir.join(file_name(now, u32::MAX)))
}

/// Reads `YYYYMMDD-HHMMSS[-mmm[-N]]` back out of a backup file name.
pub fn parse_name(name: &str) -> Option<BackupStamp> {
    let stem = name.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
    let mut parts = stem.split('-');
    let date = parts.next()?;
    let time = parts.next()?;
    let millis = match parts.next() {
        Some(millis) if millis.len() == 3 => millis.parse::<i64>().ok()?,
        Some(_) => return None,
        None => 0,
    };
    let seq = match parts.next() {
        Some(seq) => seq.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    let naive = NaiveDateTime::parse_from_str(&format!("{date}{time}"), "%Y%m%d%H%M%S").ok()?;
    Some(BackupStamp {
        time: naive.and_utc() + Duration::milliseconds(millis),
        seq,
    })
}
