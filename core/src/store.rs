//! JSON file access shared by the builder and the differ.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::{Result, TokensError};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|e| TokensError::io(path, e))?;
    serde_json::from_str(&data).map_err(|e| TokensError::json(path, e))
}

/// Writes `value` as 2-space indented JSON.
///
/// The document goes to a temporary file next to `path` which is then renamed
/// over it, so readers never observe a half written file. An existing target
/// keeps its permissions; a new one gets those of a freshly created file.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let data = serde_json::to_string_pretty(value)?;
    let parent = parent_dir(path);
    fs::create_dir_all(parent).map_err(|e| TokensError::io(parent, e))?;

    #[cfg_attr(not(unix), allow(unused_mut))]
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // 0666 less the umask, as `File::create` would give
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut file = builder
        .tempfile_in(parent)
        .map_err(|e| TokensError::io(parent, e))?;
    if let Ok(existing) = fs::metadata(path) {
        file.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| TokensError::io(file.path(), e))?;
    }
    file.write_all(data.as_bytes())
        .and_then(|_| file.as_file().sync_all())
        .map_err(|e| TokensError::io(file.path(), e))?;
    file.persist(path)
        .map_err(|e| TokensError::io(path, e.error))?;
    Ok(())
}

/// Directory containing `path`; `.` for bare file names.
pub(crate) fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
