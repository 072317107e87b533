//! Local diagnostic copy of each published value.

use std::path::{Path, PathBuf};

use crate::error::PublishError;

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> PublishError + '_ {
    move |source| PublishError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Write `{dir}/{key}.json`, first moving any previous dump to
/// `{dir}/{key}_old.json`.
pub async fn write_dump(dir: &Path, key: &str, contents: &[u8]) -> Result<PathBuf, PublishError> {
    tokio::fs::create_dir_all(dir).await.map_err(io_err(dir))?;

    let current = dir.join(format!("{key}.json"));
    let old = dir.join(format!("{key}_old.json"));
    if tokio::fs::try_exists(&current).await.map_err(io_err(&current))? {
        tokio::fs::rename(&current, &old).await.map_err(io_err(&old))?;
    }
    tokio::fs::write(&current, contents).await.map_err(io_err(&current))?;
    tracing::debug!(path = %current.display(), bytes = contents.len(), "Wrote local dump");
    Ok(current)
}
