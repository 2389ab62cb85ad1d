use std::path::Path;

use crate::error::Result;

/// Create `dir` and any missing parents. Succeeds if it already exists.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs_err::create_dir_all(dir)?;
    Ok(())
}

/// Write `text` to `path`, replacing any existing file.
pub fn write_document(path: &Path, text: &str) -> Result<()> {
    fs_err::write(path, text)?;
    Ok(())
}
