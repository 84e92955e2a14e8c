use crate::error::FactoryError;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically replace a secret file.
/// - Writes a sibling temp file created with 0o600 permissions on Unix.
/// - Refuses to operate through symlinked directories or onto symlinks.
/// - Renames the temp file over the target once fully flushed.
pub fn write_secret_file_atomic(path: &Path, contents: &str) -> Result<(), FactoryError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
        let meta = fs::symlink_metadata(parent)?;
        if meta.file_type().is_symlink() {
            return Err(FactoryError::Io(std::io::Error::other(format!(
                "Refusing to write through symlinked directory: {}",
                parent.display()
            ))));
        }
        if !meta.is_dir() {
            return Err(FactoryError::Io(std::io::Error::other(format!(
                "Parent is not a directory: {}",
                parent.display()
            ))));
        }
    }

    if let Ok(meta) = fs::symlink_metadata(path)
        && meta.file_type().is_symlink()
    {
        return Err(FactoryError::Io(std::io::Error::other(format!(
            "Refusing to overwrite symlink: {}",
            path.display()
        ))));
    }

    let tmp_path = temp_path_for(path);
    // A temp file left behind by an interrupted write is stale.
    if tmp_path.exists() {
        fs::remove_file(&tmp_path)?;
    }

    let mut options = OpenOptions::new();
    options.create_new(true).write(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp_path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    drop(file);

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(FactoryError::Io(e));
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
