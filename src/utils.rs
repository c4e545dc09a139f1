//! Owner-only file helpers for cached secrets and generated artifacts.

use std::{
    ffi::OsString,
    io,
    path::{Path, PathBuf},
};

use tokio::{fs, io::AsyncWriteExt};

/// Owner read/write
pub const PRIVATE_FILE_MODE: u32 = 0o600;

/// Owner read/write/execute
pub const PRIVATE_EXEC_MODE: u32 = 0o700;

/// Appends `suffix` to the final path component (`dev` -> `dev.json`)
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Creates `dir` and any missing parents with mode 0700
pub async fn create_private_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(PRIVATE_EXEC_MODE);
    builder.create(dir).await
}

/// Truncates or creates `path` with `mode`, then writes `contents`.
/// An existing file is narrowed to `mode` before any byte is written.
pub async fn write_private(path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(mode);

    let mut file = options.open(path).await?;
    restrict_permissions(path, mode).await?;
    file.write_all(contents).await?;
    file.flush().await?;
    Ok(())
}

/// Writes to a sibling temporary file and renames it over `path`
pub async fn replace_private(path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
    let staging = with_suffix(path, ".tmp");
    write_private(&staging, contents, mode).await?;
    if let Err(e) = fs::rename(&staging, path).await {
        fs::remove_file(&staging).await.ok();
        return Err(e);
    }
    Ok(())
}

async fn restrict_permissions(path: &Path, mode: u32) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await?;
    }

    #[cfg(not(unix))]
    {
        let _ = (path, mode);
    }

    Ok(())
}
