// brickforge-core/src/infrastructure/fs.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use crate::domain::project::ProjectTree;
use crate::infrastructure::error::InfrastructureError;

const STAGING_PREFIX: &str = ".brickforge-";

/// Fails with `TargetNotEmpty` unless `dir` is absent or an empty directory.
pub fn ensure_vacant(dir: &Path) -> Result<(), InfrastructureError> {
    if !dir.exists() {
        return Ok(());
    }
    if !dir.is_dir() || fs::read_dir(dir)?.next().is_some() {
        return Err(InfrastructureError::TargetNotEmpty(dir.display().to_string()));
    }
    Ok(())
}

/// Writes the whole tree to `destination`, or nothing at all.
///
/// Files go into a staging directory next to the destination which is then
/// renamed into place. On any failure the staging directory is dropped and
/// removed with its content.
#[instrument(skip(tree), fields(files = tree.len()))]
pub fn write_tree(tree: &ProjectTree, destination: &Path) -> Result<PathBuf, InfrastructureError> {
    ensure_vacant(destination)?;

    let parent = destination
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(parent)?;
    debug!(staging = ?staging.path(), "Writing project into staging directory");

    for dir in tree.directories() {
        fs::create_dir_all(staging.path().join(&dir))?;
    }
    for (relative, content) in tree.iter() {
        fs::write(staging.path().join(relative), content)?;
    }
    // tempdir is created owner-only; the project should not be.
    open_permissions(staging.path())?;

    if destination.exists() {
        fs::remove_dir(destination)?;
    }
    fs::rename(staging.path(), destination)?;
    // The staging path no longer exists; dropping the handle is a no-op.
    drop(staging);

    info!(path = ?destination, "Project written");
    Ok(destination.to_path_buf())
}

#[cfg(unix)]
fn open_permissions(dir: &Path) -> Result<(), InfrastructureError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn open_permissions(_dir: &Path) -> Result<(), InfrastructureError> {
    Ok(())
}

/// Reads every file under `root` back into a tree, keyed by `/` separated
/// relative path. VCS metadata is skipped.
pub fn read_tree(root: &Path) -> Result<ProjectTree, InfrastructureError> {
    if !root.is_dir() {
        return Err(InfrastructureError::ConfigNotFound(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let mut tree = ProjectTree::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(|e| InfrastructureError::Io(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;
        let key = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        tree.insert(key, fs::read_to_string(entry.path())?);
    }
    Ok(tree)
}
