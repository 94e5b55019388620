//! Local filesystem backend
//!
//! Recursive directory deletion with the bottom-up ordering most filesystems
//! require: a directory can only be removed once its contents are gone.

use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Recursively and irreversibly remove a directory tree
///
/// Follows symbolic links during the walk and deletes entries deepest first.
/// Fails with `NotFound` when the target does not exist. The first deletion
/// failure aborts the walk; a partially deleted tree is left as-is.
pub fn delete_local_directory(dir_path: &Path) -> io::Result<()> {
    if !dir_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Directory does not exist: {}", dir_path.display()),
        ));
    }

    let walk = WalkDir::new(dir_path).follow_links(true).contents_first(true);
    for entry in walk {
        let entry = entry.map_err(|e| {
            io::Error::other(format!("Failed to walk {}: {e}", dir_path.display()))
        })?;

        // A followed symlink reports the target's type; remove the link
        // itself, not the target.
        if entry.file_type().is_dir() && !entry.path_is_symlink() {
            std::fs::remove_dir(entry.path())?;
        } else {
            std::fs::remove_file(entry.path())?;
        }
    }

    tracing::debug!(path = %dir_path.display(), "local directory tree removed");
    Ok(())
}
