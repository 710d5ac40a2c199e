use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Recursively collects the absolute paths of all files under `root` whose
/// extension is `extension` (without the leading dot).
///
/// The result is sorted. A root that does not exist or cannot be read yields
/// an empty list, entries that cannot be read are skipped.
pub fn find_files<P: AsRef<Path>>(root: P, extension: &str) -> Vec<PathBuf> {
    let root = root.as_ref();
    let root = match root.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            warn!("Cannot read data directory {}: {}", root.display(), e);
            return vec![];
        }
    };
    if !root.is_dir() {
        warn!("{} is not a directory", root.display());
        return vec![];
    }

    let mut files: Vec<PathBuf> = WalkDir::new(&root)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect();
    files.sort();

    debug!("Found {} .{} files under {}", files.len(), extension, root.display());
    files
}
