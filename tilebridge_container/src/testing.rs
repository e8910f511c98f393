//! Helpers for tests that need a tile directory tree on disk.

use std::{fs, path::Path};

/// Write `content` to `root/relative`, creating parent directories as needed.
///
/// # Panics
/// Panics if a directory or the file cannot be created.
pub fn write_file(root: &Path, relative: &str, content: &[u8]) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).unwrap();
	}
	fs::write(&path, content).unwrap();
}

/// Write one tile per `(path, content)` pair below `root`.
pub fn write_tiles(root: &Path, tiles: &[(&str, &str)]) {
	for (relative, content) in tiles {
		write_file(root, relative, content.as_bytes());
	}
}
