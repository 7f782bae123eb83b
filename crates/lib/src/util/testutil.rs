//! Test utilities for ninjagen-lib.
//!
//! Helpers that lay out throwaway project trees on disk.

use std::path::Path;

/// Create every listed file (and its parent directories) under `root`.
pub fn write_tree(root: &Path, files: &[&str]) {
  for file in files {
    let path = root.join(file);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, "// fixture\n").unwrap();
  }
}

/// Create an empty directory for each listed name under `root`.
pub fn make_dirs(root: &Path, dirs: &[&str]) {
  for dir in dirs {
    std::fs::create_dir_all(root.join(dir)).unwrap();
  }
}
