//! Naming conventions that map sources to build artifacts.
//!
//! Everything here is a pure function of its input path. Paths are relative to
//! the project root and rendered with `/` so the generated file is identical
//! on every platform.

use std::path::{Component, Path, PathBuf};

use crate::consts::{BIN_DIR, OBJ_DIR, OBJECT_EXTENSION};

/// Map a source file to its object file: `src/a.c++` -> `obj/src/a.o`.
///
/// Only the `obj/` prefix and the final extension change. Two sources that
/// differ only by extension map to the same object; that collision is not
/// detected. A dotfile such as `.c++` has no extension, so it becomes `.c++.o`.
pub fn derive_output_path(source: &Path) -> PathBuf {
  Path::new(OBJ_DIR).join(source).with_extension(OBJECT_EXTENSION)
}

/// Name of an example program: its file stem.
pub fn example_name(source: &Path) -> String {
  source
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_default()
}

/// Linked binary for an example: `bin/examples/<name>`.
pub fn example_binary(source: &Path) -> PathBuf {
  Path::new(BIN_DIR).join("examples").join(example_name(source))
}

/// Static archive for the library: `bin/lib<name>.a`.
pub fn library_archive(name: &str) -> PathBuf {
  Path::new(BIN_DIR).join(format!("lib{name}.a"))
}

/// Render a relative path with `/` separators.
pub fn ninja_path(path: &Path) -> String {
  let mut parts = Vec::new();
  for component in path.components() {
    match component {
      Component::Normal(part) => parts.push(part.to_string_lossy()),
      Component::CurDir => {}
      Component::ParentDir => parts.push("..".into()),
      Component::RootDir | Component::Prefix(_) => return path.to_string_lossy().into_owned(),
    }
  }
  parts.join("/")
}
