//! Source discovery.
//!
//! Walks a directory tree depth-first and yields every file whose name
//! matches a glob pattern. Any filesystem error ends the scan.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern, PatternError};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Errors that can occur while scanning for sources.
#[derive(Debug, Error)]
pub enum DiscoverError {
  /// The glob pattern could not be compiled.
  #[error("invalid pattern '{pattern}': {source}")]
  Pattern {
    pattern: String,
    #[source]
    source: PatternError,
  },

  /// A directory could not be read.
  #[error("failed to scan {}: {source}", root.display())]
  Walk {
    root: PathBuf,
    #[source]
    source: walkdir::Error,
  },
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
  case_sensitive: true,
  require_literal_separator: false,
  require_literal_leading_dot: false,
};

/// Lazily find every file under `root` whose file name matches `pattern`.
///
/// The walk recurses into all subdirectories but does not follow symlinked
/// directories. A missing or unreadable `root` surfaces as the first item.
/// Each call walks from scratch.
///
/// # Errors
///
/// Returns an error immediately if `pattern` is not a valid glob.
pub fn discover(
  root: &Path,
  pattern: &str,
) -> Result<impl Iterator<Item = Result<PathBuf, DiscoverError>> + use<>, DiscoverError> {
  let matcher = Pattern::new(pattern).map_err(|source| DiscoverError::Pattern {
    pattern: pattern.to_string(),
    source,
  })?;
  let root = root.to_path_buf();

  debug!(root = ?root, pattern = %pattern, "scanning for sources");

  let walk = WalkDir::new(&root).follow_links(false).into_iter();
  Ok(walk.filter_map(move |entry| {
    let entry = match entry {
      Ok(entry) => entry,
      Err(source) => {
        return Some(Err(DiscoverError::Walk {
          root: root.clone(),
          source,
        }));
      }
    };

    let is_file = entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file());
    if !is_file {
      return None;
    }

    let matched = matcher.matches_with(&entry.file_name().to_string_lossy(), MATCH_OPTIONS);
    matched.then(|| Ok(entry.into_path()))
  }))
}

/// Discover `dir` inside `project_root` and return sorted, root-relative paths.
///
/// Sorting makes the emitted graph independent of the filesystem's
/// enumeration order.
pub fn discover_sorted(project_root: &Path, dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, DiscoverError> {
  let mut files = discover(&project_root.join(dir), pattern)?
    .map(|path| {
      path.map(|p| match p.strip_prefix(project_root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => p,
      })
    })
    .collect::<Result<Vec<_>, _>>()?;
  files.sort();

  debug!(dir = ?dir, count = files.len(), "discovered sources");
  Ok(files)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::util::testutil::write_tree;
  use tempfile::TempDir;

  #[test]
  fn finds_every_matching_file_recursively() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["src/a.c++", "src/detail/b.c++", "src/deep/er/c.c++"]);

    let found: Vec<_> = discover(&temp.path().join("src"), "*.c++")
      .unwrap()
      .collect::<Result<_, _>>()
      .unwrap();

    assert_eq!(found.len(), 3);
    for path in &found {
      assert!(path.starts_with(temp.path().join("src")));
      assert_eq!(path.extension().unwrap(), "c++");
    }
  }

  #[test]
  fn non_matching_files_are_skipped() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["src/a.c++", "src/a.h++", "src/notes.txt", "src/a.c++.orig"]);

    let found = discover_sorted(temp.path(), Path::new("src"), "*.c++").unwrap();

    assert_eq!(found, vec![PathBuf::from("src/a.c++")]);
  }

  #[test]
  fn matching_is_case_sensitive() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["src/a.c++", "src/B.C++"]);

    let found = discover_sorted(temp.path(), Path::new("src"), "*.c++").unwrap();

    assert_eq!(found, vec![PathBuf::from("src/a.c++")]);
  }

  #[test]
  fn directories_named_like_sources_are_not_yielded() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["src/odd.c++/inner.c++"]);

    let found = discover_sorted(temp.path(), Path::new("src"), "*.c++").unwrap();

    assert_eq!(found, vec![PathBuf::from("src/odd.c++/inner.c++")]);
  }

  #[test]
  fn sorted_results_are_relative_and_ordered() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["test/z.c++", "test/b/x.c++", "test/a.c++"]);

    let found = discover_sorted(temp.path(), Path::new("test"), "*.c++").unwrap();

    assert_eq!(
      found,
      vec![
        PathBuf::from("test/a.c++"),
        PathBuf::from("test/b/x.c++"),
        PathBuf::from("test/z.c++"),
      ]
    );
  }

  #[test]
  fn empty_directory_yields_nothing() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("src")).unwrap();

    assert!(discover_sorted(temp.path(), Path::new("src"), "*.c++").unwrap().is_empty());
  }

  #[test]
  fn missing_root_is_an_error() {
    let temp = TempDir::new().unwrap();

    let err = discover_sorted(temp.path(), Path::new("nowhere"), "*.c++").unwrap_err();

    assert!(matches!(err, DiscoverError::Walk { .. }));
    assert!(err.to_string().contains("nowhere"));
  }

  #[test]
  fn invalid_pattern_is_rejected_up_front() {
    let temp = TempDir::new().unwrap();

    let err = discover(temp.path(), "[*.c++").err().unwrap();

    assert!(matches!(err, DiscoverError::Pattern { .. }));
  }

  #[test]
  fn rescanning_sees_new_files() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["src/a.c++"]);
    assert_eq!(discover_sorted(temp.path(), Path::new("src"), "*.c++").unwrap().len(), 1);

    write_tree(temp.path(), &["src/b.c++"]);
    assert_eq!(discover_sorted(temp.path(), Path::new("src"), "*.c++").unwrap().len(), 2);
  }

  #[cfg(unix)]
  mod unix {
    use std::os::unix::fs::{PermissionsExt, symlink};

    use super::*;

    #[test]
    fn symlinked_files_are_yielded() {
      let temp = TempDir::new().unwrap();
      write_tree(temp.path(), &["src/real/a.c++", "elsewhere/b.c++"]);
      symlink(temp.path().join("elsewhere/b.c++"), temp.path().join("src/link.c++")).unwrap();

      let found = discover_sorted(temp.path(), Path::new("src"), "*.c++").unwrap();

      assert_eq!(found, vec![PathBuf::from("src/link.c++"), PathBuf::from("src/real/a.c++")]);
    }

    #[test]
    fn symlinked_directories_are_not_entered() {
      let temp = TempDir::new().unwrap();
      write_tree(temp.path(), &["src/a.c++", "outside/b.c++"]);
      symlink(temp.path().join("outside"), temp.path().join("src/linkdir")).unwrap();

      let found = discover_sorted(temp.path(), Path::new("src"), "*.c++").unwrap();

      assert_eq!(found, vec![PathBuf::from("src/a.c++")]);
    }

    #[test]
    fn dangling_symlinks_are_skipped() {
      let temp = TempDir::new().unwrap();
      write_tree(temp.path(), &["src/a.c++"]);
      symlink(temp.path().join("gone.c++"), temp.path().join("src/dangling.c++")).unwrap();

      let found = discover_sorted(temp.path(), Path::new("src"), "*.c++").unwrap();

      assert_eq!(found, vec![PathBuf::from("src/a.c++")]);
    }

    #[test]
    fn unreadable_directory_aborts_the_scan() {
      let temp = TempDir::new().unwrap();
      write_tree(temp.path(), &["src/a.c++", "src/locked/b.c++"]);
      let locked = temp.path().join("src/locked");
      std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

      // Privileged users read through the mode bits; nothing to check then.
      let privileged = std::fs::read_dir(&locked).is_ok();
      let result = discover_sorted(temp.path(), Path::new("src"), "*.c++");
      std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
      if privileged {
        return;
      }

      let err = result.unwrap_err();
      assert!(matches!(err, DiscoverError::Walk { .. }));
    }
  }
}
