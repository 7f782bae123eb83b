//! End-to-end generation: scan, plan, write.
//!
//! # Submodules
//!
//! - [`plan`] - pure graph construction from discovered sources
//! - [`report`] - JSON view of a planned graph

pub mod plan;
pub mod report;

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::BootstrapConfig;
use crate::discover::{DiscoverError, discover_sorted};
use crate::graph::{GraphError, TargetGraph};
use crate::ninja::{self, NinjaWriter};
use crate::placeholder::PlaceholderError;

pub use plan::plan;
pub use report::GraphReport;

/// Errors that can occur while generating the build file.
#[derive(Debug, Error)]
pub enum GenerateError {
  #[error(transparent)]
  Discover(#[from] DiscoverError),

  #[error(transparent)]
  Graph(#[from] GraphError),

  #[error("invalid command template: {0}")]
  Placeholder(#[from] PlaceholderError),

  #[error("failed to write {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Sorted, root-relative sources for each category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceTree {
  pub library: Vec<PathBuf>,
  pub tests: Vec<PathBuf>,
  pub examples: Vec<PathBuf>,
}

impl SourceTree {
  /// Scan the library, test and example directories under `config.root`.
  pub fn discover(config: &BootstrapConfig) -> Result<Self, DiscoverError> {
    let layout = &config.layout;
    let scan = |dir: &Path| discover_sorted(&config.root, dir, &layout.source_pattern);

    Ok(Self {
      library: scan(&layout.source_dir)?,
      tests: scan(&layout.test_dir)?,
      examples: scan(&layout.examples_dir)?,
    })
  }
}

/// Summary of a completed generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
  pub output: PathBuf,
  pub rules: usize,
  pub nodes: usize,
  pub library_sources: usize,
  pub test_sources: usize,
  pub examples: usize,
}

/// Scan the project and build its graph without writing anything.
pub fn load(config: &BootstrapConfig) -> Result<(SourceTree, TargetGraph), GenerateError> {
  let sources = SourceTree::discover(config)?;
  info!(
    library = sources.library.len(),
    tests = sources.tests.len(),
    examples = sources.examples.len(),
    "discovered sources"
  );

  let graph = plan(config, &sources)?;
  debug!(rules = graph.rules().len(), nodes = graph.nodes().len(), "planned graph");
  Ok((sources, graph))
}

/// Scan, plan and write the build file into `config.root`.
pub fn generate(config: &BootstrapConfig) -> Result<GenerateReport, GenerateError> {
  let (sources, graph) = load(config)?;
  let output = config.root.join(&config.output);

  write_graph(&graph, &output)?;
  info!(path = ?output, "wrote build file");

  Ok(GenerateReport {
    output,
    rules: graph.rules().len(),
    nodes: graph.nodes().len(),
    library_sources: sources.library.len(),
    test_sources: sources.tests.len(),
    examples: sources.examples.len(),
  })
}

/// Render `graph` to `path`, replacing any previous file atomically.
///
/// The file is written to a `.tmp` sibling and renamed over `path`, so it gets
/// the same permissions as any other file created in that directory.
pub fn write_graph(graph: &TargetGraph, path: &Path) -> Result<(), GenerateError> {
  let write_err = |source| GenerateError::Write {
    path: path.to_path_buf(),
    source,
  };

  let mut writer = NinjaWriter::new(Vec::new());
  ninja::render(graph, &mut writer).map_err(write_err)?;

  let temp_path = temp_sibling(path);
  fs::write(&temp_path, writer.into_inner()).map_err(write_err)?;
  if let Err(source) = fs::rename(&temp_path, path) {
    let _ = fs::remove_file(&temp_path);
    return Err(write_err(source));
  }

  debug!(path = ?path, "replaced build file");
  Ok(())
}

/// `build.ninja` -> `build.ninja.tmp`
fn temp_sibling(path: &Path) -> PathBuf {
  let mut name = path.file_name().unwrap_or_default().to_os_string();
  name.push(".tmp");
  path.with_file_name(name)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::graph::GraphBuilder;
  use crate::util::testutil::{make_dirs, write_tree};
  use tempfile::TempDir;
  use tracing_test::traced_test;

  fn config_for(root: &Path) -> BootstrapConfig {
    BootstrapConfig {
      root: root.to_path_buf(),
      ..Default::default()
    }
  }

  #[test]
  fn generate_writes_the_build_file() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["src/a.c++", "test/t.c++", "examples/bench.c++"]);

    let report = generate(&config_for(temp.path())).unwrap();

    assert_eq!(report.output, temp.path().join("build.ninja"));
    assert_eq!(report.library_sources, 1);
    assert_eq!(report.examples, 1);
    let text = std::fs::read_to_string(&report.output).unwrap();
    assert!(text.contains("build bin/examples/bench: link obj/examples/bench.o bin/libnonius.a\n"));
    assert!(text.ends_with("default examples\n"));
  }

  #[test]
  fn generate_is_idempotent() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["src/b.c++", "src/a.c++", "test/t.c++", "examples/x.c++"]);
    let config = config_for(temp.path());

    let first = std::fs::read(generate(&config).unwrap().output).unwrap();
    let second = std::fs::read(generate(&config).unwrap().output).unwrap();

    assert_eq!(first, second);
  }

  #[traced_test]
  #[test]
  fn generation_logs_source_counts() {
    let temp = TempDir::new().unwrap();
    write_tree(temp.path(), &["src/a.c++", "src/b.c++"]);
    make_dirs(temp.path(), &["test", "examples"]);

    generate(&config_for(temp.path())).unwrap();

    assert!(logs_contain("discovered sources"));
    assert!(logs_contain("library=2"));
    assert!(logs_contain("wrote build file"));
  }

  #[test]
  fn missing_source_dir_aborts_without_writing() {
    let temp = TempDir::new().unwrap();
    make_dirs(temp.path(), &["src", "test"]);

    let err = generate(&config_for(temp.path())).unwrap_err();

    assert!(matches!(err, GenerateError::Discover(_)));
    assert!(!temp.path().join("build.ninja").exists());
  }

  #[test]
  fn existing_file_is_replaced() {
    let temp = TempDir::new().unwrap();
    make_dirs(temp.path(), &["src", "test", "examples"]);
    std::fs::write(temp.path().join("build.ninja"), "stale").unwrap();

    generate(&config_for(temp.path())).unwrap();

    let text = std::fs::read_to_string(temp.path().join("build.ninja")).unwrap();
    assert!(!text.contains("stale"));
  }

  #[cfg(unix)]
  #[test]
  fn build_file_gets_the_directory_default_mode() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    make_dirs(temp.path(), &["src", "test", "examples"]);
    let plain = temp.path().join("plain.txt");
    std::fs::write(&plain, "x").unwrap();

    let report = generate(&config_for(temp.path())).unwrap();

    let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(&report.output), mode(&plain));
    assert!(!temp.path().join("build.ninja.tmp").exists());
  }

  #[test]
  fn temp_file_sits_next_to_the_output() {
    assert_eq!(temp_sibling(Path::new("/p/build.ninja")), PathBuf::from("/p/build.ninja.tmp"));
    assert_eq!(temp_sibling(Path::new("debug.ninja")), PathBuf::from("debug.ninja.tmp"));
  }

  #[test]
  fn write_into_missing_directory_fails() {
    let temp = TempDir::new().unwrap();
    let graph = GraphBuilder::new().finish(Vec::<String>::new());

    let err = write_graph(&graph, &temp.path().join("missing").join("build.ninja")).unwrap_err();

    assert!(matches!(err, GenerateError::Write { .. }));
  }
}
