//! Generator configuration.
//!
//! [`BootstrapConfig`] holds what the command line controls (compiler, build
//! flavour, extra include dir, where to read and write). [`Layout`] holds the
//! naming conventions of the project being built; its default describes the
//! nonius source tree.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::consts::{BUILD_FILE, DIST_DIR};
use crate::paths::ninja_path;

/// Directory and file naming conventions of the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
  /// Library name; the archive is `bin/lib<name>.a`.
  pub library: String,
  pub include_dir: PathBuf,
  pub source_dir: PathBuf,
  pub test_dir: PathBuf,
  pub examples_dir: PathBuf,
  /// Glob matched against file names when scanning for sources.
  pub source_pattern: String,
  /// Bundled dependencies, each included as `-isystem deps/<name>/include`.
  pub dependencies: Vec<String>,
  /// Extra system include dirs, passed as a single `-isystem<dir>` word.
  pub system_includes: Vec<PathBuf>,
  /// Archiver invocation; `${in}` and `${out}` are the objects and the archive.
  pub archive_command: Vec<String>,
  pub report_template: PathBuf,
  pub report_header: PathBuf,
  /// Runs the tool scripts as `<interpreter> <tool> ${in} ${out}`.
  pub script_interpreter: String,
  /// Turns the report template into a C++ string header.
  pub stringize_tool: PathBuf,
  pub single_header_source: PathBuf,
  pub single_header: PathBuf,
  /// Amalgamates the public headers into one.
  pub single_header_tool: PathBuf,
}

impl Default for Layout {
  fn default() -> Self {
    Self {
      library: "nonius".to_string(),
      include_dir: PathBuf::from("include"),
      source_dir: PathBuf::from("src"),
      test_dir: PathBuf::from("test"),
      examples_dir: PathBuf::from("examples"),
      source_pattern: "*.c++".to_string(),
      dependencies: vec!["catch".to_string(), "wheels".to_string()],
      system_includes: vec![PathBuf::from("deps/cpptemplate")],
      archive_command: tokens(&["ar", "rcs", "${out}", "${in}"]),
      report_template: PathBuf::from("tpl/html_report.tpl"),
      report_header: PathBuf::from("include/nonius/detail/html_report_template.g.h++"),
      script_interpreter: "python".to_string(),
      stringize_tool: PathBuf::from("tools/stringize.py"),
      single_header_source: PathBuf::from("include/nonius/nonius_single.h++"),
      single_header: Path::new(DIST_DIR).join("nonius.h++"),
      single_header_tool: PathBuf::from("tools/single_header.py"),
    }
  }
}

fn tokens(args: &[&str]) -> Vec<String> {
  args.iter().map(|a| a.to_string()).collect()
}

/// Everything that determines the generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapConfig {
  /// Compiler executable.
  pub cxx: String,
  /// Compile with `-g` instead of `-O3`; also disables LTO.
  pub debug: bool,
  /// Skip link-time optimisation.
  pub no_lto: bool,
  /// Extra library folder with an `include/` subfolder, resolved under `deps/`.
  pub boost_dir: Option<PathBuf>,
  /// Preprocessor definitions, passed as `-D<def>`.
  pub defines: Vec<String>,
  /// Libraries linked into every executable, passed as `-l<lib>`.
  pub libs: Vec<String>,
  /// Project root that is scanned and that receives the output file.
  pub root: PathBuf,
  /// Output file name, relative to `root`.
  pub output: PathBuf,
  /// Generator executable re-run by the regeneration rule.
  pub generator: PathBuf,
  pub layout: Layout,
}

impl Default for BootstrapConfig {
  fn default() -> Self {
    Self {
      cxx: "g++".to_string(),
      debug: false,
      no_lto: false,
      boost_dir: None,
      defines: Vec::new(),
      libs: Vec::new(),
      root: PathBuf::from("."),
      output: PathBuf::from(BUILD_FILE),
      generator: PathBuf::from("bootstrap"),
      layout: Layout::default(),
    }
  }
}

impl BootstrapConfig {
  pub fn lto_enabled(&self) -> bool {
    !(self.no_lto || self.debug)
  }

  /// Language and optimisation flags shared by compile and link.
  pub fn compile_flags(&self) -> Vec<String> {
    let optimisation = if self.debug { "-g" } else { "-O3" };
    ["-pedantic", "-std=c++11", "-pthread", optimisation]
      .map(String::from)
      .to_vec()
  }

  pub fn warning_flags(&self) -> Vec<String> {
    ["all", "extra", "error"].iter().map(|w| format!("-W{w}")).collect()
  }

  pub fn include_flags(&self) -> Vec<String> {
    let layout = &self.layout;
    let mut flags = vec![format!("-I{}", ninja_path(&layout.include_dir))];

    for dep in &layout.dependencies {
      flags.extend(dependency_include(Path::new(dep)));
    }
    for dir in &layout.system_includes {
      flags.push(format!("-isystem{}", ninja_path(dir)));
    }
    if let Some(dir) = &self.boost_dir {
      flags.extend(dependency_include(dir));
    }

    flags
  }

  pub fn define_flags(&self) -> Vec<String> {
    self.defines.iter().map(|d| format!("-D{d}")).collect()
  }

  /// Trailing `-l` flags; they follow the objects on the link line.
  pub fn lib_flags(&self) -> Vec<String> {
    self.libs.iter().map(|l| format!("-l{l}")).collect()
  }

  pub fn link_flags(&self) -> Vec<String> {
    let mut flags = vec!["-pthread".to_string()];
    if self.lto_enabled() {
      flags.push("-flto".to_string());
    }
    flags
  }

  /// Command line that reproduces this configuration from inside `root`.
  pub fn regenerate_args(&self) -> Vec<String> {
    let mut args = vec![ninja_path(&self.generator), "--cxx".to_string(), self.cxx.clone()];
    if self.debug {
      args.push("--debug".to_string());
    }
    if self.no_lto {
      args.push("--no-lto".to_string());
    }
    if let Some(dir) = &self.boost_dir {
      args.push("--boost-dir".to_string());
      args.push(dir.to_string_lossy().into_owned());
    }
    for define in &self.defines {
      args.push("--define".to_string());
      args.push(define.clone());
    }
    for lib in &self.libs {
      args.push("--lib".to_string());
      args.push(lib.clone());
    }
    if self.output != Path::new(BUILD_FILE) {
      args.push("--output".to_string());
      args.push(ninja_path(&self.output));
    }
    args
  }
}

/// `-isystem deps/<dir>/include`. An absolute `dir` replaces `deps/`.
fn dependency_include(dir: &Path) -> [String; 2] {
  let path = Path::new("deps").join(dir).join("include");
  ["-isystem".to_string(), ninja_path(&path)]
}
