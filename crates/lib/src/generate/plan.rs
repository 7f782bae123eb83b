//! Graph construction for the nonius project layout.
//!
//! [`plan`] is a pure function from configuration and a [`SourceTree`] to a
//! [`TargetGraph`]. Each section of the graph is produced by its own function
//! and folded into the builder in emission order.

use std::path::{Path, PathBuf};

use crate::config::{BootstrapConfig, Layout};
use crate::consts::{BIN_DIR, NINJA_REQUIRED_VERSION, OBJ_DIR};
use crate::graph::{Arg, BuildNode, CommandTemplate, GraphBuilder, Rule, RuleKind, TargetGraph};
use crate::paths::{derive_output_path, example_binary, example_name, library_archive, ninja_path};

use super::{GenerateError, SourceTree};

pub const LIB_ALIAS: &str = "lib";
pub const TEST_ALIAS: &str = "test";
pub const TEMPLATES_ALIAS: &str = "templates";
pub const HEADER_ALIAS: &str = "header";
pub const EXAMPLES_ALIAS: &str = "examples";

/// Name of the test runner under `bin/`.
const TEST_RUNNER: &str = "test";

/// Build the complete graph for `sources`.
///
/// # Errors
///
/// Fails if a command template in the layout has a malformed placeholder.
pub fn plan(config: &BootstrapConfig, sources: &SourceTree) -> Result<TargetGraph, GenerateError> {
  let layout = &config.layout;

  // Defined up front so every section below can refer to it.
  let archive = ninja_path(&library_archive(&layout.library));
  let library_objects = objects(&sources.library);
  let built_libs: Vec<String> = if library_objects.is_empty() {
    Vec::new()
  } else {
    vec![archive.clone()]
  };
  let test_objects = objects(&sources.tests);

  let builder = GraphBuilder::new()
    .variable("ninja_required_version", NINJA_REQUIRED_VERSION)
    .variable("builddir", format!("{OBJ_DIR}/"));
  let builder = rules(config)?.into_iter().try_fold(builder, GraphBuilder::emit_rule)?;

  let graph = builder
    .emit_node(regenerate_node(config))
    .emit_nodes(compile_nodes(&sources.library))
    .emit_nodes(archive_nodes(&archive, &library_objects))
    .emit_nodes(compile_nodes(&sources.tests))
    .emit_nodes(test_nodes(&test_objects, &built_libs))
    .emit_nodes(header_nodes(config))
    .emit_nodes(example_nodes(&sources.examples, &built_libs))
    .finish([EXAMPLES_ALIAS]);

  Ok(graph)
}

fn rules(config: &BootstrapConfig) -> Result<Vec<Rule>, GenerateError> {
  let layout = &config.layout;
  let cxx = config.cxx.as_str();

  let bootstrap = Rule::new(RuleKind::Bootstrap, CommandTemplate::new().literals(config.regenerate_args()))
    .description(CommandTemplate::new().literals(["BOOTSTRAP"]))
    .generator();

  let compile = Rule::new(
    RuleKind::Compile,
    CommandTemplate::new()
      .literals([cxx, "-MMD", "-MF"])
      .arg(Arg::parse("${out}.d")?)
      .literals(["-c"])
      .literals(config.compile_flags())
      .literals(config.warning_flags())
      .literals(config.include_flags())
      .literals(config.define_flags())
      .arg(Arg::input())
      .literals(["-o"])
      .arg(Arg::output()),
  )
  .description(described("C++"))
  .depfile(Arg::parse("${out}.d")?)
  .deps("gcc");

  let link = Rule::new(
    RuleKind::Link,
    CommandTemplate::new()
      .literals([cxx])
      .literals(config.compile_flags())
      .literals(config.warning_flags())
      .literals(config.link_flags())
      .arg(Arg::input())
      .literals(["-o"])
      .arg(Arg::output())
      .literals(config.lib_flags()),
  )
  .description(described("LINK"));

  let archive = Rule::new(RuleKind::Archive, tool_command(&layout.archive_command)?).description(described("AR"));
  let stringize =
    Rule::new(RuleKind::Stringize, script_command(layout, &layout.stringize_tool)).description(described("STRINGIZE"));
  let header =
    Rule::new(RuleKind::Header, script_command(layout, &layout.single_header_tool)).description(described("HEADER"));

  Ok(vec![bootstrap, compile, link, archive, stringize, header])
}

fn tool_command(tokens: &[String]) -> Result<CommandTemplate, GenerateError> {
  Ok(CommandTemplate::parse(tokens.iter().map(String::as_str))?)
}

/// `<interpreter> <tool> ${in} ${out}`. The tool is also the node's implicit dependency.
fn script_command(layout: &Layout, tool: &Path) -> CommandTemplate {
  CommandTemplate::new()
    .literals([layout.script_interpreter.clone(), ninja_path(tool)])
    .arg(Arg::input())
    .arg(Arg::output())
}

/// `<LABEL> ${in}`
fn described(label: &str) -> CommandTemplate {
  CommandTemplate::new().literals([label]).arg(Arg::input())
}

fn objects(sources: &[PathBuf]) -> Vec<String> {
  sources.iter().map(|s| ninja_path(&derive_output_path(s))).collect()
}

fn compile_node(source: &Path) -> BuildNode {
  BuildNode::new(RuleKind::Compile, ninja_path(&derive_output_path(source))).input(ninja_path(source))
}

fn compile_nodes(sources: &[PathBuf]) -> impl Iterator<Item = BuildNode> + '_ {
  sources.iter().map(|s| compile_node(s))
}

fn regenerate_node(config: &BootstrapConfig) -> BuildNode {
  BuildNode::new(RuleKind::Bootstrap, ninja_path(&config.output)).implicit(ninja_path(&config.generator))
}

/// The library archive and its alias; nothing when there are no objects.
fn archive_nodes(archive: &str, objects: &[String]) -> Vec<BuildNode> {
  if objects.is_empty() {
    return Vec::new();
  }
  vec![
    BuildNode::new(RuleKind::Archive, archive).inputs(objects.iter().cloned()),
    BuildNode::phony(LIB_ALIAS, [archive]),
  ]
}

fn test_nodes(objects: &[String], built_libs: &[String]) -> [BuildNode; 2] {
  let runner = ninja_path(&Path::new(BIN_DIR).join(TEST_RUNNER));
  [
    BuildNode::new(RuleKind::Link, runner.clone()).inputs(objects.iter().chain(built_libs).cloned()),
    BuildNode::phony(TEST_ALIAS, [runner]),
  ]
}

/// Report template stringizing feeding the single-header assembly.
fn header_nodes(config: &BootstrapConfig) -> [BuildNode; 4] {
  let layout = &config.layout;
  let report_header = ninja_path(&layout.report_header);
  let single_header = ninja_path(&layout.single_header);
  [
    BuildNode::new(RuleKind::Stringize, report_header.clone())
      .input(ninja_path(&layout.report_template))
      .implicit(ninja_path(&layout.stringize_tool)),
    BuildNode::phony(TEMPLATES_ALIAS, [report_header]),
    BuildNode::new(RuleKind::Header, single_header.clone())
      .input(ninja_path(&layout.single_header_source))
      .implicit(ninja_path(&layout.single_header_tool))
      .order_only(TEMPLATES_ALIAS),
    BuildNode::phony(HEADER_ALIAS, [single_header]),
  ]
}

/// Per example: compile, link, alias. Then the aggregate alias.
fn example_nodes(sources: &[PathBuf], built_libs: &[String]) -> Vec<BuildNode> {
  let (nodes, names) = sources.iter().fold((Vec::new(), Vec::new()), |(mut nodes, mut names), source| {
    let object = ninja_path(&derive_output_path(source));
    let binary = ninja_path(&example_binary(source));
    let name = example_name(source);

    nodes.push(compile_node(source));
    let link_inputs = std::iter::once(&object).chain(built_libs).cloned();
    nodes.push(BuildNode::new(RuleKind::Link, binary.clone()).inputs(link_inputs));
    nodes.push(BuildNode::phony(name.clone(), [binary]));
    names.push(name);
    (nodes, names)
  });

  nodes.into_iter().chain([BuildNode::phony(EXAMPLES_ALIAS, names)]).collect()
}
