//! Ninja build file rendering.
//!
//! [`render`] serialises a [`TargetGraph`] into the `build.ninja` syntax:
//! variables, then rules, then build statements, then the default targets.
//! Output depends only on the graph, so equal graphs give byte-identical
//! files.
//!
//! # Submodules
//!
//! - [`writer`] - line-level writer with escaping and wrapping

pub mod writer;

use std::io::{self, Write};

pub use writer::{NinjaWriter, escape, escape_path};

use crate::graph::{Rule, TargetGraph};
use crate::placeholder::NinjaResolver;

/// Banner written at the top of every generated file.
pub const GENERATED_BANNER: &str = "This file is generated by bootstrap. Do not edit.";

/// Write `graph` in Ninja syntax.
pub fn render<W: Write>(graph: &TargetGraph, writer: &mut NinjaWriter<W>) -> io::Result<()> {
  writer.comment(GENERATED_BANNER)?;
  writer.newline()?;

  for variable in graph.variables() {
    writer.variable(&variable.name, &escape(&variable.value), 0)?;
  }
  writer.newline()?;

  for rule in graph.rules() {
    write_rule(rule, writer)?;
    writer.newline()?;
  }

  for node in graph.nodes() {
    writer.build(
      &node.outputs,
      node.rule.name(),
      &node.inputs,
      &node.implicit,
      &node.order_only,
    )?;
  }

  if !graph.defaults().is_empty() {
    writer.newline()?;
    writer.default(graph.defaults())?;
  }

  Ok(())
}

fn write_rule<W: Write>(rule: &Rule, writer: &mut NinjaWriter<W>) -> io::Result<()> {
  let resolver = NinjaResolver;
  let command = rule.command.render(&resolver);
  let description = rule.description.as_ref().map(|d| d.render(&resolver));
  let depfile = rule.depfile.as_ref().map(|d| d.render(&resolver));

  let mut attributes = vec![("command", command.as_str())];
  if let Some(description) = &description {
    attributes.push(("description", description.as_str()));
  }
  if let Some(depfile) = &depfile {
    attributes.push(("depfile", depfile.as_str()));
  }
  if rule.generator {
    attributes.push(("generator", "1"));
  }
  if let Some(deps) = &rule.deps {
    attributes.push(("deps", deps.as_str()));
  }

  writer.rule(rule.kind.name(), &attributes)
}
