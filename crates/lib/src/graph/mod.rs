//! Build graph model.
//!
//! A [`TargetGraph`] is the declarative description handed to Ninja: file-scope
//! variables, rule templates, build nodes and default targets, all in the
//! order they are written out.
//!
//! Graphs are assembled with [`GraphBuilder`], whose methods consume the
//! builder and return a new one, so each section of the graph is a fold over
//! its sources rather than a shared list that grows in place.
//!
//! Inputs are not checked against other nodes' outputs; Ninja reports
//! dangling references when it loads the file.

mod types;

pub use types::*;

use tracing::trace;

/// Accumulates a [`TargetGraph`].
#[derive(Debug, Default)]
pub struct GraphBuilder {
  graph: TargetGraph,
}

impl GraphBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Declare a file-scope variable.
  pub fn variable(mut self, name: &str, value: impl Into<String>) -> Self {
    self.graph.variables.push(Variable {
      name: name.to_string(),
      value: value.into(),
    });
    self
  }

  /// Register a rule template.
  ///
  /// # Errors
  ///
  /// Returns [`GraphError::DuplicateRule`] if a rule of the same kind was
  /// already registered.
  pub fn emit_rule(mut self, rule: Rule) -> Result<Self, GraphError> {
    if self.graph.rules.iter().any(|r| r.kind == rule.kind) {
      return Err(GraphError::DuplicateRule(rule.kind));
    }
    trace!(rule = %rule.kind, "emitting rule");
    self.graph.rules.push(rule);
    Ok(self)
  }

  /// Append one build node. The rule it references is not checked.
  pub fn emit_node(mut self, node: BuildNode) -> Self {
    trace!(rule = node.rule.name(), outputs = ?node.outputs, "emitting node");
    self.graph.nodes.push(node);
    self
  }

  /// Append build nodes in iteration order.
  pub fn emit_nodes(self, nodes: impl IntoIterator<Item = BuildNode>) -> Self {
    nodes.into_iter().fold(self, GraphBuilder::emit_node)
  }

  /// Declare the default targets and produce the graph.
  pub fn finish<I>(mut self, defaults: I) -> TargetGraph
  where
    I: IntoIterator,
    I::Item: Into<String>,
  {
    self.graph.defaults = defaults.into_iter().map(Into::into).collect();
    self.graph
  }
}
