//! Machine-readable view of a planned graph.
//!
//! The report starts with the configuration the graph was planned from. Rule
//! commands are shown as they appear in the build file, and each node carries
//! the command it would run with its own paths substituted.

use serde::Serialize;

use crate::config::BootstrapConfig;
use crate::graph::{BuildNode, NodeRule, Rule, TargetGraph, Variable};
use crate::placeholder::{NinjaResolver, PathResolver};

use super::SourceTree;

#[derive(Debug, Serialize)]
pub struct GraphReport<'a> {
  pub config: &'a BootstrapConfig,
  pub sources: &'a SourceTree,
  pub variables: &'a [Variable],
  pub rules: Vec<RuleReport>,
  pub nodes: Vec<NodeReport<'a>>,
  pub defaults: &'a [String],
}

#[derive(Debug, Serialize)]
pub struct RuleReport {
  pub name: &'static str,
  pub command: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub depfile: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub deps: Option<String>,
  pub generator: bool,
}

#[derive(Debug, Serialize)]
pub struct NodeReport<'a> {
  pub rule: &'static str,
  pub outputs: &'a [String],
  pub inputs: &'a [String],
  #[serde(skip_serializing_if = "<[String]>::is_empty")]
  pub implicit: &'a [String],
  #[serde(skip_serializing_if = "<[String]>::is_empty")]
  pub order_only: &'a [String],
  /// The expanded command; absent for phony nodes and unknown rules.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub command: Option<String>,
}

impl<'a> GraphReport<'a> {
  pub fn new(config: &'a BootstrapConfig, sources: &'a SourceTree, graph: &'a TargetGraph) -> Self {
    Self {
      config,
      sources,
      variables: graph.variables(),
      rules: graph.rules().iter().map(rule_report).collect(),
      nodes: graph.nodes().iter().map(|n| node_report(graph, n)).collect(),
      defaults: graph.defaults(),
    }
  }
}

fn rule_report(rule: &Rule) -> RuleReport {
  let resolver = NinjaResolver;
  RuleReport {
    name: rule.kind.name(),
    command: rule.command.render(&resolver),
    description: rule.description.as_ref().map(|d| d.render(&resolver)),
    depfile: rule.depfile.as_ref().map(|d| d.render(&resolver)),
    deps: rule.deps.clone(),
    generator: rule.generator,
  }
}

fn node_report<'a>(graph: &TargetGraph, node: &'a BuildNode) -> NodeReport<'a> {
  let command = match node.rule {
    NodeRule::Rule(kind) => graph
      .rule(kind)
      .map(|rule| rule.command.render(&PathResolver::new(&node.inputs, &node.outputs))),
    NodeRule::Phony => None,
  };

  NodeReport {
    rule: node.rule.name(),
    outputs: &node.outputs,
    inputs: &node.inputs,
    implicit: &node.implicit,
    order_only: &node.order_only,
    command,
  }
}
