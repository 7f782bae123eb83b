use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::placeholder::{self, Placeholder, PlaceholderError, Resolver, Segment};

/// One argument of a command line: literal text and placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
  segments: Vec<Segment>,
}

impl Arg {
  /// An argument taken verbatim. `$` and `{` carry no meaning.
  pub fn literal(text: impl Into<String>) -> Self {
    Self {
      segments: vec![Segment::Literal(text.into())],
    }
  }

  /// An argument that may contain `${in}` / `${out}` placeholders.
  pub fn parse(text: &str) -> Result<Self, PlaceholderError> {
    Ok(Self {
      segments: placeholder::parse(text)?,
    })
  }

  pub fn input() -> Self {
    Self {
      segments: vec![Segment::Placeholder(Placeholder::In)],
    }
  }

  pub fn output() -> Self {
    Self {
      segments: vec![Segment::Placeholder(Placeholder::Out)],
    }
  }

  pub fn render(&self, resolver: &impl Resolver) -> String {
    placeholder::substitute_segments(&self.segments, resolver)
  }
}

/// A command line as an ordered list of arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandTemplate {
  args: Vec<Arg>,
}

impl CommandTemplate {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn arg(mut self, arg: Arg) -> Self {
    self.args.push(arg);
    self
  }

  /// Append literal arguments, e.g. a pre-computed flag set.
  pub fn literals<I>(mut self, args: I) -> Self
  where
    I: IntoIterator,
    I::Item: Into<String>,
  {
    self.args.extend(args.into_iter().map(Arg::literal));
    self
  }

  /// Parse every argument for placeholders.
  pub fn parse<'a>(args: impl IntoIterator<Item = &'a str>) -> Result<Self, PlaceholderError> {
    let args = args.into_iter().map(Arg::parse).collect::<Result<_, _>>()?;
    Ok(Self { args })
  }

  /// Render the command, joining arguments with single spaces.
  pub fn render(&self, resolver: &impl Resolver) -> String {
    self
      .args
      .iter()
      .map(|arg| arg.render(resolver))
      .collect::<Vec<_>>()
      .join(" ")
  }
}

/// The rule templates the generator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
  /// Re-run the generator when it changes.
  Bootstrap,
  /// Compile one C++ source to an object.
  Compile,
  /// Link objects and archives into an executable.
  Link,
  /// Archive objects into a static library.
  Archive,
  /// Turn a text template into a C++ string header.
  Stringize,
  /// Assemble the single-header distribution.
  Header,
}

impl RuleKind {
  /// The rule's name in the build file.
  pub fn name(self) -> &'static str {
    match self {
      RuleKind::Bootstrap => "bootstrap",
      RuleKind::Compile => "cxx",
      RuleKind::Link => "link",
      RuleKind::Archive => "lib",
      RuleKind::Stringize => "stringize",
      RuleKind::Header => "header",
    }
  }
}

impl fmt::Display for RuleKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A named, reusable command shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
  pub kind: RuleKind,
  pub command: CommandTemplate,
  pub description: Option<CommandTemplate>,
  pub depfile: Option<Arg>,
  pub deps: Option<String>,
  pub generator: bool,
}

impl Rule {
  pub fn new(kind: RuleKind, command: CommandTemplate) -> Self {
    Self {
      kind,
      command,
      description: None,
      depfile: None,
      deps: None,
      generator: false,
    }
  }

  pub fn description(mut self, description: CommandTemplate) -> Self {
    self.description = Some(description);
    self
  }

  pub fn depfile(mut self, depfile: Arg) -> Self {
    self.depfile = Some(depfile);
    self
  }

  pub fn deps(mut self, deps: &str) -> Self {
    self.deps = Some(deps.to_string());
    self
  }

  pub fn generator(mut self) -> Self {
    self.generator = true;
    self
  }
}

/// What a build node runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRule {
  /// One of the emitted rule templates.
  Rule(RuleKind),
  /// Ninja's built-in alias rule.
  Phony,
}

impl NodeRule {
  pub fn name(self) -> &'static str {
    match self {
      NodeRule::Rule(kind) => kind.name(),
      NodeRule::Phony => "phony",
    }
  }
}

/// One declared unit of work. Paths are project-relative and `/`-separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildNode {
  pub rule: NodeRule,
  pub outputs: Vec<String>,
  pub inputs: Vec<String>,
  pub implicit: Vec<String>,
  pub order_only: Vec<String>,
}

impl BuildNode {
  pub fn new(rule: RuleKind, output: impl Into<String>) -> Self {
    Self {
      rule: NodeRule::Rule(rule),
      outputs: vec![output.into()],
      inputs: Vec::new(),
      implicit: Vec::new(),
      order_only: Vec::new(),
    }
  }

  /// An alias `name` for `inputs`.
  pub fn phony<I>(name: impl Into<String>, inputs: I) -> Self
  where
    I: IntoIterator,
    I::Item: Into<String>,
  {
    Self {
      rule: NodeRule::Phony,
      outputs: vec![name.into()],
      inputs: inputs.into_iter().map(Into::into).collect(),
      implicit: Vec::new(),
      order_only: Vec::new(),
    }
  }

  pub fn inputs<I>(mut self, inputs: I) -> Self
  where
    I: IntoIterator,
    I::Item: Into<String>,
  {
    self.inputs.extend(inputs.into_iter().map(Into::into));
    self
  }

  pub fn input(self, input: impl Into<String>) -> Self {
    self.inputs([input.into()])
  }

  pub fn implicit(mut self, dep: impl Into<String>) -> Self {
    self.implicit.push(dep.into());
    self
  }

  pub fn order_only(mut self, dep: impl Into<String>) -> Self {
    self.order_only.push(dep.into());
    self
  }
}

/// A file-scope `name = value` binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variable {
  pub name: String,
  pub value: String,
}

/// The complete build description, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetGraph {
  pub(super) variables: Vec<Variable>,
  pub(super) rules: Vec<Rule>,
  pub(super) nodes: Vec<BuildNode>,
  pub(super) defaults: Vec<String>,
}

impl TargetGraph {
  pub fn variables(&self) -> &[Variable] {
    &self.variables
  }

  pub fn rules(&self) -> &[Rule] {
    &self.rules
  }

  pub fn nodes(&self) -> &[BuildNode] {
    &self.nodes
  }

  pub fn defaults(&self) -> &[String] {
    &self.defaults
  }

  pub fn rule(&self, kind: RuleKind) -> Option<&Rule> {
    self.rules.iter().find(|r| r.kind == kind)
  }

  /// The node that declares `output`, if any.
  pub fn node(&self, output: &str) -> Option<&BuildNode> {
    self.nodes.iter().find(|n| n.outputs.iter().any(|o| o == output))
  }
}

/// Errors raised while assembling a graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
  /// A rule kind was registered twice.
  #[error("rule '{0}' is already defined")]
  DuplicateRule(RuleKind),
}
