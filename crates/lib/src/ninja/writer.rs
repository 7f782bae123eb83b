use std::io::{self, Write};

use crate::consts::LINE_WIDTH;

/// Escape a path for a `build` or `default` line.
pub fn escape_path(path: &str) -> String {
  path.replace('$', "$$").replace(' ', "$ ").replace(':', "$:")
}

/// Escape free text for a variable value.
pub fn escape(text: &str) -> String {
  text.replace('$', "$$")
}

/// Number of consecutive `$` immediately before byte `index`.
fn dollars_before(text: &[u8], index: usize) -> usize {
  text[..index].iter().rev().take_while(|&&b| b == b'$').count()
}

/// A space that is not itself escaped by an odd run of `$`.
fn is_break(text: &[u8], index: usize) -> bool {
  text[index] == b' ' && dollars_before(text, index) % 2 == 0
}

/// Low-level writer for the Ninja file syntax.
///
/// Values passed to [`variable`](Self::variable) and the rule attributes are
/// written as given; callers escape them. Paths given to
/// [`build`](Self::build) and [`default`](Self::default) are escaped here.
pub struct NinjaWriter<W: Write> {
  out: W,
  width: usize,
}

impl<W: Write> NinjaWriter<W> {
  pub fn new(out: W) -> Self {
    Self::with_width(out, LINE_WIDTH)
  }

  pub fn with_width(out: W, width: usize) -> Self {
    Self { out, width }
  }

  pub fn into_inner(self) -> W {
    self.out
  }

  pub fn newline(&mut self) -> io::Result<()> {
    self.out.write_all(b"\n")
  }

  pub fn comment(&mut self, text: &str) -> io::Result<()> {
    writeln!(self.out, "# {text}")
  }

  pub fn variable(&mut self, key: &str, value: &str, indent: usize) -> io::Result<()> {
    if value.is_empty() {
      return Ok(());
    }
    self.line(&format!("{key} = {value}"), indent)
  }

  /// Write a rule header. Attributes follow via [`variable`](Self::variable)
  /// with an indent of 1.
  pub fn rule(&mut self, name: &str, attributes: &[(&str, &str)]) -> io::Result<()> {
    self.line(&format!("rule {name}"), 0)?;
    for (key, value) in attributes {
      self.variable(key, value, 1)?;
    }
    Ok(())
  }

  pub fn build(
    &mut self,
    outputs: &[String],
    rule: &str,
    inputs: &[String],
    implicit: &[String],
    order_only: &[String],
  ) -> io::Result<()> {
    let mut text = format!("build {}: {rule}", join_escaped(outputs));
    if !inputs.is_empty() {
      text.push(' ');
      text.push_str(&join_escaped(inputs));
    }
    if !implicit.is_empty() {
      text.push_str(" | ");
      text.push_str(&join_escaped(implicit));
    }
    if !order_only.is_empty() {
      text.push_str(" || ");
      text.push_str(&join_escaped(order_only));
    }
    self.line(&text, 0)
  }

  pub fn default(&mut self, targets: &[String]) -> io::Result<()> {
    self.line(&format!("default {}", join_escaped(targets)), 0)
  }

  /// Write `text`, wrapping at unescaped spaces with ` $` continuations.
  fn line(&mut self, text: &str, indent: usize) -> io::Result<()> {
    let mut leading = "  ".repeat(indent);
    let mut rest = text;

    while leading.len() + rest.len() > self.width {
      let bytes = rest.as_bytes();
      // room for the trailing " $"
      let available = self.width.saturating_sub(leading.len() + 2);

      let before = (0..available.min(bytes.len())).rev().find(|&i| is_break(bytes, i));
      let split = before.or_else(|| (available..bytes.len()).find(|&i| is_break(bytes, i)));

      let Some(split) = split else {
        break;
      };

      writeln!(self.out, "{leading}{} $", &rest[..split])?;
      rest = &rest[split + 1..];
      leading = "  ".repeat(indent + 2);
    }

    writeln!(self.out, "{leading}{rest}")
  }
}

fn join_escaped(paths: &[String]) -> String {
  paths.iter().map(|p| escape_path(p)).collect::<Vec<_>>().join(" ")
}
