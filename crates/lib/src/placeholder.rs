//! Placeholder parsing and substitution for rule command templates.
//!
//! Rule commands are declared once and shared by many build nodes, so they
//! refer to each node's files through placeholders that are only resolved when
//! the command is rendered.
//!
//! # Placeholder Formats
//!
//! - `${in}` - the node's explicit inputs
//! - `${out}` - the node's explicit outputs
//!
//! # Escaping
//!
//! Use `$$` to produce a literal `$`. A single `$` not followed by `{` or `$`
//! passes through unchanged.
//!
//! # Example
//!
//! ```
//! use ninjagen_lib::placeholder::{parse, Segment, Placeholder};
//!
//! let segments = parse("${out}.d").unwrap();
//! assert_eq!(segments, vec![
//!     Segment::Placeholder(Placeholder::Out),
//!     Segment::Literal(".d".to_string()),
//! ]);
//! ```

use std::borrow::Cow;

use thiserror::Error;

/// A parsed placeholder reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
  /// `${in}` - explicit inputs of the node
  In,

  /// `${out}` - explicit outputs of the node
  Out,
}

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  /// Literal text (no placeholders)
  Literal(String),

  /// A placeholder to be resolved
  Placeholder(Placeholder),
}

/// Errors that can occur during placeholder parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
  #[error("unclosed placeholder at position {0}")]
  Unclosed(usize),

  #[error("unknown placeholder: {0}")]
  Unknown(String),
}

/// Decides how placeholders and literal text are written for a target.
pub trait Resolver {
  /// Resolve a placeholder to the text that replaces it.
  fn resolve(&self, placeholder: Placeholder) -> &str;

  /// Encode literal text. The default shell-quotes it.
  fn literal<'a>(&self, text: &'a str) -> Cow<'a, str> {
    shell_quote(text)
  }
}

/// Renders placeholders as Ninja variable references.
///
/// Ninja shell-quotes `$in` and `$out` itself, so only literals need quoting
/// here; they additionally get their `$` escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NinjaResolver;

impl Resolver for NinjaResolver {
  fn resolve(&self, placeholder: Placeholder) -> &str {
    match placeholder {
      Placeholder::In => "${in}",
      Placeholder::Out => "${out}",
    }
  }

  fn literal<'a>(&self, text: &'a str) -> Cow<'a, str> {
    match shell_quote(text) {
      Cow::Borrowed(s) if !s.contains('$') => Cow::Borrowed(s),
      quoted => Cow::Owned(quoted.replace('$', "$$")),
    }
  }
}

/// Resolves placeholders to the concrete paths of one node.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
  inputs: String,
  outputs: String,
}

impl PathResolver {
  pub fn new<I, O>(inputs: I, outputs: O) -> Self
  where
    I: IntoIterator,
    I::Item: AsRef<str>,
    O: IntoIterator,
    O::Item: AsRef<str>,
  {
    Self {
      inputs: join_quoted(inputs),
      outputs: join_quoted(outputs),
    }
  }
}

impl Resolver for PathResolver {
  fn resolve(&self, placeholder: Placeholder) -> &str {
    match placeholder {
      Placeholder::In => &self.inputs,
      Placeholder::Out => &self.outputs,
    }
  }
}

fn join_quoted<I>(paths: I) -> String
where
  I: IntoIterator,
  I::Item: AsRef<str>,
{
  paths
    .into_iter()
    .map(|p| shell_quote(p.as_ref()).into_owned())
    .collect::<Vec<_>>()
    .join(" ")
}

/// Characters that never need quoting in a POSIX shell word.
fn is_shell_safe(c: char) -> bool {
  c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '.' | '/' | '=' | ':' | ',' | '@' | '%' | '^')
}

/// Quote `text` for a POSIX shell if it contains anything outside the safe set.
pub fn shell_quote(text: &str) -> Cow<'_, str> {
  if !text.is_empty() && text.chars().all(is_shell_safe) {
    return Cow::Borrowed(text);
  }
  Cow::Owned(format!("'{}'", text.replace('\'', r"'\''")))
}

/// Parse a string containing placeholders into segments.
///
/// # Errors
///
/// Returns an error if a placeholder is unclosed or names an unknown variable.
pub fn parse(input: &str) -> Result<Vec<Segment>, PlaceholderError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = input.char_indices().peekable();

  while let Some((pos, ch)) = chars.next() {
    if ch != '$' {
      literal.push(ch);
      continue;
    }

    match chars.peek() {
      Some((_, '$')) => {
        chars.next();
        literal.push('$');
      }
      Some((_, '{')) => {
        chars.next();

        if !literal.is_empty() {
          segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }

        let mut name = String::new();
        let mut found_close = false;
        for (_, c) in chars.by_ref() {
          if c == '}' {
            found_close = true;
            break;
          }
          name.push(c);
        }

        if !found_close {
          return Err(PlaceholderError::Unclosed(pos));
        }

        let placeholder = match name.as_str() {
          "in" => Placeholder::In,
          "out" => Placeholder::Out,
          _ => return Err(PlaceholderError::Unknown(name)),
        };
        segments.push(Segment::Placeholder(placeholder));
      }
      // Lone `$`, keep it
      _ => literal.push('$'),
    }
  }

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}

/// Substitute placeholders in pre-parsed segments.
pub fn substitute_segments(segments: &[Segment], resolver: &impl Resolver) -> String {
  let mut result = String::new();

  for segment in segments {
    match segment {
      Segment::Literal(s) => result.push_str(&resolver.literal(s)),
      Segment::Placeholder(p) => result.push_str(resolver.resolve(*p)),
    }
  }

  result
}
