//! Command, argument and handler types.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::context::ProvisionContext;
use crate::error::ProvisionError;
use crate::platform::GuestPlatform;

/// A nested block passed to a command, run against the same context.
pub type Block = Box<dyn FnOnce(&mut ProvisionContext) -> Result<(), ProvisionError>>;

/// A unit of behavior bound to one `(subject, action, platform)` triple.
pub trait Handler {
  fn apply(&self, ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError>;
}

impl<F> Handler for F
where
  F: Fn(&mut ProvisionContext, Args) -> Result<(), ProvisionError>,
{
  fn apply(&self, ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
    self(ctx, args)
  }
}

/// A single argument value as it came from the DSL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Arg {
  String(String),
  Integer(i64),
  Number(f64),
  Boolean(bool),
  Array(Vec<Arg>),
  Table(BTreeMap<String, Arg>),
}

impl Arg {
  pub fn type_name(&self) -> &'static str {
    match self {
      Arg::String(_) => "string",
      Arg::Integer(_) | Arg::Number(_) => "number",
      Arg::Boolean(_) => "boolean",
      Arg::Array(_) => "array",
      Arg::Table(_) => "table",
    }
  }

  /// Strings as-is, numbers in their shortest form. Used for version-like arguments.
  pub fn as_text(&self) -> Option<String> {
    match self {
      Arg::String(s) => Some(s.clone()),
      Arg::Integer(i) => Some(i.to_string()),
      Arg::Number(n) => Some(n.to_string()),
      _ => None,
    }
  }
}

impl From<&str> for Arg {
  fn from(value: &str) -> Self {
    Arg::String(value.to_string())
  }
}

impl From<i64> for Arg {
  fn from(value: i64) -> Self {
    Arg::Integer(value)
  }
}

/// A DSL statement: `Subject("Action", args...)`.
pub struct Command {
  pub subject: String,
  pub action: Option<String>,
  pub args: Vec<Arg>,
  pub block: Option<Block>,
}

impl Command {
  pub fn new(subject: impl Into<String>, action: impl Into<String>) -> Self {
    Self {
      subject: subject.into(),
      action: Some(action.into()),
      args: Vec::new(),
      block: None,
    }
  }

  /// A statement that names a subject but no action, e.g. `Install()`.
  pub fn without_action(subject: impl Into<String>) -> Self {
    Self {
      subject: subject.into(),
      action: None,
      args: Vec::new(),
      block: None,
    }
  }

  pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
    self.args.push(arg.into());
    self
  }

  pub fn with_args(mut self, args: Vec<Arg>) -> Self {
    self.args = args;
    self
  }

  pub fn with_block(mut self, block: Block) -> Self {
    self.block = Some(block);
    self
  }

  /// `Subject Action`, or just `Subject` when no action was given.
  pub fn label(&self) -> String {
    match &self.action {
      Some(action) => format!("{} {}", self.subject, action),
      None => self.subject.clone(),
    }
  }
}

impl fmt::Debug for Command {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Command")
      .field("subject", &self.subject)
      .field("action", &self.action)
      .field("args", &self.args)
      .field("block", &self.block.is_some())
      .finish()
  }
}

/// Arguments as seen by a handler, with typed accessors.
///
/// Accessor indices are zero-based; error messages report them one-based.
pub struct Args {
  command: String,
  values: Vec<Arg>,
  block: Option<Block>,
}

impl Args {
  pub fn new(command: impl Into<String>, values: Vec<Arg>, block: Option<Block>) -> Self {
    Self {
      command: command.into(),
      values,
      block,
    }
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Arg> {
    self.values.get(index)
  }

  fn required(&self, index: usize, name: &'static str) -> Result<&Arg, ArgError> {
    self.values.get(index).ok_or_else(|| ArgError::Missing {
      command: self.command.clone(),
      position: index + 1,
      name,
    })
  }

  fn mismatch(&self, index: usize, name: &'static str, expected: &'static str, found: &Arg) -> ArgError {
    ArgError::Type {
      command: self.command.clone(),
      position: index + 1,
      name,
      expected,
      found: found.type_name(),
    }
  }

  pub fn str(&self, index: usize, name: &'static str) -> Result<&str, ArgError> {
    match self.required(index, name)? {
      Arg::String(s) => Ok(s),
      other => Err(self.mismatch(index, name, "string", other)),
    }
  }

  /// An optional version-like argument; strings and numbers are accepted.
  pub fn opt_text(&self, index: usize, name: &'static str) -> Result<Option<String>, ArgError> {
    match self.values.get(index) {
      None => Ok(None),
      Some(arg) => arg
        .as_text()
        .map(Some)
        .ok_or_else(|| self.mismatch(index, name, "string or number", arg)),
    }
  }

  pub fn table(&self, index: usize, name: &'static str) -> Result<&BTreeMap<String, Arg>, ArgError> {
    match self.required(index, name)? {
      Arg::Table(t) => Ok(t),
      other => Err(self.mismatch(index, name, "table", other)),
    }
  }

  /// A string field of a table argument.
  pub fn field_str<'a>(
    &self,
    table: &'a BTreeMap<String, Arg>,
    key: &'static str,
  ) -> Result<&'a str, ArgError> {
    match table.get(key) {
      Some(Arg::String(s)) => Ok(s),
      Some(other) => Err(ArgError::Field {
        command: self.command.clone(),
        key,
        expected: "string",
        found: other.type_name(),
      }),
      None => Err(ArgError::MissingField {
        command: self.command.clone(),
        key,
      }),
    }
  }

  /// A port-number field of a table argument.
  pub fn field_port(&self, table: &BTreeMap<String, Arg>, key: &'static str) -> Result<u16, ArgError> {
    match table.get(key) {
      Some(Arg::Integer(i)) => u16::try_from(*i).map_err(|_| ArgError::OutOfRange {
        command: self.command.clone(),
        key,
        value: *i,
      }),
      Some(other) => Err(ArgError::Field {
        command: self.command.clone(),
        key,
        expected: "integer",
        found: other.type_name(),
      }),
      None => Err(ArgError::MissingField {
        command: self.command.clone(),
        key,
      }),
    }
  }

  /// Take the nested block. Fails if the statement did not pass one.
  pub fn take_block(&mut self) -> Result<Block, ArgError> {
    self.block.take().ok_or_else(|| ArgError::MissingBlock {
      command: self.command.clone(),
    })
  }
}

/// The four ways resolving a statement can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
  #[error("unknown subject '{subject}' (no actions are registered under it)")]
  UnknownSubject { subject: String },

  #[error("no action specified for subject '{subject}' (try something like: {subject} \"SomeAction\")")]
  MissingAction { subject: String },

  #[error("unknown action '{action}' for subject '{subject}'")]
  UnknownAction { subject: String, action: String },

  #[error("no {platform} implementation of '{subject} {action}'")]
  NoImplementation {
    subject: String,
    action: String,
    platform: GuestPlatform,
  },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgError {
  #[error("{command}: missing argument #{position} ({name})")]
  Missing {
    command: String,
    position: usize,
    name: &'static str,
  },

  #[error("{command}: argument #{position} ({name}) must be a {expected}, got {found}")]
  Type {
    command: String,
    position: usize,
    name: &'static str,
    expected: &'static str,
    found: &'static str,
  },

  #[error("{command}: missing field '{key}'")]
  MissingField { command: String, key: &'static str },

  #[error("{command}: field '{key}' must be a {expected}, got {found}")]
  Field {
    command: String,
    key: &'static str,
    expected: &'static str,
    found: &'static str,
  },

  #[error("{command}: field '{key}' is out of range: {value}")]
  OutOfRange {
    command: String,
    key: &'static str,
    value: i64,
  },

  #[error("{command}: expected a block")]
  MissingBlock { command: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
  #[error("handler for '{subject} {action}' on {platform} is already registered")]
  Duplicate {
    subject: String,
    action: String,
    platform: GuestPlatform,
  },
}
