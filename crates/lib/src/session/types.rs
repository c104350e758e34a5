//! Session and directive types.
//!
//! # Ordering
//!
//! Directives keep emission order. Shell fragments are applied by the
//! orchestrator one at a time in that order, and a failing fragment aborts
//! everything after it.
//!
//! # Serialization
//!
//! The session is fully serializable. Its JSON form is the hand-off document
//! and the input to [`Hashable::compute_hash`], which yields the plan hash.

use serde::{Deserialize, Serialize};

use crate::util::hash::Hashable;

/// One unit of shell text emitted into the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptFragment {
  /// The complete shell text, including directory-scoping lines.
  pub text: String,
  /// Whether the orchestrator runs this fragment as root.
  pub privileged: bool,
  /// The directory context that was active when the fragment was emitted.
  pub directory: String,
}

/// A single provisioning directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
  /// Base image selector.
  Box { name: String },
  /// Provider/driver selection.
  Provider { provider: String, name: String, gui: bool },
  /// Host directory shared into the guest.
  SyncedFolder { host: String, guest: String },
  /// Guest port exposed on the host.
  ForwardedPort { guest: u16, host: u16 },
  /// File copied from the host into the guest.
  FileCopy { host: String, guest: String },
  /// Shell text run inside the guest.
  Shell(ScriptFragment),
}

impl Directive {
  /// Short name used in logs and plan summaries.
  pub fn kind(&self) -> &'static str {
    match self {
      Directive::Box { .. } => "box",
      Directive::Provider { .. } => "provider",
      Directive::SyncedFolder { .. } => "synced_folder",
      Directive::ForwardedPort { .. } => "forwarded_port",
      Directive::FileCopy { .. } => "file_copy",
      Directive::Shell(_) => "shell",
    }
  }

  pub fn as_fragment(&self) -> Option<&ScriptFragment> {
    match self {
      Directive::Shell(fragment) => Some(fragment),
      _ => None,
    }
  }
}

/// The ordered collection of directives handed to the orchestrator.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  directives: Vec<Directive>,
}

impl Hashable for Session {}

impl Session {
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a directive. Directives are never removed or reordered.
  pub fn push(&mut self, directive: Directive) {
    self.directives.push(directive);
  }

  pub fn directives(&self) -> &[Directive] {
    &self.directives
  }

  pub fn len(&self) -> usize {
    self.directives.len()
  }

  pub fn is_empty(&self) -> bool {
    self.directives.is_empty()
  }

  /// Shell fragments in emission order.
  pub fn fragments(&self) -> impl Iterator<Item = &ScriptFragment> {
    self.directives.iter().filter_map(Directive::as_fragment)
  }

  /// Whether a synced folder already binds `guest`.
  pub fn has_synced_guest(&self, guest: &str) -> bool {
    self
      .directives
      .iter()
      .any(|d| matches!(d, Directive::SyncedFolder { guest: bound, .. } if bound == guest))
  }

  /// The last selected box, if any. Later `Box` directives win.
  pub fn box_name(&self) -> Option<&str> {
    self.directives.iter().rev().find_map(|d| match d {
      Directive::Box { name } => Some(name.as_str()),
      _ => None,
    })
  }

  /// Number of directives of each kind, in first-seen order.
  pub fn summary(&self) -> Vec<(&'static str, usize)> {
    let mut counts: Vec<(&'static str, usize)> = Vec::new();
    for directive in &self.directives {
      let kind = directive.kind();
      match counts.iter_mut().find(|(k, _)| *k == kind) {
        Some((_, n)) => *n += 1,
        None => counts.push((kind, 1)),
      }
    }
    counts
  }
}
