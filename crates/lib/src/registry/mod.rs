//! Command registry and dispatcher.
//!
//! Handlers are registered once, at initialization, against a
//! `(subject, action, platform)` triple. The frozen [`Registry`] then resolves
//! each statement by plain lookup:
//!
//! 1. the subject must have at least one registered action
//! 2. the statement must name an action
//! 3. the action must exist under the subject
//! 4. a handler must exist for the build's platform
//!
//! Each failed step has its own [`DispatchError`] variant. Resolution is
//! linear and synchronous; nothing is retried.

mod types;

pub use types::*;

use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;

use crate::context::ProvisionContext;
use crate::error::ProvisionError;
use crate::platform::GuestPlatform;

type Actions = BTreeMap<String, BTreeMap<GuestPlatform, Rc<dyn Handler>>>;

/// Collects handlers before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
  subjects: BTreeMap<String, Actions>,
}

impl RegistryBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Bind `handler` to one triple. Each triple can be bound once.
  pub fn register(
    &mut self,
    subject: &str,
    action: &str,
    platform: GuestPlatform,
    handler: impl Handler + 'static,
  ) -> Result<&mut Self, RegistryError> {
    self.insert(subject, action, platform, Rc::new(handler))
  }

  /// Bind the same handler for every supported platform.
  pub fn register_all(
    &mut self,
    subject: &str,
    action: &str,
    handler: impl Handler + 'static,
  ) -> Result<&mut Self, RegistryError> {
    let handler: Rc<dyn Handler> = Rc::new(handler);
    for platform in GuestPlatform::ALL {
      self.insert(subject, action, platform, Rc::clone(&handler))?;
    }
    Ok(self)
  }

  fn insert(
    &mut self,
    subject: &str,
    action: &str,
    platform: GuestPlatform,
    handler: Rc<dyn Handler>,
  ) -> Result<&mut Self, RegistryError> {
    let platforms = self
      .subjects
      .entry(subject.to_string())
      .or_default()
      .entry(action.to_string())
      .or_default();
    if platforms.contains_key(&platform) {
      return Err(RegistryError::Duplicate {
        subject: subject.to_string(),
        action: action.to_string(),
        platform,
      });
    }
    platforms.insert(platform, handler);
    Ok(self)
  }

  pub fn build(self) -> Registry {
    Registry {
      subjects: self.subjects,
    }
  }
}

/// Immutable map from `(subject, action, platform)` to a handler.
#[derive(Clone)]
pub struct Registry {
  subjects: BTreeMap<String, Actions>,
}

impl Registry {
  pub fn builder() -> RegistryBuilder {
    RegistryBuilder::new()
  }

  /// Resolve a statement to its handler without running it.
  pub fn resolve(
    &self,
    subject: &str,
    action: Option<&str>,
    platform: GuestPlatform,
  ) -> Result<Rc<dyn Handler>, DispatchError> {
    let actions = self
      .subjects
      .get(subject)
      .ok_or_else(|| DispatchError::UnknownSubject {
        subject: subject.to_string(),
      })?;

    let action = action.ok_or_else(|| DispatchError::MissingAction {
      subject: subject.to_string(),
    })?;

    let platforms = actions.get(action).ok_or_else(|| DispatchError::UnknownAction {
      subject: subject.to_string(),
      action: action.to_string(),
    })?;

    platforms
      .get(&platform)
      .cloned()
      .ok_or_else(|| DispatchError::NoImplementation {
        subject: subject.to_string(),
        action: action.to_string(),
        platform,
      })
  }

  /// Resolve `command` for the context's platform and run it.
  pub fn dispatch(&self, ctx: &mut ProvisionContext, command: Command) -> Result<(), ProvisionError> {
    let handler = self.resolve(&command.subject, command.action.as_deref(), ctx.platform())?;
    let label = command.label();
    debug!(command = %label, args = command.args.len(), "dispatching");
    handler.apply(ctx, Args::new(label, command.args, command.block))
  }

  pub fn has_subject(&self, subject: &str) -> bool {
    self.subjects.contains_key(subject)
  }

  pub fn subjects(&self) -> impl Iterator<Item = &str> {
    self.subjects.keys().map(String::as_str)
  }

  /// Actions under `subject` with the platforms each one is implemented for.
  pub fn actions(&self, subject: &str) -> Vec<(&str, Vec<GuestPlatform>)> {
    self
      .subjects
      .get(subject)
      .map(|actions| {
        actions
          .iter()
          .map(|(name, platforms)| (name.as_str(), platforms.keys().copied().collect()))
          .collect()
      })
      .unwrap_or_default()
  }

  /// Resolve the flattened `verb_noun` form to `(Subject, Action)`.
  ///
  /// The first underscore-separated word selects the subject, the rest the
  /// action; both compare case-insensitively with underscores ignored, so
  /// `install_github_for_mac` finds `Install GitHubForMac`. When the subject
  /// exists but no action matches, the camel-cased remainder is returned so
  /// that dispatch reports the unknown action. Returns `None` when no subject
  /// matches.
  pub fn resolve_sugar(&self, name: &str) -> Option<(String, String)> {
    let (verb, rest) = name.split_once('_')?;
    if verb.is_empty() || rest.is_empty() {
      return None;
    }

    let subject = self.subjects.keys().find(|s| s.eq_ignore_ascii_case(verb))?;
    let wanted = normalize(rest);
    let action = self.subjects[subject]
      .keys()
      .find(|a| normalize(a) == wanted)
      .cloned()
      .unwrap_or_else(|| camelize(rest));

    Some((subject.clone(), action))
  }
}

fn normalize(name: &str) -> String {
  name
    .chars()
    .filter(|c| *c != '_')
    .map(|c| c.to_ascii_lowercase())
    .collect()
}

fn camelize(name: &str) -> String {
  name
    .split('_')
    .filter(|w| !w.is_empty())
    .map(|w| {
      let mut chars = w.chars();
      match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::session::Directive;

  fn mark(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
    let name = args.str(0, "name")?.to_string();
    ctx.push(Directive::Box { name });
    Ok(())
  }

  fn noop(_: &mut ProvisionContext, _: Args) -> Result<(), ProvisionError> {
    Ok(())
  }

  fn registry() -> Registry {
    let mut builder = Registry::builder();
    builder
      .register("Install", "Git", GuestPlatform::Osx, noop)
      .unwrap()
      .register("Install", "GitHubForMac", GuestPlatform::Osx, noop)
      .unwrap()
      .register_all("Setup", "Box", mark)
      .unwrap();
    builder.build()
  }

  fn dispatch(platform: GuestPlatform, command: Command) -> Result<ProvisionContext, ProvisionError> {
    let mut ctx = ProvisionContext::new(platform, crate::cache::CacheRoot::new("c", "/c"));
    registry().dispatch(&mut ctx, command)?;
    Ok(ctx)
  }

  fn dispatch_err(platform: GuestPlatform, command: Command) -> DispatchError {
    match dispatch(platform, command) {
      Err(ProvisionError::Dispatch(e)) => e,
      other => panic!("expected dispatch error, got {:?}", other.map(|_| ())),
    }
  }

  #[test]
  fn dispatch_succeeds_when_fully_registered() {
    assert!(dispatch(GuestPlatform::Osx, Command::new("Install", "Git")).is_ok());
  }

  #[test]
  fn unknown_subject() {
    let err = dispatch_err(GuestPlatform::Osx, Command::new("Uninstall", "Git"));
    assert_eq!(
      err,
      DispatchError::UnknownSubject {
        subject: "Uninstall".into()
      }
    );
    assert!(err.to_string().contains("Uninstall"));
  }

  #[test]
  fn missing_action() {
    let err = dispatch_err(GuestPlatform::Osx, Command::without_action("Install"));
    assert!(matches!(err, DispatchError::MissingAction { ref subject } if subject == "Install"));
  }

  #[test]
  fn unknown_action() {
    let err = dispatch_err(GuestPlatform::Osx, Command::new("Install", "Gitt"));
    assert!(matches!(err, DispatchError::UnknownAction { ref action, .. } if action == "Gitt"));
    assert!(err.to_string().contains("Gitt"));
    assert!(err.to_string().contains("Install"));
  }

  #[test]
  fn no_implementation_for_platform() {
    let err = dispatch_err(GuestPlatform::Linux, Command::new("Install", "Git"));
    assert_eq!(
      err,
      DispatchError::NoImplementation {
        subject: "Install".into(),
        action: "Git".into(),
        platform: GuestPlatform::Linux,
      }
    );
    assert!(err.to_string().contains("linux"));
  }

  #[test]
  fn unknown_subject_wins_over_missing_action() {
    let err = dispatch_err(GuestPlatform::Osx, Command::without_action("Nope"));
    assert!(matches!(err, DispatchError::UnknownSubject { .. }));
  }

  #[test]
  fn handler_receives_args_in_order() {
    let ctx = dispatch(GuestPlatform::Linux, Command::new("Setup", "Box").arg("osx-109")).unwrap();
    assert_eq!(ctx.session().box_name(), Some("osx-109"));
  }

  #[test]
  fn handler_argument_errors_propagate() {
    let result = dispatch(GuestPlatform::Osx, Command::new("Setup", "Box"));
    assert!(matches!(result, Err(ProvisionError::Argument(ArgError::Missing { .. }))));
  }

  #[test]
  fn duplicate_triple_is_rejected() {
    let mut builder = Registry::builder();
    builder.register("Install", "Git", GuestPlatform::Osx, noop).unwrap();
    let err = builder
      .register("Install", "Git", GuestPlatform::Osx, noop)
      .err()
      .unwrap();
    assert!(matches!(err, RegistryError::Duplicate { .. }));
    // Other platforms for the same pair are fine.
    assert!(builder.register("Install", "Git", GuestPlatform::Linux, noop).is_ok());
  }

  #[test]
  fn register_all_covers_every_platform() {
    let registry = registry();
    let actions = registry.actions("Setup");
    assert_eq!(actions, vec![("Box", GuestPlatform::ALL.to_vec())]);
  }

  #[test]
  fn sugar_resolves_to_registered_names() {
    let registry = registry();
    assert_eq!(
      registry.resolve_sugar("install_git"),
      Some(("Install".into(), "Git".into()))
    );
    assert_eq!(
      registry.resolve_sugar("install_github_for_mac"),
      Some(("Install".into(), "GitHubForMac".into()))
    );
    assert_eq!(
      registry.resolve_sugar("install_text_mate"),
      Some(("Install".into(), "TextMate".into()))
    );
    assert_eq!(registry.resolve_sugar("uninstall_git"), None);
    assert_eq!(registry.resolve_sugar("install"), None);
    assert_eq!(registry.resolve_sugar("install_"), None);
  }
}
