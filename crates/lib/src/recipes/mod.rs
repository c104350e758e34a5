//! The shipped handler set.
//!
//! Recipes are ordinary [`Handler`](crate::registry::Handler)s bound into a
//! [`Registry`] at startup. Platform-neutral recipes are registered for every
//! [`GuestPlatform`](crate::platform::GuestPlatform); the installers only for
//! Osx.

mod osx;
mod project;
mod setup;

use crate::context::ProvisionContext;
use crate::error::ProvisionError;
use crate::registry::{Args, Registry, RegistryError};

pub use setup::expand_tilde;

pub(crate) type Recipe = fn(&mut ProvisionContext, Args) -> Result<(), ProvisionError>;

/// Build the registry with every shipped recipe.
pub fn default_registry() -> Result<Registry, RegistryError> {
  let mut builder = Registry::builder();
  setup::register(&mut builder)?;
  project::register(&mut builder)?;
  osx::register(&mut builder)?;
  Ok(builder.build())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::platform::GuestPlatform;

  #[test]
  fn default_registry_builds() {
    let registry = default_registry().unwrap();
    let subjects: Vec<_> = registry.subjects().collect();
    for expected in ["Bundle", "Dir", "Git", "Install", "Npm", "Pip", "Reboot", "Run", "Setup", "Virtualenv"] {
      assert!(subjects.contains(&expected), "missing subject {expected}");
    }
  }

  #[test]
  fn installers_are_osx_only() {
    let registry = default_registry().unwrap();
    for (action, platforms) in registry.actions("Install") {
      assert_eq!(platforms, vec![GuestPlatform::Osx], "Install {action}");
    }
  }

  #[test]
  fn neutral_recipes_cover_every_platform() {
    let registry = default_registry().unwrap();
    for (subject, action) in [("Setup", "Box"), ("Run", "Shell"), ("Reboot", "Vm"), ("Dir", "In")] {
      for platform in GuestPlatform::ALL {
        assert!(registry.resolve(subject, Some(action), platform).is_ok(), "{subject} {action} on {platform}");
      }
    }
  }
}
