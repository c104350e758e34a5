//! `Setup` statements: VM-level configuration.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::Recipe;
use crate::context::ProvisionContext;
use crate::error::ProvisionError;
use crate::registry::{Args, RegistryBuilder, RegistryError};
use crate::session::Directive;

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
  let recipes: [(&str, Recipe); 4] = [
    ("Box", select_box),
    ("Provider", provider),
    ("SyncedFolder", synced_folder),
    ("ForwardedPort", forwarded_port),
  ];
  for (action, recipe) in recipes {
    builder.register_all("Setup", action, recipe)?;
  }
  Ok(())
}

/// Expand a leading `~` to `$HOME`. Other paths are returned unchanged.
pub fn expand_tilde(path: &str) -> PathBuf {
  let rest = match path.strip_prefix('~') {
    Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
    _ => return PathBuf::from(path),
  };
  match std::env::var_os("HOME") {
    Some(home) => PathBuf::from(home).join(rest),
    None => PathBuf::from(path),
  }
}

fn select_box(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  let name = args.str(0, "box")?;
  ctx.push(Directive::Box { name: name.to_string() });
  Ok(())
}

fn provider(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  let provider = args.str(0, "provider")?;
  let name = args.str(1, "vm_name")?;
  ctx.push(Directive::Provider {
    provider: provider.to_string(),
    name: name.to_string(),
    gui: true,
  });
  Ok(())
}

fn synced_folder(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  let folder = args.table(0, "folder")?;
  let host = args.field_str(folder, "host")?;
  let guest = args.field_str(folder, "guest")?;
  if ctx.session().has_synced_guest(guest) {
    return Err(ProvisionError::DuplicateSyncedFolder {
      guest: guest.to_string(),
    });
  }

  let path = expand_tilde(host);
  if !path.exists() {
    debug!(path = %path.display(), "creating synced folder on host");
    fs::create_dir_all(&path).map_err(|source| ProvisionError::CreateDir {
      path: path.clone(),
      source,
    })?;
  }

  ctx.push(Directive::SyncedFolder {
    host: host.to_string(),
    guest: guest.to_string(),
  });
  Ok(())
}

fn forwarded_port(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  let ports = args.table(0, "ports")?;
  let guest = args.field_port(ports, "guest")?;
  let host = args.field_port(ports, "host")?;
  ctx.push(Directive::ForwardedPort { guest, host });
  Ok(())
}
