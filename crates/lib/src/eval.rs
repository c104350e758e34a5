//! Configuration file evaluation.
//!
//! [`evaluate_config`] turns a Lua configuration file into a [`Session`]. The
//! cache synced folder is dispatched before the file runs, so it is always the
//! first directive. Any failed statement aborts the evaluation and no session
//! is returned.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use mlua::prelude::*;
use tracing::{debug, info};

use crate::config::BuildOptions;
use crate::context::ProvisionContext;
use crate::error::ProvisionError;
use crate::lua::runtime;
use crate::lua::state::DslState;
use crate::registry::{Arg, Command, Registry};
use crate::session::Session;

/// Errors that can occur during config evaluation.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
  #[error("cannot resolve config path {}: {source}", path.display())]
  ConfigPath {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  /// Lua evaluation error.
  #[error("lua error: {0}")]
  Lua(#[from] LuaError),

  /// A provisioning statement failed.
  #[error(transparent)]
  Provision(#[from] ProvisionError),

  #[error("provisioning state is still referenced after evaluation")]
  StateInUse,
}

/// Evaluate the Lua configuration file at `path`.
///
/// The host cache root is resolved relative to the file's directory.
///
/// # Example
/// ```ignore
/// use std::path::Path;
/// use vmprov_lib::{config::BuildOptions, eval::evaluate_config, recipes::default_registry};
///
/// let registry = default_registry()?;
/// let session = evaluate_config(Path::new("provision.lua"), &BuildOptions::from_env()?, &registry)?;
/// println!("{} directives", session.len());
/// ```
pub fn evaluate_config(path: &Path, options: &BuildOptions, registry: &Registry) -> Result<Session, EvalError> {
  let path = dunce::canonicalize(path).map_err(|source| EvalError::ConfigPath {
    path: path.to_path_buf(),
    source,
  })?;
  let config_dir = path.parent().unwrap_or(Path::new("."));
  info!(path = %path.display(), platform = %options.platform, "evaluating config");

  evaluate(options, registry, config_dir, |lua| runtime::load_file(lua, &path))
}

/// Evaluate Lua `source` as if it were a file in `config_dir`.
pub fn evaluate_source(
  source: &str,
  options: &BuildOptions,
  registry: &Registry,
  config_dir: &Path,
) -> Result<Session, EvalError> {
  evaluate(options, registry, config_dir, |lua| runtime::load_chunk(lua, source, "=config"))
}

fn evaluate(
  options: &BuildOptions,
  registry: &Registry,
  config_dir: &Path,
  run: impl FnOnce(&Lua) -> LuaResult<()>,
) -> Result<Session, EvalError> {
  let cache = options.cache_root(config_dir);
  debug!(host = %cache.host.display(), guest = %cache.guest, "cache root");

  let mut ctx = ProvisionContext::new(options.platform, cache.clone());
  let folder = BTreeMap::from([
    ("host".to_string(), Arg::String(cache.host.to_string_lossy().into_owned())),
    ("guest".to_string(), Arg::String(cache.guest.clone())),
  ]);
  registry.dispatch(&mut ctx, Command::new("Setup", "SyncedFolder").arg(Arg::Table(folder)))?;

  let state = Rc::new(DslState::new(ctx, registry.clone()));
  let result = {
    let lua = runtime::create_runtime(Rc::clone(&state))?;
    run(&lua)
    // lua is dropped here, releasing its references to the state
  };

  let (ctx, failure) = Rc::try_unwrap(state)
    .map_err(|_| EvalError::StateInUse)?
    .into_parts();
  if let Some(err) = failure {
    return Err(err.into());
  }
  result?;

  let session = ctx.into_session();
  info!(directives = session.len(), "config evaluated");
  Ok(session)
}
