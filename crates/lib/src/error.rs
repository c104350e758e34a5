//! Errors raised while building a session.

use std::path::PathBuf;

use crate::registry::{ArgError, DispatchError};

/// Any failure of a provisioning statement. All of them abort the build.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
  #[error(transparent)]
  Dispatch(#[from] DispatchError),

  #[error(transparent)]
  Argument(#[from] ArgError),

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("guest path {guest} is already bound by a synced folder")]
  DuplicateSyncedFolder { guest: String },

  /// A nested block failed. The message is the block's own error.
  #[error("in nested block: {0}")]
  Block(String),
}
