//! Handing a finished session to whatever applies it.
//!
//! The core never runs fragments itself. An [`Orchestrator`] receives the
//! complete, ordered session and is expected to apply it sequentially,
//! stopping at the first failing fragment.

mod json;
mod vagrantfile;

pub use json::JsonHandoff;
pub use vagrantfile::{VagrantfileHandoff, render_vagrantfile, write_vagrantfile};

use crate::session::Session;

#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
  #[error("failed to write session: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to serialize session: {0}")]
  Json(#[from] serde_json::Error),

  #[error("failed to render session")]
  Render(#[from] std::fmt::Error),
}

/// Receives a finished session.
pub trait Orchestrator {
  fn accept(&mut self, session: &Session) -> Result<(), HandoffError>;
}
