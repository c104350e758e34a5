//! Provisioning session.
//!
//! The session is the ordered, append-only list of directives a build
//! produces. Once evaluation finishes it is handed, unchanged, to an
//! [`Orchestrator`](crate::handoff::Orchestrator).

mod types;

pub use types::*;
