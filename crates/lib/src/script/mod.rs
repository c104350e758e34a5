//! Script emission.
//!
//! Every piece of shell text that reaches the session goes through
//! [`ProvisionContext::run`] or [`ProvisionContext::run_privileged`], which
//! wrap it in the active directory:
//!
//! ```text
//! set -e
//! pushd <directory> > /dev/null
//! <code>
//! popd > /dev/null
//! ```
//!
//! The wrapping is textual. Code that changes directory itself, or exits the
//! shell, can defeat the restore.

mod escape;

pub use escape::*;

use std::ops::{Deref, DerefMut};

use tracing::debug;

use crate::context::ProvisionContext;
use crate::session::{Directive, ScriptFragment};

const BANNER_RULE: &str = "---------------";

/// Build the text of a directory-scoped fragment.
pub fn wrap_in_directory(code: &str, directory: &str) -> String {
  format!(
    "set -e\npushd {} > /dev/null\n{}\npopd > /dev/null\n",
    escape_path_token(directory),
    code.trim_end()
  )
}

impl ProvisionContext {
  /// Emit a human-readable separator.
  pub fn banner(&mut self, message: &str) {
    debug!(message, "banner");
    self.run(&format!("echo {BANNER_RULE} {} {BANNER_RULE}", escape_banner(message)));
  }

  /// Emit `code` as an unprivileged fragment in the current directory.
  pub fn run(&mut self, code: &str) {
    self.emit(code, false);
  }

  /// Emit `code` as a fragment the orchestrator runs as root.
  pub fn run_privileged(&mut self, code: &str) {
    self.emit(code, true);
  }

  fn emit(&mut self, code: &str, privileged: bool) {
    let directory = self.current_directory().to_string();
    let text = wrap_in_directory(code, &directory);
    self.push(Directive::Shell(ScriptFragment {
      text,
      privileged,
      directory,
    }));
  }

  /// Run `block` with `path` as the active directory.
  ///
  /// The previous directory is restored when `block` returns, whether it
  /// succeeded or failed, and also if it panics.
  pub fn scoped_directory<T, E>(
    &mut self,
    path: &str,
    block: impl FnOnce(&mut ProvisionContext) -> Result<T, E>,
  ) -> Result<T, E> {
    let mut scope = DirectoryScope::enter(self, path);
    block(&mut *scope)
  }
}

/// Holds a pushed directory; pops back to the entry depth on drop.
struct DirectoryScope<'a> {
  ctx: &'a mut ProvisionContext,
  depth: usize,
}

impl<'a> DirectoryScope<'a> {
  fn enter(ctx: &'a mut ProvisionContext, path: &str) -> Self {
    let depth = ctx.directory_depth();
    ctx.push_directory(path);
    debug!(path, depth, "entering directory scope");
    Self { ctx, depth }
  }
}

impl Deref for DirectoryScope<'_> {
  type Target = ProvisionContext;

  fn deref(&self) -> &ProvisionContext {
    self.ctx
  }
}

impl DerefMut for DirectoryScope<'_> {
  fn deref_mut(&mut self) -> &mut ProvisionContext {
    self.ctx
  }
}

impl Drop for DirectoryScope<'_> {
  fn drop(&mut self) {
    while self.ctx.directory_depth() > self.depth {
      self.ctx.pop_directory();
    }
  }
}
