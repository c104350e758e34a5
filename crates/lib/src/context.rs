//! The shared context handlers run against.
//!
//! One [`ProvisionContext`] exists per build. It owns the [`Session`] being
//! assembled together with the state emission depends on: the target
//! platform, the cache root, the active directory stack and the set of
//! downloads already requested.
//!
//! Emission methods live next to the component they belong to:
//! [`crate::script`] (banner, run, scoped directories) and
//! [`crate::cache::guard`] (download guard).

use std::collections::BTreeSet;

use crate::cache::CacheRoot;
use crate::config::BuildOptions;
use crate::platform::GuestPlatform;
use crate::session::{Directive, Session};

/// Directory a fragment runs in when no scope is active.
pub const DEFAULT_DIRECTORY: &str = ".";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionContext {
  platform: GuestPlatform,
  cache: CacheRoot,
  session: Session,
  directories: Vec<String>,
  requested: BTreeSet<(String, String)>,
}

impl Default for ProvisionContext {
  fn default() -> Self {
    let options = BuildOptions::default();
    Self::new(options.platform, CacheRoot::new(options.cache_host, options.cache_guest))
  }
}

impl ProvisionContext {
  pub fn new(platform: GuestPlatform, cache: CacheRoot) -> Self {
    Self {
      platform,
      cache,
      session: Session::new(),
      directories: Vec::new(),
      requested: BTreeSet::new(),
    }
  }

  pub fn platform(&self) -> GuestPlatform {
    self.platform
  }

  pub fn cache(&self) -> &CacheRoot {
    &self.cache
  }

  pub fn session(&self) -> &Session {
    &self.session
  }

  /// Finish the build and take ownership of the session.
  pub fn into_session(self) -> Session {
    self.session
  }

  /// Append a structural directive.
  pub fn push(&mut self, directive: Directive) {
    tracing::trace!(kind = directive.kind(), "directive appended");
    self.session.push(directive);
  }

  /// Copy a file from the host into the guest when the session is applied.
  pub fn copy_host_file(&mut self, host: &str, guest: &str) {
    self.push(Directive::FileCopy {
      host: host.to_string(),
      guest: guest.to_string(),
    });
  }

  /// The directory new fragments are scoped to.
  pub fn current_directory(&self) -> &str {
    self.directories.last().map(String::as_str).unwrap_or(DEFAULT_DIRECTORY)
  }

  pub(crate) fn push_directory(&mut self, path: &str) {
    self.directories.push(path.to_string());
  }

  pub(crate) fn pop_directory(&mut self) {
    self.directories.pop();
  }

  pub(crate) fn directory_depth(&self) -> usize {
    self.directories.len()
  }

  /// Record a download request. Returns `false` if it was already recorded in this build.
  pub(crate) fn record_download(&mut self, url: &str, filename: &str) -> bool {
    self.requested.insert((url.to_string(), filename.to_string()))
  }
}
