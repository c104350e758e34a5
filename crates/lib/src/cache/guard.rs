//! Download guard.
//!
//! The configuration is evaluated on every orchestrator invocation, including
//! ones that never provision (status, destroy, ...). Downloads therefore must
//! not happen during evaluation. Instead:
//!
//! 1. At build time the host side of the cache is checked synchronously. If
//!    the file is there, nothing is emitted.
//! 2. Otherwise a guest-side fragment is emitted that fetches the file into
//!    the guest side of the cache, and only if it is still absent when the
//!    fragment runs.
//!
//! Because the cache directory is a synced folder on the host, it outlives
//! individual VMs, so a fetch happens at most once across VM recreations.

use tracing::{debug, info};

use crate::context::ProvisionContext;
use crate::script::double_quote;

/// Outcome of [`ProvisionContext::ensure_cached`], for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
  /// The host cache already holds the file.
  Present,
  /// A conditional download fragment was emitted.
  Scheduled,
  /// The same `(url, filename)` was already handled earlier in this build.
  AlreadyRequested,
}

/// Shell text that fetches `url` into `guest_file` unless it already exists.
pub fn download_script(url: &str, guest_file: &str) -> String {
  let target = double_quote(guest_file);
  format!(
    "[ -f {target} ] || curl -fL --create-dirs -o {target} {}",
    double_quote(url)
  )
}

impl ProvisionContext {
  /// Make `url` available in the guest as `filename` inside its cache directory.
  ///
  /// Returns the guest path of the file.
  pub fn ensure_cached(&mut self, url: &str, filename: &str) -> String {
    self.ensure_cached_with_status(url, filename).0
  }

  pub fn ensure_cached_with_status(&mut self, url: &str, filename: &str) -> (String, CacheStatus) {
    let entry = self.cache().derive(url);
    let guest_file = entry.guest_file(filename);

    if !self.record_download(url, filename) {
      debug!(url = %url, filename, "download already requested in this build");
      return (guest_file, CacheStatus::AlreadyRequested);
    }

    let host_file = entry.host_file(filename);
    if host_file.exists() {
      info!(url = %url, path = %host_file.display(), "cache hit");
      return (guest_file, CacheStatus::Present);
    }

    info!(url = %url, path = %guest_file, "cache miss, scheduling download");
    self.run(&download_script(url, &guest_file));
    (guest_file, CacheStatus::Scheduled)
  }
}
