//! Test utilities for vmprov-lib.

use std::fs;

use tempfile::TempDir;

use crate::cache::CacheRoot;
use crate::context::ProvisionContext;
use crate::platform::GuestPlatform;

/// A throwaway host cache directory.
pub struct TestCache {
  temp: TempDir,
}

impl TestCache {
  pub fn new() -> Self {
    Self {
      temp: TempDir::new().unwrap(),
    }
  }

  pub fn root(&self) -> CacheRoot {
    CacheRoot::new(self.temp.path().join("cache"), "/.provisioning_cache")
  }

  /// A fresh Osx context using this cache.
  pub fn context(&self) -> ProvisionContext {
    ProvisionContext::new(GuestPlatform::Osx, self.root())
  }

  /// Pretend `url` was downloaded as `filename` by an earlier run.
  pub fn populate(&self, url: &str, filename: &str) {
    let entry = self.root().derive(url);
    fs::create_dir_all(&entry.host_path).unwrap();
    fs::write(entry.host_file(filename), b"cached").unwrap();
  }
}
