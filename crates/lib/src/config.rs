//! Build options.
//!
//! Options come from three layers, later ones winning: built-in defaults from
//! [`crate::consts`], `VMPROV_*` environment variables, and whatever the
//! caller (usually the CLI) sets explicitly.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cache::CacheRoot;
use crate::consts::{DEFAULT_CACHE_GUEST_DIR, DEFAULT_CACHE_HOST_DIR, ENV_CACHE_GUEST, ENV_CACHE_HOST, ENV_PLATFORM};
use crate::platform::{GuestPlatform, ParsePlatformError};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("invalid {var}: {source}")]
  Platform {
    var: &'static str,
    #[source]
    source: ParsePlatformError,
  },

  #[error("{var} must be an absolute guest path, got '{value}'")]
  RelativeGuestPath { var: &'static str, value: String },
}

/// Everything a build needs besides the provisioning file itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
  pub platform: GuestPlatform,
  /// Host side of the cache. Relative paths are resolved by [`BuildOptions::cache_root`].
  pub cache_host: PathBuf,
  pub cache_guest: String,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      platform: GuestPlatform::default(),
      cache_host: PathBuf::from(DEFAULT_CACHE_HOST_DIR),
      cache_guest: DEFAULT_CACHE_GUEST_DIR.to_string(),
    }
  }
}

impl BuildOptions {
  /// Defaults overlaid with `VMPROV_PLATFORM`, `VMPROV_CACHE_HOST` and `VMPROV_CACHE_GUEST`.
  pub fn from_env() -> Result<Self, ConfigError> {
    let mut options = Self::default();

    if let Ok(value) = std::env::var(ENV_PLATFORM) {
      options.platform = value.parse().map_err(|source| ConfigError::Platform {
        var: ENV_PLATFORM,
        source,
      })?;
    }
    if let Ok(value) = std::env::var(ENV_CACHE_HOST) {
      options.cache_host = PathBuf::from(value);
    }
    if let Ok(value) = std::env::var(ENV_CACHE_GUEST) {
      if !value.starts_with('/') {
        return Err(ConfigError::RelativeGuestPath {
          var: ENV_CACHE_GUEST,
          value,
        });
      }
      options.cache_guest = value;
    }

    debug!(?options, "build options loaded");
    Ok(options)
  }

  /// The cache root pair, with a relative host path anchored at `config_dir`.
  pub fn cache_root(&self, config_dir: &Path) -> CacheRoot {
    let host = if self.cache_host.is_absolute() {
      self.cache_host.clone()
    } else {
      config_dir.join(&self.cache_host)
    };
    CacheRoot::new(host, self.cache_guest.trim_end_matches('/'))
  }
}
