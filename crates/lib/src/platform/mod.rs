//! Guest platforms that handlers are registered against.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operating system of the provisioned machine.
///
/// Handlers are keyed by platform; a statement only resolves when a handler
/// exists for the platform the build targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuestPlatform {
  #[default]
  Osx,
  Linux,
}

impl GuestPlatform {
  pub const ALL: [GuestPlatform; 2] = [GuestPlatform::Osx, GuestPlatform::Linux];

  /// Returns the lowercase string identifier for this platform
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Osx => "osx",
      Self::Linux => "linux",
    }
  }
}

impl fmt::Display for GuestPlatform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown guest platform '{0}' (expected one of: osx, linux)")]
pub struct ParsePlatformError(pub String);

impl FromStr for GuestPlatform {
  type Err = ParsePlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "osx" | "macos" | "darwin" => Ok(Self::Osx),
      "linux" => Ok(Self::Linux),
      _ => Err(ParsePlatformError(s.to_string())),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_is_osx() {
    assert_eq!(GuestPlatform::default(), GuestPlatform::Osx);
  }

  #[test]
  fn parses_aliases() {
    assert_eq!("darwin".parse::<GuestPlatform>().unwrap(), GuestPlatform::Osx);
    assert_eq!("MacOS".parse::<GuestPlatform>().unwrap(), GuestPlatform::Osx);
    assert_eq!("linux".parse::<GuestPlatform>().unwrap(), GuestPlatform::Linux);
  }

  #[test]
  fn rejects_unknown() {
    let err = "windows".parse::<GuestPlatform>().unwrap_err();
    assert!(err.to_string().contains("windows"));
  }
}
