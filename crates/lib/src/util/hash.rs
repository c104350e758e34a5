//! Hashing utilities for plan identifiers.
//!
//! A session is identified by a truncated SHA-256 of its JSON serialization,
//! so two builds that emit identical directives share the same plan hash.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::consts::OBJ_HASH_PREFIX_LEN;

pub type HashError = serde_json::Error;

/// A truncated, lowercase hexadecimal SHA-256 of a serialized object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectHash(pub String);

impl std::fmt::Display for ObjectHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

pub trait Hashable: Serialize {
  fn compute_hash(&self) -> Result<ObjectHash, HashError> {
    let serialized = serde_json::to_string(self)?;
    let mut hasher = Sha256::new();
    hasher.update(serialized.as_bytes());
    let full = hex::encode(hasher.finalize());
    Ok(ObjectHash(full[..OBJ_HASH_PREFIX_LEN].to_string()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Serialize)]
  struct Sample {
    name: &'static str,
  }

  impl Hashable for Sample {}

  #[test]
  fn hash_is_truncated_hex() {
    let hash = Sample { name: "git" }.compute_hash().unwrap();
    assert_eq!(hash.0.len(), OBJ_HASH_PREFIX_LEN);
    assert!(hash.0.chars().all(|c| c.is_ascii_hexdigit()));
  }

  #[test]
  fn equal_values_hash_equal() {
    let a = Sample { name: "git" }.compute_hash().unwrap();
    let b = Sample { name: "git" }.compute_hash().unwrap();
    let c = Sample { name: "node" }.compute_hash().unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
  }
}
