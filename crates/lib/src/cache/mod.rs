//! Download cache shared between the host and the guest.
//!
//! Downloaded artifacts live in one physical directory that is visible from
//! the host (where the configuration is evaluated) and from the guest (where
//! provisioning scripts run) through a synced folder. Each URL gets its own
//! subdirectory, named by [`encode_segment`].
//!
//! The host path is only ever read, at build time, to decide whether a
//! download is needed. The guest path is where the download is written, later,
//! when the session is applied. See [`guard`] for that split.
//!
//! No URL normalization is performed: `http://a/b` and `http://a/b/` are
//! different cache entries.

pub mod guard;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const ESCAPE: u8 = b'_';

/// The paired host/guest directories all cache entries live under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRoot {
  pub host: PathBuf,
  pub guest: String,
}

/// Where one URL's artifacts live, from both points of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
  pub url: String,
  pub host_path: PathBuf,
  pub guest_path: String,
}

impl CacheEntry {
  pub fn host_file(&self, filename: &str) -> PathBuf {
    self.host_path.join(filename)
  }

  pub fn guest_file(&self, filename: &str) -> String {
    format!("{}/{}", self.guest_path, filename)
  }
}

/// A cache directory found on the host, decoded back to its URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedUrl {
  pub url: String,
  pub path: PathBuf,
  pub files: Vec<String>,
}

impl CacheRoot {
  pub fn new(host: impl Into<PathBuf>, guest: impl Into<String>) -> Self {
    Self {
      host: host.into(),
      guest: guest.into(),
    }
  }

  /// Map a URL to its cache directory. Pure and total.
  pub fn derive(&self, url: &str) -> CacheEntry {
    let segment = encode_segment(url);
    CacheEntry {
      url: url.to_string(),
      host_path: self.host.join(&segment),
      guest_path: format!("{}/{}", self.guest, segment),
    }
  }

  /// List the URL directories currently present in the host cache.
  ///
  /// Directories whose names are not valid encodings are skipped. A missing
  /// cache root is an empty cache.
  pub fn entries(&self) -> io::Result<Vec<CachedUrl>> {
    let read_dir = match fs::read_dir(&self.host) {
      Ok(rd) => rd,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(e),
    };

    let mut entries = Vec::new();
    for entry in read_dir {
      let entry = entry?;
      if !entry.file_type()?.is_dir() {
        continue;
      }
      let name = entry.file_name();
      let Some(url) = name.to_str().and_then(decode_segment) else {
        continue;
      };
      let files = list_files(&entry.path())?;
      entries.push(CachedUrl {
        url,
        path: entry.path(),
        files,
      });
    }
    entries.sort_by(|a, b| a.url.cmp(&b.url));
    Ok(entries)
  }
}

fn list_files(dir: &Path) -> io::Result<Vec<String>> {
  let mut files = Vec::new();
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    if entry.file_type()?.is_file() {
      files.push(entry.file_name().to_string_lossy().into_owned());
    }
  }
  files.sort();
  Ok(files)
}

/// Encode a URL as one filesystem-safe path segment.
///
/// ASCII alphanumerics are kept; every other byte becomes `_` followed by two
/// uppercase hex digits. `_` itself is escaped, so the encoding is prefix-free
/// and distinct URLs never share a segment.
///
/// ```
/// use vmprov_lib::cache::encode_segment;
///
/// assert_eq!(encode_segment("http://a.com/f"), "http_3A_2F_2Fa_2Ecom_2Ff");
/// ```
pub fn encode_segment(url: &str) -> String {
  let mut out = String::with_capacity(url.len() * 2);
  for byte in url.bytes() {
    if byte.is_ascii_alphanumeric() {
      out.push(byte as char);
    } else {
      out.push(ESCAPE as char);
      out.push_str(&format!("{:02X}", byte));
    }
  }
  out
}

/// Inverse of [`encode_segment`]. Returns `None` for anything it could not have produced.
pub fn decode_segment(segment: &str) -> Option<String> {
  let bytes = segment.as_bytes();
  let mut out = Vec::with_capacity(bytes.len());
  let mut i = 0;
  while i < bytes.len() {
    let byte = bytes[i];
    if byte == ESCAPE {
      let hex = segment.get(i + 1..i + 3)?;
      if !hex.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)) {
        return None;
      }
      let decoded = u8::from_str_radix(hex, 16).ok()?;
      if decoded.is_ascii_alphanumeric() {
        return None;
      }
      out.push(decoded);
      i += 3;
    } else if byte.is_ascii_alphanumeric() {
      out.push(byte);
      i += 1;
    } else {
      return None;
    }
  }
  String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;
  use tempfile::TempDir;

  fn root() -> CacheRoot {
    CacheRoot::new("provisioning_cache", "/.provisioning_cache")
  }

  #[test]
  fn encodes_punctuation_as_hex() {
    assert_eq!(
      encode_segment("http://company.com/file2014.dmg"),
      "http_3A_2F_2Fcompany_2Ecom_2Ffile2014_2Edmg"
    );
  }

  #[test]
  fn encodes_multibyte_per_byte() {
    assert_eq!(encode_segment("é"), "_C3_A9");
  }

  #[test]
  fn escape_marker_is_itself_escaped() {
    // Without escaping '_' these two would collide.
    assert_ne!(encode_segment("a_2F"), encode_segment("a/"));
    assert_eq!(encode_segment("a_"), "a_5F");
  }

  #[test]
  fn derive_joins_both_roots() {
    let entry = root().derive("https://x.org/a.pkg");
    let segment = encode_segment("https://x.org/a.pkg");
    assert_eq!(entry.host_path, PathBuf::from("provisioning_cache").join(&segment));
    assert_eq!(entry.guest_path, format!("/.provisioning_cache/{}", segment));
    assert_eq!(
      entry.guest_file("install.pkg"),
      format!("/.provisioning_cache/{}/install.pkg", segment)
    );
  }

  #[test]
  fn equivalent_urls_are_not_canonicalized() {
    let r = root();
    assert_ne!(
      r.derive("http://a.com/x").guest_path,
      r.derive("http://a.com/x/").guest_path
    );
    assert_ne!(
      r.derive("http://a.com/?a=1&b=2").guest_path,
      r.derive("http://a.com/?b=2&a=1").guest_path
    );
  }

  #[test]
  fn decode_rejects_foreign_names() {
    assert_eq!(decode_segment("has space"), None);
    assert_eq!(decode_segment("trailing_2"), None);
    assert_eq!(decode_segment("lower_2f"), None);
    // An escaped alphanumeric is never produced by the encoder.
    assert_eq!(decode_segment("_41"), None);
  }

  #[test]
  fn entries_lists_decoded_urls() {
    let temp = TempDir::new().unwrap();
    let root = CacheRoot::new(temp.path(), "/.cache");
    let entry = root.derive("https://example.com/git.dmg");
    fs::create_dir_all(&entry.host_path).unwrap();
    fs::write(entry.host_file("install.dmg"), b"").unwrap();
    fs::create_dir_all(temp.path().join("not an encoding")).unwrap();

    let listed = root.entries().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].url, "https://example.com/git.dmg");
    assert_eq!(listed[0].files, vec!["install.dmg".to_string()]);
  }

  #[test]
  fn entries_on_missing_root_is_empty() {
    let temp = TempDir::new().unwrap();
    let root = CacheRoot::new(temp.path().join("absent"), "/.cache");
    assert!(root.entries().unwrap().is_empty());
  }

  proptest! {
    #[test]
    fn distinct_urls_never_collide(a in ".*", b in ".*") {
      prop_assume!(a != b);
      let (ea, eb) = (root().derive(&a), root().derive(&b));
      prop_assert_ne!(ea.host_path, eb.host_path);
      prop_assert_ne!(ea.guest_path, eb.guest_path);
    }

    #[test]
    fn derive_is_deterministic(url in ".*") {
      prop_assert_eq!(root().derive(&url), root().derive(&url));
    }

    #[test]
    fn segment_is_filesystem_safe(url in ".*") {
      let segment = encode_segment(&url);
      prop_assert!(segment.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_'));
      prop_assert_eq!(decode_segment(&segment), Some(url));
    }
  }
}
