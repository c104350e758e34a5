use std::path::Path;

use tempfile::TempDir;
use vmprov_lib::config::BuildOptions;
use vmprov_lib::eval::{EvalError, evaluate_config};
use vmprov_lib::platform::GuestPlatform;
use vmprov_lib::recipes::default_registry;
use vmprov_lib::session::{Directive, Session};

/// A provisioning file in its own directory, so the cache lands beside it.
pub struct Project {
  pub dir: TempDir,
}

impl Project {
  pub fn new(source: &str) -> Self {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("provision.lua"), source).unwrap();
    Self { dir }
  }

  pub fn path(&self) -> &Path {
    self.dir.path()
  }

  pub fn evaluate(&self, platform: GuestPlatform) -> Result<Session, EvalError> {
    let options = BuildOptions {
      platform,
      ..BuildOptions::default()
    };
    let registry = default_registry().unwrap();
    evaluate_config(&self.path().join("provision.lua"), &options, &registry)
  }

  /// Pretend `url` was fetched as `filename` by an earlier provisioning run.
  pub fn populate_cache(&self, url: &str, filename: &str) {
    let root = BuildOptions::default().cache_root(&dunce::canonicalize(self.path()).unwrap());
    let entry = root.derive(url);
    std::fs::create_dir_all(&entry.host_path).unwrap();
    std::fs::write(entry.host_file(filename), b"cached").unwrap();
  }
}

pub fn kinds(session: &Session) -> Vec<&'static str> {
  session.directives().iter().map(Directive::kind).collect()
}

pub fn texts(session: &Session) -> Vec<&str> {
  session.fragments().map(|f| f.text.as_str()).collect()
}
