//! Install primitives.
//!
//! Each primitive caches its artifact through the download guard and then
//! emits the fragment that installs it. Nothing here inspects the outcome of
//! a fragment or retries it; that belongs to whoever applies the session.

use tracing::info;

use crate::consts::{APPLICATIONS_DIR, MOUNT_ROOT};
use crate::context::ProvisionContext;
use crate::script::{double_quote, escape_path_token};

/// Which package inside a mounted volume to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageMatch<'a> {
  /// A package with exactly this file name.
  Exact(&'a str),
  /// The first `*.pkg` or `*.mpkg` found at the top of the volume.
  Glob,
}

/// Text of the mount/install/unmount fragment for an already-cached image.
pub fn mounted_package_script(image: &str, volume_label: &str, package: PackageMatch<'_>) -> String {
  let volume = format!("{}/{}", MOUNT_ROOT, escape_path_token(volume_label));
  let package_path = match package {
    PackageMatch::Exact(name) => format!("{}/{}", volume, escape_path_token(name)),
    PackageMatch::Glob => format!("\"$(ls -d {}/*.*pkg | head -n 1)\"", volume),
  };
  format!(
    "hdiutil detach {volume} > /dev/null 2>&1 || true\n\
     hdiutil attach {} -mountroot {} -nobrowse\n\
     sudo installer -pkg {package_path} -target /\n\
     hdiutil detach {volume}",
    double_quote(image),
    MOUNT_ROOT,
  )
}

impl ProvisionContext {
  /// Install a package that ships inside a disk image.
  pub fn install_mounted_package(&mut self, url: &str, volume_label: &str, package: PackageMatch<'_>) {
    info!(url = %url, volume = volume_label, "installing mounted package");
    let image = self.ensure_cached(url, "install.dmg");
    self.run(&mounted_package_script(&image, volume_label, package));
  }

  /// Install a flat `.pkg` file.
  pub fn install_flat_package(&mut self, url: &str) {
    info!(url = %url, "installing flat package");
    let package = self.ensure_cached(url, "install.pkg");
    self.run_privileged(&format!("installer -pkg {} -target /", double_quote(&package)));
  }

  /// Extract a tar archive into the applications directory.
  pub fn install_archive(&mut self, url: &str) {
    info!(url = %url, "installing archive");
    let archive = self.ensure_cached(url, "install.tar");
    self.run_privileged(&format!("tar -x -C {} -f {}", APPLICATIONS_DIR, double_quote(&archive)));
  }

  /// Extract a zip archive into the applications directory.
  pub fn install_compressed_archive(&mut self, url: &str) {
    info!(url = %url, "installing compressed archive");
    let archive = self.ensure_cached(url, "install.zip");
    self.run(&format!("unzip -qq -o -d {} {}", APPLICATIONS_DIR, double_quote(&archive)));
  }
}
