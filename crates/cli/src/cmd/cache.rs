//! Implementation of the `vmprov cache` command.

use std::path::Path;

use anyhow::{Context, Result};

use vmprov_lib::platform::GuestPlatform;

use crate::output::{print_info, print_json, print_stat, symbols};

pub fn cmd_cache(config: &Path, platform: Option<GuestPlatform>, json: bool) -> Result<()> {
  let options = super::build_options(platform)?;
  let config_dir = match config.parent() {
    Some(dir) if !dir.as_os_str().is_empty() => dir,
    _ => Path::new("."),
  };
  let root = options.cache_root(config_dir);
  let entries = root
    .entries()
    .with_context(|| format!("Failed to read cache: {}", root.host.display()))?;

  if json {
    print_json(&entries)?;
    return Ok(());
  }

  print_stat("Host", &root.host.display().to_string());
  print_stat("Guest", &root.guest);
  println!();

  if entries.is_empty() {
    print_info("Cache is empty.");
    return Ok(());
  }

  for entry in &entries {
    println!("{} {}", symbols::INFO, entry.url);
    for file in &entry.files {
      println!("    {}", file);
    }
  }
  Ok(())
}
