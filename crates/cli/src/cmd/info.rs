use anyhow::Result;

use vmprov_lib::consts::{APP_NAME, DEFAULT_CONFIG_FILE, ENV_CACHE_GUEST, ENV_CACHE_HOST, ENV_PLATFORM};
use vmprov_lib::platform::GuestPlatform;

use crate::output::print_stat;

pub fn cmd_info(platform: Option<GuestPlatform>) -> Result<()> {
  let options = super::build_options(platform)?;

  println!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION"));
  print_stat("Platform", options.platform.as_str());
  print_stat("Config file", DEFAULT_CONFIG_FILE);
  print_stat("Cache (host)", &options.cache_host.display().to_string());
  print_stat("Cache (guest)", &options.cache_guest);
  println!();
  println!("Environment:");
  for var in [ENV_PLATFORM, ENV_CACHE_HOST, ENV_CACHE_GUEST] {
    let value = std::env::var(var).unwrap_or_else(|_| "(unset)".to_string());
    print_stat(var, &value);
  }
  Ok(())
}
