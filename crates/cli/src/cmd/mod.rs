mod cache;
mod info;
mod plan;
mod recipes;
mod render;

pub use cache::cmd_cache;
pub use info::cmd_info;
pub use plan::cmd_plan;
pub use recipes::cmd_recipes;
pub use render::{RenderFormat, cmd_render};

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use vmprov_lib::config::BuildOptions;
use vmprov_lib::eval::evaluate_config;
use vmprov_lib::platform::GuestPlatform;
use vmprov_lib::recipes::default_registry;
use vmprov_lib::session::Session;

/// Environment defaults, with `--platform` taking precedence.
fn build_options(platform: Option<GuestPlatform>) -> Result<BuildOptions> {
  let mut options = BuildOptions::from_env().context("Invalid build options in environment")?;
  if let Some(platform) = platform {
    options.platform = platform;
  }
  Ok(options)
}

fn evaluate(config: &Path, options: &BuildOptions) -> Result<Session> {
  let registry = default_registry().context("Failed to build recipe registry")?;
  debug!(config = %config.display(), platform = %options.platform, "evaluating provisioning file");
  evaluate_config(config, options, &registry)
    .with_context(|| format!("Failed to evaluate config: {}", config.display()))
}
