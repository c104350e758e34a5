//! Implementation of the `vmprov render` command.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use vmprov_lib::handoff::{JsonHandoff, Orchestrator, VagrantfileHandoff};
use vmprov_lib::platform::GuestPlatform;

use crate::output::print_success;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum RenderFormat {
  #[default]
  Vagrantfile,
  Json,
}

pub fn cmd_render(
  config: &Path,
  platform: Option<GuestPlatform>,
  format: RenderFormat,
  output: Option<&Path>,
) -> Result<()> {
  let options = super::build_options(platform)?;
  let session = super::evaluate(config, &options)?;

  let writer: Box<dyn Write> = match output {
    Some(path) => {
      Box::new(File::create(path).with_context(|| format!("Failed to create output file: {}", path.display()))?)
    }
    None => Box::new(io::stdout().lock()),
  };

  let mut orchestrator: Box<dyn Orchestrator> = match format {
    RenderFormat::Vagrantfile => Box::new(VagrantfileHandoff::new(writer)),
    RenderFormat::Json => Box::new(JsonHandoff::new(writer)),
  };
  orchestrator.accept(&session).context("Failed to write session")?;

  if let Some(path) = output {
    print_success(&format!("Wrote {} directives to {}", session.len(), path.display()));
  }
  Ok(())
}
