//! Implementation of the `vmprov plan` command.
//!
//! Evaluates a provisioning file and prints what the resulting session
//! contains, identified by its plan hash.

use std::path::Path;

use anyhow::{Context, Result};

use vmprov_lib::platform::GuestPlatform;
use vmprov_lib::util::hash::Hashable;

use crate::output::{print_json, print_stat, print_success};

pub fn cmd_plan(config: &Path, platform: Option<GuestPlatform>, json: bool) -> Result<()> {
  let options = super::build_options(platform)?;
  let session = super::evaluate(config, &options)?;
  let hash = session.compute_hash().context("Failed to compute plan hash")?;

  let fragments = session.fragments().count();
  let privileged = session.fragments().filter(|f| f.privileged).count();

  if json {
    let summary: serde_json::Map<_, _> = session
      .summary()
      .into_iter()
      .map(|(kind, count)| (kind.to_string(), serde_json::json!(count)))
      .collect();
    print_json(&serde_json::json!({
      "hash": hash.0,
      "platform": options.platform,
      "box": session.box_name(),
      "directives": session.len(),
      "fragments": fragments,
      "privileged": privileged,
      "summary": summary,
    }))?;
    return Ok(());
  }

  print_success(&format!("Plan: {}", hash));
  print_stat("Platform", options.platform.as_str());
  print_stat("Box", session.box_name().unwrap_or("(none)"));
  print_stat("Directives", &session.len().to_string());
  for (kind, count) in session.summary() {
    print_stat(&format!("  {kind}"), &count.to_string());
  }
  print_stat("Fragments", &format!("{fragments} ({privileged} privileged)"));

  Ok(())
}
