//! Implementation of the `vmprov recipes` command.

use anyhow::{Context, Result};

use vmprov_lib::recipes::default_registry;

use crate::output::print_json;

pub fn cmd_recipes(json: bool) -> Result<()> {
  let registry = default_registry().context("Failed to build recipe registry")?;

  if json {
    let subjects: serde_json::Map<_, _> = registry
      .subjects()
      .map(|subject| {
        let actions: serde_json::Map<_, _> = registry
          .actions(subject)
          .into_iter()
          .map(|(action, platforms)| (action.to_string(), serde_json::json!(platforms)))
          .collect();
        (subject.to_string(), serde_json::Value::Object(actions))
      })
      .collect();
    return print_json(&subjects);
  }

  for subject in registry.subjects() {
    println!("{}", subject);
    for (action, platforms) in registry.actions(subject) {
      let platforms: Vec<_> = platforms.iter().map(|p| p.as_str()).collect();
      println!("  {:<24} {}", action, platforms.join(", "));
    }
  }
  Ok(())
}
