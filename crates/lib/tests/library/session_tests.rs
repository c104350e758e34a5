use vmprov_lib::handoff::{JsonHandoff, Orchestrator, render_vagrantfile};
use vmprov_lib::platform::GuestPlatform;
use vmprov_lib::session::Session;
use vmprov_lib::util::hash::Hashable;

use super::common::Project;

const CONFIG: &str = r#"
  Setup("Box", "osx-10.9")
  Install "Node"
  Install("Rails", "4.1.0")
"#;

#[test]
fn plan_hash_is_deterministic() {
  let project = Project::new(CONFIG);
  let a = project.evaluate(GuestPlatform::Osx).unwrap();
  let b = project.evaluate(GuestPlatform::Osx).unwrap();
  assert_eq!(a, b);
  assert_eq!(a.compute_hash().unwrap(), b.compute_hash().unwrap());
}

#[test]
fn json_handoff_round_trips() {
  let session = Project::new(CONFIG).evaluate(GuestPlatform::Osx).unwrap();
  let mut handoff = JsonHandoff::new(Vec::new());
  handoff.accept(&session).unwrap();
  let parsed: Session = serde_json::from_slice(&handoff.into_inner()).unwrap();
  assert_eq!(parsed, session);
}

#[test]
fn vagrantfile_preserves_fragment_order() {
  let session = Project::new(CONFIG).evaluate(GuestPlatform::Osx).unwrap();
  let rendered = render_vagrantfile(&session).unwrap();

  let folder = rendered.find("config.vm.synced_folder").unwrap();
  let node = rendered.find("node-v0.10.26.pkg").unwrap();
  let rails = rendered.find("rails -v \"4.1.0\"").unwrap();
  assert!(folder < node && node < rails);
  assert!(rendered.contains("privileged: true"));
  assert!(rendered.trim_end().ends_with("end"));
}
