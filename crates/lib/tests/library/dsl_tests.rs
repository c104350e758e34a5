use vmprov_lib::error::ProvisionError;
use vmprov_lib::eval::EvalError;
use vmprov_lib::platform::GuestPlatform;
use vmprov_lib::registry::DispatchError;
use vmprov_lib::session::Directive;

use super::common::{Project, kinds, texts};

const GIT_URL: &str = "https://git-osx-installer.googlecode.com/files/git-1.8.4.2-intel-universal-snow-leopard.dmg";

fn dispatch_error(result: Result<vmprov_lib::session::Session, EvalError>) -> DispatchError {
  match result {
    Err(EvalError::Provision(ProvisionError::Dispatch(err))) => err,
    other => panic!("expected a dispatch error, got {:?}", other.map(|s| s.len())),
  }
}

#[test]
fn install_git_end_to_end() {
  let project = Project::new(r#"Install "Git""#);
  let session = project.evaluate(GuestPlatform::Osx).unwrap();

  assert_eq!(kinds(&session), vec!["synced_folder", "shell", "shell", "shell", "file_copy"]);

  let texts = texts(&session);
  assert!(texts[0].contains("echo --------------- Installing git and copying .gitconfig from vm host ---------------"));
  assert!(texts[1].contains("curl -fL --create-dirs"));
  assert!(texts[1].contains(GIT_URL));

  let install = texts[2];
  let attach = install.find("hdiutil attach").unwrap();
  let installer = install.find("sudo installer -pkg").unwrap();
  let detach = install.rfind("hdiutil detach").unwrap();
  assert!(attach < installer && installer < detach);
}

#[test]
fn cached_dmg_skips_download() {
  let project = Project::new(r#"Install "Git""#);
  project.populate_cache(GIT_URL, "install.dmg");
  let session = project.evaluate(GuestPlatform::Osx).unwrap();
  assert_eq!(kinds(&session), vec!["synced_folder", "shell", "shell", "file_copy"]);
  assert!(texts(&session).iter().all(|t| !t.contains("curl")));
}

#[test]
fn repeated_install_downloads_once() {
  let project = Project::new("Install 'Git'\nInstall 'Git'");
  let session = project.evaluate(GuestPlatform::Osx).unwrap();
  let downloads = texts(&session).iter().filter(|t| t.contains("curl")).count();
  assert_eq!(downloads, 1);
}

#[test]
fn statement_forms_are_equivalent() {
  let a = Project::new(r#"Install "Git""#).evaluate(GuestPlatform::Osx).unwrap();
  let b = Project::new(r#"Install("Git")"#).evaluate(GuestPlatform::Osx).unwrap();
  let c = Project::new("install_git()").evaluate(GuestPlatform::Osx).unwrap();
  // The synced folder points into each project's own directory.
  assert_eq!(a.directives()[1..], b.directives()[1..]);
  assert_eq!(a.directives()[1..], c.directives()[1..]);
}

#[test]
fn flattened_names_ignore_case_and_underscores() {
  let session = Project::new("install_github_for_mac()")
    .evaluate(GuestPlatform::Osx)
    .unwrap();
  assert!(texts(&session).iter().any(|t| t.contains("unzip -qq -o -d /Applications")));
}

#[test]
fn dispatch_matrix() {
  let unknown_subject = dispatch_error(Project::new(r#"Frobnicate "Git""#).evaluate(GuestPlatform::Osx));
  assert_eq!(
    unknown_subject,
    DispatchError::UnknownSubject {
      subject: "Frobnicate".to_string()
    }
  );

  let missing_action = dispatch_error(Project::new("Install()").evaluate(GuestPlatform::Osx));
  assert_eq!(
    missing_action,
    DispatchError::MissingAction {
      subject: "Install".to_string()
    }
  );

  let unknown_action = dispatch_error(Project::new(r#"Install "Gti""#).evaluate(GuestPlatform::Osx));
  assert_eq!(
    unknown_action,
    DispatchError::UnknownAction {
      subject: "Install".to_string(),
      action: "Gti".to_string()
    }
  );

  let no_impl = dispatch_error(Project::new(r#"Install "Git""#).evaluate(GuestPlatform::Linux));
  assert_eq!(
    no_impl,
    DispatchError::NoImplementation {
      subject: "Install".to_string(),
      action: "Git".to_string(),
      platform: GuestPlatform::Linux
    }
  );

  let flattened = dispatch_error(Project::new("install_gti()").evaluate(GuestPlatform::Osx));
  assert!(matches!(flattened, DispatchError::UnknownAction { .. }));
}

#[test]
fn failure_after_output_yields_no_session() {
  let project = Project::new(
    r#"
      Setup("Box", "osx")
      Install "Git"
      Install "Nope"
    "#,
  );
  assert!(project.evaluate(GuestPlatform::Osx).is_err());
}

#[test]
fn cd_block_scopes_fragments() {
  let session = Project::new(
    r#"
      Git("Clone", "https://github.com/me/app.git", "/Users/vagrant/app")
      cd("/Users/vagrant/app", function()
        npm_install()
        Bundle "Install"
      end)
      Reboot "Vm"
    "#,
  )
  .evaluate(GuestPlatform::Osx)
  .unwrap();

  let dirs: Vec<_> = session.fragments().map(|f| f.directory.as_str()).collect();
  assert_eq!(
    dirs,
    vec![".", ".", "/Users/vagrant/app", "/Users/vagrant/app", "/Users/vagrant/app", "/Users/vagrant/app", ".", "."]
  );
}

#[test]
fn error_in_cd_block_is_reported() {
  let result = Project::new(r#"cd("/tmp", function() Install "Nope" end)"#).evaluate(GuestPlatform::Osx);
  assert!(matches!(
    dispatch_error(result),
    DispatchError::UnknownAction { .. }
  ));
}

#[test]
fn setup_statements() {
  let project = Project::new(
    r#"
      Setup("Box", "osx-10.9")
      Setup("Provider", "virtualbox", "dev-vm")
      Setup("ForwardedPort", { guest = 3000, host = 3001 })
    "#,
  );
  let session = project.evaluate(GuestPlatform::Linux).unwrap();
  assert_eq!(session.box_name(), Some("osx-10.9"));
  assert_eq!(
    session.directives()[3],
    Directive::ForwardedPort { guest: 3000, host: 3001 }
  );
}

#[test]
fn bad_argument_type() {
  let result = Project::new(r#"Setup("ForwardedPort", { guest = "x", host = 1 })"#).evaluate(GuestPlatform::Osx);
  assert!(matches!(result, Err(EvalError::Provision(ProvisionError::Argument(_)))));
}

#[test]
fn second_cache_binding_is_rejected() {
  let result = Project::new(r#"Setup("SyncedFolder", { host = "provisioning_cache", guest = "/.provisioning_cache" })"#)
    .evaluate(GuestPlatform::Osx);
  assert!(matches!(
    result,
    Err(EvalError::Provision(ProvisionError::DuplicateSyncedFolder { ref guest })) if guest == "/.provisioning_cache"
  ));
}

#[test]
fn cyclic_table_argument_is_an_error() {
  let result = Project::new("local t = { guest = 1, host = 2 }; t.me = t; Setup('ForwardedPort', t)")
    .evaluate(GuestPlatform::Osx);
  let Err(EvalError::Lua(err)) = result else {
    panic!("expected a Lua error, got {:?}", result.map(|s| s.len()));
  };
  assert!(err.to_string().contains("cyclic table"));
}
