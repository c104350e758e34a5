//! Project-level steps: cloning sources, installing dependencies, running
//! commands in a directory.

use std::convert::Infallible;

use super::Recipe;
use crate::context::ProvisionContext;
use crate::error::ProvisionError;
use crate::platform::GuestPlatform;
use crate::registry::{Args, RegistryBuilder, RegistryError};
use crate::script::double_quote;

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
  let osx: [(&str, &str, Recipe); 5] = [
    ("Git", "Clone", git_clone),
    ("Npm", "Install", npm_install),
    ("Bundle", "Install", bundle_install),
    ("Pip", "Install", pip_install),
    ("Virtualenv", "Create", virtualenv_create),
  ];
  for (subject, action, recipe) in osx {
    builder.register(subject, action, GuestPlatform::Osx, recipe)?;
  }

  let neutral: [(&str, &str, Recipe); 3] = [
    ("Run", "Shell", run_shell),
    ("Reboot", "Vm", reboot_vm),
    ("Dir", "In", dir_in),
  ];
  for (subject, action, recipe) in neutral {
    builder.register_all(subject, action, recipe)?;
  }
  Ok(())
}

/// Emit `code` inside `directory` when one is given, else in the current one.
fn run_in(ctx: &mut ProvisionContext, directory: Option<&str>, code: &str) {
  match directory {
    Some(directory) => {
      let _: Result<(), Infallible> = ctx.scoped_directory(directory, |ctx| {
        ctx.run(code);
        Ok(())
      });
    }
    None => ctx.run(code),
  }
}

fn git_clone(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  let url = args.str(0, "url")?;
  let dir = args.str(1, "dir")?;
  ctx.banner(&format!("git clone {url} {dir}"));
  ctx.run(&format!("git clone {} {}", double_quote(url), double_quote(dir)));
  Ok(())
}

fn npm_install(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  let dir = args.opt_text(0, "dir")?;
  ctx.banner("running 'npm install'");
  run_in(ctx, dir.as_deref(), "npm install");
  Ok(())
}

fn bundle_install(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  let dir = args.opt_text(0, "dir")?;
  ctx.banner("running 'bundle install'");
  run_in(ctx, dir.as_deref(), "bundle install");
  Ok(())
}

fn pip_install(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  let dir = args.opt_text(0, "dir")?;
  ctx.banner("Running pip install -r requirements.txt");
  run_in(ctx, dir.as_deref(), "bin/pip install -r requirements.txt");
  Ok(())
}

fn virtualenv_create(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  let dir = args.opt_text(0, "dir")?;
  ctx.banner("Running virtualenv");
  run_in(
    ctx,
    dir.as_deref(),
    "virtualenv --no-site-packages --python=`which python3` env",
  );
  Ok(())
}

/// `Run "Shell" (command)` or `Run "Shell" (dir, command)`.
fn run_shell(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  if args.len() < 2 {
    let command = args.str(0, "command")?;
    ctx.run(command);
  } else {
    let dir = args.str(0, "dir")?;
    let command = args.str(1, "command")?;
    run_in(ctx, Some(dir), command);
  }
  Ok(())
}

fn reboot_vm(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Rebooting");
  ctx.run("sudo reboot");
  Ok(())
}

fn dir_in(ctx: &mut ProvisionContext, mut args: Args) -> Result<(), ProvisionError> {
  let dir = args.str(0, "dir")?.to_string();
  let block = args.take_block()?;
  ctx.scoped_directory(&dir, block)
}
