//! Installers for Mac OS X guests.

use tracing::info;

use super::Recipe;
use crate::context::ProvisionContext;
use crate::error::ProvisionError;
use crate::install::PackageMatch;
use crate::platform::GuestPlatform;
use crate::registry::{Args, RegistryBuilder, RegistryError};
use crate::script::double_quote;

const DEFAULT_RUBY_VERSION: &str = "2.1.2";
const VIRTUALENV_URL: &str = "https://pypi.python.org/packages/source/v/virtualenv/virtualenv-1.11.6.tar.gz";
const VIRTUALENV_ARCHIVE: &str = "virtualenv-1.11.6.tar.gz";

pub(super) fn register(builder: &mut RegistryBuilder) -> Result<(), RegistryError> {
  let recipes: [(&str, Recipe); 22] = [
    ("OsxCommandLineTools", command_line_tools),
    ("OsxCommandLineToolsMavericks", command_line_tools_mavericks),
    ("OsxCommandLineToolsMountainLion", command_line_tools_mountain_lion),
    ("Gpg", gpg),
    ("Git", git),
    ("GitHubForMac", github_for_mac),
    ("Node", node),
    ("TextMate", textmate),
    ("Homebrew", homebrew),
    ("ITerm2", iterm2),
    ("HerokuToolbelt", heroku_toolbelt),
    ("Qt", qt),
    ("PhantomJS", phantomjs),
    ("Rails", rails),
    ("Bundler", bundler),
    ("Foundation", foundation),
    ("Bower", bower),
    ("GruntCli", grunt_cli),
    ("Python3", python3),
    ("Virtualenv", virtualenv),
    ("PostgreSQL", postgresql),
    ("Ruby", ruby),
  ];
  for (action, recipe) in recipes {
    builder.register("Install", action, GuestPlatform::Osx, recipe)?;
  }
  Ok(())
}

fn command_line_tools(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing OS X Command Line Tools");
  install_mavericks_tools(ctx);
  Ok(())
}

fn command_line_tools_mavericks(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing OS X Command Line Tools for Mavericks");
  install_mavericks_tools(ctx);
  Ok(())
}

fn install_mavericks_tools(ctx: &mut ProvisionContext) {
  ctx.install_mounted_package(
    "https://s3.amazonaws.com/OHSNAP/command_line_tools_os_x_mavericks_for_xcode__late_october_2013.dmg",
    "Command Line Developer Tools",
    PackageMatch::Exact("Command Line Tools (OS X 10.9).pkg"),
  );
}

fn command_line_tools_mountain_lion(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing OS X Command Line Tools for Mountain Lion");
  ctx.install_mounted_package(
    "http://devimages.apple.com/downloads/xcode/command_line_tools_for_xcode_os_x_mountain_lion_april_2013.dmg",
    "Command Line Tools (Mountain Lion)",
    PackageMatch::Glob,
  );
  Ok(())
}

fn gpg(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing gpg, gpg-agent, and copying gpg keys from vm host");
  ctx.install_mounted_package(
    "https://releases.gpgtools.org/GPG%20Suite%20-%202013.10.22.dmg",
    "GPG Suite",
    PackageMatch::Exact("Install.pkg"),
  );
  ctx.run("sudo chown -R vagrant ~/.gnupg");
  for key in ["pubring.gpg", "secring.gpg", "trustdb.gpg", "pubring.gpg~", "random_seed"] {
    ctx.copy_host_file(&format!("~/.gnupg/{key}"), &format!(".gnupg/{key}"));
  }
  Ok(())
}

fn git(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing git and copying .gitconfig from vm host");
  ctx.install_mounted_package(
    "https://git-osx-installer.googlecode.com/files/git-1.8.4.2-intel-universal-snow-leopard.dmg",
    "Git 1.8.4.2 Snow Leopard Intel Universal",
    PackageMatch::Exact("git-1.8.4.2-intel-universal-snow-leopard.pkg"),
  );
  ctx.copy_host_file("~/.gitconfig", ".gitconfig");
  Ok(())
}

fn github_for_mac(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing GitHub for Mac");
  ctx.install_compressed_archive("https://central.github.com/mac/latest");
  Ok(())
}

fn node(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing nodejs");
  ctx.install_flat_package("http://nodejs.org/dist/v0.10.26/node-v0.10.26.pkg");
  Ok(())
}

fn textmate(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing TextMate");
  ctx.install_archive("https://api.textmate.org/downloads/release");
  Ok(())
}

fn homebrew(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing Homebrew");
  ctx.run(
    "ruby -e \"$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/master/install)\"\n\
     echo export PATH='/usr/local/bin:$PATH' >> ~/.bash_profile\n\
     brew update\n\
     brew tap homebrew/versions\n\
     brew tap homebrew/dupes",
  );
  Ok(())
}

fn iterm2(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing iTerm2");
  ctx.install_compressed_archive("https://iterm2.com/downloads/stable/iTerm2_v2_0.zip");
  Ok(())
}

fn heroku_toolbelt(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing Heroku Toolbelt");
  ctx.install_flat_package("https://toolbelt.heroku.com/download/osx");
  Ok(())
}

fn qt(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing Qt");
  ctx.run("brew install qt");
  Ok(())
}

fn phantomjs(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing PhantomJS");
  ctx.run("brew install phantomjs");
  Ok(())
}

fn gem_install(ctx: &mut ProvisionContext, gem: &str, version: Option<String>) {
  info!(gem, version = version.as_deref().unwrap_or("latest"), "gem install");
  match version {
    Some(version) => {
      ctx.banner(&format!("installing {gem} ({version})"));
      ctx.run(&format!("gem install --no-rdoc --no-ri {gem} -v {}", double_quote(&version)));
    }
    None => {
      ctx.banner(&format!("installing {gem} (latest)"));
      ctx.run(&format!("gem install --no-rdoc --no-ri {gem}"));
    }
  }
}

/// `npm install product@version`, `latest` when no version is given.
fn npm_install(ctx: &mut ProvisionContext, product: &str, version: Option<String>) {
  let version = version.unwrap_or_else(|| "latest".to_string());
  info!(product, version = %version, "npm install");
  ctx.banner(&format!("installing {product} ({version})"));
  ctx.run(&format!("npm install {product}@{version}"));
}

fn rails(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  gem_install(ctx, "rails", args.opt_text(0, "version")?);
  Ok(())
}

fn bundler(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  gem_install(ctx, "bundler", args.opt_text(0, "version")?);
  Ok(())
}

fn foundation(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  gem_install(ctx, "foundation", args.opt_text(0, "version")?);
  Ok(())
}

fn bower(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  npm_install(ctx, "bower", args.opt_text(0, "version")?);
  Ok(())
}

fn grunt_cli(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  npm_install(ctx, "grunt-cli", args.opt_text(0, "version")?);
  Ok(())
}

fn python3(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing Python3");
  ctx.install_mounted_package(
    "https://www.python.org/ftp/python/3.4.1/python-3.4.1-macosx10.6.dmg",
    "Python 3.4.1",
    PackageMatch::Glob,
  );
  Ok(())
}

fn virtualenv(ctx: &mut ProvisionContext, _args: Args) -> Result<(), ProvisionError> {
  ctx.banner("Installing Python's virtualenv");
  let archive = ctx.ensure_cached(VIRTUALENV_URL, VIRTUALENV_ARCHIVE);
  ctx.run(&format!(
    "tar xvfz {}\n\
     pushd virtualenv-1.11.6\n\
     sudo python setup.py install\n\
     popd\n\
     sudo rm -rf virtualenv-1.11.6",
    double_quote(&archive)
  ));
  Ok(())
}

fn postgresql(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  // An empty suffix installs the latest formula.
  let version = args.opt_text(0, "version")?.unwrap_or_default();
  ctx.banner("Installing PostgreSQL");
  ctx.run(&format!(
    "brew install postgresql{version}\n\
     rm -rf /usr/local/var/postgres/\n\
     initdb /usr/local/var/postgres -E UTF8\n\
     mkdir -p ~/Library/LaunchAgents\n\
     ln -sfv /usr/local/opt/postgresql{version}/*.plist ~/Library/LaunchAgents"
  ));
  Ok(())
}

fn ruby(ctx: &mut ProvisionContext, args: Args) -> Result<(), ProvisionError> {
  let version = args
    .opt_text(0, "version")?
    .unwrap_or_else(|| DEFAULT_RUBY_VERSION.to_string());
  ctx.banner(&format!("Installing Ruby ({version})"));
  ctx.run(&format!(
    "brew install apple-gcc42\n\
     brew install rbenv\n\
     brew install ruby-build\n\
     rbenv install {version}\n\
     rbenv global {version}\n\
     rbenv rehash\n\
     echo 'if which rbenv > /dev/null; then eval \"$(rbenv init -)\"; fi' >> ~/.bash_profile"
  ));
  Ok(())
}
