//! Vagrantfile rendering.
//!
//! Shell fragments become single-quoted heredocs so their text reaches the
//! guest unmodified.

use std::fmt;
use std::io;

use super::{HandoffError, Orchestrator};
use crate::session::{Directive, Session};

const HEREDOC: &str = "VMPROV_SCRIPT";

/// Writes the session as a `Vagrantfile`.
pub struct VagrantfileHandoff<W> {
  writer: W,
}

impl<W: io::Write> VagrantfileHandoff<W> {
  pub fn new(writer: W) -> Self {
    Self { writer }
  }

  pub fn into_inner(self) -> W {
    self.writer
  }
}

impl<W: io::Write> Orchestrator for VagrantfileHandoff<W> {
  fn accept(&mut self, session: &Session) -> Result<(), HandoffError> {
    self.writer.write_all(render_vagrantfile(session)?.as_bytes())?;
    self.writer.flush()?;
    Ok(())
  }
}

/// Render `session` as a `Vagrant.configure("2")` block.
pub fn render_vagrantfile(session: &Session) -> Result<String, fmt::Error> {
  let mut out = String::new();
  write_vagrantfile(&mut out, session)?;
  Ok(out)
}

/// Write `session` as a `Vagrant.configure("2")` block to `out`.
pub fn write_vagrantfile(out: &mut impl fmt::Write, session: &Session) -> fmt::Result {
  writeln!(out, "Vagrant.configure(\"2\") do |config|")?;
  for directive in session.directives() {
    render_directive(out, directive)?;
  }
  writeln!(out, "end")
}

fn render_directive(out: &mut impl fmt::Write, directive: &Directive) -> fmt::Result {
  match directive {
    Directive::Box { name } => writeln!(out, "  config.vm.box = {}", ruby_string(name)),
    Directive::Provider { provider, name, gui } => {
      writeln!(out, "  config.vm.provider {} do |vm|", ruby_string(provider))?;
      writeln!(out, "    vm.name = {}", ruby_string(name))?;
      writeln!(out, "    vm.gui = {gui}")?;
      writeln!(out, "  end")
    }
    Directive::SyncedFolder { host, guest } => writeln!(
      out,
      "  config.vm.synced_folder {}, {}",
      ruby_string(host),
      ruby_string(guest)
    ),
    Directive::ForwardedPort { guest, host } => writeln!(
      out,
      "  config.vm.network \"forwarded_port\", guest: {guest}, host: {host}"
    ),
    Directive::FileCopy { host, guest } => writeln!(
      out,
      "  config.vm.provision :file, source: {}, destination: {}",
      ruby_string(host),
      ruby_string(guest)
    ),
    Directive::Shell(fragment) => {
      let delimiter = heredoc_delimiter(&fragment.text);
      writeln!(
        out,
        "  config.vm.provision :shell, privileged: {}, inline: <<-'{delimiter}'",
        fragment.privileged
      )?;
      out.write_str(&fragment.text)?;
      if !fragment.text.ends_with('\n') {
        out.write_char('\n')?;
      }
      writeln!(out, "  {delimiter}")
    }
  }
}

/// A heredoc terminator that no line of `text` matches.
fn heredoc_delimiter(text: &str) -> String {
  let mut delimiter = HEREDOC.to_string();
  let mut n = 0;
  while text.lines().any(|line| line.trim() == delimiter) {
    n += 1;
    delimiter = format!("{HEREDOC}_{n}");
  }
  delimiter
}

/// A double-quoted Ruby literal with `\`, `"` and `#` escaped.
fn ruby_string(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('"');
  for c in value.chars() {
    if matches!(c, '\\' | '"' | '#') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('"');
  out
}
