use std::io::Write;

use super::{HandoffError, Orchestrator};
use crate::session::Session;

/// Writes the session as pretty-printed JSON.
pub struct JsonHandoff<W> {
  writer: W,
}

impl<W: Write> JsonHandoff<W> {
  pub fn new(writer: W) -> Self {
    Self { writer }
  }

  pub fn into_inner(self) -> W {
    self.writer
  }
}

impl<W: Write> Orchestrator for JsonHandoff<W> {
  fn accept(&mut self, session: &Session) -> Result<(), HandoffError> {
    serde_json::to_writer_pretty(&mut self.writer, session)?;
    writeln!(self.writer)?;
    self.writer.flush()?;
    Ok(())
  }
}
