use std::io;
use std::io::Write;

#[cfg(test)]
use mockall::automock;

use super::KeyspaceEvent;
use crate::Result;

/// Destination of completed events.
#[cfg_attr(test, automock)]
pub trait EventSink: Send + 'static {
    /// Writes one event. Must not buffer: the event is visible to the reader
    /// when this returns.
    fn emit(
        &mut self,
        event: &KeyspaceEvent,
    ) -> Result<()>;
}

/// Writes `"<command> <key>\n"` per event and flushes immediately.
pub struct WriterSink<W: Write + Send + 'static> {
    writer: W,
}

impl<W: Write + Send + 'static> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    #[cfg(test)]
    pub(crate) fn get_ref(&self) -> &W {
        &self.writer
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send + 'static> EventSink for WriterSink<W> {
    fn emit(
        &mut self,
        event: &KeyspaceEvent,
    ) -> Result<()> {
        writeln!(self.writer, "{}", event)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Sink for the process standard output.
pub fn stdout_sink() -> WriterSink<io::Stdout> {
    WriterSink::new(io::stdout())
}
