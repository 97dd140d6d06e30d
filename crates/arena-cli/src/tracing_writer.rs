//! Tracing writers for the terminal and file log layers.
//!
//! Both layers format one event into a [`LineWriter`], which hands the
//! whole buffer to its [`LineSink`] when dropped. Each event therefore
//! reaches its target in a single piece, never interleaved with REPL
//! output or with events from other threads.
//!
//! - [`TerminalMakeWriter`]: routes through [`SharedPrinterSlot`] while the
//!   REPL owns the terminal, stderr otherwise, so one-shot output on stdout
//!   stays clean.
//! - [`FileMakeWriter`]: appends to `arena.log`. The file layer is
//!   configured with `.with_ansi(false)`.

use arena_app::{PrintResult, SharedPrinterSlot};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;

/// Destination for one formatted event.
pub trait LineSink: Clone {
    fn emit(&self, line: &[u8]);
}

/// Terminal destination.
///
/// When the printer channel is full the event is dropped from the
/// terminal; the file layer still has it.
#[derive(Clone)]
pub struct TerminalSink {
    slot: SharedPrinterSlot,
}

impl LineSink for TerminalSink {
    fn emit(&self, line: &[u8]) {
        let msg = String::from_utf8_lossy(line).into_owned();
        if self.slot.try_print(msg) == PrintResult::NoPrinter {
            let mut err = io::stderr().lock();
            let _ = err.write_all(line);
            let _ = err.flush();
        }
    }
}

/// Append-only log file shared by every event.
#[derive(Clone)]
pub struct FileSink {
    file: Arc<Mutex<File>>,
}

impl LineSink for FileSink {
    fn emit(&self, line: &[u8]) {
        let mut file = self.file.lock();
        let _ = file.write_all(line);
        let _ = file.flush();
    }
}

/// [`MakeWriter`](tracing_subscriber::fmt::MakeWriter) over a [`LineSink`].
#[derive(Clone)]
pub struct LineMakeWriter<S> {
    sink: S,
}

pub type TerminalMakeWriter = LineMakeWriter<TerminalSink>;
pub type FileMakeWriter = LineMakeWriter<FileSink>;

impl TerminalMakeWriter {
    pub fn new(slot: &SharedPrinterSlot) -> Self {
        Self {
            sink: TerminalSink { slot: slot.clone() },
        }
    }
}

impl FileMakeWriter {
    pub fn new(file: Arc<Mutex<File>>) -> Self {
        Self {
            sink: FileSink { file },
        }
    }
}

impl<'a, S: LineSink + 'static> tracing_subscriber::fmt::MakeWriter<'a> for LineMakeWriter<S> {
    type Writer = LineWriter<S>;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter {
            sink: self.sink.clone(),
            buf: Vec::with_capacity(256),
        }
    }
}

/// Per-event buffer, emitted on [`Drop`].
pub struct LineWriter<S: LineSink> {
    sink: S,
    buf: Vec<u8>,
}

impl<S: LineSink> Write for LineWriter<S> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: LineSink> Drop for LineWriter<S> {
    fn drop(&mut self) {
        if !self.buf.is_empty() {
            self.sink.emit(&self.buf);
        }
    }
}
