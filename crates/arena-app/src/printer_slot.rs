//! Shared printer slot for routing output through rustyline's ExternalPrinter.
//!
//! This slot is shared between:
//! - [`ArenaApp`](crate::ArenaApp), which sets and clears the printer around the REPL
//! - The tracing `MakeWriter` in `arena-cli`, which routes log lines through it
//!
//! When the slot is empty, consumers fall back to direct output.
//!
//! [`NonBlockingPrinter`] puts a bounded channel and a drain thread between
//! callers and the `ExternalPrinter`, so printing never blocks the async
//! runtime even when rustyline's own channel is full.

use parking_lot::Mutex;
use rustyline::ExternalPrinter;
use std::sync::Arc;

/// Result of attempting to print through the shared slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintResult {
    /// Message was enqueued for terminal display.
    Sent,
    /// No printer is installed. Caller should print directly.
    NoPrinter,
    /// Printer is installed but the channel is full; the message is dropped.
    Dropped,
}

struct NonBlockingPrinter {
    tx: std::sync::mpsc::SyncSender<String>,
}

impl NonBlockingPrinter {
    const CHANNEL_CAPACITY: usize = 500;

    fn spawn(mut printer: Box<dyn ExternalPrinter + Send>) -> std::io::Result<Self> {
        let (tx, rx) = std::sync::mpsc::sync_channel::<String>(Self::CHANNEL_CAPACITY);

        std::thread::Builder::new()
            .name("arena-printer-drain".into())
            .spawn(move || {
                // Exits when the sender is dropped.
                while let Ok(msg) = rx.recv() {
                    let _ = printer.print(msg);
                }
            })?;

        Ok(Self { tx })
    }

    fn try_print(&self, msg: String) -> bool {
        self.tx.try_send(msg).is_ok()
    }
}

/// Shared slot holding an optional non-blocking printer.
#[derive(Clone, Default)]
pub struct SharedPrinterSlot {
    inner: Arc<Mutex<Option<NonBlockingPrinter>>>,
}

impl SharedPrinterSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs an ExternalPrinter.
    ///
    /// If the drain thread cannot be started the slot stays empty and
    /// output keeps going directly to the terminal.
    pub fn set(&self, printer: Box<dyn ExternalPrinter + Send>) {
        match NonBlockingPrinter::spawn(printer) {
            Ok(printer) => *self.inner.lock() = Some(printer),
            Err(e) => tracing::warn!(error = %e, "Failed to start printer thread"),
        }
    }

    /// Removes the printer. Its drain thread exits.
    pub fn clear(&self) {
        *self.inner.lock() = None;
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Attempts to print a message without blocking.
    pub fn try_print(&self, msg: String) -> PrintResult {
        let guard = self.inner.lock();
        match guard.as_ref() {
            Some(printer) if printer.try_print(msg) => PrintResult::Sent,
            Some(_) => PrintResult::Dropped,
            None => PrintResult::NoPrinter,
        }
    }
}
