// Licensed under the Apache-2.0 license

//! Logging plumbing shared by the bus and device layers.
//!
//! Drivers are generic over a [`Logger`] and default to [`NoOpLogger`], so a
//! build that does not wire a console pays nothing for the log calls.

use core::fmt;

/// Sink for diagnostic records.
///
/// Records are a side channel: nothing in this crate inspects what a logger
/// did with them, and a logger must not fail the caller.
pub trait Logger {
    fn debug(&mut self, args: fmt::Arguments<'_>);
    fn info(&mut self, args: fmt::Arguments<'_>);
    fn error(&mut self, args: fmt::Arguments<'_>);
}

/// Logger that drops every record.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    fn debug(&mut self, _args: fmt::Arguments<'_>) {}
    fn info(&mut self, _args: fmt::Arguments<'_>) {}
    fn error(&mut self, _args: fmt::Arguments<'_>) {}
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn debug(&mut self, args: fmt::Arguments<'_>) {
        (**self).debug(args);
    }
    fn info(&mut self, args: fmt::Arguments<'_>) {
        (**self).info(args);
    }
    fn error(&mut self, args: fmt::Arguments<'_>) {
        (**self).error(args);
    }
}

/// Logger writing one `[LEVEL] message\r\n` line per record to a serial port.
///
/// Write errors are swallowed; a broken console must not take the bus down
/// with it.
pub struct UartLogger<W: embedded_io::Write> {
    port: W,
}

impl<W: embedded_io::Write> UartLogger<W> {
    pub fn new(port: W) -> Self {
        Self { port }
    }

    /// Give the underlying port back.
    pub fn release(self) -> W {
        self.port
    }

    fn line(&mut self, level: &str, args: fmt::Arguments<'_>) {
        let _ = write!(self.port, "[{level}] {args}\r\n");
    }
}

impl<W: embedded_io::Write> Logger for UartLogger<W> {
    fn debug(&mut self, args: fmt::Arguments<'_>) {
        self.line("DEBUG", args);
    }
    fn info(&mut self, args: fmt::Arguments<'_>) {
        self.line("INFO", args);
    }
    fn error(&mut self, args: fmt::Arguments<'_>) {
        self.line("ERROR", args);
    }
}
