// Licensed under the Apache-2.0 license

//! # Bus Transport Traits
//!
//! The transaction layer consumes the bus through two small traits kept
//! deliberately apart:
//!
//! ```text
//! I2cTransport  (data path: start, poll, status)
//! I2cLineProbe  (debug path: raw SDA/SCL levels)
//! ```
//!
//! The radar driver only ever holds an [`I2cTransport`]. Line probing reads
//! the pins behind the transport's back, so it lives on its own object that
//! the caller must not use while a transfer is in flight.

use crate::i2c::common::{LineState, SensorPort, SubmitError, TxnStatus};
use crate::i2c::txn::Transaction;

/// Split-phase transfer engine for one or more sensor ports.
///
/// A transfer is started with [`start_transaction`](Self::start_transaction),
/// polled with [`is_busy`](Self::is_busy) until it reports `false`, and only
/// then is [`txn_status`](Self::txn_status) meaningful.
///
/// The transport never keeps the caller's buffer. The in-flight descriptor is
/// handed back on every poll so an interrupt or byte-mode engine can move the
/// next bytes into (or out of) it.
///
/// # Examples
///
/// ```rust,no_run
/// use nxt_radar::i2c::{I2cTransport, SensorPort, Transaction, TxnMode, TxnStatus};
///
/// fn read_byte<T: I2cTransport>(bus: &mut T, port: SensorPort) -> Option<u8> {
///     let mut byte = [0u8; 1];
///     let mut txn = Transaction::new(0x01, &mut byte, TxnMode::Read, true);
///     bus.start_transaction(port, &mut txn).ok()?;
///     while bus.is_busy(port, &mut txn) {}
///     (bus.txn_status(port) == TxnStatus::Success).then_some(byte[0])
/// }
/// ```
pub trait I2cTransport {
    /// Begin a transfer described by `txn` on `port`.
    ///
    /// # Errors
    ///
    /// Returns a [`SubmitError`] when the transfer could not even begin; in
    /// that case nothing is in flight and the port stays idle.
    fn start_transaction(
        &mut self,
        port: SensorPort,
        txn: &mut Transaction<'_>,
    ) -> Result<(), SubmitError>;

    /// Advance the in-flight transfer and report whether it is still running.
    fn is_busy(&mut self, port: SensorPort, txn: &mut Transaction<'_>) -> bool;

    /// Outcome of the last transfer on `port`.
    ///
    /// Only valid once [`is_busy`](Self::is_busy) has returned `false`.
    fn txn_status(&mut self, port: SensorPort) -> TxnStatus;
}

/// Raw electrical view of a port's bus lines, for debugging wiring.
pub trait I2cLineProbe {
    type Error: core::fmt::Debug;

    /// Sample SDA and SCL on `port`.
    ///
    /// # Errors
    ///
    /// Returns the pin driver's error if a line cannot be sampled.
    fn line_state(&mut self, port: SensorPort) -> Result<LineState, Self::Error>;
}
