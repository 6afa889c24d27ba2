// Licensed under the Apache-2.0 license

//! Transport decorator that records every transfer into a capture session.
//!
//! Each transfer becomes one frame:
//!
//! ```text
//! +-------+-----+-----------+
//! | flags | len | data[len] |
//! +-------+-----+-----------+
//! ```
//!
//! Writes are recorded with the bytes sent, reads with the bytes received.
//! A refused transfer is recorded with [`FRAME_REFUSED`] set and no data.

use crate::capture::{CaptureSession, DEFAULT_CAPTURE_SIZE};
use crate::i2c::common::{SensorPort, SubmitError, TxnMode, TxnStatus};
use crate::i2c::traits::I2cTransport;
use crate::i2c::txn::Transaction;

/// Frame flag: the transfer was a read.
pub const FRAME_READ: u8 = 1 << 0;
/// Frame flag: the transfer continued the session with a repeated start.
pub const FRAME_RESTART: u8 = 1 << 1;
/// Frame flag: the transport refused to start the transfer.
pub const FRAME_REFUSED: u8 = 1 << 7;

fn frame_flags(txn: &Transaction<'_>) -> u8 {
    let mut flags = 0;
    if txn.mode == TxnMode::Read {
        flags |= FRAME_READ;
    }
    if txn.restart {
        flags |= FRAME_RESTART;
    }
    flags
}

/// Wraps a transport and owns the session it records into.
pub struct CaptureTap<T: I2cTransport, const N: usize = DEFAULT_CAPTURE_SIZE> {
    inner: T,
    session: CaptureSession<N>,
    in_flight: bool,
}

impl<T: I2cTransport, const N: usize> CaptureTap<T, N> {
    /// Tap `inner`; recording starts immediately.
    pub fn new(inner: T) -> Self {
        let mut session = CaptureSession::new();
        session.start();
        Self {
            inner,
            session,
            in_flight: false,
        }
    }

    pub fn session(&self) -> &CaptureSession<N> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut CaptureSession<N> {
        &mut self.session
    }

    /// Split into the wrapped transport and the recorded session.
    pub fn into_parts(self) -> (T, CaptureSession<N>) {
        (self.inner, self.session)
    }

    fn record(&mut self, flags: u8, data: &[u8]) {
        let len = u8::try_from(data.len()).unwrap_or(u8::MAX);
        let data = data.get(..usize::from(len)).unwrap_or_default();
        self.session.record_frame(&[flags, len], data);
    }
}

impl<T: I2cTransport, const N: usize> I2cTransport for CaptureTap<T, N> {
    fn start_transaction(
        &mut self,
        port: SensorPort,
        txn: &mut Transaction<'_>,
    ) -> Result<(), SubmitError> {
        match self.inner.start_transaction(port, txn) {
            Ok(()) => {
                self.in_flight = true;
                Ok(())
            }
            Err(err) => {
                self.record(frame_flags(txn) | FRAME_REFUSED, &[]);
                Err(err)
            }
        }
    }

    fn is_busy(&mut self, port: SensorPort, txn: &mut Transaction<'_>) -> bool {
        let busy = self.inner.is_busy(port, txn);
        if !busy && self.in_flight {
            self.in_flight = false;
            self.record(frame_flags(txn), txn.data);
        }
        busy
    }

    fn txn_status(&mut self, port: SensorPort) -> TxnStatus {
        self.inner.txn_status(port)
    }
}
