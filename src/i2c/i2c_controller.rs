// Licensed under the Apache-2.0 license

//! Split-phase transport over a blocking `embedded-hal` I2C bus.
//!
//! `embedded-hal` keeps the bus only for the duration of one call, so a
//! repeated start between two separate transfers cannot be expressed
//! directly. A single-byte write (a register select) is therefore held back
//! and fused with the next restart read into one `write_read`. Every other
//! transfer goes out as soon as it is started.

use crate::i2c::common::{SensorPort, SubmitError, TxnMode, TxnStatus};
use crate::i2c::traits::I2cTransport;
use crate::i2c::txn::Transaction;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c, SevenBitAddress};

/// Completion code for [`ErrorKind::Bus`].
pub const CODE_BUS: u8 = 1;
/// Completion code for [`ErrorKind::ArbitrationLoss`].
pub const CODE_ARBITRATION_LOSS: u8 = 2;
/// Completion code for [`ErrorKind::NoAcknowledge`].
pub const CODE_NO_ACKNOWLEDGE: u8 = 3;
/// Completion code for [`ErrorKind::Overrun`].
pub const CODE_OVERRUN: u8 = 4;
/// Completion code for any other bus failure.
pub const CODE_OTHER: u8 = 5;

#[must_use]
pub fn status_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Bus => CODE_BUS,
        ErrorKind::ArbitrationLoss => CODE_ARBITRATION_LOSS,
        ErrorKind::NoAcknowledge(_) => CODE_NO_ACKNOWLEDGE,
        ErrorKind::Overrun => CODE_OVERRUN,
        _ => CODE_OTHER,
    }
}

/// Register select waiting for its restart read.
#[derive(Copy, Clone, Debug)]
struct PendingSelect {
    address: SevenBitAddress,
    register: u8,
}

/// [`I2cTransport`] for one sensor port backed by an `embedded-hal` bus.
///
/// Transfers complete inside
/// [`start_transaction`](I2cTransport::start_transaction), so the port is
/// never reported busy.
pub struct I2cController<I2C: I2c> {
    bus: I2C,
    port: SensorPort,
    pending: Option<PendingSelect>,
    status: TxnStatus,
}

impl<I2C: I2c> I2cController<I2C> {
    pub fn new(bus: I2C, port: SensorPort) -> Self {
        Self {
            bus,
            port,
            pending: None,
            status: TxnStatus::Success,
        }
    }

    #[must_use]
    pub fn port(&self) -> SensorPort {
        self.port
    }

    /// Send a held-back register select on its own.
    ///
    /// # Errors
    ///
    /// Returns the bus error if the select write fails.
    pub fn flush(&mut self) -> Result<(), I2C::Error> {
        match self.pending.take() {
            Some(select) => self.bus.write(select.address, &[select.register]),
            None => Ok(()),
        }
    }

    /// Give the bus back, dropping any held-back select.
    pub fn release(self) -> I2C {
        self.bus
    }

    fn write(&mut self, txn: &mut Transaction<'_>) -> Result<(), I2C::Error> {
        self.flush()?;
        match &*txn.data {
            [register] => {
                self.pending = Some(PendingSelect {
                    address: txn.address,
                    register: *register,
                });
                Ok(())
            }
            bytes => self.bus.write(txn.address, bytes),
        }
    }

    fn read(&mut self, txn: &mut Transaction<'_>) -> Result<(), I2C::Error> {
        match self.pending.take() {
            Some(select) if txn.restart && select.address == txn.address => {
                self.bus
                    .write_read(select.address, &[select.register], txn.data)
            }
            Some(select) => {
                self.bus.write(select.address, &[select.register])?;
                self.bus.read(txn.address, txn.data)
            }
            None => self.bus.read(txn.address, txn.data),
        }
    }
}

impl<I2C: I2c> I2cTransport for I2cController<I2C> {
    fn start_transaction(
        &mut self,
        port: SensorPort,
        txn: &mut Transaction<'_>,
    ) -> Result<(), SubmitError> {
        if port != self.port {
            return Err(SubmitError::UnknownPort);
        }
        if txn.is_empty() {
            return Err(SubmitError::InvalidLength);
        }

        let result = match txn.mode {
            TxnMode::Write => self.write(txn),
            TxnMode::Read => self.read(txn),
        };
        self.status = match result {
            Ok(()) => TxnStatus::Success,
            Err(err) => TxnStatus::Failed(status_code(err.kind())),
        };
        Ok(())
    }

    fn is_busy(&mut self, _port: SensorPort, _txn: &mut Transaction<'_>) -> bool {
        false
    }

    fn txn_status(&mut self, _port: SensorPort) -> TxnStatus {
        self.status
    }
}
