// Licensed under the Apache-2.0 license

//! Transaction executor.
//!
//! One call to [`TxnExecutor::execute`] is exactly one transfer attempt: the
//! descriptor is submitted, the transport is polled until it lets go (or the
//! wait budget runs out), and only then is the completion status sampled.
//! There are no retries here; a failed operation is re-issued by the caller
//! on its next poll cycle.
//!
//! ```text
//! Idle -> Submitted -> Error            (submission refused)
//!                   -> Busy -> Done     (status success)
//!                           -> Error    (status failed or budget exhausted)
//! ```

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{SensorPort, TxnError, TxnMode, TxnStatus, WaitBudget};
use crate::i2c::traits::I2cTransport;
use embedded_hal::i2c::SevenBitAddress;

/// Descriptor of one transfer, built right before submission and dropped
/// when the call returns.
#[derive(Debug)]
pub struct Transaction<'a> {
    pub address: SevenBitAddress,
    pub data: &'a mut [u8],
    pub mode: TxnMode,
    /// Continue the current bus session with a repeated start instead of
    /// releasing and re-acquiring the bus.
    pub restart: bool,
}

impl<'a> Transaction<'a> {
    pub fn new(
        address: SevenBitAddress,
        data: &'a mut [u8],
        mode: TxnMode,
        restart: bool,
    ) -> Self {
        Self {
            address,
            data,
            mode,
            restart,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Progress of the most recent transfer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TxnState {
    Idle,
    Submitted,
    Busy,
    Done,
    Error,
}

/// Drives single transfers through an [`I2cTransport`].
pub struct TxnExecutor<T: I2cTransport, L: Logger = NoOpLogger> {
    transport: T,
    logger: L,
    budget: WaitBudget,
    state: TxnState,
}

impl<T: I2cTransport> TxnExecutor<T, NoOpLogger> {
    pub fn new(transport: T) -> Self {
        Self::with_logger(transport, NoOpLogger, WaitBudget::default())
    }
}

impl<T: I2cTransport, L: Logger> TxnExecutor<T, L> {
    pub fn with_logger(transport: T, logger: L, budget: WaitBudget) -> Self {
        Self {
            transport,
            logger,
            budget,
            state: TxnState::Idle,
        }
    }

    /// State reached by the last call to [`execute`](Self::execute).
    #[must_use]
    pub fn state(&self) -> TxnState {
        self.state
    }

    #[must_use]
    pub fn budget(&self) -> WaitBudget {
        self.budget
    }

    pub fn set_budget(&mut self, budget: WaitBudget) {
        self.budget = budget;
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn logger_mut(&mut self) -> &mut L {
        &mut self.logger
    }

    /// Give back the transport and the logger.
    pub fn release(self) -> (T, L) {
        (self.transport, self.logger)
    }

    /// Run one transfer to completion.
    ///
    /// Failures are logged at error level with direction and code; the log
    /// is a side channel and the returned error is the authoritative result.
    ///
    /// # Errors
    ///
    /// - [`TxnError::Submission`] if the transport refused the transfer.
    /// - [`TxnError::Data`] if it completed with a failed status.
    /// - [`TxnError::Timeout`] if it was still busy when the budget ran out.
    pub fn execute(
        &mut self,
        port: SensorPort,
        address: SevenBitAddress,
        data: &mut [u8],
        mode: TxnMode,
        restart: bool,
    ) -> Result<(), TxnError> {
        let mut txn = Transaction::new(address, data, mode, restart);
        self.state = TxnState::Submitted;

        if let Err(error) = self.transport.start_transaction(port, &mut txn) {
            return Err(self.fail(TxnError::Submission { mode, error }));
        }

        self.state = TxnState::Busy;
        let mut spins: u32 = 0;
        loop {
            match self.poll_completion(port, &mut txn) {
                Ok(()) => {
                    self.state = TxnState::Done;
                    return Ok(());
                }
                Err(nb::Error::Other(err)) => return Err(self.fail(err)),
                Err(nb::Error::WouldBlock) => {
                    if !self.budget.allows(spins) {
                        return Err(self.fail(TxnError::Timeout { mode }));
                    }
                    spins = spins.saturating_add(1);
                    core::hint::spin_loop();
                }
            }
        }
    }

    fn poll_completion(
        &mut self,
        port: SensorPort,
        txn: &mut Transaction<'_>,
    ) -> nb::Result<(), TxnError> {
        if self.transport.is_busy(port, txn) {
            return Err(nb::Error::WouldBlock);
        }
        match self.transport.txn_status(port) {
            TxnStatus::Success => Ok(()),
            TxnStatus::Failed(code) => Err(nb::Error::Other(TxnError::Data {
                mode: txn.mode,
                code,
            })),
        }
    }

    fn fail(&mut self, err: TxnError) -> TxnError {
        self.state = TxnState::Error;
        self.logger.error(format_args!("{err}"));
        err
    }
}
