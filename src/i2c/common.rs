// Licensed under the Apache-2.0 license

//! Common types for the sensor bus layer.
//!
//! This module provides the shared definitions for sensor ports, transfer
//! direction, completion status and the error taxonomy used across the
//! executor and the transport adapters.

use core::fmt;
use embedded_hal::i2c::ErrorKind;

/// Number of sensor ports on the brick.
pub const SENSOR_PORTS: u8 = 4;

/// Index of the sensor port a device is plugged into.
///
/// Each port has its own bus handle; a port is owned by a single caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SensorPort(u8);

impl SensorPort {
    pub const S1: Self = Self(0);
    pub const S2: Self = Self(1);
    pub const S3: Self = Self(2);
    pub const S4: Self = Self(3);

    /// Port for a zero-based index, `None` past the last port.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < SENSOR_PORTS {
            Some(Self(index))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

/// Direction of a single transfer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum TxnMode {
    Write,
    Read,
}

impl TxnMode {
    /// Marker used in diagnostic lines: `>` towards the sensor, `<` from it.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            TxnMode::Write => ">",
            TxnMode::Read => "<",
        }
    }
}

/// Completion status reported by a transport once it is no longer busy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TxnStatus {
    Success,
    /// Transfer ran but finished badly; the code is transport defined.
    Failed(u8),
}

/// Reasons a transport refuses to start a transfer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// No bus is configured for the requested port.
    UnknownPort,
    /// A transfer is already in flight on this port.
    NotReady,
    /// Empty buffer, or more bytes than the transport can move at once.
    InvalidLength,
    /// Transport-specific refusal.
    Other(u8),
}

impl SubmitError {
    /// Numeric code shown in diagnostics.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            SubmitError::UnknownPort => 1,
            SubmitError::NotReady => 2,
            SubmitError::InvalidLength => 3,
            SubmitError::Other(code) => code,
        }
    }
}

/// Failure of one transfer, tagged with its direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TxnError {
    /// The transport could not begin the transfer.
    Submission { mode: TxnMode, error: SubmitError },
    /// The transfer ran and completed with a bad status.
    Data { mode: TxnMode, code: u8 },
    /// The transport was still busy when the wait budget ran out.
    Timeout { mode: TxnMode },
}

impl TxnError {
    #[must_use]
    pub const fn mode(&self) -> TxnMode {
        match *self {
            TxnError::Submission { mode, .. }
            | TxnError::Data { mode, .. }
            | TxnError::Timeout { mode } => mode,
        }
    }

    /// Numeric code as reported by the transport; timeouts have none.
    #[must_use]
    pub const fn code(&self) -> Option<u8> {
        match *self {
            TxnError::Submission { error, .. } => Some(error.code()),
            TxnError::Data { code, .. } => Some(code),
            TxnError::Timeout { .. } => None,
        }
    }
}

impl fmt::Display for TxnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = self.mode().arrow();
        match *self {
            TxnError::Submission { error, .. } => {
                write!(f, "{arrow} TXN error ({}) !", error.code())
            }
            TxnError::Data { code, .. } => write!(f, "{arrow} DATA error ({code})"),
            TxnError::Timeout { .. } => write!(f, "{arrow} TXN timeout"),
        }
    }
}

impl embedded_hal::i2c::Error for TxnError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// How long the executor keeps polling a busy transport.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WaitBudget {
    /// Give up with [`TxnError::Timeout`] after this many busy polls.
    Polls(u32),
    /// Spin until the transport lets go. A stalled bus stalls the caller.
    Unbounded,
}

impl WaitBudget {
    /// Whether `spins` busy polls are still within the budget.
    #[must_use]
    pub const fn allows(self, spins: u32) -> bool {
        match self {
            WaitBudget::Polls(max) => spins < max,
            WaitBudget::Unbounded => true,
        }
    }
}

impl Default for WaitBudget {
    fn default() -> Self {
        WaitBudget::Polls(DEFAULT_WAIT_POLLS)
    }
}

/// Busy polls allowed by the default [`WaitBudget`].
pub const DEFAULT_WAIT_POLLS: u32 = 1_000_000;

/// Electrical state of the two bus lines, `true` meaning released (high).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LineState {
    pub sda: bool,
    pub scl: bool,
}
