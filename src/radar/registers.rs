// Licensed under the Apache-2.0 license

//! Register map of the ultrasonic sensor.
//!
//! ```text
//! 0x00..0x08  identification      version, product id     (8 bytes each)
//! 0x10..0x15  factory calibration sensor type, zero, scale factor,
//!                                 scale divisor, measurement units
//! 0x40..0x4a  live operation      interval, mode, R0..R7
//! 0x4a..0x4d  current calibration zero, scale factor, scale divisor
//! ```
//!
//! Every address the driver puts on the bus comes from [`Register`], so a
//! transfer can only target one of the four blocks.

/// Length of each textual identification field.
pub const IDENT_FIELD_LEN: usize = 8;

/// Number of echo registers (R0..R7).
pub const ECHO_COUNT: usize = 8;

/// Addressable locations inside the sensor.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Register {
    Version = 0x00,
    ProductId = 0x08,

    SensorType = 0x10,
    FactoryZero = 0x11,
    FactoryScaleFactor = 0x12,
    FactoryScaleDivisor = 0x13,
    MeasurementUnits = 0x14,

    Interval = 0x40,
    OpMode = 0x41,
    R0 = 0x42,
    R1 = 0x43,
    R2 = 0x44,
    R3 = 0x45,
    R4 = 0x46,
    R5 = 0x47,
    R6 = 0x48,
    R7 = 0x49,

    CurrentZero = 0x4a,
    CurrentScaleFactor = 0x4b,
    CurrentScaleDivisor = 0x4c,
}

/// The four fixed blocks of the register map.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegisterBlock {
    Identification,
    FactoryCalibration,
    Operation,
    CurrentCalibration,
}

const ECHOES: [Register; ECHO_COUNT] = [
    Register::R0,
    Register::R1,
    Register::R2,
    Register::R3,
    Register::R4,
    Register::R5,
    Register::R6,
    Register::R7,
];

impl Register {
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn block(self) -> RegisterBlock {
        match self {
            Register::Version | Register::ProductId => RegisterBlock::Identification,
            Register::SensorType
            | Register::FactoryZero
            | Register::FactoryScaleFactor
            | Register::FactoryScaleDivisor
            | Register::MeasurementUnits => RegisterBlock::FactoryCalibration,
            Register::Interval
            | Register::OpMode
            | Register::R0
            | Register::R1
            | Register::R2
            | Register::R3
            | Register::R4
            | Register::R5
            | Register::R6
            | Register::R7 => RegisterBlock::Operation,
            Register::CurrentZero
            | Register::CurrentScaleFactor
            | Register::CurrentScaleDivisor => RegisterBlock::CurrentCalibration,
        }
    }

    /// Echo register `Rn`, `None` for `n > 7`.
    #[must_use]
    pub fn echo(n: usize) -> Option<Self> {
        ECHOES.get(n).copied()
    }
}

impl From<Register> for u8 {
    fn from(r: Register) -> Self {
        r.addr()
    }
}
