// Licensed under the Apache-2.0 license

//! Values decoded from the live operation and calibration blocks.

use crate::sound::Tone;
use fugit::{HertzU32, MillisDurationU32};

/// Pitch for the closest possible echo.
pub const TONE_BASE_HZ: u32 = 8000;
/// Pitch drop per centimeter of distance.
pub const TONE_STEP_HZ: u32 = 30;
/// Default length of the feedback beep.
pub const TONE_DURATION: MillisDurationU32 = MillisDurationU32::millis(100);

/// Raw echo byte meaning "nothing in range".
pub const NO_ECHO: u8 = 0xff;
/// Raw echo byte meaning "no measurement yet".
pub const NO_SAMPLE: u8 = 0x00;

/// Classified content of an echo register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reading {
    /// Distance in centimeters, `1..=254`.
    Distance(u8),
    /// Sentinel byte; no valid measurement.
    NoReading,
}

impl Reading {
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            NO_SAMPLE | NO_ECHO => Reading::NoReading,
            cm => Reading::Distance(cm),
        }
    }

    #[must_use]
    pub const fn centimeters(self) -> Option<u8> {
        match self {
            Reading::Distance(cm) => Some(cm),
            Reading::NoReading => None,
        }
    }

    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Reading::Distance(_))
    }

    /// Feedback tone for this reading: `8000 - 30 * cm` Hz, from about
    /// 8 kHz up close down to 380 Hz at the far end. `None` when there is
    /// nothing to report.
    #[must_use]
    pub const fn tone(self, duration: MillisDurationU32) -> Option<Tone> {
        match self {
            Reading::Distance(cm) => Some(Tone {
                frequency: HertzU32::from_raw(TONE_BASE_HZ - cm as u32 * TONE_STEP_HZ),
                duration,
            }),
            Reading::NoReading => None,
        }
    }
}

/// Content of the operating mode register.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OperatingMode {
    Off,
    SingleShot,
    Continuous,
    EventCapture,
    WarmReset,
    /// Value this driver does not know; kept as read.
    Unknown(u8),
}

impl From<OperatingMode> for u8 {
    fn from(mode: OperatingMode) -> Self {
        match mode {
            OperatingMode::Off => 0x00,
            OperatingMode::SingleShot => 0x01,
            OperatingMode::Continuous => 0x02,
            OperatingMode::EventCapture => 0x03,
            OperatingMode::WarmReset => 0x04,
            OperatingMode::Unknown(value) => value,
        }
    }
}

impl From<u8> for OperatingMode {
    fn from(value: u8) -> Self {
        match value {
            0x00 => OperatingMode::Off,
            0x01 => OperatingMode::SingleShot,
            0x02 => OperatingMode::Continuous,
            0x03 => OperatingMode::EventCapture,
            0x04 => OperatingMode::WarmReset,
            other => OperatingMode::Unknown(other),
        }
    }
}

/// Zero offset and scale applied by the sensor to raw echo times.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Calibration {
    pub zero: u8,
    pub scale_factor: u8,
    pub scale_divisor: u8,
}

impl Calibration {
    /// Register layout: zero, scale factor, scale divisor.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        let [zero, scale_factor, scale_divisor] = bytes;
        Self {
            zero,
            scale_factor,
            scale_divisor,
        }
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.zero, self.scale_factor, self.scale_divisor]
    }
}
