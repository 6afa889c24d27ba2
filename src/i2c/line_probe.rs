// Licensed under the Apache-2.0 license

//! Bus line probe over plain input pins.
//!
//! Debug only. Sampling the lines while the transport is mid-transfer gives
//! a meaningless snapshot, so keep the probe and the radar on the same
//! thread and call it between transfers.

use crate::i2c::common::{LineState, SensorPort};
use crate::i2c::traits::I2cLineProbe;
use embedded_hal::digital::InputPin;

#[derive(Debug, PartialEq, Eq)]
pub enum ProbeError<E> {
    /// The probe is wired to a different port.
    UnknownPort,
    Pin(E),
}

/// Reads SDA and SCL of one port through two input pins.
pub struct PinProbe<SDA, SCL> {
    port: SensorPort,
    sda: SDA,
    scl: SCL,
}

impl<SDA, SCL> PinProbe<SDA, SCL>
where
    SDA: InputPin,
    SCL: InputPin<Error = SDA::Error>,
{
    pub fn new(port: SensorPort, sda: SDA, scl: SCL) -> Self {
        Self { port, sda, scl }
    }

    pub fn release(self) -> (SDA, SCL) {
        (self.sda, self.scl)
    }
}

impl<SDA, SCL> I2cLineProbe for PinProbe<SDA, SCL>
where
    SDA: InputPin,
    SCL: InputPin<Error = SDA::Error>,
{
    type Error = ProbeError<SDA::Error>;

    fn line_state(&mut self, port: SensorPort) -> Result<LineState, Self::Error> {
        if port != self.port {
            return Err(ProbeError::UnknownPort);
        }
        Ok(LineState {
            sda: self.sda.is_high().map_err(ProbeError::Pin)?,
            scl: self.scl.is_high().map_err(ProbeError::Pin)?,
        })
    }
}
