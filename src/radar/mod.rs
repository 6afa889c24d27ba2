// Licensed under the Apache-2.0 license

//! Ultrasonic radar driver.
//!
//! Every register access is a register-select write followed by a read that
//! continues the same bus session with a repeated start. Both halves run
//! back to back through the executor, so nothing can slip in between as long
//! as the port has a single owner.
//!
//! # Examples
//!
//! ```rust,no_run
//! use nxt_radar::i2c::{I2cController, SensorPort};
//! use nxt_radar::radar::{Radar, Reading};
//!
//! # fn run<I2C: embedded_hal::i2c::I2c>(bus: I2C) {
//! let mut radar = Radar::new(I2cController::new(bus, SensorPort::S1), SensorPort::S1);
//!
//! if radar.identify().found() {
//!     loop {
//!         match radar.read_distance() {
//!             Ok(Reading::Distance(cm)) => { /* something `cm` away */ }
//!             Ok(Reading::NoReading) | Err(_) => { /* nothing this cycle */ }
//!         }
//!     }
//! }
//! # }
//! ```

pub mod config;
pub mod console;
pub mod identity;
pub mod reading;
pub mod registers;

pub use config::{RadarConfig, RadarConfigBuilder};
pub use console::RadarConsole;
pub use identity::{IdentField, IdentitySnapshot, Probe};
pub use reading::{Calibration, OperatingMode, Reading};
pub use registers::{Register, RegisterBlock};

use crate::common::{Logger, NoOpLogger};
use crate::i2c::common::{SensorPort, TxnError, TxnMode};
use crate::i2c::traits::I2cTransport;
use crate::i2c::txn::{TxnExecutor, TxnState};
use embedded_hal::i2c::SevenBitAddress;
use heapless::Vec;
use identity::PROBE_TXNS;
use registers::{ECHO_COUNT, IDENT_FIELD_LEN};

/// Bus address of the sensor (7-bit), fixed by the hardware.
pub const RADAR_I2C_ADDRESS: SevenBitAddress = 0x01;

/// Driver for one radar on one sensor port.
pub struct Radar<T: I2cTransport, L: Logger = NoOpLogger> {
    txn: TxnExecutor<T, L>,
    port: SensorPort,
}

impl<T: I2cTransport> Radar<T, NoOpLogger> {
    /// Bind a radar to `port` with the default configuration.
    pub fn new(transport: T, port: SensorPort) -> Self {
        Self::with_logger(transport, port, NoOpLogger, &RadarConfig::default())
    }
}

impl<T: I2cTransport, L: Logger> Radar<T, L> {
    pub fn with_logger(transport: T, port: SensorPort, logger: L, config: &RadarConfig) -> Self {
        Self {
            txn: TxnExecutor::with_logger(transport, logger, config.wait_budget),
            port,
        }
    }

    #[must_use]
    pub fn port(&self) -> SensorPort {
        self.port
    }

    /// Where the last transfer ended up.
    #[must_use]
    pub fn txn_state(&self) -> TxnState {
        self.txn.state()
    }

    /// Give back the transport and the logger.
    pub fn release(self) -> (T, L) {
        self.txn.release()
    }

    fn transfer(&mut self, data: &mut [u8], mode: TxnMode, restart: bool) -> Result<(), TxnError> {
        self.txn
            .execute(self.port, RADAR_I2C_ADDRESS, data, mode, restart)
    }

    fn select(&mut self, register: Register) -> Result<(), TxnError> {
        let mut cmd = [register.addr()];
        self.transfer(&mut cmd, TxnMode::Write, false)
    }

    /// Read `buf.len()` bytes starting at `register`.
    ///
    /// # Errors
    ///
    /// Returns the first failing transfer; the read is skipped if the
    /// select did not go through.
    pub fn read_register(&mut self, register: Register, buf: &mut [u8]) -> Result<(), TxnError> {
        self.select(register)?;
        self.transfer(buf, TxnMode::Read, true)
    }

    /// Write one byte to `register`.
    ///
    /// # Errors
    ///
    /// Returns the transfer error if the write fails.
    pub fn write_register(&mut self, register: Register, value: u8) -> Result<(), TxnError> {
        let mut cmd = [register.addr(), value];
        self.transfer(&mut cmd, TxnMode::Write, false)
    }

    /// Read product id, sensor type and version.
    ///
    /// All six transfers are attempted even if some fail; a field whose read
    /// failed stays zeroed and so makes the probe come back not found.
    pub fn identify(&mut self) -> Probe {
        let mut snapshot = IdentitySnapshot::default();
        let mut errors: Vec<TxnError, PROBE_TXNS> = Vec::new();

        for (register, field) in [
            (Register::ProductId, &mut snapshot.product_id),
            (Register::SensorType, &mut snapshot.sensor_type),
            (Register::Version, &mut snapshot.version),
        ] {
            if let Err(err) = self.select(register) {
                let _ = errors.push(err);
            }
            if let Err(err) = self.transfer(field, TxnMode::Read, true) {
                let _ = errors.push(err);
            }
        }

        let probe = Probe { snapshot, errors };
        let logger = self.txn.logger_mut();
        if probe.found() {
            logger.info(format_args!(
                "radar found: {} {} by {}",
                probe.snapshot.sensor_type(),
                probe.snapshot.version(),
                probe.snapshot.product_id()
            ));
        } else {
            logger.info(format_args!(
                "radar not found ({} transfer errors)",
                probe.errors.len()
            ));
        }
        probe
    }

    /// One measurement from the primary echo register R0.
    ///
    /// # Errors
    ///
    /// Returns the transfer error if either the select or the read fails.
    pub fn read_distance(&mut self) -> Result<Reading, TxnError> {
        let mut r0 = [0u8; 1];
        self.read_register(Register::R0, &mut r0)?;
        let [raw] = r0;
        Ok(Reading::from_raw(raw))
    }

    /// All eight echo registers in one burst, nearest echo first.
    ///
    /// # Errors
    ///
    /// Returns the transfer error if either the select or the read fails.
    pub fn read_echoes(&mut self) -> Result<[Reading; ECHO_COUNT], TxnError> {
        let mut raw = [0u8; ECHO_COUNT];
        self.read_register(Register::R0, &mut raw)?;
        Ok(raw.map(Reading::from_raw))
    }

    fn read_byte(&mut self, register: Register) -> Result<u8, TxnError> {
        let mut byte = [0u8; 1];
        self.read_register(register, &mut byte)?;
        let [value] = byte;
        Ok(value)
    }

    /// # Errors
    ///
    /// Returns the transfer error on bus failure.
    pub fn mode(&mut self) -> Result<OperatingMode, TxnError> {
        self.read_byte(Register::OpMode).map(OperatingMode::from)
    }

    /// # Errors
    ///
    /// Returns the transfer error on bus failure.
    pub fn set_mode(&mut self, mode: OperatingMode) -> Result<(), TxnError> {
        self.write_register(Register::OpMode, mode.into())
    }

    /// Sample interval used in continuous mode.
    ///
    /// # Errors
    ///
    /// Returns the transfer error on bus failure.
    pub fn interval(&mut self) -> Result<u8, TxnError> {
        self.read_byte(Register::Interval)
    }

    /// # Errors
    ///
    /// Returns the transfer error on bus failure.
    pub fn set_interval(&mut self, interval: u8) -> Result<(), TxnError> {
        self.write_register(Register::Interval, interval)
    }

    /// # Errors
    ///
    /// Returns the transfer error on bus failure.
    pub fn factory_calibration(&mut self) -> Result<Calibration, TxnError> {
        let mut bytes = [0u8; 3];
        self.read_register(Register::FactoryZero, &mut bytes)?;
        Ok(Calibration::from_bytes(bytes))
    }

    /// # Errors
    ///
    /// Returns the transfer error on bus failure.
    pub fn current_calibration(&mut self) -> Result<Calibration, TxnError> {
        let mut bytes = [0u8; 3];
        self.read_register(Register::CurrentZero, &mut bytes)?;
        Ok(Calibration::from_bytes(bytes))
    }

    /// Adjust the calibration the sensor uses from now on. Lost on power
    /// cycle.
    ///
    /// # Errors
    ///
    /// Returns the transfer error on bus failure.
    pub fn set_current_calibration(&mut self, calibration: Calibration) -> Result<(), TxnError> {
        let [zero, scale_factor, scale_divisor] = calibration.to_bytes();
        let mut cmd = [
            Register::CurrentZero.addr(),
            zero,
            scale_factor,
            scale_divisor,
        ];
        self.transfer(&mut cmd, TxnMode::Write, false)
    }

    /// Unit the distances are expressed in, e.g. `10E-2m`.
    ///
    /// # Errors
    ///
    /// Returns the transfer error on bus failure.
    pub fn measurement_units(&mut self) -> Result<IdentField, TxnError> {
        let mut units = [0u8; IDENT_FIELD_LEN];
        self.read_register(Register::MeasurementUnits, &mut units)?;
        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i2c::common::{SubmitError, WaitBudget};
    use crate::mock::{LoggedTxn, MockSensor, RecordingLogger};

    fn lego_sonar() -> MockSensor {
        let mut sensor = MockSensor::new();
        sensor.load(Register::ProductId, b"LEGO\0\0\0\0");
        sensor.load(Register::SensorType, b"Sonar\0\0\0");
        sensor.load(Register::Version, b"V1.0\0\0\0\0");
        sensor
    }

    #[test]
    fn test_identify_finds_lego_sonar() {
        let mut radar = Radar::new(lego_sonar(), SensorPort::S1);

        let probe = radar.identify();

        assert!(probe.found());
        assert!(probe.errors.is_empty());
        assert_eq!(probe.snapshot.product_id(), "LEGO");
        assert_eq!(probe.snapshot.sensor_type(), "Sonar");
        assert_eq!(probe.snapshot.version(), "V1.0");
    }

    #[test]
    fn test_identify_transfer_sequence() {
        let mut radar = Radar::new(lego_sonar(), SensorPort::S1);
        radar.identify();

        let (sensor, _) = radar.release();
        let expected: Vec<LoggedTxn, 6> = [
            LoggedTxn::write(&[0x08]),
            LoggedTxn::read(8),
            LoggedTxn::write(&[0x10]),
            LoggedTxn::read(8),
            LoggedTxn::write(&[0x00]),
            LoggedTxn::read(8),
        ]
        .into_iter()
        .collect();
        assert_eq!(sensor.log, expected.as_slice());
        assert!(sensor.log.iter().all(|t| t.address == RADAR_I2C_ADDRESS));
    }

    #[test]
    fn test_identify_empty_sensor_type_is_not_found() {
        let mut sensor = lego_sonar();
        sensor.load(Register::SensorType, &[0u8; 8]);
        let mut logger = RecordingLogger::default();
        let mut radar =
            Radar::with_logger(sensor, SensorPort::S1, &mut logger, &RadarConfig::default());

        let probe = radar.identify();

        assert!(!probe.found());
        assert_eq!(probe.snapshot.product_id(), "LEGO");
        drop(radar);
        assert_eq!(logger.infos, vec!["radar not found (0 transfer errors)".to_string()]);
    }

    #[test]
    fn test_identify_survives_refused_transfer() {
        let mut sensor = lego_sonar();
        // Third transfer is the sensor type select.
        sensor.refuse_call(2, SubmitError::NotReady);
        let mut radar = Radar::new(sensor, SensorPort::S1);

        let probe = radar.identify();

        assert_eq!(
            probe.errors.as_slice(),
            &[TxnError::Submission {
                mode: TxnMode::Write,
                error: SubmitError::NotReady
            }]
        );
        // The restart read still ran, from wherever the pointer was left.
        let (sensor, _) = radar.release();
        assert_eq!(sensor.start_calls, 6);
    }

    #[test]
    fn test_identify_failed_read_leaves_field_zeroed() {
        let mut sensor = lego_sonar();
        // Fourth transfer is the sensor type read.
        sensor.fail_call(3, 4);
        let mut radar = Radar::new(sensor, SensorPort::S1);

        let probe = radar.identify();

        assert!(!probe.found());
        assert_eq!(probe.snapshot.sensor_type, [0u8; 8]);
        assert_eq!(
            probe.errors.as_slice(),
            &[TxnError::Data {
                mode: TxnMode::Read,
                code: 4
            }]
        );
    }

    #[test]
    fn test_identify_stalled_bus_returns() {
        let mut sensor = lego_sonar();
        sensor.stalled = true;
        let config = RadarConfigBuilder::new()
            .wait_budget(WaitBudget::Polls(3))
            .build();
        let mut radar = Radar::with_logger(sensor, SensorPort::S1, NoOpLogger, &config);

        let probe = radar.identify();

        assert!(!probe.found());
        assert_eq!(probe.errors.len(), 6);
        assert_eq!(radar.txn_state(), TxnState::Error);
    }

    #[test]
    fn test_read_distance_classifies_r0() {
        let mut sensor = MockSensor::new();
        sensor.load(Register::R0, &[0x32]);
        let mut radar = Radar::new(sensor, SensorPort::S2);

        assert_eq!(radar.read_distance(), Ok(Reading::Distance(50)));
        assert_eq!(radar.txn_state(), TxnState::Done);

        let (sensor, _) = radar.release();
        assert_eq!(sensor.log, &[LoggedTxn::write(&[0x42]), LoggedTxn::read(1)]);
        assert!(!sensor.log[0].restart);
        assert!(sensor.log[1].restart);
    }

    #[test]
    fn test_read_distance_sentinels() {
        for raw in [0x00u8, 0xff] {
            let mut sensor = MockSensor::new();
            sensor.load(Register::R0, &[raw]);
            let mut radar = Radar::new(sensor, SensorPort::S1);
            assert_eq!(radar.read_distance(), Ok(Reading::NoReading));
        }
    }

    #[test]
    fn test_read_distance_error_skips_read() {
        let mut sensor = MockSensor::new();
        sensor.refuse_next(SubmitError::NotReady);
        let mut radar = Radar::new(sensor, SensorPort::S1);

        assert!(radar.read_distance().is_err());
        let (sensor, _) = radar.release();
        assert_eq!(sensor.start_calls, 1);
    }

    #[test]
    fn test_read_echoes_burst() {
        let mut sensor = MockSensor::new();
        sensor.load(Register::R0, &[0x14, 0x50, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
        let mut radar = Radar::new(sensor, SensorPort::S1);

        let echoes = radar.read_echoes().unwrap();

        assert_eq!(echoes[0], Reading::Distance(20));
        assert_eq!(echoes[1], Reading::Distance(80));
        assert!(echoes[2..].iter().all(|r| *r == Reading::NoReading));
    }

    #[test]
    fn test_mode_and_interval() {
        let mut radar = Radar::new(MockSensor::new(), SensorPort::S1);

        radar.set_mode(OperatingMode::SingleShot).unwrap();
        radar.set_interval(0x20).unwrap();

        assert_eq!(radar.mode(), Ok(OperatingMode::SingleShot));
        assert_eq!(radar.interval(), Ok(0x20));
        let (sensor, _) = radar.release();
        assert_eq!(sensor.registers[0x41], 0x01);
        assert_eq!(sensor.log[0].bytes, vec![0x41, 0x01]);
    }

    #[test]
    fn test_calibration_blocks() {
        let mut sensor = MockSensor::new();
        sensor.load(Register::FactoryZero, &[0x00, 0x01, 0x0e]);
        let mut radar = Radar::new(sensor, SensorPort::S1);

        let factory = radar.factory_calibration().unwrap();
        assert_eq!(factory, Calibration::from_bytes([0x00, 0x01, 0x0e]));

        let adjusted = Calibration {
            zero: 0x02,
            ..factory
        };
        radar.set_current_calibration(adjusted).unwrap();
        assert_eq!(radar.current_calibration(), Ok(adjusted));
        // Factory block untouched.
        assert_eq!(radar.factory_calibration(), Ok(factory));
    }

    #[test]
    fn test_measurement_units() {
        let mut sensor = MockSensor::new();
        sensor.load(Register::MeasurementUnits, b"10E-2m\0");
        let mut radar = Radar::new(sensor, SensorPort::S1);

        let units = radar.measurement_units().unwrap();
        assert_eq!(identity::field_text(&units), "10E-2m");
    }
}
