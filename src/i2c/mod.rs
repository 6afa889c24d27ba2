// Licensed under the Apache-2.0 license

//! Sensor bus layer.
//!
//! This module provides the transfer descriptor and executor, the traits a
//! bus transport implements, and adapters that bridge `embedded-hal`
//! drivers and pins onto those traits.

pub mod capture_tap;
pub mod common;
pub mod i2c_controller;
pub mod line_probe;
pub mod traits;
pub mod txn;

pub use capture_tap::CaptureTap;
pub use common::{
    LineState, SensorPort, SubmitError, TxnError, TxnMode, TxnStatus, WaitBudget,
    DEFAULT_WAIT_POLLS, SENSOR_PORTS,
};
pub use i2c_controller::I2cController;
pub use line_probe::{PinProbe, ProbeError};
pub use traits::{I2cLineProbe, I2cTransport};
pub use txn::{Transaction, TxnExecutor, TxnState};
