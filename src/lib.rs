// Licensed under the Apache-2.0 license

// Panic-prone patterns are rejected outside of tests
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::indexing_slicing))]
#![cfg_attr(not(test), warn(clippy::expect_used))]
#![cfg_attr(not(test), no_std)]

//! Driver for the NXT digital ultrasonic ranging sensor ("radar").
//!
//! The sensor sits on a two-wire bus at address [`radar::RADAR_I2C_ADDRESS`]
//! and exposes a small register file: identification strings, factory and
//! current calibration, the operating mode and eight echo registers.
//!
//! The crate is split the same way the bus is:
//! - [`i2c`] holds the transfer types, the transport traits, the
//!   transaction executor and adapters over `embedded-hal`.
//! - [`radar`] sequences transactions into identification and ranging.
//! - [`capture`] keeps an explicitly owned diagnostic capture buffer and
//!   streams it to a host link.
//! - [`display`] and [`sound`] are the narrow collaborator interfaces used
//!   by [`radar::console`].

pub mod capture;
pub mod common;
pub mod display;
pub mod i2c;
pub mod radar;
pub mod sound;

#[cfg(test)]
pub(crate) mod mock;

pub use i2c::{I2cTransport, SensorPort, TxnError, TxnMode};
pub use radar::{Radar, Reading};
