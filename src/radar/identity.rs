// Licensed under the Apache-2.0 license

//! Identification strings and the result of an identification probe.

use crate::i2c::common::TxnError;
use crate::radar::registers::IDENT_FIELD_LEN;
use heapless::Vec;
use zerocopy::{FromBytes, FromZeros, Immutable, IntoBytes, KnownLayout};

/// Transfers issued by one identification probe (select + read per field).
pub const PROBE_TXNS: usize = 6;

/// One NUL-terminated identification field.
pub type IdentField = [u8; IDENT_FIELD_LEN];

/// Text of a NUL-terminated field, up to the first NUL.
///
/// Bytes that are not valid UTF-8 end the text early.
#[must_use]
pub fn field_text(field: &[u8]) -> &str {
    let raw = field.split(|b| *b == 0).next().unwrap_or_default();
    match core::str::from_utf8(raw) {
        Ok(text) => text,
        Err(err) => raw
            .get(..err.valid_up_to())
            .and_then(|valid| core::str::from_utf8(valid).ok())
            .unwrap_or_default(),
    }
}

/// The three identification fields as read from the sensor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct IdentitySnapshot {
    pub product_id: IdentField,
    pub sensor_type: IdentField,
    pub version: IdentField,
}

impl Default for IdentitySnapshot {
    fn default() -> Self {
        Self::new_zeroed()
    }
}

impl IdentitySnapshot {
    /// All three fields start with a non-NUL byte.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.product_id, &self.sensor_type, &self.version]
            .iter()
            .all(|field| field.first().is_some_and(|b| *b != 0))
    }

    #[must_use]
    pub fn product_id(&self) -> &str {
        field_text(&self.product_id)
    }

    #[must_use]
    pub fn sensor_type(&self) -> &str {
        field_text(&self.sensor_type)
    }

    #[must_use]
    pub fn version(&self) -> &str {
        field_text(&self.version)
    }
}

/// Outcome of [`Radar::identify`](crate::radar::Radar::identify).
///
/// Presence is all or nothing: the sensor is found only if every field came
/// back non-empty. Transfer errors do not stop the probe; they are kept here
/// for the caller to show.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Probe {
    pub snapshot: IdentitySnapshot,
    pub errors: Vec<TxnError, PROBE_TXNS>,
}

impl Probe {
    #[must_use]
    pub fn found(&self) -> bool {
        self.snapshot.is_complete()
    }
}
