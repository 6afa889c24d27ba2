// Licensed under the Apache-2.0 license

//! Diagnostic capture buffer and its host egress.
//!
//! Whoever turns recording on owns the [`CaptureSession`]; there is no
//! global buffer. The session is handed to [`CaptureSession::dump`] (or
//! to the console) when it is time to ship the bytes to the host.
//!
//! Wire format of a dump:
//!
//! ```text
//! +----------------+---------------------+
//! | length: u32 LE | length payload bytes |
//! +----------------+---------------------+
//! ```

use heapless::Vec;
use zerocopy::byteorder::little_endian::U32;
use zerocopy::{Immutable, IntoBytes, KnownLayout};

/// Capacity of a session when none is given.
pub const DEFAULT_CAPTURE_SIZE: usize = 1024;

#[derive(IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
struct DumpHeader {
    length: U32,
}

/// Fixed-capacity byte recorder with an explicit on/off switch.
pub struct CaptureSession<const N: usize = DEFAULT_CAPTURE_SIZE> {
    buffer: Vec<u8, N>,
    recording: bool,
}

impl<const N: usize> Default for CaptureSession<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> CaptureSession<N> {
    /// Empty session, not recording.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            recording: false,
        }
    }

    pub fn start(&mut self) {
        self.recording = true;
    }

    pub fn stop(&mut self) {
        self.recording = false;
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Append as much of `bytes` as fits; returns how many were kept.
    ///
    /// Nothing is kept while recording is off.
    pub fn record(&mut self, bytes: &[u8]) -> usize {
        if !self.recording {
            return 0;
        }
        let room = N - self.buffer.len();
        let kept = bytes.len().min(room);
        let accepted = bytes.get(..kept).unwrap_or_default();
        // `kept` never exceeds the free capacity.
        let _ = self.buffer.extend_from_slice(accepted);
        kept
    }

    /// Append a header and its payload only if both fit whole.
    pub fn record_frame(&mut self, header: &[u8], payload: &[u8]) -> bool {
        if !self.recording || header.len() + payload.len() > self.remaining() {
            return false;
        }
        self.record(header);
        self.record(payload);
        true
    }

    /// Bytes captured so far; also the length prefix of the next dump.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        N - self.buffer.len()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Send the length prefix, then the captured bytes, waiting for the link
    /// to drain after each send.
    ///
    /// Returns the total number of bytes put on the link.
    ///
    /// # Errors
    ///
    /// Returns the link's error from the first failed write or flush.
    pub fn dump<W: embedded_io::Write>(&self, link: &mut W) -> Result<usize, W::Error> {
        let payload = self.as_slice();
        let header = DumpHeader {
            length: U32::new(u32::try_from(payload.len()).unwrap_or(u32::MAX)),
        };

        link.write_all(header.as_bytes())?;
        link.flush()?;
        link.write_all(payload)?;
        link.flush()?;

        Ok(header.as_bytes().len() + payload.len())
    }
}
