// Licensed under the Apache-2.0 license

//! Std-backed test doubles shared by the unit tests.

use crate::common::Logger;
use crate::display::TextRenderer;
use crate::i2c::common::{SensorPort, SubmitError, TxnMode, TxnStatus};
use crate::i2c::traits::I2cTransport;
use crate::i2c::txn::Transaction;
use crate::radar::registers::Register;
use crate::radar::RADAR_I2C_ADDRESS;
use crate::sound::ToneGenerator;
use core::fmt;
use fugit::{HertzU32, MillisDurationU32};
use std::collections::HashMap;

/// A transfer as seen by [`MockSensor`]; reads keep only their length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggedTxn {
    pub address: u8,
    pub mode: TxnMode,
    pub restart: bool,
    pub len: usize,
    pub bytes: Vec<u8>,
}

impl LoggedTxn {
    /// Select or register write, sent without restart.
    pub fn write(bytes: &[u8]) -> Self {
        Self {
            address: RADAR_I2C_ADDRESS,
            mode: TxnMode::Write,
            restart: false,
            len: bytes.len(),
            bytes: bytes.to_vec(),
        }
    }

    /// Read continuing the session with a repeated start.
    pub fn read(len: usize) -> Self {
        Self {
            address: RADAR_I2C_ADDRESS,
            mode: TxnMode::Read,
            restart: true,
            len,
            bytes: Vec::new(),
        }
    }
}

/// Simulated radar: a 256-byte register file behind a split-phase
/// transport with scriptable refusals, failures and busy time.
pub struct MockSensor {
    pub registers: [u8; 256],
    pointer: u8,
    /// Busy polls reported before each transfer completes.
    pub busy_polls: u32,
    busy_left: u32,
    /// Never complete anything.
    pub stalled: bool,
    in_flight: bool,
    failing: bool,
    refusals: HashMap<usize, SubmitError>,
    failures: HashMap<usize, u8>,
    status: TxnStatus,
    pub log: Vec<LoggedTxn>,
    pub start_calls: usize,
    pub busy_reads: usize,
    pub status_reads: usize,
}

impl MockSensor {
    pub fn new() -> Self {
        Self {
            registers: [0; 256],
            pointer: 0,
            busy_polls: 0,
            busy_left: 0,
            stalled: false,
            in_flight: false,
            failing: false,
            refusals: HashMap::new(),
            failures: HashMap::new(),
            status: TxnStatus::Success,
            log: Vec::new(),
            start_calls: 0,
            busy_reads: 0,
            status_reads: 0,
        }
    }

    pub fn load(&mut self, register: Register, bytes: &[u8]) {
        let start = usize::from(register.addr());
        self.registers[start..start + bytes.len()].copy_from_slice(bytes);
    }

    /// Refuse the `n`th `start_transaction` call (zero based).
    pub fn refuse_call(&mut self, n: usize, error: SubmitError) {
        self.refusals.insert(n, error);
    }

    pub fn refuse_next(&mut self, error: SubmitError) {
        self.refuse_call(self.start_calls, error);
    }

    /// Complete the `n`th call with `Failed(code)` and move no data.
    pub fn fail_call(&mut self, n: usize, code: u8) {
        self.failures.insert(n, code);
    }

    pub fn fail_next_status(&mut self, code: u8) {
        self.fail_call(self.start_calls, code);
    }

    fn complete(&mut self, txn: &mut Transaction<'_>) {
        if self.failing {
            return;
        }
        match txn.mode {
            TxnMode::Write => {
                if let Some((&register, values)) = txn.data.split_first() {
                    self.pointer = register;
                    for (offset, value) in values.iter().enumerate() {
                        let at = self.pointer.wrapping_add(offset as u8);
                        self.registers[usize::from(at)] = *value;
                    }
                }
            }
            TxnMode::Read => {
                for (offset, byte) in txn.data.iter_mut().enumerate() {
                    let at = self.pointer.wrapping_add(offset as u8);
                    *byte = self.registers[usize::from(at)];
                }
            }
        }
    }
}

impl I2cTransport for MockSensor {
    fn start_transaction(
        &mut self,
        port: SensorPort,
        txn: &mut Transaction<'_>,
    ) -> Result<(), SubmitError> {
        let call = self.start_calls;
        self.start_calls += 1;
        let _ = port;
        if let Some(error) = self.refusals.get(&call) {
            return Err(*error);
        }

        self.log.push(LoggedTxn {
            address: txn.address,
            mode: txn.mode,
            restart: txn.restart,
            len: txn.len(),
            bytes: match txn.mode {
                TxnMode::Write => txn.data.to_vec(),
                TxnMode::Read => Vec::new(),
            },
        });
        self.failing = self.failures.contains_key(&call);
        self.status = match self.failures.get(&call) {
            Some(code) => TxnStatus::Failed(*code),
            None => TxnStatus::Success,
        };
        self.busy_left = self.busy_polls;
        self.in_flight = true;
        Ok(())
    }

    fn is_busy(&mut self, _port: SensorPort, txn: &mut Transaction<'_>) -> bool {
        self.busy_reads += 1;
        if self.stalled {
            return true;
        }
        if self.busy_left > 0 {
            self.busy_left -= 1;
            return true;
        }
        if self.in_flight {
            self.in_flight = false;
            self.complete(txn);
        }
        false
    }

    fn txn_status(&mut self, _port: SensorPort) -> TxnStatus {
        self.status_reads += 1;
        assert!(
            !self.stalled && self.busy_left == 0 && !self.in_flight,
            "status sampled while the transfer was still busy"
        );
        self.status
    }
}

#[derive(Default)]
pub struct RecordingLogger {
    pub debugs: Vec<String>,
    pub infos: Vec<String>,
    pub errors: Vec<String>,
}

impl Logger for RecordingLogger {
    fn debug(&mut self, args: fmt::Arguments<'_>) {
        self.debugs.push(args.to_string());
    }
    fn info(&mut self, args: fmt::Arguments<'_>) {
        self.infos.push(args.to_string());
    }
    fn error(&mut self, args: fmt::Arguments<'_>) {
        self.errors.push(args.to_string());
    }
}

/// Renderer that keeps what a screen would show as plain text.
#[derive(Default)]
pub struct Screen {
    pub text: String,
    pub clears: usize,
    pub cursor: Option<(u8, u8)>,
}

impl TextRenderer for Screen {
    fn clear(&mut self) {
        self.clears += 1;
        self.text.clear();
    }
    fn set_cursor(&mut self, x: u8, y: u8) {
        self.cursor = Some((x, y));
    }
    fn write_string(&mut self, s: &str) {
        self.text.push_str(s);
    }
    fn write_uint(&mut self, n: u32) {
        self.text.push_str(&n.to_string());
    }
    fn end_line(&mut self) {
        self.text.push('\n');
    }
}

#[derive(Default)]
pub struct Speaker {
    pub tones: Vec<(u32, u32)>,
}

impl ToneGenerator for Speaker {
    fn play_async(&mut self, frequency: HertzU32, duration: MillisDurationU32) {
        self.tones.push((frequency.raw(), duration.ticks()));
    }
}

#[derive(Debug)]
pub struct LinkDown;

impl embedded_io::Error for LinkDown {
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::NotConnected
    }
}

/// Host link collecting everything sent, or refusing every write.
#[derive(Default)]
pub struct HostLink {
    pub bytes: Vec<u8>,
    pub flushes: usize,
    down: bool,
}

impl HostLink {
    pub fn failing() -> Self {
        Self {
            down: true,
            ..Self::default()
        }
    }
}

impl embedded_io::ErrorType for HostLink {
    type Error = LinkDown;
}

impl embedded_io::Write for HostLink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if self.down {
            return Err(LinkDown);
        }
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.down {
            return Err(LinkDown);
        }
        self.flushes += 1;
        Ok(())
    }
}
