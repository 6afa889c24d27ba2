// Licensed under the Apache-2.0 license

//! On-brick screens for the radar: identification, live ranging, capture
//! dump and the bus-line debug readout.
//!
//! The driver only returns values; everything the user sees or hears is
//! decided here.

use crate::capture::CaptureSession;
use crate::common::Logger;
use crate::display::TextRenderer;
use crate::i2c::common::{LineState, SensorPort, TxnError};
use crate::i2c::traits::{I2cLineProbe, I2cTransport};
use crate::radar::config::RadarConfig;
use crate::radar::reading::Reading;
use crate::radar::Radar;
use crate::sound::ToneGenerator;

pub struct RadarConsole<R: TextRenderer, S: ToneGenerator> {
    renderer: R,
    speaker: S,
    config: RadarConfig,
}

impl<R: TextRenderer, S: ToneGenerator> RadarConsole<R, S> {
    pub fn new(renderer: R, speaker: S, config: RadarConfig) -> Self {
        Self {
            renderer,
            speaker,
            config,
        }
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn release(self) -> (R, S) {
        (self.renderer, self.speaker)
    }

    fn title(&mut self, text: &str) {
        self.renderer.clear();
        self.renderer.set_cursor(0, 0);
        self.renderer.write_string(text);
    }

    /// Search for the sensor and show what answered.
    ///
    /// Returns whether the radar was found; the caller may simply ask again.
    pub fn info<T: I2cTransport, L: Logger>(&mut self, radar: &mut Radar<T, L>) -> bool {
        self.title("Searching radar...\n");

        let probe = radar.identify();
        for err in &probe.errors {
            self.report(err);
        }

        if probe.found() {
            self.renderer.write_string("Found!\n\n");

            self.renderer.write_string(probe.snapshot.sensor_type());
            self.renderer.write_string(" ");
            self.renderer.write_string(probe.snapshot.version());
            self.renderer.end_line();

            self.renderer.write_string("    by ");
            self.renderer.write_string(probe.snapshot.product_id());
            self.renderer.end_line();
            return true;
        }

        self.renderer.write_string("Error!\n");
        self.renderer.write_string("(OK to try again)\n");
        false
    }

    /// Take one reading from R0, show it and beep its distance.
    ///
    /// A failed transfer shows its diagnostic line and counts as no reading.
    /// Call this from the application's poll loop; stopping the loop is up
    /// to the caller.
    pub fn measure<T: I2cTransport, L: Logger>(&mut self, radar: &mut Radar<T, L>) -> Reading {
        self.title("Reading R0...\n");
        self.renderer.write_string("(cancel to halt)\n\n");

        let reading = match radar.read_distance() {
            Ok(reading) => reading,
            Err(err) => {
                self.report(&err);
                Reading::NoReading
            }
        };

        self.renderer.write_string(">> ");
        match reading {
            Reading::Distance(cm) => {
                self.renderer.write_uint(u32::from(cm));
                self.renderer.write_string(" cm\n");
                if self.config.beep {
                    if let Some(tone) = reading.tone(self.config.tone_duration) {
                        self.speaker.play(tone);
                    }
                }
            }
            Reading::NoReading => self.renderer.write_string("n/a\n"),
        }
        reading
    }

    /// One diagnostic line for a failed transfer.
    pub fn report(&mut self, err: &TxnError) {
        self.renderer.write_string(err.mode().arrow());
        self.renderer.write_string(" ");
        match *err {
            TxnError::Submission { error, .. } => {
                self.renderer.write_string("TXN error (");
                self.renderer.write_uint(u32::from(error.code()));
                self.renderer.write_string(") !\n");
            }
            TxnError::Data { code, .. } => {
                self.renderer.write_string("DATA error (");
                self.renderer.write_uint(u32::from(code));
                self.renderer.write_string(")\n");
            }
            TxnError::Timeout { .. } => self.renderer.write_string("TXN timeout\n"),
        }
    }

    /// Ship a capture session to the host.
    ///
    /// # Errors
    ///
    /// Returns the link error; the screen then shows `failed.`.
    pub fn dump<W: embedded_io::Write, const N: usize>(
        &mut self,
        capture: &CaptureSession<N>,
        link: &mut W,
    ) -> Result<usize, W::Error> {
        self.renderer.write_string("dumping... ");
        let sent = capture.dump(link);
        self.renderer
            .write_string(if sent.is_ok() { "done.\n" } else { "failed.\n" });
        sent
    }

    /// Show the raw SDA/SCL levels of `port` as `[sda/scl]`.
    ///
    /// # Errors
    ///
    /// Returns the probe error; nothing is drawn in that case.
    pub fn lines<P: I2cLineProbe>(
        &mut self,
        probe: &mut P,
        port: SensorPort,
    ) -> Result<LineState, P::Error> {
        let state = probe.line_state(port)?;
        self.renderer.write_string("[");
        self.renderer.write_uint(u32::from(state.sda));
        self.renderer.write_string("/");
        self.renderer.write_uint(u32::from(state.scl));
        self.renderer.write_string("]\n");
        Ok(state)
    }
}
