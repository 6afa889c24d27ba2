// Licensed under the Apache-2.0 license

//! Audio feedback consumed by the radar console.

use fugit::{HertzU32, MillisDurationU32};

/// A tone request: pitch and how long to hold it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tone {
    pub frequency: HertzU32,
    pub duration: MillisDurationU32,
}

/// Fire-and-forget tone output.
pub trait ToneGenerator {
    /// Start playing and return immediately; a new tone replaces the old one.
    fn play_async(&mut self, frequency: HertzU32, duration: MillisDurationU32);

    fn play(&mut self, tone: Tone) {
        self.play_async(tone.frequency, tone.duration);
    }
}

impl<S: ToneGenerator + ?Sized> ToneGenerator for &mut S {
    fn play_async(&mut self, frequency: HertzU32, duration: MillisDurationU32) {
        (**self).play_async(frequency, duration);
    }
}
