// Licensed under the Apache-2.0 license

//! Driver and console configuration.

use crate::i2c::common::WaitBudget;
use crate::radar::reading::TONE_DURATION;
use fugit::MillisDurationU32;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RadarConfig {
    /// How long a transfer may stay busy before it is abandoned.
    pub wait_budget: WaitBudget,
    /// Beep on every valid reading.
    pub beep: bool,
    pub tone_duration: MillisDurationU32,
}

impl Default for RadarConfig {
    fn default() -> Self {
        RadarConfigBuilder::new().build()
    }
}

pub struct RadarConfigBuilder {
    wait_budget: WaitBudget,
    beep: bool,
    tone_duration: Option<MillisDurationU32>,
}

impl Default for RadarConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RadarConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            wait_budget: WaitBudget::default(),
            beep: true,
            tone_duration: None,
        }
    }
    #[must_use]
    pub fn wait_budget(mut self, budget: WaitBudget) -> Self {
        self.wait_budget = budget;
        self
    }
    #[must_use]
    pub fn beep(mut self, enabled: bool) -> Self {
        self.beep = enabled;
        self
    }
    #[must_use]
    pub fn tone_duration(mut self, duration: MillisDurationU32) -> Self {
        self.tone_duration = Some(duration);
        self
    }
    #[must_use]
    pub fn build(self) -> RadarConfig {
        RadarConfig {
            wait_budget: self.wait_budget,
            beep: self.beep,
            tone_duration: self.tone_duration.unwrap_or(TONE_DURATION),
        }
    }
}
