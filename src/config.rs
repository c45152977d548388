//! Device configuration
//!
//! An optional TOML file describing how the Matrix 1000 is connected:
//!
//! ```toml
//! midi_channel = 3
//! detect_sleep_ms = 250
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::address::MidiChannel;
use crate::error::{Error, Result};

/// How long the device needs to answer an identity request. It is sluggish.
pub const DEFAULT_DETECT_SLEEP_MS: u64 = 200;

/// Connection settings for one Matrix 1000
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// MIDI channel the device listens on (1-16)
    pub midi_channel: u8,

    /// Delay before an identity request counts as unanswered
    pub detect_sleep_ms: u64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            midi_channel: 1,
            detect_sleep_ms: DEFAULT_DETECT_SLEEP_MS,
        }
    }
}

impl DeviceConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: DeviceConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::debug!("CONFIG: loaded '{}'", path.as_ref().display());
        Self::from_toml(&text)
    }

    /// Reject values the device cannot use
    pub fn validate(&self) -> Result<()> {
        if self.channel().is_none() {
            return Err(Error::Config(format!(
                "midi_channel must be 1-16, got {}",
                self.midi_channel
            )));
        }
        Ok(())
    }

    /// Configured channel, `None` if out of range
    pub fn channel(&self) -> Option<MidiChannel> {
        MidiChannel::from_one_based(self.midi_channel)
    }

    /// Identity request timeout
    pub fn detect_sleep(&self) -> Duration {
        Duration::from_millis(self.detect_sleep_ms)
    }
}
