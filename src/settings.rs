//! Matrix 1000 master parameters ("global settings")
//!
//! The device sends its master parameters as one nibble-packed block that
//! unpacks to exactly 172 bytes. The table below maps block offsets to typed
//! settings. The per-patch "group enabled" bit array is not part of it.

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::message::{is_global_settings_dump, DUMP_HEADER_SIZE};
use crate::sysex::{unescape_sysex, SysexMessage};

/// Unpacked size of the master parameter block
pub const SETTINGS_BLOCK_SIZE: usize = 172;

/// How a setting's value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// On/off
    Bool,
    /// Plain number
    Integer,
    /// Number with a label per value
    Lookup(&'static [(i32, &'static str)]),
}

/// One entry of the settings table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalSettingDefinition {
    /// Offset into the unpacked block
    pub sysex_index: usize,
    /// Display name
    pub name: &'static str,
    /// Group shown in editors
    pub category: &'static str,
    /// Value kind
    pub value_type: ValueType,
    /// Smallest legal display value
    pub min: i32,
    /// Largest legal display value
    pub max: i32,
    /// Stored as a signed byte
    pub twos_complement: bool,
    /// Added to the raw byte before display
    pub display_offset: i32,
}

impl GlobalSettingDefinition {
    const fn int(sysex_index: usize, name: &'static str, category: &'static str, min: i32, max: i32) -> Self {
        Self {
            sysex_index,
            name,
            category,
            value_type: ValueType::Integer,
            min,
            max,
            twos_complement: false,
            display_offset: 0,
        }
    }

    const fn flag(sysex_index: usize, name: &'static str, category: &'static str) -> Self {
        Self {
            value_type: ValueType::Bool,
            ..Self::int(sysex_index, name, category, 0, 1)
        }
    }

    const fn lookup(
        sysex_index: usize,
        name: &'static str,
        category: &'static str,
        max: i32,
        labels: &'static [(i32, &'static str)],
    ) -> Self {
        Self {
            value_type: ValueType::Lookup(labels),
            ..Self::int(sysex_index, name, category, 0, max)
        }
    }

    const fn signed(self) -> Self {
        Self {
            twos_complement: true,
            ..self
        }
    }

    const fn offset(self, display_offset: i32) -> Self {
        Self {
            display_offset,
            ..self
        }
    }

    /// Decode this setting from an unpacked block of [`SETTINGS_BLOCK_SIZE`] bytes
    pub(crate) fn decode(&self, block: &[u8]) -> i32 {
        let mut value = block[self.sysex_index] as i32 + self.display_offset;
        // Only master transpose and master tune are stored signed
        if self.twos_complement && value > 127 {
            value = value as u8 as i8 as i32;
        }
        value
    }

    /// True if `value` is inside the declared range
    pub fn in_range(&self, value: i32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Render a value for display, using the label table for lookups
    pub fn format_value(&self, value: i32) -> String {
        match self.value_type {
            ValueType::Bool => (if value != 0 { "On" } else { "Off" }).to_string(),
            ValueType::Integer => value.to_string(),
            ValueType::Lookup(labels) => labels
                .iter()
                .find(|(v, _)| *v == value)
                .map(|(_, label)| label.to_string())
                .unwrap_or_else(|| value.to_string()),
        }
    }
}

type Def = GlobalSettingDefinition;

const MOD_SOURCES: &[(i32, &str)] = &[(0, "Off"), (1, "Lever 2"), (2, "Pedal 1")];

/// Master parameter table, in display order
pub static GLOBAL_SETTINGS: &[GlobalSettingDefinition] = &[
    Def::int(34, "Master Transpose", "Tuning", -24, 24).signed(),
    Def::int(8, "Master Tune", "Tuning", -32, 32).signed(),
    Def::int(11, "MIDI Basic Channel", "MIDI", 1, 16).offset(1),
    Def::flag(12, "MIDI OMNI Mode Enable", "MIDI"),
    Def::flag(13, "MIDI Controllers enable", "MIDI"),
    Def::flag(14, "MIDI Patch Changes Enable", "MIDI"),
    Def::int(17, "MIDI Pedal 1 Controller", "MIDI", 0, 121),
    Def::int(18, "MIDI Pedal 2 Controller", "MIDI", 0, 121),
    Def::int(19, "MIDI Pedal 3 Controller", "MIDI", 0, 121),
    Def::int(20, "MIDI Pedal 4 Controller", "MIDI", 0, 121),
    Def::flag(32, "MIDI Echo Enable", "MIDI"),
    Def::int(35, "MIDI Mono Mode (Guitar)", "MIDI", 0, 9),
    Def::flag(165, "Bank Lock Enable", "MIDI"),
    Def::lookup(
        4,
        "Vibrato Waveform",
        "Global Vibrato",
        7,
        &[
            (0, "Triangle"),
            (1, "Saw up"),
            (2, "Saw Down"),
            (3, "Square"),
            (4, "Random"),
            (5, "Noise"),
        ],
    ),
    Def::int(1, "Vibrato Speed", "Global Vibrato", 0, 63),
    Def::int(5, "Vibrato Amplitude", "Global Vibrato", 0, 63),
    Def::lookup(2, "Vibrato Speed Mod Source", "Global Vibrato", 2, MOD_SOURCES),
    Def::int(3, "Vibrato Speed Mod Amount", "Global Vibrato", 0, 63),
    Def::lookup(6, "Vibrato Amp Mod Source", "Global Vibrato", 2, MOD_SOURCES),
    Def::int(7, "Vibrato Amp Mod Amount", "Global Vibrato", 0, 63),
    Def::int(164, "Bend Range", "Controls", 1, 24),
    Def::int(166, "Number of Units", "Group Mode", 1, 6),
    Def::int(167, "Current Unit Number", "Group Mode", 0, 7),
    Def::flag(168, "Group Mode Enable", "Group Mode"),
    Def::flag(169, "Unison Enable", "General"),
    Def::flag(170, "Volume Invert Enable", "General"),
    Def::flag(171, "Memory Protect Enable", "General"),
];

/// Decoded master parameters, one value per [`GLOBAL_SETTINGS`] entry.
///
/// A snapshot is only ever built from a complete block; it is replaced as a
/// whole, never updated field by field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalSettings {
    values: Vec<i32>,
}

impl GlobalSettings {
    /// Decode an unpacked block, which must be exactly 172 bytes
    pub fn from_block(block: &[u8]) -> Result<Self> {
        if block.len() != SETTINGS_BLOCK_SIZE {
            log::warn!(
                "SETTINGS: ignoring global settings, unpacked block is {} bytes instead of {}",
                block.len(),
                SETTINGS_BLOCK_SIZE
            );
            return Err(Error::SettingsSize {
                expected: SETTINGS_BLOCK_SIZE,
                actual: block.len(),
            });
        }

        let values = GLOBAL_SETTINGS
            .iter()
            .map(|def| {
                let value = def.decode(block);
                if !def.in_range(value) {
                    log::debug!("SETTINGS: {} = {} is outside {}..={}", def.name, value, def.min, def.max);
                }
                value
            })
            .collect();

        Ok(Self { values })
    }

    /// Decode the nibble-packed data of a master parameter dump
    pub fn from_sysex_data(nibbles: &[u8]) -> Result<Self> {
        let block = unescape_sysex(nibbles);
        if block.is_empty() {
            return Err(Error::InvalidChecksum);
        }
        Self::from_block(&block)
    }

    /// Decode a complete master parameter message
    pub fn from_message(message: &SysexMessage) -> Result<Self> {
        if !is_global_settings_dump(message) {
            return Err(Error::UnexpectedMessage("a master parameter dump"));
        }
        Self::from_sysex_data(&message.data()[DUMP_HEADER_SIZE..])
    }

    /// Value of the setting at `index` in [`GLOBAL_SETTINGS`]
    pub fn value(&self, index: usize) -> Option<i32> {
        self.values.get(index).copied()
    }

    /// Value of a setting by display name
    pub fn get(&self, name: &str) -> Option<i32> {
        GLOBAL_SETTINGS
            .iter()
            .position(|def| def.name == name)
            .and_then(|index| self.value(index))
    }

    /// Iterate over definitions and their decoded values
    pub fn iter(&self) -> impl Iterator<Item = (&'static GlobalSettingDefinition, i32)> + '_ {
        GLOBAL_SETTINGS.iter().zip(self.values.iter().copied())
    }
}

#[derive(Serialize)]
struct SettingEntry {
    name: &'static str,
    category: &'static str,
    value: i32,
    display: String,
}

impl Serialize for GlobalSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(def, value)| SettingEntry {
            name: def.name,
            category: def.category,
            value,
            display: def.format_value(value),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table() {
        assert_eq!(GLOBAL_SETTINGS.len(), 27);
        assert!(GLOBAL_SETTINGS.iter().all(|d| d.sysex_index < SETTINGS_BLOCK_SIZE));
        let signed: Vec<_> = GLOBAL_SETTINGS
            .iter()
            .filter(|d| d.twos_complement)
            .map(|d| d.name)
            .collect();
        assert_eq!(signed, vec!["Master Transpose", "Master Tune"]);
    }

    #[test]
    fn test_size_gate() {
        for len in [0, 171, 173] {
            assert!(matches!(
                GlobalSettings::from_block(&vec![0u8; len]),
                Err(Error::SettingsSize { expected: 172, actual }) if actual == len
            ));
        }
        assert!(GlobalSettings::from_block(&[0u8; 172]).is_ok());
    }

    #[test]
    fn test_decode_values() {
        let mut block = [0u8; SETTINGS_BLOCK_SIZE];
        block[34] = 0xF4; // -12
        block[8] = 5;
        block[11] = 9;
        block[4] = 3;
        block[171] = 1;

        let settings = GlobalSettings::from_block(&block).unwrap();
        assert_eq!(settings.get("Master Transpose"), Some(-12));
        assert_eq!(settings.get("Master Tune"), Some(5));
        assert_eq!(settings.get("MIDI Basic Channel"), Some(10));
        assert_eq!(settings.get("Vibrato Waveform"), Some(3));
        assert_eq!(settings.get("Memory Protect Enable"), Some(1));
        assert_eq!(settings.get("No Such Setting"), None);
    }

    #[test]
    fn test_only_signed_fields_wrap() {
        let mut block = [0u8; SETTINGS_BLOCK_SIZE];
        block[17] = 200;
        let settings = GlobalSettings::from_block(&block).unwrap();
        assert_eq!(settings.get("MIDI Pedal 1 Controller"), Some(200));
    }

    #[test]
    fn test_format_value() {
        let waveform = GLOBAL_SETTINGS.iter().find(|d| d.name == "Vibrato Waveform").unwrap();
        assert_eq!(waveform.format_value(0), "Triangle");
        assert_eq!(waveform.format_value(6), "6");
        let echo = GLOBAL_SETTINGS.iter().find(|d| d.name == "MIDI Echo Enable").unwrap();
        assert_eq!(echo.format_value(1), "On");
        assert_eq!(echo.format_value(0), "Off");
    }

    #[test]
    fn test_checksum_failure_is_not_size_failure() {
        let mut nibbles = crate::sysex::escape_sysex(&[0u8; SETTINGS_BLOCK_SIZE]);
        let last = nibbles.len() - 1;
        nibbles[last] ^= 0x01;
        assert!(matches!(
            GlobalSettings::from_sysex_data(&nibbles),
            Err(Error::InvalidChecksum)
        ));
    }
}
