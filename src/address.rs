//! Bank and program addressing
//!
//! The Matrix 1000 stores 1000 programs, organized as 10 banks of 100. Bank
//! `i` spans the flat program numbers `100 * i ..= 100 * i + 99`.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

/// Number of banks
pub const NUMBER_OF_BANKS: u8 = 10;

/// Number of programs per bank
pub const PATCHES_PER_BANK: u16 = 100;

/// Total number of addressable program slots
pub const NUMBER_OF_PROGRAMS: u16 = NUMBER_OF_BANKS as u16 * PATCHES_PER_BANK;

/// Zero-based bank index, always in 0..10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BankNumber(u8);

impl BankNumber {
    /// Checked constructor, out-of-range banks are a caller bug
    pub fn new(bank: u8) -> Result<Self> {
        if bank < NUMBER_OF_BANKS {
            Ok(Self(bank))
        } else {
            Err(Error::BankOutOfRange(bank))
        }
    }

    /// Zero-based index
    pub fn to_zero_based(self) -> u8 {
        self.0
    }

    /// First flat program number in this bank
    pub fn first_program(self) -> ProgramNumber {
        ProgramNumber(self.0 as u16 * PATCHES_PER_BANK)
    }

    /// Last flat program number in this bank
    pub fn last_program(self) -> ProgramNumber {
        ProgramNumber(self.0 as u16 * PATCHES_PER_BANK + PATCHES_PER_BANK - 1)
    }

    /// Display name covering the bank's program range, e.g. `"200 - 299"`
    pub fn friendly_name(self) -> String {
        format!(
            "{:03} - {:03}",
            self.first_program().to_zero_based(),
            self.last_program().to_zero_based()
        )
    }
}

/// Flat zero-based program number, always in 0..1000
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ProgramNumber(u16);

impl ProgramNumber {
    /// Checked constructor, out-of-range programs are a caller bug
    pub fn new(program: u16) -> Result<Self> {
        if program < NUMBER_OF_PROGRAMS {
            Ok(Self(program))
        } else {
            Err(Error::ProgramOutOfRange(program))
        }
    }

    /// Build from a (bank, slot) pair
    pub fn from_bank_and_slot(bank: BankNumber, slot: u8) -> Result<Self> {
        if slot as u16 >= PATCHES_PER_BANK {
            return Err(Error::ProgramOutOfRange(
                bank.0 as u16 * PATCHES_PER_BANK + slot as u16,
            ));
        }
        Ok(Self(bank.0 as u16 * PATCHES_PER_BANK + slot as u16))
    }

    /// Zero-based flat number
    pub fn to_zero_based(self) -> u16 {
        self.0
    }

    /// Bank this program lives in (`number div 100`)
    pub fn bank(self) -> BankNumber {
        BankNumber((self.0 / PATCHES_PER_BANK) as u8)
    }

    /// Position inside its bank (`number mod 100`)
    pub fn slot(self) -> u8 {
        (self.0 % PATCHES_PER_BANK) as u8
    }

    /// The front panel shows three digits, "000" to "999"
    pub fn friendly_name(self) -> String {
        format!("{:03}", self.0)
    }
}

impl fmt::Display for ProgramNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// Zero-based MIDI channel, always in 0..16
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct MidiChannel(u8);

impl MidiChannel {
    /// `None` for anything outside 0..16
    pub fn from_zero_based(channel: u8) -> Option<Self> {
        (channel < 16).then_some(Self(channel))
    }

    /// `None` for anything outside 1..=16
    pub fn from_one_based(channel: u8) -> Option<Self> {
        channel.checked_sub(1).and_then(Self::from_zero_based)
    }

    /// Zero-based channel as sent on the wire
    pub fn to_zero_based(self) -> u8 {
        self.0
    }

    /// One-based channel as shown to users
    pub fn to_one_based(self) -> u8 {
        self.0 + 1
    }
}
