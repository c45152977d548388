//! Capability traits a host uses to drive a synth adapter.
//!
//! Each trait covers one feature set, so a host can work with any adapter
//! that implements the capabilities it needs.

use std::time::Duration;

use crate::address::{BankNumber, MidiChannel, ProgramNumber};
use crate::error::Result;
use crate::patch::Patch;
use crate::sysex::SysexMessage;

/// Basic facts about a synth
pub trait Synth {
    /// Display name of the device
    fn name(&self) -> &str;
    /// True if the message belongs to this device
    fn is_own_sysex(&self, message: &SysexMessage) -> bool;
    /// Number of banks
    fn number_of_banks(&self) -> u8;
    /// Number of programs per bank
    fn number_of_patches(&self) -> u16;
    /// Display name of a bank
    fn friendly_bank_name(&self, bank: BankNumber) -> String;
    /// Wrap stored patch data, e.g. from a library, into a patch
    fn patch_from_patch_data(&self, data: &[u8], place: ProgramNumber) -> Patch;
    /// Patch bytes with everything that does not affect the sound blanked out
    fn filter_voice_relevant_data(&self, patch: &Patch) -> Vec<u8>;
}

/// Access to the edit buffer
pub trait EditBufferCapability {
    /// Request the edit buffer
    fn request_edit_buffer_dump(&self) -> SysexMessage;
    /// True for an edit buffer dump
    fn is_edit_buffer_dump(&self, message: &SysexMessage) -> bool;
    /// Decode an edit buffer dump
    fn patch_from_sysex(&self, message: &SysexMessage) -> Result<Patch>;
    /// Messages that load `patch` into the edit buffer
    fn patch_to_sysex(&self, patch: &Patch) -> Vec<SysexMessage>;
    /// Store the edit buffer into a program slot
    fn save_edit_buffer_to_program(&self, program: ProgramNumber) -> SysexMessage;
}

/// Access to individual stored programs
pub trait ProgramDumpCapability {
    /// Messages that make the device send one program
    fn request_patch(&self, program: ProgramNumber) -> Vec<SysexMessage>;
    /// True for a single program dump
    fn is_single_program_dump(&self, message: &SysexMessage) -> bool;
    /// Decode a single program dump
    fn patch_from_program_dump_sysex(&self, message: &SysexMessage) -> Result<Patch>;
    /// Messages that write `patch` into its program slot
    fn patch_to_program_dump_sysex(&self, patch: &Patch) -> Result<Vec<SysexMessage>>;
}

/// Access to complete banks
pub trait BankDumpCapability {
    /// Messages that make the device send a bank
    fn request_bank_dump(&self, bank: BankNumber) -> Vec<SysexMessage>;
    /// True if the message is part of a bank dump
    fn is_bank_dump(&self, message: &SysexMessage) -> bool;
    /// True once `messages` hold a complete bank
    fn is_bank_dump_finished(&self, messages: &[SysexMessage]) -> bool;
    /// Decode a bank that arrives as a single message
    fn patches_from_sysex_bank(&self, message: &SysexMessage) -> Result<Vec<Patch>>;
}

/// Devices without a keyboard
pub trait SoundExpanderCapability {
    /// True if the MIDI input channel can be changed remotely
    fn can_change_input_channel(&self) -> bool;
    /// Messages that move the device to another input channel
    fn change_input_channel(&mut self, channel: MidiChannel) -> Result<Vec<SysexMessage>>;
    /// The channel the device listens on, if known
    fn input_channel(&self) -> Option<MidiChannel>;
    /// True if MIDI control can be switched remotely
    fn has_midi_control(&self) -> bool;
    /// True if the device reacts to MIDI control
    fn is_midi_control_on(&self) -> bool;
    /// Messages that switch MIDI control on or off
    fn set_midi_control(&mut self, on: bool) -> Result<Vec<SysexMessage>>;
}

/// Devices that answer an identity request
pub trait DiscoverableDevice {
    /// Identity request for one channel
    fn device_detect(&self, channel: u8) -> SysexMessage;
    /// How long the host should wait for a reply
    fn device_detect_sleep(&self) -> Duration;
    /// Channel reported by a valid reply
    fn channel_if_valid_device_response(&self, message: &SysexMessage) -> Option<MidiChannel>;
    /// True if the request has to be sent once per channel
    fn needs_channel_specific_detection(&self) -> bool;
}
