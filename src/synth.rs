//! The Matrix 1000 adapter
//!
//! Ties codec, classifier and command builders together into the request
//! sequences and patch conversions a host needs.

use std::time::Duration;

use log::{debug, warn};

use crate::address::{BankNumber, MidiChannel, ProgramNumber, NUMBER_OF_BANKS, PATCHES_PER_BANK};
use crate::capability::{
    BankDumpCapability, DiscoverableDevice, EditBufferCapability, ProgramDumpCapability,
    SoundExpanderCapability, Synth,
};
use crate::command::{self, RequestType};
use crate::config::DeviceConfig;
use crate::error::{Error, Result};
use crate::message::{self, DumpKind, DUMP_HEADER_SIZE};
use crate::patch::Patch;
use crate::settings::GlobalSettings;
use crate::sysex::{unescape_sysex, SysexMessage};

/// Oberheim Matrix 1000 adapter
#[derive(Debug, Clone)]
pub struct Matrix1000 {
    /// Channel the device listens on, once known
    channel: Option<MidiChannel>,

    /// Identity request timeout handed to the host
    detect_sleep: Duration,

    /// Last successfully decoded master parameters
    global_settings: Option<GlobalSettings>,
}

impl Default for Matrix1000 {
    fn default() -> Self {
        Self::new(&DeviceConfig::default())
    }
}

impl Matrix1000 {
    /// Create an adapter for a device connected as described by `config`
    pub fn new(config: &DeviceConfig) -> Self {
        Self {
            channel: config.channel(),
            detect_sleep: config.detect_sleep(),
            global_settings: None,
        }
    }

    /// Record the channel found by device detection
    pub fn set_channel(&mut self, channel: MidiChannel) {
        self.channel = Some(channel);
    }

    /// Decode a single patch data message as the caller asked for it.
    ///
    /// Slot byte 0 is both "edit buffer" and "program 0", `kind` decides.
    pub fn patch_from_dump(&self, message: &SysexMessage, kind: DumpKind) -> Result<Patch> {
        match kind {
            DumpKind::EditBuffer => self.patch_from_sysex(message),
            DumpKind::Program => self.patch_from_program_dump_sysex(message),
        }
    }

    /// Decode a finished bank dump into patches numbered within `bank`.
    ///
    /// The stream must pass [`message::is_bank_dump_finished`], and every
    /// program dump in it must carry a valid checksum. A slot that was sent
    /// more than once keeps its last dump; patches come back in slot order.
    pub fn patches_from_bank_dump(
        &self,
        bank: BankNumber,
        messages: &[SysexMessage],
    ) -> Result<Vec<Patch>> {
        if !self.is_bank_dump_finished(messages) {
            let found = messages
                .iter()
                .filter(|m| message::is_single_program_dump(m))
                .count();
            return Err(Error::IncompleteBankDump(found));
        }

        let mut slots: Vec<Option<Patch>> = vec![None; PATCHES_PER_BANK as usize];
        for m in messages.iter().filter(|m| message::is_single_program_dump(m)) {
            let mut patch = self.patch_from_program_dump_sysex(m)?;
            let number = ProgramNumber::from_bank_and_slot(bank, m.data()[3])?;
            patch.set_number(number);
            if slots[number.slot() as usize].replace(patch).is_some() {
                debug!("MATRIX: slot {} sent twice, keeping the last dump", number.slot());
            }
        }
        Ok(slots.into_iter().flatten().collect())
    }

    /// Request the master parameters
    pub fn request_global_settings(&self) -> SysexMessage {
        command::request_global_settings()
    }

    /// True for a master parameter dump
    pub fn is_global_settings_dump(&self, message: &SysexMessage) -> bool {
        message::is_global_settings_dump(message)
    }

    /// Decode a master parameter dump and replace the current snapshot.
    ///
    /// On any failure the previous snapshot stays in place.
    pub fn load_global_settings(&mut self, message: &SysexMessage) -> Result<&GlobalSettings> {
        let settings = GlobalSettings::from_message(message)?;
        debug!("MATRIX: global settings replaced");
        Ok(&*self.global_settings.insert(settings))
    }

    /// Last decoded master parameters
    pub fn global_settings(&self) -> Option<&GlobalSettings> {
        self.global_settings.as_ref()
    }

    fn decode_payload(message: &SysexMessage) -> Result<Vec<u8>> {
        let data = unescape_sysex(&message.data()[DUMP_HEADER_SIZE..]);
        if data.is_empty() {
            warn!("MATRIX: discarding patch dump with invalid checksum");
            return Err(Error::InvalidChecksum);
        }
        Ok(data)
    }
}

impl Synth for Matrix1000 {
    fn name(&self) -> &str {
        "Oberheim Matrix 1000"
    }

    fn is_own_sysex(&self, message: &SysexMessage) -> bool {
        message::is_own_sysex(message)
    }

    fn number_of_banks(&self) -> u8 {
        NUMBER_OF_BANKS
    }

    fn number_of_patches(&self) -> u16 {
        PATCHES_PER_BANK
    }

    fn friendly_bank_name(&self, bank: BankNumber) -> String {
        bank.friendly_name()
    }

    fn patch_from_patch_data(&self, data: &[u8], place: ProgramNumber) -> Patch {
        Patch::with_number(data.to_vec(), place)
    }

    fn filter_voice_relevant_data(&self, patch: &Patch) -> Vec<u8> {
        patch.voice_relevant_data()
    }
}

impl EditBufferCapability for Matrix1000 {
    fn request_edit_buffer_dump(&self) -> SysexMessage {
        command::request_edit_buffer_dump()
    }

    fn is_edit_buffer_dump(&self, message: &SysexMessage) -> bool {
        message::is_edit_buffer_dump(message)
    }

    fn patch_from_sysex(&self, message: &SysexMessage) -> Result<Patch> {
        if !message::is_edit_buffer_dump(message) {
            return Err(Error::UnexpectedMessage("an edit buffer dump"));
        }
        // The slot byte is not used here: which bank it belongs to depends on
        // how the dump was requested
        Ok(Patch::new(Self::decode_payload(message)?))
    }

    fn patch_to_sysex(&self, patch: &Patch) -> Vec<SysexMessage> {
        vec![command::edit_buffer_transfer(patch.data())]
    }

    fn save_edit_buffer_to_program(&self, program: ProgramNumber) -> SysexMessage {
        command::save_edit_buffer_to_program(program)
    }
}

impl ProgramDumpCapability for Matrix1000 {
    /// Select the bank, unlock it, then request the program.
    ///
    /// The order is fixed: a locked bank silently ignores requests, and
    /// unlock only applies to the bank that is currently selected.
    fn request_patch(&self, program: ProgramNumber) -> Vec<SysexMessage> {
        debug!(
            "MATRIX: requesting program {} (bank {}, slot {})",
            program,
            program.bank().to_zero_based(),
            program.slot()
        );
        vec![
            command::create_bank_select(program.bank()),
            command::create_bank_unlock(),
            command::create_request(RequestType::SinglePatch, program.slot()),
        ]
    }

    fn is_single_program_dump(&self, message: &SysexMessage) -> bool {
        message::is_single_program_dump(message)
    }

    fn patch_from_program_dump_sysex(&self, message: &SysexMessage) -> Result<Patch> {
        if !message::is_single_program_dump(message) {
            return Err(Error::UnexpectedMessage("a single program dump"));
        }
        let data = Self::decode_payload(message)?;
        let number = ProgramNumber::new(message.data()[3] as u16)?;
        Ok(Patch::with_number(data, number))
    }

    fn patch_to_program_dump_sysex(&self, patch: &Patch) -> Result<Vec<SysexMessage>> {
        let number = patch.number().ok_or(Error::MissingProgramNumber)?;
        Ok(vec![command::program_dump_transfer(patch.data(), number)])
    }
}

impl BankDumpCapability for Matrix1000 {
    fn request_bank_dump(&self, bank: BankNumber) -> Vec<SysexMessage> {
        vec![
            command::create_bank_select(bank),
            command::create_request(RequestType::BankAndMaster, 0),
        ]
    }

    fn is_bank_dump(&self, message: &SysexMessage) -> bool {
        message::is_bank_dump(message)
    }

    fn is_bank_dump_finished(&self, messages: &[SysexMessage]) -> bool {
        message::is_bank_dump_finished(messages)
    }

    fn patches_from_sysex_bank(&self, _message: &SysexMessage) -> Result<Vec<Patch>> {
        // The Matrix answers a bank request with one program dump per slot
        Err(Error::NotImplemented(
            "bank dumps arrive as individual program dumps, use patches_from_bank_dump",
        ))
    }
}

impl SoundExpanderCapability for Matrix1000 {
    fn can_change_input_channel(&self) -> bool {
        false
    }

    // TODO: possible with a roundtrip: request the master parameters, patch
    // the channel byte and send the block back
    fn change_input_channel(&mut self, _channel: MidiChannel) -> Result<Vec<SysexMessage>> {
        Err(Error::NotImplemented("changing the input channel"))
    }

    fn input_channel(&self) -> Option<MidiChannel> {
        self.channel
    }

    fn has_midi_control(&self) -> bool {
        false
    }

    fn is_midi_control_on(&self) -> bool {
        true
    }

    fn set_midi_control(&mut self, _on: bool) -> Result<Vec<SysexMessage>> {
        Err(Error::NotImplemented("switching MIDI control"))
    }
}

impl DiscoverableDevice for Matrix1000 {
    fn device_detect(&self, channel: u8) -> SysexMessage {
        command::device_detect(channel)
    }

    fn device_detect_sleep(&self) -> Duration {
        self.detect_sleep
    }

    fn channel_if_valid_device_response(&self, message: &SysexMessage) -> Option<MidiChannel> {
        message::channel_if_valid_device_response(message)
    }

    fn needs_channel_specific_detection(&self) -> bool {
        true
    }
}
