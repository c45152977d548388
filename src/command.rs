//! Outbound message builders
//!
//! Every builder is pure, it only assembles bytes.

use crate::address::{BankNumber, MidiChannel, ProgramNumber};
use crate::message::{Command, MATRIX6_1000, OBERHEIM};
use crate::sysex::{escape_sysex, SysexMessage};

/// What a request data message asks the device for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RequestType {
    /// All patches in the current bank, followed by the master parameters
    BankAndMaster = 0x00,
    /// One patch from the current bank
    SinglePatch = 0x01,
    /// Master parameters only
    Master = 0x03,
    /// The edit buffer
    EditBuffer = 0x04,
}

fn oberheim(command: Command, payload: &[u8]) -> SysexMessage {
    let mut data = Vec::with_capacity(payload.len() + 3);
    data.push(OBERHEIM);
    data.push(MATRIX6_1000);
    data.push(command as u8);
    data.extend_from_slice(payload);
    SysexMessage::new(data)
}

/// `F0 10 06 04 <type> <number> F7`.
///
/// `number` is only meaningful for [`RequestType::SinglePatch`] and is sent as
/// 0 for every other type.
pub fn create_request(request: RequestType, number: u8) -> SysexMessage {
    let number = if request == RequestType::SinglePatch {
        number
    } else {
        0
    };
    oberheim(Command::RequestData, &[request as u8, number])
}

/// Ask for the edit buffer
pub fn request_edit_buffer_dump() -> SysexMessage {
    create_request(RequestType::EditBuffer, 0)
}

/// Ask for the master parameters
pub fn request_global_settings() -> SysexMessage {
    create_request(RequestType::Master, 0)
}

/// `F0 10 06 0A <bank> F7`
pub fn create_bank_select(bank: BankNumber) -> SysexMessage {
    oberheim(Command::SetBank, &[bank.to_zero_based()])
}

/// `F0 10 06 0C F7`
pub fn create_bank_unlock() -> SysexMessage {
    oberheim(Command::BankUnlock, &[])
}

/// `F0 10 06 0E <slot> <bank> <group mode> F7`, always with group mode off
pub fn save_edit_buffer_to_program(program: ProgramNumber) -> SysexMessage {
    oberheim(
        Command::StoreEditBuffer,
        &[program.slot(), program.bank().to_zero_based(), 0],
    )
}

/// Universal device inquiry, `F0 7E <channel> 06 01 F7`
pub fn device_detect(channel: u8) -> SysexMessage {
    SysexMessage::new(vec![0x7e, channel, 0x06, 0x01])
}

/// Device inquiry for a known channel
pub fn device_detect_on(channel: MidiChannel) -> SysexMessage {
    device_detect(channel.to_zero_based())
}

/// Patch data to be loaded into the edit buffer
pub fn edit_buffer_transfer(patch_data: &[u8]) -> SysexMessage {
    let mut payload = vec![0x00];
    payload.extend(escape_sysex(patch_data));
    oberheim(Command::SinglePatchToEditBuffer, &payload)
}

/// Patch data for a numbered slot of the current bank (`program mod 100`)
pub fn program_dump_transfer(patch_data: &[u8], program: ProgramNumber) -> SysexMessage {
    let mut payload = vec![program.slot()];
    payload.extend(escape_sysex(patch_data));
    oberheim(Command::SinglePatchData, &payload)
}
