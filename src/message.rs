//! Matrix 1000 message identifiers and the message classifier
//!
//! All predicates here inspect raw bytes only and never mutate anything.

use crate::address::{MidiChannel, PATCHES_PER_BANK};
use crate::sysex::SysexMessage;

/// Oberheim manufacturer id
pub const OBERHEIM: u8 = 0x10;
/// Matrix 6 / Matrix 1000 device family
pub const MATRIX6_1000: u8 = 0x06;

/// Length of the header in front of nibble-packed data: id, family, command, slot
pub const DUMP_HEADER_SIZE: usize = 4;

/// Command bytes understood by the Matrix 1000
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    /// Single patch data, sent by the device in reply to requests
    SinglePatchData = 0x01,
    /// Master parameter data
    MasterData = 0x03,
    /// Request data
    RequestData = 0x04,
    /// Select the current bank
    SetBank = 0x0a,
    /// Remote parameter edit
    ParameterEdit = 0x0b,
    /// Unlock the current bank for requests
    BankUnlock = 0x0c,
    /// Single patch sent straight into the edit buffer
    SinglePatchToEditBuffer = 0x0d,
    /// Store the edit buffer into a program slot
    StoreEditBuffer = 0x0e,
}

/// Sub-type byte following [`Command::MasterData`]
pub const MASTER_DATA_TYPE: u8 = 0x03;

/// How the caller interprets a single patch data message.
///
/// Slot byte 0 is valid for both an edit buffer dump and a dump of program 0,
/// only the request that triggered it tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpKind {
    /// The caller asked for the edit buffer
    EditBuffer,
    /// The caller asked for stored programs
    Program,
}

/// Result of [`classify`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// Reply to a device identification request, with the reported channel
    DeviceIdentity(MidiChannel),
    /// Edit buffer dump
    EditBufferDump,
    /// Single program dump with its slot in the current bank
    ProgramDump(u8),
    /// Master parameter block
    GlobalSettings,
    /// Some other Oberheim Matrix message
    OtherOwn,
    /// Not ours
    Foreign,
}

/// True if the message is addressed to or from a Matrix 6/1000
pub fn is_own_sysex(message: &SysexMessage) -> bool {
    let data = message.data();
    data.len() > 1 && data[0] == OBERHEIM && data[1] == MATRIX6_1000
}

fn is_single_patch_data(message: &SysexMessage) -> bool {
    is_own_sysex(message)
        && message.len() > 3
        && message.data()[2] == Command::SinglePatchData as u8
}

/// Single patch data with slot byte 0
pub fn is_edit_buffer_dump(message: &SysexMessage) -> bool {
    is_single_patch_data(message) && message.data()[3] == 0x00
}

/// Single patch data with a slot byte that is a valid program in a bank
pub fn is_single_program_dump(message: &SysexMessage) -> bool {
    is_single_patch_data(message) && (message.data()[3] as u16) < PATCHES_PER_BANK
}

/// A bank request is answered by individual program dumps, so any program
/// dump is part of a bank dump
pub fn is_bank_dump(message: &SysexMessage) -> bool {
    is_single_program_dump(message)
}

/// True once the stream holds at least as many program dumps as a bank has
/// programs.
///
/// This counts matching messages, it does not deduplicate by slot: a stream
/// with 99 distinct programs and one repeat is considered finished, and so is
/// a full bank with a retransmitted program on top. Fewer than 100 dumps
/// never count as a bank.
pub fn is_bank_dump_finished(bank_dump: &[SysexMessage]) -> bool {
    let found = bank_dump
        .iter()
        .filter(|m| is_single_program_dump(m))
        .count();
    found >= PATCHES_PER_BANK as usize
}

/// Master parameter data block
pub fn is_global_settings_dump(message: &SysexMessage) -> bool {
    is_own_sysex(message)
        && message.len() > 3
        && message.data()[2] == Command::MasterData as u8
        && message.data()[3] == MASTER_DATA_TYPE
}

const DEVICE_RESPONSE_SIZE: usize = 13;

const DEVICE_RESPONSE_TEMPLATE: [(usize, u8); 7] = [
    (0, 0x7e),
    (2, 0x06),
    (3, 0x02),
    (4, OBERHEIM),
    (5, MATRIX6_1000),
    (6, 0x00),
    // 7 is the family member, 9 to 12 the firmware revision
    (8, 0x00),
];

/// Channel reported by a device identification reply, `None` if the message
/// is not a Matrix 1000 identity reply
pub fn channel_if_valid_device_response(message: &SysexMessage) -> Option<MidiChannel> {
    let data = message.data();
    if data.len() != DEVICE_RESPONSE_SIZE {
        return None;
    }
    if DEVICE_RESPONSE_TEMPLATE
        .iter()
        .any(|&(offset, expected)| data[offset] != expected)
    {
        return None;
    }
    MidiChannel::from_zero_based(data[1])
}

/// Classify a message. Single patch data is interpreted per `dump_kind`.
pub fn classify(message: &SysexMessage, dump_kind: DumpKind) -> MessageKind {
    if let Some(channel) = channel_if_valid_device_response(message) {
        return MessageKind::DeviceIdentity(channel);
    }
    if !is_own_sysex(message) {
        return MessageKind::Foreign;
    }
    match dump_kind {
        DumpKind::EditBuffer if is_edit_buffer_dump(message) => MessageKind::EditBufferDump,
        DumpKind::Program if is_single_program_dump(message) => {
            MessageKind::ProgramDump(message.data()[3])
        }
        _ if is_global_settings_dump(message) => MessageKind::GlobalSettings,
        _ => MessageKind::OtherOwn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump(slot: u8) -> SysexMessage {
        SysexMessage::new(vec![OBERHEIM, MATRIX6_1000, 0x01, slot, 0x00, 0x00, 0x00])
    }

    #[test]
    fn test_own_sysex() {
        assert!(is_own_sysex(&SysexMessage::new(vec![0x10, 0x06])));
        assert!(!is_own_sysex(&SysexMessage::new(vec![0x10])));
        assert!(!is_own_sysex(&SysexMessage::new(vec![0x43, 0x06, 0x01])));
    }

    #[test]
    fn test_slot_five_is_program_only() {
        let message = dump(5);
        assert!(is_single_program_dump(&message));
        assert!(!is_edit_buffer_dump(&message));
    }

    #[test]
    fn test_slot_zero_is_ambiguous() {
        let message = dump(0);
        assert!(is_single_program_dump(&message));
        assert!(is_edit_buffer_dump(&message));
        assert_eq!(
            classify(&message, DumpKind::EditBuffer),
            MessageKind::EditBufferDump
        );
        assert_eq!(
            classify(&message, DumpKind::Program),
            MessageKind::ProgramDump(0)
        );
    }

    #[test]
    fn test_slot_out_of_bank() {
        let message = dump(100);
        assert!(!is_single_program_dump(&message));
        assert_eq!(classify(&message, DumpKind::Program), MessageKind::OtherOwn);
    }

    #[test]
    fn test_wrong_command() {
        let message = SysexMessage::new(vec![OBERHEIM, MATRIX6_1000, 0x0d, 0x00]);
        assert!(!is_edit_buffer_dump(&message));
        assert!(!is_single_program_dump(&message));
    }

    #[test]
    fn test_device_response() {
        let mut reply = vec![
            0x7e, 0x05, 0x06, 0x02, 0x10, 0x06, 0x00, 0x02, 0x00, 0x01, 0x02, 0x03, 0x04,
        ];
        let channel = channel_if_valid_device_response(&SysexMessage::new(reply.clone()));
        assert_eq!(channel.map(|c| c.to_zero_based()), Some(5));
        assert_eq!(
            classify(&SysexMessage::new(reply.clone()), DumpKind::Program),
            MessageKind::DeviceIdentity(MidiChannel::from_zero_based(5).unwrap())
        );

        reply[4] = 0x11;
        assert!(channel_if_valid_device_response(&SysexMessage::new(reply.clone())).is_none());

        reply[4] = 0x10;
        reply.push(0x00);
        assert!(channel_if_valid_device_response(&SysexMessage::new(reply)).is_none());
    }

    #[test]
    fn test_bank_dump_finished_counts() {
        let bank: Vec<_> = (0..100).map(dump).collect();
        assert!(is_bank_dump_finished(&bank));
        assert!(!is_bank_dump_finished(&bank[..99]));

        let mut repeated = bank.clone();
        repeated.push(dump(17));
        assert!(is_bank_dump_finished(&repeated));
    }

    #[test]
    fn test_global_settings_dump() {
        let message = SysexMessage::new(vec![OBERHEIM, MATRIX6_1000, 0x03, 0x03, 0x00]);
        assert!(is_global_settings_dump(&message));
        assert!(!is_single_program_dump(&message));
        assert_eq!(
            classify(&message, DumpKind::Program),
            MessageKind::GlobalSettings
        );
    }

    #[test]
    fn test_foreign() {
        let message = SysexMessage::new(vec![0x43, 0x00, 0x09]);
        assert_eq!(classify(&message, DumpKind::Program), MessageKind::Foreign);
    }
}
