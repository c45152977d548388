#![allow(dead_code)]

use matrix1000::command;
use matrix1000::message::{MASTER_DATA_TYPE, MATRIX6_1000, OBERHEIM};
use matrix1000::{escape_sysex, BankNumber, ProgramNumber, SysexMessage, PATCH_SIZE};

/// Deterministic patch contents that cover the full byte range
pub fn patch_data(seed: u8) -> Vec<u8> {
    let mut state = (seed as u32).wrapping_mul(2_654_435_761).wrapping_add(1);
    (0..PATCH_SIZE)
        .map(|_| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            (state >> 16) as u8
        })
        .collect()
}

/// Patch data with a readable name in the first 8 bytes
pub fn named_patch_data(name: &[u8; 8], seed: u8) -> Vec<u8> {
    let mut data = patch_data(seed);
    data[..8].copy_from_slice(name);
    data
}

/// What the device sends for one slot of the current bank
pub fn program_dump(slot: u8, data: &[u8]) -> SysexMessage {
    command::program_dump_transfer(data, ProgramNumber::new(slot as u16).unwrap())
}

/// A bank dump stream with `count` program dumps, slots 0 upward
pub fn bank_stream(count: usize) -> Vec<SysexMessage> {
    (0..count)
        .map(|slot| program_dump((slot % 100) as u8, &patch_data(slot as u8)))
        .collect()
}

/// Master parameter dump wrapping an unpacked block of any size
pub fn settings_message(block: &[u8]) -> SysexMessage {
    let mut data = vec![OBERHEIM, MATRIX6_1000, 0x03, MASTER_DATA_TYPE];
    data.extend(escape_sysex(block));
    SysexMessage::new(data)
}

pub fn bank(n: u8) -> BankNumber {
    BankNumber::new(n).unwrap()
}

pub fn program(n: u16) -> ProgramNumber {
    ProgramNumber::new(n).unwrap()
}
