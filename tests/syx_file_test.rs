use std::fs;

use matrix1000::sysex::messages_to_bytes;
use matrix1000::{
    parse_sysex_file, BankDumpCapability, DeviceConfig, DiscoverableDevice, Error, Matrix1000,
    ProgramDumpCapability, SoundExpanderCapability,
};
use tempfile::TempDir;

mod common;
use common::{bank, bank_stream, settings_message};

/// A bank answer is 100 program dumps followed by the master parameters
#[test]
fn test_bank_file_round_trip() {
    let _ = env_logger::try_init();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bank5.syx");

    let mut messages = bank_stream(100);
    messages.push(settings_message(&[0u8; 172]));
    fs::write(&path, messages_to_bytes(&messages)).unwrap();

    let loaded = parse_sysex_file(&path).unwrap();
    assert_eq!(loaded, messages);

    let mut matrix = Matrix1000::default();
    assert!(matrix.is_bank_dump_finished(&loaded));

    let patches = matrix.patches_from_bank_dump(bank(5), &loaded).unwrap();
    assert_eq!(patches.len(), 100);
    assert_eq!(patches[0].number().map(|n| n.to_zero_based()), Some(500));
    assert_eq!(patches[99].number().map(|n| n.to_zero_based()), Some(599));

    let settings_dump = loaded.last().unwrap();
    assert!(matrix.load_global_settings(settings_dump).is_ok());
}

#[test]
fn test_file_with_garbage_between_messages() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dirty.syx");

    let messages = bank_stream(3);
    let mut bytes = vec![0x00, 0x42];
    for message in &messages {
        bytes.extend(message.to_bytes());
        bytes.push(0xFE); // active sensing between messages
    }
    fs::write(&path, bytes).unwrap();

    let loaded = parse_sysex_file(&path).unwrap();
    assert_eq!(loaded, messages);

    let matrix = Matrix1000::default();
    let patch = matrix.patch_from_program_dump_sysex(&loaded[2]).unwrap();
    assert_eq!(patch.number().map(|n| n.slot()), Some(2));
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        parse_sysex_file(dir.path().join("nope.syx")),
        Err(Error::Io(_))
    ));
}

#[test]
fn test_device_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("matrix.toml");
    fs::write(&path, "midi_channel = 4\ndetect_sleep_ms = 350\n").unwrap();

    let config = DeviceConfig::load(&path).unwrap();
    let matrix = Matrix1000::new(&config);
    assert_eq!(matrix.input_channel().map(|c| c.to_one_based()), Some(4));
    assert_eq!(matrix.device_detect_sleep().as_millis(), 350);

    fs::write(&path, "midi_channel = 0\n").unwrap();
    assert!(matches!(DeviceConfig::load(&path), Err(Error::Config(_))));
}
