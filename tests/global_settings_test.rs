use matrix1000::settings::SETTINGS_BLOCK_SIZE;
use matrix1000::{
    classify, DumpKind, EditBufferCapability, Error, GlobalSettings, Matrix1000, MessageKind,
};

mod common;
use common::settings_message;

fn block_with_transpose(raw: u8) -> Vec<u8> {
    let mut block = vec![0u8; SETTINGS_BLOCK_SIZE];
    block[34] = raw;
    block[11] = 2;
    block
}

/// The unpacked block has to be exactly 172 bytes
#[test]
fn test_block_size_is_checked_after_unpacking() {
    let _ = env_logger::try_init();

    let mut matrix = Matrix1000::default();
    for len in [171, 173] {
        let message = settings_message(&vec![0u8; len]);
        assert!(matrix.is_global_settings_dump(&message));
        assert!(matches!(
            matrix.load_global_settings(&message),
            Err(Error::SettingsSize { expected: 172, actual }) if actual == len
        ));
    }
    assert!(matrix.global_settings().is_none());

    let message = settings_message(&block_with_transpose(0xFE));
    let settings = matrix.load_global_settings(&message).unwrap();
    assert_eq!(settings.get("Master Transpose"), Some(-2));
    assert_eq!(settings.get("MIDI Basic Channel"), Some(3));
}

#[test]
fn test_transpose_twos_complement() {
    for (raw, expected) in [(0x00u8, 0), (0x0c, 12), (0xF4, -12), (0xE8, -24)] {
        let settings = GlobalSettings::from_message(&settings_message(&block_with_transpose(raw)))
            .unwrap();
        assert_eq!(settings.get("Master Transpose"), Some(expected), "raw 0x{:02X}", raw);
    }
}

/// A failed decode leaves the previous snapshot untouched
#[test]
fn test_failed_load_keeps_snapshot() {
    let mut matrix = Matrix1000::default();
    matrix
        .load_global_settings(&settings_message(&block_with_transpose(7)))
        .unwrap();
    let before = matrix.global_settings().cloned();

    assert!(matrix
        .load_global_settings(&settings_message(&[0u8; 10]))
        .is_err());

    let mut corrupt = settings_message(&block_with_transpose(3)).data().to_vec();
    let last = corrupt.len() - 1;
    corrupt[last] ^= 0x02;
    assert!(matches!(
        matrix.load_global_settings(&matrix1000::SysexMessage::new(corrupt)),
        Err(Error::InvalidChecksum)
    ));

    let request = matrix.request_edit_buffer_dump();
    assert!(matches!(
        matrix.load_global_settings(&request),
        Err(Error::UnexpectedMessage(_))
    ));

    assert_eq!(matrix.global_settings().cloned(), before);
    assert_eq!(
        matrix.global_settings().and_then(|s| s.get("Master Transpose")),
        Some(7)
    );
}

#[test]
fn test_settings_message_is_classified() {
    let message = settings_message(&block_with_transpose(0));
    assert_eq!(classify(&message, DumpKind::Program), MessageKind::GlobalSettings);
    assert_eq!(classify(&message, DumpKind::EditBuffer), MessageKind::GlobalSettings);
}

#[test]
fn test_settings_json() {
    let mut block = block_with_transpose(0xF4);
    block[4] = 4; // Random
    block[169] = 1;
    let settings = GlobalSettings::from_block(&block).unwrap();

    let json = serde_json::to_value(&settings).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 27);

    assert_eq!(entries[0]["name"], "Master Transpose");
    assert_eq!(entries[0]["value"], -12);

    let waveform = entries
        .iter()
        .find(|e| e["name"] == "Vibrato Waveform")
        .unwrap();
    assert_eq!(waveform["display"], "Random");
    assert_eq!(waveform["category"], "Global Vibrato");

    let unison = entries.iter().find(|e| e["name"] == "Unison Enable").unwrap();
    assert_eq!(unison["display"], "On");
}
