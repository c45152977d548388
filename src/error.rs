//! Error types for the Matrix 1000 adapter

use thiserror::Error;

/// Result type alias for Matrix 1000 operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while talking to a Matrix 1000
#[derive(Debug, Error)]
pub enum Error {
    /// The nibble-packed payload did not carry a valid checksum. The message
    /// must be discarded; the host may ask for a retransmission.
    #[error("invalid checksum in sysex payload, message discarded")]
    InvalidChecksum,

    /// The unpacked global settings block has the wrong length
    #[error("global settings block must be {expected} bytes, got {actual}")]
    SettingsSize {
        /// Required block length
        expected: usize,
        /// Length actually decoded
        actual: usize,
    },

    /// Bank index outside of 0..10
    #[error("bank index {0} out of range (0-9)")]
    BankOutOfRange(u8),

    /// Flat program number outside of 0..1000
    #[error("program number {0} out of range (0-999)")]
    ProgramOutOfRange(u16),

    /// A decode was attempted on a message of the wrong kind
    #[error("message is not {0}")]
    UnexpectedMessage(&'static str),

    /// Numbered program framing was requested for a patch without a slot
    #[error("patch has no program number, cannot frame it as a program dump")]
    MissingProgramNumber,

    /// A bank dump stream did not contain a full bank of program dumps
    #[error("incomplete bank dump: {0} of 100 program dumps")]
    IncompleteBankDump(usize),

    /// The device supports the concept, but this adapter does not
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// Malformed sysex framing
    #[error("sysex framing error: {0}")]
    Framing(String),

    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
