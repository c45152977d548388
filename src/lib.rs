// Copyright 2026 Matrix1000 Contributors.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// See https://www.gnu.org/licenses/gpl-3.0.html for more information.

//! Sysex adapter for the Oberheim Matrix 1000.
//!
//! This crate translates between the Matrix 1000's nibble-packed, checksummed
//! sysex messages and plain patch data, and builds the command sequences that
//! request and store programs across its 10 banks of 100 programs. It does not
//! talk to MIDI ports itself: every operation takes or returns
//! [`SysexMessage`]s and the host moves them over the wire.
//!
//! ```
//! use matrix1000::{Matrix1000, ProgramDumpCapability, ProgramNumber};
//!
//! let matrix = Matrix1000::default();
//! let program = ProgramNumber::new(250).unwrap();
//! let messages = matrix.request_patch(program);
//! assert_eq!(messages.len(), 3); // bank select, bank unlock, request
//! ```

#![warn(missing_docs)]

pub mod address;
pub mod capability;
pub mod command;
pub mod config;
pub mod error;
pub mod message;
pub mod patch;
pub mod settings;
pub mod synth;
pub mod sysex;

pub use address::{BankNumber, MidiChannel, ProgramNumber};
pub use capability::{
    BankDumpCapability, DiscoverableDevice, EditBufferCapability, ProgramDumpCapability,
    SoundExpanderCapability, Synth,
};
pub use config::DeviceConfig;
pub use error::{Error, Result};
pub use message::{classify, DumpKind, MessageKind};
pub use patch::{Patch, PATCH_SIZE};
pub use settings::{GlobalSettings, GLOBAL_SETTINGS};
pub use synth::Matrix1000;
pub use sysex::{escape_sysex, parse_sysex_data, parse_sysex_file, unescape_sysex, SysexMessage};
