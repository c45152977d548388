//! Matrix 1000 patch record

use crate::address::ProgramNumber;

/// Size of one unpacked Matrix 1000 program
pub const PATCH_SIZE: usize = 134;

/// The name lives in the first 8 bytes of the program data
pub const NAME_LENGTH: usize = 8;

// The device never displays the name and clears it when a patch is sent to it
// and read back, so these bytes are ignored when comparing patches.
const BLANK_OUT_ZONES: [std::ops::Range<usize>; 1] = [0..NAME_LENGTH];

/// One decoded program plus the slot it came from, if known.
///
/// Edit buffer dumps carry no persistent slot, so `number` is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    data: Vec<u8>,
    number: Option<ProgramNumber>,
}

impl Patch {
    /// Creates a patch without a program number
    pub fn new(data: Vec<u8>) -> Self {
        if data.len() != PATCH_SIZE {
            log::debug!(
                "PATCH: unusual patch size {} (expected {})",
                data.len(),
                PATCH_SIZE
            );
        }
        Self { data, number: None }
    }

    /// Creates a patch placed in a program slot
    pub fn with_number(data: Vec<u8>, number: ProgramNumber) -> Self {
        let mut patch = Self::new(data);
        patch.set_number(number);
        patch
    }

    /// Unpacked program bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Program slot, `None` for edit buffer patches
    pub fn number(&self) -> Option<ProgramNumber> {
        self.number
    }

    /// Place the patch in a program slot
    pub fn set_number(&mut self, number: ProgramNumber) {
        self.number = Some(number);
    }

    /// Patch name from the first 8 data bytes.
    pub fn name(&self) -> String {
        self.data
            .iter()
            .take(NAME_LENGTH)
            .map(|&b| {
                // Old factory banks store letters as their 1-based position in the alphabet
                if b < 32 {
                    char::from(b + b'A' - 1)
                } else {
                    char::from(b)
                }
            })
            .collect()
    }

    /// Write a name into the 6-bit upper case character set of the device.
    ///
    /// Non-ASCII characters become `@`, lower case is folded to upper case,
    /// control characters become `_`, and the name is padded with spaces.
    pub fn set_name(&mut self, name: &str) {
        let mut chars = name.chars();
        let len = NAME_LENGTH.min(self.data.len());
        for byte in self.data[..len].iter_mut() {
            *byte = match chars.next() {
                None => b' ',
                Some(c) if !c.is_ascii() || c == '\u{1a}' => b'@',
                Some(c) => {
                    let ascii = c as u8;
                    if ascii > 0x5f {
                        ascii - 0x20
                    } else if ascii < 0x20 {
                        b'_'
                    } else {
                        ascii
                    }
                }
            };
        }
    }

    /// True for names like `BNK3: 17` that the device generates itself
    pub fn is_default_name(&self) -> bool {
        let name = self.name().to_ascii_uppercase();
        name.as_bytes().windows(8).any(|w| {
            &w[..3] == b"BNK"
                && w[3].is_ascii_digit()
                && &w[4..6] == b": "
                && w[6].is_ascii_digit()
                && w[7].is_ascii_digit()
        })
    }

    /// Patch data with the name bytes zeroed, for duplicate detection
    pub fn voice_relevant_data(&self) -> Vec<u8> {
        let mut data = self.data.clone();
        for zone in BLANK_OUT_ZONES.iter() {
            let end = zone.end.min(data.len());
            if zone.start < end {
                data[zone.start..end].fill(0);
            }
        }
        data
    }
}
