//! Fixed-width hex fields mirrored into a SUN message
//!
//! Each field decodes to exactly its width. Short and long inputs are
//! rejected, never padded or truncated.

use core::fmt;
use core::str::FromStr;

use derive_more::Display;
use subtle::{Choice, ConstantTimeEq};

use crate::constants::{READ_COUNTER_LENGTH, READ_COUNTER_MAX, SDMMAC_LENGTH, UID_LENGTH};
use crate::error::{DecodeError, Error, Result};

/// Fields carried in a plain SUN message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Field {
    /// Tag UID
    #[display("UID")]
    Uid,
    /// SDM read counter
    #[display("read counter")]
    ReadCounter,
    /// SDMMAC
    #[display("MAC")]
    Mac,
}

/// Decode a hex string into exactly `N` bytes.
pub fn decode_field<const N: usize>(field: Field, input: &str) -> Result<[u8; N]> {
    let bytes = hex::decode(input).map_err(|e| Error::MalformedInput {
        field,
        source: DecodeError::InvalidHex(e),
    })?;

    let actual = bytes.len();
    bytes.try_into().map_err(|_| Error::MalformedInput {
        field,
        source: DecodeError::InvalidLength {
            expected: N,
            actual,
        },
    })
}

/// 7-byte tag UID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uid([u8; UID_LENGTH]);

impl Uid {
    /// Create a UID from raw bytes
    pub const fn new(bytes: [u8; UID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Raw UID bytes
    pub const fn as_bytes(&self) -> &[u8; UID_LENGTH] {
        &self.0
    }
}

impl FromStr for Uid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decode_field(Field::Uid, s).map(Self)
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

/// SDM read counter
///
/// The tag mirrors the counter most-significant byte first; the session
/// vectors carry it least-significant byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReadCounter(u32);

impl ReadCounter {
    /// Create a counter, returning `None` if it does not fit in three bytes
    pub const fn new(value: u32) -> Option<Self> {
        if value > READ_COUNTER_MAX {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Reconstruct the counter from its mirrored (big-endian) bytes
    pub const fn from_be_bytes(bytes: [u8; READ_COUNTER_LENGTH]) -> Self {
        Self(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }

    /// Counter bytes in the order used by the session vectors
    pub const fn to_le_bytes(self) -> [u8; READ_COUNTER_LENGTH] {
        let b = self.0.to_le_bytes();
        [b[0], b[1], b[2]]
    }

    /// Counter value
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl FromStr for ReadCounter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decode_field(Field::ReadCounter, s).map(Self::from_be_bytes)
    }
}

impl fmt::Display for ReadCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Truncated 8-byte SDMMAC
///
/// Equality is only available in constant time through [`ConstantTimeEq`].
#[derive(Clone, Copy)]
pub struct SdmMac([u8; SDMMAC_LENGTH]);

impl SdmMac {
    /// Create a MAC from raw bytes
    pub const fn new(bytes: [u8; SDMMAC_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Raw MAC bytes
    pub const fn as_bytes(&self) -> &[u8; SDMMAC_LENGTH] {
        &self.0
    }
}

impl ConstantTimeEq for SdmMac {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.as_slice().ct_eq(other.0.as_slice())
    }
}

impl FromStr for SdmMac {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        decode_field(Field::Mac, s).map(Self)
    }
}

impl fmt::Debug for SdmMac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SdmMac(..)")
    }
}
