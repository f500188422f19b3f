use core::fmt;
use core::str::FromStr;

use derive_more::Display;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec::Uid;
use crate::constants::BLOCK_SIZE;
use crate::error::{Error, Result};

/// Raw AES-128 key bytes
pub type KeyBytes = [u8; BLOCK_SIZE];

/// Process-wide master key from which every tag key is diversified
///
/// Loaded once at startup and handed to the validator by value. The key is
/// wiped from memory when dropped and never printed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey(KeyBytes);

impl MasterKey {
    /// Create a master key from raw bytes
    pub const fn new(bytes: KeyBytes) -> Self {
        Self(bytes)
    }

    /// Whether this is the all-zero factory key
    pub fn is_factory_default(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub(crate) const fn as_bytes(&self) -> &KeyBytes {
        &self.0
    }
}

impl FromStr for MasterKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut key = KeyBytes::default();
        hex::decode_to_slice(s.trim(), &mut key).map_err(|e| {
            Error::Configuration(format!("master key must be {BLOCK_SIZE} hex bytes: {e}"))
        })?;
        Ok(Self(key))
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for MasterKey {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex = <String as serde::Deserialize>::deserialize(deserializer)?;
        hex.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-tag key diversified from the master key
///
/// Lives for a single validation and is wiped when dropped.
#[derive(Clone, Default, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey(KeyBytes);

impl DerivedKey {
    pub(crate) const fn new(bytes: KeyBytes) -> Self {
        Self(bytes)
    }

    /// Raw key bytes
    pub const fn as_bytes(&self) -> &KeyBytes {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey(..)")
    }
}

/// Purpose a tag key is diversified for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyPurpose {
    /// Key protecting encrypted PICC data
    PiccData = 1,
    /// SDM file read key, authenticates plain SUN messages
    SdmFileRead = 2,
}

impl KeyPurpose {
    /// Purpose identifier mixed into the diversification input
    pub const fn id(self) -> u8 {
        self as u8
    }
}

/// Cryptographic primitive that authenticated a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum EncMode {
    /// AES-128 CMAC
    #[display("STANDARD")]
    Standard,
    /// Leakage Resilient Primitive CMAC
    #[display("LEAKAGE_RESILIENT")]
    LeakageResilient,
}

/// Outcome of a successful plain SUN validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VerificationResult {
    /// UID of the tag that produced the message
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_display"))]
    pub uid: Uid,
    /// Read counter carried by the message
    pub read_ctr: u32,
    /// Primitive under which the MAC matched
    pub enc_mode: EncMode,
}

#[cfg(feature = "serde")]
fn serialize_display<T: fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> core::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_key_from_hex() {
        let key: MasterKey = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
        assert_eq!(key.as_bytes()[15], 0x0F);
        assert!(!key.is_factory_default());

        let zero: MasterKey = "00000000000000000000000000000000".parse().unwrap();
        assert!(zero.is_factory_default());
    }

    #[test]
    fn test_master_key_rejects_bad_input() {
        assert!(matches!(
            "0001".parse::<MasterKey>(),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            "zz0102030405060708090a0b0c0d0e0f".parse::<MasterKey>(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_keys_are_redacted() {
        let key = MasterKey::new([0x42; 16]);
        assert_eq!(format!("{key:?}"), "MasterKey(..)");
        assert_eq!(format!("{:?}", DerivedKey::new([0x42; 16])), "DerivedKey(..)");
    }

    #[test]
    fn test_enc_mode_names() {
        assert_eq!(EncMode::Standard.to_string(), "STANDARD");
        assert_eq!(EncMode::LeakageResilient.to_string(), "LEAKAGE_RESILIENT");
        assert_eq!(KeyPurpose::SdmFileRead.id(), 2);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_verification_result_json() {
        let result = VerificationResult {
            uid: "04112233445566".parse().unwrap(),
            read_ctr: 1,
            enc_mode: EncMode::Standard,
        };
        let json = serde_json::to_value(result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"uid": "04112233445566", "read_ctr": 1, "enc_mode": "STANDARD"})
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_master_key_deserialize() {
        let key: MasterKey =
            serde_json::from_str("\"000102030405060708090a0b0c0d0e0f\"").unwrap();
        assert_eq!(key.as_bytes(), &core::array::from_fn::<u8, 16, _>(|i| i as u8));
        assert!(serde_json::from_str::<MasterKey>("\"00\"").is_err());
    }
}
