//! Per-tag key diversification
//!
//! A deployment picks one [`DerivationMode`] at startup. The mode resolves to a
//! [`KeyDerivation`] strategy once; validations never branch on it again.

use core::fmt;
use core::str::FromStr;

use derive_more::Display;
use zeroize::Zeroize;

use crate::codec::Uid;
use crate::constants::{BLOCK_SIZE, UID_LENGTH, diversification};
use crate::crypto::{Block, aes_cmac, encrypt_block};
use crate::error::{Error, Result};
use crate::types::{DerivedKey, KeyPurpose, MasterKey};

/// Strategy that maps (master key, UID, purpose) to a tag key
pub trait KeyDerivation: fmt::Debug + Send + Sync {
    /// Diversify the master key for one tag. Must be a pure function.
    fn diversify(&self, master_key: &MasterKey, uid: &Uid, purpose: KeyPurpose) -> DerivedKey;

    /// Derive the tag key for `purpose`
    ///
    /// The all-zero factory master key yields the all-zero tag key, matching
    /// tags that were never personalized.
    fn derive_key(&self, master_key: &MasterKey, uid: &Uid, purpose: KeyPurpose) -> DerivedKey {
        if master_key.is_factory_default() {
            return DerivedKey::default();
        }
        self.diversify(master_key, uid, purpose)
    }
}

/// Counter-mode AES-CMAC KDF (NIST SP 800-108), one iteration
///
/// Input block: `01 || "SlotMasterKey" || purpose || 00 || UID || 00 80`
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDerivation;

/// Length of the standard derivation input
const STANDARD_INPUT_LENGTH: usize =
    1 + diversification::SLOT_MASTER_KEY.len() + 1 + 1 + UID_LENGTH + 2;

impl StandardDerivation {
    fn input(uid: &Uid, purpose: KeyPurpose) -> [u8; STANDARD_INPUT_LENGTH] {
        let label = diversification::SLOT_MASTER_KEY;
        let mut input = [0u8; STANDARD_INPUT_LENGTH];

        input[0] = diversification::KDF_ITERATION;
        input[1..1 + label.len()].copy_from_slice(label);

        let mut offset = 1 + label.len();
        input[offset] = purpose.id();
        input[offset + 1] = diversification::KDF_SEPARATOR;
        offset += 2;

        input[offset..offset + UID_LENGTH].copy_from_slice(uid.as_bytes());
        offset += UID_LENGTH;
        input[offset..].copy_from_slice(&diversification::KDF_OUTPUT_BITS);

        input
    }
}

impl KeyDerivation for StandardDerivation {
    fn diversify(&self, master_key: &MasterKey, uid: &Uid, purpose: KeyPurpose) -> DerivedKey {
        DerivedKey::new(aes_cmac(master_key.as_bytes(), &Self::input(uid, purpose)))
    }
}

/// Legacy diversification kept for tags personalized before the KDF
///
/// One AES-128 encryption of `purpose || UID || 80 || 00..` under the master key.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyDerivation;

impl LegacyDerivation {
    fn input(uid: &Uid, purpose: KeyPurpose) -> Block {
        let mut block = [0u8; BLOCK_SIZE];
        block[0] = purpose.id();
        block[1..=UID_LENGTH].copy_from_slice(uid.as_bytes());
        block[UID_LENGTH + 1] = diversification::LEGACY_PADDING;
        block
    }
}

impl KeyDerivation for LegacyDerivation {
    fn diversify(&self, master_key: &MasterKey, uid: &Uid, purpose: KeyPurpose) -> DerivedKey {
        let mut block = Self::input(uid, purpose);
        let key = DerivedKey::new(encrypt_block(master_key.as_bytes(), &block));
        block.zeroize();
        key
    }
}

/// Derivation strategy configured for a deployment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum DerivationMode {
    /// [`LegacyDerivation`]
    #[display("legacy")]
    Legacy,
    /// [`StandardDerivation`]
    #[default]
    #[display("standard")]
    Standard,
}

impl DerivationMode {
    /// Resolve the mode to its strategy
    pub const fn strategy(self) -> &'static dyn KeyDerivation {
        match self {
            Self::Legacy => &LegacyDerivation,
            Self::Standard => &StandardDerivation,
        }
    }
}

impl FromStr for DerivationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "legacy" => Ok(Self::Legacy),
            "standard" => Ok(Self::Standard),
            other => Err(Error::Configuration(format!(
                "invalid derivation mode {other:?}, expected \"legacy\" or \"standard\""
            ))),
        }
    }
}
