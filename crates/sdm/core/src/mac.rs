//! SDMMAC computation for plain SUN messages
//!
//! Both primitives follow the same shape: build a session vector from the UID
//! and the counter, derive a session MAC key from it under the tag key, MAC
//! the (empty) mirrored file data with the session key and keep the odd bytes.

use core::fmt;

use zeroize::Zeroize;

use crate::codec::{ReadCounter, SdmMac, Uid};
use crate::constants::{READ_COUNTER_LENGTH, UID_LENGTH, session_vector};
use crate::crypto::{Block, aes_cmac, truncate_mac};
use crate::lrp::Lrp;
use crate::types::{DerivedKey, EncMode};

/// PICC data authenticated by a plain SUN message: `UID || counter (LSB first)`
pub const PICC_DATA_LENGTH: usize = UID_LENGTH + READ_COUNTER_LENGTH;

/// Build the PICC data block
pub fn picc_data(uid: &Uid, read_ctr: ReadCounter) -> [u8; PICC_DATA_LENGTH] {
    let mut data = [0u8; PICC_DATA_LENGTH];
    data[..UID_LENGTH].copy_from_slice(uid.as_bytes());
    data[UID_LENGTH..].copy_from_slice(&read_ctr.to_le_bytes());
    data
}

/// SV2 for the AES session MAC key
///
/// `3C C3 00 01 00 80 || PICC data`, zero padded to a whole block.
pub fn aes_session_vector(uid: &Uid, read_ctr: ReadCounter) -> Block {
    let prefix = session_vector::AES_MAC;
    let mut sv = Block::default();
    sv[..prefix.len()].copy_from_slice(&prefix);
    sv[prefix.len()..prefix.len() + PICC_DATA_LENGTH].copy_from_slice(&picc_data(uid, read_ctr));
    sv
}

/// SV for the LRP session key
///
/// `00 01 00 80 || PICC data || zero padding || 1E E1`, one block in total.
pub fn lrp_session_vector(uid: &Uid, read_ctr: ReadCounter) -> Block {
    let prefix = session_vector::LRP_PREFIX;
    let suffix = session_vector::LRP_SUFFIX;
    let mut sv = Block::default();
    sv[..prefix.len()].copy_from_slice(&prefix);
    sv[prefix.len()..prefix.len() + PICC_DATA_LENGTH].copy_from_slice(&picc_data(uid, read_ctr));
    let start = sv.len() - suffix.len();
    sv[start..].copy_from_slice(&suffix);
    sv
}

/// A MAC primitive a tag may have been configured with
pub trait MessageAuthenticator: fmt::Debug + Send + Sync {
    /// Mode reported when this primitive authenticates a message
    fn mode(&self) -> EncMode;

    /// Compute the truncated SDMMAC for a plain SUN message
    fn authenticate(&self, key: &DerivedKey, uid: &Uid, read_ctr: ReadCounter) -> SdmMac;
}

/// AES-128 CMAC (AN12196)
#[derive(Debug, Clone, Copy, Default)]
pub struct AesAuthenticator;

impl MessageAuthenticator for AesAuthenticator {
    fn mode(&self) -> EncMode {
        EncMode::Standard
    }

    fn authenticate(&self, key: &DerivedKey, uid: &Uid, read_ctr: ReadCounter) -> SdmMac {
        let mut session_key = aes_cmac(key.as_bytes(), &aes_session_vector(uid, read_ctr));
        let mut full = aes_cmac(&session_key, &[]);
        let mac = SdmMac::new(truncate_mac(&full));

        session_key.zeroize();
        full.zeroize();
        mac
    }
}

/// LRP CMAC (AN12304)
#[derive(Debug, Clone, Copy, Default)]
pub struct LrpAuthenticator;

impl MessageAuthenticator for LrpAuthenticator {
    fn mode(&self) -> EncMode {
        EncMode::LeakageResilient
    }

    fn authenticate(&self, key: &DerivedKey, uid: &Uid, read_ctr: ReadCounter) -> SdmMac {
        let mut session_key = Lrp::new(key.as_bytes()).cmac(&lrp_session_vector(uid, read_ctr));
        let mut full = Lrp::new(&session_key).cmac(&[]);
        let mac = SdmMac::new(truncate_mac(&full));

        session_key.zeroize();
        full.zeroize();
        mac
    }
}

/// Primitives tried by the validator, in priority order
///
/// AES comes first: when both primitives would match, the message is
/// reported as [`EncMode::Standard`].
pub const DEFAULT_AUTHENTICATORS: &[&dyn MessageAuthenticator] =
    &[&AesAuthenticator, &LrpAuthenticator];
