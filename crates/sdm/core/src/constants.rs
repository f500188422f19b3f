//! Constants used in SDM message verification
//!
//! This module contains field widths, key derivation labels and the session
//! vector prefixes defined by NXP for NTAG 424 DNA (AN12196, AN12304).

/// Length of an AES-128 key or block in bytes
pub const BLOCK_SIZE: usize = 16;

/// Length of a tag UID in bytes
pub const UID_LENGTH: usize = 7;

/// Length of the mirrored SDM read counter in bytes
pub const READ_COUNTER_LENGTH: usize = 3;

/// Length of the truncated SDMMAC in bytes
pub const SDMMAC_LENGTH: usize = 8;

/// Largest value a 3-byte read counter can carry
pub const READ_COUNTER_MAX: u32 = 0x00FF_FFFF;

/// Session vector prefixes for SDM session key generation
pub mod session_vector {
    /// SV2 prefix for the AES SDM MAC session key
    pub const AES_MAC: [u8; 6] = [0x3C, 0xC3, 0x00, 0x01, 0x00, 0x80];
    /// SV prefix for the LRP SDM session key
    pub const LRP_PREFIX: [u8; 4] = [0x00, 0x01, 0x00, 0x80];
    /// SV suffix for the LRP SDM session key
    pub const LRP_SUFFIX: [u8; 2] = [0x1E, 0xE1];
}

/// Key diversification constants
pub mod diversification {
    /// Label of the counter-mode KDF used by the standard strategy
    pub const SLOT_MASTER_KEY: &[u8] = b"SlotMasterKey";
    /// Iteration counter of the single KDF block
    pub const KDF_ITERATION: u8 = 0x01;
    /// Separator between label and context
    pub const KDF_SEPARATOR: u8 = 0x00;
    /// Output length in bits, big-endian
    pub const KDF_OUTPUT_BITS: [u8; 2] = [0x00, 0x80];
    /// Padding marker that terminates the UID in the legacy block
    pub const LEGACY_PADDING: u8 = 0x80;
}

/// LRP construction parameters (AN12304)
pub mod lrp {
    /// Number of precomputed plaintexts (2^m with m = 4)
    pub const PLAINTEXT_COUNT: usize = 16;
    /// Number of updated keys (q)
    pub const UPDATED_KEY_COUNT: usize = 4;
    /// Constant used to step the key generators
    pub const STEP: [u8; 16] = [0x55; 16];
    /// Constant used to draw plaintexts and updated keys
    pub const DRAW: [u8; 16] = [0xAA; 16];
}
