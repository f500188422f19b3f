//! Verification of NTAG 424 DNA Secure Dynamic Messaging (SDM) messages
//!
//! A tag configured for SDM mirrors its UID, a read counter and a truncated
//! MAC into the URL it serves on every tap (a SUN message). This crate checks
//! such a message against a single master key:
//!
//! - [`codec`] decodes the fixed-width hex fields
//! - [`derive`] diversifies the master key into the tag's SDM file read key
//! - [`mac`] computes the SDMMAC under AES-CMAC or LRP-CMAC ([`lrp`])
//! - [`SunValidator`] tries every primitive in order and reports which one matched
//! - [`ModePolicy`] optionally rejects messages authenticated with a disallowed primitive
//!
//! Validation is stateless. Counter freshness (replay protection) is left to
//! the caller, which must persist the last counter seen per UID if required.
//!
//! ```
//! use nexum_sdm::{DerivationMode, EncMode, MasterKey, SunValidator};
//!
//! let validator = SunValidator::new(MasterKey::new([0; 16]), DerivationMode::Standard);
//! let result = validator
//!     .validate_hex("041E3C8A2D6B80", "000006", "4B00064004B0B3D3")
//!     .unwrap();
//!
//! assert_eq!(result.read_ctr, 6);
//! assert_eq!(result.enc_mode, EncMode::Standard);
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]

pub mod codec;
pub mod constants;
mod crypto;
pub mod derive;
mod error;
pub mod lrp;
pub mod mac;
mod policy;
mod types;
mod validator;

pub use codec::{Field, ReadCounter, SdmMac, Uid};
pub use crypto::Block;
pub use derive::{DerivationMode, KeyDerivation, LegacyDerivation, StandardDerivation};
pub use error::{DecodeError, Error, Result};
pub use mac::{AesAuthenticator, LrpAuthenticator, MessageAuthenticator};
pub use policy::ModePolicy;
pub use types::{DerivedKey, EncMode, KeyBytes, KeyPurpose, MasterKey, VerificationResult};
pub use validator::{SunValidator, validate_plain_sun};
