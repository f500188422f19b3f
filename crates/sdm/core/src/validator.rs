//! Plain SUN message validation
//!
//! The scanned URL does not say which primitive produced the MAC, so the
//! validator tries each supported primitive in priority order and reports the
//! first one whose MAC matches.

use subtle::ConstantTimeEq;
use tracing::{debug, trace, warn};

use crate::codec::{ReadCounter, SdmMac, Uid};
use crate::derive::{DerivationMode, KeyDerivation};
use crate::error::{Error, Result};
use crate::mac::{DEFAULT_AUTHENTICATORS, MessageAuthenticator};
use crate::policy::ModePolicy;
use crate::types::{KeyPurpose, MasterKey, VerificationResult};

/// Validate a plain SUN message against an explicit master key and strategy
///
/// Derives the SDM file read key for `uid`, then tries every primitive in
/// `authenticators` in order, comparing in constant time. No policy is applied.
pub fn validate_plain_sun(
    uid: &Uid,
    read_ctr: ReadCounter,
    sdmmac: &SdmMac,
    master_key: &MasterKey,
    derivation: &dyn KeyDerivation,
    authenticators: &[&dyn MessageAuthenticator],
) -> Result<VerificationResult> {
    let key = derivation.derive_key(master_key, uid, KeyPurpose::SdmFileRead);

    for authenticator in authenticators {
        trace!(mode = %authenticator.mode(), "Trying primitive");
        let candidate = authenticator.authenticate(&key, uid, read_ctr);
        if bool::from(candidate.ct_eq(sdmmac)) {
            return Ok(VerificationResult {
                uid: *uid,
                read_ctr: read_ctr.value(),
                enc_mode: authenticator.mode(),
            });
        }
    }

    Err(Error::InvalidMessage)
}

/// Validator holding the deployment's master key, strategy and policy
///
/// Built once at startup and shared freely: it holds no mutable state.
#[derive(Debug)]
pub struct SunValidator {
    master_key: MasterKey,
    derivation: &'static dyn KeyDerivation,
    authenticators: &'static [&'static dyn MessageAuthenticator],
    policy: ModePolicy,
}

impl SunValidator {
    /// Create a validator accepting every supported primitive
    pub fn new(master_key: MasterKey, mode: DerivationMode) -> Self {
        if master_key.is_factory_default() {
            warn!("Master key is the all-zero factory key; tag keys are not diversified");
        }
        debug!(derivation = %mode, "Created SUN validator");

        Self {
            master_key,
            derivation: mode.strategy(),
            authenticators: DEFAULT_AUTHENTICATORS,
            policy: ModePolicy::default(),
        }
    }

    /// Set the mode policy applied after validation
    pub fn with_policy(mut self, policy: ModePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the ordered list of primitives to try
    pub fn with_authenticators(
        mut self,
        authenticators: &'static [&'static dyn MessageAuthenticator],
    ) -> Self {
        self.authenticators = authenticators;
        self
    }

    /// The configured mode policy
    pub const fn policy(&self) -> ModePolicy {
        self.policy
    }

    /// Validate a decoded plain SUN message and apply the mode policy
    pub fn validate(
        &self,
        uid: &Uid,
        read_ctr: ReadCounter,
        sdmmac: &SdmMac,
    ) -> Result<VerificationResult> {
        debug!(%uid, %read_ctr, "Validating plain SUN message");

        let result = validate_plain_sun(
            uid,
            read_ctr,
            sdmmac,
            &self.master_key,
            self.derivation,
            self.authenticators,
        )
        .inspect_err(|_| debug!(%uid, %read_ctr, "No primitive matched the presented MAC"))?;

        debug!(%uid, %read_ctr, enc_mode = %result.enc_mode, "Message authenticated");
        self.policy.check(result)
    }

    /// Decode the three mirrored hex fields and validate them
    pub fn validate_hex(
        &self,
        uid: &str,
        read_ctr: &str,
        sdmmac: &str,
    ) -> Result<VerificationResult> {
        let uid: Uid = uid.parse()?;
        let read_ctr: ReadCounter = read_ctr.parse()?;
        let sdmmac: SdmMac = sdmmac.parse()?;
        self.validate(&uid, read_ctr, &sdmmac)
    }
}
