//! Deployment policy over the primitive that authenticated a message

use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{EncMode, VerificationResult};

/// Which primitives a deployment accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ModePolicy {
    /// Accept whichever primitive validated
    #[default]
    Any,
    /// Accept only the given primitive
    Require(EncMode),
}

impl ModePolicy {
    /// Policy for the `require_lrp` switch
    pub const fn from_require_lrp(require_lrp: bool) -> Self {
        if require_lrp {
            Self::Require(EncMode::LeakageResilient)
        } else {
            Self::Any
        }
    }

    /// Whether `mode` satisfies the policy
    pub fn allows(&self, mode: EncMode) -> bool {
        match self {
            Self::Any => true,
            Self::Require(required) => *required == mode,
        }
    }

    /// Pass a cryptographically valid result through the policy
    pub fn check(&self, result: VerificationResult) -> Result<VerificationResult> {
        match self {
            Self::Require(required) if !self.allows(result.enc_mode) => {
                warn!(
                    uid = %result.uid,
                    observed = %result.enc_mode,
                    required = %required,
                    "Rejecting message authenticated with a disallowed mode"
                );
                Err(Error::PolicyViolation {
                    required: *required,
                    observed: result.enc_mode,
                })
            }
            _ => Ok(result),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(enc_mode: EncMode) -> VerificationResult {
        VerificationResult {
            uid: "04112233445566".parse().unwrap(),
            read_ctr: 7,
            enc_mode,
        }
    }

    #[test]
    fn test_any_accepts_everything() {
        let policy = ModePolicy::from_require_lrp(false);
        assert_eq!(policy, ModePolicy::Any);
        for mode in [EncMode::Standard, EncMode::LeakageResilient] {
            assert_eq!(policy.check(result(mode)).unwrap(), result(mode));
        }
    }

    #[test]
    fn test_require_lrp() {
        let policy = ModePolicy::from_require_lrp(true);
        assert!(policy.check(result(EncMode::LeakageResilient)).is_ok());

        let err = policy.check(result(EncMode::Standard)).unwrap_err();
        assert!(matches!(
            err,
            Error::PolicyViolation {
                required: EncMode::LeakageResilient,
                observed: EncMode::Standard,
            }
        ));
        assert_eq!(err.to_string(), "Invalid encryption mode, expected LEAKAGE_RESILIENT");
    }

    #[test]
    fn test_require_standard() {
        let policy = ModePolicy::Require(EncMode::Standard);
        assert!(policy.allows(EncMode::Standard));
        assert!(!policy.allows(EncMode::LeakageResilient));
    }
}
