//! JSON documents printed for each validation

use nexum_sdm::{Error, VerificationResult};
use serde::Serialize;

/// Message reported for an authenticated message
pub(crate) const VALIDATED: &str = "Cryptographic signature validated";

/// Error reported when one of the mirrored parameters is absent
pub(crate) const MISSING_PARAMETERS: &str = "Missing parameters.";

/// Outcome of validating one scanned message
#[derive(Debug, Serialize)]
pub(crate) struct Response {
    pub(crate) valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
    #[serde(flatten)]
    pub(crate) result: Option<VerificationResult>,
}

impl Response {
    pub(crate) const fn success(result: VerificationResult) -> Self {
        Self {
            valid: true,
            message: Some(VALIDATED),
            error: None,
            result: Some(result),
        }
    }

    pub(crate) fn failure(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: None,
            error: Some(error.into()),
            result: None,
        }
    }

    pub(crate) fn missing_parameters() -> Self {
        Self::failure(MISSING_PARAMETERS)
    }
}

impl From<nexum_sdm::Result<VerificationResult>> for Response {
    fn from(outcome: nexum_sdm::Result<VerificationResult>) -> Self {
        match outcome {
            Ok(result) => Self::success(result),
            Err(Error::MalformedInput { .. }) => Self::failure("Failed to decode parameters."),
            Err(Error::InvalidMessage) => {
                Self::failure("Invalid message (most probably wrong signature).")
            }
            Err(Error::PolicyViolation { required, .. }) => {
                Self::failure(format!("Invalid encryption mode, expected {required}."))
            }
            Err(err @ Error::Configuration(_)) => Self::failure(err.to_string()),
        }
    }
}
