use crate::codec::Field;
use crate::types::EncMode;

/// Result type for SDM operations
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for SDM operations
///
/// Messages name the failure category only. They never carry key material or
/// computed MAC values.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A hex field failed to decode or had the wrong width
    #[error("Malformed {field}: {source}")]
    MalformedInput {
        /// Field that failed to decode
        field: Field,
        /// Underlying decoding failure
        source: DecodeError,
    },

    /// No supported primitive produced the presented MAC
    #[error("Invalid message (most probably wrong signature)")]
    InvalidMessage,

    /// The MAC validated under a primitive the deployment does not accept
    #[error("Invalid encryption mode, expected {required}")]
    PolicyViolation {
        /// Mode required by the policy
        required: EncMode,
        /// Mode that authenticated the message
        observed: EncMode,
    },

    /// Startup configuration is unusable
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl Error {
    /// Short machine-readable category of the error
    pub const fn category(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => "malformed_input",
            Self::InvalidMessage => "invalid_message",
            Self::PolicyViolation { .. } => "policy_violation",
            Self::Configuration(_) => "configuration",
        }
    }
}

/// Failure to turn a hex string into a fixed-width field
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// The string is not valid hexadecimal
    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// The decoded bytes do not match the field width
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected length in bytes
        expected: usize,
        /// Actual length in bytes
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_from_hex_error() {
        let err = DecodeError::from(hex::FromHexError::OddLength);
        assert_eq!(err, DecodeError::InvalidHex(hex::FromHexError::OddLength));
        assert_ne!(
            err,
            DecodeError::InvalidLength {
                expected: 7,
                actual: 6
            }
        );
    }

    #[test]
    fn test_categories() {
        let malformed = Error::MalformedInput {
            field: Field::Mac,
            source: DecodeError::InvalidHex(hex::FromHexError::OddLength),
        };
        assert_eq!(malformed.category(), "malformed_input");
        assert_eq!(Error::InvalidMessage.category(), "invalid_message");
        assert_eq!(
            Error::PolicyViolation {
                required: EncMode::LeakageResilient,
                observed: EncMode::Standard,
            }
            .category(),
            "policy_violation"
        );
    }
}
