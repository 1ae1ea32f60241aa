//! Unified error types for key and signature interchange
//!
//! Every decoding and verification path reports one of a small, fixed set
//! of error kinds so callers can tell corrupted transport apart from a
//! forged or incorrect signature.

use serde::{Deserialize, Serialize};

/// Main error type for all interchange operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcdsaError {
    /// Input rejected by the buffer normalizer before any crypto logic ran
    #[error("Invalid input type: {0}")]
    InvalidInputType(String),

    /// Structural or length violation in point, DER, PEM or signature bytes
    #[error("Malformed encoding: {0}")]
    MalformedEncoding(String),

    /// Unknown curve OID, or no curve declared where one is needed
    #[error("Unsupported curve: {0}")]
    UnsupportedCurve(String),

    /// Well-formed encoding with coordinates that are not on the curve
    #[error("Point not on curve: {0}")]
    PointNotOnCurve(String),

    /// Scalar, nonce, r or s outside [1, order-1]
    #[error("Scalar out of range: {0}")]
    OutOfRangeScalar(String),

    /// The verification equation did not hold
    #[error("Signature verification failed")]
    SignatureInvalid,
}

impl EcdsaError {
    // Convenience constructors

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInputType(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedEncoding(msg.into())
    }

    pub fn unsupported_curve(msg: impl Into<String>) -> Self {
        Self::UnsupportedCurve(msg.into())
    }

    pub fn not_on_curve(msg: impl Into<String>) -> Self {
        Self::PointNotOnCurve(msg.into())
    }

    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Self::OutOfRangeScalar(msg.into())
    }

    /// Error code for categorization
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInputType(_) => ErrorCode::InvalidInputType,
            Self::MalformedEncoding(_) => ErrorCode::MalformedEncoding,
            Self::UnsupportedCurve(_) => ErrorCode::UnsupportedCurve,
            Self::PointNotOnCurve(_) => ErrorCode::PointNotOnCurve,
            Self::OutOfRangeScalar(_) => ErrorCode::OutOfRangeScalar,
            Self::SignatureInvalid => ErrorCode::SignatureInvalid,
        }
    }

    /// True for errors caused by the shape of the input rather than by a
    /// failed cryptographic check
    pub fn is_encoding_error(&self) -> bool {
        !matches!(self, Self::SignatureInvalid)
    }
}

/// Error codes for reporting errors as data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidInputType,
    MalformedEncoding,
    UnsupportedCurve,
    PointNotOnCurve,
    OutOfRangeScalar,
    SignatureInvalid,
}

/// Result type alias for interchange operations
pub type EcdsaResult<T> = Result<T, EcdsaError>;

// Conversions from common error types

impl From<base64::DecodeError> for EcdsaError {
    fn from(e: base64::DecodeError) -> Self {
        EcdsaError::malformed(format!("base64: {}", e))
    }
}

impl From<hex::FromHexError> for EcdsaError {
    fn from(e: hex::FromHexError) -> Self {
        EcdsaError::malformed(format!("hex: {}", e))
    }
}

impl From<std::str::Utf8Error> for EcdsaError {
    fn from(e: std::str::Utf8Error) -> Self {
        EcdsaError::malformed(format!("PEM text is not UTF-8: {}", e))
    }
}
