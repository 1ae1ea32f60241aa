//! Per-key configuration
//!
//! Every key object carries its own [`KeyConfig`]: curve, hash, default
//! output formats and decoding policy. There is no process-wide default.

use serde::{Deserialize, Serialize};

use crate::crypto::curves::EcCurve;
use crate::crypto::hash::HashAlgorithm;
use crate::crypto::point::PointEncoding;
use crate::encoding::signature::SignatureFormat;
use crate::error::{EcdsaError, EcdsaResult};

/// Default bound on nonce redraws when signing
pub const DEFAULT_MAX_NONCE_ATTEMPTS: u32 = 64;

/// Key settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "KeyConfigDocument")]
pub struct KeyConfig {
    /// Named curve
    pub curve: EcCurve,
    /// Hash applied to messages before signing or verifying
    pub hash: HashAlgorithm,
    /// Format produced by `sign` and `sign_digest`
    pub signature_format: SignatureFormat,
    /// Point form produced by `VerifyingKey::to_encoded_point`
    pub point_encoding: PointEncoding,

    /// Accept bytes after a DER signature
    pub allow_trailing_der: bool,
    /// Check an embedded SEC1 public key against the private scalar
    pub validate_embedded_public_key: bool,
    /// Upper bound on nonce draws for one signature
    pub max_nonce_attempts: u32,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self::for_curve(EcCurve::NistP192)
    }
}

/// Serialized form; absent fields fall back to the curve's defaults
#[derive(Deserialize)]
struct KeyConfigDocument {
    curve: Option<EcCurve>,
    hash: Option<HashAlgorithm>,
    signature_format: Option<SignatureFormat>,
    point_encoding: Option<PointEncoding>,
    allow_trailing_der: Option<bool>,
    validate_embedded_public_key: Option<bool>,
    max_nonce_attempts: Option<u32>,
}

impl From<KeyConfigDocument> for KeyConfig {
    fn from(doc: KeyConfigDocument) -> Self {
        let defaults = Self::for_curve(doc.curve.unwrap_or(EcCurve::NistP192));
        Self {
            curve: defaults.curve,
            hash: doc.hash.unwrap_or(defaults.hash),
            signature_format: doc.signature_format.unwrap_or(defaults.signature_format),
            point_encoding: doc.point_encoding.unwrap_or(defaults.point_encoding),
            allow_trailing_der: doc.allow_trailing_der.unwrap_or(defaults.allow_trailing_der),
            validate_embedded_public_key: doc
                .validate_embedded_public_key
                .unwrap_or(defaults.validate_embedded_public_key),
            max_nonce_attempts: doc.max_nonce_attempts.unwrap_or(defaults.max_nonce_attempts),
        }
    }
}

impl KeyConfig {
    /// Defaults for `curve`, with the curve's default hash
    pub fn for_curve(curve: EcCurve) -> Self {
        Self {
            curve,
            hash: curve.default_hash(),
            signature_format: SignatureFormat::Raw,
            point_encoding: PointEncoding::Raw,
            allow_trailing_der: false,
            validate_embedded_public_key: false,
            max_nonce_attempts: DEFAULT_MAX_NONCE_ATTEMPTS,
        }
    }

    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_signature_format(mut self, format: SignatureFormat) -> Self {
        self.signature_format = format;
        self
    }

    pub fn with_point_encoding(mut self, encoding: PointEncoding) -> Self {
        self.point_encoding = encoding;
        self
    }

    pub fn allowing_trailing_der(mut self) -> Self {
        self.allow_trailing_der = true;
        self
    }

    pub fn validating_embedded_public_key(mut self) -> Self {
        self.validate_embedded_public_key = true;
        self
    }

    /// Same settings on another curve
    pub(crate) fn on_curve(&self, curve: EcCurve) -> Self {
        Self {
            curve,
            ..self.clone()
        }
    }

    /// Parse a JSON document; absent fields take their defaults
    pub fn from_json(json: &str) -> EcdsaResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EcdsaError::invalid_input(format!("invalid key config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> String {
        serde_json::json!(self).to_string()
    }

    /// Validate settings consistency
    pub fn validate(&self) -> EcdsaResult<()> {
        if self.max_nonce_attempts == 0 {
            return Err(EcdsaError::invalid_input(
                "max_nonce_attempts must be at least 1",
            ));
        }
        Ok(())
    }
}
