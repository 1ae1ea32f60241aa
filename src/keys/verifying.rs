//! Public keys
//!
//! Import from raw point bytes, SubjectPublicKeyInfo DER or PEM; export to
//! the same; verify signatures in any of the three wire formats.
//!
//! ```text
//! SubjectPublicKeyInfo ::= SEQUENCE {
//!     algorithm  SEQUENCE { id-ecPublicKey OID, namedCurve OID },
//!     subjectPublicKey  BIT STRING  -- SEC1 point
//! }
//! ```

use crate::buffer::IntoByteView;
use crate::config::KeyConfig;
use crate::crypto::curves::EcCurve;
use crate::crypto::point::{decode_point, encode_point, EcPoint, PointEncoding};
use crate::ecdsa::{self, Payload};
use crate::encoding::der::DerNode;
use crate::encoding::oid::{self, ObjectId};
use crate::encoding::pem;
use crate::encoding::signature::{EncodedSignature, Signature, SignatureFormat};
use crate::error::{EcdsaError, EcdsaResult};
use crate::log_debug;

/// ECDSA public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyingKey {
    config: KeyConfig,
    point: EcPoint,
}

impl VerifyingKey {
    // MARK: - Import

    /// Decode a SEC1 point (compressed, uncompressed or bare x ‖ y)
    pub fn from_string<'a>(input: impl IntoByteView<'a>, curve: EcCurve) -> EcdsaResult<Self> {
        Self::from_string_with(input, KeyConfig::for_curve(curve))
    }

    pub fn from_string_with<'a>(
        input: impl IntoByteView<'a>,
        config: KeyConfig,
    ) -> EcdsaResult<Self> {
        config.validate()?;
        let bytes = input.into_byte_view();
        let point = decode_point(&bytes, config.curve).map_err(|e| {
            log_debug!("keys", "rejected public point", curve = config.curve, len = bytes.len(), error = e);
            e
        })?;
        Self::from_public_point(point, config)
    }

    /// Wrap an affine point already known to the caller
    pub fn from_public_point(point: EcPoint, config: KeyConfig) -> EcdsaResult<Self> {
        config.validate()?;
        match &point {
            EcPoint::Infinity => {
                return Err(EcdsaError::not_on_curve(
                    "the point at infinity is not a valid public key",
                ))
            }
            EcPoint::Affine { x, y } => {
                if !config.curve.math().is_on_curve(x, y) {
                    return Err(EcdsaError::not_on_curve(format!(
                        "point is not on {}",
                        config.curve
                    )));
                }
            }
        }
        Ok(Self { config, point })
    }

    /// Decode SubjectPublicKeyInfo; the curve comes from the DER
    pub fn from_der<'a>(input: impl IntoByteView<'a>) -> EcdsaResult<Self> {
        Self::parse_der(&input.into_byte_view(), None)
    }

    /// Like [`from_der`](Self::from_der), keeping the other settings of `config`
    pub fn from_der_with<'a>(input: impl IntoByteView<'a>, config: KeyConfig) -> EcdsaResult<Self> {
        Self::parse_der(&input.into_byte_view(), Some(config))
    }

    pub fn from_pem(text: &str) -> EcdsaResult<Self> {
        Self::from_der(pem::decode(text, pem::PUBLIC_KEY_LABEL)?)
    }

    pub fn from_pem_with(text: &str, config: KeyConfig) -> EcdsaResult<Self> {
        Self::from_der_with(pem::decode(text, pem::PUBLIC_KEY_LABEL)?, config)
    }

    fn parse_der(bytes: &[u8], base: Option<KeyConfig>) -> EcdsaResult<Self> {
        let spki = DerNode::decode(bytes)?;
        let (algorithm, public_key) = match spki.as_sequence()? {
            [algorithm, public_key] => (algorithm, public_key),
            other => {
                return Err(EcdsaError::malformed(format!(
                    "SubjectPublicKeyInfo must have 2 elements, found {}",
                    other.len()
                )))
            }
        };

        let curve = match algorithm.as_sequence()? {
            [algorithm_oid, parameters] => {
                let algorithm_oid = algorithm_oid.as_oid()?;
                if !algorithm_oid.matches(oid::EC_PUBLIC_KEY) {
                    return Err(EcdsaError::malformed(format!(
                        "unexpected public key algorithm {}",
                        algorithm_oid
                    )));
                }
                EcCurve::from_oid(parameters.as_oid()?)?
            }
            other => {
                return Err(EcdsaError::malformed(format!(
                    "AlgorithmIdentifier must have 2 elements, found {}",
                    other.len()
                )))
            }
        };

        let config = match base {
            Some(base) => base.on_curve(curve),
            None => KeyConfig::for_curve(curve),
        };
        Self::from_string_with(public_key.as_bit_string()?, config)
    }

    // MARK: - Export

    pub fn to_string(&self, encoding: PointEncoding) -> Vec<u8> {
        encode_point(&self.point, encoding)
    }

    /// Point bytes in the configured `point_encoding`
    pub fn to_encoded_point(&self) -> Vec<u8> {
        self.to_string(self.config.point_encoding)
    }

    /// SubjectPublicKeyInfo DER; `Raw` has no SEC1 tag and is rejected
    pub fn to_der(&self, encoding: PointEncoding) -> EcdsaResult<Vec<u8>> {
        if encoding == PointEncoding::Raw {
            return Err(EcdsaError::malformed(
                "raw point encoding cannot be embedded in SubjectPublicKeyInfo",
            ));
        }
        DerNode::Sequence(vec![
            DerNode::Sequence(vec![
                DerNode::ObjectIdentifier(ObjectId::from_arcs(oid::EC_PUBLIC_KEY)),
                DerNode::ObjectIdentifier(self.curve().oid()),
            ]),
            DerNode::BitString(self.to_string(encoding)),
        ])
        .encode()
    }

    pub fn to_pem(&self, encoding: PointEncoding) -> EcdsaResult<String> {
        Ok(pem::encode(&self.to_der(encoding)?, pem::PUBLIC_KEY_LABEL))
    }

    // MARK: - Accessors

    pub fn curve(&self) -> EcCurve {
        self.config.curve
    }

    pub fn config(&self) -> &KeyConfig {
        &self.config
    }

    pub fn point(&self) -> &EcPoint {
        &self.point
    }

    // MARK: - Verification

    /// Hash `message` with the configured hash, then verify
    pub fn verify<'a>(
        &self,
        signature: &EncodedSignature,
        message: impl IntoByteView<'a>,
        format: SignatureFormat,
    ) -> EcdsaResult<()> {
        self.verify_with(signature, Payload::Message(message.into_byte_view()), format)
    }

    /// Verify against a precomputed digest
    pub fn verify_digest<'a>(
        &self,
        signature: &EncodedSignature,
        digest: impl IntoByteView<'a>,
        format: SignatureFormat,
    ) -> EcdsaResult<()> {
        self.verify_with(signature, Payload::Digest(digest.into_byte_view()), format)
    }

    pub fn verify_with(
        &self,
        signature: &EncodedSignature,
        payload: Payload<'_>,
        format: SignatureFormat,
    ) -> EcdsaResult<()> {
        let signature = Signature::decode_with(
            signature,
            format,
            self.curve(),
            self.config.allow_trailing_der,
        )?;
        self.verify_signature(&signature, payload)
    }

    /// Verify an already decoded signature
    pub fn verify_signature(&self, signature: &Signature, payload: Payload<'_>) -> EcdsaResult<()> {
        let digest = payload.digest(self.config.hash);
        let result = ecdsa::verify_digest(self.curve(), &self.point, &digest, signature);
        if result.is_err() {
            log_debug!("keys", "signature rejected", curve = self.curve(), digest = hex::encode(&digest));
        }
        result
    }
}
