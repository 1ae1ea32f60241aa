//! Private keys
//!
//! SEC1 `ECPrivateKey` structure:
//!
//! ```text
//! ECPrivateKey ::= SEQUENCE {
//!     version        INTEGER { ecPrivkeyVer1(1) },
//!     privateKey     OCTET STRING,
//!     parameters [0] OBJECT IDENTIFIER OPTIONAL,
//!     publicKey  [1] BIT STRING OPTIONAL
//! }
//! ```

use std::fmt;

use zeroize::{Zeroize, Zeroizing};

use crate::buffer::IntoByteView;
use crate::config::KeyConfig;
use crate::crypto::curves::{EcCurve, ScalarBytes};
use crate::crypto::nonce::{NonceSource, OsRngNonce};
use crate::crypto::point::{decode_point, PointEncoding};
use crate::ecdsa::{self, Payload};
use crate::encoding::der::DerNode;
use crate::encoding::pem;
use crate::encoding::signature::{EncodedSignature, SignatureFormat};
use crate::error::{EcdsaError, EcdsaResult};
use crate::keys::VerifyingKey;
use crate::{log_debug, log_warn};

const EC_PRIVKEY_VER1: u8 = 1;

/// ECDSA private key; the scalar is zeroized on drop
#[derive(Clone)]
pub struct SigningKey {
    secret: ScalarBytes,
    verifying_key: VerifyingKey,
}

impl SigningKey {
    // MARK: - Import

    /// Big-endian scalar of exactly `order_len` bytes
    pub fn from_string<'a>(input: impl IntoByteView<'a>, curve: EcCurve) -> EcdsaResult<Self> {
        Self::from_string_with(input, KeyConfig::for_curve(curve))
    }

    pub fn from_string_with<'a>(
        input: impl IntoByteView<'a>,
        config: KeyConfig,
    ) -> EcdsaResult<Self> {
        config.validate()?;
        let secret = Zeroizing::new(input.into_byte_view().into_owned());
        config.curve.check_scalar(&secret, "private scalar")?;
        let public = config.curve.math().mul_base(&secret)?;
        let verifying_key = VerifyingKey::from_public_point(public, config)?;
        Ok(Self {
            secret,
            verifying_key,
        })
    }

    /// Decode SEC1 DER; the key must name its curve in `[0]`
    pub fn from_der<'a>(input: impl IntoByteView<'a>) -> EcdsaResult<Self> {
        Self::parse_der(&input.into_byte_view(), None)
    }

    /// Decode SEC1 DER. `config.curve` is used when `[0]` is absent; a
    /// curve named in the DER always wins.
    pub fn from_der_with<'a>(input: impl IntoByteView<'a>, config: KeyConfig) -> EcdsaResult<Self> {
        Self::parse_der(&input.into_byte_view(), Some(config))
    }

    pub fn from_pem(text: &str) -> EcdsaResult<Self> {
        Self::from_der(pem::decode(text, pem::EC_PRIVATE_KEY_LABEL)?)
    }

    pub fn from_pem_with(text: &str, config: KeyConfig) -> EcdsaResult<Self> {
        Self::from_der_with(pem::decode(text, pem::EC_PRIVATE_KEY_LABEL)?, config)
    }

    fn parse_der(bytes: &[u8], base: Option<KeyConfig>) -> EcdsaResult<Self> {
        let sec1 = DerNode::decode(bytes)?;
        let fields = sec1.as_sequence()?;
        if !(2..=4).contains(&fields.len()) {
            return Err(EcdsaError::malformed(format!(
                "ECPrivateKey must have 2 to 4 elements, found {}",
                fields.len()
            )));
        }

        if fields[0].as_integer()? != [EC_PRIVKEY_VER1] {
            return Err(EcdsaError::malformed("unsupported ECPrivateKey version"));
        }
        let octets = fields[1].as_octet_string()?;

        let mut parameters = None;
        let mut public_key = None;
        for field in &fields[2..] {
            match field {
                // [0] must precede [1], each at most once
                DerNode::ContextSpecific { tag: 0, inner }
                    if parameters.is_none() && public_key.is_none() =>
                {
                    parameters = Some(inner.as_oid()?);
                }
                DerNode::ContextSpecific { tag: 1, inner } if public_key.is_none() => {
                    public_key = Some(inner.as_bit_string()?);
                }
                _ => {
                    return Err(EcdsaError::malformed(
                        "unexpected optional field in ECPrivateKey",
                    ))
                }
            }
        }

        let config = match (parameters, base) {
            (Some(oid), Some(base)) => base.on_curve(EcCurve::from_oid(oid)?),
            (Some(oid), None) => KeyConfig::for_curve(EcCurve::from_oid(oid)?),
            (None, Some(base)) => base,
            (None, None) => {
                return Err(EcdsaError::unsupported_curve(
                    "ECPrivateKey does not name its curve",
                ))
            }
        };
        let curve = config.curve;

        // Some encoders drop leading zero bytes of the scalar
        let len = curve.order_len();
        if octets.len() > len {
            return Err(EcdsaError::malformed(format!(
                "private key is {} bytes, {} allows at most {}",
                octets.len(),
                curve,
                len
            )));
        }
        let mut secret = Zeroizing::new(vec![0u8; len]);
        secret[len - octets.len()..].copy_from_slice(octets);

        let embedded = match public_key {
            Some(embedded) => embedded,
            None => return Self::from_string_with(secret.as_slice(), config),
        };
        let point = decode_point(embedded, curve).map_err(|e| {
            log_debug!("keys", "rejected embedded public key", curve = curve, len = embedded.len(), error = e);
            e
        })?;

        if config.validate_embedded_public_key {
            let key = Self::from_string_with(secret.as_slice(), config)?;
            if &point != key.verifying_key.point() {
                log_warn!("keys", "embedded public key mismatch", curve = curve);
                return Err(EcdsaError::malformed(
                    "embedded public key does not match the private scalar",
                ));
            }
            return Ok(key);
        }

        // Trusted as given
        curve.check_scalar(&secret, "private scalar")?;
        let verifying_key = VerifyingKey::from_public_point(point, config)?;
        Ok(Self {
            secret,
            verifying_key,
        })
    }

    // MARK: - Export

    /// Big-endian scalar, `order_len` bytes
    pub fn to_string(&self) -> Zeroizing<Vec<u8>> {
        self.secret.clone()
    }

    /// SEC1 DER with the curve OID and the public key in `encoding`
    pub fn to_der(&self, encoding: PointEncoding) -> EcdsaResult<Zeroizing<Vec<u8>>> {
        if encoding == PointEncoding::Raw {
            return Err(EcdsaError::malformed(
                "raw point encoding cannot be embedded in ECPrivateKey",
            ));
        }
        let node = DerNode::Sequence(vec![
            DerNode::integer(&[EC_PRIVKEY_VER1]),
            DerNode::OctetString(self.secret.to_vec()),
            DerNode::context(0, DerNode::ObjectIdentifier(self.curve().oid())),
            DerNode::context(1, DerNode::BitString(self.verifying_key.to_string(encoding))),
        ]);
        let der = Zeroizing::new(node.encode()?);
        if let DerNode::Sequence(mut fields) = node {
            if let DerNode::OctetString(secret) = &mut fields[1] {
                secret.zeroize();
            }
        }
        Ok(der)
    }

    pub fn to_pem(&self, encoding: PointEncoding) -> EcdsaResult<Zeroizing<String>> {
        let der = self.to_der(encoding)?;
        Ok(Zeroizing::new(pem::encode(&der, pem::EC_PRIVATE_KEY_LABEL)))
    }

    // MARK: - Accessors

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    pub fn curve(&self) -> EcCurve {
        self.verifying_key.curve()
    }

    pub fn config(&self) -> &KeyConfig {
        self.verifying_key.config()
    }

    // MARK: - Signing

    /// Hash and sign `message` with a fresh nonce, in the configured format
    pub fn sign<'a>(&self, message: impl IntoByteView<'a>) -> EcdsaResult<EncodedSignature> {
        self.sign_with(
            Payload::Message(message.into_byte_view()),
            self.config().signature_format,
            &mut OsRngNonce,
        )
    }

    /// Sign a precomputed digest with a fresh nonce
    pub fn sign_digest<'a>(&self, digest: impl IntoByteView<'a>) -> EcdsaResult<EncodedSignature> {
        self.sign_with(
            Payload::Digest(digest.into_byte_view()),
            self.config().signature_format,
            &mut OsRngNonce,
        )
    }

    pub fn sign_with(
        &self,
        payload: Payload<'_>,
        format: SignatureFormat,
        nonces: &mut dyn NonceSource,
    ) -> EcdsaResult<EncodedSignature> {
        let config = self.config();
        let digest = payload.digest(config.hash);
        let signature = ecdsa::sign_digest(
            config.curve,
            &self.secret,
            &digest,
            nonces,
            config.max_nonce_attempts,
        )?;
        signature.encode(format)
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("curve", &self.curve())
            .field("secret", &"[REDACTED]")
            .field("verifying_key", &self.verifying_key)
            .finish()
    }
}

impl PartialEq for SigningKey {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.curve() == other.curve() && bool::from(self.secret.as_slice().ct_eq(&other.secret))
    }
}

impl Eq for SigningKey {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::hash::HashAlgorithm;
    use crate::crypto::nonce::FixedNonces;

    const SECRET: &str = "5ec8420bd6ef9252a942e989043ca29f561fa525770eb1c5";
    const SEC1_P192: &str = "305f02010104185ec8420bd6ef9252a942e989043ca29f561fa525770eb1c5\
                             a00a06082a8648ce3d030101a13403320004\
                             b88177d084ef17f5e45639408028360f9f59b4a4d7264e62\
                             da0651dce47a35a4c5b45cf51593423a8b557b9c2099f36c";

    fn sec1_fields(der: &[u8]) -> Vec<DerNode> {
        DerNode::decode(der).unwrap().as_sequence().unwrap().to_vec()
    }

    #[test]
    fn test_from_der_roundtrip() {
        let der = hex::decode(SEC1_P192).unwrap();
        let sk = SigningKey::from_der(&der).unwrap();
        assert_eq!(sk.curve(), EcCurve::NistP192);
        assert_eq!(hex::encode(sk.to_string().as_slice()), SECRET);
        assert_eq!(sk.to_der(PointEncoding::Uncompressed).unwrap().as_slice(), der.as_slice());
    }

    #[test]
    fn test_wrong_scalar_length() {
        assert!(matches!(
            SigningKey::from_string(&[1u8; 23], EcCurve::NistP192),
            Err(EcdsaError::MalformedEncoding(_))
        ));
        assert!(matches!(
            SigningKey::from_string(&[0u8; 24], EcCurve::NistP192),
            Err(EcdsaError::OutOfRangeScalar(_))
        ));
        let order = EcCurve::NistP192.order();
        assert!(matches!(
            SigningKey::from_string(&order, EcCurve::NistP192),
            Err(EcdsaError::OutOfRangeScalar(_))
        ));
    }

    #[test]
    fn test_missing_curve_needs_config() {
        let der = hex::decode(SEC1_P192).unwrap();
        let fields = sec1_fields(&der);
        let stripped = DerNode::Sequence(vec![fields[0].clone(), fields[1].clone()])
            .encode()
            .unwrap();

        assert!(matches!(
            SigningKey::from_der(&stripped),
            Err(EcdsaError::UnsupportedCurve(_))
        ));
        let sk = SigningKey::from_der_with(&stripped, KeyConfig::for_curve(EcCurve::NistP192)).unwrap();
        assert_eq!(sk, SigningKey::from_der(&der).unwrap());
    }

    #[test]
    fn test_short_scalar_is_padded() {
        let mut secret = vec![0u8; 24];
        secret[23] = 7;
        let sk = SigningKey::from_string(&secret, EcCurve::NistP192).unwrap();
        let stripped = DerNode::Sequence(vec![
            DerNode::integer(&[1]),
            DerNode::OctetString(vec![7]),
            DerNode::context(0, DerNode::ObjectIdentifier(EcCurve::NistP192.oid())),
        ])
        .encode()
        .unwrap();
        assert_eq!(SigningKey::from_der(&stripped).unwrap(), sk);
    }

    #[test]
    fn test_embedded_public_key_mismatch() {
        let der = hex::decode(SEC1_P192).unwrap();
        let fields = sec1_fields(&der);
        let other = SigningKey::from_string(&[0x11u8; 24], EcCurve::NistP192).unwrap();
        let forged = DerNode::Sequence(vec![
            fields[0].clone(),
            fields[1].clone(),
            fields[2].clone(),
            DerNode::context(
                1,
                DerNode::BitString(other.verifying_key().to_string(PointEncoding::Uncompressed)),
            ),
        ])
        .encode()
        .unwrap();

        // trusted by default
        let trusted = SigningKey::from_der(&forged).unwrap();
        assert_eq!(trusted.to_string().as_slice(), hex::decode(SECRET).unwrap().as_slice());
        assert_eq!(trusted.verifying_key(), other.verifying_key());

        let strict = KeyConfig::default().validating_embedded_public_key();
        assert!(matches!(
            SigningKey::from_der_with(&forged, strict.clone()),
            Err(EcdsaError::MalformedEncoding(_))
        ));
        assert!(SigningKey::from_der_with(&der, strict).is_ok());
    }

    #[test]
    fn test_embedded_public_key_must_decode() {
        let der = hex::decode(SEC1_P192).unwrap();
        let fields = sec1_fields(&der);
        let with_public = |point: Vec<u8>| {
            DerNode::Sequence(vec![
                fields[0].clone(),
                fields[1].clone(),
                fields[2].clone(),
                DerNode::context(1, DerNode::BitString(point)),
            ])
            .encode()
            .unwrap()
        };

        assert!(matches!(
            SigningKey::from_der(&with_public(vec![0xff, 0xee, 0xdd])),
            Err(EcdsaError::MalformedEncoding(_))
        ));

        let mut off_curve = hex::decode(&SEC1_P192[SEC1_P192.len() - 98..]).unwrap();
        *off_curve.last_mut().unwrap() ^= 0x01;
        assert!(matches!(
            SigningKey::from_der(&with_public(off_curve)),
            Err(EcdsaError::PointNotOnCurve(_))
        ));

        assert!(matches!(
            SigningKey::from_der(&with_public(vec![0x00])),
            Err(EcdsaError::PointNotOnCurve(_))
        ));
    }

    #[test]
    fn test_bad_version() {
        let mut der = hex::decode(SEC1_P192).unwrap();
        der[4] = 0x02;
        assert!(matches!(
            SigningKey::from_der(&der),
            Err(EcdsaError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_sign_with_fixed_nonce() {
        let config = KeyConfig::for_curve(EcCurve::NistP192).with_hash(HashAlgorithm::Sha1);
        let sk = SigningKey::from_string_with(hex::decode(SECRET).unwrap(), config).unwrap();
        let k = hex::decode("1234567890abcdef1234567890abcdef1234567890abcdef").unwrap();
        let mut nonces = FixedNonces::new([&k]);
        let message = b"hello";
        let sig = sk
            .sign_with(Payload::Message(message.into_byte_view()), SignatureFormat::Raw, &mut nonces)
            .unwrap();
        assert_eq!(
            hex::encode(&sig.as_bytes().unwrap()[..24]),
            "2ae8d53f79bae625dd1236bc270c62ac0e8e6dad889b10d1"
        );
        assert!(sk.verifying_key().verify(&sig, message, SignatureFormat::Raw).is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let sk = SigningKey::from_string(hex::decode(SECRET).unwrap(), EcCurve::NistP192).unwrap();
        let debug = format!("{:?}", sk);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(SECRET));
    }
}
