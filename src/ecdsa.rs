//! ECDSA sign/verify
//!
//! Digest handling, nonce handling and the signing and verification
//! equations. Group and scalar-field operations come from the curve's
//! [`CurveMath`](crate::crypto::curves::CurveMath) backend.
//!
//! ```text
//! sign:    R = k·G,  r = x(R) mod n,  s = k⁻¹(z + r·d) mod n
//! verify:  w = s⁻¹,  R = (z·w)·G + (r·w)·Q,  accept iff x(R) mod n == r
//! ```

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::buffer::ByteView;
use crate::crypto::curves::{is_zero, EcCurve, ScalarBytes};
use crate::crypto::hash::HashAlgorithm;
use crate::crypto::nonce::NonceSource;
use crate::crypto::point::EcPoint;
use crate::encoding::signature::Signature;
use crate::error::{EcdsaError, EcdsaResult};
use crate::log_debug;

/// What is being signed or verified
#[derive(Debug, Clone)]
pub enum Payload<'a> {
    /// Hashed with the key's configured hash first
    Message(ByteView<'a>),
    /// Used as given
    Digest(ByteView<'a>),
}

impl Payload<'_> {
    /// Digest to feed into the ECDSA equations
    pub fn digest(&self, hash: HashAlgorithm) -> Vec<u8> {
        match self {
            Self::Message(message) => hash.digest(message),
            Self::Digest(digest) => digest.to_vec(),
        }
    }
}

/// Convert a digest to an `order_len`-byte integer.
///
/// Keeps the leftmost order-bit-length bits of a longer digest and
/// zero-extends a shorter one on the left.
pub fn truncate_digest(digest: &[u8], curve: EcCurve) -> Vec<u8> {
    let len = curve.order_len();
    let bits = curve.order_bits();

    if digest.len() * 8 <= bits {
        let mut out = vec![0u8; len];
        out[len - digest.len()..].copy_from_slice(digest);
        return out;
    }

    let mut out = digest[..len].to_vec();
    let shift = len * 8 - bits;
    if shift > 0 {
        let mut carry = 0u8;
        for byte in out.iter_mut() {
            let next = *byte << (8 - shift);
            *byte = (*byte >> shift) | carry;
            carry = next;
        }
    }
    out
}

/// Sign a digest with the scalar `secret`.
///
/// Redraws the nonce when r or s comes out zero, at most `max_attempts`
/// times.
pub fn sign_digest(
    curve: EcCurve,
    secret: &[u8],
    digest: &[u8],
    nonces: &mut dyn NonceSource,
    max_attempts: u32,
) -> EcdsaResult<Signature> {
    curve.check_scalar(secret, "private scalar")?;
    let math = curve.math();
    let z = math.reduce(&truncate_digest(digest, curve))?;

    for attempt in 1..=max_attempts {
        let k = nonces.next_nonce(curve)?;
        curve.check_scalar(&k, "nonce")?;

        let r = match math.mul_base(&k)? {
            EcPoint::Affine { x, .. } => math.reduce(&x)?,
            EcPoint::Infinity => Zeroizing::new(vec![0u8; curve.order_len()]),
        };
        if is_zero(&r) {
            log_debug!("ecdsa", "degenerate r, redrawing nonce", attempt = attempt);
            continue;
        }

        let k_inv = math.scalar_invert(&k)?;
        let rd = math.scalar_mul(&r, secret)?;
        let s: ScalarBytes = math.scalar_mul(&k_inv, &math.scalar_add(&z, &rd)?)?;
        if is_zero(&s) {
            log_debug!("ecdsa", "degenerate s, redrawing nonce", attempt = attempt);
            continue;
        }

        return Signature::new(curve, &r, &s);
    }

    Err(EcdsaError::out_of_range(format!(
        "no usable nonce after {} attempts",
        max_attempts
    )))
}

/// Check `signature` over `digest` against the public point `q`
pub fn verify_digest(
    curve: EcCurve,
    q: &EcPoint,
    digest: &[u8],
    signature: &Signature,
) -> EcdsaResult<()> {
    if signature.curve() != curve {
        return Err(EcdsaError::SignatureInvalid);
    }
    let math = curve.math();
    let z = math.reduce(&truncate_digest(digest, curve))?;

    let w = math.scalar_invert(signature.s())?;
    let u1 = math.scalar_mul(&z, &w)?;
    let u2 = math.scalar_mul(signature.r(), &w)?;
    let point = math.add(&math.mul_base(&u1)?, &math.mul(q, &u2)?)?;

    let x = match point {
        EcPoint::Affine { x, .. } => x,
        EcPoint::Infinity => return Err(EcdsaError::SignatureInvalid),
    };
    let v = math.reduce(&x)?;
    if bool::from(v.as_slice().ct_eq(signature.r())) {
        Ok(())
    } else {
        Err(EcdsaError::SignatureInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::nonce::{FixedNonces, OsRngNonce};

    fn scalar(curve: EcCurve, value: u8) -> Vec<u8> {
        let mut out = vec![0u8; curve.order_len()];
        *out.last_mut().unwrap() = value;
        out
    }

    #[test]
    fn test_truncate_short_digest() {
        let digest = [0xabu8; 20];
        let z = truncate_digest(&digest, EcCurve::NistP192);
        assert_eq!(z.len(), 24);
        assert_eq!(&z[..4], &[0, 0, 0, 0]);
        assert_eq!(&z[4..], &digest[..]);
    }

    #[test]
    fn test_truncate_long_digest() {
        let digest: Vec<u8> = (0u8..64).collect();
        let z = truncate_digest(&digest, EcCurve::NistP256);
        assert_eq!(z, digest[..32].to_vec());
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        for curve in EcCurve::ALL {
            let secret = scalar(curve, 42);
            let q = curve.math().mul_base(&secret).unwrap();
            let digest = HashAlgorithm::Sha256.digest(b"roundtrip");
            let sig = sign_digest(curve, &secret, &digest, &mut OsRngNonce, 4).unwrap();
            assert!(verify_digest(curve, &q, &digest, &sig).is_ok());

            let other = HashAlgorithm::Sha256.digest(b"tampered");
            assert_eq!(
                verify_digest(curve, &q, &other, &sig),
                Err(EcdsaError::SignatureInvalid)
            );
        }
    }

    #[test]
    fn test_known_p192_signature() {
        let curve = EcCurve::NistP192;
        let secret = hex::decode("5ec8420bd6ef9252a942e989043ca29f561fa525770eb1c5").unwrap();
        let k = hex::decode("1234567890abcdef1234567890abcdef1234567890abcdef").unwrap();
        let digest = HashAlgorithm::Sha256.digest(b"some string for signing");
        let mut nonces = FixedNonces::new([&k]);
        let sig = sign_digest(curve, &secret, &digest, &mut nonces, 1).unwrap();
        let q = curve.math().mul_base(&secret).unwrap();
        assert!(verify_digest(curve, &q, &digest, &sig).is_ok());

        // r depends only on k
        assert_eq!(
            hex::encode(sig.r()),
            "2ae8d53f79bae625dd1236bc270c62ac0e8e6dad889b10d1"
        );
    }

    #[test]
    fn test_degenerate_s_redraws_nonce() {
        let curve = EcCurve::NistP256;
        let math = curve.math();
        let secret = scalar(curve, 7);
        let k1 = scalar(curve, 3);
        let k2 = scalar(curve, 5);

        // Choose z = -(r1·d) so that s = k⁻¹(z + r1·d) = 0 for the first nonce
        let r1 = math.reduce(math.mul_base(&k1).unwrap().x().unwrap()).unwrap();
        let rd = math.scalar_mul(&r1, &secret).unwrap();
        let mut order_minus_one = curve.order();
        *order_minus_one.last_mut().unwrap() -= 1;
        let z = math.scalar_mul(&rd, &order_minus_one).unwrap();

        let mut nonces = FixedNonces::new([&k1, &k2]);
        let sig = sign_digest(curve, &secret, &z, &mut nonces, 2).unwrap();
        assert_eq!(nonces.remaining(), 0);

        let r2 = math.reduce(math.mul_base(&k2).unwrap().x().unwrap()).unwrap();
        assert_eq!(sig.r(), r2.as_slice());

        let q = math.mul_base(&secret).unwrap();
        assert!(verify_digest(curve, &q, &z, &sig).is_ok());

        // a single attempt is not enough
        let mut nonces = FixedNonces::new([&k1]);
        assert!(matches!(
            sign_digest(curve, &secret, &z, &mut nonces, 1),
            Err(EcdsaError::OutOfRangeScalar(_))
        ));
    }

    #[test]
    fn test_out_of_range_nonce_rejected() {
        let curve = EcCurve::NistP192;
        let mut nonces = FixedNonces::new([curve.order()]);
        let digest = [1u8; 20];
        assert!(matches!(
            sign_digest(curve, &scalar(curve, 1), &digest, &mut nonces, 3),
            Err(EcdsaError::OutOfRangeScalar(_))
        ));
    }

    #[test]
    fn test_payload_digest() {
        let message = Payload::Message(ByteView::from_bytes(b"abc"));
        assert_eq!(message.digest(HashAlgorithm::Sha1).len(), 20);
        let digest = Payload::Digest(ByteView::from_bytes(&[9u8; 32]));
        assert_eq!(digest.digest(HashAlgorithm::Sha1), vec![9u8; 32]);
    }
}
