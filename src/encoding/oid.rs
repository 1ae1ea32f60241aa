//! ASN.1 object identifiers

use std::fmt;

use crate::error::{EcdsaError, EcdsaResult};

/// id-ecPublicKey
pub const EC_PUBLIC_KEY: &[u64] = &[1, 2, 840, 10045, 2, 1];
/// prime192v1 / NIST P-192
pub const PRIME192V1: &[u64] = &[1, 2, 840, 10045, 3, 1, 1];
/// prime256v1 / NIST P-256
pub const PRIME256V1: &[u64] = &[1, 2, 840, 10045, 3, 1, 7];
/// secp384r1 / NIST P-384
pub const SECP384R1: &[u64] = &[1, 3, 132, 0, 34];
/// secp256k1
pub const SECP256K1: &[u64] = &[1, 3, 132, 0, 10];

/// Object identifier as a list of arcs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(Vec<u64>);

impl ObjectId {
    pub fn from_arcs(arcs: &[u64]) -> Self {
        Self(arcs.to_vec())
    }

    pub fn arcs(&self) -> &[u64] {
        &self.0
    }

    pub fn matches(&self, arcs: &[u64]) -> bool {
        self.0 == arcs
    }

    /// DER content octets (no tag or length)
    pub fn to_der_content(&self) -> EcdsaResult<Vec<u8>> {
        let arcs = &self.0;
        if arcs.len() < 2 || arcs[0] > 2 || (arcs[0] < 2 && arcs[1] >= 40) {
            return Err(EcdsaError::malformed(format!("invalid OID {}", self)));
        }
        let first = arcs[0]
            .checked_mul(40)
            .and_then(|v| v.checked_add(arcs[1]))
            .ok_or_else(|| EcdsaError::malformed("OID arc overflow"))?;

        let mut out = Vec::new();
        push_base128(&mut out, first);
        for &arc in &arcs[2..] {
            push_base128(&mut out, arc);
        }
        Ok(out)
    }

    /// Parse DER content octets, rejecting non-minimal sub-identifiers
    pub fn from_der_content(content: &[u8]) -> EcdsaResult<Self> {
        if content.is_empty() {
            return Err(EcdsaError::malformed("empty OID"));
        }
        if content[content.len() - 1] & 0x80 != 0 {
            return Err(EcdsaError::malformed("truncated OID sub-identifier"));
        }

        let mut subids = Vec::new();
        let mut value: u64 = 0;
        let mut start = true;
        for &byte in content {
            if start && byte == 0x80 {
                return Err(EcdsaError::malformed("non-minimal OID sub-identifier"));
            }
            if value > (u64::MAX >> 7) {
                return Err(EcdsaError::malformed("OID sub-identifier overflow"));
            }
            value = (value << 7) | u64::from(byte & 0x7f);
            start = byte & 0x80 == 0;
            if start {
                subids.push(value);
                value = 0;
            }
        }

        let first = subids[0];
        let mut arcs = Vec::with_capacity(subids.len() + 1);
        match first {
            0..=39 => arcs.extend_from_slice(&[0, first]),
            40..=79 => arcs.extend_from_slice(&[1, first - 40]),
            _ => arcs.extend_from_slice(&[2, first - 80]),
        }
        arcs.extend_from_slice(&subids[1..]);
        Ok(Self(arcs))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|a| a.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

fn push_base128(out: &mut Vec<u8>, mut value: u64) {
    let mut chunk = [0u8; 10];
    let mut i = chunk.len();
    loop {
        i -= 1;
        chunk[i] = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            break;
        }
    }
    let last = chunk.len() - 1;
    for (j, byte) in chunk.iter().enumerate().skip(i) {
        out.push(if j == last { *byte } else { byte | 0x80 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ec_public_key_encoding() {
        let oid = ObjectId::from_arcs(EC_PUBLIC_KEY);
        let content = oid.to_der_content().unwrap();
        assert_eq!(hex::encode(&content), "2a8648ce3d0201");
        assert_eq!(ObjectId::from_der_content(&content).unwrap(), oid);
        assert_eq!(oid.to_string(), "1.2.840.10045.2.1");
    }

    #[test]
    fn test_curve_oid_encodings() {
        let p192 = ObjectId::from_arcs(PRIME192V1).to_der_content().unwrap();
        assert_eq!(hex::encode(p192), "2a8648ce3d030101");
        let k1 = ObjectId::from_arcs(SECP256K1).to_der_content().unwrap();
        assert_eq!(hex::encode(k1), "2b8104000a");
    }

    #[test]
    fn test_rejects_non_minimal_and_truncated() {
        assert!(ObjectId::from_der_content(&[0x2a, 0x80, 0x01]).is_err());
        assert!(ObjectId::from_der_content(&[0x2a, 0x86]).is_err());
        assert!(ObjectId::from_der_content(&[]).is_err());
    }

    #[test]
    fn test_large_first_arc() {
        let oid = ObjectId::from_arcs(&[2, 999, 3]);
        let content = oid.to_der_content().unwrap();
        assert_eq!(hex::encode(&content), "883703");
        assert_eq!(ObjectId::from_der_content(&content).unwrap(), oid);
    }
}
