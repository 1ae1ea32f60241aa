//! Named Curve Support
//!
//! This module binds the short-Weierstrass curves usable for key and
//! signature interchange to their group arithmetic:
//!
//! - `NIST P-192` (prime192v1): the historical default
//! - `NIST P-256` (prime256v1): WebAuthn, TLS, hardware tokens
//! - `NIST P-384` (secp384r1)
//! - `secp256k1`: Bitcoin, Ethereum
//!
//! # Architecture
//!
//! Codecs and key objects never touch field elements directly. They ask an
//! [`EcCurve`] for its sizes and OID, and its [`CurveMath`] backend for
//! point validation, decompression, scalar multiplication and scalar-field
//! operations. Every value crossing that boundary is a fixed-width
//! big-endian byte string.
//!
//! # Example
//!
//! ```rust,ignore
//! use ecdsa_interchange::crypto::curves::EcCurve;
//!
//! let curve = EcCurve::NistP256;
//! let public = curve.math().mul_base(&secret)?;
//! ```

pub mod traits;
pub mod weierstrass;

pub use traits::*;
pub use weierstrass::Weierstrass;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::crypto::hash::HashAlgorithm;
use crate::encoding::oid::{self, ObjectId};
use crate::error::{EcdsaError, EcdsaResult};

static NIST_P192: Weierstrass<p192::NistP192> = Weierstrass::new();
static NIST_P256: Weierstrass<p256::NistP256> = Weierstrass::new();
static NIST_P384: Weierstrass<p384::NistP384> = Weierstrass::new();
static SECP256K1: Weierstrass<k256::Secp256k1> = Weierstrass::new();

// MARK: - Curve Enum

/// Supported named curves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcCurve {
    /// NIST P-192 / prime192v1
    #[serde(rename = "p192")]
    NistP192,
    /// NIST P-256 / prime256v1
    #[serde(rename = "p256")]
    NistP256,
    /// NIST P-384 / secp384r1
    #[serde(rename = "p384")]
    NistP384,
    /// secp256k1
    #[serde(rename = "secp256k1")]
    Secp256k1,
}

impl EcCurve {
    pub const ALL: [EcCurve; 4] = [
        EcCurve::NistP192,
        EcCurve::NistP256,
        EcCurve::NistP384,
        EcCurve::Secp256k1,
    ];

    /// Get the curve name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Self::NistP192 => "NIST192p",
            Self::NistP256 => "NIST256p",
            Self::NistP384 => "NIST384p",
            Self::Secp256k1 => "SECP256k1",
        }
    }

    /// Arithmetic backend for this curve
    pub fn math(&self) -> &'static dyn CurveMath {
        match self {
            Self::NistP192 => &NIST_P192,
            Self::NistP256 => &NIST_P256,
            Self::NistP384 => &NIST_P384,
            Self::Secp256k1 => &SECP256K1,
        }
    }

    /// Byte length N of one coordinate in the base field
    pub fn field_len(&self) -> usize {
        match self {
            Self::NistP192 => 24,
            Self::NistP256 | Self::Secp256k1 => 32,
            Self::NistP384 => 48,
        }
    }

    /// Byte length of the group order, and so of scalars, r and s
    pub fn order_len(&self) -> usize {
        self.field_len()
    }

    /// Group order, big-endian, `order_len` bytes
    pub fn order(&self) -> Vec<u8> {
        self.math().order()
    }

    /// Bit length of the group order
    pub fn order_bits(&self) -> usize {
        let order = self.order();
        match order.iter().position(|&b| b != 0) {
            Some(i) => (order.len() - i) * 8 - order[i].leading_zeros() as usize,
            None => 0,
        }
    }

    /// Named-curve OID arcs
    pub fn oid_arcs(&self) -> &'static [u64] {
        match self {
            Self::NistP192 => oid::PRIME192V1,
            Self::NistP256 => oid::PRIME256V1,
            Self::NistP384 => oid::SECP384R1,
            Self::Secp256k1 => oid::SECP256K1,
        }
    }

    pub fn oid(&self) -> ObjectId {
        ObjectId::from_arcs(self.oid_arcs())
    }

    /// Look up a curve by its named-curve OID
    pub fn from_oid(oid: &ObjectId) -> EcdsaResult<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|curve| oid.matches(curve.oid_arcs()))
            .ok_or_else(|| EcdsaError::unsupported_curve(format!("unknown curve OID {}", oid)))
    }

    /// Hash used when a key is created without an explicit choice
    pub fn default_hash(&self) -> HashAlgorithm {
        match self {
            Self::NistP384 => HashAlgorithm::Sha384,
            _ => HashAlgorithm::Sha256,
        }
    }

    /// Require `value` to be an `order_len`-byte scalar in [1, order-1]
    pub fn check_scalar(&self, value: &[u8], what: &str) -> EcdsaResult<()> {
        if value.len() != self.order_len() {
            return Err(EcdsaError::malformed(format!(
                "{} must be {} bytes, got {}",
                what,
                self.order_len(),
                value.len()
            )));
        }
        if is_zero(value) {
            return Err(EcdsaError::out_of_range(format!("{} is zero", what)));
        }
        if !is_less_than(value, &self.order()) {
            return Err(EcdsaError::out_of_range(format!(
                "{} is not below the curve order",
                what
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for EcCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EcCurve {
    type Err = EcdsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nist192p" | "p192" | "p-192" | "prime192v1" | "secp192r1" => Ok(Self::NistP192),
            "nist256p" | "p256" | "p-256" | "prime256v1" | "secp256r1" => Ok(Self::NistP256),
            "nist384p" | "p384" | "p-384" | "secp384r1" => Ok(Self::NistP384),
            "secp256k1" => Ok(Self::Secp256k1),
            _ => Err(EcdsaError::unsupported_curve(s)),
        }
    }
}

// MARK: - Big-endian helpers

/// True if every byte is zero
pub fn is_zero(value: &[u8]) -> bool {
    value.iter().all(|&b| b == 0)
}

/// Compare two equal-length big-endian integers: a < b.
fn is_less_than(a: &[u8], b: &[u8]) -> bool {
    for (x, y) in a.iter().zip(b) {
        if x < y {
            return true;
        }
        if x > y {
            return false;
        }
    }
    false // equal
}

// MARK: - Tests
