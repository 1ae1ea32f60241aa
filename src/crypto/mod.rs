//! Cryptographic collaborators
//!
//! This module provides the pieces the codecs and key objects build on:
//! - Named curves and their group arithmetic
//! - Message digests
//! - Nonce sources
//! - The elliptic-curve point codec

pub mod curves;
pub mod hash;
pub mod nonce;
pub mod point;

pub use curves::{CurveMath, EcCurve, ScalarBytes};
pub use hash::HashAlgorithm;
pub use nonce::{FixedNonces, NonceSource, OsRngNonce};
pub use point::{decode_point, decode_point_as, encode_point, EcPoint, PointEncoding};
