//! ECDSA Key and Signature Interchange
//!
//! Import, export, sign and verify with ECDSA keys on NIST P-192, P-256,
//! P-384 and secp256k1, across the encodings other tools emit.
//!
//! # Architecture
//!
//! This crate provides:
//! - **buffer**: Normalizes byte-like caller input into one byte view
//! - **crypto**: Curves, digests, nonce sources and the SEC1 point codec
//! - **encoding**: DER, PEM, object identifiers and signature formats
//! - **keys**: `VerifyingKey` and `SigningKey`
//! - **ecdsa**: The signing and verification equations
//! - **config**: Per-key settings
//!
//! # Security
//!
//! Private scalars are held in `zeroize` containers and cleared on drop.
//! `Debug` output and log lines never contain them.
//!
//! # Example
//!
//! ```rust,ignore
//! use ecdsa_interchange::{EcCurve, PointEncoding, SignatureFormat, SigningKey};
//!
//! let sk = SigningKey::from_string(&secret, EcCurve::NistP256)?;
//! let sig = sk.sign(b"message")?;
//! sk.verifying_key().verify(&sig, b"message", SignatureFormat::Raw)?;
//! println!("{}", sk.verifying_key().to_pem(PointEncoding::Uncompressed)?);
//! ```

pub mod buffer;
pub mod config;
pub mod crypto;
pub mod ecdsa;
pub mod encoding;
pub mod error;
pub mod keys;
pub mod utils;

// Re-export key types for convenience
pub use buffer::{ByteOrder, ByteView, IntoByteView};
pub use config::KeyConfig;
pub use crypto::{EcCurve, EcPoint, FixedNonces, HashAlgorithm, NonceSource, OsRngNonce, PointEncoding};
pub use ecdsa::Payload;
pub use encoding::{EncodedSignature, Signature, SignatureFormat};
pub use error::{EcdsaError, EcdsaResult, ErrorCode};
pub use keys::{SigningKey, VerifyingKey};
