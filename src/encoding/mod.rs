//! Wire encodings
//!
//! - **der**: minimal ASN.1 DER reader/writer
//! - **oid**: object identifiers for EC keys and named curves
//! - **pem**: base64 ASCII armor
//! - **signature**: raw, DER and paired-string signature formats

pub mod der;
pub mod oid;
pub mod pem;
pub mod signature;

pub use der::DerNode;
pub use oid::ObjectId;
pub use signature::{EncodedSignature, Signature, SignatureFormat};
