//! Key objects
//!
//! [`VerifyingKey`] wraps a validated public point, [`SigningKey`] a private
//! scalar together with its derived public key. Both carry the
//! [`KeyConfig`](crate::config::KeyConfig) they were built with.

mod signing;
mod verifying;

pub use signing::SigningKey;
pub use verifying::VerifyingKey;
