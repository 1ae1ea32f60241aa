//! Per-signature nonce sources
//!
//! A nonce must never repeat for a given key. [`OsRngNonce`] draws from the
//! operating system RNG and is what the key objects use unless told
//! otherwise. [`FixedNonces`] replays caller-supplied values and exists for
//! known-answer tests and interop fixtures.

use std::collections::VecDeque;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use super::curves::{EcCurve, ScalarBytes};
use crate::error::{EcdsaError, EcdsaResult};

/// Upper bound on rejection-sampling rounds for one draw
const MAX_SAMPLING_ROUNDS: usize = 128;

/// Supplies nonce scalars in [1, order-1]
pub trait NonceSource {
    /// Draw the next nonce as `order_len` big-endian bytes
    fn next_nonce(&mut self, curve: EcCurve) -> EcdsaResult<ScalarBytes>;
}

/// Uniform nonces from the operating system RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRngNonce;

impl NonceSource for OsRngNonce {
    fn next_nonce(&mut self, curve: EcCurve) -> EcdsaResult<ScalarBytes> {
        let excess_bits = curve.order_len() * 8 - curve.order_bits();
        let mut candidate = Zeroizing::new(vec![0u8; curve.order_len()]);

        for _ in 0..MAX_SAMPLING_ROUNDS {
            OsRng.fill_bytes(&mut candidate);
            candidate[0] &= 0xff >> excess_bits;
            if curve.check_scalar(&candidate, "nonce").is_ok() {
                return Ok(candidate);
            }
        }

        Err(EcdsaError::out_of_range(
            "random source did not produce a usable nonce",
        ))
    }
}

/// Replays a fixed sequence of nonces
pub struct FixedNonces {
    queue: VecDeque<ScalarBytes>,
}

impl FixedNonces {
    pub fn new<I, B>(nonces: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        Self {
            queue: nonces
                .into_iter()
                .map(|n| Zeroizing::new(n.as_ref().to_vec()))
                .collect(),
        }
    }

    /// Nonces not yet consumed
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl NonceSource for FixedNonces {
    fn next_nonce(&mut self, _curve: EcCurve) -> EcdsaResult<ScalarBytes> {
        self.queue
            .pop_front()
            .ok_or_else(|| EcdsaError::out_of_range("fixed nonce sequence exhausted"))
    }
}

impl std::fmt::Debug for FixedNonces {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixedNonces")
            .field("remaining", &self.queue.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_rng_nonce_in_range() {
        for curve in EcCurve::ALL {
            let mut source = OsRngNonce;
            let a = source.next_nonce(curve).unwrap();
            let b = source.next_nonce(curve).unwrap();
            assert!(curve.check_scalar(&a, "nonce").is_ok());
            assert_ne!(a.as_slice(), b.as_slice());
        }
    }

    #[test]
    fn test_fixed_nonces_replay_in_order() {
        let mut source = FixedNonces::new([[1u8; 24], [2u8; 24]]);
        assert_eq!(source.remaining(), 2);
        assert_eq!(source.next_nonce(EcCurve::NistP192).unwrap()[0], 1);
        assert_eq!(source.next_nonce(EcCurve::NistP192).unwrap()[0], 2);
        assert!(matches!(
            source.next_nonce(EcCurve::NistP192),
            Err(EcdsaError::OutOfRangeScalar(_))
        ));
    }
}
