//! Curve Arithmetic Traits
//!
//! Defines the group and scalar-field interface the codecs and the
//! sign/verify orchestrator are written against.

use zeroize::Zeroizing;

use crate::crypto::point::EcPoint;
use crate::error::EcdsaResult;

/// Scalar value as fixed-width big-endian bytes, wiped on drop
pub type ScalarBytes = Zeroizing<Vec<u8>>;

/// Group and scalar-field operations for one curve.
///
/// Scalars are `order_len` big-endian bytes and must be below the group
/// order; coordinates are `field_len` big-endian bytes.
pub trait CurveMath: Send + Sync {
    /// Byte length of one field element
    fn field_len(&self) -> usize;

    /// Group order, big-endian
    fn order(&self) -> Vec<u8>;

    /// Base point
    fn generator(&self) -> EcPoint;

    /// True if (x, y) satisfies the curve equation
    fn is_on_curve(&self, x: &[u8], y: &[u8]) -> bool;

    /// Recover the point with the given x and y parity, if x has a root
    fn decompress(&self, x: &[u8], y_is_odd: bool) -> Option<EcPoint>;

    /// Point addition
    fn add(&self, a: &EcPoint, b: &EcPoint) -> EcdsaResult<EcPoint>;

    /// Scalar multiplication of an arbitrary point
    fn mul(&self, point: &EcPoint, scalar: &[u8]) -> EcdsaResult<EcPoint>;

    /// Scalar multiplication of the base point
    fn mul_base(&self, scalar: &[u8]) -> EcdsaResult<EcPoint> {
        self.mul(&self.generator(), scalar)
    }

    /// (a + b) mod n
    fn scalar_add(&self, a: &[u8], b: &[u8]) -> EcdsaResult<ScalarBytes>;

    /// (a * b) mod n
    fn scalar_mul(&self, a: &[u8], b: &[u8]) -> EcdsaResult<ScalarBytes>;

    /// a⁻¹ mod n; fails for zero
    fn scalar_invert(&self, a: &[u8]) -> EcdsaResult<ScalarBytes>;

    /// Reduce a `field_len`-byte integer modulo n
    fn reduce(&self, bytes: &[u8]) -> EcdsaResult<ScalarBytes>;
}
