//! Short-Weierstrass Arithmetic Backend
//!
//! Generic [`CurveMath`] implementation over any RustCrypto curve with
//! arithmetic enabled (`p192`, `p256`, `p384`, `k256`).
//!
//! Features:
//! - SEC1 point validation and decompression
//! - Projective scalar multiplication
//! - Scalar-field arithmetic modulo the group order

use std::marker::PhantomData;

use elliptic_curve::{
    ff::{Field, PrimeField},
    group::{Curve as _, Group},
    ops::Reduce,
    sec1::{Coordinates, EncodedPoint, FromEncodedPoint, ModulusSize, ToEncodedPoint},
    AffinePoint, CurveArithmetic, FieldBytes, FieldBytesEncoding, FieldBytesSize,
    ProjectivePoint, Scalar,
};

use super::{CurveMath, ScalarBytes};
use crate::crypto::point::EcPoint;
use crate::error::{EcdsaError, EcdsaResult};
use zeroize::Zeroizing;

/// Arithmetic for the curve `C`
pub struct Weierstrass<C>(PhantomData<fn() -> C>);

impl<C> Weierstrass<C> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<C> Default for Weierstrass<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Weierstrass<C>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    fn width() -> usize {
        FieldBytes::<C>::default().len()
    }

    /// Caller checks `bytes.len() == width()`
    fn field_bytes(bytes: &[u8]) -> FieldBytes<C> {
        let mut out = FieldBytes::<C>::default();
        out.copy_from_slice(bytes);
        out
    }

    fn scalar(bytes: &[u8]) -> EcdsaResult<Scalar<C>> {
        if bytes.len() != Self::width() {
            return Err(EcdsaError::malformed(format!(
                "scalar must be {} bytes, got {}",
                Self::width(),
                bytes.len()
            )));
        }
        let repr = Self::field_bytes(bytes);
        Option::<Scalar<C>>::from(Scalar::<C>::from_repr(repr))
            .ok_or_else(|| EcdsaError::out_of_range("scalar is not below the curve order"))
    }

    fn scalar_bytes(scalar: Scalar<C>) -> ScalarBytes {
        Zeroizing::new(scalar.to_repr().to_vec())
    }

    fn affine(x: &[u8], y: &[u8]) -> Option<AffinePoint<C>> {
        let width = Self::width();
        if x.len() != width || y.len() != width {
            return None;
        }
        let encoded = EncodedPoint::<C>::from_affine_coordinates(
            &Self::field_bytes(x),
            &Self::field_bytes(y),
            false,
        );
        AffinePoint::<C>::from_encoded_point(&encoded).into()
    }

    fn projective(point: &EcPoint) -> EcdsaResult<ProjectivePoint<C>> {
        match point {
            EcPoint::Infinity => Ok(ProjectivePoint::<C>::identity()),
            EcPoint::Affine { x, y } => Self::affine(x, y)
                .map(ProjectivePoint::<C>::from)
                .ok_or_else(|| EcdsaError::not_on_curve("coordinates do not satisfy the curve equation")),
        }
    }

    fn point(projective: ProjectivePoint<C>) -> EcPoint {
        let encoded = projective.to_affine().to_encoded_point(false);
        match encoded.coordinates() {
            Coordinates::Uncompressed { x, y } => EcPoint::Affine {
                x: x.to_vec(),
                y: y.to_vec(),
            },
            _ => EcPoint::Infinity,
        }
    }
}

impl<C> CurveMath for Weierstrass<C>
where
    C: CurveArithmetic,
    AffinePoint<C>: FromEncodedPoint<C> + ToEncodedPoint<C>,
    FieldBytesSize<C>: ModulusSize,
{
    fn field_len(&self) -> usize {
        Self::width()
    }

    fn order(&self) -> Vec<u8> {
        <C::Uint as FieldBytesEncoding<C>>::encode_field_bytes(&C::ORDER).to_vec()
    }

    fn generator(&self) -> EcPoint {
        Self::point(ProjectivePoint::<C>::generator())
    }

    fn is_on_curve(&self, x: &[u8], y: &[u8]) -> bool {
        Self::affine(x, y).is_some()
    }

    fn decompress(&self, x: &[u8], y_is_odd: bool) -> Option<EcPoint> {
        if x.len() != Self::width() {
            return None;
        }
        let mut compressed = Vec::with_capacity(1 + x.len());
        compressed.push(if y_is_odd { 0x03 } else { 0x02 });
        compressed.extend_from_slice(x);
        let encoded = EncodedPoint::<C>::from_bytes(&compressed).ok()?;
        let affine: Option<AffinePoint<C>> = AffinePoint::<C>::from_encoded_point(&encoded).into();
        affine.map(|a| Self::point(ProjectivePoint::<C>::from(a)))
    }

    fn add(&self, a: &EcPoint, b: &EcPoint) -> EcdsaResult<EcPoint> {
        Ok(Self::point(Self::projective(a)? + Self::projective(b)?))
    }

    fn mul(&self, point: &EcPoint, scalar: &[u8]) -> EcdsaResult<EcPoint> {
        let k = Self::scalar(scalar)?;
        Ok(Self::point(Self::projective(point)? * k))
    }

    fn mul_base(&self, scalar: &[u8]) -> EcdsaResult<EcPoint> {
        let k = Self::scalar(scalar)?;
        Ok(Self::point(ProjectivePoint::<C>::generator() * k))
    }

    fn scalar_add(&self, a: &[u8], b: &[u8]) -> EcdsaResult<ScalarBytes> {
        Ok(Self::scalar_bytes(Self::scalar(a)? + Self::scalar(b)?))
    }

    fn scalar_mul(&self, a: &[u8], b: &[u8]) -> EcdsaResult<ScalarBytes> {
        Ok(Self::scalar_bytes(Self::scalar(a)? * Self::scalar(b)?))
    }

    fn scalar_invert(&self, a: &[u8]) -> EcdsaResult<ScalarBytes> {
        let a = Self::scalar(a)?;
        Option::<Scalar<C>>::from(Field::invert(&a))
            .map(Self::scalar_bytes)
            .ok_or_else(|| EcdsaError::out_of_range("zero has no inverse"))
    }

    fn reduce(&self, bytes: &[u8]) -> EcdsaResult<ScalarBytes> {
        if bytes.len() != Self::width() {
            return Err(EcdsaError::malformed(format!(
                "value to reduce must be {} bytes, got {}",
                Self::width(),
                bytes.len()
            )));
        }
        let repr = Self::field_bytes(bytes);
        Ok(Self::scalar_bytes(
            <Scalar<C> as Reduce<C::Uint>>::reduce_bytes(&repr),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::curves::EcCurve;

    fn scalar(curve: EcCurve, value: u8) -> Vec<u8> {
        let mut out = vec![0u8; curve.order_len()];
        *out.last_mut().unwrap() = value;
        out
    }

    #[test]
    fn test_generator_matches_mul_by_one() {
        for curve in EcCurve::ALL {
            let math = curve.math();
            let g = math.generator();
            assert_eq!(math.mul_base(&scalar(curve, 1)).unwrap(), g);
            let (x, y) = (g.x().unwrap(), g.y().unwrap());
            assert!(math.is_on_curve(x, y));
        }
    }

    #[test]
    fn test_p192_generator() {
        let g = EcCurve::NistP192.math().generator();
        assert_eq!(
            hex::encode(g.x().unwrap()),
            "188da80eb03090f67cbf20eb43a18800f4ff0afd82ff1012"
        );
        assert_eq!(
            hex::encode(g.y().unwrap()),
            "07192b95ffc8da78631011ed6b24cdd573f977a11e794811"
        );
    }

    #[test]
    fn test_add_matches_doubling() {
        for curve in EcCurve::ALL {
            let math = curve.math();
            let g = math.generator();
            let doubled = math.add(&g, &g).unwrap();
            assert_eq!(doubled, math.mul_base(&scalar(curve, 2)).unwrap());
            assert_eq!(math.add(&g, &EcPoint::Infinity).unwrap(), g);
        }
    }

    #[test]
    fn test_mul_by_zero_is_infinity() {
        let math = EcCurve::NistP256.math();
        let zero = vec![0u8; 32];
        assert_eq!(math.mul_base(&zero).unwrap(), EcPoint::Infinity);
    }

    #[test]
    fn test_decompress_recovers_generator() {
        for curve in EcCurve::ALL {
            let math = curve.math();
            let g = math.generator();
            let odd = g.y_is_odd().unwrap();
            assert_eq!(math.decompress(g.x().unwrap(), odd).unwrap(), g);
        }
    }

    #[test]
    fn test_scalar_field_ops() {
        let curve = EcCurve::Secp256k1;
        let math = curve.math();
        let three = scalar(curve, 3);
        let inv = math.scalar_invert(&three).unwrap();
        let one = math.scalar_mul(&three, &inv).unwrap();
        assert_eq!(one.as_slice(), scalar(curve, 1).as_slice());

        let sum = math.scalar_add(&three, &scalar(curve, 4)).unwrap();
        assert_eq!(sum.as_slice(), scalar(curve, 7).as_slice());

        assert!(matches!(
            math.scalar_invert(&scalar(curve, 0)),
            Err(EcdsaError::OutOfRangeScalar(_))
        ));
    }

    #[test]
    fn test_reduce_wraps_order() {
        let curve = EcCurve::NistP192;
        let math = curve.math();
        let reduced = math.reduce(&curve.order()).unwrap();
        assert!(reduced.iter().all(|&b| b == 0));
        assert!(matches!(
            math.scalar_add(&curve.order(), &scalar(curve, 1)),
            Err(EcdsaError::OutOfRangeScalar(_))
        ));
    }

    #[test]
    fn test_wrong_width_inputs_rejected() {
        let curve = EcCurve::NistP384;
        let math = curve.math();
        let g = math.generator();
        let short_x = &g.x().unwrap()[1..];
        assert!(!math.is_on_curve(short_x, g.y().unwrap()));
        assert!(math.decompress(short_x, false).is_none());
        assert!(matches!(
            math.reduce(&[1u8; 47]),
            Err(EcdsaError::MalformedEncoding(_))
        ));
        assert!(matches!(
            math.mul_base(&[1u8; 49]),
            Err(EcdsaError::MalformedEncoding(_))
        ));
    }
}
