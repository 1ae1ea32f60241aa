//! Elliptic-curve point codec
//!
//! Byte forms, with N the field byte length of the curve:
//!
//! | form         | layout                  | length |
//! |--------------|-------------------------|--------|
//! | infinity     | `00`                    | 1      |
//! | compressed   | `02`/`03` ‖ x           | 1 + N  |
//! | uncompressed | `04` ‖ x ‖ y            | 1 + 2N |
//! | hybrid       | `06`/`07` ‖ x ‖ y       | 1 + 2N |
//! | raw (legacy) | x ‖ y                   | 2N     |
//!
//! [`decode_point`] detects the form from the tag and length; hybrid points
//! are only accepted through [`decode_point_as`].

use serde::{Deserialize, Serialize};

use super::curves::EcCurve;
use crate::error::{EcdsaError, EcdsaResult};

const TAG_INFINITY: u8 = 0x00;
const TAG_COMPRESSED_EVEN: u8 = 0x02;
const TAG_COMPRESSED_ODD: u8 = 0x03;
const TAG_UNCOMPRESSED: u8 = 0x04;
const TAG_HYBRID_EVEN: u8 = 0x06;
const TAG_HYBRID_ODD: u8 = 0x07;

/// Point byte forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointEncoding {
    /// Untagged x ‖ y
    Raw,
    /// `04` ‖ x ‖ y
    Uncompressed,
    /// `02`/`03` ‖ x
    Compressed,
    /// `06`/`07` ‖ x ‖ y
    Hybrid,
}

/// Affine point or the point at infinity.
///
/// Coordinates are big-endian and exactly N bytes long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EcPoint {
    Infinity,
    Affine { x: Vec<u8>, y: Vec<u8> },
}

impl EcPoint {
    pub fn is_infinity(&self) -> bool {
        matches!(self, Self::Infinity)
    }

    pub fn x(&self) -> Option<&[u8]> {
        match self {
            Self::Affine { x, .. } => Some(x),
            Self::Infinity => None,
        }
    }

    pub fn y(&self) -> Option<&[u8]> {
        match self {
            Self::Affine { y, .. } => Some(y),
            Self::Infinity => None,
        }
    }

    pub fn y_is_odd(&self) -> Option<bool> {
        self.y().and_then(|y| y.last()).map(|b| b & 1 == 1)
    }
}

/// Decode a point, detecting the form from its tag byte and length
pub fn decode_point(bytes: &[u8], curve: EcCurve) -> EcdsaResult<EcPoint> {
    let n = curve.field_len();
    match (bytes.first().copied(), bytes.len()) {
        (Some(TAG_INFINITY), 1) => Ok(EcPoint::Infinity),
        (Some(tag @ (TAG_COMPRESSED_EVEN | TAG_COMPRESSED_ODD)), len) if len == 1 + n => {
            decode_compressed(&bytes[1..], tag == TAG_COMPRESSED_ODD, curve)
        }
        (Some(TAG_UNCOMPRESSED), len) if len == 1 + 2 * n => decode_literal(&bytes[1..], curve),
        (_, len) if len == 2 * n => decode_literal(bytes, curve),
        (tag, len) => Err(EcdsaError::malformed(format!(
            "{} byte point with tag {:02x?} is not a valid encoding for {}",
            len, tag, curve
        ))),
    }
}

/// Decode a point that must be in the given form
pub fn decode_point_as(
    bytes: &[u8],
    curve: EcCurve,
    encoding: PointEncoding,
) -> EcdsaResult<EcPoint> {
    if bytes == [TAG_INFINITY] {
        return Ok(EcPoint::Infinity);
    }

    let n = curve.field_len();
    let wrong_form = || {
        EcdsaError::malformed(format!(
            "{} byte input is not a {:?} point for {}",
            bytes.len(),
            encoding,
            curve
        ))
    };

    match encoding {
        PointEncoding::Raw if bytes.len() == 2 * n => decode_literal(bytes, curve),
        PointEncoding::Uncompressed
            if bytes.len() == 1 + 2 * n && bytes[0] == TAG_UNCOMPRESSED =>
        {
            decode_literal(&bytes[1..], curve)
        }
        PointEncoding::Compressed
            if bytes.len() == 1 + n
                && matches!(bytes[0], TAG_COMPRESSED_EVEN | TAG_COMPRESSED_ODD) =>
        {
            decode_compressed(&bytes[1..], bytes[0] == TAG_COMPRESSED_ODD, curve)
        }
        PointEncoding::Hybrid
            if bytes.len() == 1 + 2 * n
                && matches!(bytes[0], TAG_HYBRID_EVEN | TAG_HYBRID_ODD) =>
        {
            let point = decode_literal(&bytes[1..], curve)?;
            if point.y_is_odd() != Some(bytes[0] == TAG_HYBRID_ODD) {
                return Err(EcdsaError::malformed(
                    "hybrid tag parity does not match y coordinate",
                ));
            }
            Ok(point)
        }
        _ => Err(wrong_form()),
    }
}

/// Encode a point in the given form.
///
/// The point at infinity is always the single byte `00`.
pub fn encode_point(point: &EcPoint, encoding: PointEncoding) -> Vec<u8> {
    let (x, y) = match point {
        EcPoint::Infinity => return vec![TAG_INFINITY],
        EcPoint::Affine { x, y } => (x, y),
    };
    let odd = point.y_is_odd() == Some(true);

    let mut out = Vec::with_capacity(1 + x.len() + y.len());
    match encoding {
        PointEncoding::Raw => {}
        PointEncoding::Uncompressed => out.push(TAG_UNCOMPRESSED),
        PointEncoding::Compressed => {
            out.push(if odd { TAG_COMPRESSED_ODD } else { TAG_COMPRESSED_EVEN });
            out.extend_from_slice(x);
            return out;
        }
        PointEncoding::Hybrid => out.push(if odd { TAG_HYBRID_ODD } else { TAG_HYBRID_EVEN }),
    }
    out.extend_from_slice(x);
    out.extend_from_slice(y);
    out
}

fn decode_compressed(x: &[u8], y_is_odd: bool, curve: EcCurve) -> EcdsaResult<EcPoint> {
    curve.math().decompress(x, y_is_odd).ok_or_else(|| {
        EcdsaError::not_on_curve(format!("x coordinate has no square root on {}", curve))
    })
}

fn decode_literal(xy: &[u8], curve: EcCurve) -> EcdsaResult<EcPoint> {
    let (x, y) = xy.split_at(curve.field_len());
    if !curve.math().is_on_curve(x, y) {
        return Err(EcdsaError::not_on_curve(format!(
            "coordinates do not satisfy the {} equation",
            curve
        )));
    }
    Ok(EcPoint::Affine {
        x: x.to_vec(),
        y: y.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Public key used throughout the interchange fixtures (NIST P-192)
    const BARE_P192: &str = "044ca295dbc75ad71f930a7acf97cfd7c2d96ffe387d5821\
                             aed4fa68fa5e0d7049bad159fb927861eb6f2b9c47fa76ca";

    fn fixture() -> Vec<u8> {
        hex::decode(BARE_P192).unwrap()
    }

    #[test]
    fn test_bare_point_starting_with_04() {
        let bytes = fixture();
        assert_eq!(bytes.len(), 48);
        assert_eq!(bytes[0], 0x04);
        let point = decode_point(&bytes, EcCurve::NistP192).unwrap();
        assert_eq!(point.x().unwrap(), &bytes[..24]);
        assert_eq!(point.y().unwrap(), &bytes[24..]);
    }

    #[test]
    fn test_all_forms_decode_to_same_point() {
        let bytes = fixture();
        let point = decode_point(&bytes, EcCurve::NistP192).unwrap();

        let mut uncompressed = vec![0x04];
        uncompressed.extend_from_slice(&bytes);
        assert_eq!(decode_point(&uncompressed, EcCurve::NistP192).unwrap(), point);

        let mut compressed = vec![0x02];
        compressed.extend_from_slice(&bytes[..24]);
        assert_eq!(decode_point(&compressed, EcCurve::NistP192).unwrap(), point);
    }

    #[test]
    fn test_encode_decode_every_form() {
        for curve in EcCurve::ALL {
            let g = curve.math().generator();
            for encoding in [
                PointEncoding::Raw,
                PointEncoding::Uncompressed,
                PointEncoding::Compressed,
                PointEncoding::Hybrid,
            ] {
                let encoded = encode_point(&g, encoding);
                assert_eq!(decode_point_as(&encoded, curve, encoding).unwrap(), g);
            }
            let infinity = encode_point(&EcPoint::Infinity, PointEncoding::Compressed);
            assert_eq!(infinity, vec![0x00]);
            assert!(decode_point(&infinity, curve).unwrap().is_infinity());
        }
    }

    #[test]
    fn test_compressed_without_root() {
        // x = 1 has no square root of x^3 - 3x + b on P-192
        let mut bytes = vec![0x02];
        bytes.extend_from_slice(&[0u8; 23]);
        bytes.push(1);
        assert!(matches!(
            decode_point(&bytes, EcCurve::NistP192),
            Err(EcdsaError::PointNotOnCurve(_))
        ));
    }

    #[test]
    fn test_literal_off_curve() {
        let mut bytes = fixture();
        bytes[47] ^= 1;
        assert!(matches!(
            decode_point(&bytes, EcCurve::NistP192),
            Err(EcdsaError::PointNotOnCurve(_))
        ));
    }

    #[test]
    fn test_bad_lengths_and_tags() {
        let bytes = fixture();
        for bad in [
            &bytes[..47],
            &bytes[..25],
            &[0x00, 0x00][..],
            &[][..],
        ] {
            assert!(matches!(
                decode_point(bad, EcCurve::NistP192),
                Err(EcdsaError::MalformedEncoding(_))
            ));
        }

        let mut wrong_tag = vec![0x05];
        wrong_tag.extend_from_slice(&bytes);
        assert!(matches!(
            decode_point(&wrong_tag, EcCurve::NistP192),
            Err(EcdsaError::MalformedEncoding(_))
        ));

        // hybrid is not auto-detected
        let mut hybrid = vec![0x06];
        hybrid.extend_from_slice(&bytes);
        assert!(matches!(
            decode_point(&hybrid, EcCurve::NistP192),
            Err(EcdsaError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_hybrid_parity_mismatch() {
        let g = EcCurve::NistP256.math().generator();
        let mut encoded = encode_point(&g, PointEncoding::Hybrid);
        encoded[0] ^= 1;
        assert!(matches!(
            decode_point_as(&encoded, EcCurve::NistP256, PointEncoding::Hybrid),
            Err(EcdsaError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_declared_form_is_enforced() {
        let g = EcCurve::NistP256.math().generator();
        let compressed = encode_point(&g, PointEncoding::Compressed);
        assert!(matches!(
            decode_point_as(&compressed, EcCurve::NistP256, PointEncoding::Uncompressed),
            Err(EcdsaError::MalformedEncoding(_))
        ));
    }
}
