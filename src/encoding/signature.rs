//! ECDSA signature wire formats
//!
//! - `Raw`: r ‖ s, each zero-padded to the order length
//! - `Der`: ECDSA-Sig-Value, `SEQUENCE { INTEGER r, INTEGER s }`
//! - `Strings`: an explicit (r, s) pair, each zero-padded to the order length
//!
//! Decoding checks structure first (`MalformedEncoding`) and then range
//! (`OutOfRangeScalar`), so callers can tell a corrupt transport from an
//! out-of-range value.

use serde::{Deserialize, Serialize};

use super::der::DerNode;
use crate::buffer::IntoByteView;
use crate::crypto::curves::EcCurve;
use crate::error::{EcdsaError, EcdsaResult};

/// Signature wire formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureFormat {
    Raw,
    Der,
    Strings,
}

/// Signature bytes as they travel on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedSignature {
    /// `Raw` or `Der` output
    Bytes(Vec<u8>),
    /// `Strings` output
    Pair { r: Vec<u8>, s: Vec<u8> },
}

impl EncodedSignature {
    /// Normalize a single byte-bearing input
    pub fn bytes<'a>(input: impl IntoByteView<'a>) -> Self {
        Self::Bytes(input.into_byte_view().into_owned())
    }

    /// Normalize an (r, s) pair
    pub fn pair<'a, 'b>(r: impl IntoByteView<'a>, s: impl IntoByteView<'b>) -> Self {
        Self::Pair {
            r: r.into_byte_view().into_owned(),
            s: s.into_byte_view().into_owned(),
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            Self::Pair { .. } => None,
        }
    }

    pub fn as_pair(&self) -> Option<(&[u8], &[u8])> {
        match self {
            Self::Pair { r, s } => Some((r, s)),
            Self::Bytes(_) => None,
        }
    }
}

impl From<Vec<u8>> for EncodedSignature {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<(Vec<u8>, Vec<u8>)> for EncodedSignature {
    fn from((r, s): (Vec<u8>, Vec<u8>)) -> Self {
        Self::Pair { r, s }
    }
}

/// Validated (r, s) pair for one curve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    curve: EcCurve,
    r: Vec<u8>,
    s: Vec<u8>,
}

impl Signature {
    /// Build from big-endian r and s of any width.
    ///
    /// Both must lie in [1, order-1].
    pub fn new(curve: EcCurve, r: &[u8], s: &[u8]) -> EcdsaResult<Self> {
        let r = fixed_width(r, curve, "r")?;
        let s = fixed_width(s, curve, "s")?;
        curve.check_scalar(&r, "signature r")?;
        curve.check_scalar(&s, "signature s")?;
        Ok(Self { curve, r, s })
    }

    pub fn curve(&self) -> EcCurve {
        self.curve
    }

    /// r, `order_len` bytes
    pub fn r(&self) -> &[u8] {
        &self.r
    }

    /// s, `order_len` bytes
    pub fn s(&self) -> &[u8] {
        &self.s
    }

    pub fn encode(&self, format: SignatureFormat) -> EcdsaResult<EncodedSignature> {
        Ok(match format {
            SignatureFormat::Raw => EncodedSignature::Bytes(self.to_raw()),
            SignatureFormat::Der => EncodedSignature::Bytes(self.to_der()?),
            SignatureFormat::Strings => EncodedSignature::Pair {
                r: self.r.clone(),
                s: self.s.clone(),
            },
        })
    }

    /// Strict decode: DER input must not carry trailing bytes
    pub fn decode(
        encoded: &EncodedSignature,
        format: SignatureFormat,
        curve: EcCurve,
    ) -> EcdsaResult<Self> {
        Self::decode_with(encoded, format, curve, false)
    }

    /// Decode, optionally ignoring bytes after a DER signature
    pub fn decode_with(
        encoded: &EncodedSignature,
        format: SignatureFormat,
        curve: EcCurve,
        allow_trailing_der: bool,
    ) -> EcdsaResult<Self> {
        match (format, encoded) {
            (SignatureFormat::Raw, EncodedSignature::Bytes(bytes)) => Self::from_raw(bytes, curve),
            (SignatureFormat::Der, EncodedSignature::Bytes(bytes)) if allow_trailing_der => {
                Self::from_der_prefix(bytes, curve).map(|(sig, _)| sig)
            }
            (SignatureFormat::Der, EncodedSignature::Bytes(bytes)) => Self::from_der(bytes, curve),
            (SignatureFormat::Strings, EncodedSignature::Pair { r, s }) => {
                Self::from_strings(r, s, curve)
            }
            (format, _) => Err(EcdsaError::malformed(format!(
                "{:?} signatures cannot be decoded from this input shape",
                format
            ))),
        }
    }

    // Raw

    pub fn to_raw(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.r.len() + self.s.len());
        out.extend_from_slice(&self.r);
        out.extend_from_slice(&self.s);
        out
    }

    pub fn from_raw<'a>(input: impl IntoByteView<'a>, curve: EcCurve) -> EcdsaResult<Self> {
        let bytes = input.into_byte_view();
        let len = curve.order_len();
        if bytes.len() != 2 * len {
            return Err(EcdsaError::malformed(format!(
                "raw signature must be {} bytes, got {}",
                2 * len,
                bytes.len()
            )));
        }
        let (r, s) = bytes.split_at(len);
        Self::new(curve, r, s)
    }

    // Strings

    pub fn from_strings<'a, 'b>(
        r: impl IntoByteView<'a>,
        s: impl IntoByteView<'b>,
        curve: EcCurve,
    ) -> EcdsaResult<Self> {
        let (r, s) = (r.into_byte_view(), s.into_byte_view());
        let len = curve.order_len();
        for (name, actual) in [("r", r.len()), ("s", s.len())] {
            if actual != len {
                return Err(EcdsaError::malformed(format!(
                    "signature {} must be {} bytes, got {}",
                    name, len, actual
                )));
            }
        }
        Self::new(curve, &r, &s)
    }

    // DER

    pub fn to_der(&self) -> EcdsaResult<Vec<u8>> {
        DerNode::Sequence(vec![DerNode::integer(&self.r), DerNode::integer(&self.s)]).encode()
    }

    pub fn from_der<'a>(input: impl IntoByteView<'a>, curve: EcCurve) -> EcdsaResult<Self> {
        let bytes = input.into_byte_view();
        Self::from_der_node(&DerNode::decode(&bytes)?, curve)
    }

    /// Decode a DER signature at the front of `input`, returning the number
    /// of bytes it occupied
    pub fn from_der_prefix<'a>(
        input: impl IntoByteView<'a>,
        curve: EcCurve,
    ) -> EcdsaResult<(Self, usize)> {
        let bytes = input.into_byte_view();
        let (node, rest) = DerNode::decode_prefix(&bytes)?;
        let consumed = bytes.len() - rest.len();
        Ok((Self::from_der_node(&node, curve)?, consumed))
    }

    fn from_der_node(node: &DerNode, curve: EcCurve) -> EcdsaResult<Self> {
        match node.as_sequence()? {
            [r, s] => Self::new(curve, r.as_integer()?, s.as_integer()?),
            other => Err(EcdsaError::malformed(format!(
                "ECDSA-Sig-Value must hold 2 INTEGERs, found {} elements",
                other.len()
            ))),
        }
    }
}

/// Left-pad a big-endian integer to the curve's order length
fn fixed_width(value: &[u8], curve: EcCurve, name: &str) -> EcdsaResult<Vec<u8>> {
    let len = curve.order_len();
    let start = value.iter().position(|&b| b != 0).unwrap_or(value.len());
    let trimmed = &value[start..];
    if trimmed.len() > len {
        return Err(EcdsaError::out_of_range(format!(
            "signature {} is wider than the curve order",
            name
        )));
    }
    let mut out = vec![0u8; len];
    out[len - trimmed.len()..].copy_from_slice(trimmed);
    Ok(out)
}
