//! Minimal ASN.1 DER reader/writer
//!
//! Covers the node kinds needed by SubjectPublicKeyInfo, SEC1
//! ECPrivateKey and ECDSA-Sig-Value. Decoding is strict DER: minimal
//! lengths, minimal non-negative INTEGERs, byte-aligned BIT STRINGs and
//! bounded nesting. Anything else is `MalformedEncoding`.

use super::oid::ObjectId;
use crate::error::{EcdsaError, EcdsaResult};

pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_BIT_STRING: u8 = 0x03;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_OBJECT_IDENTIFIER: u8 = 0x06;
pub const TAG_SEQUENCE: u8 = 0x30;
/// Constructed, context-specific class bits
const CONTEXT_CONSTRUCTED: u8 = 0xa0;

/// Maximum nesting of constructed nodes
const MAX_DEPTH: usize = 16;

/// Decoded DER node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerNode {
    /// Non-negative integer as its minimal big-endian magnitude (empty for zero)
    Integer(Vec<u8>),
    OctetString(Vec<u8>),
    /// Bit string content after the unused-bits byte
    BitString(Vec<u8>),
    ObjectIdentifier(ObjectId),
    Sequence(Vec<DerNode>),
    /// Explicitly tagged `[tag]` wrapper
    ContextSpecific { tag: u8, inner: Box<DerNode> },
}

impl DerNode {
    /// INTEGER from big-endian bytes, leading zeros dropped
    pub fn integer(bytes: &[u8]) -> Self {
        let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        Self::Integer(bytes[start..].to_vec())
    }

    pub fn context(tag: u8, inner: DerNode) -> Self {
        Self::ContextSpecific {
            tag,
            inner: Box::new(inner),
        }
    }

    /// Decode exactly one node spanning all of `bytes`
    pub fn decode(bytes: &[u8]) -> EcdsaResult<Self> {
        let (node, rest) = Self::decode_prefix(bytes)?;
        if !rest.is_empty() {
            return Err(EcdsaError::malformed(format!(
                "{} trailing bytes after DER structure",
                rest.len()
            )));
        }
        Ok(node)
    }

    /// Decode one node from the front of `bytes`, returning what follows it
    pub fn decode_prefix(bytes: &[u8]) -> EcdsaResult<(Self, &[u8])> {
        decode_node(bytes, 0)
    }

    pub fn encode(&self) -> EcdsaResult<Vec<u8>> {
        let mut out = Vec::new();
        self.encode_into(&mut out)?;
        Ok(out)
    }

    fn encode_into(&self, out: &mut Vec<u8>) -> EcdsaResult<()> {
        match self {
            Self::Integer(magnitude) => {
                let start = magnitude
                    .iter()
                    .position(|&b| b != 0)
                    .unwrap_or(magnitude.len());
                let trimmed = &magnitude[start..];
                let mut content = Vec::with_capacity(trimmed.len() + 1);
                if trimmed.first().map_or(true, |b| b & 0x80 != 0) {
                    content.push(0x00);
                }
                content.extend_from_slice(trimmed);
                write_tlv(out, TAG_INTEGER, &content);
            }
            Self::OctetString(data) => write_tlv(out, TAG_OCTET_STRING, data),
            Self::BitString(data) => {
                let mut content = Vec::with_capacity(data.len() + 1);
                content.push(0x00);
                content.extend_from_slice(data);
                write_tlv(out, TAG_BIT_STRING, &content);
            }
            Self::ObjectIdentifier(oid) => {
                write_tlv(out, TAG_OBJECT_IDENTIFIER, &oid.to_der_content()?)
            }
            Self::Sequence(children) => {
                let mut content = Vec::new();
                for child in children {
                    child.encode_into(&mut content)?;
                }
                write_tlv(out, TAG_SEQUENCE, &content);
            }
            Self::ContextSpecific { tag, inner } => {
                if *tag > 30 {
                    return Err(EcdsaError::malformed("context tag number too large"));
                }
                write_tlv(out, CONTEXT_CONSTRUCTED | tag, &inner.encode()?);
            }
        }
        Ok(())
    }

    // Typed accessors

    pub fn as_sequence(&self) -> EcdsaResult<&[DerNode]> {
        match self {
            Self::Sequence(children) => Ok(children),
            other => Err(unexpected("SEQUENCE", other)),
        }
    }

    pub fn as_integer(&self) -> EcdsaResult<&[u8]> {
        match self {
            Self::Integer(magnitude) => Ok(magnitude),
            other => Err(unexpected("INTEGER", other)),
        }
    }

    pub fn as_octet_string(&self) -> EcdsaResult<&[u8]> {
        match self {
            Self::OctetString(data) => Ok(data),
            other => Err(unexpected("OCTET STRING", other)),
        }
    }

    pub fn as_bit_string(&self) -> EcdsaResult<&[u8]> {
        match self {
            Self::BitString(data) => Ok(data),
            other => Err(unexpected("BIT STRING", other)),
        }
    }

    pub fn as_oid(&self) -> EcdsaResult<&ObjectId> {
        match self {
            Self::ObjectIdentifier(oid) => Ok(oid),
            other => Err(unexpected("OBJECT IDENTIFIER", other)),
        }
    }

    /// Inner node of an explicit `[tag]` wrapper
    pub fn as_context(&self, tag: u8) -> EcdsaResult<&DerNode> {
        match self {
            Self::ContextSpecific { tag: t, inner } if *t == tag => Ok(inner),
            other => Err(unexpected(&format!("[{}]", tag), other)),
        }
    }

    fn kind(&self) -> String {
        match self {
            Self::Integer(_) => "INTEGER".into(),
            Self::OctetString(_) => "OCTET STRING".into(),
            Self::BitString(_) => "BIT STRING".into(),
            Self::ObjectIdentifier(_) => "OBJECT IDENTIFIER".into(),
            Self::Sequence(_) => "SEQUENCE".into(),
            Self::ContextSpecific { tag, .. } => format!("[{}]", tag),
        }
    }
}

fn unexpected(expected: &str, found: &DerNode) -> EcdsaError {
    EcdsaError::malformed(format!("expected {}, found {}", expected, found.kind()))
}

fn decode_node(bytes: &[u8], depth: usize) -> EcdsaResult<(DerNode, &[u8])> {
    if depth > MAX_DEPTH {
        return Err(EcdsaError::malformed("DER nesting too deep"));
    }
    let (&tag, after_tag) = bytes
        .split_first()
        .ok_or_else(|| EcdsaError::malformed("empty DER input"))?;
    let (len, after_len) = read_length(after_tag)?;
    if len > after_len.len() {
        return Err(EcdsaError::malformed(format!(
            "DER length {} exceeds {} available bytes",
            len,
            after_len.len()
        )));
    }
    let (content, rest) = after_len.split_at(len);

    let node = match tag {
        TAG_INTEGER => DerNode::Integer(read_integer(content)?.to_vec()),
        TAG_OCTET_STRING => DerNode::OctetString(content.to_vec()),
        TAG_BIT_STRING => match content.split_first() {
            Some((0, data)) => DerNode::BitString(data.to_vec()),
            Some((unused, _)) => {
                return Err(EcdsaError::malformed(format!(
                    "BIT STRING with {} unused bits is not supported",
                    unused
                )))
            }
            None => return Err(EcdsaError::malformed("empty BIT STRING")),
        },
        TAG_OBJECT_IDENTIFIER => DerNode::ObjectIdentifier(ObjectId::from_der_content(content)?),
        TAG_SEQUENCE => {
            let mut children = Vec::new();
            let mut remaining = content;
            while !remaining.is_empty() {
                let (child, next) = decode_node(remaining, depth + 1)?;
                children.push(child);
                remaining = next;
            }
            DerNode::Sequence(children)
        }
        t if t & 0xe0 == CONTEXT_CONSTRUCTED && t & 0x1f != 0x1f => {
            let (inner, extra) = decode_node(content, depth + 1)?;
            if !extra.is_empty() {
                return Err(EcdsaError::malformed(
                    "explicit tag must wrap exactly one node",
                ));
            }
            DerNode::context(t & 0x1f, inner)
        }
        other => {
            return Err(EcdsaError::malformed(format!(
                "unsupported DER tag 0x{:02x}",
                other
            )))
        }
    };
    Ok((node, rest))
}

/// Read a definite, minimally encoded length
fn read_length(bytes: &[u8]) -> EcdsaResult<(usize, &[u8])> {
    let (&first, rest) = bytes
        .split_first()
        .ok_or_else(|| EcdsaError::malformed("missing DER length"))?;
    if first < 0x80 {
        return Ok((first as usize, rest));
    }
    if first == 0x80 {
        return Err(EcdsaError::malformed("indefinite length is not DER"));
    }

    let count = (first & 0x7f) as usize;
    if count > std::mem::size_of::<u32>() {
        return Err(EcdsaError::malformed("DER length field too long"));
    }
    if rest.len() < count {
        return Err(EcdsaError::malformed("truncated DER length"));
    }
    let (len_bytes, rest) = rest.split_at(count);
    if len_bytes[0] == 0 {
        return Err(EcdsaError::malformed("DER length has leading zero byte"));
    }
    let len = len_bytes
        .iter()
        .fold(0usize, |acc, &b| (acc << 8) | b as usize);
    if len < 0x80 {
        return Err(EcdsaError::malformed("DER length should use short form"));
    }
    Ok((len, rest))
}

/// Validate INTEGER content and return its magnitude
fn read_integer(content: &[u8]) -> EcdsaResult<&[u8]> {
    match content {
        [] => Err(EcdsaError::malformed("empty INTEGER")),
        [first, ..] if first & 0x80 != 0 => Err(EcdsaError::malformed("negative INTEGER")),
        [0, second, ..] if second & 0x80 == 0 => {
            Err(EcdsaError::malformed("INTEGER has redundant leading zero"))
        }
        [0, rest @ ..] => Ok(rest),
        _ => Ok(content),
    }
}

fn write_tlv(out: &mut Vec<u8>, tag: u8, content: &[u8]) {
    out.push(tag);
    write_length(out, content.len());
    out.extend_from_slice(content);
}

fn write_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len() - 1);
    out.push(0x80 | (bytes.len() - start) as u8);
    out.extend_from_slice(&bytes[start..]);
}
