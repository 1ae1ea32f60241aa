//! Buffer Normalization
//!
//! Every decoder in this crate consumes a [`ByteView`]: an immutable,
//! canonical 8-bit byte sequence. Borrowed immutable bytes pass through
//! without a copy; anything the caller could still mutate is copied before
//! the conversion returns, so decoding never races with the caller.
//!
//! Wide integer elements are decomposed into their constituent bytes in a
//! declared [`ByteOrder`]. The [`IntoByteView`] impls for `&[u16]`, `&[u32]`
//! and `&[u64]` use [`ByteOrder::Native`], matching the in-memory layout of
//! the array.

use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;

use crate::error::{EcdsaError, EcdsaResult};

/// Byte order used when decomposing wide integer elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Big,
    Little,
    /// The byte order of the running platform
    Native,
}

/// Canonical immutable byte sequence
#[derive(Clone, PartialEq, Eq)]
pub struct ByteView<'a>(Cow<'a, [u8]>);

impl<'a> ByteView<'a> {
    /// Zero-copy view of immutable bytes
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self(Cow::Borrowed(bytes))
    }

    /// Take ownership of an already materialized buffer
    pub fn from_vec(bytes: Vec<u8>) -> ByteView<'static> {
        ByteView(Cow::Owned(bytes))
    }

    /// Copy a mutable buffer so later writes by the caller are not observed
    pub fn from_mut(bytes: &mut [u8]) -> ByteView<'static> {
        ByteView(Cow::Owned(bytes.to_vec()))
    }

    /// Interpret a sequence of integers as byte values.
    ///
    /// Every value must lie in 0..=255.
    pub fn from_byte_values<T>(values: &[T]) -> EcdsaResult<ByteView<'static>>
    where
        T: Copy + TryInto<u8> + fmt::Display,
    {
        let mut out = Vec::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            let byte = (*value).try_into().map_err(|_| {
                EcdsaError::invalid_input(format!(
                    "element {} has value {}, expected 0..=255",
                    index, value
                ))
            })?;
            out.push(byte);
        }
        Ok(ByteView::from_vec(out))
    }

    pub fn from_u16_elements(elements: &[u16], order: ByteOrder) -> ByteView<'static> {
        let mut out = Vec::with_capacity(elements.len() * 2);
        for e in elements {
            out.extend_from_slice(&match order {
                ByteOrder::Big => e.to_be_bytes(),
                ByteOrder::Little => e.to_le_bytes(),
                ByteOrder::Native => e.to_ne_bytes(),
            });
        }
        ByteView::from_vec(out)
    }

    pub fn from_u32_elements(elements: &[u32], order: ByteOrder) -> ByteView<'static> {
        let mut out = Vec::with_capacity(elements.len() * 4);
        for e in elements {
            out.extend_from_slice(&match order {
                ByteOrder::Big => e.to_be_bytes(),
                ByteOrder::Little => e.to_le_bytes(),
                ByteOrder::Native => e.to_ne_bytes(),
            });
        }
        ByteView::from_vec(out)
    }

    pub fn from_u64_elements(elements: &[u64], order: ByteOrder) -> ByteView<'static> {
        let mut out = Vec::with_capacity(elements.len() * 8);
        for e in elements {
            out.extend_from_slice(&match order {
                ByteOrder::Big => e.to_be_bytes(),
                ByteOrder::Little => e.to_le_bytes(),
                ByteOrder::Native => e.to_ne_bytes(),
            });
        }
        ByteView::from_vec(out)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// True when the view borrows the caller's bytes without copying
    pub fn is_borrowed(&self) -> bool {
        matches!(self.0, Cow::Borrowed(_))
    }

    pub fn into_owned(self) -> Vec<u8> {
        self.0.into_owned()
    }
}

impl Deref for ByteView<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for ByteView<'_> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for ByteView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ByteView({})", hex::encode(&self.0))
    }
}

/// Conversion of a concrete input type into a [`ByteView`]
pub trait IntoByteView<'a> {
    fn into_byte_view(self) -> ByteView<'a>;
}

impl<'a> IntoByteView<'a> for ByteView<'a> {
    fn into_byte_view(self) -> ByteView<'a> {
        self
    }
}

impl<'a> IntoByteView<'a> for &'a ByteView<'_> {
    fn into_byte_view(self) -> ByteView<'a> {
        ByteView::from_bytes(self.as_slice())
    }
}

impl<'a> IntoByteView<'a> for &'a [u8] {
    fn into_byte_view(self) -> ByteView<'a> {
        ByteView::from_bytes(self)
    }
}

impl<'a, const N: usize> IntoByteView<'a> for &'a [u8; N] {
    fn into_byte_view(self) -> ByteView<'a> {
        ByteView::from_bytes(self.as_slice())
    }
}

impl<'a> IntoByteView<'a> for &'a Vec<u8> {
    fn into_byte_view(self) -> ByteView<'a> {
        ByteView::from_bytes(self.as_slice())
    }
}

impl<'a> IntoByteView<'a> for Vec<u8> {
    fn into_byte_view(self) -> ByteView<'a> {
        ByteView(Cow::Owned(self))
    }
}

impl<'a, 'b> IntoByteView<'a> for &'b mut [u8] {
    fn into_byte_view(self) -> ByteView<'a> {
        ByteView::from_mut(self)
    }
}

impl<'a> IntoByteView<'a> for &'a str {
    fn into_byte_view(self) -> ByteView<'a> {
        ByteView::from_bytes(self.as_bytes())
    }
}

impl<'a> IntoByteView<'a> for &'a [u16] {
    fn into_byte_view(self) -> ByteView<'a> {
        ByteView::from_u16_elements(self, ByteOrder::Native)
    }
}

impl<'a> IntoByteView<'a> for &'a [u32] {
    fn into_byte_view(self) -> ByteView<'a> {
        ByteView::from_u32_elements(self, ByteOrder::Native)
    }
}

impl<'a> IntoByteView<'a> for &'a [u64] {
    fn into_byte_view(self) -> ByteView<'a> {
        ByteView::from_u64_elements(self, ByteOrder::Native)
    }
}
