//! Vector value: element types and the owned/borrowed vector buffer.
//!
//! A [`Vector`] is a fixed-type, fixed-dimension array of numbers stored as
//! raw native-order bytes. It either owns its buffer (created by the codec or
//! by [`Vector::allocate`]) or borrows bytes that live elsewhere, typically a
//! blob column of the row currently being processed. The borrow is tracked
//! by the lifetime parameter, so a borrowed vector can never outlive the
//! bytes it aliases.
//!
//! ## Element types
//!
//! Every per-encoding operation goes through [`ElementType::kernel`], which
//! is the single place where the element type is matched on. Supporting a
//! new encoding means adding a variant and a kernel module.

mod float32;

use crate::error::{VectorError, VectorResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Maximum number of elements a vector may hold.
pub const MAX_DIMS: usize = 16000;

// ============================================================================
// ElementType
// ============================================================================

/// Encoding of a single vector element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// 32-bit IEEE-754 float.
    #[default]
    Float32,
}

impl ElementType {
    /// Size in bytes of one element.
    pub fn size(self) -> usize {
        self.kernel().size()
    }

    /// Number of bytes needed for `dims` elements.
    pub fn data_size(self, dims: usize) -> usize {
        dims * self.size()
    }

    /// Lowercase name, as stored in index metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Float32 => "float32",
        }
    }

    /// Column type prefix used in declarations such as `FLOAT32(3)`.
    pub fn type_name(&self) -> &'static str {
        match self {
            ElementType::Float32 => "FLOAT32",
        }
    }

    /// All supported element types.
    pub fn all() -> &'static [ElementType] {
        &[ElementType::Float32]
    }

    /// Per-encoding operations for this element type.
    pub(crate) fn kernel(self) -> &'static dyn ElementKernel {
        match self {
            ElementType::Float32 => &float32::Float32Kernel,
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = VectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s) || t.type_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| VectorError::UnsupportedElementType { tag: s.to_string() })
    }
}

// ============================================================================
// ElementKernel
// ============================================================================

/// Operations implemented once per element encoding.
///
/// All byte slices passed in are whole multiples of [`ElementKernel::size`]
/// and hold native-order elements.
pub(crate) trait ElementKernel: Sync {
    /// Size in bytes of one element.
    fn size(&self) -> usize;

    /// Parse one text token into `dst`. Returns false if the token is not a
    /// finite number of this encoding.
    fn parse_into(&self, token: &str, dst: &mut [u8]) -> bool;

    /// Append the textual form of every element, comma separated.
    fn render_into(&self, src: &[u8], out: &mut String);

    /// Cosine distance between two equally sized element arrays.
    fn distance_cos(&self, a: &[u8], b: &[u8]) -> f32;

    /// Widen every element to `f32`.
    fn to_f32(&self, src: &[u8]) -> Vec<f32>;

    /// Narrow `values` into `dst`.
    fn from_f32(&self, values: &[f32], dst: &mut [u8]);
}

// ============================================================================
// Vector
// ============================================================================

/// A vector value.
///
/// Invariant: `as_bytes().len() == element_type().data_size(dims())`.
#[derive(Clone, PartialEq)]
pub struct Vector<'a> {
    element_type: ElementType,
    dims: usize,
    data: Cow<'a, [u8]>,
}

/// A vector that owns its buffer.
pub type OwnedVector = Vector<'static>;

impl Vector<'static> {
    /// Allocate a zero-filled vector of `dims` elements.
    ///
    /// # Errors
    ///
    /// Returns [`VectorError::DimensionOverflow`] if `dims > MAX_DIMS` and
    /// [`VectorError::OutOfMemory`] if the buffer cannot be reserved.
    pub fn allocate(element_type: ElementType, dims: usize) -> VectorResult<Self> {
        if dims > MAX_DIMS {
            return Err(VectorError::DimensionOverflow { max: MAX_DIMS });
        }
        let bytes = element_type.data_size(dims);
        let mut data = Vec::new();
        data.try_reserve_exact(bytes).map_err(|_| {
            debug!("Failed to reserve {} bytes for vector", bytes);
            VectorError::OutOfMemory { bytes }
        })?;
        data.resize(bytes, 0);
        Ok(Self {
            element_type,
            dims,
            data: Cow::Owned(data),
        })
    }

    /// Allocate a scratch vector large enough for any parsed input.
    pub fn scratch(element_type: ElementType) -> VectorResult<Self> {
        Self::allocate(element_type, MAX_DIMS)
    }

    /// Build an owned vector from `f32` values.
    pub fn from_f32_slice(element_type: ElementType, values: &[f32]) -> VectorResult<Self> {
        let mut v = Self::allocate(element_type, values.len())?;
        element_type.kernel().from_f32(values, v.bytes_mut());
        Ok(v)
    }
}

impl<'a> Vector<'a> {
    /// Alias `bytes` as a vector without copying.
    ///
    /// `bytes.len()` must be a multiple of the element size; trailing bytes
    /// that do not form a whole element are ignored in release builds.
    pub fn wrap_borrowed(element_type: ElementType, bytes: &'a [u8]) -> Self {
        let size = element_type.size();
        debug_assert_eq!(
            bytes.len() % size,
            0,
            "blob length {} is not a multiple of {}",
            bytes.len(),
            size
        );
        let dims = bytes.len() / size;
        Self {
            element_type,
            dims,
            data: Cow::Borrowed(&bytes[..dims * size]),
        }
    }

    /// Element encoding.
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Number of elements.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Whether the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.dims == 0
    }

    /// Raw native-order element bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whether the buffer aliases bytes owned by someone else.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.data, Cow::Borrowed(_))
    }

    /// Elements widened to `f32`.
    pub fn to_f32_vec(&self) -> Vec<f32> {
        self.element_type.kernel().to_f32(&self.data)
    }

    /// Detach from the source bytes, copying if borrowed.
    pub fn into_owned(self) -> OwnedVector {
        Vector {
            element_type: self.element_type,
            dims: self.dims,
            data: Cow::Owned(self.data.into_owned()),
        }
    }

    /// Release the vector. Owned buffers are freed; borrowed bytes are left
    /// untouched.
    pub fn release(self) {}

    /// Shrink to the first `dims` elements.
    pub(crate) fn truncate(&mut self, dims: usize) {
        debug_assert!(dims <= self.dims);
        let len = self.element_type.data_size(dims);
        match &mut self.data {
            Cow::Owned(buf) => buf.truncate(len),
            Cow::Borrowed(buf) => *buf = &buf[..len],
        }
        self.dims = dims;
    }

    /// Mutable element bytes. Copies first if the vector is borrowed.
    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        self.data.to_mut()
    }
}

impl fmt::Debug for Vector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vector({}, dims={}, {})",
            self.element_type,
            self.dims,
            if self.is_borrowed() { "borrowed" } else { "owned" }
        )
    }
}

impl fmt::Display for Vector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::codec::render(self))
    }
}

// ============================================================================
// Tests
// ============================================================================
