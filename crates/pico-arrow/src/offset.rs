//! Offset types and containers for variable-length arrays.
use pico_error::{pico_bail, PicoResult};

use crate::buffer::Buffer;
use crate::types::NativeType;

/// A sealed trait describing the subset of [`NativeType`] (`i32` and `i64`)
/// that can be used as offsets of variable-length Arrow arrays.
pub trait Offset:
    NativeType + PartialOrd + TryInto<usize> + TryFrom<usize> + std::ops::Sub<Output = Self>
{
    /// Whether this is `i64`.
    const IS_LARGE: bool;

    /// Converts itself to `usize`.
    /// # Panics
    /// Panics iff negative.
    fn to_usize(&self) -> usize;
}

impl Offset for i32 {
    const IS_LARGE: bool = false;

    #[inline]
    fn to_usize(&self) -> usize {
        usize::try_from(*self).expect("negative offset")
    }
}

impl Offset for i64 {
    const IS_LARGE: bool = true;

    #[inline]
    fn to_usize(&self) -> usize {
        usize::try_from(*self).expect("negative offset")
    }
}

/// A [`Buffer`] of offsets with the invariants of Arrow offset arrays:
/// at least one element, a non-negative first element, and monotonically
/// increasing values.
///
/// The invariants are enforced on construction; files whose offset buffers
/// violate them are rejected as structurally invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetsBuffer<O: Offset>(Buffer<O>);

impl<O: Offset> Default for OffsetsBuffer<O> {
    fn default() -> Self {
        Self(vec![O::default()].into())
    }
}

impl<O: Offset> OffsetsBuffer<O> {
    /// Creates a new [`OffsetsBuffer`] containing a single `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of slots this buffer describes, i.e. `len() - 1`.
    #[inline]
    pub fn len_proxy(&self) -> usize {
        self.0.len() - 1
    }

    /// The first offset.
    #[inline]
    pub fn first(&self) -> O {
        // invariant: non-empty
        *self.0.first().unwrap()
    }

    /// The last offset.
    #[inline]
    pub fn last(&self) -> O {
        // invariant: non-empty
        *self.0.last().unwrap()
    }

    /// The byte (or slot) range covered by slot `i`.
    /// # Panics
    /// Panics iff `i >= self.len_proxy()`.
    #[inline]
    pub fn start_end(&self, i: usize) -> (usize, usize) {
        assert!(i < self.len_proxy());
        (self.0[i].to_usize(), self.0[i + 1].to_usize())
    }

    /// The underlying [`Buffer`].
    #[inline]
    pub fn buffer(&self) -> &Buffer<O> {
        &self.0
    }

    /// The offsets as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[O] {
        self.0.as_slice()
    }
}

impl<O: Offset> TryFrom<Buffer<O>> for OffsetsBuffer<O> {
    type Error = pico_error::PicoError;

    fn try_from(buffer: Buffer<O>) -> PicoResult<Self> {
        try_check_offsets(&buffer)?;
        Ok(Self(buffer))
    }
}

impl<O: Offset> TryFrom<Vec<O>> for OffsetsBuffer<O> {
    type Error = pico_error::PicoError;

    fn try_from(offsets: Vec<O>) -> PicoResult<Self> {
        Buffer::from(offsets).try_into()
    }
}

fn try_check_offsets<O: Offset>(offsets: &[O]) -> PicoResult<()> {
    let Some(first) = offsets.first() else {
        pico_bail!(OutOfSpec: "offsets must have at least one element");
    };
    if *first < O::default() {
        pico_bail!(OutOfSpec: "offsets must not start with a negative value");
    }
    if offsets.windows(2).any(|window| window[0] > window[1]) {
        pico_bail!(OutOfSpec: "offsets must be monotonically increasing");
    }
    Ok(())
}
