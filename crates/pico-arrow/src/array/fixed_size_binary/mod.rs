use pico_error::{pico_bail, pico_ensure, PicoResult};

use super::Array;
use crate::bitmap::Bitmap;
use crate::buffer::Buffer;
use crate::datatypes::DataType;

/// The Arrow equivalent of an immutable `Vec<Option<[u8; size]>>`.
#[derive(Clone)]
pub struct FixedSizeBinaryArray {
    size: usize, // this is redundant with `data_type`, but useful to not have to deconstruct the data_type.
    data_type: DataType,
    values: Buffer<u8>,
    validity: Option<Bitmap>,
}

impl FixedSizeBinaryArray {
    /// Creates a new [`FixedSizeBinaryArray`].
    /// # Errors
    /// This function returns an error iff:
    /// * The `data_type`'s physical type is not
    ///   [`crate::datatypes::PhysicalType::FixedSizeBinary`]
    /// * The length of `values` is not a multiple of `size` in `data_type`
    /// * The validity's length is not equal to `values.len() / size`
    pub fn try_new(
        data_type: DataType,
        values: Buffer<u8>,
        validity: Option<Bitmap>,
    ) -> PicoResult<Self> {
        let size = Self::maybe_get_size(&data_type)?;

        if values.len() % size != 0 {
            pico_bail!(OutOfSpec:
                "values (of len {}) must be a multiple of size ({}) in FixedSizeBinaryArray.",
                values.len(),
                size
            )
        }
        let len = values.len() / size;

        if validity.as_ref().is_some_and(|validity| validity.len() != len) {
            pico_bail!(OutOfSpec: "validity mask length must be equal to the number of values divided by size")
        }

        Ok(Self {
            size,
            data_type,
            values,
            validity,
        })
    }

    /// Creates a new [`FixedSizeBinaryArray`].
    /// # Panics
    /// This function panics iff [`FixedSizeBinaryArray::try_new`] errors.
    pub fn new(data_type: DataType, values: Buffer<u8>, validity: Option<Bitmap>) -> Self {
        Self::try_new(data_type, values, validity).unwrap()
    }

    /// Creates a [`FixedSizeBinaryArray`] from a slice of arrays of bytes.
    pub fn from_slice<const N: usize, P: AsRef<[[u8; N]]>>(a: P) -> Self {
        let values = a.as_ref().iter().flatten().copied().collect::<Vec<_>>();
        Self::new(DataType::FixedSizeBinary(N), values.into(), None)
    }

    /// The length of this array.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len() / self.size
    }

    /// The optional validity.
    #[inline]
    pub fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }

    /// The values of this array.
    #[inline]
    pub fn values(&self) -> &Buffer<u8> {
        &self.values
    }

    /// The size of every slot, in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the value at slot `i`.
    /// # Panics
    /// Panics iff `i >= self.len()`.
    #[inline]
    pub fn value(&self, i: usize) -> &[u8] {
        assert!(i < self.len());
        &self.values[i * self.size..(i + 1) * self.size]
    }

    /// Returns the value at slot `i` or `None` if it is null.
    /// # Panics
    /// Panics iff `i >= self.len()`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&[u8]> {
        if self.is_null(i) {
            None
        } else {
            Some(self.value(i))
        }
    }

    impl_into_array!();

    pub(crate) fn maybe_get_size(data_type: &DataType) -> PicoResult<usize> {
        match data_type.to_logical_type() {
            DataType::FixedSizeBinary(size) => {
                pico_ensure!(*size != 0, OutOfSpec: "FixedSizeBinaryArray expects a positive size");
                Ok(*size)
            },
            other => {
                pico_bail!(OutOfSpec: "FixedSizeBinaryArray expects DataType::FixedSizeBinary. found {other:?}")
            },
        }
    }
}

impl Array for FixedSizeBinaryArray {
    impl_common_array!();

    fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }
}
