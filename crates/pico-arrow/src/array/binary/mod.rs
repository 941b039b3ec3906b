use pico_error::{pico_bail, PicoResult};

use super::specification::try_check_offsets_bounds;
use super::Array;
use crate::bitmap::Bitmap;
use crate::buffer::Buffer;
use crate::datatypes::DataType;
use crate::offset::{Offset, OffsetsBuffer};

/// The Arrow equivalent of an immutable `Vec<Option<Vec<u8>>>`: opaque
/// variable-length binary values, stored as one contiguous values buffer
/// indexed by an offsets buffer.
#[derive(Clone)]
pub struct BinaryArray<O: Offset> {
    data_type: DataType,
    offsets: OffsetsBuffer<O>,
    values: Buffer<u8>,
    validity: Option<Bitmap>,
}

impl<O: Offset> BinaryArray<O> {
    /// Returns a new [`BinaryArray`].
    /// # Errors
    /// This function errors iff:
    /// * The last offset is greater than the values' length
    /// * The validity is not `None` and its length differs from `offsets.len_proxy()`
    /// * The `data_type`'s physical type is not equal to either `Binary` or `LargeBinary`
    pub fn try_new(
        data_type: DataType,
        offsets: OffsetsBuffer<O>,
        values: Buffer<u8>,
        validity: Option<Bitmap>,
    ) -> PicoResult<Self> {
        try_check_offsets_bounds(&offsets, values.len())?;

        if validity
            .as_ref()
            .is_some_and(|validity| validity.len() != offsets.len_proxy())
        {
            pico_bail!(OutOfSpec: "validity mask length must match the number of values");
        }
        if data_type.to_physical_type() != Self::default_data_type().to_physical_type() {
            pico_bail!(OutOfSpec: "BinaryArray can only be initialized with a DataType whose physical type is Binary or LargeBinary");
        }

        Ok(Self {
            data_type,
            offsets,
            values,
            validity,
        })
    }

    /// Returns a new [`BinaryArray`].
    /// # Panics
    /// This function panics iff [`BinaryArray::try_new`] errors.
    pub fn new(
        data_type: DataType,
        offsets: OffsetsBuffer<O>,
        values: Buffer<u8>,
        validity: Option<Bitmap>,
    ) -> Self {
        Self::try_new(data_type, offsets, values, validity).unwrap()
    }

    /// The default [`DataType`] of this array: `Binary` or `LargeBinary`.
    pub fn default_data_type() -> DataType {
        if O::IS_LARGE {
            DataType::LargeBinary
        } else {
            DataType::Binary
        }
    }

    /// Creates a new [`BinaryArray`] from a slice of `&[u8]`.
    pub fn from_slice<T: AsRef<[u8]>, P: AsRef<[T]>>(slice: P) -> Self {
        let mut offsets = Vec::with_capacity(1 + slice.as_ref().len());
        let mut values = Vec::new();
        offsets.push(O::default());
        for value in slice.as_ref() {
            values.extend_from_slice(value.as_ref());
            offsets.push(O::try_from(values.len()).ok().expect("offset overflow"));
        }
        Self::new(
            Self::default_data_type(),
            offsets.try_into().unwrap(),
            values.into(),
            None,
        )
    }

    /// The length of this array.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len_proxy()
    }

    /// The offsets of this array.
    #[inline]
    pub fn offsets(&self) -> &OffsetsBuffer<O> {
        &self.offsets
    }

    /// The values of this array.
    #[inline]
    pub fn values(&self) -> &Buffer<u8> {
        &self.values
    }

    /// The optional validity.
    #[inline]
    pub fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }

    /// Returns the value at slot `i`, irrespective of its validity.
    /// # Panics
    /// Panics iff `i >= self.len()`.
    pub fn value(&self, i: usize) -> &[u8] {
        let (start, end) = self.offsets.start_end(i);
        &self.values[start..end]
    }

    /// Returns the value at slot `i` or `None` if it is null.
    /// # Panics
    /// Panics iff `i >= self.len()`.
    pub fn get(&self, i: usize) -> Option<&[u8]> {
        if self.is_null(i) {
            None
        } else {
            Some(self.value(i))
        }
    }

    impl_into_array!();
}

impl<O: Offset> Array for BinaryArray<O> {
    impl_common_array!();

    fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }
}
