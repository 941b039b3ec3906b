use pico_error::{pico_bail, PicoResult};

use super::specification::try_check_utf8;
use super::Array;
use crate::bitmap::Bitmap;
use crate::buffer::Buffer;
use crate::datatypes::DataType;
use crate::offset::{Offset, OffsetsBuffer};

/// The Arrow equivalent of an immutable `Vec<Option<String>>`: UTF-8 encoded
/// strings stored as one contiguous values buffer indexed by an offsets
/// buffer.
///
/// The constructor validates that the values are UTF-8 and that every offset
/// lands on a character boundary.
#[derive(Clone)]
pub struct Utf8Array<O: Offset> {
    data_type: DataType,
    offsets: OffsetsBuffer<O>,
    values: Buffer<u8>,
    validity: Option<Bitmap>,
}

impl<O: Offset> Utf8Array<O> {
    /// Returns a new [`Utf8Array`].
    /// # Errors
    /// This function errors iff:
    /// * The values between the first and last offset are not valid UTF-8
    /// * An offset does not land on a character boundary, or exceeds the values' length
    /// * The validity is not `None` and its length differs from `offsets.len_proxy()`
    /// * The `data_type`'s physical type is not equal to either `Utf8` or `LargeUtf8`
    pub fn try_new(
        data_type: DataType,
        offsets: OffsetsBuffer<O>,
        values: Buffer<u8>,
        validity: Option<Bitmap>,
    ) -> PicoResult<Self> {
        try_check_utf8(&offsets, &values)?;

        if validity
            .as_ref()
            .is_some_and(|validity| validity.len() != offsets.len_proxy())
        {
            pico_bail!(OutOfSpec: "validity mask length must match the number of values");
        }
        if data_type.to_physical_type() != Self::default_data_type().to_physical_type() {
            pico_bail!(OutOfSpec: "Utf8Array can only be initialized with a DataType whose physical type is Utf8 or LargeUtf8");
        }

        Ok(Self {
            data_type,
            offsets,
            values,
            validity,
        })
    }

    /// Returns a new [`Utf8Array`].
    /// # Panics
    /// This function panics iff [`Utf8Array::try_new`] errors.
    pub fn new(
        data_type: DataType,
        offsets: OffsetsBuffer<O>,
        values: Buffer<u8>,
        validity: Option<Bitmap>,
    ) -> Self {
        Self::try_new(data_type, offsets, values, validity).unwrap()
    }

    /// The default [`DataType`] of this array: `Utf8` or `LargeUtf8`.
    pub fn default_data_type() -> DataType {
        if O::IS_LARGE {
            DataType::LargeUtf8
        } else {
            DataType::Utf8
        }
    }

    /// Creates a new [`Utf8Array`] from a slice of `&str`.
    pub fn from_slice<T: AsRef<str>, P: AsRef<[T]>>(slice: P) -> Self {
        let mut offsets = Vec::with_capacity(1 + slice.as_ref().len());
        let mut values = Vec::new();
        offsets.push(O::default());
        for value in slice.as_ref() {
            values.extend_from_slice(value.as_ref().as_bytes());
            offsets.push(O::try_from(values.len()).ok().expect("offset overflow"));
        }
        Self::new(
            Self::default_data_type(),
            offsets.try_into().unwrap(),
            values.into(),
            None,
        )
    }

    /// Creates a new [`Utf8Array`] from a slice of optional `&str`.
    pub fn from<T: AsRef<str>, P: AsRef<[Option<T>]>>(slice: P) -> Self {
        let mut offsets = Vec::with_capacity(1 + slice.as_ref().len());
        let mut values = Vec::new();
        let mut validity = Vec::with_capacity(slice.as_ref().len());
        offsets.push(O::default());
        for value in slice.as_ref() {
            if let Some(value) = value {
                values.extend_from_slice(value.as_ref().as_bytes());
            }
            validity.push(value.is_some());
            offsets.push(O::try_from(values.len()).ok().expect("offset overflow"));
        }
        let validity = Bitmap::from(validity.as_slice());
        let validity = (validity.unset_bits() > 0).then_some(validity);
        Self::new(
            Self::default_data_type(),
            offsets.try_into().unwrap(),
            values.into(),
            validity,
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
    pub fn value(&self, i: usize) -> &str {
        let (start, end) = self.offsets.start_end(i);
        // soundness: checked on construction
        unsafe { std::str::from_utf8_unchecked(&self.values[start..end]) }
    }

    /// Returns the value at slot `i` or `None` if it is null.
    /// # Panics
    /// Panics iff `i >= self.len()`.
    pub fn get(&self, i: usize) -> Option<&str> {
        if self.is_null(i) {
            None
        } else {
            Some(self.value(i))
        }
    }

    impl_into_array!();
}

impl<O: Offset> Array for Utf8Array<O> {
    impl_common_array!();

    fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }
}
