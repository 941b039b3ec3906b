use pico_error::{pico_bail, PicoResult};

use super::specification::try_check_offsets_bounds;
use super::Array;
use crate::bitmap::Bitmap;
use crate::datatypes::{DataType, Field};
use crate::offset::OffsetsBuffer;

/// An [`Array`] of (key, value) entries of arbitrary logical types.
///
/// Physically identical to a [`ListArray`](super::ListArray) of `i32`
/// offsets whose element is a two-field struct.
#[derive(Clone)]
pub struct MapArray {
    data_type: DataType,
    // invariant: field.len() == offsets.last()
    offsets: OffsetsBuffer<i32>,
    field: Box<dyn Array>,
    // invariant: offsets.len_proxy() == validity.len()
    validity: Option<Bitmap>,
}

impl MapArray {
    /// Returns a new [`MapArray`].
    /// # Errors
    /// This function errors iff:
    /// * The last offset is greater than the field's length
    /// * The `data_type`'s physical type is not `Map`
    /// * The inner field of `data_type` is not a struct of exactly two fields
    /// * The field's `data_type` is not equal to the inner field of `data_type`
    /// * The validity is not `None` and its length differs from `offsets.len_proxy()`
    pub fn try_new(
        data_type: DataType,
        offsets: OffsetsBuffer<i32>,
        field: Box<dyn Array>,
        validity: Option<Bitmap>,
    ) -> PicoResult<Self> {
        try_check_offsets_bounds(&offsets, field.len())?;

        let inner_field = Self::try_get_field(&data_type)?;
        if let DataType::Struct(inner) = inner_field.data_type() {
            if inner.len() != 2 {
                pico_bail!(OutOfSpec: "MapArray's inner `Struct` must have 2 fields (keys and values)")
            }
        } else {
            pico_bail!(OutOfSpec: "MapArray expects `DataType::Struct` as its inner logical type")
        }
        if field.data_type() != inner_field.data_type() {
            pico_bail!(OutOfSpec: "MapArray expects `field.data_type` to match its inner DataType")
        }

        if validity
            .as_ref()
            .is_some_and(|validity| validity.len() != offsets.len_proxy())
        {
            pico_bail!(OutOfSpec: "validity mask length must match the number of values")
        }

        Ok(Self {
            data_type,
            field,
            offsets,
            validity,
        })
    }

    /// Returns a new [`MapArray`].
    /// # Panics
    /// This function panics iff [`MapArray::try_new`] errors.
    pub fn new(
        data_type: DataType,
        offsets: OffsetsBuffer<i32>,
        field: Box<dyn Array>,
        validity: Option<Bitmap>,
    ) -> Self {
        Self::try_new(data_type, offsets, field, validity).unwrap()
    }

    /// Returns the (key, value) entries [`Field`] of this map's [`DataType`].
    /// # Errors
    /// Errors iff the logical type is not `Map`.
    pub fn try_get_field(data_type: &DataType) -> PicoResult<&Field> {
        if let DataType::Map(field, _) = data_type.to_logical_type() {
            Ok(field.as_ref())
        } else {
            pico_bail!(OutOfSpec: "The data_type's logical type must be DataType::Map")
        }
    }

    /// The length of this array.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len_proxy()
    }

    /// The offsets of this array.
    #[inline]
    pub fn offsets(&self) -> &OffsetsBuffer<i32> {
        &self.offsets
    }

    /// The entries array (guaranteed to be a two-field struct).
    #[inline]
    pub fn field(&self) -> &Box<dyn Array> {
        &self.field
    }

    /// The optional validity.
    #[inline]
    pub fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }

    impl_into_array!();
}

impl Array for MapArray {
    impl_common_array!();

    fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }
}
