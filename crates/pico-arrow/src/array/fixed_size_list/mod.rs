use pico_error::{pico_bail, pico_ensure, PicoResult};

use super::Array;
use crate::bitmap::Bitmap;
use crate::datatypes::{DataType, Field};

/// An [`Array`] semantically equivalent to `Vec<Option<[Option<T>; size]>>`:
/// every slot holds exactly `size` elements of the child array.
#[derive(Clone)]
pub struct FixedSizeListArray {
    size: usize, // this is redundant with `data_type`, but useful to not have to deconstruct the data_type.
    data_type: DataType,
    values: Box<dyn Array>,
    validity: Option<Bitmap>,
}

impl FixedSizeListArray {
    /// Creates a new [`FixedSizeListArray`].
    /// # Errors
    /// This function errors iff:
    /// * The `data_type`'s physical type is not `FixedSizeList`
    /// * The `data_type`'s size is zero
    /// * The length of `values` is not a multiple of `size`
    /// * The child of the `data_type` is not equal to the `values`' `data_type`
    /// * The validity's length does not equal `values.len() / size`
    pub fn try_new(
        data_type: DataType,
        values: Box<dyn Array>,
        validity: Option<Bitmap>,
    ) -> PicoResult<Self> {
        let (child, size) = Self::try_child_and_size(&data_type)?;

        let child_data_type = child.data_type();
        if child_data_type != values.data_type() {
            pico_bail!(OutOfSpec:
                "FixedSizeListArray's child's DataType must match. However, the expected DataType is {child_data_type:?} while it got {:?}.",
                values.data_type()
            )
        }

        if values.len() % size != 0 {
            pico_bail!(OutOfSpec:
                "values (of len {}) must be a multiple of size ({}) in FixedSizeListArray.",
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

    /// Creates a new [`FixedSizeListArray`].
    /// # Panics
    /// This function panics iff [`FixedSizeListArray::try_new`] errors.
    pub fn new(data_type: DataType, values: Box<dyn Array>, validity: Option<Bitmap>) -> Self {
        Self::try_new(data_type, values, validity).unwrap()
    }

    pub(crate) fn try_child_and_size(data_type: &DataType) -> PicoResult<(&Field, usize)> {
        match data_type.to_logical_type() {
            DataType::FixedSizeList(child, size) => {
                pico_ensure!(*size != 0, OutOfSpec: "FixedSizeListArray expects a positive size");
                Ok((child.as_ref(), *size))
            },
            _ => pico_bail!(OutOfSpec: "FixedSizeListArray expects DataType::FixedSizeList"),
        }
    }

    /// The length of this array.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len() / self.size
    }

    /// The number of elements per slot.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// The child array of the element values.
    #[inline]
    pub fn values(&self) -> &Box<dyn Array> {
        &self.values
    }

    /// The optional validity.
    #[inline]
    pub fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }

    impl_into_array!();
}

impl Array for FixedSizeListArray {
    impl_common_array!();

    fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }
}
