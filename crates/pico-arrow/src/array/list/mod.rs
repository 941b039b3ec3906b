use pico_error::{pico_bail, PicoResult};

use super::specification::try_check_offsets_bounds;
use super::Array;
use crate::bitmap::Bitmap;
use crate::datatypes::{DataType, Field};
use crate::offset::{Offset, OffsetsBuffer};

/// An [`Array`] semantically equivalent to `Vec<Option<Vec<Option<T>>>>`:
/// an array of variable-length arrays, with the element values stored in a
/// single child array indexed by an offsets buffer.
#[derive(Clone)]
pub struct ListArray<O: Offset> {
    data_type: DataType,
    offsets: OffsetsBuffer<O>,
    values: Box<dyn Array>,
    validity: Option<Bitmap>,
}

impl<O: Offset> ListArray<O> {
    /// Creates a new [`ListArray`].
    /// # Errors
    /// This function errors iff:
    /// * The last offset is greater than the values' length
    /// * The validity is not `None` and its length differs from `offsets.len_proxy()`
    /// * The `data_type`'s physical type is not equal to `List` (`LargeList` for `i64` offsets)
    /// * The child of the `data_type` is not equal to the `values`' `data_type`
    pub fn try_new(
        data_type: DataType,
        offsets: OffsetsBuffer<O>,
        values: Box<dyn Array>,
        validity: Option<Bitmap>,
    ) -> PicoResult<Self> {
        try_check_offsets_bounds(&offsets, values.len())?;

        let child_data_type = Self::try_get_child(&data_type)?.data_type();
        if child_data_type != values.data_type() {
            pico_bail!(OutOfSpec:
                "ListArray's child's DataType must match. However, the expected DataType is {child_data_type:?} while it got {:?}.",
                values.data_type()
            )
        }

        if validity
            .as_ref()
            .is_some_and(|validity| validity.len() != offsets.len_proxy())
        {
            pico_bail!(OutOfSpec: "validity mask length must match the number of values");
        }

        Ok(Self {
            data_type,
            offsets,
            values,
            validity,
        })
    }

    /// Creates a new [`ListArray`].
    /// # Panics
    /// This function panics iff [`ListArray::try_new`] errors.
    pub fn new(
        data_type: DataType,
        offsets: OffsetsBuffer<O>,
        values: Box<dyn Array>,
        validity: Option<Bitmap>,
    ) -> Self {
        Self::try_new(data_type, offsets, values, validity).unwrap()
    }

    /// The default [`DataType`] of a list whose elements have `data_type`.
    pub fn default_datatype(data_type: DataType) -> DataType {
        let field = Box::new(Field::new("item", data_type, true));
        if O::IS_LARGE {
            DataType::LargeList(field)
        } else {
            DataType::List(field)
        }
    }

    /// Returns the element [`Field`] of this list's [`DataType`].
    /// # Errors
    /// Errors iff the logical type is not `List`/`LargeList`.
    pub fn try_get_child(data_type: &DataType) -> PicoResult<&Field> {
        if O::IS_LARGE {
            match data_type.to_logical_type() {
                DataType::LargeList(child) => Ok(child.as_ref()),
                _ => pico_bail!(OutOfSpec: "ListArray<i64> expects DataType::LargeList"),
            }
        } else {
            match data_type.to_logical_type() {
                DataType::List(child) => Ok(child.as_ref()),
                _ => pico_bail!(OutOfSpec: "ListArray<i32> expects DataType::List"),
            }
        }
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

    /// The `(start, end)` range of the child values of slot `i`.
    /// # Panics
    /// Panics iff `i >= self.len()`.
    #[inline]
    pub fn value_range(&self, i: usize) -> (usize, usize) {
        self.offsets.start_end(i)
    }

    impl_into_array!();
}

impl<O: Offset> Array for ListArray<O> {
    impl_common_array!();

    fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }
}
