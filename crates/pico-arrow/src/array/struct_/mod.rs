use pico_error::{pico_bail, PicoResult};

use super::Array;
use crate::bitmap::Bitmap;
use crate::datatypes::{DataType, Field};

/// An [`Array`] of named child arrays, all of the same length, identified by
/// [`Field`]s: the Arrow equivalent of a vector of structs.
#[derive(Clone)]
pub struct StructArray {
    data_type: DataType,
    // invariant: every array has length `length`
    length: usize,
    values: Vec<Box<dyn Array>>,
    validity: Option<Bitmap>,
}

impl StructArray {
    /// Creates a new [`StructArray`].
    /// # Errors
    /// This function errors iff:
    /// * The `data_type`'s physical type is not `Struct`
    /// * The number of child values differs from the number of fields in `data_type`
    /// * Any child's length differs from `length`
    /// * Any child's `data_type` differs from its field's
    /// * The validity's length differs from `length`
    pub fn try_new(
        data_type: DataType,
        length: usize,
        values: Vec<Box<dyn Array>>,
        validity: Option<Bitmap>,
    ) -> PicoResult<Self> {
        let fields = Self::try_get_fields(&data_type)?;
        if fields.len() != values.len() {
            pico_bail!(OutOfSpec:
                "a StructArray must have a number of fields in its DataType equal to the number of child values ({} != {})",
                fields.len(),
                values.len()
            )
        }

        for (index, (field, child)) in fields.iter().zip(values.iter()).enumerate() {
            if field.data_type() != child.data_type() {
                pico_bail!(OutOfSpec:
                    "the children DataTypes of a StructArray must equal the children data types. However, the field {index} has data type {:?} while the value has data type {:?}",
                    field.data_type(),
                    child.data_type()
                )
            }
            if child.len() != length {
                pico_bail!(OutOfSpec:
                    "the children must have the length of the StructArray. However, the child {index} has length {} while the expected length is {length}",
                    child.len()
                )
            }
        }

        if validity
            .as_ref()
            .is_some_and(|validity| validity.len() != length)
        {
            pico_bail!(OutOfSpec: "validity mask length must match the number of values");
        }

        Ok(Self {
            data_type,
            length,
            values,
            validity,
        })
    }

    /// Creates a new [`StructArray`].
    /// # Panics
    /// This function panics iff [`StructArray::try_new`] errors.
    pub fn new(
        data_type: DataType,
        length: usize,
        values: Vec<Box<dyn Array>>,
        validity: Option<Bitmap>,
    ) -> Self {
        Self::try_new(data_type, length, values, validity).unwrap()
    }

    /// Returns the fields of this [`StructArray`]'s [`DataType`].
    /// # Errors
    /// Errors iff the logical type is not `Struct`.
    pub fn try_get_fields(data_type: &DataType) -> PicoResult<&[Field]> {
        match data_type.to_logical_type() {
            DataType::Struct(fields) => Ok(fields),
            _ => pico_bail!(OutOfSpec: "StructArray expects DataType::Struct"),
        }
    }

    /// The length of this array.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// The child arrays.
    #[inline]
    pub fn values(&self) -> &[Box<dyn Array>] {
        &self.values
    }

    /// The fields of this array's [`DataType`].
    pub fn fields(&self) -> &[Field] {
        Self::try_get_fields(&self.data_type).unwrap()
    }

    /// The optional validity.
    #[inline]
    pub fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }

    impl_into_array!();
}

impl Array for StructArray {
    impl_common_array!();

    fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }
}
