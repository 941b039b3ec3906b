use pico_error::{pico_bail, PicoResult};

use super::Array;
use crate::bitmap::Bitmap;
use crate::datatypes::{DataType, PhysicalType};

/// The Arrow equivalent of an immutable `Vec<Option<bool>>`, with both the
/// values and the validity stored as bitmaps.
#[derive(Clone)]
pub struct BooleanArray {
    data_type: DataType,
    values: Bitmap,
    validity: Option<Bitmap>,
}

impl BooleanArray {
    /// Returns a new [`BooleanArray`].
    /// # Errors
    /// This function errors iff:
    /// * The validity is not `None` and its length differs from `values`'s length
    /// * The `data_type`'s physical type is not [`PhysicalType::Boolean`]
    pub fn try_new(
        data_type: DataType,
        values: Bitmap,
        validity: Option<Bitmap>,
    ) -> PicoResult<Self> {
        if validity
            .as_ref()
            .is_some_and(|validity| validity.len() != values.len())
        {
            pico_bail!(OutOfSpec: "validity mask length must match the number of values");
        }
        if data_type.to_physical_type() != PhysicalType::Boolean {
            pico_bail!(OutOfSpec: "BooleanArray can only be initialized with a DataType whose physical type is Boolean");
        }
        Ok(Self {
            data_type,
            values,
            validity,
        })
    }

    /// Returns a new [`BooleanArray`].
    /// # Panics
    /// This function panics iff [`BooleanArray::try_new`] errors.
    pub fn new(data_type: DataType, values: Bitmap, validity: Option<Bitmap>) -> Self {
        Self::try_new(data_type, values, validity).unwrap()
    }

    /// The length of this array.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// The values [`Bitmap`].
    #[inline]
    pub fn values(&self) -> &Bitmap {
        &self.values
    }

    /// The optional validity.
    #[inline]
    pub fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }

    /// Returns the value at slot `i`.
    /// # Panics
    /// Panics iff `i >= self.len()`.
    #[inline]
    pub fn value(&self, i: usize) -> bool {
        self.values.get_bit(i)
    }

    /// Returns the value at slot `i` or `None` if it is null.
    /// # Panics
    /// Panics iff `i >= self.len()`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<bool> {
        if self.is_null(i) {
            None
        } else {
            Some(self.value(i))
        }
    }

    impl_into_array!();
}

impl Array for BooleanArray {
    impl_common_array!();

    fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }
}

impl From<&[bool]> for BooleanArray {
    fn from(slice: &[bool]) -> Self {
        Self::new(DataType::Boolean, slice.into(), None)
    }
}

impl<const N: usize> From<[Option<bool>; N]> for BooleanArray {
    fn from(slice: [Option<bool>; N]) -> Self {
        slice.iter().copied().collect()
    }
}

impl FromIterator<Option<bool>> for BooleanArray {
    fn from_iter<I: IntoIterator<Item = Option<bool>>>(iter: I) -> Self {
        let (values, validity): (Vec<bool>, Vec<bool>) = iter
            .into_iter()
            .map(|x| (x.unwrap_or_default(), x.is_some()))
            .unzip();
        let validity = Bitmap::from(validity.as_slice());
        let validity = (validity.unset_bits() > 0).then_some(validity);
        Self::new(DataType::Boolean, values.as_slice().into(), validity)
    }
}
