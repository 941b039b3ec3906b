use pico_error::{pico_bail, PicoResult};

use super::Array;
use crate::bitmap::Bitmap;
use crate::datatypes::{DataType, PhysicalType};

/// The concrete [`Array`] of [`DataType::Null`]: it holds no allocation,
/// only a length. All of its slots are null.
#[derive(Clone)]
pub struct NullArray {
    data_type: DataType,
    length: usize,
}

impl NullArray {
    /// Returns a new [`NullArray`].
    /// # Errors
    /// This function errors iff the `data_type`'s physical type is not
    /// [`PhysicalType::Null`].
    pub fn try_new(data_type: DataType, length: usize) -> PicoResult<Self> {
        if data_type.to_physical_type() != PhysicalType::Null {
            pico_bail!(OutOfSpec: "NullArray can only be initialized with a DataType whose physical type is Null");
        }
        Ok(Self { data_type, length })
    }

    /// Returns a new [`NullArray`].
    /// # Panics
    /// This function panics iff the `data_type`'s physical type is not
    /// [`PhysicalType::Null`].
    pub fn new(data_type: DataType, length: usize) -> Self {
        Self::try_new(data_type, length).unwrap()
    }

    /// The length of this array.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether the array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    impl_into_array!();
}

impl Array for NullArray {
    impl_common_array!();

    fn validity(&self) -> Option<&Bitmap> {
        None
    }
}
