use pico_error::{pico_bail, PicoResult};

use super::Array;
use crate::bitmap::Bitmap;
use crate::buffer::Buffer;
use crate::datatypes::DataType;
use crate::types::NativeType;

/// The Arrow equivalent of an immutable `Vec<Option<T>>`, where `T` is a
/// fixed-width [`NativeType`] (e.g. [`i32`], [`f64`]).
///
/// Cloning and sharing this struct is `O(1)`.
#[derive(Clone)]
pub struct PrimitiveArray<T: NativeType> {
    data_type: DataType,
    values: Buffer<T>,
    validity: Option<Bitmap>,
}

impl<T: NativeType> PrimitiveArray<T> {
    /// Returns a new [`PrimitiveArray`].
    /// # Errors
    /// This function errors iff:
    /// * The validity is not `None` and its length differs from `values`'s length
    /// * The `data_type`'s [`PhysicalType`] is not equal to `Primitive(T::PRIMITIVE)`
    pub fn try_new(
        data_type: DataType,
        values: Buffer<T>,
        validity: Option<Bitmap>,
    ) -> PicoResult<Self> {
        if validity
            .as_ref()
            .is_some_and(|validity| validity.len() != values.len())
        {
            pico_bail!(OutOfSpec: "validity mask length must match the number of values");
        }
        if !data_type.to_physical_type().eq_primitive(T::PRIMITIVE) {
            pico_bail!(OutOfSpec:
                "PrimitiveArray can only be initialized with a DataType whose physical type is Primitive({:?})",
                T::PRIMITIVE
            );
        }
        Ok(Self {
            data_type,
            values,
            validity,
        })
    }

    /// Returns a new [`PrimitiveArray`].
    /// # Panics
    /// This function panics iff [`PrimitiveArray::try_new`] errors.
    pub fn new(data_type: DataType, values: Buffer<T>, validity: Option<Bitmap>) -> Self {
        Self::try_new(data_type, values, validity).unwrap()
    }

    /// Returns a new [`PrimitiveArray`] of `T`'s default [`DataType`] from a
    /// vector of values.
    pub fn from_vec(values: Vec<T>) -> Self {
        Self::new(T::PRIMITIVE.into(), values.into(), None)
    }

    /// Returns a new [`PrimitiveArray`] of `T`'s default [`DataType`] from a
    /// slice of values.
    pub fn from_slice<P: AsRef<[T]>>(slice: P) -> Self {
        Self::from_vec(slice.as_ref().to_vec())
    }

    /// The length of this array.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// The values [`Buffer`].
    #[inline]
    pub fn values(&self) -> &Buffer<T> {
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
    #[inline]
    pub fn value(&self, i: usize) -> T {
        self.values[i]
    }

    /// Returns the value at slot `i` or `None` if it is null.
    /// # Panics
    /// Panics iff `i >= self.len()`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<T> {
        if self.is_null(i) {
            None
        } else {
            Some(self.value(i))
        }
    }

    /// Returns this array with a different logical type, without reallocating.
    /// # Panics
    /// Panics iff `data_type` is not supported for `T`'s physical type.
    #[must_use]
    pub fn to(self, data_type: DataType) -> Self {
        assert!(data_type.to_physical_type().eq_primitive(T::PRIMITIVE));
        Self {
            data_type,
            values: self.values,
            validity: self.validity,
        }
    }

    impl_into_array!();
}

impl<T: NativeType> Array for PrimitiveArray<T> {
    impl_common_array!();

    fn validity(&self) -> Option<&Bitmap> {
        self.validity.as_ref()
    }
}

impl<T: NativeType, P: AsRef<[Option<T>]>> From<P> for PrimitiveArray<T> {
    fn from(slice: P) -> Self {
        slice.as_ref().iter().copied().collect()
    }
}

impl<T: NativeType> FromIterator<Option<T>> for PrimitiveArray<T> {
    fn from_iter<I: IntoIterator<Item = Option<T>>>(iter: I) -> Self {
        let (values, validity): (Vec<T>, Vec<bool>) = iter
            .into_iter()
            .map(|x| (x.unwrap_or_default(), x.is_some()))
            .unzip();
        let validity = Bitmap::from(validity.as_slice());
        let validity = (validity.unset_bits() > 0).then_some(validity);
        Self::new(T::PRIMITIVE.into(), values.into(), validity)
    }
}

/// A type definition [`PrimitiveArray`] for [`i8`].
pub type Int8Array = PrimitiveArray<i8>;
/// A type definition [`PrimitiveArray`] for [`i16`].
pub type Int16Array = PrimitiveArray<i16>;
/// A type definition [`PrimitiveArray`] for [`i32`].
pub type Int32Array = PrimitiveArray<i32>;
/// A type definition [`PrimitiveArray`] for [`i64`].
pub type Int64Array = PrimitiveArray<i64>;
/// A type definition [`PrimitiveArray`] for [`i128`].
pub type Int128Array = PrimitiveArray<i128>;
/// A type definition [`PrimitiveArray`] for [`u8`].
pub type UInt8Array = PrimitiveArray<u8>;
/// A type definition [`PrimitiveArray`] for [`u16`].
pub type UInt16Array = PrimitiveArray<u16>;
/// A type definition [`PrimitiveArray`] for [`u32`].
pub type UInt32Array = PrimitiveArray<u32>;
/// A type definition [`PrimitiveArray`] for [`u64`].
pub type UInt64Array = PrimitiveArray<u64>;
/// A type definition [`PrimitiveArray`] for [`f32`].
pub type Float32Array = PrimitiveArray<f32>;
/// A type definition [`PrimitiveArray`] for [`f64`].
pub type Float64Array = PrimitiveArray<f64>;
