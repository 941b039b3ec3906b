//! Contains the [`Array`] trait object and the concrete arrays of this crate
//! (such as [`Utf8Array`] and [`PrimitiveArray`]).
//!
//! Fixed-length containers with optional validity that are laid out in memory
//! according to the Arrow specification. All arrays implement the trait
//! object [`Array`] that can be downcasted to a concrete struct based on
//! [`PhysicalType`](crate::datatypes::PhysicalType) available from
//! [`Array::data_type`]. All arrays are backed by
//! [`Buffer`](crate::buffer::Buffer) and thus cloning them is `O(1)`.
use std::any::Any;

use crate::bitmap::Bitmap;
use crate::datatypes::DataType;

/// A trait representing an immutable Arrow array. Arrow arrays are trait
/// objects that are infallibly downcasted to concrete types according to
/// [`Array::data_type`].
pub trait Array: Send + Sync + dyn_clone::DynClone + 'static {
    /// Converts itself to a reference of [`Any`], which enables downcasting
    /// to concrete types.
    fn as_any(&self) -> &dyn Any;

    /// The length of the [`Array`]: the number of slots.
    fn len(&self) -> usize;

    /// Whether the array is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The [`DataType`] of the [`Array`]. In combination with
    /// [`Array::as_any`], this can be used to downcast `dyn Array` to
    /// concrete arrays.
    fn data_type(&self) -> &DataType;

    /// The validity of the [`Array`]: an optional [`Bitmap`] specifying
    /// whether each slot is valid. When [`None`], all slots are valid.
    fn validity(&self) -> Option<&Bitmap>;

    /// The number of null slots in this [`Array`].
    /// # Implementation
    /// This is `O(1)` since the number of unset bits is pre-computed.
    #[inline]
    fn null_count(&self) -> usize {
        if self.data_type() == &DataType::Null {
            return self.len();
        };
        self.validity().map(|x| x.unset_bits()).unwrap_or(0)
    }

    /// Returns whether slot `i` is null.
    /// # Panics
    /// Panics iff `i >= self.len()`.
    #[inline]
    fn is_null(&self, i: usize) -> bool {
        assert!(i < self.len());
        self.validity().map(|x| !x.get_bit(i)).unwrap_or(false)
    }

    /// Returns whether slot `i` is valid.
    /// # Panics
    /// Panics iff `i >= self.len()`.
    #[inline]
    fn is_valid(&self, i: usize) -> bool {
        !self.is_null(i)
    }

    /// Clones a `&dyn Array` into an owned `Box<dyn Array>`.
    fn to_boxed(&self) -> Box<dyn Array>;
}

dyn_clone::clone_trait_object!(Array);

// macro implementing `boxed` and `arced`
macro_rules! impl_into_array {
    () => {
        /// Boxes this array into a [`Box<dyn Array>`].
        pub fn boxed(self) -> Box<dyn Array> {
            Box::new(self)
        }

        /// Arcs this array into a [`std::sync::Arc<dyn Array>`].
        pub fn arced(self) -> std::sync::Arc<dyn Array> {
            std::sync::Arc::new(self)
        }
    };
}

// macro implementing common methods of the trait `Array`
macro_rules! impl_common_array {
    () => {
        #[inline]
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        #[inline]
        fn len(&self) -> usize {
            self.len()
        }

        #[inline]
        fn data_type(&self) -> &DataType {
            &self.data_type
        }

        #[inline]
        fn to_boxed(&self) -> Box<dyn Array> {
            Box::new(self.clone())
        }
    };
}

mod binary;
mod boolean;
mod fixed_size_binary;
mod fixed_size_list;
mod list;
mod map;
mod null;
mod primitive;
mod struct_;
mod utf8;

mod equal;
mod fmt;
pub mod specification;

pub use binary::BinaryArray;
pub use boolean::BooleanArray;
pub use equal::equal;
pub use fixed_size_binary::FixedSizeBinaryArray;
pub use fixed_size_list::FixedSizeListArray;
pub use list::ListArray;
pub use map::MapArray;
pub use null::NullArray;
pub use primitive::PrimitiveArray;
pub use struct_::StructArray;
pub use utf8::Utf8Array;

/// A type alias for a boxed [`Array`].
pub type ArrayRef = Box<dyn Array>;

impl PartialEq<dyn Array> for dyn Array + '_ {
    fn eq(&self, other: &dyn Array) -> bool {
        equal(self, other)
    }
}

impl PartialEq<&dyn Array> for Box<dyn Array + '_> {
    fn eq(&self, other: &&dyn Array) -> bool {
        equal(self.as_ref(), *other)
    }
}

// see https://users.rust-lang.org/t/generic-for-dyn-a-or-box-dyn-a-or-arc-dyn-a/69430/3
impl<'a> AsRef<(dyn Array + 'a)> for dyn Array {
    fn as_ref(&self) -> &(dyn Array + 'a) {
        self
    }
}
