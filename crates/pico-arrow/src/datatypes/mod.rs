//! Contains all metadata types: [`PhysicalType`], [`DataType`], [`Field`] and [`Schema`].
mod field;
mod physical_type;
mod schema;

use std::collections::BTreeMap;
use std::sync::Arc;

pub use field::Field;
pub use physical_type::*;
pub use schema::Schema;

/// typedef for [`BTreeMap<String, String>`] denoting [`Field`]'s and [`Schema`]'s metadata.
pub type Metadata = BTreeMap<String, String>;
/// typedef for the extension metadata `(name, serialized_metadata)` of a [`Field`].
pub(crate) type Extension = Option<(String, Option<String>)>;

/// typedef for [`Arc<Schema>`].
pub type SchemaRef = Arc<Schema>;

/// The set of supported logical types in this crate.
///
/// Each variant uniquely identifies a logical type, which defines specific
/// semantics for the data. Each variant has a corresponding [`PhysicalType`],
/// obtained via [`DataType::to_physical_type`], which declares the in-memory
/// representation of the data. [`DataType::Extension`] is special in that it
/// augments a [`DataType`] with metadata to support custom types; use
/// [`DataType::to_logical_type`] to desugar it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    /// Null type, with no allocation.
    #[default]
    Null,
    /// `true` and `false`.
    Boolean,
    /// An [`i8`].
    Int8,
    /// An [`i16`].
    Int16,
    /// An [`i32`].
    Int32,
    /// An [`i64`].
    Int64,
    /// An [`u8`].
    UInt8,
    /// An [`u16`].
    UInt16,
    /// An [`u32`].
    UInt32,
    /// An [`u64`].
    UInt64,
    /// A 16-bit IEEE 754 floating point number.
    Float16,
    /// An [`f32`].
    Float32,
    /// An [`f64`].
    Float64,
    /// An [`i64`] representing a timestamp measured in [`TimeUnit`] since the
    /// UNIX epoch, with an optional timezone.
    Timestamp(TimeUnit, Option<String>),
    /// An [`i32`] representing the elapsed time since the UNIX epoch in days.
    Date32,
    /// An [`i64`] representing the elapsed time since the UNIX epoch in
    /// milliseconds. Values are evenly divisible by 86_400_000.
    Date64,
    /// A 32-bit time since midnight, in [`TimeUnit::Second`] or
    /// [`TimeUnit::Millisecond`].
    Time32(TimeUnit),
    /// A 64-bit time since midnight, in [`TimeUnit::Microsecond`] or
    /// [`TimeUnit::Nanosecond`].
    Time64(TimeUnit),
    /// A measure of elapsed physical time in [`TimeUnit`].
    Duration(TimeUnit),
    /// A "calendar" interval that takes calendar shifts into account.
    Interval(IntervalUnit),
    /// Opaque binary data of variable length, with [`i32`] offsets.
    Binary,
    /// Opaque binary data of fixed size; the parameter is the number of bytes
    /// per value.
    FixedSizeBinary(usize),
    /// Opaque binary data of variable length, with [`i64`] offsets.
    LargeBinary,
    /// A variable-length UTF-8 encoded string, with [`i32`] offsets.
    Utf8,
    /// A variable-length UTF-8 encoded string, with [`i64`] offsets.
    LargeUtf8,
    /// A list of some logical type, with [`i32`] offsets.
    List(Box<Field>),
    /// A list of some logical type with a fixed number of elements per slot.
    FixedSizeList(Box<Field>, usize),
    /// A list of some logical type, with [`i64`] offsets.
    LargeList(Box<Field>),
    /// A nested type with a fixed number of named [`Field`]s.
    Struct(Vec<Field>),
    /// A nested type represented as `List<entries: Struct<key: K, value: V>>`,
    /// where the boolean denotes whether keys are sorted.
    Map(Box<Field>, bool),
    /// A nested type whose slots may each hold a different child type.
    /// `(fields, type_ids, mode)`.
    Union(Vec<Field>, Option<Vec<i32>>, UnionMode),
    /// A dictionary-encoded array: indices of `key` type into a dictionary of
    /// the value type. The boolean denotes whether the dictionary is sorted.
    Dictionary(IntegerType, Box<DataType>, bool),
    /// A 128-bit decimal with the given precision and scale.
    Decimal(usize, usize),
    /// An extension type: `(name, inner, serialized_metadata)`. The extension
    /// identity lives at the schema level; the physical layout is the inner
    /// type's.
    Extension(String, Box<DataType>, Option<String>),
}

/// The time units defined in Arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    /// Time in seconds.
    Second,
    /// Time in milliseconds.
    Millisecond,
    /// Time in microseconds.
    Microsecond,
    /// Time in nanoseconds.
    Nanosecond,
}

/// The interval units defined in Arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    /// The number of elapsed whole months.
    YearMonth,
    /// The number of elapsed days and milliseconds, stored as 2 contiguous `i32`.
    DayTime,
    /// The number of elapsed months (`i32`), days (`i32`) and nanoseconds (`i64`).
    MonthDayNano,
}

/// The mode of a [`DataType::Union`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnionMode {
    /// Dense union.
    Dense,
    /// Sparse union.
    Sparse,
}

impl UnionMode {
    /// Constructs [`UnionMode::Sparse`] if the input is true, [`UnionMode::Dense`] otherwise.
    pub fn sparse(is_sparse: bool) -> Self {
        if is_sparse {
            Self::Sparse
        } else {
            Self::Dense
        }
    }
}

impl DataType {
    /// The [`PhysicalType`] of this [`DataType`].
    pub fn to_physical_type(&self) -> PhysicalType {
        use DataType::*;
        match self {
            Null => PhysicalType::Null,
            Boolean => PhysicalType::Boolean,
            Int8 => PhysicalType::Primitive(PrimitiveType::Int8),
            Int16 => PhysicalType::Primitive(PrimitiveType::Int16),
            Int32 | Date32 | Time32(_) | Interval(IntervalUnit::YearMonth) => {
                PhysicalType::Primitive(PrimitiveType::Int32)
            },
            Int64 | Date64 | Timestamp(_, _) | Time64(_) | Duration(_) => {
                PhysicalType::Primitive(PrimitiveType::Int64)
            },
            Decimal(_, _) => PhysicalType::Primitive(PrimitiveType::Int128),
            UInt8 => PhysicalType::Primitive(PrimitiveType::UInt8),
            UInt16 => PhysicalType::Primitive(PrimitiveType::UInt16),
            UInt32 => PhysicalType::Primitive(PrimitiveType::UInt32),
            UInt64 => PhysicalType::Primitive(PrimitiveType::UInt64),
            Float16 => PhysicalType::Primitive(PrimitiveType::Float16),
            Float32 => PhysicalType::Primitive(PrimitiveType::Float32),
            Float64 => PhysicalType::Primitive(PrimitiveType::Float64),
            Interval(IntervalUnit::DayTime) => PhysicalType::Primitive(PrimitiveType::DaysMs),
            Interval(IntervalUnit::MonthDayNano) => {
                PhysicalType::Primitive(PrimitiveType::MonthDayNano)
            },
            Binary => PhysicalType::Binary,
            FixedSizeBinary(_) => PhysicalType::FixedSizeBinary,
            LargeBinary => PhysicalType::LargeBinary,
            Utf8 => PhysicalType::Utf8,
            LargeUtf8 => PhysicalType::LargeUtf8,
            List(_) => PhysicalType::List,
            FixedSizeList(_, _) => PhysicalType::FixedSizeList,
            LargeList(_) => PhysicalType::LargeList,
            Struct(_) => PhysicalType::Struct,
            Union(_, _, _) => PhysicalType::Union,
            Map(_, _) => PhysicalType::Map,
            Dictionary(key, _, _) => PhysicalType::Dictionary(*key),
            Extension(_, inner, _) => inner.to_physical_type(),
        }
    }

    /// Returns `&self` for all but [`DataType::Extension`], for which it
    /// (recursively) returns the inner [`DataType`].
    pub fn to_logical_type(&self) -> &DataType {
        use DataType::*;
        match self {
            Extension(_, inner, _) => inner.to_logical_type(),
            _ => self,
        }
    }
}

impl From<IntegerType> for DataType {
    fn from(item: IntegerType) -> Self {
        match item {
            IntegerType::Int8 => DataType::Int8,
            IntegerType::Int16 => DataType::Int16,
            IntegerType::Int32 => DataType::Int32,
            IntegerType::Int64 => DataType::Int64,
            IntegerType::UInt8 => DataType::UInt8,
            IntegerType::UInt16 => DataType::UInt16,
            IntegerType::UInt32 => DataType::UInt32,
            IntegerType::UInt64 => DataType::UInt64,
        }
    }
}

impl From<PrimitiveType> for DataType {
    fn from(item: PrimitiveType) -> Self {
        match item {
            PrimitiveType::Int8 => DataType::Int8,
            PrimitiveType::Int16 => DataType::Int16,
            PrimitiveType::Int32 => DataType::Int32,
            PrimitiveType::Int64 => DataType::Int64,
            PrimitiveType::Int128 => DataType::Decimal(38, 0),
            PrimitiveType::UInt8 => DataType::UInt8,
            PrimitiveType::UInt16 => DataType::UInt16,
            PrimitiveType::UInt32 => DataType::UInt32,
            PrimitiveType::UInt64 => DataType::UInt64,
            PrimitiveType::Float16 => DataType::Float16,
            PrimitiveType::Float32 => DataType::Float32,
            PrimitiveType::Float64 => DataType::Float64,
            PrimitiveType::DaysMs => DataType::Interval(IntervalUnit::DayTime),
            PrimitiveType::MonthDayNano => DataType::Interval(IntervalUnit::MonthDayNano),
        }
    }
}

/// Extracts the extension `(name, metadata)` annotation, if any, from a [`Metadata`].
pub fn get_extension(metadata: &Metadata) -> Extension {
    if let Some(name) = metadata.get("ARROW:extension:name") {
        let metadata = metadata.get("ARROW:extension:metadata").cloned();
        Some((name.clone(), metadata))
    } else {
        None
    }
}
