//! Logical comparison of [`Array`]s, used to implement `PartialEq`.
use super::*;
use crate::datatypes::PhysicalType;
use crate::offset::Offset;
use crate::types::NativeType;
use crate::with_match_primitive_type;

fn primitive_equal<T: NativeType>(lhs: &PrimitiveArray<T>, rhs: &PrimitiveArray<T>) -> bool {
    lhs.len() == rhs.len() && (0..lhs.len()).all(|i| lhs.get(i) == rhs.get(i))
}

fn boolean_equal(lhs: &BooleanArray, rhs: &BooleanArray) -> bool {
    lhs.len() == rhs.len() && (0..lhs.len()).all(|i| lhs.get(i) == rhs.get(i))
}

fn utf8_equal<O: Offset>(lhs: &Utf8Array<O>, rhs: &Utf8Array<O>) -> bool {
    lhs.len() == rhs.len() && (0..lhs.len()).all(|i| lhs.get(i) == rhs.get(i))
}

fn binary_equal<O: Offset>(lhs: &BinaryArray<O>, rhs: &BinaryArray<O>) -> bool {
    lhs.len() == rhs.len() && (0..lhs.len()).all(|i| lhs.get(i) == rhs.get(i))
}

fn fixed_size_binary_equal(lhs: &FixedSizeBinaryArray, rhs: &FixedSizeBinaryArray) -> bool {
    lhs.size() == rhs.size()
        && lhs.len() == rhs.len()
        && (0..lhs.len()).all(|i| lhs.get(i) == rhs.get(i))
}

fn validity_equal(lhs: &dyn Array, rhs: &dyn Array) -> bool {
    lhs.len() == rhs.len() && (0..lhs.len()).all(|i| lhs.is_valid(i) == rhs.is_valid(i))
}

fn list_equal<O: Offset>(lhs: &ListArray<O>, rhs: &ListArray<O>) -> bool {
    validity_equal(lhs, rhs)
        && lhs.offsets() == rhs.offsets()
        && equal(lhs.values().as_ref(), rhs.values().as_ref())
}

fn fixed_size_list_equal(lhs: &FixedSizeListArray, rhs: &FixedSizeListArray) -> bool {
    lhs.size() == rhs.size()
        && validity_equal(lhs, rhs)
        && equal(lhs.values().as_ref(), rhs.values().as_ref())
}

fn struct_equal(lhs: &StructArray, rhs: &StructArray) -> bool {
    validity_equal(lhs, rhs)
        && lhs.values().len() == rhs.values().len()
        && lhs
            .values()
            .iter()
            .zip(rhs.values().iter())
            .all(|(l, r)| equal(l.as_ref(), r.as_ref()))
}

fn map_equal(lhs: &MapArray, rhs: &MapArray) -> bool {
    validity_equal(lhs, rhs)
        && lhs.offsets() == rhs.offsets()
        && equal(lhs.field().as_ref(), rhs.field().as_ref())
}

macro_rules! equal_dyn {
    ($lhs:expr, $rhs:expr, $ty:ty, $f:expr) => {{
        let lhs = $lhs.as_any().downcast_ref::<$ty>().unwrap();
        let rhs = $rhs.as_any().downcast_ref::<$ty>().unwrap();
        ($f)(lhs, rhs)
    }};
}

/// Returns whether two [`Array`]s are logically equal: same [`DataType`],
/// same length and, slot by slot, same validity and same valid values.
pub fn equal(lhs: &dyn Array, rhs: &dyn Array) -> bool {
    if lhs.data_type() != rhs.data_type() {
        return false;
    }
    use PhysicalType::*;
    match lhs.data_type().to_physical_type() {
        Null => lhs.len() == rhs.len(),
        Boolean => equal_dyn!(lhs, rhs, BooleanArray, boolean_equal),
        Primitive(primitive) => with_match_primitive_type!(primitive, |$T| {
            equal_dyn!(lhs, rhs, PrimitiveArray<$T>, primitive_equal)
        }),
        Binary => equal_dyn!(lhs, rhs, BinaryArray<i32>, binary_equal),
        LargeBinary => equal_dyn!(lhs, rhs, BinaryArray<i64>, binary_equal),
        Utf8 => equal_dyn!(lhs, rhs, Utf8Array<i32>, utf8_equal),
        LargeUtf8 => equal_dyn!(lhs, rhs, Utf8Array<i64>, utf8_equal),
        FixedSizeBinary => equal_dyn!(lhs, rhs, FixedSizeBinaryArray, fixed_size_binary_equal),
        List => equal_dyn!(lhs, rhs, ListArray<i32>, list_equal),
        LargeList => equal_dyn!(lhs, rhs, ListArray<i64>, list_equal),
        FixedSizeList => equal_dyn!(lhs, rhs, FixedSizeListArray, fixed_size_list_equal),
        Struct => equal_dyn!(lhs, rhs, StructArray, struct_equal),
        Map => equal_dyn!(lhs, rhs, MapArray, map_equal),
        Union | Dictionary(_) => unimplemented!("union and dictionary arrays are not supported"),
    }
}
