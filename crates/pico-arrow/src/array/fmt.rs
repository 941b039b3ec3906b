//! `Debug` for `dyn Array`, dispatching on the physical type.
use std::fmt::{Debug, Formatter, Result};

use super::*;
use crate::datatypes::PhysicalType;
use crate::offset::Offset;
use crate::types::NativeType;
use crate::with_match_primitive_type;

fn fmt_entries<T: Debug, F: Fn(usize) -> Option<T>>(
    name: &str,
    len: usize,
    get: F,
    f: &mut Formatter<'_>,
) -> Result {
    write!(f, "{name}")?;
    f.debug_list().entries((0..len).map(get)).finish()
}

impl<T: NativeType> Debug for PrimitiveArray<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        fmt_entries("PrimitiveArray", self.len(), |i| self.get(i), f)
    }
}

impl Debug for BooleanArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        fmt_entries("BooleanArray", self.len(), |i| self.get(i), f)
    }
}

impl<O: Offset> Debug for Utf8Array<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        fmt_entries("Utf8Array", self.len(), |i| self.get(i), f)
    }
}

impl<O: Offset> Debug for BinaryArray<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        fmt_entries("BinaryArray", self.len(), |i| self.get(i), f)
    }
}

impl Debug for FixedSizeBinaryArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        fmt_entries("FixedSizeBinaryArray", self.len(), |i| self.get(i), f)
    }
}

impl Debug for NullArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "NullArray({})", self.len())
    }
}

impl<O: Offset> Debug for ListArray<O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("ListArray")
            .field("offsets", self.offsets())
            .field("values", self.values())
            .field("validity", &self.validity())
            .finish()
    }
}

impl Debug for FixedSizeListArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("FixedSizeListArray")
            .field("size", &self.size())
            .field("values", self.values())
            .field("validity", &self.validity())
            .finish()
    }
}

impl Debug for StructArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("StructArray")
            .field("len", &self.len())
            .field("values", &self.values())
            .field("validity", &self.validity())
            .finish()
    }
}

impl Debug for MapArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.debug_struct("MapArray")
            .field("offsets", self.offsets())
            .field("field", self.field())
            .field("validity", &self.validity())
            .finish()
    }
}

impl Debug for dyn Array + '_ {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use PhysicalType::*;
        match self.data_type().to_physical_type() {
            Null => self.as_any().downcast_ref::<NullArray>().unwrap().fmt(f),
            Boolean => self.as_any().downcast_ref::<BooleanArray>().unwrap().fmt(f),
            Primitive(primitive) => with_match_primitive_type!(primitive, |$T| {
                self.as_any().downcast_ref::<PrimitiveArray<$T>>().unwrap().fmt(f)
            }),
            Binary => self
                .as_any()
                .downcast_ref::<BinaryArray<i32>>()
                .unwrap()
                .fmt(f),
            LargeBinary => self
                .as_any()
                .downcast_ref::<BinaryArray<i64>>()
                .unwrap()
                .fmt(f),
            Utf8 => self
                .as_any()
                .downcast_ref::<Utf8Array<i32>>()
                .unwrap()
                .fmt(f),
            LargeUtf8 => self
                .as_any()
                .downcast_ref::<Utf8Array<i64>>()
                .unwrap()
                .fmt(f),
            FixedSizeBinary => self
                .as_any()
                .downcast_ref::<FixedSizeBinaryArray>()
                .unwrap()
                .fmt(f),
            List => self
                .as_any()
                .downcast_ref::<ListArray<i32>>()
                .unwrap()
                .fmt(f),
            LargeList => self
                .as_any()
                .downcast_ref::<ListArray<i64>>()
                .unwrap()
                .fmt(f),
            FixedSizeList => self
                .as_any()
                .downcast_ref::<FixedSizeListArray>()
                .unwrap()
                .fmt(f),
            Struct => self.as_any().downcast_ref::<StructArray>().unwrap().fmt(f),
            Map => self.as_any().downcast_ref::<MapArray>().unwrap().fmt(f),
            Union | Dictionary(_) => write!(f, "unsupported array"),
        }
    }
}
