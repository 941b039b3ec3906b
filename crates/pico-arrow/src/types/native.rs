use bytemuck::{Pod, Zeroable};

use super::PrimitiveType;

/// A sealed-by-convention trait for Rust types that exactly match the
/// in-memory representation of an Arrow primitive value.
///
/// The byte conversions are used when reading files whose declared
/// endianness differs from the native one.
pub trait NativeType:
    'static + Copy + std::fmt::Debug + Default + PartialEq + Send + Sync + Pod + Zeroable
{
    /// The corresponding [`PrimitiveType`].
    const PRIMITIVE: PrimitiveType;

    /// The array of bytes of this type in little-endian order.
    type Bytes: AsRef<[u8]>
        + std::ops::Index<usize, Output = u8>
        + for<'a> TryFrom<&'a [u8], Error = std::array::TryFromSliceError>
        + std::fmt::Debug
        + Default;

    /// Converts itself to an array of little-endian bytes.
    fn to_le_bytes(&self) -> Self::Bytes;

    /// Converts an array of little-endian bytes to itself.
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Converts an array of big-endian bytes to itself.
    fn from_be_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! native_type {
    ($type:ty, $primitive_type:expr) => {
        impl NativeType for $type {
            const PRIMITIVE: PrimitiveType = $primitive_type;

            type Bytes = [u8; std::mem::size_of::<Self>()];

            #[inline]
            fn to_le_bytes(&self) -> Self::Bytes {
                Self::to_le_bytes(*self)
            }

            #[inline]
            fn from_le_bytes(bytes: Self::Bytes) -> Self {
                Self::from_le_bytes(bytes)
            }

            #[inline]
            fn from_be_bytes(bytes: Self::Bytes) -> Self {
                Self::from_be_bytes(bytes)
            }
        }
    };
}

native_type!(i8, PrimitiveType::Int8);
native_type!(i16, PrimitiveType::Int16);
native_type!(i32, PrimitiveType::Int32);
native_type!(i64, PrimitiveType::Int64);
native_type!(i128, PrimitiveType::Int128);
native_type!(u8, PrimitiveType::UInt8);
native_type!(u16, PrimitiveType::UInt16);
native_type!(u32, PrimitiveType::UInt32);
native_type!(u64, PrimitiveType::UInt64);
native_type!(f32, PrimitiveType::Float32);
native_type!(f64, PrimitiveType::Float64);

/// A 16-bit floating point number, stored as its IEEE 754 binary16 bits.
#[derive(Clone, Copy, Default, PartialEq, Zeroable, Pod)]
#[allow(non_camel_case_types)]
#[repr(transparent)]
pub struct f16(pub u16);

impl f16 {
    /// Constructs itself from its IEEE 754 binary16 bit representation.
    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// The IEEE 754 binary16 bit representation.
    #[inline]
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Widens itself to an [`f32`].
    pub fn to_f32(self) -> f32 {
        let bits = self.0 as u32;
        let sign = (bits & 0x8000) << 16;
        let exponent = (bits & 0x7c00) >> 10;
        let mantissa = bits & 0x03ff;

        if exponent == 0x1f {
            // infinity or NaN
            return f32::from_bits(sign | 0x7f80_0000 | (mantissa << 13));
        }
        if exponent == 0 {
            if mantissa == 0 {
                return f32::from_bits(sign);
            }
            // subnormal: renormalize
            let shift = mantissa.leading_zeros() - 21;
            let exponent = 127 - 15 - shift;
            let mantissa = (mantissa << (shift + 1)) & 0x03ff;
            return f32::from_bits(sign | (exponent << 23) | (mantissa << 13));
        }
        f32::from_bits(sign | ((exponent + 127 - 15) << 23) | (mantissa << 13))
    }
}

impl std::fmt::Debug for f16 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.to_f32())
    }
}

impl NativeType for f16 {
    const PRIMITIVE: PrimitiveType = PrimitiveType::Float16;

    type Bytes = [u8; 2];

    #[inline]
    fn to_le_bytes(&self) -> Self::Bytes {
        self.0.to_le_bytes()
    }

    #[inline]
    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        Self(u16::from_le_bytes(bytes))
    }

    #[inline]
    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        Self(u16::from_be_bytes(bytes))
    }
}

/// The in-memory representation of a day-time interval: days and milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Zeroable, Pod)]
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct days_ms(pub i32, pub i32);

impl days_ms {
    /// The number of days.
    #[inline]
    pub fn days(&self) -> i32 {
        self.0
    }

    /// The number of milliseconds.
    #[inline]
    pub fn milliseconds(&self) -> i32 {
        self.1
    }
}

impl NativeType for days_ms {
    const PRIMITIVE: PrimitiveType = PrimitiveType::DaysMs;

    type Bytes = [u8; 8];

    #[inline]
    fn to_le_bytes(&self) -> Self::Bytes {
        let days = self.0.to_le_bytes();
        let ms = self.1.to_le_bytes();
        let mut result = [0; 8];
        result[..4].copy_from_slice(&days);
        result[4..].copy_from_slice(&ms);
        result
    }

    #[inline]
    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        let mut days = [0; 4];
        days.copy_from_slice(&bytes[..4]);
        let mut ms = [0; 4];
        ms.copy_from_slice(&bytes[4..]);
        Self(i32::from_le_bytes(days), i32::from_le_bytes(ms))
    }

    #[inline]
    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        let mut days = [0; 4];
        days.copy_from_slice(&bytes[..4]);
        let mut ms = [0; 4];
        ms.copy_from_slice(&bytes[4..]);
        Self(i32::from_be_bytes(days), i32::from_be_bytes(ms))
    }
}

/// The in-memory representation of a month-day-nanosecond interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Zeroable, Pod)]
#[allow(non_camel_case_types)]
#[repr(C)]
pub struct months_days_ns(pub i32, pub i32, pub i64);

impl months_days_ns {
    /// The number of months.
    #[inline]
    pub fn months(&self) -> i32 {
        self.0
    }

    /// The number of days.
    #[inline]
    pub fn days(&self) -> i32 {
        self.1
    }

    /// The number of nanoseconds.
    #[inline]
    pub fn ns(&self) -> i64 {
        self.2
    }
}

impl NativeType for months_days_ns {
    const PRIMITIVE: PrimitiveType = PrimitiveType::MonthDayNano;

    type Bytes = [u8; 16];

    #[inline]
    fn to_le_bytes(&self) -> Self::Bytes {
        let months = self.0.to_le_bytes();
        let days = self.1.to_le_bytes();
        let ns = self.2.to_le_bytes();
        let mut result = [0; 16];
        result[..4].copy_from_slice(&months);
        result[4..8].copy_from_slice(&days);
        result[8..].copy_from_slice(&ns);
        result
    }

    #[inline]
    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        let mut months = [0; 4];
        months.copy_from_slice(&bytes[..4]);
        let mut days = [0; 4];
        days.copy_from_slice(&bytes[4..8]);
        let mut ns = [0; 8];
        ns.copy_from_slice(&bytes[8..]);
        Self(
            i32::from_le_bytes(months),
            i32::from_le_bytes(days),
            i64::from_le_bytes(ns),
        )
    }

    #[inline]
    fn from_be_bytes(bytes: Self::Bytes) -> Self {
        let mut months = [0; 4];
        months.copy_from_slice(&bytes[..4]);
        let mut days = [0; 4];
        days.copy_from_slice(&bytes[4..8]);
        let mut ns = [0; 8];
        ns.copy_from_slice(&bytes[8..]);
        Self(
            i32::from_be_bytes(months),
            i32::from_be_bytes(days),
            i64::from_be_bytes(ns),
        )
    }
}
