// Tue Jan 13 2026 - Alex

//! Value types that can be moved in and out of a [`MemoryRegion`](crate::memory::MemoryRegion).
//!
//! Every scalar is stored through its same-width integer bit pattern (`Word`), so
//! floats round-trip bit-exactly and compare bitwise under compare-and-swap.

use crate::utils;
use std::fmt;
use std::mem;
use std::str::FromStr;
use std::sync::atomic::{AtomicI16, AtomicI32, AtomicI64, AtomicI8, Ordering};

mod sealed {
    pub trait Sealed {}

    impl Sealed for i8 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A native integer that has a matching atomic type.
///
/// The unsafe methods take a pointer into a live region that is aligned to
/// `WIDTH` and valid for `WIDTH` bytes.
pub trait Word: Copy + Eq + fmt::Debug + sealed::Sealed {
    const WIDTH: usize;

    unsafe fn atomic_load(ptr: *mut u8, order: Ordering) -> Self;
    unsafe fn atomic_store(ptr: *mut u8, value: Self, order: Ordering);
    unsafe fn atomic_compare_and_swap(ptr: *mut u8, expected: Self, new: Self) -> bool;
    fn from_ne_slice(bytes: &[u8]) -> Self;
    fn write_ne_slice(self, out: &mut [u8]);
}

macro_rules! impl_word {
    ($int:ty, $atomic:ty) => {
        impl Word for $int {
            const WIDTH: usize = mem::size_of::<$int>();

            unsafe fn atomic_load(ptr: *mut u8, order: Ordering) -> Self {
                unsafe { <$atomic>::from_ptr(ptr.cast()) }.load(order)
            }

            unsafe fn atomic_store(ptr: *mut u8, value: Self, order: Ordering) {
                unsafe { <$atomic>::from_ptr(ptr.cast()) }.store(value, order)
            }

            unsafe fn atomic_compare_and_swap(ptr: *mut u8, expected: Self, new: Self) -> bool {
                unsafe { <$atomic>::from_ptr(ptr.cast()) }
                    .compare_exchange(expected, new, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
            }

            fn from_ne_slice(bytes: &[u8]) -> Self {
                let mut raw = [0u8; mem::size_of::<$int>()];
                raw.copy_from_slice(bytes);
                <$int>::from_ne_bytes(raw)
            }

            fn write_ne_slice(self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_ne_bytes());
            }
        }
    };
}

impl_word!(i8, AtomicI8);
impl_word!(i16, AtomicI16);
impl_word!(i32, AtomicI32);
impl_word!(i64, AtomicI64);

pub trait Scalar: Copy + fmt::Debug + sealed::Sealed {
    type Bits: Word;
    const KIND: ScalarKind;

    fn into_bits(self) -> Self::Bits;
    fn from_bits(bits: Self::Bits) -> Self;
}

/// Scalars that support compare-and-swap: int, long, float and double.
pub trait Swappable: Scalar {}

macro_rules! impl_integer_scalar {
    ($int:ty, $kind:expr) => {
        impl Scalar for $int {
            type Bits = $int;
            const KIND: ScalarKind = $kind;

            fn into_bits(self) -> Self::Bits {
                self
            }

            fn from_bits(bits: Self::Bits) -> Self {
                bits
            }
        }
    };
}

impl_integer_scalar!(i8, ScalarKind::Byte);
impl_integer_scalar!(i16, ScalarKind::Short);
impl_integer_scalar!(i32, ScalarKind::Int);
impl_integer_scalar!(i64, ScalarKind::Long);

impl Scalar for f32 {
    type Bits = i32;
    const KIND: ScalarKind = ScalarKind::Float;

    fn into_bits(self) -> i32 {
        self.to_bits() as i32
    }

    fn from_bits(bits: i32) -> Self {
        f32::from_bits(bits as u32)
    }
}

impl Scalar for f64 {
    type Bits = i64;
    const KIND: ScalarKind = ScalarKind::Double;

    fn into_bits(self) -> i64 {
        self.to_bits() as i64
    }

    fn from_bits(bits: i64) -> Self {
        f64::from_bits(bits as u64)
    }
}

impl Swappable for i32 {}
impl Swappable for i64 {}
impl Swappable for f32 {}
impl Swappable for f64 {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 6] = [
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
    ];

    pub fn width(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Short => 2,
            Self::Int | Self::Float => 4,
            Self::Long | Self::Double => 8,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
        }
    }

    pub fn supports_compare_and_swap(self) -> bool {
        !matches!(self, Self::Byte | Self::Short)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ScalarKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "byte" | "i8" => Ok(Self::Byte),
            "short" | "i16" => Ok(Self::Short),
            "int" | "i32" => Ok(Self::Int),
            "long" | "i64" => Ok(Self::Long),
            "float" | "f32" => Ok(Self::Float),
            "double" | "f64" => Ok(Self::Double),
            _ => Err(format!("unknown scalar kind: {}", s)),
        }
    }
}

/// Access strength of a single load or store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Access {
    #[default]
    Aligned,
    Unaligned,
    Volatile,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aligned => write!(f, "aligned"),
            Self::Unaligned => write!(f, "unaligned"),
            Self::Volatile => write!(f, "volatile"),
        }
    }
}

impl FromStr for Access {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "aligned" => Ok(Self::Aligned),
            "unaligned" => Ok(Self::Unaligned),
            "volatile" => Ok(Self::Volatile),
            _ => Err(format!("unknown access strength: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Value {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Self::Byte(_) => ScalarKind::Byte,
            Self::Short(_) => ScalarKind::Short,
            Self::Int(_) => ScalarKind::Int,
            Self::Long(_) => ScalarKind::Long,
            Self::Float(_) => ScalarKind::Float,
            Self::Double(_) => ScalarKind::Double,
        }
    }

    /// Parses `text` as a value of `kind`.
    ///
    /// Integers accept decimal or `0x` hex in either the signed or unsigned range
    /// of the width. Floats accept decimal notation, or `0x` hex for the raw bit
    /// pattern so that signed zeros and NaN payloads can be spelled exactly.
    pub fn parse(kind: ScalarKind, text: &str) -> Result<Self, String> {
        let text = text.trim();
        let invalid = || format!("invalid {} value: {}", kind, text);
        let bits = (kind.width() * 8) as u32;
        match kind {
            ScalarKind::Byte => Ok(Self::Byte(narrow(text, bits).ok_or_else(invalid)? as i8)),
            ScalarKind::Short => Ok(Self::Short(narrow(text, bits).ok_or_else(invalid)? as i16)),
            ScalarKind::Int => Ok(Self::Int(narrow(text, bits).ok_or_else(invalid)? as i32)),
            ScalarKind::Long => Ok(Self::Long(narrow(text, bits).ok_or_else(invalid)?)),
            ScalarKind::Float => {
                if utils::has_hex_prefix(text) {
                    let raw = narrow(text, bits).ok_or_else(invalid)?;
                    Ok(Self::Float(f32::from_bits(raw as u32)))
                } else {
                    text.parse().map(Self::Float).map_err(|_| invalid())
                }
            }
            ScalarKind::Double => {
                if utils::has_hex_prefix(text) {
                    let raw = narrow(text, bits).ok_or_else(invalid)?;
                    Ok(Self::Double(f64::from_bits(raw as u64)))
                } else {
                    text.parse().map(Self::Double).map_err(|_| invalid())
                }
            }
        }
    }

    /// The stored bit pattern, zero-extended to 64 bits.
    pub fn raw_bits(&self) -> u64 {
        match *self {
            Self::Byte(v) => v as u8 as u64,
            Self::Short(v) => v as u16 as u64,
            Self::Int(v) => v as u32 as u64,
            Self::Long(v) => v as u64,
            Self::Float(v) => v.to_bits() as u64,
            Self::Double(v) => v.to_bits(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte(v) => write!(f, "{}", v),
            Self::Short(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{:?}", v),
            Self::Double(v) => write!(f, "{:?}", v),
        }
    }
}

fn narrow(text: &str, bits: u32) -> Option<i64> {
    let value = utils::parse_int(text)?;
    let min = -(1i128 << (bits - 1));
    let max = (1i128 << bits) - 1;
    if value < min || value > max {
        return None;
    }
    Some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_bits_are_exact() {
        assert_eq!(0.0f64.into_bits(), 0);
        assert_eq!((-0.0f64).into_bits(), i64::MIN);
        let nan = f32::from_bits(0x7fc0_0001);
        assert_eq!(<f32 as Scalar>::from_bits(nan.into_bits()).to_bits(), 0x7fc0_0001);
    }

    #[test]
    fn test_word_ne_slices() {
        let mut out = [0u8; 4];
        0x0102_0304i32.write_ne_slice(&mut out);
        assert_eq!(out, 0x0102_0304i32.to_ne_bytes());
        assert_eq!(i32::from_ne_slice(&out), 0x0102_0304);
    }

    #[test]
    fn test_kind_widths_match_types() {
        assert_eq!(ScalarKind::Byte.width(), <i8 as Scalar>::Bits::WIDTH);
        assert_eq!(ScalarKind::Short.width(), <i16 as Scalar>::Bits::WIDTH);
        assert_eq!(ScalarKind::Float.width(), <f32 as Scalar>::Bits::WIDTH);
        assert_eq!(ScalarKind::Double.width(), <f64 as Scalar>::Bits::WIDTH);
        assert!(!ScalarKind::Short.supports_compare_and_swap());
        assert!(ScalarKind::Float.supports_compare_and_swap());
    }

    #[test]
    fn test_value_parse() {
        assert_eq!(Value::parse(ScalarKind::Byte, "0xff"), Ok(Value::Byte(-1)));
        assert_eq!(Value::parse(ScalarKind::Byte, "-128"), Ok(Value::Byte(-128)));
        assert!(Value::parse(ScalarKind::Byte, "256").is_err());
        assert_eq!(Value::parse(ScalarKind::Int, "42"), Ok(Value::Int(42)));
        assert_eq!(Value::parse(ScalarKind::Long, "-0x10"), Ok(Value::Long(-16)));

        let negative_zero = Value::parse(ScalarKind::Double, "0x8000000000000000").unwrap();
        assert_eq!(negative_zero.raw_bits(), 0x8000_0000_0000_0000);
        assert_eq!(Value::parse(ScalarKind::Float, "1.5"), Ok(Value::Float(1.5)));
        assert!(Value::parse(ScalarKind::Float, "one").is_err());
        assert!(Value::parse(ScalarKind::Int, "0x-5").is_err());
        assert!(Value::parse(ScalarKind::Double, "0x-1").is_err());
    }

    #[test]
    fn test_kind_and_access_from_str() {
        assert_eq!("INT".parse::<ScalarKind>(), Ok(ScalarKind::Int));
        assert_eq!("f64".parse::<ScalarKind>(), Ok(ScalarKind::Double));
        assert!("word".parse::<ScalarKind>().is_err());
        assert_eq!("volatile".parse::<Access>(), Ok(Access::Volatile));
        assert_eq!(Access::default(), Access::Aligned);
    }
}
