//! Element types - the numeric type tags of the NeXus API.

use std::fmt;

use super::{Error, Result};

/// Element type of an array or attribute value.
///
/// Discriminants are the `NX_*` type codes used by the native library,
/// so a tag read from a file can be matched without a lookup table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum ElementType {
    /// Character data, decoded as a single string
    Char = 4,
    /// 32-bit floating point (IEEE 754 single precision)
    Float32 = 5,
    /// 64-bit floating point (IEEE 754 double precision)
    Float64 = 6,
    /// Signed 8-bit integer
    Int8 = 20,
    /// Unsigned 8-bit integer
    Uint8 = 21,
    /// Signed 16-bit integer
    Int16 = 22,
    /// Unsigned 16-bit integer
    Uint16 = 23,
    /// Signed 32-bit integer
    Int32 = 24,
    /// Unsigned 32-bit integer
    Uint32 = 25,
}

impl ElementType {
    /// Every element type, in type-code order.
    pub const ALL: [Self; 9] = [
        Self::Char,
        Self::Float32,
        Self::Float64,
        Self::Int8,
        Self::Uint8,
        Self::Int16,
        Self::Uint16,
        Self::Int32,
        Self::Uint32,
    ];

    /// Returns the size in bytes of a single element of this type.
    #[inline]
    pub const fn num_bytes(self) -> usize {
        match self {
            Self::Char | Self::Int8 | Self::Uint8 => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Float32 | Self::Int32 | Self::Uint32 => 4,
            Self::Float64 => 8,
        }
    }

    /// Returns the native library type code.
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Returns the type token, e.g. `"INT32"`.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Char => "CHAR",
            Self::Float32 => "FLOAT32",
            Self::Float64 => "FLOAT64",
            Self::Int8 => "INT8",
            Self::Uint8 => "UINT8",
            Self::Int16 => "INT16",
            Self::Uint16 => "UINT16",
            Self::Int32 => "INT32",
            Self::Uint32 => "UINT32",
        }
    }

    /// Convert from a type code, `None` for codes outside the enumeration.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            4 => Some(Self::Char),
            5 => Some(Self::Float32),
            6 => Some(Self::Float64),
            20 => Some(Self::Int8),
            21 => Some(Self::Uint8),
            22 => Some(Self::Int16),
            23 => Some(Self::Uint16),
            24 => Some(Self::Int32),
            25 => Some(Self::Uint32),
            _ => None,
        }
    }

    /// Like [`from_code`](Self::from_code) but fails with
    /// [`Error::InvalidArgument`] for unknown codes.
    pub fn try_from_code(code: i32) -> Result<Self> {
        Self::from_code(code)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown element type code {code}")))
    }

    /// Parse a type token such as `"FLOAT64"`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Returns true for the signed integer types.
    #[inline]
    pub const fn is_signed_integer(self) -> bool {
        matches!(self, Self::Int8 | Self::Int16 | Self::Int32)
    }

    /// Returns true for the unsigned integer types.
    #[inline]
    pub const fn is_unsigned_integer(self) -> bool {
        matches!(self, Self::Uint8 | Self::Uint16 | Self::Uint32)
    }

    /// Returns true if this is a floating point type.
    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::Float32 | Self::Float64)
    }

    /// Inclusive integer range representable by this type.
    ///
    /// `None` for float and character types.
    pub const fn integer_range(self) -> Option<(i64, i64)> {
        match self {
            Self::Int8 => Some((i8::MIN as i64, i8::MAX as i64)),
            Self::Uint8 => Some((0, u8::MAX as i64)),
            Self::Int16 => Some((i16::MIN as i64, i16::MAX as i64)),
            Self::Uint16 => Some((0, u16::MAX as i64)),
            Self::Int32 => Some((i32::MIN as i64, i32::MAX as i64)),
            Self::Uint32 => Some((0, u32::MAX as i64)),
            _ => None,
        }
    }
}

/// Map a raw type code to its token.
///
/// Total over the nine known codes, `None` for anything else.
pub fn type_to_string(code: i32) -> Option<&'static str> {
    ElementType::from_code(code).map(ElementType::name)
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_sizes() {
        assert_eq!(ElementType::Char.num_bytes(), 1);
        assert_eq!(ElementType::Uint8.num_bytes(), 1);
        assert_eq!(ElementType::Int16.num_bytes(), 2);
        assert_eq!(ElementType::Int32.num_bytes(), 4);
        assert_eq!(ElementType::Float32.num_bytes(), 4);
        assert_eq!(ElementType::Float64.num_bytes(), 8);
    }

    #[test]
    fn test_type_to_string_is_total() {
        let tokens = [
            (4, "CHAR"),
            (5, "FLOAT32"),
            (6, "FLOAT64"),
            (20, "INT8"),
            (21, "UINT8"),
            (22, "INT16"),
            (23, "UINT16"),
            (24, "INT32"),
            (25, "UINT32"),
        ];
        for (code, token) in tokens {
            assert_eq!(type_to_string(code), Some(token));
        }
        for code in [-1, 0, 1, 7, 19, 26, 26 + 100] {
            assert_eq!(type_to_string(code), None);
        }
    }

    #[test]
    fn test_code_roundtrip() {
        for t in ElementType::ALL {
            assert_eq!(ElementType::from_code(t.code()), Some(t));
            assert_eq!(ElementType::from_name(t.name()), Some(t));
        }
        assert!(matches!(
            ElementType::try_from_code(99),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_integer_ranges() {
        assert_eq!(ElementType::Uint8.integer_range(), Some((0, 255)));
        assert_eq!(ElementType::Int16.integer_range(), Some((-32768, 32767)));
        assert_eq!(ElementType::Float64.integer_range(), None);
        assert_eq!(ElementType::Char.integer_range(), None);
    }
}
