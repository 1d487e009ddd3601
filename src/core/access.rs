//! File access modes.

use std::fmt;

use crate::util::{Error, Result};

/// How a container file is opened.
///
/// Discriminants are the native `NXACC_*` codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum AccessMode {
    /// Read-only
    #[default]
    Read = 1,
    /// Read-write on an existing file
    ReadWrite = 2,
    /// Create a new file in the library's default format
    Create = 3,
    /// Create using the HDF4 format variant
    Create4 = 4,
    /// Create using the HDF5 format variant
    Create5 = 5,
    /// Create as a text (XML-style) container
    CreateXml = 6,
    /// Read-only, keep trailing padding on character data
    NoStrip = 128,
}

impl AccessMode {
    /// Every mode, in the order the scripting module exports them.
    pub const ALL: [Self; 7] = [
        Self::Read,
        Self::ReadWrite,
        Self::Create,
        Self::Create4,
        Self::Create5,
        Self::CreateXml,
        Self::NoStrip,
    ];

    /// Native access code.
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Parse a native access code.
    pub fn from_code(code: i32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.code() == code)
            .ok_or_else(|| Error::invalid(format!("unknown access mode {code}")))
    }

    /// Name of the exported constant, e.g. `"ACC_RDWR"`.
    pub const fn constant_name(self) -> &'static str {
        match self {
            Self::Read => "ACC_READ",
            Self::ReadWrite => "ACC_RDWR",
            Self::Create => "ACC_CREATE",
            Self::Create4 => "ACC_CREATE4",
            Self::Create5 => "ACC_CREATE5",
            Self::CreateXml => "ACC_CREATEXML",
            Self::NoStrip => "ACC_NOSTRIP",
        }
    }

    /// True for the modes that start a new, empty file.
    #[inline]
    pub const fn creates(self) -> bool {
        matches!(self, Self::Create | Self::Create4 | Self::Create5 | Self::CreateXml)
    }

    /// True if the file may be written back.
    #[inline]
    pub const fn is_writable(self) -> bool {
        self.creates() || matches!(self, Self::ReadWrite)
    }

    /// True if character data keeps its trailing padding.
    #[inline]
    pub const fn keeps_padding(self) -> bool {
        matches!(self, Self::NoStrip)
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.constant_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_codes() {
        assert_eq!(AccessMode::Read.code(), 1);
        assert_eq!(AccessMode::CreateXml.code(), 6);
        assert_eq!(AccessMode::NoStrip.code(), 128);
        assert_eq!(AccessMode::from_code(2).unwrap(), AccessMode::ReadWrite);
        assert!(AccessMode::from_code(7).is_err());
    }

    #[test]
    fn test_access_flags() {
        assert!(!AccessMode::Read.is_writable());
        assert!(AccessMode::ReadWrite.is_writable());
        assert!(AccessMode::Create5.creates());
        assert!(!AccessMode::NoStrip.creates());
        assert!(AccessMode::NoStrip.keeps_padding());
    }
}
