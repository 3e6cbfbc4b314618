//! Common types used throughout the virtual array.

mod geometry;
mod page_id;

pub use geometry::PageGeometry;
pub use page_id::PageId;

use crate::error::{ArrayError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Magic signature at offset 0 of every primary file
pub const SIGNATURE: &[u8; 2] = b"VM";

/// Length of the signature that precedes page 0
pub const SIGNATURE_LEN: usize = SIGNATURE.len();

/// Bitmap regions are padded to a multiple of this many bytes
pub const BITMAP_ALIGN: usize = 16;

/// Data regions are padded to a multiple of the emulated sector size
pub const SECTOR_SIZE: usize = 512;

/// Elements per page for text and offset slots
pub const ELEMENTS_PER_PAGE: usize = 128;

/// Elements per page for raw 4-byte integers
pub const INT_ELEMENTS_PER_PAGE: usize = 124;

/// Width of an integer (or data log offset) slot
pub const INT_SLOT_WIDTH: usize = 4;

/// Default number of resident pages in the buffer pool
pub const DEFAULT_BUFFER_CAPACITY: usize = 3;

/// Upper bound on `char(N)` / `varchar(N)` lengths
pub const MAX_TEXT_LENGTH: usize = u16::MAX as usize;

/// Element type of a virtual array.
///
/// The type is fixed at creation and decides the slot layout:
/// - `Int32`: 4-byte little-endian integers stored in place
/// - `FixedText(len)`: `len`-byte null-padded text stored in place
/// - `VarText(max)`: 4-byte offsets into the data log, at most `max` characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "length", rename_all = "camelCase")]
pub enum ElementType {
    Int32,
    FixedText(usize),
    VarText(usize),
}

impl ElementType {
    /// Short type name used in error messages
    pub fn name(self) -> &'static str {
        match self {
            Self::Int32 => "int",
            Self::FixedText(_) => "char",
            Self::VarText(_) => "varchar",
        }
    }

    /// Width in bytes of one slot in a page's data region
    pub fn slot_width(self) -> usize {
        match self {
            Self::Int32 | Self::VarText(_) => INT_SLOT_WIDTH,
            Self::FixedText(len) => len,
        }
    }

    /// Number of elements stored per page
    pub fn elements_per_page(self) -> usize {
        match self {
            Self::Int32 => INT_ELEMENTS_PER_PAGE,
            Self::FixedText(_) | Self::VarText(_) => ELEMENTS_PER_PAGE,
        }
    }

    /// Whether this type keeps its payloads in a separate data log
    pub fn uses_data_log(self) -> bool {
        matches!(self, Self::VarText(_))
    }

    /// Check text lengths are within `1..=MAX_TEXT_LENGTH`
    pub fn validate(self) -> Result<()> {
        match self {
            Self::Int32 => Ok(()),
            Self::FixedText(len) | Self::VarText(len) => {
                if len == 0 || len > MAX_TEXT_LENGTH {
                    Err(ArrayError::invalid_type(format!(
                        "{} length must be between 1 and {}, got {}",
                        self.name(),
                        MAX_TEXT_LENGTH,
                        len
                    )))
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32 => write!(f, "int"),
            Self::FixedText(len) => write!(f, "char({})", len),
            Self::VarText(max) => write!(f, "varchar({})", max),
        }
    }
}

impl FromStr for ElementType {
    type Err = ArrayError;

    /// Parse `int`, `char(N)` or `varchar(N)`
    fn from_str(s: &str) -> Result<Self> {
        let spec = s.trim().to_ascii_lowercase();
        if spec == "int" || spec == "int32" {
            return Ok(Self::Int32);
        }

        let open = spec
            .find('(')
            .ok_or_else(|| ArrayError::invalid_type(format!("unknown type `{}`", s.trim())))?;
        let name = spec[..open].trim();
        let length = spec[open + 1..]
            .strip_suffix(')')
            .map(str::trim)
            .and_then(|len| len.parse::<usize>().ok())
            .ok_or_else(|| {
                ArrayError::invalid_type(format!("malformed size specifier in `{}`", s.trim()))
            })?;

        let ty = match name {
            "char" => Self::FixedText(length),
            "varchar" => Self::VarText(length),
            _ => {
                return Err(ArrayError::invalid_type(format!(
                    "unknown type `{}`",
                    s.trim()
                )))
            }
        };
        ty.validate()?;
        Ok(ty)
    }
}

/// A decoded element value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i32),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}
