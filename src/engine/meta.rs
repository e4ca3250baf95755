//! # Packed Catalog Rows
//!
//! The engine reports table metadata as packed little-endian records: a
//! fixed header followed by the variable-length bytes the header describes.
//! This module defines the row layouts, their zerocopy headers, and the
//! physical column type tags the rows carry.
//!
//! ## Column row layout
//!
//! ```text
//! +----------+--------+-------+-----------+------------+----------+-------...
//! | columnid | coltyp | flags | code_page | max_length | name_len | name
//! | u32 LE   | u8     | u8    | u16 LE    | u32 LE     | u16 LE   | bytes
//! +----------+--------+-------+-----------+------------+----------+-------...
//! ```
//!
//! ## Index row layout
//!
//! ```text
//! +--------+-----------------+-------+----------+---------+------...+-----...
//! | grbit  | compare_options | flags | name_len | key_len | name    | key
//! | u32 LE | u32 LE          | u8    | u16 LE   | u16 LE  | bytes   | bytes
//! +--------+-----------------+-------+----------+---------+------...+-----...
//! ```
//!
//! The key bytes are the engine's compact key definition: one `+` or `-`
//! direction marker per segment, the column name, a NUL separator, and a
//! final extra NUL terminating the whole definition. Parsing of that string
//! into segment descriptors lives in [`crate::meta`]; this module only
//! carries it verbatim.
//!
//! `compare_options` is meaningful only when bit 0 of `flags` is set; an
//! index without text-comparison metadata carries no options at all rather
//! than a default value.

use eyre::{ensure, eyre, Result};
use zerocopy::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use super::ColumnId;

/// Physical column type tag, as declared in the engine's catalog.
///
/// Discriminants are grouped: 0-11 fixed-width, 20+ variable-length.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Bool = 0,
    UInt8 = 1,
    Int16 = 2,
    UInt16 = 3,
    Int32 = 4,
    UInt32 = 5,
    Int64 = 6,
    UInt64 = 7,
    Float32 = 8,
    Float64 = 9,
    DateTime = 10,
    Guid = 11,

    Text = 20,
    Binary = 21,
}

impl ColumnType {
    /// Returns the fixed byte size for this type, or None for variable-length types.
    pub fn fixed_size(&self) -> Option<usize> {
        match self {
            ColumnType::Bool => Some(1),
            ColumnType::UInt8 => Some(1),
            ColumnType::Int16 => Some(2),
            ColumnType::UInt16 => Some(2),
            ColumnType::Int32 => Some(4),
            ColumnType::UInt32 => Some(4),
            ColumnType::Int64 => Some(8),
            ColumnType::UInt64 => Some(8),
            ColumnType::Float32 => Some(4),
            ColumnType::Float64 => Some(8),
            ColumnType::DateTime => Some(8),
            ColumnType::Guid => Some(16),
            ColumnType::Text | ColumnType::Binary => None,
        }
    }

    /// Returns true if this type requires variable-length storage.
    pub fn is_variable(&self) -> bool {
        self.fixed_size().is_none()
    }

    /// Returns true if values of this type are text.
    pub fn is_text(&self) -> bool {
        matches!(self, ColumnType::Text)
    }
}

impl TryFrom<u8> for ColumnType {
    type Error = eyre::Report;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ColumnType::Bool),
            1 => Ok(ColumnType::UInt8),
            2 => Ok(ColumnType::Int16),
            3 => Ok(ColumnType::UInt16),
            4 => Ok(ColumnType::Int32),
            5 => Ok(ColumnType::UInt32),
            6 => Ok(ColumnType::Int64),
            7 => Ok(ColumnType::UInt64),
            8 => Ok(ColumnType::Float32),
            9 => Ok(ColumnType::Float64),
            10 => Ok(ColumnType::DateTime),
            11 => Ok(ColumnType::Guid),
            20 => Ok(ColumnType::Text),
            21 => Ok(ColumnType::Binary),
            _ => eyre::bail!("invalid ColumnType tag: {}", value),
        }
    }
}

/// Column row flag: the column declares a default value.
pub const COLUMN_FLAG_HAS_DEFAULT: u8 = 0x01;

/// Index row flag: the row carries text-comparison options.
pub const INDEX_FLAG_HAS_COMPARE_OPTIONS: u8 = 0x01;

const RAW_COLUMN_HEADER_SIZE: usize = 14;
const RAW_INDEX_HEADER_SIZE: usize = 13;

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
struct RawColumnHeader {
    columnid: U32,
    coltyp: u8,
    flags: u8,
    code_page: U16,
    max_length: U32,
    name_len: U16,
}

const _: () = assert!(std::mem::size_of::<RawColumnHeader>() == RAW_COLUMN_HEADER_SIZE);

impl RawColumnHeader {
    zerocopy_getters! {
        columnid: u32,
        code_page: u16,
        max_length: u32,
        name_len: u16,
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
struct RawIndexHeader {
    grbit: U32,
    compare_options: U32,
    flags: u8,
    name_len: U16,
    key_len: U16,
}

const _: () = assert!(std::mem::size_of::<RawIndexHeader>() == RAW_INDEX_HEADER_SIZE);

impl RawIndexHeader {
    zerocopy_getters! {
        grbit: u32,
        compare_options: u32,
        name_len: u16,
        key_len: u16,
    }
}

/// One parsed column catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumnMeta {
    pub columnid: ColumnId,
    pub coltyp: ColumnType,
    pub code_page: u16,
    pub max_length: u32,
    pub has_default: bool,
    pub name: String,
}

impl RawColumnMeta {
    /// Parses a packed column row. Rejects short rows, length mismatches,
    /// non-UTF-8 names and unknown type tags.
    pub fn parse(row: &[u8]) -> Result<Self> {
        let (header, rest) = RawColumnHeader::read_from_prefix(row)
            .map_err(|_| eyre!("column catalog row too short: {} bytes", row.len()))?;

        let name_len = header.name_len() as usize;
        ensure!(
            rest.len() == name_len,
            "column catalog row length mismatch: header declares {} name bytes, row carries {}",
            name_len,
            rest.len()
        );

        let name = std::str::from_utf8(rest)
            .map_err(|_| eyre!("column name is not valid utf-8"))?
            .to_owned();

        Ok(Self {
            columnid: ColumnId(header.columnid()),
            coltyp: ColumnType::try_from(header.coltyp)?,
            code_page: header.code_page(),
            max_length: header.max_length(),
            has_default: header.flags & COLUMN_FLAG_HAS_DEFAULT != 0,
            name,
        })
    }

    /// Encodes this row in the packed catalog layout. Inverse of [`parse`].
    ///
    /// [`parse`]: RawColumnMeta::parse
    pub fn encode(&self) -> Vec<u8> {
        let header = RawColumnHeader {
            columnid: U32::new(self.columnid.0),
            coltyp: self.coltyp as u8,
            flags: if self.has_default {
                COLUMN_FLAG_HAS_DEFAULT
            } else {
                0
            },
            code_page: U16::new(self.code_page),
            max_length: U32::new(self.max_length),
            name_len: U16::new(self.name.len() as u16),
        };

        let mut row = header.as_bytes().to_vec();
        row.extend_from_slice(self.name.as_bytes());
        row
    }
}

/// One parsed index catalog row. The key definition is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIndexMeta {
    pub name: String,
    pub grbit: u32,
    pub compare_options: Option<u32>,
    pub key_definition: Vec<u8>,
}

impl RawIndexMeta {
    /// Parses a packed index row.
    pub fn parse(row: &[u8]) -> Result<Self> {
        let (header, rest) = RawIndexHeader::read_from_prefix(row)
            .map_err(|_| eyre!("index catalog row too short: {} bytes", row.len()))?;

        let name_len = header.name_len() as usize;
        let key_len = header.key_len() as usize;
        ensure!(
            rest.len() == name_len + key_len,
            "index catalog row length mismatch: header declares {} bytes, row carries {}",
            name_len + key_len,
            rest.len()
        );

        let name = std::str::from_utf8(&rest[..name_len])
            .map_err(|_| eyre!("index name is not valid utf-8"))?
            .to_owned();

        let compare_options = if header.flags & INDEX_FLAG_HAS_COMPARE_OPTIONS != 0 {
            Some(header.compare_options())
        } else {
            None
        };

        Ok(Self {
            name,
            grbit: header.grbit(),
            compare_options,
            key_definition: rest[name_len..].to_vec(),
        })
    }

    /// Encodes this row in the packed catalog layout. Inverse of [`parse`].
    ///
    /// [`parse`]: RawIndexMeta::parse
    pub fn encode(&self) -> Vec<u8> {
        let header = RawIndexHeader {
            grbit: U32::new(self.grbit),
            compare_options: U32::new(self.compare_options.unwrap_or(0)),
            flags: if self.compare_options.is_some() {
                INDEX_FLAG_HAS_COMPARE_OPTIONS
            } else {
                0
            },
            name_len: U16::new(self.name.len() as u16),
            key_len: U16::new(self.key_definition.len() as u16),
        };

        let mut row = header.as_bytes().to_vec();
        row.extend_from_slice(self.name.as_bytes());
        row.extend_from_slice(&self.key_definition);
        row
    }
}
