//! # Raw Engine Contract
//!
//! This module defines the boundary between colbind and the storage engine it
//! marshals for. The engine owns sessions, transactions, B-tree positioning,
//! locking and recovery; colbind only sees the narrow, untyped surface below
//! and conforms to it. Nothing in this crate ever implements the engine: the
//! [`RawEngine`] trait is implemented by the embedding application (and by the
//! in-memory fake in this crate's integration tests).
//!
//! ## Handles
//!
//! [`Cursor`] and [`ColumnId`] are opaque tokens issued by the engine. This
//! layer never fabricates them and never looks inside them; they are carried
//! through to raw calls unchanged. [`TableRef`] names a table either by an
//! already-open cursor or by name; the catalog operations accept both and
//! must behave identically for either.
//!
//! ## Statuses
//!
//! Raw calls report a [`RawStatus`]. Exactly three values are interpreted by
//! this layer (`Success`, `ColumnNull`, `BufferTooSmall`); every other
//! engine-reported failure travels through unmodified as an [`EngineError`].
//!
//! ## Option flags
//!
//! Engine calls take bit flags grouped by call family (`retrieve_grbit`,
//! `set_grbit`, `key_grbit`, `seek_grbit`). The values are part of the engine
//! contract; this layer combines them but never reinterprets them.
//!
//! ## Threading
//!
//! Every trait method takes `&self`: cursor state is cursor-local and the
//! caller serializes access to any one cursor, while coordination across
//! cursors (if any is needed) is the engine's responsibility.

pub mod meta;

use eyre::Result;
use thiserror::Error;

/// Opaque handle to a positioned record view, supplied by the caller.
///
/// This layer never creates or destroys cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor(pub u64);

/// Opaque per-table, per-column identifier issued by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnId(pub u32);

/// Names a table for catalog operations: by an open cursor or by table name.
///
/// The two forms must yield identical descriptors for the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRef<'a> {
    Cursor(Cursor),
    Name(&'a str),
}

/// Outcome of a raw engine call.
///
/// `Success`, `ColumnNull` and `BufferTooSmall` are the only statuses this
/// layer interprets; any other engine failure is carried as `Error` with the
/// engine's own code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawStatus {
    Success,
    ColumnNull,
    BufferTooSmall,
    Error(i32),
}

impl RawStatus {
    /// Converts a status from a call that admits no warning outcome.
    ///
    /// `Error` propagates as [`EngineError`]; `ColumnNull`/`BufferTooSmall`
    /// from such a call mean the engine broke its own contract.
    pub fn expect_success(self, operation: &str) -> Result<()> {
        match self {
            RawStatus::Success => Ok(()),
            RawStatus::Error(code) => Err(EngineError { code }.into()),
            other => eyre::bail!("unexpected engine status {other:?} during {operation}"),
        }
    }
}

/// An engine-reported failure code, propagated without interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("engine call failed with code {code}")]
pub struct EngineError {
    pub code: i32,
}

/// Options for raw column retrieval, passed through to the engine.
pub mod retrieve_grbit {
    pub const NONE: u32 = 0x0;
    /// Retrieve the in-progress copy of the record rather than the committed one.
    pub const RETRIEVE_COPY: u32 = 0x1;
}

/// Options for raw column writes.
pub mod set_grbit {
    pub const NONE: u32 = 0x0;
    /// A zero-length write stores an empty value; without this flag the
    /// engine treats zero-length data as setting the column to null.
    pub const ZERO_LENGTH: u32 = 0x1;
}

/// Options for key segment appends.
pub mod key_grbit {
    pub const NONE: u32 = 0x0;
    /// Start a fresh key instead of appending another segment.
    pub const NEW_KEY: u32 = 0x1;
    /// The segment is an explicitly null value.
    pub const NULL_SEGMENT: u32 = 0x2;
    /// The segment is present but zero-length.
    pub const ZERO_LENGTH: u32 = 0x4;
    /// Match any remainder beyond the segments appended so far.
    pub const PARTIAL_REMAINDER: u32 = 0x8;
}

/// Options for seeking with a constructed key.
pub mod seek_grbit {
    pub const EQ: u32 = 0x1;
    pub const LT: u32 = 0x2;
    pub const LE: u32 = 0x4;
    pub const GE: u32 = 0x8;
    pub const GT: u32 = 0x10;
}

/// Index creation option flags surfaced by the catalog.
pub mod index_grbit {
    pub const NONE: u32 = 0x0;
    pub const UNIQUE: u32 = 0x1;
    pub const PRIMARY: u32 = 0x2;
    pub const DISALLOW_NULL: u32 = 0x4;
}

/// The untyped, buffer-based engine surface this crate marshals for.
///
/// Buffer conventions: `raw_get_column` and `raw_get_bookmark` accept
/// `None` as a pure size probe; both report the number of bytes the value
/// occupies, which on `BufferTooSmall` is the capacity required for a retry.
pub trait RawEngine {
    /// Reads a column of the record the cursor is positioned on into `buf`.
    ///
    /// Returns the byte count and status. On `BufferTooSmall` the count is
    /// the required capacity, not the number of bytes written.
    fn raw_get_column(
        &self,
        cursor: Cursor,
        column: ColumnId,
        buf: Option<&mut [u8]>,
        grbit: u32,
    ) -> (usize, RawStatus);

    /// Writes a column of the record being updated through the cursor.
    ///
    /// Zero-length `data` without [`set_grbit::ZERO_LENGTH`] sets the column
    /// to null.
    fn raw_set_column(&self, cursor: Cursor, column: ColumnId, data: &[u8], grbit: u32)
        -> RawStatus;

    /// Appends one segment to the key under construction on the cursor.
    fn raw_append_key_segment(&self, cursor: Cursor, data: &[u8], grbit: u32) -> RawStatus;

    /// Positions the cursor using the key constructed on it.
    fn raw_seek(&self, cursor: Cursor, grbit: u32) -> RawStatus;

    /// Reads the bookmark of the record the cursor is positioned on.
    fn raw_get_bookmark(&self, cursor: Cursor, buf: Option<&mut [u8]>) -> (usize, RawStatus);

    /// Returns the packed column catalog rows for a table, in engine order.
    ///
    /// Row layout is defined in [`meta::RawColumnMeta`].
    fn raw_table_columns(&self, table: TableRef<'_>) -> Result<Vec<Vec<u8>>>;

    /// Returns the packed index catalog rows for a table, in engine order.
    ///
    /// Row layout is defined in [`meta::RawIndexMeta`].
    fn raw_table_indexes(&self, table: TableRef<'_>) -> Result<Vec<Vec<u8>>>;
}
