//! # Buffered Column Retrieval
//!
//! The engine does not report the size of a variable-length value up front:
//! a read either fits the caller's buffer or comes back `BufferTooSmall`
//! with the required capacity in the byte-count out-parameter. This module
//! implements the two-call protocol every typed accessor in the crate rides
//! on.
//!
//! ## Protocol
//!
//! ```text
//! probe with a 256-byte scratch buffer
//!   ├── ColumnNull      -> Absent
//!   ├── Success (n)     -> Present(first n bytes)
//!   └── BufferTooSmall  -> allocate exactly the reported size, retry once
//!         ├── Success, size matches -> Present(buffer)
//!         └── anything else         -> hard error
//! ```
//!
//! Most column values are small, so the common case is a single engine call
//! with no heap traffic beyond the final owned copy. Arbitrarily large
//! values (multi-megabyte long-values included) cost exactly one extra call.
//!
//! The retry is capped at one. If the second call still reports
//! `BufferTooSmall`, or returns a different size than the probe reported,
//! the value changed between the two calls (another cursor updated the
//! record), and that surfaces as an error rather than a retry loop.
//!
//! ## Absent vs empty
//!
//! A null column and a zero-length value are different things and stay
//! different here: null comes back as [`Retrieved::Absent`], a zero-length
//! value as `Present` of an empty buffer.

use eyre::{bail, ensure, Result};

use crate::engine::{retrieve_grbit, ColumnId, Cursor, EngineError, RawEngine, RawStatus};

/// Capacity of the stack scratch buffer used for the first retrieval call.
pub const RETRIEVE_SCRATCH_CAPACITY: usize = 256;

/// Result of a column retrieval: the engine's null, or an exact-sized value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieved {
    Absent,
    Present(Vec<u8>),
}

impl Retrieved {
    /// Returns true if the engine reported a null column.
    pub fn is_absent(&self) -> bool {
        matches!(self, Retrieved::Absent)
    }

    pub fn into_option(self) -> Option<Vec<u8>> {
        match self {
            Retrieved::Absent => None,
            Retrieved::Present(bytes) => Some(bytes),
        }
    }
}

/// Retrieves one column of the record the cursor is positioned on.
///
/// `grbit` is passed through to the engine on both calls. The returned
/// buffer is trimmed to exactly the value's length.
pub fn retrieve_column<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    grbit: u32,
) -> Result<Retrieved> {
    let mut scratch = [0u8; RETRIEVE_SCRATCH_CAPACITY];
    let (size, status) = engine.raw_get_column(cursor, column, Some(&mut scratch), grbit);

    match status {
        RawStatus::ColumnNull => Ok(Retrieved::Absent),
        RawStatus::Success => {
            ensure!(
                size <= RETRIEVE_SCRATCH_CAPACITY,
                "engine reported {size} bytes written to a {RETRIEVE_SCRATCH_CAPACITY}-byte buffer"
            );
            Ok(Retrieved::Present(scratch[..size].to_vec()))
        }
        RawStatus::BufferTooSmall => {
            let mut data = vec![0u8; size];
            let (actual, status) = engine.raw_get_column(cursor, column, Some(&mut data), grbit);
            match status {
                RawStatus::Success if actual == data.len() => Ok(Retrieved::Present(data)),
                RawStatus::Error(code) => Err(EngineError { code }.into()),
                _ => {
                    let expected = data.len();
                    tracing::error!(
                        expected,
                        actual,
                        ?status,
                        "column size changed between retrieval calls"
                    );
                    bail!(
                        "column size changed from {expected} to {actual} during retrieval; \
                         the record was probably updated through another cursor"
                    );
                }
            }
        }
        RawStatus::Error(code) => Err(EngineError { code }.into()),
    }
}

/// Reports the stored size of a column without fetching its data.
///
/// Returns `None` for a null column, otherwise the byte count the engine
/// reports for the value.
pub fn retrieve_column_size<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<usize>> {
    let (size, status) = engine.raw_get_column(cursor, column, None, retrieve_grbit::NONE);
    match status {
        RawStatus::ColumnNull => Ok(None),
        RawStatus::Success | RawStatus::BufferTooSmall => Ok(Some(size)),
        RawStatus::Error(code) => Err(EngineError { code }.into()),
    }
}

/// Retrieves the bookmark of the record the cursor is positioned on.
///
/// Uses the same probe-then-exact-fetch protocol as column retrieval: a
/// size probe with no buffer, then a fetch into a buffer of exactly the
/// reported size.
pub fn retrieve_bookmark<E: RawEngine>(engine: &E, cursor: Cursor) -> Result<Vec<u8>> {
    let (size, status) = engine.raw_get_bookmark(cursor, None);
    match status {
        RawStatus::Success | RawStatus::BufferTooSmall => {}
        RawStatus::Error(code) => return Err(EngineError { code }.into()),
        RawStatus::ColumnNull => bail!("engine reported a null column for a bookmark probe"),
    }

    let mut bookmark = vec![0u8; size];
    let (actual, status) = engine.raw_get_bookmark(cursor, Some(&mut bookmark));
    status.expect_success("bookmark retrieval")?;
    ensure!(
        actual == bookmark.len(),
        "bookmark size changed from {} to {} between probe and fetch",
        bookmark.len(),
        actual
    );

    Ok(bookmark)
}
