//! # Typed Column Access
//!
//! Marshaling between typed values and the raw byte buffers the engine
//! reads and writes:
//!
//! - [`fetch`]: the buffered retrieval protocol (probe, exact resize, one
//!   retry) plus size and bookmark probes
//! - [`scalar`]: fixed-width codecs and the typed retrieve/set accessors
//! - [`text`]: string accessors in the two supported encodings
//! - [`oadate`]: day-count timestamp conversion with range clamping
//!
//! The byte-level accessors for binary columns live here: they are the thin
//! end of the same family, with the null/empty distinction handled exactly
//! as for text.

pub mod fetch;
pub mod oadate;
pub mod scalar;
pub mod text;

pub use fetch::{
    retrieve_bookmark, retrieve_column, retrieve_column_size, Retrieved,
    RETRIEVE_SCRATCH_CAPACITY,
};
pub use scalar::{
    decode_fixed, retrieve_bool, retrieve_date_time, retrieve_f32, retrieve_f64, retrieve_guid,
    retrieve_i16, retrieve_i32, retrieve_i64, retrieve_i8, retrieve_u16, retrieve_u32,
    retrieve_u64, retrieve_u8, set_bool, set_date_time, set_f32, set_f64, set_guid, set_i16,
    set_i32, set_i64, set_i8, set_u16, set_u32, set_u64, set_u8, FixedColumn,
};
pub use text::{decode_text, encode_text, retrieve_string, set_string};

use eyre::Result;

use crate::engine::{retrieve_grbit, set_grbit, ColumnId, Cursor, RawEngine};

/// Retrieves a binary column as owned bytes; `None` is the engine's null.
pub fn retrieve_bytes<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<Vec<u8>>> {
    Ok(retrieve_column(engine, cursor, column, retrieve_grbit::NONE)?.into_option())
}

/// Writes a binary column, preserving the null/empty distinction.
///
/// `None` sets the column to null; `Some(&[])` stores an explicitly empty
/// value; anything else stores the bytes as given.
pub fn set_bytes<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    value: Option<&[u8]>,
) -> Result<()> {
    match value {
        None => engine
            .raw_set_column(cursor, column, &[], set_grbit::NONE)
            .expect_success("column write"),
        Some(data) => {
            let grbit = if data.is_empty() {
                set_grbit::ZERO_LENGTH
            } else {
                set_grbit::NONE
            };
            engine
                .raw_set_column(cursor, column, data, grbit)
                .expect_success("column write")
        }
    }
}

/// Writes raw, already-encoded bytes to a column with explicit options.
///
/// The typed accessors cover the common cases; this is the escape hatch for
/// callers that manage their own encoding or need engine-specific flags.
pub fn set_column<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    data: &[u8],
    grbit: u32,
) -> Result<()> {
    engine
        .raw_set_column(cursor, column, data, grbit)
        .expect_success("column write")
}
