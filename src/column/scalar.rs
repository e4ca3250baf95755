//! # Fixed-Width Scalar Codec
//!
//! Conversions between typed scalars and the engine's on-disk byte layout,
//! plus the typed retrieve/set accessors built from them.
//!
//! ## Widths
//!
//! | Type | Size (bytes) |
//! |------|--------------|
//! | bool | 1 |
//! | i8 / u8 | 1 |
//! | i16 / u16 | 2 |
//! | i32 / u32 | 4 |
//! | i64 / u64 | 8 |
//! | f32 | 4 |
//! | f64 | 8 |
//! | guid | 16 |
//!
//! All multi-byte values are little-endian, matching the engine's native
//! layout, and are converted by byte reinterpretation, never textual
//! parsing. The GUID is an opaque 16-byte token that round-trips exactly;
//! its mixed-endian interior structure belongs to whoever serialized it.
//!
//! Booleans encode false/true as 0x00/0x01. The engine guarantees only its
//! two canonical patterns (all-zero and its chosen nonzero byte, which it
//! may normalize to a different value than we wrote), so decode maps zero to
//! false and any nonzero byte to true.
//!
//! ## Retrieval semantics
//!
//! Every typed accessor returns `Option<T>`: `None` is exactly the engine's
//! null column. A present value with any length other than the type's width
//! is an "invalid column size" error, never a silently truncated or padded
//! value.

use chrono::NaiveDateTime;
use eyre::{ensure, Result};

use crate::column::fetch::{retrieve_column, Retrieved};
use crate::column::oadate;
use crate::engine::{retrieve_grbit, set_grbit, ColumnId, Cursor, RawEngine};

/// Largest width of any fixed-width column type (the GUID).
pub const MAX_FIXED_WIDTH: usize = 16;

/// A scalar with a fixed-width byte representation in the engine.
///
/// `decode` and `encode` are total over exactly-`WIDTH`-byte slices; length
/// checking is the caller's job (see [`decode_fixed`]).
pub trait FixedColumn: Copy {
    const WIDTH: usize;

    /// Reinterprets exactly `WIDTH` bytes as a value.
    fn decode(bytes: &[u8]) -> Self;

    /// Writes the value into exactly `WIDTH` bytes.
    fn encode(self, out: &mut [u8]);
}

macro_rules! fixed_le {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FixedColumn for $ty {
                const WIDTH: usize = std::mem::size_of::<$ty>();

                fn decode(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(bytes);
                    <$ty>::from_le_bytes(raw)
                }

                fn encode(self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

fixed_le!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl FixedColumn for bool {
    const WIDTH: usize = 1;

    fn decode(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    fn encode(self, out: &mut [u8]) {
        out[0] = u8::from(self);
    }
}

impl FixedColumn for [u8; 16] {
    const WIDTH: usize = 16;

    fn decode(bytes: &[u8]) -> Self {
        let mut guid = [0u8; 16];
        guid.copy_from_slice(bytes);
        guid
    }

    fn encode(self, out: &mut [u8]) {
        out.copy_from_slice(&self);
    }
}

/// Decodes a fixed-width value, failing on any length other than the type's
/// width. The error is distinguishable from column absence, which never
/// reaches this function.
pub fn decode_fixed<T: FixedColumn>(bytes: &[u8]) -> Result<T> {
    ensure!(
        bytes.len() == T::WIDTH,
        "invalid column size: expected {} bytes, got {}",
        T::WIDTH,
        bytes.len()
    );
    Ok(T::decode(bytes))
}

/// Retrieves a column and decodes it as `T`.
///
/// `None` means the engine reported a null column.
pub fn retrieve_as<T: FixedColumn, E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<T>> {
    match retrieve_column(engine, cursor, column, retrieve_grbit::NONE)? {
        Retrieved::Absent => Ok(None),
        Retrieved::Present(bytes) => decode_fixed(&bytes).map(Some),
    }
}

/// Encodes `value` and writes it to a column.
pub fn set_as<T: FixedColumn, E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    value: T,
) -> Result<()> {
    debug_assert!(T::WIDTH <= MAX_FIXED_WIDTH);
    let mut raw = [0u8; MAX_FIXED_WIDTH];
    value.encode(&mut raw[..T::WIDTH]);
    engine
        .raw_set_column(cursor, column, &raw[..T::WIDTH], set_grbit::NONE)
        .expect_success("column write")
}

pub fn retrieve_bool<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<bool>> {
    retrieve_as(engine, cursor, column)
}

pub fn retrieve_i8<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<i8>> {
    retrieve_as(engine, cursor, column)
}

pub fn retrieve_u8<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<u8>> {
    retrieve_as(engine, cursor, column)
}

pub fn retrieve_i16<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<i16>> {
    retrieve_as(engine, cursor, column)
}

pub fn retrieve_u16<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<u16>> {
    retrieve_as(engine, cursor, column)
}

pub fn retrieve_i32<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<i32>> {
    retrieve_as(engine, cursor, column)
}

pub fn retrieve_u32<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<u32>> {
    retrieve_as(engine, cursor, column)
}

pub fn retrieve_i64<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<i64>> {
    retrieve_as(engine, cursor, column)
}

pub fn retrieve_u64<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<u64>> {
    retrieve_as(engine, cursor, column)
}

pub fn retrieve_f32<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<f32>> {
    retrieve_as(engine, cursor, column)
}

pub fn retrieve_f64<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<f64>> {
    retrieve_as(engine, cursor, column)
}

pub fn retrieve_guid<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<[u8; 16]>> {
    retrieve_as(engine, cursor, column)
}

/// Retrieves a timestamp column stored in the engine's day-count format.
///
/// Out-of-range stored day counts clamp to the minimum or maximum calendar
/// timestamp; see [`crate::column::oadate`].
pub fn retrieve_date_time<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
) -> Result<Option<NaiveDateTime>> {
    let days = retrieve_as::<f64, E>(engine, cursor, column)?;
    Ok(days.map(oadate::timestamp_from_days))
}

pub fn set_bool<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    value: bool,
) -> Result<()> {
    set_as(engine, cursor, column, value)
}

pub fn set_i8<E: RawEngine>(engine: &E, cursor: Cursor, column: ColumnId, value: i8) -> Result<()> {
    set_as(engine, cursor, column, value)
}

pub fn set_u8<E: RawEngine>(engine: &E, cursor: Cursor, column: ColumnId, value: u8) -> Result<()> {
    set_as(engine, cursor, column, value)
}

pub fn set_i16<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    value: i16,
) -> Result<()> {
    set_as(engine, cursor, column, value)
}

pub fn set_u16<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    value: u16,
) -> Result<()> {
    set_as(engine, cursor, column, value)
}

pub fn set_i32<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    value: i32,
) -> Result<()> {
    set_as(engine, cursor, column, value)
}

pub fn set_u32<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    value: u32,
) -> Result<()> {
    set_as(engine, cursor, column, value)
}

pub fn set_i64<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    value: i64,
) -> Result<()> {
    set_as(engine, cursor, column, value)
}

pub fn set_u64<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    value: u64,
) -> Result<()> {
    set_as(engine, cursor, column, value)
}

pub fn set_f32<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    value: f32,
) -> Result<()> {
    set_as(engine, cursor, column, value)
}

pub fn set_f64<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    value: f64,
) -> Result<()> {
    set_as(engine, cursor, column, value)
}

pub fn set_guid<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    value: [u8; 16],
) -> Result<()> {
    set_as(engine, cursor, column, value)
}

/// Writes a timestamp in the engine's day-count format.
///
/// Fails for timestamps outside the storable calendar range rather than
/// writing a day count that would read back clamped.
pub fn set_date_time<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    value: NaiveDateTime,
) -> Result<()> {
    let days = oadate::days_from_timestamp(value)?;
    set_as(engine, cursor, column, days)
}
