//! # Sort Key Construction
//!
//! Seek and range operations take a key built segment by segment on the
//! cursor: the engine holds the key-under-construction, normalizes each
//! appended segment into its sort order, and this layer feeds it encoded
//! bytes plus option flags. [`KeyBuilder`] owns one such construction:
//! create it, append every segment, then [`seek`](KeyBuilder::seek).
//!
//! ## Flags are explicit
//!
//! The first segment of a key must carry [`key_grbit::NEW_KEY`]; the builder
//! never infers it, because "fresh key" versus "another segment of the
//! current key" is a caller decision the engine cannot reconstruct. Null
//! segments and zero-length segments are likewise different engine calls:
//!
//! | appended value | engine call |
//! |----------------|-------------|
//! | `None` | empty data + [`key_grbit::NULL_SEGMENT`] |
//! | empty string/bytes | empty data + [`key_grbit::ZERO_LENGTH`] |
//! | anything else | encoded bytes, caller's flags only |
//!
//! [`key_grbit::PARTIAL_REMAINDER`] makes the key match any remainder beyond
//! the segments appended so far; it passes through untouched.
//!
//! ## Encoding
//!
//! Scalar segments use the same fixed-width little-endian encodings as
//! column storage; text segments use the same two code pages, validated
//! before the engine sees anything. The engine, not this layer, turns those
//! bytes into its normalized sort form.

use chrono::NaiveDateTime;
use eyre::Result;
use smallvec::SmallVec;

use crate::column::oadate;
use crate::column::scalar::FixedColumn;
use crate::column::text::{encode_with, CodePage};
use crate::engine::{key_grbit, Cursor, RawEngine};

/// Builds one multi-segment key on a cursor.
///
/// Key state lives in the engine and is cursor-local; hold the builder for
/// exactly one construction and do not interleave other key work on the
/// same cursor.
pub struct KeyBuilder<'e, E: RawEngine> {
    engine: &'e E,
    cursor: Cursor,
}

impl<'e, E: RawEngine> KeyBuilder<'e, E> {
    pub fn new(engine: &'e E, cursor: Cursor) -> Self {
        Self { engine, cursor }
    }

    fn append_raw(&mut self, data: &[u8], grbit: u32) -> Result<()> {
        self.engine
            .raw_append_key_segment(self.cursor, data, grbit)
            .expect_success("key segment append")
    }

    fn append_fixed<T: FixedColumn>(&mut self, value: T, grbit: u32) -> Result<()> {
        let mut buf = SmallVec::<[u8; 16]>::new();
        buf.resize(T::WIDTH, 0);
        value.encode(&mut buf);
        self.append_raw(&buf, grbit)
    }

    pub fn append_bool(&mut self, value: bool, grbit: u32) -> Result<()> {
        self.append_fixed(value, grbit)
    }

    pub fn append_i8(&mut self, value: i8, grbit: u32) -> Result<()> {
        self.append_fixed(value, grbit)
    }

    pub fn append_u8(&mut self, value: u8, grbit: u32) -> Result<()> {
        self.append_fixed(value, grbit)
    }

    pub fn append_i16(&mut self, value: i16, grbit: u32) -> Result<()> {
        self.append_fixed(value, grbit)
    }

    pub fn append_u16(&mut self, value: u16, grbit: u32) -> Result<()> {
        self.append_fixed(value, grbit)
    }

    pub fn append_i32(&mut self, value: i32, grbit: u32) -> Result<()> {
        self.append_fixed(value, grbit)
    }

    pub fn append_u32(&mut self, value: u32, grbit: u32) -> Result<()> {
        self.append_fixed(value, grbit)
    }

    pub fn append_i64(&mut self, value: i64, grbit: u32) -> Result<()> {
        self.append_fixed(value, grbit)
    }

    pub fn append_u64(&mut self, value: u64, grbit: u32) -> Result<()> {
        self.append_fixed(value, grbit)
    }

    pub fn append_f32(&mut self, value: f32, grbit: u32) -> Result<()> {
        self.append_fixed(value, grbit)
    }

    pub fn append_f64(&mut self, value: f64, grbit: u32) -> Result<()> {
        self.append_fixed(value, grbit)
    }

    pub fn append_guid(&mut self, value: [u8; 16], grbit: u32) -> Result<()> {
        self.append_fixed(value, grbit)
    }

    /// Appends a timestamp segment in the engine's day-count format.
    pub fn append_date_time(&mut self, value: NaiveDateTime, grbit: u32) -> Result<()> {
        let days = oadate::days_from_timestamp(value)?;
        self.append_fixed(days, grbit)
    }

    /// Appends a text segment. The code page is validated before any engine
    /// call, including for `None` values.
    pub fn append_string(&mut self, value: Option<&str>, cp: u16, grbit: u32) -> Result<()> {
        let cp = CodePage::from_raw(cp)?;
        match value {
            None => self.append_raw(&[], grbit | key_grbit::NULL_SEGMENT),
            Some(s) if s.is_empty() => self.append_raw(&[], grbit | key_grbit::ZERO_LENGTH),
            Some(s) => {
                let data = encode_with(cp, s)?;
                self.append_raw(&data, grbit)
            }
        }
    }

    /// Appends a binary segment with the same null/empty handling as
    /// [`append_string`](KeyBuilder::append_string).
    pub fn append_bytes(&mut self, value: Option<&[u8]>, grbit: u32) -> Result<()> {
        match value {
            None => self.append_raw(&[], grbit | key_grbit::NULL_SEGMENT),
            Some(data) if data.is_empty() => {
                self.append_raw(&[], grbit | key_grbit::ZERO_LENGTH)
            }
            Some(data) => self.append_raw(data, grbit),
        }
    }

    /// Appends an explicitly null segment of any column type.
    pub fn append_null(&mut self, grbit: u32) -> Result<()> {
        self.append_raw(&[], grbit | key_grbit::NULL_SEGMENT)
    }

    /// Positions the cursor with the constructed key, consuming the builder.
    pub fn seek(self, grbit: u32) -> Result<()> {
        self.engine
            .raw_seek(self.cursor, grbit)
            .expect_success("seek")
    }
}
