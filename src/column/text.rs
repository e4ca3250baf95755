//! # Text Column Codec
//!
//! String retrieval and storage in the two encodings the engine supports: a
//! single-byte-per-character code page (1252, 7-bit content) and UTF-16LE
//! (code page 1200). Any other code page is rejected up front, before the
//! first engine call, so a bad configuration can never leave partial side
//! effects or garbled stored bytes.
//!
//! ## Null vs empty
//!
//! A null column and an empty string are materially different and both
//! directions preserve the difference:
//!
//! | value | stored as |
//! |-------|-----------|
//! | `None` | zero-length write without the zero-length flag (engine null) |
//! | `Some("")` | zero-length write with [`set_grbit::ZERO_LENGTH`] |
//! | `Some(s)` | encoded bytes |
//!
//! Retrieval maps the engine's null to `None` and a zero-length value to
//! `Some("")`.
//!
//! Reads ride the buffered retrieval protocol, so strings larger than the
//! scratch buffer (multi-megabyte values included) cost one extra engine
//! call and nothing else.

use eyre::{bail, ensure, Result};

use crate::column::fetch::{retrieve_column, Retrieved};
use crate::engine::{retrieve_grbit, set_grbit, ColumnId, Cursor, RawEngine};

/// Code pages accepted by the text accessors.
pub mod code_page {
    /// Single byte per character, 7-bit content.
    pub const ASCII: u16 = 1252;
    /// UTF-16LE, two bytes per code unit.
    pub const UNICODE: u16 = 1200;
}

/// A validated code page. Construction is the call-boundary range check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CodePage {
    Ascii,
    Unicode,
}

impl CodePage {
    pub(crate) fn from_raw(raw: u16) -> Result<Self> {
        match raw {
            code_page::ASCII => Ok(CodePage::Ascii),
            code_page::UNICODE => Ok(CodePage::Unicode),
            other => bail!(
                "unsupported code page {other}: text columns use {} (single-byte) or {} (utf-16)",
                code_page::ASCII,
                code_page::UNICODE
            ),
        }
    }
}

pub(crate) fn encode_with(cp: CodePage, value: &str) -> Result<Vec<u8>> {
    match cp {
        CodePage::Ascii => {
            ensure!(
                value.is_ascii(),
                "string contains non-ascii characters and cannot use the single-byte code page"
            );
            Ok(value.as_bytes().to_vec())
        }
        CodePage::Unicode => Ok(value
            .encode_utf16()
            .flat_map(|unit| unit.to_le_bytes())
            .collect()),
    }
}

pub(crate) fn decode_with(cp: CodePage, bytes: &[u8]) -> Result<String> {
    match cp {
        CodePage::Ascii => {
            ensure!(
                bytes.is_ascii(),
                "narrow text column contains non-ascii bytes"
            );
            Ok(bytes.iter().map(|&b| b as char).collect())
        }
        CodePage::Unicode => {
            ensure!(
                bytes.len() % 2 == 0,
                "utf-16 column data has odd length {}",
                bytes.len()
            );
            let units = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
            char::decode_utf16(units)
                .collect::<Result<String, _>>()
                .map_err(|e| eyre::eyre!("column data is not valid utf-16: {e}"))
        }
    }
}

/// Encodes a string with the given code page.
///
/// This is the byte-level encoding used for both column writes and key
/// segments; the code page is validated before anything else.
pub fn encode_text(value: &str, cp: u16) -> Result<Vec<u8>> {
    encode_with(CodePage::from_raw(cp)?, value)
}

/// Decodes column bytes with the given code page.
pub fn decode_text(bytes: &[u8], cp: u16) -> Result<String> {
    decode_with(CodePage::from_raw(cp)?, bytes)
}

/// Retrieves a text column.
///
/// `None` is the engine's null; an explicitly-empty stored value comes back
/// as `Some("")`.
pub fn retrieve_string<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    cp: u16,
) -> Result<Option<String>> {
    let cp = CodePage::from_raw(cp)?;
    match retrieve_column(engine, cursor, column, retrieve_grbit::NONE)? {
        Retrieved::Absent => Ok(None),
        Retrieved::Present(bytes) => decode_with(cp, &bytes).map(Some),
    }
}

/// Writes a text column, preserving the null/empty distinction.
pub fn set_string<E: RawEngine>(
    engine: &E,
    cursor: Cursor,
    column: ColumnId,
    value: Option<&str>,
    cp: u16,
) -> Result<()> {
    let cp = CodePage::from_raw(cp)?;
    match value {
        None => engine
            .raw_set_column(cursor, column, &[], set_grbit::NONE)
            .expect_success("column write"),
        Some(s) if s.is_empty() => engine
            .raw_set_column(cursor, column, &[], set_grbit::ZERO_LENGTH)
            .expect_success("column write"),
        Some(s) => {
            let data = encode_with(cp, s)?;
            engine
                .raw_set_column(cursor, column, &data, set_grbit::NONE)
                .expect_success("column write")
        }
    }
}
