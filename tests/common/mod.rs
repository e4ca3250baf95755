//! In-memory fake of the raw engine surface.
//!
//! Stores one record per cursor, serves the catalog from registered table
//! metadata, and records every raw call so tests can assert on exactly what
//! the marshaling layer asked the engine to do. A scripted value swap
//! simulates a concurrent writer between the size probe and the retry.

// not every test binary exercises every helper
#![allow(dead_code)]

use std::collections::HashMap;

use parking_lot::Mutex;

use colbind::engine::meta::{RawColumnMeta, RawIndexMeta};
use colbind::engine::{set_grbit, ColumnId, Cursor, RawEngine, RawStatus, TableRef};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawCall {
    GetColumn {
        cursor: Cursor,
        column: ColumnId,
        probe: bool,
        capacity: usize,
        grbit: u32,
    },
    SetColumn {
        cursor: Cursor,
        column: ColumnId,
        data: Vec<u8>,
        grbit: u32,
    },
    AppendKeySegment {
        cursor: Cursor,
        data: Vec<u8>,
        grbit: u32,
    },
    Seek {
        cursor: Cursor,
        grbit: u32,
    },
    GetBookmark {
        cursor: Cursor,
        probe: bool,
    },
}

#[derive(Debug, Clone, Default)]
pub struct TableMeta {
    pub columns: Vec<RawColumnMeta>,
    pub indexes: Vec<RawIndexMeta>,
}

#[derive(Default)]
struct State {
    // None = column explicitly set to null; missing key = never set
    values: HashMap<(Cursor, ColumnId), Option<Vec<u8>>>,
    swap_after_overflow: HashMap<(Cursor, ColumnId), Vec<u8>>,
    bookmarks: HashMap<Cursor, Vec<u8>>,
    tables: HashMap<String, TableMeta>,
    cursor_tables: HashMap<Cursor, String>,
    fail_next: Option<i32>,
    calls: Vec<RawCall>,
}

#[derive(Default)]
pub struct FakeEngine {
    state: Mutex<State>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value (or an explicit null) directly, bypassing the call log.
    pub fn store(&self, cursor: Cursor, column: ColumnId, value: Option<&[u8]>) {
        self.state
            .lock()
            .values
            .insert((cursor, column), value.map(<[u8]>::to_vec));
    }

    /// Replaces the stored value as soon as a retrieval overflows its
    /// buffer, so the retry sees a different size.
    pub fn swap_after_overflow(&self, cursor: Cursor, column: ColumnId, value: &[u8]) {
        self.state
            .lock()
            .swap_after_overflow
            .insert((cursor, column), value.to_vec());
    }

    pub fn set_bookmark(&self, cursor: Cursor, bookmark: &[u8]) {
        self.state.lock().bookmarks.insert(cursor, bookmark.to_vec());
    }

    /// Registers a table's catalog metadata, optionally bound to a cursor.
    pub fn add_table(&self, name: &str, cursor: Option<Cursor>, meta: TableMeta) {
        let mut state = self.state.lock();
        state.tables.insert(name.to_owned(), meta);
        if let Some(cursor) = cursor {
            state.cursor_tables.insert(cursor, name.to_owned());
        }
    }

    /// Makes the next raw column call fail with the given engine code.
    pub fn fail_next(&self, code: i32) {
        self.state.lock().fail_next = Some(code);
    }

    /// What the engine currently holds for a column: `None` if never set,
    /// `Some(None)` if explicitly null.
    pub fn stored(&self, cursor: Cursor, column: ColumnId) -> Option<Option<Vec<u8>>> {
        self.state.lock().values.get(&(cursor, column)).cloned()
    }

    pub fn calls(&self) -> Vec<RawCall> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    fn resolve_table(&self, state: &State, table: TableRef<'_>) -> eyre::Result<String> {
        let name = match table {
            TableRef::Name(name) => name.to_owned(),
            TableRef::Cursor(cursor) => state
                .cursor_tables
                .get(&cursor)
                .cloned()
                .ok_or_else(|| eyre::eyre!("no table open on cursor {cursor:?}"))?,
        };
        eyre::ensure!(state.tables.contains_key(&name), "no table named '{name}'");
        Ok(name)
    }
}

impl RawEngine for FakeEngine {
    fn raw_get_column(
        &self,
        cursor: Cursor,
        column: ColumnId,
        buf: Option<&mut [u8]>,
        grbit: u32,
    ) -> (usize, RawStatus) {
        let mut state = self.state.lock();
        state.calls.push(RawCall::GetColumn {
            cursor,
            column,
            probe: buf.is_none(),
            capacity: buf.as_ref().map_or(0, |b| b.len()),
            grbit,
        });

        if let Some(code) = state.fail_next.take() {
            return (0, RawStatus::Error(code));
        }

        let value = match state.values.get(&(cursor, column)) {
            None | Some(None) => return (0, RawStatus::ColumnNull),
            Some(Some(value)) => value.clone(),
        };

        match buf {
            None => {
                if value.is_empty() {
                    (0, RawStatus::Success)
                } else {
                    (value.len(), RawStatus::BufferTooSmall)
                }
            }
            Some(buf) => {
                if buf.len() >= value.len() {
                    buf[..value.len()].copy_from_slice(&value);
                    (value.len(), RawStatus::Success)
                } else {
                    buf.copy_from_slice(&value[..buf.len()]);
                    if let Some(next) = state.swap_after_overflow.remove(&(cursor, column)) {
                        state.values.insert((cursor, column), Some(next));
                    }
                    (value.len(), RawStatus::BufferTooSmall)
                }
            }
        }
    }

    fn raw_set_column(
        &self,
        cursor: Cursor,
        column: ColumnId,
        data: &[u8],
        grbit: u32,
    ) -> RawStatus {
        let mut state = self.state.lock();
        state.calls.push(RawCall::SetColumn {
            cursor,
            column,
            data: data.to_vec(),
            grbit,
        });

        if let Some(code) = state.fail_next.take() {
            return RawStatus::Error(code);
        }

        let stored = if data.is_empty() && grbit & set_grbit::ZERO_LENGTH == 0 {
            None
        } else {
            Some(data.to_vec())
        };
        state.values.insert((cursor, column), stored);
        RawStatus::Success
    }

    fn raw_append_key_segment(&self, cursor: Cursor, data: &[u8], grbit: u32) -> RawStatus {
        let mut state = self.state.lock();
        state.calls.push(RawCall::AppendKeySegment {
            cursor,
            data: data.to_vec(),
            grbit,
        });
        RawStatus::Success
    }

    fn raw_seek(&self, cursor: Cursor, grbit: u32) -> RawStatus {
        self.state.lock().calls.push(RawCall::Seek { cursor, grbit });
        RawStatus::Success
    }

    fn raw_get_bookmark(&self, cursor: Cursor, buf: Option<&mut [u8]>) -> (usize, RawStatus) {
        let mut state = self.state.lock();
        state.calls.push(RawCall::GetBookmark {
            cursor,
            probe: buf.is_none(),
        });

        let bookmark = state.bookmarks.get(&cursor).cloned().unwrap_or_default();
        match buf {
            None => {
                if bookmark.is_empty() {
                    (0, RawStatus::Success)
                } else {
                    (bookmark.len(), RawStatus::BufferTooSmall)
                }
            }
            Some(buf) => {
                if buf.len() >= bookmark.len() {
                    buf[..bookmark.len()].copy_from_slice(&bookmark);
                    (bookmark.len(), RawStatus::Success)
                } else {
                    (bookmark.len(), RawStatus::BufferTooSmall)
                }
            }
        }
    }

    fn raw_table_columns(&self, table: TableRef<'_>) -> eyre::Result<Vec<Vec<u8>>> {
        let state = self.state.lock();
        let name = self.resolve_table(&state, table)?;
        Ok(state.tables[&name]
            .columns
            .iter()
            .map(RawColumnMeta::encode)
            .collect())
    }

    fn raw_table_indexes(&self, table: TableRef<'_>) -> eyre::Result<Vec<Vec<u8>>> {
        let state = self.state.lock();
        let name = self.resolve_table(&state, table)?;
        Ok(state.tables[&name]
            .indexes
            .iter()
            .map(RawIndexMeta::encode)
            .collect())
    }
}
