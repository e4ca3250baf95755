//! # Schema Introspection
//!
//! Turns the engine's packed catalog rows into structured descriptions:
//! column descriptors, index descriptors with their key segments, and the
//! case-insensitive column-name dictionary.
//!
//! ## Key definitions
//!
//! The engine records an index's shape as a compact string: one `+` or `-`
//! direction marker per segment, the column name, a NUL separator, and one
//! extra NUL closing the definition.
//!
//! ```text
//! +ascii\0-boolean\0\0
//!   => [ascii ascending, boolean descending]
//! ```
//!
//! The definition names columns but carries no types; each segment's type
//! tag and narrow-text flag are resolved against the table's own column
//! descriptors, which is why index listing reads the column catalog too.
//!
//! ## Entry points
//!
//! Every operation takes a [`TableRef`], so a table can be named by an open
//! cursor or by name; the two must produce identical descriptors for the
//! same table. The dictionary is built once per open table and is immutable
//! afterwards; reopening the table means rebuilding the dictionary.

use eyre::{bail, ensure, eyre, Result};
use hashbrown::HashMap;

use crate::column::text::code_page;
use crate::engine::meta::{ColumnType, RawColumnMeta, RawIndexMeta};
use crate::engine::{ColumnId, Cursor, RawEngine, TableRef};

/// Describes one column of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name; identity is case-insensitive.
    pub name: String,
    pub columnid: ColumnId,
    pub coltyp: ColumnType,
    pub max_length: u32,
    /// Code page for text columns; 0 for everything else.
    pub code_page: u16,
    pub has_default: bool,
}

impl From<RawColumnMeta> for ColumnInfo {
    fn from(raw: RawColumnMeta) -> Self {
        Self {
            name: raw.name,
            columnid: raw.columnid,
            coltyp: raw.coltyp,
            max_length: raw.max_length,
            code_page: raw.code_page,
            has_default: raw.has_default,
        }
    }
}

/// One column's contribution to an index key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSegment {
    pub column_name: String,
    pub is_ascending: bool,
    pub coltyp: ColumnType,
    /// True for text segments stored in the single-byte code page.
    pub is_narrow_text: bool,
}

/// Describes one index of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    pub name: String,
    /// Creation option flags, as recorded by the engine.
    pub grbit: u32,
    pub segments: Vec<IndexSegment>,
    /// Text-comparison options; `None` when the index was created without
    /// any (there is no meaningful default for a non-text index).
    pub compare_options: Option<u32>,
}

/// Lists a table's columns in engine order.
pub fn list_columns<E: RawEngine>(engine: &E, table: TableRef<'_>) -> Result<Vec<ColumnInfo>> {
    engine
        .raw_table_columns(table)?
        .iter()
        .map(|row| RawColumnMeta::parse(row).map(ColumnInfo::from))
        .collect()
}

/// Lists a table's indexes, with each key definition parsed into segments.
pub fn list_indexes<E: RawEngine>(engine: &E, table: TableRef<'_>) -> Result<Vec<IndexInfo>> {
    let columns = list_columns(engine, table)?;
    engine
        .raw_table_indexes(table)?
        .iter()
        .map(|row| {
            let raw = RawIndexMeta::parse(row)?;
            let segments = parse_key_definition(&raw.key_definition, &columns)?;
            Ok(IndexInfo {
                name: raw.name,
                grbit: raw.grbit,
                segments,
                compare_options: raw.compare_options,
            })
        })
        .collect()
}

/// Parses a packed key definition against the columns of its table.
pub fn parse_key_definition(key: &[u8], columns: &[ColumnInfo]) -> Result<Vec<IndexSegment>> {
    let mut segments = Vec::new();
    let mut rest = key;

    loop {
        match rest.first() {
            None => bail!("index key definition is missing its terminator"),
            Some(0) => {
                ensure!(
                    rest.len() == 1,
                    "trailing bytes after index key definition terminator"
                );
                break;
            }
            Some(&marker) => {
                let is_ascending = match marker {
                    b'+' => true,
                    b'-' => false,
                    other => bail!(
                        "invalid direction marker {:#04x} in index key definition",
                        other
                    ),
                };

                let nul = rest
                    .iter()
                    .position(|&b| b == 0)
                    .ok_or_else(|| eyre!("unterminated segment in index key definition"))?;
                ensure!(nul > 1, "empty column name in index key definition");

                let name = std::str::from_utf8(&rest[1..nul])
                    .map_err(|_| eyre!("index key segment name is not valid utf-8"))?;
                let column = columns
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(name))
                    .ok_or_else(|| eyre!("index key references unknown column '{}'", name))?;

                segments.push(IndexSegment {
                    column_name: name.to_owned(),
                    is_ascending,
                    coltyp: column.coltyp,
                    is_narrow_text: column.coltyp.is_text()
                        && column.code_page == code_page::ASCII,
                });

                rest = &rest[nul + 1..];
            }
        }
    }

    ensure!(
        !segments.is_empty(),
        "index key definition has no segments"
    );
    Ok(segments)
}

/// Case-insensitive column name to handle mapping, built once per open
/// table.
#[derive(Debug, Clone, Default)]
pub struct ColumnDictionary {
    entries: HashMap<String, ColumnId>,
}

impl ColumnDictionary {
    /// Looks a column up by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<ColumnId> {
        self.entries.get(&name.to_ascii_lowercase()).copied()
    }

    /// Looks a column up by name, failing for names that are not columns of
    /// the table; there is no default handle to fall back to.
    pub fn require(&self, name: &str) -> Result<ColumnId> {
        self.get(name)
            .ok_or_else(|| eyre!("no column named '{}' in this table", name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Builds the column dictionary for the table an open cursor is over.
///
/// The engine guarantees case-insensitive name uniqueness; a case-variant
/// duplicate in the catalog is a schema corruption and fails loudly rather
/// than silently dropping an entry.
pub fn column_dictionary<E: RawEngine>(engine: &E, cursor: Cursor) -> Result<ColumnDictionary> {
    let columns = list_columns(engine, TableRef::Cursor(cursor))?;

    let mut entries = HashMap::with_capacity(columns.len());
    for column in &columns {
        ensure!(
            entries
                .insert(column.name.to_ascii_lowercase(), column.columnid)
                .is_none(),
            "duplicate column name '{}' differing only by case",
            column.name
        );
    }

    Ok(ColumnDictionary { entries })
}
