//! # colbind - Typed Column Marshaling
//!
//! colbind sits between application code and a transactional,
//! record-oriented storage engine that exposes only an untyped,
//! buffer-based column API: get/set bytes for a column id, given a cursor
//! the engine has positioned. The engine itself (sessions, transactions,
//! B-tree positioning, locking, recovery) stays outside; colbind conforms
//! to its raw surface (the [`engine::RawEngine`] trait) and gives the
//! application strongly-typed access on top of it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use colbind::column;
//! use colbind::engine::key_grbit;
//! use colbind::keys::KeyBuilder;
//! use colbind::meta;
//!
//! // cursor and engine come from the embedding application
//! let columns = meta::column_dictionary(&engine, cursor)?;
//! let id = columns.require("id")?;
//!
//! column::set_i64(&engine, cursor, id, 42)?;
//! let value = column::retrieve_i64(&engine, cursor, id)?;   // Some(42)
//!
//! let mut key = KeyBuilder::new(&engine, cursor);
//! key.append_i64(42, key_grbit::NEW_KEY)?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────┐
//! │       Application (typed values)      │
//! ├─────────────┬────────────┬────────────┤
//! │ Typed       │ Key        │ Schema     │
//! │ Accessors   │ Builder    │ Introspect │
//! ├─────────────┤ (keys)     │ (meta)     │
//! │ Scalar/Text │            │            │
//! │ Codecs      │            │            │
//! ├─────────────┴──┐         │            │
//! │ Buffered       │         │            │
//! │ Retrieval      │         │            │
//! ├────────────────┴─────────┴────────────┤
//! │  Raw Engine Surface (engine trait)    │
//! └───────────────────────────────────────┘
//! ```
//!
//! Reads flow typed accessor -> codec -> buffered retrieval -> raw call;
//! writes run the same path in reverse. The key builder and the schema
//! introspector talk to the raw surface directly: keys are constructed,
//! not retrieved, and catalog rows arrive whole.
//!
//! ## Semantics worth knowing
//!
//! - A null column is `None`, everywhere, and is never conflated with a
//!   zero-length value or an empty string.
//! - Values larger than the 256-byte probe buffer are fetched with exactly
//!   one extra engine call; a value that changes size between the two calls
//!   is an error, not a retry loop.
//! - Exactly two text encodings exist (code pages 1252 and 1200); anything
//!   else is rejected before the engine is called.
//! - Stored timestamp day counts outside the representable calendar range
//!   clamp instead of failing; that is the crate's only silent correction.
//!
//! ## Module Overview
//!
//! - [`engine`]: the raw engine contract (handles, statuses, option flags,
//!   packed catalog row layouts)
//! - [`column`]: buffered retrieval and the typed column accessors
//! - [`keys`]: multi-segment sort key construction
//! - [`meta`]: column/index descriptors and the column dictionary
//!
//! ## Threading
//!
//! Everything is synchronous and blocking, and nothing here locks: a cursor
//! (including its in-progress key) is mutable state the caller must
//! serialize. Distinct cursors need no coordination from this layer.

#[macro_use]
mod macros;

pub mod column;
pub mod engine;
pub mod keys;
pub mod meta;

pub use engine::{ColumnId, Cursor, EngineError, RawEngine, RawStatus, TableRef};
