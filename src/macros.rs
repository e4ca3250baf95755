//! # Internal Macros
//!
//! This module provides internal macros for reducing boilerplate in colbind.
//!
//! ## zerocopy_getters!
//!
//! Generates getter methods for zerocopy struct fields that use
//! little-endian wrapper types (U16, U32).
//!
//! ### Usage
//!
//! ```ignore
//! use zerocopy::little_endian::{U16, U32};
//!
//! #[repr(C)]
//! struct Header {
//!     columnid: U32,
//!     name_len: U16,
//! }
//!
//! impl Header {
//!     zerocopy_getters! {
//!         columnid: u32,
//!         name_len: u16,
//!     }
//! }
//!
//! // Generates:
//! // pub fn columnid(&self) -> u32 { self.columnid.get() }
//! // pub fn name_len(&self) -> u16 { self.name_len.get() }
//! ```

/// Generates getter methods for zerocopy little-endian fields (read-only).
#[macro_export]
macro_rules! zerocopy_getters {
    ($($field:ident : $native_ty:ty),* $(,)?) => {
        $(
            #[inline]
            pub fn $field(&self) -> $native_ty {
                self.$field.get()
            }
        )*
    };
}
