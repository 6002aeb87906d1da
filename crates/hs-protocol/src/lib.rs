//! Shared types for Hindsight — the log source taxonomy, the three
//! normalized entry shapes, and the query request/response envelope
//! exchanged between the API surface and the parsing core.

pub mod entry;
pub mod query;
pub mod source;

pub use entry::*;
pub use query::*;
pub use source::*;
