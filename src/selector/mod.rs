//! Selector resolution: from a selector string to concrete paths.
//!
//! A selector is split on `/`; each component becomes one or two filters
//! (see [`filter`]). Resolution starts from the root and lets every filter
//! turn the current set of records into the next one. The resulting records
//! each carry a concrete [`Path`](crate::document::path::Path) that can be
//! read or written independently.
//!
//! # Examples
//!
//! ```
//! // books[?(@.title=Red)]/title  - title of every book titled Red
//! // ?(@=~^user)/name             - name under every key starting with "user"
//! // items[..-1]                  - last item
//! // matrix[0..1]/[0..1]          - top-left 2x2 block, row by row
//! ```

pub mod error;
pub mod filter;
pub mod resolver;

pub use error::SelectorError;
pub use filter::{Filter, Selector};
pub use resolver::{FilteredRecord, Resolver};
