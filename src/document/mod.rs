//! Document model and path navigation.
//!
//! - [`value`] - the `Value` tree
//! - [`path`] - concrete key/index paths
//! - [`navigator`] - reading and writing at a path
//! - [`tree`] - an owned document with path and selector access
//! - [`parser`] / [`serialize`] - conversion from and to JSON and YAML text

pub mod navigator;
pub mod parser;
pub mod path;
pub mod serialize;
pub mod tree;
pub mod value;
