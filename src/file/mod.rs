//! File I/O for documents.
//!
//! This module loads JSON, JSON Lines and YAML documents from disk or stdin,
//! and saves value trees back to files with atomic writes and optional backups.

pub mod loader;
pub mod saver;
