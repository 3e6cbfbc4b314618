//! Storage layer: primary file page I/O and the var-text data log.
//!
//! The primary file holds a 2-byte signature followed by fixed-size
//! pages. Var-text arrays additionally own an append-only data log whose
//! records are addressed by byte offset.

mod data_log;
mod page_store;

pub use data_log::DataLog;
pub use page_store::{FilePageStore, PageStore};
