//! Core traits defined in `defecthub-core` and implemented by other crates.

pub mod storage;

pub use storage::{ByteReader, ByteStream, FileStore, StoredObject};
