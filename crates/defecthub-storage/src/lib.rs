//! # defecthub-storage
//!
//! Local filesystem store for attachment content. Files are written under
//! a date-partitioned directory with random names, their type is sniffed
//! from the leading bytes, and size and type limits are enforced while
//! streaming.

pub mod local;
pub mod policy;
pub mod sniff;

pub use local::LocalFileStore;
pub use policy::ContentPolicy;
