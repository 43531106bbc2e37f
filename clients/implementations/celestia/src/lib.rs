pub mod client;
pub mod namespace;

pub use client::{CelestiaClient, BLOB_SIZE_LIMIT};
pub use namespace::{parse_namespace, NamespaceError, NAMESPACE_ID_V0_SIZE};
