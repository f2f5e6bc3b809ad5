mod error;
mod id;
mod traits;

pub mod filesystem;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;

pub use error::StorageError;
pub use id::BlobId;
pub use traits::{BlobStore, BoxReader};
