pub mod storage;

pub use storage::{BlobId, BlobStore, BoxReader, StorageError};
