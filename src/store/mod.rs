//! Persistence layer — key-value storage behind the form draft and attribution.

pub mod file;
pub mod keys;
pub mod memory;
pub mod traits;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;
