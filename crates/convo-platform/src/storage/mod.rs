pub mod auto;
pub mod file;
pub mod memory;

pub use auto::pick_storage;
pub use file::FileStorage;
pub use memory::MemoryStorage;
