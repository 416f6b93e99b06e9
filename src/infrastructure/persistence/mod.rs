pub mod json_store;
pub mod memory;

pub use json_store::FileStateStore;
pub use memory::InMemoryStore;
