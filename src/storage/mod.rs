pub mod error;
pub mod file_store;
pub mod memory_store;
pub mod store;
