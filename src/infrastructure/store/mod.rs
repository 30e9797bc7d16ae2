//! Persistence adapters for purchases and users

mod traits;
mod memory;
mod json_file;

pub use traits::{PurchaseStore, UserStore};
pub use memory::MemoryStore;
pub use json_file::JsonFileStore;
