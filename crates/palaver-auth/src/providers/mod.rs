//! Account store implementations

pub mod memory;

pub use memory::MemoryUserStore;
