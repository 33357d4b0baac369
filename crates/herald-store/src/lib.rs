//! # herald-store
//!
//! In-memory implementation of the communication store. Records live for
//! the life of the process.

mod memory;

pub use memory::MemoryStore;
