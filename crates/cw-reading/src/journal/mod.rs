//! Reading journal: entry assembly, the in-memory log, and persistence.

mod entry;
mod log;
mod store;

pub use entry::JournalEntry;
pub use log::Journal;
pub use store::{FileStore, JournalStore, KeyValueStore, MemoryStore};
