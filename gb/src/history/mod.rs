//! Recent-goal history
//!
//! Keeps the newest generated plans in a JSON-lines file so they can be listed
//! and deleted later.

mod store;

pub use store::{HistoryEntry, HistoryError, HistoryStore};
