//! # Top-K Lap-Time Retrieval
//!
//! Ranks the K fastest lap times of one lap of one race, two ways:
//!
//! - a binary min-heap drained by repeated extract-min ([`PriorityIndex`])
//! - an ordered skip-list index read by ascending traversal ([`OrderedIndex`])
//!
//! The [`RetrievalDriver`] builds both from the same filtered rows and times
//! construction plus query for each, so the two costs can be compared.
//! Equal lap times always rank in the order they were ingested.

pub mod error;
pub mod heap;
pub mod ingest;
pub mod ordered;
pub mod report;
pub mod retrieval;
pub mod types;

// Public re-exports for the top-level API
pub use error::{Error, Result};
pub use heap::PriorityIndex;
pub use ingest::{DriverDirectory, IngestMode};
pub use ordered::OrderedIndex;
pub use report::Report;
pub use retrieval::{Comparison, Options, RetrievalDriver, Strategy, StrategyOutcome};
pub use types::{LapFilter, LapTime, Record};
