pub mod dedup;

pub use dedup::{ClearOutcome, DedupStore};
