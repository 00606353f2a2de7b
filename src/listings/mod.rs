pub mod filter;
pub mod format;
pub mod stream;

pub use filter::{evaluate, Verdict, FRESHNESS_WINDOW};
pub use format::format_listing;
pub use stream::{ListingStream, StreamError};
