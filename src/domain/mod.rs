pub mod listing;
pub mod profile;

pub use listing::{ListingId, ListingRecord, ProcessedIds};
pub use profile::MemberProfile;
