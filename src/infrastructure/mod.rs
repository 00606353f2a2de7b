pub mod clock;
pub mod directories;
pub mod latch;
pub mod logging;
pub mod mirror;
