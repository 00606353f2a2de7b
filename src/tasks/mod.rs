pub mod poller;
pub mod scheduler;
