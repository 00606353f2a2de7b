pub mod circuit;
pub mod notifier;

pub use circuit::CircuitBreaker;
pub use notifier::{DeliveryOutcome, Notifier};
