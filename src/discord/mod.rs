pub mod gateway;
pub mod handler;
pub mod message;
pub mod session;
pub mod types;

pub use gateway::DiscordGateway;
pub use handler::{GreeterHandler, ListingsHandler};
pub use message::DiscordCommandContext;
pub use session::DiscordOnboardingSession;
pub use types::GreeterState;
