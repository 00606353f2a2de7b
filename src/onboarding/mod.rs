pub mod dialogue;

pub use dialogue::{DialogueError, OnboardingFlow, OnboardingOutcome};
