use thiserror::Error;

use crate::{
    config::OnboardingConfig,
    domain::MemberProfile,
    platform::{OnboardingSession, PlatformError, RoleGrant},
};

const NAME_PROMPT: &str = "Welcome! I'm the server bot and I'll get you set up 🎉 \
                           First question: what's your name?";
const NAME_RETRY: &str = "Please enter a valid name.";
const YEAR_PROMPT: &str = "What's your class year?";
const YEAR_RETRY: &str = "Please enter a valid class year as a number.";
const EMAIL_RETRY: &str = "Sorry, your email does not meet the required domain. Please try again.";
const AFFILIATION_PROMPT: &str = "Since you have graduated, would you like to add your company \
                                  or school to your server nickname? Enter it now, or type 'no' to skip.";
const AFFILIATION_RETRY: &str = "Please enter a valid response.";
const TIMEOUT_NOTICE: &str = "Timed out waiting for a response. Please rejoin the server to try again.";
const APPLY_FAILED: &str = "I couldn't change your nickname or assign your role. Please contact an admin.";

#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("no response received within the time limit")]
    TimedOut,
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingOutcome {
    Completed { nickname: String },
    RoleMissing { nickname: String },
    Failed { nickname: String },
}

/// Scripted question/answer exchange with one new member.
pub struct OnboardingFlow<'a, S: ?Sized> {
    session: &'a S,
    config: &'a OnboardingConfig,
    current_year: i32,
}

impl<'a, S> OnboardingFlow<'a, S>
where
    S: OnboardingSession + ?Sized,
{
    pub fn new(session: &'a S, config: &'a OnboardingConfig, current_year: i32) -> Self {
        Self {
            session,
            config,
            current_year,
        }
    }

    pub async fn run(&self) -> Result<OnboardingOutcome, DialogueError> {
        let profile = self.collect_profile().await?;
        self.apply(&profile).await
    }

    pub async fn collect_profile(&self) -> Result<MemberProfile, DialogueError> {
        let name = loop {
            let answer = self.ask(NAME_PROMPT).await?;
            let trimmed = answer.trim();
            if !trimmed.is_empty() {
                break trimmed.to_string();
            }
            self.session.send(NAME_RETRY).await?;
        };

        let class_year = loop {
            let answer = self.ask(YEAR_PROMPT).await?;
            match answer.trim().parse::<i32>() {
                Ok(year) => break year,
                Err(_) => self.session.send(YEAR_RETRY).await?,
            }
        };

        let email_prompt = format!(
            "What's your school email? (please include '{}' at the end)",
            self.config.email_domain
        );
        let email = loop {
            let answer = self.ask(&email_prompt).await?;
            let normalized = answer.trim().to_lowercase();
            if normalized.ends_with(&self.config.email_domain) {
                break normalized;
            }
            self.session.send(EMAIL_RETRY).await?;
        };

        let mut profile = MemberProfile {
            name,
            class_year,
            email,
            affiliation: None,
        };

        if profile.is_graduate(self.current_year) {
            profile.affiliation = loop {
                let answer = self.ask(AFFILIATION_PROMPT).await?;
                let trimmed = answer.trim();
                if trimmed.is_empty() {
                    self.session.send(AFFILIATION_RETRY).await?;
                    continue;
                }
                if trimmed.eq_ignore_ascii_case("no") {
                    break None;
                }
                break Some(trimmed.to_string());
            };
        }

        Ok(profile)
    }

    /// Sets the nickname and role, then tells the member how it went.
    pub async fn apply(&self, profile: &MemberProfile) -> Result<OnboardingOutcome, DialogueError> {
        let nickname = profile.presentation_name(self.current_year);
        let role = self.config.role_name.as_str();

        let grant = match self.session.set_presentation_name(&nickname).await {
            Ok(()) => self.session.grant_role(role).await,
            Err(err) => Err(err),
        };

        let outcome = match grant {
            Ok(RoleGrant::Granted) => {
                self.session
                    .send(&format!(
                        "Success! Your nickname has been changed to: {nickname} and you have been \
                         assigned the '{role}' role. Contact an admin if you want to change it."
                    ))
                    .await?;
                OnboardingOutcome::Completed { nickname }
            }
            Ok(RoleGrant::RoleMissing) => {
                self.session
                    .send(&format!(
                        "Nickname updated successfully to: {nickname} but the role '{role}' was not found."
                    ))
                    .await?;
                OnboardingOutcome::RoleMissing { nickname }
            }
            Err(err) => {
                tracing::warn!(target: "onboarding", error = %err, "failed to change nickname or assign role");
                self.session.send(APPLY_FAILED).await?;
                OnboardingOutcome::Failed { nickname }
            }
        };
        Ok(outcome)
    }

    async fn ask(&self, prompt: &str) -> Result<String, DialogueError> {
        self.session.send(prompt).await?;
        match self.session.next_reply(self.config.question_timeout).await {
            Some(reply) => Ok(reply),
            None => {
                if let Err(err) = self.session.send(TIMEOUT_NOTICE).await {
                    tracing::warn!(target: "onboarding", error = %err, "failed to send timeout notice");
                }
                Err(DialogueError::TimedOut)
            }
        }
    }
}
