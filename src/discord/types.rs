use std::sync::Arc;

use crate::{
    config::AppConfig,
    infrastructure::clock::{self, Clock},
};

pub struct GreeterState {
    pub config: Arc<AppConfig>,
    pub clock: Arc<dyn Clock>,
}

impl GreeterState {
    pub fn current_year(&self) -> i32 {
        clock::current_year(self.clock.as_ref(), self.config.tz())
    }

    pub fn monitored_channels(&self) -> &[String] {
        &self.config.onboarding.process_channels
    }
}
