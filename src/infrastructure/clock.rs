use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Calendar year as seen in `tz`; graduation checks compare against this.
pub fn current_year(clock: &dyn Clock, tz: Tz) -> i32 {
    clock.now().with_timezone(&tz).year()
}
