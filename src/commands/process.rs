use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;

static PROCESS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^!process\s+(.+?)\s+(apply|phone|OA|1st round|2nd round|final|offer|rejected|ghost)(?:\s+\((.+)\))?$",
    )
    .expect("valid process regex")
});

/// Stage a member reports for an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    Apply,
    Phone,
    OnlineAssessment,
    FirstRound,
    SecondRound,
    Final,
    Offer,
    Rejected,
    Ghost,
}

impl ProcessStatus {
    pub const USAGE: &'static str =
        "apply|OA|phone|1st round|2nd round|final|offer|rejected|ghost";
}

impl FromStr for ProcessStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "apply" => Ok(Self::Apply),
            "phone" => Ok(Self::Phone),
            "oa" => Ok(Self::OnlineAssessment),
            "1st round" => Ok(Self::FirstRound),
            "2nd round" => Ok(Self::SecondRound),
            "final" => Ok(Self::Final),
            "offer" => Ok(Self::Offer),
            "rejected" => Ok(Self::Rejected),
            "ghost" => Ok(Self::Ghost),
            _ => Err(()),
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Apply => "apply",
            Self::Phone => "phone",
            Self::OnlineAssessment => "OA",
            Self::FirstRound => "1st round",
            Self::SecondRound => "2nd round",
            Self::Final => "final",
            Self::Offer => "offer",
            Self::Rejected => "rejected",
            Self::Ghost => "ghost",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessUpdate {
    pub company: String,
    pub status: ProcessStatus,
    pub note: Option<String>,
}

pub fn parse_process_update(content: &str) -> Option<ProcessUpdate> {
    let captures = PROCESS_REGEX.captures(content)?;
    let status = captures.get(2)?.as_str().parse().ok()?;
    Some(ProcessUpdate {
        company: captures.get(1)?.as_str().to_string(),
        status,
        note: captures.get(3).map(|m| m.as_str().to_string()),
    })
}

pub fn usage_hint(author_id: u64) -> String {
    format!(
        "<@{author_id}>, please follow the format: \"!process {{company name}} {{{}}}\"",
        ProcessStatus::USAGE
    )
}
