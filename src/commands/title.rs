use thiserror::Error;

const COMMAND: &str = "!update-title";
const SEPARATOR: &str = " - ";

/// Why a title update was refused. The message is shown to the member.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TitleUpdateError {
    #[error("Unable to determine your name from your profile.")]
    NoName,
    #[error("Couldn't determine your graduation year.")]
    NoYear,
    #[error("This command is only available to graduates or those graduating this year.")]
    NotGraduated,
}

/// Affiliation text following `!update-title`, or `None` when the message is
/// not that command.
pub fn parse_update_title(content: &str) -> Option<String> {
    let prefix = content.get(..COMMAND.len())?;
    if !prefix.eq_ignore_ascii_case(COMMAND) {
        return None;
    }
    let affiliation = match content.split_once(' ') {
        Some((_, rest)) => rest.trim().to_string(),
        None => String::new(),
    };
    Some(affiliation)
}

/// Rewrites `"{name} - {year}[ - {old}]"` with a new affiliation; an empty
/// affiliation drops the suffix.
pub fn rebuild_presentation_name(
    current: &str,
    affiliation: &str,
    current_year: i32,
) -> Result<String, TitleUpdateError> {
    let parts: Vec<&str> = current.split(SEPARATOR).collect();
    if parts.len() < 2 {
        return Err(TitleUpdateError::NoName);
    }
    let year: i32 = parts[1]
        .trim()
        .parse()
        .map_err(|_| TitleUpdateError::NoYear)?;
    if year > current_year {
        return Err(TitleUpdateError::NotGraduated);
    }

    let mut name = format!("{}{SEPARATOR}{year}", parts[0].trim());
    if !affiliation.is_empty() {
        name.push_str(SEPARATOR);
        name.push_str(affiliation);
    }
    Ok(name)
}
