/// Answers collected during onboarding. Lives only for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberProfile {
    pub name: String,
    pub class_year: i32,
    pub email: String,
    pub affiliation: Option<String>,
}

impl MemberProfile {
    pub fn is_graduate(&self, current_year: i32) -> bool {
        self.class_year < current_year
    }

    /// `"{name} - {year}"`, plus `" - {affiliation}"` for graduates who gave one.
    pub fn presentation_name(&self, current_year: i32) -> String {
        let base = format!("{} - {}", self.name, self.class_year);
        match &self.affiliation {
            Some(affiliation) if self.is_graduate(current_year) => {
                format!("{base} - {affiliation}")
            }
            _ => base,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(year: i32, affiliation: Option<&str>) -> MemberProfile {
        MemberProfile {
            name: "Jane Doe".into(),
            class_year: year,
            email: "doe_j1@denison.edu".into(),
            affiliation: affiliation.map(str::to_string),
        }
    }

    #[test]
    fn graduate_with_affiliation() {
        assert_eq!(
            profile(2023, Some("Google")).presentation_name(2025),
            "Jane Doe - 2023 - Google"
        );
    }

    #[test]
    fn affiliation_ignored_for_current_students() {
        assert_eq!(profile(2027, Some("Google")).presentation_name(2025), "Jane Doe - 2027");
        assert_eq!(profile(2025, Some("Google")).presentation_name(2025), "Jane Doe - 2025");
    }
}
