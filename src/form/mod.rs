pub mod honeypot;
pub mod parser;
pub mod resume;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// One violated constraint, reported under the wire-format field name.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Raw form fields as decoded from the request body, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WaitlistForm {
    pub full_name: String,
    pub email: String,
    pub linkedin_link: String,
    pub years_of_experience: String,
    pub expertise_areas: String,
    pub phone_number: Option<String>,
    pub current_role: Option<String>,
    pub current_company: Option<String>,
    pub consent: bool,
    pub feedback: Option<bool>,
}

/// A form that passed validation: strings trimmed, empty optionals dropped.
#[derive(Debug, Clone)]
pub struct ValidForm {
    pub full_name: String,
    pub email: String,
    pub linkedin_link: String,
    pub years_of_experience: String,
    pub expertise_areas: String,
    pub phone_number: Option<String>,
    pub current_role: Option<String>,
    pub current_company: Option<String>,
    pub consent: bool,
    pub feedback: Option<bool>,
}

impl WaitlistForm {
    /// Check every field and report all violations, not just the first.
    pub fn validate(&self) -> Result<ValidForm, Vec<FieldError>> {
        let mut errors = Vec::new();

        let full_name = self.full_name.trim();
        if full_name.chars().count() < 2 {
            errors.push(FieldError::new(
                "fullName",
                "Name must be at least 2 characters",
            ));
        } else if full_name.chars().count() > 100 {
            errors.push(FieldError::new(
                "fullName",
                "Name must be at most 100 characters",
            ));
        }

        let email = self.email.trim();
        if email.len() > 255 {
            errors.push(FieldError::new(
                "email",
                "Email must be at most 255 characters",
            ));
        } else if !EMAIL_RE.is_match(email) {
            errors.push(FieldError::new("email", "Invalid email address"));
        }

        let linkedin_link = self.linkedin_link.trim();
        if linkedin_link.len() > 500 || !is_http_url(linkedin_link) {
            errors.push(FieldError::new(
                "linkedinLink",
                "Please enter a valid LinkedIn URL",
            ));
        }

        let years_of_experience = self.years_of_experience.trim();
        if years_of_experience.is_empty() {
            errors.push(FieldError::new(
                "yearsOfExperience",
                "Please specify years of experience",
            ));
        } else if years_of_experience.chars().count() > 50 {
            errors.push(FieldError::new(
                "yearsOfExperience",
                "Years of experience must be at most 50 characters",
            ));
        }

        let expertise_areas = self.expertise_areas.trim();
        if expertise_areas.chars().count() < 2 {
            errors.push(FieldError::new(
                "expertiseAreas",
                "Please specify at least one area",
            ));
        } else if expertise_areas.chars().count() > 500 {
            errors.push(FieldError::new(
                "expertiseAreas",
                "Expertise areas must be at most 500 characters",
            ));
        }

        let phone_number = optional(&self.phone_number);
        if let Some(phone) = &phone_number {
            if phone.chars().count() > 20 {
                errors.push(FieldError::new(
                    "phoneNumber",
                    "Phone number must be at most 20 characters",
                ));
            }
        }

        let current_role = optional(&self.current_role);
        if let Some(role) = &current_role {
            if role.chars().count() > 100 {
                errors.push(FieldError::new(
                    "currentRole",
                    "Role must be at most 100 characters",
                ));
            }
        }

        let current_company = optional(&self.current_company);
        if let Some(company) = &current_company {
            if company.chars().count() > 100 {
                errors.push(FieldError::new(
                    "currentCompany",
                    "Company must be at most 100 characters",
                ));
            }
        }

        // The consent gate is independent of every other field.
        if !self.consent {
            errors.push(FieldError::new(
                "consent",
                "You must consent to being contacted",
            ));
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidForm {
            full_name: full_name.to_string(),
            email: email.to_string(),
            linkedin_link: linkedin_link.to_string(),
            years_of_experience: years_of_experience.to_string(),
            expertise_areas: expertise_areas.to_string(),
            phone_number,
            current_role,
            current_company,
            consent: self.consent,
            feedback: self.feedback,
        })
    }
}

fn is_http_url(s: &str) -> bool {
    match Url::parse(s) {
        Ok(url) => matches!(url.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> WaitlistForm {
        WaitlistForm {
            full_name: "Jane Doe".into(),
            email: "jane@example.com".into(),
            linkedin_link: "https://linkedin.com/in/janedoe".into(),
            years_of_experience: "5-7 years".into(),
            expertise_areas: "Fintech, AI Safety".into(),
            consent: true,
            ..WaitlistForm::default()
        }
    }

    fn field_names(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn valid_form_passes_and_trims() {
        let mut form = filled();
        form.full_name = "  Jane Doe  ".into();
        form.phone_number = Some("   ".into());

        let valid = form.validate().unwrap();
        assert_eq!(valid.full_name, "Jane Doe");
        assert_eq!(valid.phone_number, None);
    }

    #[test]
    fn short_name_rejected() {
        let mut form = filled();
        form.full_name = "J".into();

        let errors = form.validate().unwrap_err();
        assert_eq!(field_names(&errors), vec!["fullName"]);
    }

    #[test]
    fn email_without_at_rejected() {
        let mut form = filled();
        form.email = "jane.example.com".into();

        let errors = form.validate().unwrap_err();
        assert_eq!(field_names(&errors), vec!["email"]);
        assert_eq!(errors[0].message, "Invalid email address");
    }

    #[test]
    fn malformed_url_rejected() {
        let mut form = filled();
        form.linkedin_link = "not a url".into();
        assert_eq!(field_names(&form.validate().unwrap_err()), vec!["linkedinLink"]);

        // Parseable but wrong scheme
        form.linkedin_link = "ftp://linkedin.com/in/janedoe".into();
        assert_eq!(field_names(&form.validate().unwrap_err()), vec!["linkedinLink"]);
    }

    #[test]
    fn consent_gate_is_independent() {
        let mut form = filled();
        form.consent = false;

        let errors = form.validate().unwrap_err();
        assert_eq!(field_names(&errors), vec!["consent"]);
    }

    #[test]
    fn all_violations_reported_together() {
        let form = WaitlistForm::default();
        let errors = form.validate().unwrap_err();

        let names = field_names(&errors);
        for expected in [
            "fullName",
            "email",
            "linkedinLink",
            "yearsOfExperience",
            "expertiseAreas",
            "consent",
        ] {
            assert!(names.contains(&expected), "missing {expected}: {names:?}");
        }
    }

    #[test]
    fn over_limit_optional_rejected() {
        let mut form = filled();
        form.phone_number = Some("0".repeat(21));

        let errors = form.validate().unwrap_err();
        assert_eq!(field_names(&errors), vec!["phoneNumber"]);
    }
}
