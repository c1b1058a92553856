use serde::Serialize;

use crate::form::resume::ResumeFile;
use crate::form::ValidForm;

/// The validated, serializable representation of one applicant's entry.
/// Built once at submit time, sent once, discarded. Field names match the
/// intake script's expected wire format; absent optionals are omitted from
/// the JSON rather than sent as null.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub full_name: String,
    pub email: String,
    pub linkedin_link: String,
    pub years_of_experience: String,
    pub expertise_areas: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_company: Option<String>,
    pub consent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_base64: Option<String>,
}

impl SubmissionRecord {
    pub fn new(form: ValidForm, resume: Option<&ResumeFile>) -> Self {
        Self {
            full_name: form.full_name,
            email: form.email,
            linkedin_link: form.linkedin_link,
            years_of_experience: form.years_of_experience,
            expertise_areas: form.expertise_areas,
            phone_number: form.phone_number,
            current_role: form.current_role,
            current_company: form.current_company,
            consent: form.consent,
            feedback: form.feedback,
            resume_file_name: resume.map(|r| r.file_name.clone()),
            resume_mime_type: resume.map(|r| r.mime_type.clone()),
            resume_base64: resume.map(ResumeFile::to_base64),
        }
    }
}
