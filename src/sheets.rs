use serde::Deserialize;

use crate::config::ScriptResponseMode;
use crate::record::SubmissionRecord;

/// Client for the spreadsheet-backed intake script. One best-effort POST per
/// submission; no retry, no queuing.
pub struct SheetsClient {
    client: reqwest::Client,
    script_url: Option<String>,
    response_mode: ScriptResponseMode,
}

#[derive(Debug)]
pub enum SheetsError {
    NotConfigured,
    Serialize(String),
    Transport(String),
    Status { code: u16, detail: Option<String> },
    Rejected(String),
}

impl std::fmt::Display for SheetsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetsError::NotConfigured => write!(f, "Intake endpoint not configured"),
            SheetsError::Serialize(msg) => write!(f, "Failed to encode submission: {msg}"),
            SheetsError::Transport(msg) => write!(f, "Submission request failed: {msg}"),
            SheetsError::Status { code, detail } => match detail {
                Some(detail) => write!(f, "Submission failed ({code}): {detail}"),
                None => write!(f, "Submission failed ({code})"),
            },
            SheetsError::Rejected(msg) => write!(f, "Submission failed: {msg}"),
        }
    }
}

/// What the script endpoint said. Apps Script deployments reply 200 with a
/// JSON body carrying `ok`/`error`; anything else is treated as opaque text.
#[derive(Debug, PartialEq)]
enum ScriptReply {
    Structured { ok: bool, error: Option<String> },
    Opaque(String),
}

fn decode_reply(raw: &str) -> ScriptReply {
    #[derive(Deserialize)]
    struct Shape {
        ok: Option<bool>,
        error: Option<String>,
    }

    match serde_json::from_str::<Shape>(raw) {
        Ok(Shape { ok: Some(ok), error }) => ScriptReply::Structured { ok, error },
        Ok(Shape { ok: None, error }) => match error {
            // No ok flag but an error field still carries useful detail
            Some(error) => ScriptReply::Structured { ok: true, error: Some(error) },
            None => ScriptReply::Opaque(raw.to_string()),
        },
        Err(_) => ScriptReply::Opaque(raw.to_string()),
    }
}

impl SheetsClient {
    pub fn new(script_url: Option<String>, response_mode: ScriptResponseMode) -> Self {
        if script_url.is_none() {
            tracing::warn!("WAITLISTER_SCRIPT_URL not set; submissions will fail");
        }
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build reqwest client"),
            script_url,
            response_mode,
        }
    }

    pub async fn submit(&self, record: &SubmissionRecord) -> Result<(), SheetsError> {
        let url = self.script_url.as_ref().ok_or(SheetsError::NotConfigured)?;

        let body =
            serde_json::to_string(record).map_err(|e| SheetsError::Serialize(e.to_string()))?;

        // Deliberately no Content-Type header: the script endpoint cannot
        // answer a CORS preflight, and a JSON content type would trigger one
        // for browser callers. Send the JSON as an opaque text body.
        let resp = self
            .client
            .post(url)
            .body(body)
            .send()
            .await
            .map_err(|e| SheetsError::Transport(e.to_string()))?;

        let status = resp.status();
        let raw = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            let detail = match decode_reply(&raw) {
                ScriptReply::Structured { error: Some(error), .. } => Some(error),
                ScriptReply::Structured { .. } => None,
                ScriptReply::Opaque(text) if !text.trim().is_empty() => {
                    Some(text.chars().take(1024).collect())
                }
                ScriptReply::Opaque(_) => None,
            };
            return Err(SheetsError::Status {
                code: status.as_u16(),
                detail,
            });
        }

        if self.response_mode == ScriptResponseMode::OkField {
            if let ScriptReply::Structured { ok: false, error } = decode_reply(&raw) {
                return Err(SheetsError::Rejected(
                    error.unwrap_or_else(|| "Unknown server error".to_string()),
                ));
            }
        }

        Ok(())
    }
}
