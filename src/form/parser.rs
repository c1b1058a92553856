use axum::http::HeaderMap;
use bytes::Bytes;
use serde_json::{Map, Value};

use super::resume::{ResumeError, ResumeFile};
use super::WaitlistForm;

/// What came out of the request body, before validation.
#[derive(Debug)]
pub struct ParsedSubmission {
    pub form: WaitlistForm,
    pub resume: Option<ResumeFile>,
    /// Hidden `website` field. Humans leave it empty.
    pub trap: Option<String>,
}

#[derive(Debug)]
pub enum ParseError {
    Body(String),
    Resume(ResumeError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Body(msg) => write!(f, "{msg}"),
            ParseError::Resume(err) => write!(f, "{err}"),
        }
    }
}

/// Decode a submission body. The page script sends JSON with the resume
/// pre-encoded as base64; the no-JS fallback posts multipart/form-data with
/// the resume as a file part.
pub async fn parse(headers: &HeaderMap, body: Bytes) -> Result<ParsedSubmission, ParseError> {
    let content_type = headers.get("content-type").and_then(|v| v.to_str().ok());

    if content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        parse_multipart(headers, body).await
    } else if content_type.is_some_and(|ct| ct.contains("application/x-www-form-urlencoded")) {
        parse_urlencoded(&body)
    } else {
        parse_json(&body)
    }
}

fn parse_json(body: &[u8]) -> Result<ParsedSubmission, ParseError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ParseError::Body(format!("Invalid JSON: {e}")))?;
    let Value::Object(mut obj) = value else {
        return Err(ParseError::Body("Expected a JSON object".to_string()));
    };

    let trap = take_string(&mut obj, "website");

    let file_name = take_string(&mut obj, "resumeFileName");
    let mime_type = take_string(&mut obj, "resumeMimeType");
    let encoded = take_string(&mut obj, "resumeBase64");

    let resume = match (file_name, encoded) {
        (Some(name), Some(data)) if !data.is_empty() => Some(
            ResumeFile::from_base64(
                name,
                mime_type.unwrap_or_else(|| "application/octet-stream".to_string()),
                &data,
            )
            .map_err(ParseError::Resume)?,
        ),
        _ => None,
    };

    let form = into_form(obj)?;
    Ok(ParsedSubmission { form, resume, trap })
}

/// Form posts without a file input arrive urlencoded.
fn parse_urlencoded(body: &[u8]) -> Result<ParsedSubmission, ParseError> {
    let body_str =
        std::str::from_utf8(body).map_err(|e| ParseError::Body(format!("Invalid UTF-8: {e}")))?;

    let mut obj = Map::new();
    for (k, v) in form_urlencoded::parse(body_str.as_bytes()) {
        obj.insert(k.into_owned(), Value::String(v.into_owned()));
    }

    let trap = take_string(&mut obj, "website");
    let form = into_form(obj)?;
    Ok(ParsedSubmission {
        form,
        resume: None,
        trap,
    })
}

/// Parse multipart form data using multer.
async fn parse_multipart(headers: &HeaderMap, body: Bytes) -> Result<ParsedSubmission, ParseError> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| ParseError::Body("Missing multipart boundary".to_string()))?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut obj = Map::new();
    let mut resume = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ParseError::Body(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("unknown").to_string();

        if name == "resume" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let mime_type = field
                .content_type()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ParseError::Body(format!("File read error: {e}")))?;

            // An empty file input still submits a nameless zero-byte part
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }

            resume = Some(
                ResumeFile::new(file_name, mime_type, bytes.to_vec())
                    .map_err(ParseError::Resume)?,
            );
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ParseError::Body(format!("Field read error: {e}")))?;
        obj.insert(name, Value::String(value));
    }

    let trap = take_string(&mut obj, "website");
    let form = into_form(obj)?;
    Ok(ParsedSubmission { form, resume, trap })
}

fn into_form(mut obj: Map<String, Value>) -> Result<WaitlistForm, ParseError> {
    // Checkboxes arrive as strings from HTML forms
    coerce_bool(&mut obj, "consent");
    coerce_bool(&mut obj, "feedback");

    serde_json::from_value(Value::Object(obj))
        .map_err(|e| ParseError::Body(format!("Invalid submission: {e}")))
}

fn take_string(obj: &mut Map<String, Value>, key: &str) -> Option<String> {
    match obj.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

fn coerce_bool(obj: &mut Map<String, Value>, key: &str) {
    if let Some(Value::String(s)) = obj.get(key) {
        let truthy = matches!(s.as_str(), "true" | "1" | "on" | "yes");
        obj.insert(key.to_string(), Value::Bool(truthy));
    }
}
