use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::json;

use crate::error::AppError;
use crate::form::parser::{self, ParseError};
use crate::form::{honeypot, FieldError};
use crate::metadata;
use crate::record::SubmissionRecord;
use crate::state::SharedState;

/// Accept one waitlist submission: parse, validate, build the record, hand
/// it to the sheets client, report the outcome. One attempt per request.
pub async fn submit(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let ip = metadata::client_ip(&headers, Some(addr.ip()), &state.config.trusted_proxies);

    if let Err(retry_after) = state.submission_limiter.check(
        ip,
        state.config.rate_limit,
        state.config.rate_limit_window_secs,
    ) {
        return Err(AppError::RateLimited(format!(
            "Too many submissions. Retry after {retry_after}s"
        )));
    }

    // No-JS fallback posts the raw HTML form; it gets a redirect on success
    let form_post = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("form"));

    let parsed = parser::parse(&headers, body).await.map_err(|e| match e {
        ParseError::Body(msg) => AppError::BadRequest(msg),
        ParseError::Resume(err) => {
            AppError::Validation(vec![FieldError::new("resume", err.to_string())])
        }
    })?;

    if honeypot::is_spam(parsed.trap.as_deref()) {
        // Silent accept; nothing is forwarded
        tracing::debug!("Honeypot tripped from {ip}");
        return Ok(accepted(form_post));
    }

    let valid = parsed.form.validate().map_err(AppError::Validation)?;
    let record = SubmissionRecord::new(valid, parsed.resume.as_ref());

    state.sheets.submit(&record).await?;

    tracing::info!(
        "Waitlist submission forwarded (resume: {})",
        record.resume_file_name.as_deref().unwrap_or("none")
    );

    Ok(accepted(form_post))
}

fn accepted(form_post: bool) -> Response {
    if form_post {
        Redirect::to("/thanks").into_response()
    } else {
        (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
    }
}
