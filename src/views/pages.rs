use askama::Template;
use axum::response::{Html, IntoResponse};

use crate::form::resume::MAX_RESUME_BYTES;

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    max_resume_bytes: usize,
}

#[derive(Template)]
#[template(path = "thanks.html")]
struct ThanksTemplate {}

pub async fn landing() -> impl IntoResponse {
    let template = IndexTemplate {
        max_resume_bytes: MAX_RESUME_BYTES,
    };
    Html(template.render().unwrap_or_default())
}

/// Terminal "submitted" page for the no-JS form flow. One-way; there is no
/// edit-after-submit path.
pub async fn thanks() -> impl IntoResponse {
    let template = ThanksTemplate {};
    Html(template.render().unwrap_or_default())
}
