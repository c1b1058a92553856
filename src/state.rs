use std::sync::Arc;

use crate::config::Config;
use crate::rate_limit::SubmissionRateLimiter;
use crate::sheets::SheetsClient;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub sheets: SheetsClient,
    pub submission_limiter: SubmissionRateLimiter,
}
