use std::net::IpAddr;

use ipnet::IpNet;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Intake endpoint (spreadsheet-backed script). Optional at boot so the
    /// landing page can still be previewed; submission fails without it.
    pub script_url: Option<String>,
    pub script_response: ScriptResponseMode,
    pub max_body_size: usize,
    pub trusted_proxies: Vec<IpNet>,
    pub rate_limit: u32,
    pub rate_limit_window_secs: u64,
    pub log_level: String,
}

/// How to interpret a 2xx reply from the script endpoint.
///
/// The Apps Script deployment this was written against returns 200 with
/// `{"ok": false, "error": ...}` for application-level failures. Other
/// receivers signal failure purely via status code, so the boundary is
/// configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptResponseMode {
    /// A 2xx JSON body carrying `ok: false` counts as failure.
    OkField,
    /// Only the HTTP status code decides success.
    StatusOnly,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("WAITLISTER_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid WAITLISTER_HOST: {e}"))?;

        let port: u16 = env_or("WAITLISTER_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid WAITLISTER_PORT: {e}"))?;

        let script_url = std::env::var("WAITLISTER_SCRIPT_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let script_response = match env_or("WAITLISTER_SCRIPT_RESPONSE", "ok-field").as_str() {
            "status-only" => ScriptResponseMode::StatusOnly,
            "ok-field" => ScriptResponseMode::OkField,
            other => return Err(format!("Invalid WAITLISTER_SCRIPT_RESPONSE: {other}")),
        };

        // 10 MB resume plus multipart/base64 overhead
        let max_body_size: usize = env_or("WAITLISTER_MAX_BODY_SIZE", "15728640")
            .parse()
            .map_err(|e| format!("Invalid WAITLISTER_MAX_BODY_SIZE: {e}"))?;

        let trusted_proxies: Vec<IpNet> = env_or("WAITLISTER_TRUSTED_PROXIES", "")
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                s.trim()
                    .parse()
                    .map_err(|e| format!("Invalid WAITLISTER_TRUSTED_PROXIES entry '{s}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let rate_limit: u32 = env_or("WAITLISTER_RATE_LIMIT", "10")
            .parse()
            .map_err(|e| format!("Invalid WAITLISTER_RATE_LIMIT: {e}"))?;

        let rate_limit_window_secs: u64 = env_or("WAITLISTER_RATE_LIMIT_WINDOW_SECS", "60")
            .parse()
            .map_err(|e| format!("Invalid WAITLISTER_RATE_LIMIT_WINDOW_SECS: {e}"))?;

        let log_level = env_or("WAITLISTER_LOG_LEVEL", "info");

        Ok(Config {
            host,
            port,
            script_url,
            script_response,
            max_body_size,
            trusted_proxies,
            rate_limit,
            rate_limit_window_secs,
            log_level,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
