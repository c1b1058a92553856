use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use reqwest::Client;
use serde_json::{json, Value};

use waitlister::config::{Config, ScriptResponseMode};

/// In-process stand-in for the spreadsheet-backed script endpoint. Records
/// every request body and serves a configurable response.
pub struct ScriptStub {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
    response: Arc<Mutex<(u16, String)>>,
}

type StubState = (Arc<Mutex<Vec<String>>>, Arc<Mutex<(u16, String)>>);

async fn stub_handler(
    State((requests, response)): State<StubState>,
    body: String,
) -> (StatusCode, String) {
    requests.lock().unwrap().push(body);
    let (status, body) = response.lock().unwrap().clone();
    (StatusCode::from_u16(status).unwrap_or(StatusCode::OK), body)
}

impl ScriptStub {
    pub async fn spawn() -> Self {
        let requests: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let response = Arc::new(Mutex::new((200, r#"{"ok": true}"#.to_string())));

        let app = Router::new()
            .route("/intake", post(stub_handler))
            .with_state((requests.clone(), response.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Stub failed");
        });

        Self {
            addr,
            requests,
            response,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/intake", self.addr)
    }

    pub fn respond_with(&self, status: u16, body: &str) {
        *self.response.lock().unwrap() = (status, body.to_string());
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Last received body, parsed as JSON.
    pub fn last_request(&self) -> Option<Value> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }
}

/// A running test server instance wired to a fresh script stub.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub stub: ScriptStub,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Submit JSON to the waitlist endpoint, return (body, status).
    pub async fn submit_json(&self, data: &Value) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/api/v1/waitlist"))
            .header("content-type", "application/json")
            .body(data.to_string())
            .send()
            .await
            .expect("submit json failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// Submit a hand-built multipart body (the no-JS form path).
    pub async fn submit_multipart(
        &self,
        fields: &[(&str, &str)],
        file: Option<(&str, &str, &[u8])>,
    ) -> reqwest::Response {
        let (content_type, body) = multipart_body(fields, file);
        self.client
            .post(self.url("/api/v1/waitlist"))
            .header("content-type", content_type)
            .body(body)
            .send()
            .await
            .expect("submit multipart failed")
    }
}

const BOUNDARY: &str = "----waitlister-test-boundary";

pub fn multipart_body(
    fields: &[(&str, &str)],
    file: Option<(&str, &str, &[u8])>,
) -> (String, Vec<u8>) {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\ncontent-disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, mime, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\ncontent-disposition: form-data; name=\"resume\"; filename=\"{file_name}\"\r\ncontent-type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (
        format!("multipart/form-data; boundary={BOUNDARY}"),
        body,
    )
}

/// Spawn the app against a fresh stub with default test config.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn the app, letting the caller tweak the config first.
pub async fn spawn_app_with(tweak: impl FnOnce(&mut Config)) -> TestApp {
    let stub = ScriptStub::spawn().await;

    let mut config = Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        script_url: Some(stub.url()),
        script_response: ScriptResponseMode::OkField,
        max_body_size: 15 * 1024 * 1024,
        trusted_proxies: vec![],
        rate_limit: 1000,
        rate_limit_window_secs: 60,
        log_level: "warn".to_string(),
    };
    tweak(&mut config);

    let (app, _state) = waitlister::build_app(config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp { addr, client, stub }
}

/// A submission that passes every validation rule.
pub fn valid_payload() -> Value {
    json!({
        "fullName": "Jane Doe",
        "email": "jane@example.com",
        "linkedinLink": "https://linkedin.com/in/janedoe",
        "yearsOfExperience": "5-7 years",
        "expertiseAreas": "Fintech, AI Safety",
        "consent": true,
    })
}
