#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use timetable_sync::components::auth::{Credentials, Provider};
use timetable_sync::components::session::{InMemorySessionStore, Session, SessionSigner, SessionStore};
use timetable_sync::config::{Config, GoogleConfig, MicrosoftConfig, PortalConfig};
use timetable_sync::web::{router, AppState};
use tower::ServiceExt;
use wiremock::MockServer;

pub const SESSION_SECRET: &str = "test-secret";
pub const PORTAL_COOKIE: &str = "ASP.NET_SessionId=test-session";
pub const PORTAL_PATH: &str = "/Home/Schedules";
pub const EVENTS_PATH: &str = "/calendar/v3/calendars/primary/events";
pub const TENANT: &str = "tenant-1";

/// App wired against a mock server standing in for the portal and the providers
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemorySessionStore>,
    pub server: MockServer,
}

pub fn test_config(base: &str) -> Config {
    Config {
        bind_address: "127.0.0.1".parse().unwrap(),
        port: 0,
        session_secret: SESSION_SECRET.to_string(),
        session_ttl_minutes: 60,
        session_cookie_secure: false,
        redis_url: None,
        locale: "en".to_string(),
        public_dir: "public".to_string(),
        google: GoogleConfig {
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
            redirect_uri: "http://localhost:3000/auth/google/callback".to_string(),
            auth_url: format!("{}/o/oauth2/v2/auth", base),
            token_url: format!("{}/token", base),
            calendar_api_url: format!("{}/calendar/v3", base),
            calendar_id: "primary".to_string(),
        },
        microsoft: None,
        portal: PortalConfig {
            schedule_url: format!("{}{}", base, PORTAL_PATH),
            user_agent: "Mozilla/5.0".to_string(),
            session_cookie: PORTAL_COOKIE.to_string(),
        },
    }
}

pub fn microsoft_config(base: &str) -> MicrosoftConfig {
    MicrosoftConfig {
        tenant_id: TENANT.to_string(),
        client_id: "ms-client".to_string(),
        client_secret: "ms-secret".to_string(),
        redirect_uri: "http://localhost:3000/auth/microsoft/callback".to_string(),
        authority: base.to_string(),
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_, _| {}).await
}

/// `configure` receives the config and the mock server's base URL
pub async fn spawn_app_with(configure: impl FnOnce(&mut Config, &str)) -> TestApp {
    spawn_app_with_store(configure, InMemorySessionStore::new(60)).await
}

pub async fn spawn_app_with_store(
    configure: impl FnOnce(&mut Config, &str),
    store: InMemorySessionStore,
) -> TestApp {
    let server = MockServer::start().await;
    let base = server.uri();
    let mut config = test_config(&base);
    configure(&mut config, &base);

    let store = Arc::new(store);
    let state = AppState::new(config, store.clone()).unwrap();

    TestApp {
        router: router(state),
        store,
        server,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        self.send("GET", uri, cookie).await
    }

    pub async fn send(&self, method: &str, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Store a signed-in session directly and return its cookie header value
    pub async fn signed_in(&self, credentials: Credentials) -> (String, String) {
        let mut session = Session::new();
        session.authenticate(credentials);
        self.store.save(&session).await.unwrap();
        let value = SessionSigner::new(SESSION_SECRET, 60).sign(&session.id).unwrap();
        (session.id, format!("sid={}", value))
    }

    /// Requests the mock server received on `path`
    pub async fn requests_to(&self, path: &str) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == path)
            .collect()
    }
}

pub fn google_credentials(access_token: &str) -> Credentials {
    Credentials {
        provider: Provider::Google,
        access_token: access_token.to_string(),
        refresh_token: Some("refresh-token".to_string()),
        expires_at: Some(chrono::Utc::now().timestamp() + 3600),
        profile: None,
    }
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// `sid=...` pair from the Set-Cookie header, if any
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("sid="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Portal page with one table row per `(date, time, subject, location)`
pub fn portal_page(rows: &[(&str, &str, &str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .map(|(date, time, subject, location)| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                date, time, subject, location
            )
        })
        .collect();

    format!(
        r#"<html><body><div id="divThoiKhoaBieu"><table class="MainTb">
        <tr><th>Ngày</th><th>Giờ</th><th>Môn</th><th>Phòng</th></tr>{}
        </table></div></body></html>"#,
        rows
    )
}

pub fn json_body(request: &wiremock::Request) -> serde_json::Value {
    serde_json::from_slice(&request.body).unwrap()
}
