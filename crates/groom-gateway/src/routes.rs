//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use groom_auth::IdentityProvider;
use groom_control::RoomControl;

use crate::handlers::{auth, directory, health, rooms};
use crate::state::GatewayState;

/// Create the gateway router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /healthz` - Health check
/// - `GET /auth/login` - Start login
/// - `GET /auth/callback` - OAuth callback
/// - `GET /auth/logout` - Clear the session
///
/// ## Browser (session)
/// - `GET /` - Room directory
/// - `GET /:slug` - Redirect to the room's meeting
///
/// ## Rooms (API key)
/// - `GET /api/rooms` - List rooms
/// - `POST /api/rooms` - Create room
/// - `GET /api/rooms/:id` - Get room
/// - `PUT /api/rooms/:id` - Update room
/// - `DELETE /api/rooms/:id` - Delete room
pub fn create_router<C, P>(state: GatewayState<C, P>) -> Router
where
    C: RoomControl + 'static,
    P: IdentityProvider + 'static,
{
    // Extract config values before moving state
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout = state.config.request_timeout();
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(state.config.session_secure_cookie)
        .with_same_site(SameSite::Lax)
        .with_http_only(true);

    let state = Arc::new(state);

    Router::new()
        // Public
        .route("/healthz", get(health::health::<C, P>))
        .route("/auth/login", get(auth::login::<C, P>))
        .route("/auth/callback", get(auth::callback::<C, P>))
        .route("/auth/logout", get(auth::logout))
        // Rooms API
        .route(
            "/api/rooms",
            get(rooms::list_rooms::<C, P>).post(rooms::create_room::<C, P>),
        )
        .route(
            "/api/rooms/:id",
            get(rooms::get_room::<C, P>)
                .put(rooms::update_room::<C, P>)
                .delete(rooms::delete_room::<C, P>),
        )
        // Browser
        .route("/", get(directory::index::<C, P>))
        .route("/:slug", get(directory::redirect::<C, P>))
        // Middleware
        .layer(sessions)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // For specific origins, parse them
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use axum::body::Bytes;
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::{TestResponse, TestServer};
    use serde_json::{json, Value};

    use groom_auth::{IdentityGate, MockIdentityProvider};
    use groom_control::RoomService;
    use groom_meet::{DirectoryConfig, MeetDirectory, MockMeetApi};
    use groom_store::{MemoryStore as RoomStore, NewRoom, Store};

    use crate::config::GatewayConfig;

    const API_KEY: &str = "s3cret";

    struct Fixture {
        server: TestServer,
        store: Arc<RoomStore>,
        api: Arc<MockMeetApi>,
    }

    fn test_config() -> GatewayConfig {
        let env = HashMap::from([
            ("DATABASE_URL", "postgres://unused"),
            ("GOOGLE_WORKSPACE_DOMAIN", "example.com"),
            ("GOOGLE_CLIENT_ID", "client-id"),
            ("GOOGLE_CLIENT_SECRET", "client-secret"),
            ("GOOGLE_REDIRECT_URL", "http://localhost/auth/callback"),
            ("GOOGLE_SERVICE_ACCOUNT_IMPERSONATED_USER", "admin@example.com"),
            ("GROOM_API_KEY", API_KEY),
        ]);
        GatewayConfig::from_lookup(|name| env.get(name).map(|v| (*v).to_string())).unwrap()
    }

    fn fixture() -> Fixture {
        let store = Arc::new(RoomStore::new());
        let api = Arc::new(MockMeetApi::new());
        let directory = MeetDirectory::new(Arc::clone(&api), DirectoryConfig::default());
        let rooms = Arc::new(RoomService::new(Arc::clone(&store), directory));

        let provider = Arc::new(
            MockIdentityProvider::new()
                .with_user("good-code", "alice@example.com", Some("example.com"))
                .with_user("foreign-code", "mallory@other.org", Some("other.org")),
        );
        let gate = IdentityGate::new(provider, "example.com");

        let state = GatewayState::new(rooms, gate, test_config());
        let mut server = TestServer::new(create_router(state)).unwrap();
        server.do_save_cookies();

        Fixture { server, store, api }
    }

    fn api_key(value: &'static str) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static("x-api-key"),
            HeaderValue::from_static(value),
        )
    }

    fn location(response: &TestResponse) -> String {
        response
            .header("location")
            .to_str()
            .unwrap()
            .to_string()
    }

    /// Run the OAuth dance with `code` and return the callback response.
    async fn log_in(f: &Fixture, code: &str) -> TestResponse {
        let login = f.server.get("/auth/login").await;
        assert!(login.status_code().is_redirection());

        let consent = location(&login);
        assert!(consent.starts_with("https://accounts.test/auth"));
        let state = consent.split("state=").nth(1).unwrap().to_string();

        f.server
            .get(&format!("/auth/callback?code={code}&state={state}"))
            .await
    }

    // =========================================================================
    // API key guard
    // =========================================================================

    #[tokio::test]
    async fn api_rejects_missing_key() {
        let f = fixture();

        let response = f.server.get("/api/rooms").await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn api_rejects_wrong_key() {
        let f = fixture();
        let (name, value) = api_key("wrong");

        let response = f.server.get("/api/rooms").add_header(name, value).await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn api_room_lifecycle() {
        let f = fixture();

        let (name, value) = api_key(API_KEY);
        let created = f
            .server
            .post("/api/rooms")
            .add_header(name, value)
            .json(&json!({ "slug": "standup" }))
            .await;
        assert_eq!(created.status_code(), StatusCode::CREATED);
        let room: Value = created.json();
        assert_eq!(room["slug"], "standup");
        assert_eq!(room["space_id"], "spaces/mock-1");
        let id = room["id"].as_i64().unwrap();

        let (name, value) = api_key(API_KEY);
        let listed: Value = f.server.get("/api/rooms").add_header(name, value).await.json();
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let (name, value) = api_key(API_KEY);
        let updated = f
            .server
            .put(&format!("/api/rooms/{id}"))
            .add_header(name, value)
            .json(&json!({ "space_id": "spaces/other" }))
            .await;
        assert_eq!(updated.status_code(), StatusCode::OK);
        let room: Value = updated.json();
        assert_eq!(room["space_id"], "spaces/other");

        let (name, value) = api_key(API_KEY);
        let deleted = f
            .server
            .delete(&format!("/api/rooms/{id}"))
            .add_header(name, value)
            .await;
        assert_eq!(deleted.status_code(), StatusCode::NO_CONTENT);

        let (name, value) = api_key(API_KEY);
        let missing = f
            .server
            .get(&format!("/api/rooms/{id}"))
            .add_header(name, value)
            .await;
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
        let body: Value = missing.json();
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn api_rejects_duplicate_slug() {
        let f = fixture();
        f.store
            .insert_room(NewRoom::new("standup", "spaces/abc"))
            .await
            .unwrap();

        let (name, value) = api_key(API_KEY);
        let response = f
            .server
            .post("/api/rooms")
            .add_header(name, value)
            .json(&json!({ "slug": "standup" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::CONFLICT);
        assert_eq!(f.api.create_space_calls(), 0);
    }

    #[tokio::test]
    async fn api_rejects_invalid_slug_and_id() {
        let f = fixture();

        let (name, value) = api_key(API_KEY);
        let response = f
            .server
            .post("/api/rooms")
            .add_header(name, value)
            .json(&json!({ "slug": "not a slug" }))
            .await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let (name, value) = api_key(API_KEY);
        let response = f.server.get("/api/rooms/abc").add_header(name, value).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn api_rejects_malformed_bodies() {
        let f = fixture();

        let (name, value) = api_key(API_KEY);
        let missing_field = f
            .server
            .post("/api/rooms")
            .add_header(name, value)
            .json(&json!({}))
            .await;
        assert_eq!(missing_field.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = missing_field.json();
        assert_eq!(body["error"]["code"], "bad_request");

        let (name, value) = api_key(API_KEY);
        let not_json = f
            .server
            .post("/api/rooms")
            .add_header(name, value)
            .content_type("application/json")
            .bytes(Bytes::from_static(b"{not json"))
            .await;
        assert_eq!(not_json.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = not_json.json();
        assert_eq!(body["error"]["code"], "bad_request");

        let (name, value) = api_key(API_KEY);
        let plain_text = f
            .server
            .post("/api/rooms")
            .add_header(name, value)
            .text("slug=standup")
            .await;
        assert_eq!(plain_text.status_code(), StatusCode::BAD_REQUEST);
        let body: Value = plain_text.json();
        assert_eq!(body["error"]["code"], "bad_request");

        let (name, value) = api_key(API_KEY);
        let bad_update = f
            .server
            .put("/api/rooms/1")
            .add_header(name, value)
            .json(&json!({ "slug": "standup" }))
            .await;
        assert_eq!(bad_update.status_code(), StatusCode::BAD_REQUEST);

        assert_eq!(f.api.create_space_calls(), 0);
    }

    // =========================================================================
    // Browser flow
    // =========================================================================

    #[tokio::test]
    async fn anonymous_slug_request_redirects_to_login() {
        let f = fixture();

        let response = f.server.get("/standup").await;

        assert!(response.status_code().is_redirection());
        assert_eq!(location(&response), "/auth/login");
    }

    #[tokio::test]
    async fn login_returns_to_requested_slug() {
        let f = fixture();
        f.api.add_space_with_code("spaces/abc", "abc-defg-hij");
        f.store
            .insert_room(NewRoom::new("standup", "spaces/abc"))
            .await
            .unwrap();

        let first = f.server.get("/standup").await;
        assert_eq!(location(&first), "/auth/login");

        let callback = log_in(&f, "good-code").await;
        assert!(callback.status_code().is_redirection());
        assert_eq!(location(&callback), "/standup");

        let response = f.server.get("/standup").await;
        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(location(&response), "https://meet.google.com/abc-defg-hij");
    }

    #[tokio::test]
    async fn asset_requests_keep_pending_redirect() {
        let f = fixture();
        f.api.add_space_with_code("spaces/abc", "abc-defg-hij");
        f.store
            .insert_room(NewRoom::new("standup", "spaces/abc"))
            .await
            .unwrap();

        let first = f.server.get("/standup").await;
        assert_eq!(location(&first), "/auth/login");
        let favicon = f.server.get("/favicon.ico").await;
        assert_eq!(location(&favicon), "/auth/login");

        let callback = log_in(&f, "good-code").await;
        assert_eq!(location(&callback), "/standup");
    }

    #[tokio::test]
    async fn legacy_room_redirects_without_provider_lookup() {
        let f = fixture();
        f.store
            .insert_room(NewRoom::new("retro", "xyz-abcd-efg"))
            .await
            .unwrap();
        let _login = log_in(&f, "good-code").await;

        let response = f.server.get("/retro").await;

        assert_eq!(response.status_code(), StatusCode::FOUND);
        assert_eq!(location(&response), "https://meet.google.com/xyz-abcd-efg");
        assert_eq!(f.api.get_space_calls(), 0);
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let f = fixture();
        let _login = log_in(&f, "good-code").await;

        let response = f.server.get("/nowhere").await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn foreign_domain_gets_no_session() {
        let f = fixture();

        let callback = log_in(&f, "foreign-code").await;
        assert_eq!(callback.status_code(), StatusCode::UNAUTHORIZED);
        let body: Value = callback.json();
        assert_eq!(body["error"]["code"], "unauthorized_domain");

        let response = f.server.get("/").await;
        assert_eq!(location(&response), "/auth/login");
    }

    #[tokio::test]
    async fn callback_rejects_forged_state() {
        let f = fixture();
        let _login = f.server.get("/auth/login").await;

        let response = f
            .server
            .get("/auth/callback?code=good-code&state=forged")
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn index_shows_occupancy() {
        let f = fixture();
        f.store
            .insert_room(NewRoom::new("standup", "spaces/1"))
            .await
            .unwrap();
        f.store
            .insert_room(NewRoom::new("retro", "spaces/2"))
            .await
            .unwrap();
        f.api.start_conference("spaces/1", 2);
        let _login = log_in(&f, "good-code").await;

        let response = f.server.get("/").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let page = response.text();
        assert!(page.contains("alice@example.com"));
        assert!(page.contains("<strong>standup</strong></a>: occupied, 2 connected"));
        assert!(page.contains("<strong>retro</strong></a>: free"));
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let f = fixture();
        let _login = log_in(&f, "good-code").await;

        let logout = f.server.get("/auth/logout").await;
        assert_eq!(location(&logout), "/");

        let response = f.server.get("/").await;
        assert_eq!(location(&response), "/auth/login");
    }

    // =========================================================================
    // Health
    // =========================================================================

    #[tokio::test]
    async fn healthz_reports_dependencies() {
        let f = fixture();

        let healthy = f.server.get("/healthz").await;
        assert_eq!(healthy.status_code(), StatusCode::OK);

        f.api.set_unavailable(true);
        let unhealthy = f.server.get("/healthz").await;
        assert_eq!(unhealthy.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = unhealthy.json();
        assert_eq!(body["database"], true);
        assert_eq!(body["provider"], false);
    }

    #[test]
    fn cors_specific_origins() {
        let origins = vec![
            "http://localhost:3000".to_string(),
            "https://app.example.com".to_string(),
        ];
        let _layer = build_cors_layer(&origins);
    }
}
