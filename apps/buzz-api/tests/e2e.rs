use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum_extra::extract::cookie::Key;
use buzz_api::{AppState, HttpSettings, build_router};
use buzz_auth::{AuthError, AuthService, GoogleProfile, IdentityProvider, JwtManager, SessionManager};
use buzz_media::InMemoryMediaStore;
use buzz_profile::ProfileService;
use buzz_storage::{InMemoryProfileStore, InMemorySessionStore, InMemoryUserStore};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const BOUNDARY: &str = "buzz-test-boundary";

struct FakeGoogle;

#[async_trait]
impl IdentityProvider for FakeGoogle {
    fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        Ok(format!("https://accounts.example/auth?state={state}"))
    }

    async fn fetch_profile(&self, code: &str) -> Result<GoogleProfile, AuthError> {
        if code != "good-code" {
            return Err(AuthError::Provider("invalid_grant".to_string()));
        }
        Ok(GoogleProfile {
            id: "google-123".to_string(),
            email: Some("Grace@Example.com".to_string()),
            name: Some("Grace Hopper".to_string()),
        })
    }
}

fn app_with_media(media: Arc<InMemoryMediaStore>) -> Router {
    let jwt = JwtManager::new(
        "access-secret".to_string(),
        900,
        "refresh-secret".to_string(),
        86_400,
    );
    let state = AppState {
        auth: Arc::new(AuthService::new(Arc::new(InMemoryUserStore::new()), jwt)),
        sessions: Arc::new(SessionManager::new(
            Arc::new(InMemorySessionStore::new()),
            3600,
        )),
        profiles: Arc::new(ProfileService::new(
            Arc::new(InMemoryProfileStore::new()),
            media,
        )),
        identity: Arc::new(FakeGoogle),
        cookie_key: Key::derive_from(b"0123456789abcdef0123456789abcdef-test"),
    };
    let settings = HttpSettings {
        cors_origin: None,
        upload_max_bytes: 1024 * 1024,
    };
    build_router(state, &settings)
}

fn app() -> Router {
    app_with_media(Arc::new(InMemoryMediaStore::new()))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(req).await.expect("response");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, headers, body)
}

fn json_request(method: &str, uri: &str, body: &Value, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

/// 从 Set-Cookie 中取出 `name=value` 片段
fn set_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| {
            pair.split_once('=')
                .is_some_and(|(key, value)| key == name && !value.is_empty())
        })
        .map(str::to_string)
}

/// 是否下发了清除该 cookie 的 Set-Cookie
fn cleared_cookie(headers: &HeaderMap, name: &str) -> bool {
    let prefix = format!("{name}=;");
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&prefix) && value.contains("Max-Age=0"))
}

fn assert_logout_clears_cookies(headers: &HeaderMap) {
    for name in ["accessToken", "refreshToken", "connect.sid"] {
        assert!(cleared_cookie(headers, name), "{name} not cleared");
    }
}

fn profile_body() -> Value {
    json!({
        "personalAttributes": {
            "firstName": "Ada",
            "lastName": "Lovelace",
            "dob": "1990-12-10",
            "location": "Mumbai",
            "industry": "Influencer",
            "language": ["English", "Hindi"]
        },
        "physicalAppearance": { "bodyType": "Athletic", "facialLook": "Square" },
        "availabilityPreferences": {
            "travelPreference": "Domestic",
            "preferredCollaboration": "Remote",
            "scheduleFlexibility": "Flexible"
        },
        "audienceDemographic": { "popularAmongAgeGroup": "18-40" },
        "socialMediaPresence": { "facebookFollowers": 10, "instagramFollowers": 500 }
    })
}

fn multipart_request(uri: &str, token: &str, field: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"me.png\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .expect("request")
}

async fn register_and_login(app: &Router, email: &str) -> (String, String) {
    let (status, _, _) = send(
        app,
        json_request(
            "POST",
            "/api/v1/users/register",
            &json!({ "fullName": "Ada Lovelace", "email": email, "password": "p@ss-1234" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/users/login",
            &json!({ "email": email, "password": "p@ss-1234" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    (
        body["data"]["accessToken"].as_str().expect("access").to_string(),
        body["data"]["refreshToken"].as_str().expect("refresh").to_string(),
    )
}

#[tokio::test]
async fn health_reports_ok_with_request_id() {
    let app = app();
    let (status, headers, body) = send(&app, get("/api/v1/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn register_and_login_envelopes() {
    let app = app();
    let (status, _, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/register",
            &json!({ "fullName": "Ada Lovelace", "email": "Ada@Example.com", "password": "secret-1" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("User registered successfully"));
    assert_eq!(body["data"]["email"], json!("ada@example.com"));
    assert!(body["data"].get("passwordHash").is_none());
    assert!(body["data"].get("refreshToken").is_none());

    let (status, _, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/register",
            &json!({ "fullName": "Someone", "email": "ada@example.com", "password": "other" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["code"], json!("RESOURCE.CONFLICT"));

    let (status, _, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/register",
            &json!({ "fullName": "  ", "email": "x@example.com", "password": "p" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("INVALID.REQUEST"));

    let (status, _, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/login",
            &json!({ "email": "ada@example.com", "password": "wrong" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, headers, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/login",
            &json!({ "email": "ADA@example.com", "password": "secret-1" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], json!("User logged in successfully"));
    assert_eq!(body["data"]["user"]["fullName"], json!("Ada Lovelace"));
    assert!(set_cookie(&headers, "accessToken").is_some());
    assert!(set_cookie(&headers, "refreshToken").is_some());
}

#[tokio::test]
async fn refresh_rotation_invalidates_previous_token() {
    let app = app();
    let (_, first_refresh) = register_and_login(&app, "rot@example.com").await;

    let (status, headers, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/refresh-token",
            &json!({ "refreshToken": first_refresh }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Access token refreshed"));
    let second_refresh = body["data"]["refreshToken"].as_str().expect("refresh").to_string();
    assert_ne!(second_refresh, first_refresh);
    assert!(set_cookie(&headers, "refreshToken").is_some());

    let (status, _, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/refresh-token",
            &json!({ "refreshToken": first_refresh }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], json!("AUTH.UNAUTHORIZED"));

    // cookie 优先于 body
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/users/refresh-token")
        .header(header::COOKIE, format!("refreshToken={second_refresh}"))
        .body(Body::empty())
        .expect("request");
    let (status, _, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn refresh_without_token_is_unauthorized() {
    let app = app();
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/users/refresh-token")
        .body(Body::empty())
        .expect("request");
    let (status, _, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Refresh token is required"));
}

#[tokio::test]
async fn logout_revokes_refresh_token() {
    let app = app();
    let (access, refresh) = register_and_login(&app, "bye@example.com").await;

    let req = Request::builder()
        .method("GET")
        .uri("/api/v1/users/logout")
        .header(header::AUTHORIZATION, format!("Bearer {access}"))
        .body(Body::empty())
        .expect("request");
    let (status, headers, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("User logged out successfully"));
    assert_logout_clears_cookies(&headers);

    let (status, _, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/refresh-token",
            &json!({ "refreshToken": refresh }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 无身份时同样成功，cookie 照样清除
    let (status, headers, _) = send(&app, get("/api/v1/users/logout", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_logout_clears_cookies(&headers);
}

#[tokio::test]
async fn change_password_rules() {
    let app = app();
    let (access, refresh) = register_and_login(&app, "pw@example.com").await;

    let cases = [
        (json!({ "oldPassword": "p@ss-1234", "newPassword": "p@ss-1234" }), StatusCode::BAD_REQUEST),
        (json!({ "oldPassword": "p@ss-1234" }), StatusCode::BAD_REQUEST),
        (json!({ "oldPassword": "nope", "newPassword": "fresh-pass" }), StatusCode::UNAUTHORIZED),
    ];
    for (body, expected) in cases {
        let (status, _, _) = send(
            &app,
            json_request("POST", "/api/v1/users/change-password", &body, Some(&access)),
        )
        .await;
        assert_eq!(status, expected, "{body}");
    }

    let (status, _, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/change-password",
            &json!({ "oldPassword": "p@ss-1234", "newPassword": "fresh-pass" }),
            Some(&access),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Password changed successfully"));

    let (status, _, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/refresh-token",
            &json!({ "refreshToken": refresh }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/login",
            &json!({ "email": "pw@example.com", "password": "fresh-pass" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn profile_requires_authentication() {
    let app = app();
    let (status, _, body) = send(
        &app,
        json_request("POST", "/api/v1/profiles/create", &profile_body(), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Unauthorized request"));

    let (status, _, _) = send(
        &app,
        json_request("POST", "/api/v1/profiles/create", &profile_body(), Some("garbage")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_create_update_and_upload() {
    let app = app();
    let (access, refresh) = register_and_login(&app, "talent@example.com").await;

    let (status, _, body) = send(
        &app,
        json_request("PATCH", "/api/v1/profiles/update", &json!({}), Some(&access)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("RESOURCE.NOT_FOUND"));

    let (status, _, body) = send(
        &app,
        json_request("POST", "/api/v1/profiles/create", &profile_body(), Some(&access)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], json!("Profile created successfully"));
    assert_eq!(body["data"]["personalAttributes"]["dob"], json!("1990-12-10"));
    assert_eq!(body["data"]["additionalSkills"]["musicalTalents"], json!(false));
    let owner = body["data"]["owner"].clone();

    let (status, _, _) = send(
        &app,
        json_request("POST", "/api/v1/profiles/create", &profile_body(), Some(&access)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _, body) = send(
        &app,
        json_request(
            "PATCH",
            "/api/v1/profiles/update",
            &json!({ "socialMediaPresence": { "facebookFollowers": 99 }, "owner": "someone-else" }),
            Some(&access),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Profile updated successfully"));
    assert_eq!(body["data"]["socialMediaPresence"]["facebookFollowers"], json!(99));
    assert_eq!(body["data"]["socialMediaPresence"]["instagramFollowers"], json!(500));
    assert_eq!(body["data"]["owner"], owner);

    let (status, _, _) = send(
        &app,
        json_request(
            "PATCH",
            "/api/v1/profiles/update",
            &json!({ "physicalAppearance": { "bodyType": "Gigantic" } }),
            Some(&access),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, body) = send(
        &app,
        multipart_request("/api/v1/profiles/uploadProfile", &access, "profilePicture", b"\x89PNG"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Profile picture updated successfully"));
    let url = body["data"]["profilePicture"].as_str().expect("picture url");
    assert!(url.contains("BuzzVerse/profiles/"));
    assert!(url.ends_with(".png"));

    let (status, _, body) = send(
        &app,
        json_request(
            "PATCH",
            "/api/v1/profiles/update",
            &json!({ "physicalAppearance": { "fitness": "Good" } }),
            Some(&access),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["physicalAppearance"],
        json!({ "bodyType": "Athletic", "facialLook": "Square", "fitness": "Good" })
    );
    assert_eq!(body["data"]["profilePicture"].as_str(), Some(url));

    let req = Request::builder()
        .method("GET")
        .uri("/api/v1/users/logout")
        .header(header::AUTHORIZATION, format!("Bearer {access}"))
        .body(Body::empty())
        .expect("request");
    let (status, headers, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_logout_clears_cookies(&headers);

    let (status, _, _) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/refresh-token",
            &json!({ "refreshToken": refresh }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn upload_without_file_is_not_found() {
    let app = app();
    let (access, _) = register_and_login(&app, "nofile@example.com").await;
    send(
        &app,
        json_request("POST", "/api/v1/profiles/create", &profile_body(), Some(&access)),
    )
    .await;

    let (status, _, body) = send(
        &app,
        multipart_request("/api/v1/profiles/uploadProfile", &access, "avatar", b"\x89PNG"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Profile picture is required"));

    let req = Request::builder()
        .method("PATCH")
        .uri("/api/v1/profiles/uploadProfile")
        .header(header::AUTHORIZATION, format!("Bearer {access}"))
        .body(Body::empty())
        .expect("request");
    let (status, _, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_upstream_failure_is_not_implemented() {
    let app = app_with_media(Arc::new(InMemoryMediaStore::failing()));
    let (access, _) = register_and_login(&app, "cdn@example.com").await;
    send(
        &app,
        json_request("POST", "/api/v1/profiles/create", &profile_body(), Some(&access)),
    )
    .await;

    let (status, _, body) = send(
        &app,
        multipart_request("/api/v1/profiles/uploadProfile", &access, "profilePicture", b"\x89PNG"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["error"]["code"], json!("UPSTREAM.FAILED"));
}

#[tokio::test]
async fn google_login_establishes_session() {
    let app = app();
    let (status, headers, _) = send(&app, get("/api/v1/users/auth/google", None)).await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let location = headers
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location");
    let oauth_state = location
        .split_once("state=")
        .map(|(_, state)| state.to_string())
        .expect("state");
    let state_cookie = set_cookie(&headers, "oauth_state").expect("state cookie");
    assert_eq!(state_cookie, format!("oauth_state={oauth_state}"));

    let (status, headers, _) = send(
        &app,
        get(
            &format!("/api/v1/users/auth/google/callback?code=good-code&state={oauth_state}"),
            Some(&state_cookie),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        headers.get(header::LOCATION).and_then(|value| value.to_str().ok()),
        Some("/api/v1/users/auth/protected")
    );
    assert!(set_cookie(&headers, "accessToken").is_some());
    let session = set_cookie(&headers, "connect.sid").expect("session cookie");

    let (status, _, body) = send(&app, get("/api/v1/users/auth/protected", Some(&session))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Welcome Grace Hopper"));

    // 篡改过的会话 cookie 不被接受
    let (status, _, _) = send(
        &app,
        get("/api/v1/users/auth/protected", Some("connect.sid=forged")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .method("GET")
        .uri("/api/v1/users/logout")
        .header(header::COOKIE, session.clone())
        .body(Body::empty())
        .expect("request");
    let (status, headers, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_logout_clears_cookies(&headers);

    let (status, _, _) = send(&app, get("/api/v1/users/auth/protected", Some(&session))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn google_callback_failures_redirect() {
    let app = app();
    let cases = [
        ("/api/v1/users/auth/google/callback?code=good-code&state=abc", Some("oauth_state=xyz")),
        ("/api/v1/users/auth/google/callback?code=good-code&state=abc", None),
        ("/api/v1/users/auth/google/callback?code=bad-code&state=abc", Some("oauth_state=abc")),
        ("/api/v1/users/auth/google/callback?error=access_denied", None),
    ];
    for (uri, cookie) in cases {
        let (status, headers, _) = send(&app, get(uri, cookie)).await;
        assert_eq!(status, StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(
            headers.get(header::LOCATION).and_then(|value| value.to_str().ok()),
            Some("/api/v1/users/auth/google/failure"),
            "{uri}"
        );
        assert!(set_cookie(&headers, "connect.sid").is_none());
    }

    let (status, _, body) = send(&app, get("/api/v1/users/auth/google/failure", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], json!("Google authentication failed"));
}

#[tokio::test]
async fn oversized_json_body_is_rejected() {
    let app = app();
    let body = json!({
        "fullName": "x".repeat(20 * 1024),
        "email": "big@example.com",
        "password": "p"
    });
    let (status, _, _) = send(
        &app,
        json_request("POST", "/api/v1/users/register", &body, None),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
