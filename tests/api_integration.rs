//! Integration tests for the HTTP API
//!
//! Each test drives the real router against a throwaway SQLite file.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tender_backend::{
    auth::{AuthState, Claims, JwtHandler, StaticCredentials},
    create_router,
    tenders::TenderStore,
};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";
// Lowest cost bcrypt accepts; keeps hashing fast in tests
const TEST_BCRYPT_COST: u32 = 4;

struct TestApp {
    router: Router,
    _db: NamedTempFile,
}

fn test_app() -> TestApp {
    let db = NamedTempFile::new().unwrap();
    let store = Arc::new(TenderStore::new(db.path().to_str().unwrap()).unwrap());
    let credentials = Arc::new(StaticCredentials::admin_default(TEST_BCRYPT_COST).unwrap());
    let auth_state = AuthState::new(credentials, Arc::new(JwtHandler::new(SECRET)));

    TestApp {
        router: create_router(auth_state, store),
        _db: db,
    }
}

impl TestApp {
    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn login(&self) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/login",
                None,
                Some(json!({"username": "admin", "password": "admin123"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }
}

fn acme() -> Value {
    json!({"name": "Acme", "phone": "555", "email": "a@b.com", "amount": 100})
}

#[tokio::test]
async fn login_issues_one_hour_token() {
    let app = test_app();
    let token = app.login().await;

    let decoded = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(SECRET.as_bytes()),
        &Validation::default(),
    )
    .unwrap();

    let now = Utc::now().timestamp() as usize;
    assert_eq!(decoded.claims.username, "admin");
    assert!(decoded.claims.exp > now + 3500);
    assert!(decoded.claims.exp <= now + 3600);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = test_app();

    let (status, body) = app
        .send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"username": "root", "password": "admin123"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid username");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"username": "admin", "password": "nope"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid password");

    let (status, body) = app
        .send(Method::POST, "/api/login", None, Some(json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid username");
}

#[tokio::test]
async fn login_rejects_unparseable_body() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn protected_routes_require_token() {
    let app = test_app();

    let routes = [
        (Method::GET, "/api/tenders"),
        (Method::POST, "/api/tenders"),
        (Method::GET, "/api/tenders/search?q=a"),
        (Method::PUT, "/api/tenders/00000000-0000-0000-0000-000000000000"),
        (Method::DELETE, "/api/tenders/00000000-0000-0000-0000-000000000000"),
    ];

    for (method, uri) in routes {
        let (status, body) = app.send(method.clone(), uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["message"], "No token provided");

        let (status, body) = app.send(method.clone(), uri, Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body["message"], "Invalid token");
    }
}

#[tokio::test]
async fn rejects_foreign_and_expired_tokens() {
    let app = test_app();

    let (foreign, _) = JwtHandler::new("some-other-secret")
        .generate_token("admin")
        .unwrap();
    let (status, body) = app
        .send(Method::GET, "/api/tenders", Some(&foreign), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    let issued = Utc::now().timestamp() as usize - 2 * 3600;
    let expired = encode(
        &Header::default(),
        &Claims {
            username: "admin".to_string(),
            iat: issued,
            exp: issued + 3600,
        },
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    let (status, body) = app
        .send(Method::GET, "/api/tenders", Some(&expired), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn rejects_token_just_past_expiry() {
    let app = test_app();

    let now = Utc::now().timestamp() as usize;
    let stale = encode(
        &Header::default(),
        &Claims {
            username: "admin".to_string(),
            iat: now - 3630,
            exp: now - 30,
        },
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();

    let (status, body) = app
        .send(Method::GET, "/api/tenders", Some(&stale), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn accepts_raw_and_bearer_tokens() {
    let app = test_app();
    let token = app.login().await;

    let (status, _) = app.send(Method::GET, "/api/tenders", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let bearer = format!("Bearer {}", token);
    let (status, _) = app
        .send(Method::GET, "/api/tenders", Some(&bearer), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn create_then_list() {
    let app = test_app();
    let token = app.login().await;

    let (status, created) = app
        .send(Method::POST, "/api/tenders", Some(&token), Some(acme()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["name"], "Acme");
    assert_eq!(created["phone"], "555");
    assert_eq!(created["email"], "a@b.com");
    assert_eq!(created["amount"], 100);
    assert!(created["_id"].is_string());
    assert!(created["createdAt"].is_string());
    assert_eq!(created["createdAt"], created["updatedAt"]);

    let (status, listed) = app.send(Method::GET, "/api/tenders", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([created]));
}

#[tokio::test]
async fn whole_amounts_are_echoed_as_integers() {
    let app = test_app();
    let token = app.login().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/tenders")
        .header(header::AUTHORIZATION, &token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Acme","amount":100}"#))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let raw = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(raw.contains(r#""amount":100,"#), "{}", raw);
    assert!(!raw.contains("100.0"), "{}", raw);
}

#[tokio::test]
async fn missing_or_non_json_body_is_an_empty_document() {
    let app = test_app();
    let token = app.login().await;

    let (status, created) = app
        .send(Method::POST, "/api/tenders", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(created["_id"].is_string());
    assert!(created.get("name").is_none());
    assert!(created.get("amount").is_none());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/tenders")
        .header(header::AUTHORIZATION, &token)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("name=Acme&amount=5"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let created: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(created.get("name").is_none());

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/api/tenders/{}", created["_id"].as_str().unwrap()),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["_id"], created["_id"]);

    let (status, body) = app.send(Method::POST, "/api/login", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid username");
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let app = test_app();
    let token = app.login().await;

    let (_, acme_corp) = app
        .send(
            Method::POST,
            "/api/tenders",
            Some(&token),
            Some(json!({"name": "Acme Corp", "amount": 5})),
        )
        .await;
    app.send(
        Method::POST,
        "/api/tenders",
        Some(&token),
        Some(json!({"name": "Globex"})),
    )
    .await;

    let (status, found) = app
        .send(Method::GET, "/api/tenders/search?q=ac", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, json!([acme_corp]));

    let (status, found) = app
        .send(Method::GET, "/api/tenders/search?q=zzz", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found, json!([]));

    let (status, found) = app
        .send(Method::GET, "/api/tenders/search", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn search_treats_pattern_characters_literally() {
    let app = test_app();
    let token = app.login().await;

    app.send(
        Method::POST,
        "/api/tenders",
        Some(&token),
        Some(json!({"name": "Acme (UK)"})),
    )
    .await;

    // "(" and "[" would be broken patterns, ".*" would match everything
    for (q, expected) in [("%28", 1), ("%5B", 0), (".%2A", 0), ("(uk)", 1)] {
        let uri = format!("/api/tenders/search?q={}", q);
        let (status, found) = app.send(Method::GET, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK, "q={}", q);
        assert_eq!(found.as_array().unwrap().len(), expected, "q={}", q);
    }
}

#[tokio::test]
async fn update_replaces_or_returns_null() {
    let app = test_app();
    let token = app.login().await;

    let (_, created) = app
        .send(Method::POST, "/api/tenders", Some(&token), Some(acme()))
        .await;
    let id = created["_id"].as_str().unwrap();

    let (status, updated) = app
        .send(
            Method::PUT,
            &format!("/api/tenders/{}", id),
            Some(&token),
            Some(json!({"name": "Acme Ltd", "amount": "250"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["_id"], created["_id"]);
    assert_eq!(updated["name"], "Acme Ltd");
    assert_eq!(updated["amount"], 250);
    assert!(updated.get("phone").is_none());
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (status, missing) = app
        .send(
            Method::PUT,
            "/api/tenders/6f1c1a8e-0000-4000-8000-000000000000",
            Some(&token),
            Some(acme()),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(missing, Value::Null);

    let (_, listed) = app.send(Method::GET, "/api/tenders", Some(&token), None).await;
    assert_eq!(listed, json!([updated]));
}

#[tokio::test]
async fn delete_is_idempotent() {
    let app = test_app();
    let token = app.login().await;

    let (_, created) = app
        .send(Method::POST, "/api/tenders", Some(&token), Some(acme()))
        .await;
    let uri = format!("/api/tenders/{}", created["_id"].as_str().unwrap());

    for _ in 0..2 {
        let (status, body) = app.send(Method::DELETE, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Deleted"}));
    }

    let (status, body) = app
        .send(
            Method::DELETE,
            "/api/tenders/6f1c1a8e-0000-4000-8000-000000000000",
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Deleted"}));

    let (_, listed) = app.send(Method::GET, "/api/tenders", Some(&token), None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn store_faults_collapse_to_server_error() {
    let app = test_app();
    let token = app.login().await;

    let (status, body) = app
        .send(Method::DELETE, "/api/tenders/not-an-id", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "Server error"}));

    let (status, body) = app
        .send(
            Method::PUT,
            "/api/tenders/not-an-id",
            Some(&token),
            Some(acme()),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "Server error"}));

    let (status, body) = app
        .send(
            Method::POST,
            "/api/tenders",
            Some(&token),
            Some(json!({"name": "Acme", "amount": "a lot"})),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"message": "Server error"}));

    let (_, listed) = app.send(Method::GET, "/api/tenders", Some(&token), None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn unknown_route_is_json_404() {
    let app = test_app();
    let (status, body) = app.send(Method::GET, "/api/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not found");
}
