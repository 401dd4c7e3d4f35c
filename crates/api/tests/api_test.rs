//! End-to-end tests for the HTTP API against temporary `SQLite` stores.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use http_body_util::BodyExt;
use iltizam_api::{AppState, create_router};
use iltizam_db::{TenantRegistry, connect_sqlite, seed};
use iltizam_shared::{JwtConfig, JwtService};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";

struct TestApp {
    _dir: TempDir,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let master = connect_sqlite(&dir.path().join("master.sqlite"), 1)
            .await
            .expect("master store");
        seed::bootstrap(&master, ADMIN_USERNAME, ADMIN_PASSWORD)
            .await
            .expect("bootstrap");

        let state = AppState {
            master: Arc::new(master),
            tenants: Arc::new(TenantRegistry::new(dir.path().join("tenants"), 1)),
            jwt_service: Arc::new(JwtService::new(JwtConfig::default())),
            bootstrap_admin: Arc::from(ADMIN_USERNAME),
        };

        Self {
            _dir: dir,
            router: create_router(state),
        }
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method(method)
            .uri(format!("/api/v1{uri}"));
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn register(&self, company: &str, username: &str) -> String {
        let (status, body) = self
            .send(
                "POST",
                "/auth/register",
                None,
                Some(json!({
                    "company_name": company,
                    "username": username,
                    "password": "secret123",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["access_token"].as_str().expect("token").to_string()
    }

    async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "username": username, "password": password })),
        )
        .await
    }

    async fn admin_token(&self) -> String {
        let (status, body) = self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["access_token"].as_str().expect("token").to_string()
    }

    async fn create_commitment(&self, token: &str, due_date: &str, amount: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/commitments",
                Some(token),
                Some(json!({
                    "due_date": due_date,
                    "account": "Rent",
                    "description": "Office rent",
                    "amount": amount,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

fn decimal(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).expect("decimal string"),
        other => Decimal::from_str(&other.to_string()).expect("decimal number"),
    }
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["open_tenant_stores"], 0);

    app.register("Acme", "acme").await;
    let (_, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(body["open_tenant_stores"], 1);
}

#[tokio::test]
async fn test_protected_routes_need_a_token() {
    let app = TestApp::new().await;

    let (status, body) = app.send("GET", "/commitments", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing_token");

    let (status, body) = app
        .send("GET", "/commitments", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = TestApp::new().await;

    let (status, body) = app.login(ADMIN_USERNAME, "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");

    let (status, _) = app.login("nobody", ADMIN_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_issues_new_tokens() {
    let app = TestApp::new().await;
    let (_, login) = app.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let (status, body) = app
        .send(
            "POST",
            "/auth/refresh",
            None,
            Some(json!({ "refresh_token": login["refresh_token"] })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["user"]["username"], ADMIN_USERNAME);
    assert!(body["access_token"].as_str().is_some());
}

#[tokio::test]
async fn test_register_rejects_short_password_and_duplicates() {
    let app = TestApp::new().await;
    app.register("Acme", "acme").await;

    let (status, _) = app
        .send(
            "POST",
            "/auth/register",
            None,
            Some(json!({ "company_name": "Other", "username": "other", "password": "123" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(
            "POST",
            "/auth/register",
            None,
            Some(json!({ "company_name": "Again", "username": "acme", "password": "secret123" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
}

#[tokio::test]
async fn test_commitment_numbers_follow_the_due_month() {
    let app = TestApp::new().await;
    let token = app.register("Acme", "acme").await;

    let first = app.create_commitment(&token, "2025-03-15", "1000").await;
    let second = app.create_commitment(&token, "2025-03-02", "250").await;
    let april = app.create_commitment(&token, "2025-04-01", "250").await;

    assert_eq!(first["commit_number"], "2025-03-001");
    assert_eq!(second["commit_number"], "2025-03-002");
    assert_eq!(april["commit_number"], "2025-04-001");
    assert_eq!(first["status"], "active");
}

#[tokio::test]
async fn test_create_commitment_validates_input() {
    let app = TestApp::new().await;
    let token = app.register("Acme", "acme").await;

    let cases = [
        json!({ "account": "Rent", "amount": "10" }),
        json!({ "due_date": "15/03/2025", "account": "Rent", "amount": "10" }),
        json!({ "due_date": "2025-03-15", "amount": "10" }),
        json!({ "due_date": "2025-03-15", "account": "Rent", "amount": "0" }),
        json!({ "due_date": "2025-03-15", "account": "Rent", "amount": "10", "status": "paid" }),
    ];

    for body in cases {
        let (status, response) = app
            .send("POST", "/commitments", Some(token.as_str()), Some(body))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{response}");
        assert_eq!(response["error"], "validation_error");
    }
}

#[tokio::test]
async fn test_payments_settle_a_commitment() {
    let app = TestApp::new().await;
    let token = app.register("Acme", "acme").await;
    let commitment = app.create_commitment(&token, "2025-03-15", "1000").await;
    let id = commitment["id"].as_i64().expect("id");

    let pay = |amount: &'static str| {
        json!({
            "commitment_id": id,
            "amount": amount,
            "method": "cash",
            "payment_date": "2025-03-20",
        })
    };

    let (status, body) = app
        .send("POST", "/payments", Some(token.as_str()), Some(pay("400")))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(decimal(&body["remainingAmount"]), Decimal::from(600));
    assert_eq!(body["commitment"]["status"], "active");

    let (status, body) = app
        .send("POST", "/payments", Some(token.as_str()), Some(pay("700")))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = app
        .send("POST", "/payments", Some(token.as_str()), Some(pay("600")))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["commitment"]["status"], "completed");
    assert_eq!(decimal(&body["totalPaid"]), Decimal::from(1000));

    let (status, body) = app
        .send("GET", "/commitments/search/2025-03-001", Some(token.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["commit_number"], "2025-03-001");
    assert_eq!(body["payments"].as_array().map(Vec::len), Some(2));
    assert_eq!(decimal(&body["remainingAmount"]), Decimal::ZERO);

    let (status, body) = app
        .send(
            "GET",
            &format!("/payments?commitment_id={id}"),
            Some(token.as_str()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["payments"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_delete_commitment_with_payments_conflicts() {
    let app = TestApp::new().await;
    let token = app.register("Acme", "acme").await;
    let paid = app.create_commitment(&token, "2025-03-15", "100").await;
    let unpaid = app.create_commitment(&token, "2025-03-16", "100").await;

    let (status, _) = app
        .send(
            "POST",
            "/payments",
            Some(token.as_str()),
            Some(json!({
                "commitment_id": paid["id"],
                "amount": "50",
                "method": "bank_transfer",
                "payment_date": "2025-03-20",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .send("DELETE", &format!("/commitments/{}", paid["id"]), Some(token.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, _) = app
        .send("DELETE", &format!("/commitments/{}", unpaid["id"]), Some(token.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .send("GET", &format!("/commitments/{}", unpaid["id"]), Some(token.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_keeps_the_number() {
    let app = TestApp::new().await;
    let token = app.register("Acme", "acme").await;
    let commitment = app.create_commitment(&token, "2025-03-15", "100").await;

    let (status, body) = app
        .send(
            "PUT",
            &format!("/commitments/{}", commitment["id"]),
            Some(token.as_str()),
            Some(json!({ "due_date": "2025-07-01", "description": "Moved" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["commit_number"], "2025-03-001");
    assert_eq!(body["due_date"], "2025-07-01");
    assert_eq!(body["description"], "Moved");
}

#[tokio::test]
async fn test_update_applies_the_account_rule() {
    let app = TestApp::new().await;
    let token = app.register("Acme", "acme").await;
    let commitment = app.create_commitment(&token, "2025-03-15", "100").await;
    let uri = format!("/commitments/{}", commitment["id"]);

    let (status, body) = app
        .send("PUT", &uri, Some(token.as_str()), Some(json!({ "account": "   " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["error"], "validation_error");

    let (status, body) = app
        .send("PUT", &uri, Some(token.as_str()), Some(json!({ "account": "  Utilities " })))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["account"], "Utilities");
}

#[tokio::test]
async fn test_tenants_never_see_each_other() {
    let app = TestApp::new().await;
    let acme = app.register("Acme", "acme").await;
    let globex = app.register("Globex", "globex").await;
    app.create_commitment(&acme, "2025-03-15", "100").await;

    let (_, acme_me) = app.send("GET", "/companies/me", Some(acme.as_str()), None).await;
    let acme_id = acme_me["id"].as_i64().expect("company id");

    // An explicit company_id does not override the caller's own company.
    let (status, body) = app
        .send(
            "GET",
            &format!("/commitments?company_id={acme_id}"),
            Some(globex.as_str()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["commitments"], json!([]));

    let (status, _) = app
        .send("GET", "/commitments/search/2025-03-001", Some(globex.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Globex numbers its own commitments from 001.
    let own = app.create_commitment(&globex, "2025-03-20", "100").await;
    assert_eq!(own["commit_number"], "2025-03-001");
}

#[tokio::test]
async fn test_system_admin_names_the_company() {
    let app = TestApp::new().await;
    let acme = app.register("Acme", "acme").await;
    app.create_commitment(&acme, "2025-03-15", "100").await;
    let (_, me) = app.send("GET", "/companies/me", Some(acme.as_str()), None).await;
    let acme_id = me["id"].as_i64().expect("company id");
    assert_eq!(me["currency_code"], "SAR");
    assert_eq!(me["currency_symbol"], "ر.س");

    let admin = app.admin_token().await;

    let (status, body) = app.send("GET", "/commitments", Some(admin.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["commitments"], json!([]));

    let (status, body) = app
        .send(
            "GET",
            &format!("/commitments?company_id={acme_id}"),
            Some(admin.as_str()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["commitments"].as_array().map(Vec::len), Some(1));

    let (status, _) = app
        .send("GET", "/commitments?company_id=abc", Some(admin.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let body = json!({
        "due_date": "2025-03-18",
        "account": "Utilities",
        "amount": "80",
    });
    let (status, _) = app
        .send("POST", "/commitments", Some(admin.as_str()), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut with_company = body;
    with_company["company_id"] = json!(acme_id);
    let (status, created) = app
        .send("POST", "/commitments", Some(admin.as_str()), Some(with_company))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["commit_number"], "2025-03-002");
}

#[tokio::test]
async fn test_directory_routes_need_the_system_admin() {
    let app = TestApp::new().await;
    let acme = app.register("Acme", "acme").await;

    for uri in ["/companies", "/users"] {
        let (status, body) = app.send("GET", uri, Some(acme.as_str()), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}: {body}");
    }

    let (status, body) = app
        .send(
            "POST",
            "/currencies",
            Some(acme.as_str()),
            Some(json!({ "code": "JPY", "name_en": "Yen", "symbol": "¥" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN, "{body}");

    let (status, body) = app.send("GET", "/currencies", Some(acme.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currencies"].as_array().map(Vec::len), Some(9));
}

#[tokio::test]
async fn test_system_admin_manages_users() {
    let app = TestApp::new().await;
    app.register("Acme", "acme").await;
    let admin = app.admin_token().await;

    let (_, companies) = app.send("GET", "/companies", Some(admin.as_str()), None).await;
    let company_id = companies["companies"][0]["id"].clone();

    let (status, user) = app
        .send(
            "POST",
            "/users",
            Some(admin.as_str()),
            Some(json!({
                "username": "clerk",
                "password": "clerk123",
                "company_id": company_id,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{user}");
    assert_eq!(user["role"], "user");
    assert!(user.get("password_hash").is_none());

    let (status, login) = app.login("clerk", "clerk123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["user"]["company_id"], company_id);

    let (status, _) = app
        .send(
            "PUT",
            &format!("/users/{}", user["id"]),
            Some(admin.as_str()),
            Some(json!({ "is_active": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.login("clerk", "clerk123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "account_disabled");

    let (_, list) = app.send("GET", "/users", Some(admin.as_str()), None).await;
    let admin_id = list["users"]
        .as_array()
        .and_then(|users| users.iter().find(|u| u["username"] == ADMIN_USERNAME))
        .map(|u| u["id"].clone())
        .expect("bootstrap admin listed");

    let (status, body) = app
        .send("DELETE", &format!("/users/{admin_id}"), Some(admin.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");

    let (status, _) = app
        .send("DELETE", &format!("/users/{}", user["id"]), Some(admin.as_str()), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}
