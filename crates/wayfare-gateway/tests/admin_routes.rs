//! Admin console routes against a mocked downstream.

mod common;

use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use serde_json::{json, Value};
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use common::{bearer, gateway, session_cookie};

#[tokio::test]
async fn approve_acknowledges_without_data() {
    let (server, downstream) = gateway().await;
    Mock::given(method("PATCH"))
        .and(path("/api/experiences/42/approve"))
        .and(header("authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "experience": { "id": 42 } })))
        .expect(1)
        .mount(&downstream)
        .await;

    let (name, value) = bearer("T");
    let response = server
        .patch("/api/experiences/42/approve")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "success": true, "message": "Experience approved and published successfully" })
    );
}

#[tokio::test]
async fn approve_without_credential_never_reaches_downstream() {
    let (server, downstream) = gateway().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&downstream)
        .await;

    let response = server.patch("/api/experiences/42/approve").await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["error"], "unauthorized");
}

#[tokio::test]
async fn reject_forwards_the_reason() {
    let (server, downstream) = gateway().await;
    Mock::given(method("PATCH"))
        .and(path("/api/experiences/42/reject"))
        .and(body_json(json!({ "reason": "Blurry photos" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&downstream)
        .await;

    let (name, value) = session_cookie("T");
    let response = server
        .patch("/api/experiences/42/reject")
        .add_header(name, value)
        .json(&json!({ "reason": "Blurry photos" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "success": true, "message": "Experience rejected" })
    );
}

#[tokio::test]
async fn reject_without_body_is_accepted() {
    let (server, downstream) = gateway().await;
    Mock::given(method("PATCH"))
        .and(path("/api/experiences/42/reject"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&downstream)
        .await;

    let (name, value) = bearer("T");
    let response = server
        .patch("/api/experiences/42/reject")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn pending_queue_carries_pagination() {
    let (server, downstream) = gateway().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/experiences/pending"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "experiences": [{ "id": 8, "title": "Night Market Tour" }],
            "pagination": { "page": 3, "limit": 20, "total": 41, "totalPages": 3 }
        })))
        .expect(1)
        .mount(&downstream)
        .await;

    let (name, value) = bearer("T");
    let response = server
        .get("/api/admin/experiences/pending?page=3")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"][0]["status"], "pending");
    assert_eq!(body["pagination"]["total"], 41);
}

#[tokio::test]
async fn user_search_is_renamed() {
    let (server, downstream) = gateway().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/users"))
        .and(query_param("search", "ana"))
        .and(query_param("role", "host"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{ "id": 9, "email": "ana@wayfare.io", "role": "host" }]
        })))
        .expect(1)
        .mount(&downstream)
        .await;

    let (name, value) = bearer("T");
    let response = server
        .get("/api/admin/users?q=ana&role=host")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"][0]["email"], "ana@wayfare.io");
    assert_eq!(body["data"][0]["role"], "host");
}

#[tokio::test]
async fn role_change_requires_a_role() {
    let (server, downstream) = gateway().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&downstream)
        .await;

    let (name, value) = bearer("T");
    let response = server
        .patch("/api/admin/users/9/role")
        .add_header(name, value)
        .json(&json!({ "role": "  " }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Missing required fields: role"
    );
}

#[tokio::test]
async fn role_change_returns_the_user() {
    let (server, downstream) = gateway().await;
    Mock::given(method("PATCH"))
        .and(path("/api/admin/users/9/role"))
        .and(body_json(json!({ "role": "admin" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": { "id": 9, "email": "ana@wayfare.io", "role": "admin" }
        })))
        .expect(1)
        .mount(&downstream)
        .await;

    let (name, value) = bearer("T");
    let response = server
        .patch("/api/admin/users/9/role")
        .add_header(name, value)
        .json(&json!({ "role": "admin" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["message"], "User role updated successfully");
    assert_eq!(body["data"]["role"], "admin");
}

#[tokio::test]
async fn delete_user_acknowledges() {
    let (server, downstream) = gateway().await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/users/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&downstream)
        .await;

    let (name, value) = bearer("T");
    let response = server.delete("/api/admin/users/9").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "success": true, "message": "User deleted successfully" })
    );
}

#[tokio::test]
async fn forbidden_delete_is_mirrored() {
    let (server, downstream) = gateway().await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/users/1"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "error": "Admins only" })))
        .mount(&downstream)
        .await;

    let (name, value) = bearer("T");
    let response = server.delete("/api/admin/users/1").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>()["message"], "Admins only");
}

#[tokio::test]
async fn stats_default_to_zero() {
    let (server, downstream) = gateway().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totalUsers": 12 })))
        .mount(&downstream)
        .await;

    let (name, value) = bearer("T");
    let response = server.get("/api/admin/stats").add_header(name, value).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "success": true,
            "data": {
                "totalUsers": 12,
                "totalHosts": 0,
                "totalExperiences": 0,
                "pendingExperiences": 0,
                "totalBookings": 0,
                "totalRevenue": 0.0
            }
        })
    );
}

#[tokio::test]
async fn transactions_forward_date_filters() {
    let (server, downstream) = gateway().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/finance/transactions"))
        .and(query_param("from", "2025-01-01"))
        .and(query_param("to", "2025-01-31"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "transactions": [{ "id": "tx_1", "amount": 120.5 }]
        })))
        .expect(1)
        .mount(&downstream)
        .await;

    let (name, value) = bearer("T");
    let response = server
        .get("/api/admin/finance/transactions?from=2025-01-01&to=2025-01-31&unused=x")
        .add_header(name, value)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"][0]["id"], "tx_1");
    assert_eq!(body["data"][0]["currency"], "USD");
    assert_eq!(body["data"][0]["type"], "payment");

    let received = downstream.received_requests().await.unwrap();
    assert!(received[0].url.query_pairs().all(|(k, _)| k != "unused"));
}

#[tokio::test]
async fn admin_login_sets_session_cookie() {
    let (server, downstream) = gateway().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "token": "ADMIN",
                "user": { "id": 1, "email": "root@wayfare.io", "role": "admin" }
            }
        })))
        .expect(1)
        .mount(&downstream)
        .await;

    let response = server
        .post("/api/admin/auth/login")
        .json(&json!({ "email": "root@wayfare.io", "password": "secret" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap().to_string();
    assert!(cookie.starts_with("admin_token=ADMIN;"));
    assert_eq!(response.json::<Value>()["data"]["user"]["role"], "admin");
}
