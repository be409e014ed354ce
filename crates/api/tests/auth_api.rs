//! Integration tests for authentication and role enforcement.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, token};
use sqlx::PgPool;

use leadex_core::roles::{ROLE_COMPANY, ROLE_SCOUT};

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/notifications").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn garbage_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/notifications", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn scout_cannot_trigger_admin_payout_run(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/admin/payouts/run",
        &token("scout-1", ROLE_SCOUT),
        serde_json::json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn company_cannot_submit_leads(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/leads",
        &token("company-1", ROLE_COMPANY),
        serde_json::json!({
            "category": "IT Services",
            "title": "A lead",
            "description": "Something worth buying.",
            "contact_email": "lead@example.com"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_submission_is_a_validation_error(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    // Register the scout profile first so the request reaches validation.
    let scout_token = token("scout-val", ROLE_SCOUT);
    let response = post_json(
        app,
        "/api/v1/scouts",
        &scout_token,
        serde_json::json!({ "name": "Val", "email": "val@scout.example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json(
        app,
        "/api/v1/leads",
        &scout_token,
        serde_json::json!({
            "category": "IT Services",
            "title": "Bad contact",
            "description": "The email below is not an email.",
            "contact_email": "not-an-email"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}
