//! End-to-end marketplace flow over HTTP: registration, submission,
//! moderation, purchase, and the resulting notifications and balances.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json, token};
use sqlx::PgPool;

use leadex_core::roles::{ROLE_ADMIN, ROLE_COMPANY, ROLE_SCOUT};

#[sqlx::test(migrations = "../db/migrations")]
async fn lead_travels_from_submission_to_sale(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let scout_token = token("scout-flow", ROLE_SCOUT);
    let company_token = token("company-flow", ROLE_COMPANY);
    let admin_token = token("admin-flow", ROLE_ADMIN);

    // --- Scout registers ---
    let response = post_json(
        app.clone(),
        "/api/v1/scouts",
        &scout_token,
        serde_json::json!({ "name": "Flow Scout", "email": "flow@scout.example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // --- Company registers on the starter plan (10 credits) ---
    let response = post_json(
        app.clone(),
        "/api/v1/companies",
        &company_token,
        serde_json::json!({
            "name": "Flow Buyers Ltd",
            "contact_email": "purchasing@flowbuyers.example.com"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let company = body_json(response).await;
    assert_eq!(company["data"]["credits_remaining"], 10);

    // --- Scout submits a lead ---
    let response = post_json(
        app.clone(),
        "/api/v1/leads",
        &scout_token,
        serde_json::json!({
            "category": "IT Services",
            "title": "Helpdesk outsourcing tender",
            "description": "A 400-seat helpdesk moving to an external provider.",
            "contact_email": "cio@tenderco.example.com",
            "contact_phone": "+44 20 7946 0123",
            "budget_cents": 2_500_000
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let lead = body_json(response).await;
    let lead_id = lead["data"]["id"].as_i64().unwrap();
    assert_eq!(lead["data"]["status"], "pending_review");

    // --- Unapproved leads cannot be bought ---
    let response = post_json(
        app.clone(),
        &format!("/api/v1/leads/{lead_id}/purchase"),
        &company_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // --- Moderation requires the admin role ---
    let response = post_json(
        app.clone(),
        &format!("/api/v1/leads/{lead_id}/moderate"),
        &scout_token,
        serde_json::json!({ "action": "approve" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // --- Admin approves; the sale price is fixed from the category table ---
    let response = post_json(
        app.clone(),
        &format!("/api/v1/leads/{lead_id}/moderate"),
        &admin_token,
        serde_json::json!({ "action": "approve" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let moderated = body_json(response).await;
    assert_eq!(moderated["data"]["status"], "approved");
    assert_eq!(moderated["data"]["sale_price_cents"], 3000);

    // --- Company purchases the lead ---
    let response = post_json(
        app.clone(),
        &format!("/api/v1/leads/{lead_id}/purchase"),
        &company_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let purchase = body_json(response).await;
    assert_eq!(purchase["data"]["purchase_price_cents"], 3000);
    assert_eq!(purchase["data"]["scout_earning_cents"], 1500);
    assert_eq!(purchase["data"]["platform_commission_cents"], 1500);

    // --- A second purchase attempt conflicts ---
    let response = post_json(
        app.clone(),
        &format!("/api/v1/leads/{lead_id}/purchase"),
        &company_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let conflict = body_json(response).await;
    assert_eq!(conflict["code"], "INVALID_STATE");

    // --- Balances reflect the sale ---
    let response = get_auth(app.clone(), "/api/v1/companies/me", &company_token).await;
    let company = body_json(response).await;
    assert_eq!(company["data"]["credits_remaining"], 9);

    let response = get_auth(app.clone(), "/api/v1/scouts/me", &scout_token).await;
    let scout = body_json(response).await;
    assert_eq!(scout["data"]["pending_earnings_cents"], 1500);
    assert_eq!(scout["data"]["total_leads_sold"], 1);

    // --- The company's ledger replays to its balance ---
    let response = get_auth(app.clone(), "/api/v1/companies/me/ledger", &company_token).await;
    let ledger = body_json(response).await;
    let entries = ledger["data"].as_array().unwrap();
    let replayed: i64 = entries
        .iter()
        .map(|e| e["amount"].as_i64().unwrap())
        .sum();
    assert_eq!(replayed, 9);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn requested_changes_loop_back_through_scout_edit(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let scout_token = token("scout-loop", ROLE_SCOUT);
    let admin_token = token("admin-loop", ROLE_ADMIN);

    post_json(
        app.clone(),
        "/api/v1/scouts",
        &scout_token,
        serde_json::json!({ "name": "Loop Scout", "email": "loop@scout.example.com" }),
    )
    .await;

    let response = post_json(
        app.clone(),
        "/api/v1/leads",
        &scout_token,
        serde_json::json!({
            "category": "Construction",
            "title": "Warehouse extension",
            "description": "Needs a contractor for a 2000 sqm extension.",
            "contact_email": "site@warehouse.example.com"
        }),
    )
    .await;
    let lead = body_json(response).await;
    let lead_id = lead["data"]["id"].as_i64().unwrap();

    // Admin asks for changes: the lead stays in review with the request
    // recorded on the moderation status.
    let response = post_json(
        app.clone(),
        &format!("/api/v1/leads/{lead_id}/moderate"),
        &admin_token,
        serde_json::json!({
            "action": "request_changes",
            "reason": "Budget information is missing"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let moderated = body_json(response).await;
    assert_eq!(moderated["data"]["status"], "pending_review");
    assert_eq!(moderated["data"]["moderation_status"], "changes_requested");

    // The scout edits; moderation resets to pending for a fresh review.
    let response = common::put_json(
        app.clone(),
        &format!("/api/v1/leads/{lead_id}"),
        &scout_token,
        serde_json::json!({ "budget_cents": 15_000_000 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let edited = body_json(response).await;
    assert_eq!(edited["data"]["status"], "pending_review");
    assert_eq!(edited["data"]["moderation_status"], "pending");
    assert_eq!(edited["data"]["budget_cents"], 15_000_000);

    // Rejection is terminal: further edits conflict.
    post_json(
        app.clone(),
        &format!("/api/v1/leads/{lead_id}/moderate"),
        &admin_token,
        serde_json::json!({ "action": "reject", "reason": "Duplicate submission" }),
    )
    .await;
    let response = common::put_json(
        app.clone(),
        &format!("/api/v1/leads/{lead_id}"),
        &scout_token,
        serde_json::json!({ "title": "Second try" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The audit trail recorded both decisions.
    let response = get_auth(
        app.clone(),
        &format!("/api/v1/leads/{lead_id}/moderation-log"),
        &admin_token,
    )
    .await;
    let log = body_json(response).await;
    let actions: Vec<&str> = log["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["request_changes", "reject"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn zero_credit_company_gets_payment_required(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let scout_token = token("scout-poor", ROLE_SCOUT);
    let company_token = token("company-poor", ROLE_COMPANY);
    let admin_token = token("admin-poor", ROLE_ADMIN);

    post_json(
        app.clone(),
        "/api/v1/scouts",
        &scout_token,
        serde_json::json!({ "name": "Poor Scout", "email": "poor@scout.example.com" }),
    )
    .await;
    post_json(
        app.clone(),
        "/api/v1/companies",
        &company_token,
        serde_json::json!({
            "name": "Poor Buyers",
            "contact_email": "buy@poorbuyers.example.com"
        }),
    )
    .await;

    // Drain the starter credits directly.
    sqlx::query("UPDATE companies SET credits_remaining = 0")
        .execute(&pool)
        .await
        .unwrap();

    let response = post_json(
        app.clone(),
        "/api/v1/leads",
        &scout_token,
        serde_json::json!({
            "category": "Marketing",
            "title": "Rebrand project",
            "description": "Full rebrand for a retail chain.",
            "contact_email": "cmo@retail.example.com"
        }),
    )
    .await;
    let lead = body_json(response).await;
    let lead_id = lead["data"]["id"].as_i64().unwrap();

    post_json(
        app.clone(),
        &format!("/api/v1/leads/{lead_id}/moderate"),
        &admin_token,
        serde_json::json!({ "action": "approve" }),
    )
    .await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/leads/{lead_id}/purchase"),
        &company_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INSUFFICIENT_CREDITS");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_payout_run_settles_an_eligible_scout(pool: PgPool) {
    let provider = std::sync::Arc::new(leadex_payments::MockTransferProvider::new());
    let app = common::build_test_app_with_provider(pool.clone(), provider.clone());
    let scout_token = token("scout-settle", ROLE_SCOUT);
    let admin_token = token("admin-settle", ROLE_ADMIN);

    post_json(
        app.clone(),
        "/api/v1/scouts",
        &scout_token,
        serde_json::json!({ "name": "Settle Scout", "email": "settle@scout.example.com" }),
    )
    .await;
    let response = post_json(
        app.clone(),
        "/api/v1/scouts/me/complete-onboarding",
        &scout_token,
        serde_json::json!({ "payout_account": "acct_settle" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Accrue 25.00 of pending earnings, above the default 20.00 threshold.
    sqlx::query("UPDATE scouts SET pending_earnings_cents = 2500")
        .execute(&pool)
        .await
        .unwrap();

    let response = post_json(
        app.clone(),
        "/api/v1/admin/payouts/run",
        &admin_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let summary = body_json(response).await;
    assert_eq!(summary["data"]["succeeded"], 1);
    assert_eq!(summary["data"]["total_disbursed_cents"], 2500);

    let response = get_auth(app.clone(), "/api/v1/scouts/me/payouts", &scout_token).await;
    let payouts = body_json(response).await;
    assert_eq!(payouts["data"][0]["status"], "completed");
    assert_eq!(payouts["data"][0]["amount_cents"], 2500);

    let response = get_auth(app.clone(), "/api/v1/scouts/me", &scout_token).await;
    let scout = body_json(response).await;
    assert_eq!(scout["data"]["pending_earnings_cents"], 0);
    assert_eq!(scout["data"]["total_earnings_cents"], 2500);
}
