//! Shared fixtures for the settlement engine integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use sqlx::PgPool;

use leadex_core::config::MarketplaceConfig;
use leadex_core::lifecycle::{ACTION_APPROVE, MODERATION_APPROVED, STATUS_APPROVED};
use leadex_db::models::company::{Company, CreateCompany};
use leadex_db::models::credit_transaction::KIND_ALLOCATION;
use leadex_db::models::lead::{CreateLead, Lead};
use leadex_db::models::scout::{CreateScout, Scout};
use leadex_db::repositories::{CompanyRepo, LeadRepo, LedgerRepo, ModerationLogRepo, ScoutRepo};
use leadex_events::EventBus;

/// A default config with the stock price table and thresholds.
pub fn config() -> MarketplaceConfig {
    MarketplaceConfig::default()
}

/// A fresh bus with no subscribers (events are dropped, which is fine
/// for these tests).
pub fn bus() -> Arc<EventBus> {
    Arc::new(EventBus::default())
}

/// Create a company and allocate it `credits` through the ledger.
pub async fn seed_company(pool: &PgPool, external_id: &str, credits: i64) -> Company {
    let company = CompanyRepo::create(
        pool,
        &CreateCompany {
            external_user_id: external_id.to_string(),
            name: format!("{external_id} Inc"),
            contact_email: format!("{external_id}@buyer.example.com"),
            subscription_plan: None,
            matching_preferences: None,
        },
    )
    .await
    .expect("company insert");

    if credits > 0 {
        LedgerRepo::add(pool, company.id, credits, KIND_ALLOCATION, "Initial allocation")
            .await
            .expect("credit allocation");
    }
    CompanyRepo::find_by_id(pool, company.id)
        .await
        .expect("company reload")
        .expect("company exists")
}

/// Create a scout.
pub async fn seed_scout(pool: &PgPool, external_id: &str) -> Scout {
    ScoutRepo::create(
        pool,
        &CreateScout {
            external_user_id: external_id.to_string(),
            name: format!("Scout {external_id}"),
            email: format!("{external_id}@scout.example.com"),
        },
    )
    .await
    .expect("scout insert")
}

/// Submit a lead for `scout_id` and moderate it to `approved`, fixing the
/// sale price the way the moderation handler does.
pub async fn seed_approved_lead(pool: &PgPool, scout_id: i64, category: &str) -> Lead {
    let lead = LeadRepo::create(
        pool,
        scout_id,
        &CreateLead {
            category: category.to_string(),
            title: "ERP replacement project".to_string(),
            description: "Mid-market firm replacing their ERP next quarter.".to_string(),
            contact_email: "it-director@prospect.example.com".to_string(),
            contact_phone: Some("+1 555 010 2030".to_string()),
            contact_website: None,
            budget_cents: Some(1_000_000),
            photo_urls: Vec::new(),
        },
        6.5,
    )
    .await
    .expect("lead insert");

    let price = leadex_core::pricing::price_for_category(&config(), category);
    let mut tx = pool.begin().await.expect("begin");
    let lead = LeadRepo::apply_moderation(
        &mut tx,
        lead.id,
        STATUS_APPROVED,
        MODERATION_APPROVED,
        Some(price),
    )
    .await
    .expect("moderation update")
    .expect("lead was pending review");
    ModerationLogRepo::insert_in_tx(&mut tx, lead.id, "admin-fixture", ACTION_APPROVE, None)
        .await
        .expect("moderation log");
    tx.commit().await.expect("commit");
    lead
}

/// Put `amount_cents` of pending earnings on a scout, as accumulated
/// sales would.
pub async fn seed_pending_earnings(pool: &PgPool, scout_id: i64, amount_cents: i64) {
    sqlx::query("UPDATE scouts SET pending_earnings_cents = $2 WHERE id = $1")
        .bind(scout_id)
        .bind(amount_cents)
        .execute(pool)
        .await
        .expect("seed pending earnings");
}

/// Complete a scout's onboarding with a payout destination.
pub async fn complete_onboarding(pool: &PgPool, scout_id: i64, account: &str) -> Scout {
    ScoutRepo::complete_onboarding(pool, scout_id, account)
        .await
        .expect("onboarding update")
        .expect("scout exists")
}
