//! The atomic lead purchase.
//!
//! One database transaction covers the whole sale: lock lead, company,
//! and scout rows (always in that order), check every precondition, then
//! deduct the credit, flip the lead to `sold`, insert the purchase
//! record, and accrue the scout's earning and badge. Notifications are
//! published only after the transaction commits, so their failure can
//! never roll back money movement.

use leadex_core::badge::{badge_for_sold, effective_badge};
use leadex_core::config::MarketplaceConfig;
use leadex_core::error::CoreError;
use leadex_core::lifecycle::{self, STATUS_APPROVED};
use leadex_core::money::format_cents;
use leadex_core::pricing::{price_for_category, split};
use leadex_core::types::DbId;
use leadex_db::error::DbError;
use leadex_db::models::credit_transaction::KIND_PURCHASE;
use leadex_db::models::purchase::Purchase;
use leadex_db::repositories::{
    CompanyRepo, LeadRepo, LedgerRepo, ModerationLogRepo, PurchaseRepo, ScoutRepo,
};
use leadex_db::DbPool;
use leadex_events::{EventBus, MarketEvent};

/// One lead costs one credit.
const LEAD_CREDIT_COST: i64 = 1;

/// Moderation-log action recorded for the `approved -> sold` transition.
const LOG_ACTION_PURCHASE: &str = "purchase";

/// Executes lead purchases.
pub struct PurchaseService;

impl PurchaseService {
    /// Purchase `lead_id` on behalf of `company_id`.
    ///
    /// Succeeds only if, under the row locks: the lead is approved and
    /// unsold, the company holds at least one credit, and the buyer is
    /// not the lead's own submitter (compared by contact email). Any
    /// precondition failure rejects the whole operation with no partial
    /// effect. Two concurrent calls on the same lead serialize on the
    /// lead row lock; exactly one succeeds.
    pub async fn purchase(
        pool: &DbPool,
        config: &MarketplaceConfig,
        bus: &EventBus,
        lead_id: DbId,
        company_id: DbId,
    ) -> Result<Purchase, DbError> {
        let mut tx = pool.begin().await?;

        // Lock order: lead, then company, then scout. Every writer of
        // these rows takes them in the same order.
        let lead = LeadRepo::find_by_id_for_update(&mut tx, lead_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Lead",
                id: lead_id,
            })?;

        if !lifecycle::is_purchasable(&lead.status, lead.purchased_by) {
            let reason = if lead.purchased_by.is_some() {
                format!("lead {lead_id} has already been sold")
            } else {
                format!(
                    "lead {lead_id} is not available for purchase (status: {})",
                    lead.status
                )
            };
            return Err(CoreError::InvalidState(reason).into());
        }
        debug_assert_eq!(lead.status, STATUS_APPROVED);

        let company = CompanyRepo::find_by_id_for_update(&mut tx, company_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Company",
                id: company_id,
            })?;

        if company.credits_remaining < LEAD_CREDIT_COST {
            return Err(CoreError::InsufficientCredits {
                required: LEAD_CREDIT_COST,
                available: company.credits_remaining,
            }
            .into());
        }

        let scout = ScoutRepo::find_by_id_for_update(&mut tx, lead.scout_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Scout",
                id: lead.scout_id,
            })?;

        // Self-purchase check is by email equality, matching the
        // submitter-vs-buyer comparison companies onboarded under.
        if company.contact_email.eq_ignore_ascii_case(&scout.email) {
            return Err(
                CoreError::Forbidden("a submitter cannot purchase their own lead".into()).into(),
            );
        }

        // The sale price was fixed from the category table at approval;
        // leads approved before a price table existed fall back to it now.
        let sale_price = lead
            .sale_price_cents
            .unwrap_or_else(|| price_for_category(config, &lead.category));
        let commission = split(sale_price, config.commission_rate);

        // All preconditions hold; apply the mutations.
        let sold = LeadRepo::mark_sold_in_tx(&mut tx, lead_id, company_id).await?;
        if !sold {
            return Err(
                CoreError::InvalidState(format!("lead {lead_id} has already been sold")).into(),
            );
        }

        let purchase = PurchaseRepo::insert_in_tx(
            &mut tx,
            company_id,
            lead_id,
            scout.id,
            sale_price,
            commission.scout_earning,
            commission.platform_commission,
        )
        .await?;

        LedgerRepo::deduct_in_tx(
            &mut tx,
            company_id,
            LEAD_CREDIT_COST,
            KIND_PURCHASE,
            &format!("Purchase of lead {lead_id}"),
            Some(purchase.id),
        )
        .await?;

        let new_badge = effective_badge(
            &scout.badge,
            badge_for_sold(scout.total_leads_sold + 1, &config.badges),
        )
        .to_string();
        ScoutRepo::apply_sale_in_tx(&mut tx, scout.id, commission.scout_earning, &new_badge)
            .await?;

        ModerationLogRepo::insert_in_tx(
            &mut tx,
            lead_id,
            &company.external_user_id,
            LOG_ACTION_PURCHASE,
            None,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            lead_id,
            company_id,
            scout_id = scout.id,
            purchase_id = purchase.id,
            sale_price = %format_cents(sale_price),
            "Lead purchased"
        );

        // Best-effort side effects, strictly after commit.
        bus.publish(MarketEvent::LeadSold {
            lead_id,
            scout_id: scout.id,
            company_id,
            sale_price_cents: sale_price,
            scout_earning_cents: commission.scout_earning,
        });

        Ok(purchase)
    }
}
