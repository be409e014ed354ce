pub mod admin;
pub mod companies;
pub mod health;
pub mod leads;
pub mod notifications;
pub mod scouts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /leads                                  list (role-scoped), submit (scout)
/// /leads/{id}                             get (role-scoped), edit (owning scout)
/// /leads/{id}/moderate                    moderation decision (admin)
/// /leads/{id}/moderation-log              audit trail (admin)
/// /leads/{id}/purchase                    atomic purchase (company)
///
/// /companies                              register profile (company)
/// /companies/me                           get, update profile
/// /companies/me/ledger                    credit transaction history
/// /companies/me/purchases                 purchase history
/// /companies/me/renew                     subscription credit allocation (POST)
///
/// /scouts                                 register profile (scout)
/// /scouts/me                              profile with earnings and badge
/// /scouts/me/complete-onboarding          payout account setup (POST)
/// /scouts/me/leads                        own submissions
/// /scouts/me/sales                        sold leads
/// /scouts/me/payouts                      settlement history
///
/// /admin/payouts/run                      run a settlement batch now (POST)
///
/// /notifications                          list (?unread_only, limit, offset)
/// /notifications/read-all                 mark all read (POST)
/// /notifications/unread-count             unread count (GET)
/// /notifications/{id}/read                mark read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/leads", leads::router())
        .nest("/companies", companies::router())
        .nest("/scouts", scouts::router())
        .nest("/admin", admin::router())
        .nest("/notifications", notifications::router())
}
