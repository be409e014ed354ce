//! Lead pricing and commission splitting.
//!
//! Pure functions over the configured category price table and commission
//! rate. The split is computed so that the two parts always sum to the
//! sale price exactly: the scout's share is rounded half-up once, and the
//! platform's share is the remainder.

use crate::config::MarketplaceConfig;
use crate::money::{apply_rate_half_up, Cents};

/// The two sides of a sale price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionSplit {
    pub scout_earning: Cents,
    pub platform_commission: Cents,
}

/// Sale price for a lead category, falling back to the default price for
/// categories not present in the configured table.
pub fn price_for_category(config: &MarketplaceConfig, category: &str) -> Cents {
    config
        .lead_prices
        .get(category)
        .copied()
        .unwrap_or(config.default_lead_price)
}

/// Split a sale price between scout and platform at the given rate.
///
/// The platform commission is derived by subtraction, never rounded
/// independently, so `scout_earning + platform_commission == sale_price`
/// holds for every price and rate.
pub fn split(sale_price: Cents, commission_rate: f64) -> CommissionSplit {
    let scout_earning = apply_rate_half_up(sale_price, commission_rate);
    CommissionSplit {
        scout_earning,
        platform_commission: sale_price - scout_earning,
    }
}
