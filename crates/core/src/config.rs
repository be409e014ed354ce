//! Marketplace policy configuration.
//!
//! Every numeric business policy (prices, commission rate, payout threshold,
//! quality weights, badge thresholds, plan allocations) is overridable via
//! environment variables and carried in an explicit [`MarketplaceConfig`]
//! constructed once at process start. Components never read the environment
//! themselves.

use std::collections::HashMap;

use crate::money::{from_major_units, Cents};

/// Weights and thresholds for lead quality scoring.
///
/// Weights are percentages and should sum to 100.
#[derive(Debug, Clone)]
pub struct QualityWeights {
    pub description: u32,
    pub contact: u32,
    pub budget: u32,
    pub photos: u32,
    pub reputation: u32,
    /// Description length at which the length score starts rising above 0.
    pub description_min_len: usize,
    /// Description length at which the length score reaches 100.
    pub description_excellent_len: usize,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            description: 25,
            contact: 20,
            budget: 15,
            photos: 10,
            reputation: 30,
            description_min_len: 50,
            description_excellent_len: 400,
        }
    }
}

/// Weights and targets for scout reputation scoring.
#[derive(Debug, Clone)]
pub struct ReputationWeights {
    pub conversion: u32,
    pub approval: u32,
    pub quality: u32,
    /// Sold/submitted ratio that earns a full conversion score.
    pub target_conversion_rate: f64,
    /// Approved/submitted ratio that earns a full approval score.
    pub target_approval_rate: f64,
}

impl Default for ReputationWeights {
    fn default() -> Self {
        Self {
            conversion: 40,
            approval: 30,
            quality: 30,
            target_conversion_rate: 0.6,
            target_approval_rate: 0.9,
        }
    }
}

/// Lifetime-sales thresholds for badge tiers. Bronze starts at zero.
#[derive(Debug, Clone)]
pub struct BadgeThresholds {
    pub silver: i64,
    pub gold: i64,
    pub platinum: i64,
}

impl Default for BadgeThresholds {
    fn default() -> Self {
        Self {
            silver: 20,
            gold: 50,
            platinum: 100,
        }
    }
}

/// All marketplace business policy, injected into every component.
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    /// Category name -> sale price in cents.
    pub lead_prices: HashMap<String, Cents>,
    /// Price in cents for categories not present in the table.
    pub default_lead_price: Cents,
    /// Fraction of the sale price paid to the scout, in (0, 1).
    pub commission_rate: f64,
    /// Minimum pending earnings (cents) before a scout is settled.
    pub payout_threshold_cents: Cents,
    /// Payout batch period in seconds (default: weekly).
    pub payout_interval_secs: u64,
    pub quality: QualityWeights,
    pub reputation: ReputationWeights,
    pub badges: BadgeThresholds,
    /// Subscription plan name -> credits allocated per period.
    pub plan_credits: HashMap<String, i64>,
}

/// Default payout interval: one week.
const DEFAULT_PAYOUT_INTERVAL_SECS: u64 = 604_800;

impl Default for MarketplaceConfig {
    fn default() -> Self {
        let lead_prices = [
            ("IT Services", 30),
            ("Marketing", 25),
            ("Construction", 35),
            ("Finance", 40),
        ]
        .into_iter()
        .map(|(cat, units)| (cat.to_string(), from_major_units(units)))
        .collect();

        let plan_credits = [("starter", 10), ("growth", 50), ("scale", 200)]
            .into_iter()
            .map(|(plan, credits)| (plan.to_string(), credits))
            .collect();

        Self {
            lead_prices,
            default_lead_price: from_major_units(20),
            commission_rate: 0.5,
            payout_threshold_cents: from_major_units(20),
            payout_interval_secs: DEFAULT_PAYOUT_INTERVAL_SECS,
            quality: QualityWeights::default(),
            reputation: ReputationWeights::default(),
            badges: BadgeThresholds::default(),
            plan_credits,
        }
    }
}

impl MarketplaceConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults above for anything unset.
    ///
    /// | Env Var                            | Format                        |
    /// |------------------------------------|-------------------------------|
    /// | `LEAD_PRICES`                      | `Category=30,Other=25` (units)|
    /// | `LEAD_PRICE_DEFAULT`               | whole units                   |
    /// | `COMMISSION_RATE`                  | fraction in (0, 1)            |
    /// | `PAYOUT_THRESHOLD`                 | whole units                   |
    /// | `PAYOUT_INTERVAL_SECS`             | seconds                       |
    /// | `QUALITY_WEIGHT_DESCRIPTION` etc.  | percentage                    |
    /// | `QUALITY_DESCRIPTION_MIN_LEN`      | characters                    |
    /// | `QUALITY_DESCRIPTION_EXCELLENT_LEN`| characters                    |
    /// | `REPUTATION_WEIGHT_CONVERSION` etc.| percentage                    |
    /// | `TARGET_CONVERSION_RATE`           | fraction                      |
    /// | `TARGET_APPROVAL_RATE`             | fraction                      |
    /// | `BADGE_THRESHOLDS`                 | `20,50,100` (silver,gold,plat)|
    /// | `PLAN_CREDITS`                     | `starter=10,growth=50`        |
    ///
    /// # Panics
    ///
    /// Panics on malformed values or a commission rate outside (0, 1) --
    /// misconfigured money policy must not boot.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = std::env::var("LEAD_PRICES") {
            config.lead_prices = parse_price_table(&raw);
        }
        if let Some(units) = env_parse::<i64>("LEAD_PRICE_DEFAULT") {
            config.default_lead_price = from_major_units(units);
        }
        if let Some(rate) = env_parse::<f64>("COMMISSION_RATE") {
            config.commission_rate = rate;
        }
        if let Some(units) = env_parse::<i64>("PAYOUT_THRESHOLD") {
            config.payout_threshold_cents = from_major_units(units);
        }
        if let Some(secs) = env_parse::<u64>("PAYOUT_INTERVAL_SECS") {
            config.payout_interval_secs = secs;
        }

        if let Some(w) = env_parse::<u32>("QUALITY_WEIGHT_DESCRIPTION") {
            config.quality.description = w;
        }
        if let Some(w) = env_parse::<u32>("QUALITY_WEIGHT_CONTACT") {
            config.quality.contact = w;
        }
        if let Some(w) = env_parse::<u32>("QUALITY_WEIGHT_BUDGET") {
            config.quality.budget = w;
        }
        if let Some(w) = env_parse::<u32>("QUALITY_WEIGHT_PHOTOS") {
            config.quality.photos = w;
        }
        if let Some(w) = env_parse::<u32>("QUALITY_WEIGHT_REPUTATION") {
            config.quality.reputation = w;
        }
        if let Some(len) = env_parse::<usize>("QUALITY_DESCRIPTION_MIN_LEN") {
            config.quality.description_min_len = len;
        }
        if let Some(len) = env_parse::<usize>("QUALITY_DESCRIPTION_EXCELLENT_LEN") {
            config.quality.description_excellent_len = len;
        }

        if let Some(w) = env_parse::<u32>("REPUTATION_WEIGHT_CONVERSION") {
            config.reputation.conversion = w;
        }
        if let Some(w) = env_parse::<u32>("REPUTATION_WEIGHT_APPROVAL") {
            config.reputation.approval = w;
        }
        if let Some(w) = env_parse::<u32>("REPUTATION_WEIGHT_QUALITY") {
            config.reputation.quality = w;
        }
        if let Some(rate) = env_parse::<f64>("TARGET_CONVERSION_RATE") {
            config.reputation.target_conversion_rate = rate;
        }
        if let Some(rate) = env_parse::<f64>("TARGET_APPROVAL_RATE") {
            config.reputation.target_approval_rate = rate;
        }

        if let Ok(raw) = std::env::var("BADGE_THRESHOLDS") {
            config.badges = parse_badge_thresholds(&raw);
        }
        if let Ok(raw) = std::env::var("PLAN_CREDITS") {
            config.plan_credits = parse_plan_table(&raw);
        }

        assert!(
            config.commission_rate > 0.0 && config.commission_rate < 1.0,
            "COMMISSION_RATE must be strictly between 0 and 1, got {}",
            config.commission_rate
        );
        assert!(
            config.quality.description_excellent_len > config.quality.description_min_len,
            "QUALITY_DESCRIPTION_EXCELLENT_LEN must exceed QUALITY_DESCRIPTION_MIN_LEN"
        );

        config
    }
}

/// Parse an env var into `T`, panicking on malformed input.
fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().map(|raw| {
        raw.parse()
            .unwrap_or_else(|_| panic!("{name} has a malformed value: {raw:?}"))
    })
}

/// Parse `Category=30,Other=25` into a cents price table.
fn parse_price_table(raw: &str) -> HashMap<String, Cents> {
    parse_pairs(raw, "LEAD_PRICES")
        .map(|(name, units)| (name, from_major_units(units)))
        .collect()
}

/// Parse `starter=10,growth=50` into a plan allocation table.
fn parse_plan_table(raw: &str) -> HashMap<String, i64> {
    parse_pairs(raw, "PLAN_CREDITS").collect()
}

fn parse_pairs<'a>(raw: &'a str, var: &'a str) -> impl Iterator<Item = (String, i64)> + 'a {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(move |entry| {
            let (name, value) = entry
                .split_once('=')
                .unwrap_or_else(|| panic!("{var} entry must be name=value, got {entry:?}"));
            let value: i64 = value
                .trim()
                .parse()
                .unwrap_or_else(|_| panic!("{var} value must be an integer, got {entry:?}"));
            (name.trim().to_string(), value)
        })
}

/// Parse `20,50,100` into silver/gold/platinum thresholds.
fn parse_badge_thresholds(raw: &str) -> BadgeThresholds {
    let parts: Vec<i64> = raw
        .split(',')
        .map(|p| {
            p.trim()
                .parse()
                .unwrap_or_else(|_| panic!("BADGE_THRESHOLDS must be three integers, got {raw:?}"))
        })
        .collect();
    assert!(
        parts.len() == 3 && parts[0] < parts[1] && parts[1] < parts[2],
        "BADGE_THRESHOLDS must be three ascending integers, got {raw:?}"
    );
    BadgeThresholds {
        silver: parts[0],
        gold: parts[1],
        platinum: parts[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_policy() {
        let config = MarketplaceConfig::default();
        assert_eq!(config.lead_prices["IT Services"], 3000);
        assert_eq!(config.default_lead_price, 2000);
        assert_eq!(config.commission_rate, 0.5);
        assert_eq!(config.payout_threshold_cents, 2000);
        assert_eq!(config.payout_interval_secs, 604_800);
        assert_eq!(config.plan_credits["growth"], 50);
    }

    #[test]
    fn default_quality_weights_sum_to_100() {
        let q = QualityWeights::default();
        assert_eq!(
            q.description + q.contact + q.budget + q.photos + q.reputation,
            100
        );
    }

    #[test]
    fn default_reputation_weights_sum_to_100() {
        let r = ReputationWeights::default();
        assert_eq!(r.conversion + r.approval + r.quality, 100);
    }

    #[test]
    fn parses_price_table() {
        let table = parse_price_table("IT Services=30, Legal=45");
        assert_eq!(table["IT Services"], 3000);
        assert_eq!(table["Legal"], 4500);
    }

    #[test]
    fn parses_badge_thresholds() {
        let b = parse_badge_thresholds("10, 30, 90");
        assert_eq!(b.silver, 10);
        assert_eq!(b.gold, 30);
        assert_eq!(b.platinum, 90);
    }

    #[test]
    #[should_panic(expected = "ascending")]
    fn rejects_unordered_badge_thresholds() {
        parse_badge_thresholds("50,20,100");
    }

    #[test]
    #[should_panic(expected = "name=value")]
    fn rejects_malformed_plan_entry() {
        parse_plan_table("starter:10");
    }
}
