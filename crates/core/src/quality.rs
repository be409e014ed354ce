//! Lead quality and scout reputation scoring.
//!
//! Both scores are 0-10 with one decimal place. Component scores are
//! computed on a 0-100 scale, blended by the configured percentage
//! weights, then divided by 10 and rounded once.

use crate::config::{QualityWeights, ReputationWeights};

/// Inputs for scoring a lead at submission (or re-scoring on edit).
#[derive(Debug, Clone)]
pub struct LeadQualityInput<'a> {
    pub description: &'a str,
    pub has_email: bool,
    pub has_phone: bool,
    pub has_website: bool,
    pub has_budget: bool,
    pub photo_count: usize,
    /// The submitting scout's current reputation (0-10).
    pub scout_reputation: f64,
}

/// Round to one decimal place.
fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Description-length component: linear ramp from 0 at `min_len` to 100
/// at `excellent_len`, clipped to [0, 100].
fn description_score(len: usize, min_len: usize, excellent_len: usize) -> f64 {
    if len <= min_len {
        return 0.0;
    }
    if len >= excellent_len {
        return 100.0;
    }
    (len - min_len) as f64 / (excellent_len - min_len) as f64 * 100.0
}

/// Contact-completeness component: email 40, phone 30, website 30.
fn contact_score(has_email: bool, has_phone: bool, has_website: bool) -> f64 {
    let mut score = 0.0;
    if has_email {
        score += 40.0;
    }
    if has_phone {
        score += 30.0;
    }
    if has_website {
        score += 30.0;
    }
    score
}

/// Photo-count component: stepped at 0 / 30 / 60 / 100.
fn photo_score(count: usize) -> f64 {
    match count {
        0 => 0.0,
        1 => 30.0,
        2 => 60.0,
        _ => 100.0,
    }
}

/// Compute a lead's quality score (0-10, one decimal).
pub fn lead_quality_score(input: &LeadQualityInput<'_>, weights: &QualityWeights) -> f64 {
    let description = description_score(
        input.description.chars().count(),
        weights.description_min_len,
        weights.description_excellent_len,
    );
    let contact = contact_score(input.has_email, input.has_phone, input.has_website);
    let budget = if input.has_budget { 100.0 } else { 0.0 };
    let photos = photo_score(input.photo_count);
    let reputation = input.scout_reputation * 10.0;

    let blended = (description * weights.description as f64
        + contact * weights.contact as f64
        + budget * weights.budget as f64
        + photos * weights.photos as f64
        + reputation * weights.reputation as f64)
        / 100.0;

    round1(blended / 10.0)
}

/// Score a ratio against a target: `min(10, ratio / target * 10)`.
fn ratio_score(numerator: i64, denominator: i64, target: f64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    let ratio = numerator as f64 / denominator as f64;
    (ratio / target * 10.0).min(10.0)
}

/// Compute a scout's reputation score (0-10, one decimal) from lifetime
/// counters and the average quality of their leads.
///
/// A scout with zero submissions scores 0 on both the conversion and
/// approval components.
pub fn scout_reputation_score(
    total_sold: i64,
    total_approved: i64,
    total_submitted: i64,
    avg_lead_quality: f64,
    weights: &ReputationWeights,
) -> f64 {
    let conversion = ratio_score(total_sold, total_submitted, weights.target_conversion_rate);
    let approval = ratio_score(total_approved, total_submitted, weights.target_approval_rate);

    let blended = (conversion * weights.conversion as f64
        + approval * weights.approval as f64
        + avg_lead_quality * weights.quality as f64)
        / 100.0;

    round1(blended)
}
