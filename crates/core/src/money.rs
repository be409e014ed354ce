//! Integer-cent money arithmetic.
//!
//! Every monetary amount in Leadex is carried as whole cents (`Cents`),
//! so ledger sums and commission splits are exact. Rounding happens at
//! exactly one point (rate application) with half-up semantics and is
//! never re-applied downstream.

/// A monetary amount in minor units (cents). Always non-negative in
/// stored entities; signed so ledger deltas can be expressed directly.
pub type Cents = i64;

/// Basis points per whole unit. Commission rates are snapped to basis
/// points before application so the arithmetic stays in integers.
const BASIS_POINTS: i64 = 10_000;

/// Convert whole currency units to cents.
pub fn from_major_units(units: i64) -> Cents {
    units * 100
}

/// Apply a fractional rate to an amount, rounding half-up to the cent.
///
/// `amount` must be non-negative. The rate is snapped to the nearest
/// basis point (0.01%), which is finer than any configured commission
/// rate, and the product is rounded half-up in integer arithmetic.
pub fn apply_rate_half_up(amount: Cents, rate: f64) -> Cents {
    debug_assert!(amount >= 0, "apply_rate_half_up expects a non-negative amount");
    let rate_bp = (rate * BASIS_POINTS as f64).round() as i64;
    (amount * rate_bp + BASIS_POINTS / 2) / BASIS_POINTS
}

/// Format cents as a human-readable decimal string, e.g. `1550` -> `"15.50"`.
pub fn format_cents(amount: Cents) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_units_to_cents() {
        assert_eq!(from_major_units(30), 3000);
        assert_eq!(from_major_units(0), 0);
    }

    #[test]
    fn half_rate_splits_evenly() {
        assert_eq!(apply_rate_half_up(3000, 0.5), 1500);
    }

    #[test]
    fn odd_cent_rounds_half_up() {
        // 33 * 0.5 = 16.5 cents -> 17
        assert_eq!(apply_rate_half_up(33, 0.5), 17);
    }

    #[test]
    fn uneven_rate() {
        // 1000 * 0.333 = 333.0
        assert_eq!(apply_rate_half_up(1000, 0.333), 333);
        // 100 * 0.335 = 33.5 -> 34
        assert_eq!(apply_rate_half_up(100, 0.335), 34);
    }

    #[test]
    fn zero_amount() {
        assert_eq!(apply_rate_half_up(0, 0.5), 0);
    }

    #[test]
    fn formats_with_two_decimals() {
        assert_eq!(format_cents(1550), "15.50");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(-250), "-2.50");
        assert_eq!(format_cents(0), "0.00");
    }
}
