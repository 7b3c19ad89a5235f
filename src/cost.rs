//! Storage cost projection.
//!
//! A flat per-GB monthly rate applied to the bytes held by every version.
//! This is an estimate for the operator, not a billing figure.

pub const BYTES_PER_GB: f64 = 1e9;
pub const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostEstimate {
    pub monthly: f64,
    pub daily: f64,
}

/// Estimated storage cost of `version_bytes` at `price_per_gb_month`.
///
/// ```
/// use s3r_rs::cost::estimate;
///
/// let cost = estimate(1000, 0.03);
/// assert_eq!(cost.monthly, 1000.0 / 1e9 * 0.03);
/// assert_eq!(estimate(0, 0.03).daily, 0.0);
/// ```
pub fn estimate(version_bytes: u64, price_per_gb_month: f64) -> CostEstimate {
    let monthly = version_bytes as f64 / BYTES_PER_GB * price_per_gb_month;

    CostEstimate {
        monthly,
        daily: monthly / DAYS_PER_MONTH,
    }
}
