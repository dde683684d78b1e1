//! Pure fixed-point arithmetic shared by the burn, smoothing and inflation paths.
//!
//! Every amount product truncates towards zero so that all replicas agree on the result.

use crate::types::{BurnConfig, LEDGER_SLOTS, ReverseBrakeConfig, ReverseBrakeState};
use primitives::{Balance, Rate};
use sp_arithmetic::{
  FixedPointNumber, Rounding,
  helpers_128bit::multiply_by_rational_with_rounding,
  traits::{One, Saturating, Zero},
};

/// `floor(amount * rate)`, saturating at `Balance::MAX`.
pub fn mul_floor(amount: Balance, rate: Rate) -> Balance {
  multiply_by_rational_with_rounding(amount, rate.into_inner(), Rate::DIV, Rounding::Down)
    .unwrap_or(Balance::MAX)
}

/// `floor(a * b)` in rate space.
pub fn rate_mul(a: Rate, b: Rate) -> Rate {
  Rate::from_inner(mul_floor(a.into_inner(), b))
}

/// `floor(numerator / denominator)` in rate space, `None` for a zero denominator.
pub fn rate_div(numerator: Rate, denominator: Rate) -> Option<Rate> {
  if denominator.is_zero() {
    return None;
  }
  multiply_by_rational_with_rounding(
    numerator.into_inner(),
    Rate::DIV,
    denominator.into_inner(),
    Rounding::Down,
  )
  .map(Rate::from_inner)
}

/// Base burn rate for an activity level, before any brake reduction.
///
/// Piecewise linear: `min -> target` below the low threshold, flat `target` inside the band,
/// `target -> max` above the high threshold. Continuous at both thresholds and
/// non-decreasing in `level`.
pub fn interpolate_burn_rate(config: &BurnConfig, level: Rate) -> Rate {
  let level = level.min(Rate::one());
  if level < config.low_gas_threshold {
    let progress = rate_div(level, config.low_gas_threshold).unwrap_or_else(Rate::zero);
    let span = config.target_rate.saturating_sub(config.min_rate);
    config.min_rate.saturating_add(rate_mul(span, progress))
  } else if level > config.high_gas_threshold {
    let above = level.saturating_sub(config.high_gas_threshold);
    let headroom = Rate::one().saturating_sub(config.high_gas_threshold);
    let progress = rate_div(above, headroom)
      .unwrap_or_else(Rate::one)
      .min(Rate::one());
    let span = config.max_rate.saturating_sub(config.target_rate);
    config.target_rate.saturating_add(rate_mul(span, progress))
  } else {
    config.target_rate
  }
}

/// Lower `rate` by the active brake reduction, never below `min_rate`.
pub fn apply_reverse_brake(
  rate: Rate,
  min_rate: Rate,
  config: &ReverseBrakeConfig,
  state: &ReverseBrakeState,
) -> Rate {
  if !config.enabled || !state.is_brake_active || state.current_reduction.is_zero() {
    return rate;
  }
  rate.saturating_sub(state.current_reduction).max(min_rate)
}

/// Share of the per-epoch budget unlocked by `gas_usage_rate`, linear in
/// `[min_gas_usage, 1]` and clamped to `[0, 1]`.
pub fn inflation_scale(gas_usage_rate: Rate, min_gas_usage: Rate) -> Rate {
  if gas_usage_rate < min_gas_usage {
    return Rate::zero();
  }
  let headroom = Rate::one().saturating_sub(min_gas_usage);
  if headroom.is_zero() {
    return Rate::one();
  }
  rate_div(gas_usage_rate.saturating_sub(min_gas_usage), headroom)
    .unwrap_or_else(Rate::one)
    .min(Rate::one())
}

/// Absolute ledger period an epoch belongs to.
pub fn ledger_period(epoch: u64, epochs_per_year: u64) -> u64 {
  epoch / (epochs_per_year / u64::from(LEDGER_SLOTS)).max(1)
}

/// Ledger slot owned by a period.
pub fn ledger_slot(period: u64) -> u32 {
  (period % u64::from(LEDGER_SLOTS)) as u32
}

/// Clamp a raw activity reading into `[0, 1]`.
pub fn clamp_unit(level: Rate) -> Rate {
  level.min(Rate::one())
}
