//! Governance parameters and persisted records of the supply engine.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use primitives::{Balance, Rate, ecosystem::params as defaults};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_arithmetic::traits::{One, Zero};

/// Number of slots in the circular monthly ledger.
pub const LEDGER_SLOTS: u32 = 12;

/// Parameter validation failures. Each maps onto a pallet error.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParamsError {
  /// A rate or threshold lies outside [0, 1]
  RateOutOfRange,
  /// Minimum burn rate exceeds maximum burn rate
  BurnRateBoundsInverted,
  /// Target burn rate lies outside [min, max]
  TargetBurnRateOutOfBounds,
  /// Low gas threshold is not strictly below the high gas threshold
  GasThresholdsInverted,
  /// Low activity threshold is not strictly below the high activity threshold
  ActivityThresholdsInverted,
  ZeroInitialSupply,
  ZeroEpochsPerYear,
  ZeroTriggerCount,
  /// Reverse brake enabled with nothing to reduce
  ZeroBrakeReduction,
}

/// Dynamic burn rate bounds and the gas usage band they interpolate over.
#[derive(
  Clone,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
  Serialize,
  Deserialize,
)]
pub struct BurnConfig {
  pub enabled: bool,
  pub min_rate: Rate,
  pub target_rate: Rate,
  pub max_rate: Rate,
  pub low_gas_threshold: Rate,
  pub high_gas_threshold: Rate,
}

impl Default for BurnConfig {
  fn default() -> Self {
    Self {
      enabled: defaults::BURN_ENABLED,
      min_rate: defaults::MIN_BURN_RATE,
      target_rate: defaults::TARGET_BURN_RATE,
      max_rate: defaults::MAX_BURN_RATE,
      low_gas_threshold: defaults::LOW_GAS_THRESHOLD,
      high_gas_threshold: defaults::HIGH_GAS_THRESHOLD,
    }
  }
}

/// Epoch minting budget and its caps.
#[derive(
  Clone,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
  Serialize,
  Deserialize,
)]
pub struct InflationConfig {
  pub enabled: bool,
  /// Annual mint budget as a share of `initial_supply`
  pub max_annual_rate: Rate,
  /// Cap on twelve-period net supply as a share of `initial_supply`
  pub max_net_supply_rate_per_year: Rate,
  pub initial_supply: Balance,
  pub min_gas_usage: Rate,
  pub epochs_per_year: u64,
}

impl Default for InflationConfig {
  fn default() -> Self {
    Self {
      enabled: defaults::INFLATION_ENABLED,
      max_annual_rate: defaults::MAX_ANNUAL_INFLATION_RATE,
      max_net_supply_rate_per_year: defaults::MAX_NET_SUPPLY_RATE_PER_YEAR,
      initial_supply: defaults::INITIAL_SUPPLY,
      min_gas_usage: defaults::MIN_GAS_USAGE_FOR_INFLATION,
      epochs_per_year: defaults::EPOCHS_PER_YEAR,
    }
  }
}

#[derive(
  Clone,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
  Serialize,
  Deserialize,
)]
pub struct ReverseBrakeConfig {
  pub enabled: bool,
  pub trigger_count: u32,
  pub reduction_rate: Rate,
}

impl Default for ReverseBrakeConfig {
  fn default() -> Self {
    Self {
      enabled: defaults::REVERSE_BRAKE_ENABLED,
      trigger_count: defaults::REVERSE_BRAKE_TRIGGER_COUNT,
      reduction_rate: defaults::REVERSE_BRAKE_REDUCTION_RATE,
    }
  }
}

#[derive(
  Clone,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
  Serialize,
  Deserialize,
)]
pub struct IncomeSmootherConfig {
  pub enabled: bool,
  pub contribution_rate: Rate,
  pub release_rate: Rate,
  pub high_activity_threshold: Rate,
  pub low_activity_threshold: Rate,
  /// Buffer capacity as a share of the inflation `initial_supply`
  pub max_buffer_size_ratio: Rate,
}

impl Default for IncomeSmootherConfig {
  fn default() -> Self {
    Self {
      enabled: defaults::INCOME_SMOOTHER_ENABLED,
      contribution_rate: defaults::BUFFER_CONTRIBUTION_RATE,
      release_rate: defaults::BUFFER_RELEASE_RATE,
      high_activity_threshold: defaults::HIGH_ACTIVITY_THRESHOLD,
      low_activity_threshold: defaults::LOW_ACTIVITY_THRESHOLD,
      max_buffer_size_ratio: defaults::MAX_BUFFER_SIZE_RATIO,
    }
  }
}

/// Complete supply policy, replaced as a whole by governance.
#[derive(
  Clone,
  Debug,
  Default,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
  Serialize,
  Deserialize,
)]
pub struct SupplyParams {
  pub burn: BurnConfig,
  pub inflation: InflationConfig,
  pub reverse_brake: ReverseBrakeConfig,
  pub income_smoother: IncomeSmootherConfig,
}

fn ensure_unit(rate: Rate) -> Result<(), ParamsError> {
  if rate > Rate::one() {
    return Err(ParamsError::RateOutOfRange);
  }
  Ok(())
}

impl SupplyParams {
  /// Check every bound. Nothing is clamped: the first violated rule is reported.
  pub fn validate(&self) -> Result<(), ParamsError> {
    let burn = &self.burn;
    for rate in [
      burn.min_rate,
      burn.target_rate,
      burn.max_rate,
      burn.low_gas_threshold,
      burn.high_gas_threshold,
    ] {
      ensure_unit(rate)?;
    }
    if burn.min_rate > burn.max_rate {
      return Err(ParamsError::BurnRateBoundsInverted);
    }
    if burn.target_rate < burn.min_rate || burn.target_rate > burn.max_rate {
      return Err(ParamsError::TargetBurnRateOutOfBounds);
    }
    if burn.low_gas_threshold >= burn.high_gas_threshold {
      return Err(ParamsError::GasThresholdsInverted);
    }

    let inflation = &self.inflation;
    for rate in [
      inflation.max_annual_rate,
      inflation.max_net_supply_rate_per_year,
      inflation.min_gas_usage,
    ] {
      ensure_unit(rate)?;
    }
    if inflation.initial_supply.is_zero() {
      return Err(ParamsError::ZeroInitialSupply);
    }
    if inflation.epochs_per_year == 0 {
      return Err(ParamsError::ZeroEpochsPerYear);
    }

    let brake = &self.reverse_brake;
    if brake.trigger_count == 0 {
      return Err(ParamsError::ZeroTriggerCount);
    }
    ensure_unit(brake.reduction_rate)?;
    if brake.enabled && brake.reduction_rate.is_zero() {
      return Err(ParamsError::ZeroBrakeReduction);
    }

    let smoother = &self.income_smoother;
    for rate in [
      smoother.contribution_rate,
      smoother.release_rate,
      smoother.high_activity_threshold,
      smoother.low_activity_threshold,
      smoother.max_buffer_size_ratio,
    ] {
      ensure_unit(rate)?;
    }
    if smoother.low_activity_threshold >= smoother.high_activity_threshold {
      return Err(ParamsError::ActivityThresholdsInverted);
    }

    Ok(())
  }
}

/// Cumulative burn bookkeeping. `total_burned` never decreases.
#[derive(
  Clone,
  Debug,
  Default,
  Decode,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
  Serialize,
  Deserialize,
)]
pub struct BurnStats {
  pub total_burned: Balance,
  pub last_burn_rate: Rate,
  pub last_epoch_number: u64,
  pub last_block_height: u64,
}

/// Cumulative mint bookkeeping. `annual_minted` restarts every `epochs_per_year` epochs.
#[derive(
  Clone,
  Debug,
  Default,
  Decode,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
  Serialize,
  Deserialize,
)]
pub struct InflationStats {
  pub total_minted: Balance,
  pub annual_minted: Balance,
  pub last_annual_reset_epoch: u64,
  pub last_mint_epoch: u64,
  pub last_mint_block_height: u64,
}

/// Burned and minted totals of the most recent period assigned to a ledger slot.
///
/// A slot is overwritten when a later period with the same index writes to it, so the
/// twelve slots approximate, but are not, a trailing twelve-period window.
#[derive(
  Clone,
  Debug,
  Default,
  Decode,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
  Serialize,
  Deserialize,
)]
pub struct MonthlyLedgerEntry {
  pub month_index: u32,
  /// Absolute period number that currently owns the slot
  pub period: u64,
  pub burned_amount: Balance,
  pub minted_amount: Balance,
  pub start_epoch: u64,
  pub end_epoch: u64,
  pub start_height: u64,
  pub end_height: u64,
}

impl MonthlyLedgerEntry {
  /// Fresh slot content for `period`, opened at `epoch`/`height`.
  pub fn open(month_index: u32, period: u64, epoch: u64, height: u64) -> Self {
    Self {
      month_index,
      period,
      burned_amount: 0,
      minted_amount: 0,
      start_epoch: epoch,
      end_epoch: epoch,
      start_height: height,
      end_height: height,
    }
  }

  /// `minted - burned`, saturating at the `i128` bounds.
  pub fn net_supply(&self) -> i128 {
    to_signed(self.minted_amount).saturating_sub(to_signed(self.burned_amount))
  }
}

pub(crate) fn to_signed(amount: Balance) -> i128 {
  i128::try_from(amount).unwrap_or(i128::MAX)
}

/// Hysteresis state of the reverse brake.
///
/// Active implies a positive `current_reduction`; inactive implies zero reduction and a
/// counter below the trigger count.
#[derive(
  Clone,
  Debug,
  Default,
  Decode,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
  Serialize,
  Deserialize,
)]
pub struct ReverseBrakeState {
  pub consecutive_negative_periods: u32,
  pub is_brake_active: bool,
  pub current_reduction: Rate,
  pub last_check_epoch: u64,
  pub last_net_supply: i128,
}

/// Income smoothing reserve. `total_contributed - total_released == balance`.
#[derive(
  Clone,
  Debug,
  Default,
  Decode,
  Encode,
  Eq,
  PartialEq,
  TypeInfo,
  MaxEncodedLen,
  Serialize,
  Deserialize,
)]
pub struct IncomeBuffer {
  pub balance: Balance,
  pub total_contributed: Balance,
  pub total_released: Balance,
  pub last_contribution_block: u64,
  pub last_release_block: u64,
  pub last_activity_level: Rate,
}

#[derive(Clone, Copy, Debug, Decode, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen)]
pub enum MintTrigger {
  /// Epoch gas usage reached the inflation threshold
  GasUsage,
}

/// Audit entry written once per epoch that actually minted. Never mutated.
#[derive(Clone, Debug, Decode, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen)]
pub struct MintRecord {
  pub epoch_number: u64,
  pub block_height: u64,
  pub minted_amount: Balance,
  pub gas_usage_rate: Rate,
  pub trigger_reason: MintTrigger,
}

/// Activity samples collected over the running epoch.
#[derive(Clone, Debug, Default, Decode, Encode, Eq, PartialEq, TypeInfo, MaxEncodedLen)]
pub struct EpochActivity {
  pub sum: Rate,
  pub samples: u32,
}

impl EpochActivity {
  /// Truncating mean of the samples, `None` when nothing was sampled.
  pub fn mean(&self) -> Option<Rate> {
    if self.samples == 0 {
      return None;
    }
    Some(Rate::from_inner(
      self.sum.into_inner() / u128::from(self.samples),
    ))
  }
}

/// Ledger accounts the engine moves funds between.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Pool {
  /// Transaction fees awaiting burn and distribution; also receives inflation
  FeeCollector,
  /// Income smoothing reserve owned by the pallet
  IncomeBuffer,
}
