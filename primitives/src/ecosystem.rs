//! Ecosystem Constants for the dynamic supply engine
//!
//! This module centralizes the system-level constants shared between the supply pallet,
//! its mock runtime and any runtime that wires it in: pallet IDs, the fixed-point rate
//! type and the default economic parameters.
//!
//! These constants are the single source of truth for the default supply policy.

use sp_arithmetic::FixedU128;

/// Balance type alias for consistency across ecosystem
pub type Balance = u128;

/// Fixed-point rate with 18 decimal places.
///
/// Every burn rate, threshold, activity level and inflation ratio is expressed in this
/// type so that all replicas compute bit-identical results.
pub type Rate = FixedU128;

/// Inner representation of `Rate` equal to 1.0.
const RATE_ACCURACY: u128 = 1_000_000_000_000_000_000;

/// Inner representation of `Rate` equal to 0.01.
const ONE_PERCENT: u128 = RATE_ACCURACY / 100;

/// Build a `Rate` from whole percent (`percent(30)` == 0.30).
pub const fn percent(n: u128) -> Rate {
  FixedU128::from_inner(n * ONE_PERCENT)
}

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// These IDs are used by Polkadot SDK's `PalletId::into_account_truncating()`
/// to deterministically generate accounts for pallet-specific operations.
pub mod pallet_ids {
  /// Dynamic Supply pallet ID (income buffer and mint routing)
  pub const DYNAMIC_SUPPLY_PALLET_ID: &[u8; 8] = b"dynsuply";
}

/// Default supply policy.
///
/// Governance can replace every value at runtime through `set_params`; these are only the
/// genesis defaults.
pub mod params {
  use super::{Balance, Rate, percent};

  /// Native token decimals scalar (10^6 base units per token).
  pub const UNITS: Balance = 1_000_000;

  /// Burning is active from genesis.
  pub const BURN_ENABLED: bool = true;

  /// Floor of the dynamic burn rate (30%).
  pub const MIN_BURN_RATE: Rate = percent(30);

  /// Burn rate inside the normal activity band (50%).
  pub const TARGET_BURN_RATE: Rate = percent(50);

  /// Ceiling of the dynamic burn rate (60%).
  pub const MAX_BURN_RATE: Rate = percent(60);

  /// Below this gas usage the burn rate slides towards the minimum (30%).
  pub const LOW_GAS_THRESHOLD: Rate = percent(30);

  /// Above this gas usage the burn rate climbs towards the maximum (70%).
  pub const HIGH_GAS_THRESHOLD: Rate = percent(70);

  /// Inflation minting is active from genesis.
  pub const INFLATION_ENABLED: bool = true;

  /// Annual mint budget as a share of the initial supply (3%).
  pub const MAX_ANNUAL_INFLATION_RATE: Rate = percent(3);

  /// Cap on twelve-period net supply growth as a share of the initial supply (5%).
  pub const MAX_NET_SUPPLY_RATE_PER_YEAR: Rate = percent(5);

  /// Initial supply: 500M tokens.
  pub const INITIAL_SUPPLY: Balance = 500_000_000 * UNITS;

  /// Minimum epoch gas usage before anything is minted (50%).
  pub const MIN_GAS_USAGE_FOR_INFLATION: Rate = percent(50);

  /// One epoch per day.
  pub const EPOCHS_PER_YEAR: u64 = 365;

  /// Reverse brake is armed from genesis.
  pub const REVERSE_BRAKE_ENABLED: bool = true;

  /// Consecutive negative net-supply epochs needed to engage the brake.
  pub const REVERSE_BRAKE_TRIGGER_COUNT: u32 = 3;

  /// Burn rate reduction while the brake is engaged (10 percentage points).
  pub const REVERSE_BRAKE_REDUCTION_RATE: Rate = percent(10);

  /// Income smoothing ships disabled.
  pub const INCOME_SMOOTHER_ENABLED: bool = false;

  /// Share of fees parked in the buffer during high activity (10%).
  pub const BUFFER_CONTRIBUTION_RATE: Rate = percent(10);

  /// Share of fees released from the buffer during low activity (5%).
  pub const BUFFER_RELEASE_RATE: Rate = percent(5);

  /// Activity above which fees are parked (70%).
  pub const HIGH_ACTIVITY_THRESHOLD: Rate = percent(70);

  /// Activity below which the buffer is drained (30%).
  pub const LOW_ACTIVITY_THRESHOLD: Rate = percent(30);

  /// Buffer capacity as a share of the initial supply (1%).
  pub const MAX_BUFFER_SIZE_RATIO: Rate = percent(1);

  /// Activity level reported when no chain metric is wired (50%).
  pub const DEFAULT_ACTIVITY_LEVEL: Rate = percent(50);
}
