//! Dynamic Supply Pallet
//!
//! Feedback-driven control of the native token supply:
//! - every block a share of the collected fees is burned, the share sliding with chain activity;
//! - an optional income buffer parks fees during busy periods and releases them in quiet ones;
//! - at every epoch boundary new supply is minted, bounded by an annual budget and by a cap on
//!   net supply growth over the twelve-slot monthly ledger;
//! - a reverse brake lowers the burn rate once net supply has shrunk for several consecutive
//!   epochs, and lifts it on the first non-negative reading.
//!
//! Host order inside a block is fixed: burn, then (on the last block of an epoch) inflation,
//! then the brake update. Each step runs in its own storage layer and is rolled back as a whole
//! on failure.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod activity;
pub mod economics;
pub mod types;
pub mod weights;

mod brake;
mod burn;
mod inflation;
mod ledger;
mod smoother;

pub use activity::{ActivityProvider, BlockFullness};
pub use types::*;
pub use weights::WeightInfo;

pub(crate) const LOG_TARGET: &str = "runtime::dynamic-supply";

#[frame::pallet]
pub mod pallet {
  use super::{ActivityProvider, WeightInfo};
  use crate::types::{
    BurnStats, EpochActivity, IncomeBuffer, InflationStats, LEDGER_SLOTS, MintRecord,
    MonthlyLedgerEntry, ParamsError, ReverseBrakeState, SupplyParams,
  };
  use alloc::vec::Vec;
  use frame::deps::{
    frame_support::traits::fungible::{Inspect as NativeInspect, Mutate as NativeMutate},
    sp_runtime::{
      DispatchError,
      traits::{SaturatedConversion, Saturating},
    },
  };
  use frame::prelude::*;
  use primitives::{Balance, Rate};
  use sp_arithmetic::traits::Zero;

  /// Configuration trait for the dynamic supply pallet
  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// Native currency: the ledger every burn, mint and pool transfer goes through
    type Currency: NativeInspect<Self::AccountId, Balance = Balance>
      + NativeMutate<Self::AccountId, Balance = Balance>;

    /// Pallet ID the income buffer account is derived from
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Account collecting transaction fees; burn source and inflation destination
    type FeeCollector: Get<Self::AccountId>;

    /// Chain activity (gas usage) proxy
    type ActivityLevel: ActivityProvider;

    /// Number of blocks per epoch
    #[pallet::constant]
    type EpochLength: Get<u32>;

    /// Origin allowed to replace the supply parameters
    type AdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Weight information for extrinsics and hooks
    type WeightInfo: WeightInfo;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(PhantomData<T>);

  /// Active supply policy
  #[pallet::storage]
  #[pallet::getter(fn params)]
  pub type Params<T: Config> = StorageValue<_, SupplyParams, ValueQuery>;

  /// Bumped on every accepted parameter update
  #[pallet::storage]
  #[pallet::getter(fn params_version)]
  pub type ParamsVersion<T: Config> = StorageValue<_, u64, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn burn_stats)]
  pub type BurnStatistics<T: Config> = StorageValue<_, BurnStats, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn inflation_stats)]
  pub type InflationStatistics<T: Config> = StorageValue<_, InflationStats, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn reverse_brake_state)]
  pub type ReverseBrake<T: Config> = StorageValue<_, ReverseBrakeState, ValueQuery>;

  #[pallet::storage]
  #[pallet::getter(fn income_buffer)]
  pub type Buffer<T: Config> = StorageValue<_, IncomeBuffer, ValueQuery>;

  /// Circular monthly ledger, slot index (0..12) to entry
  #[pallet::storage]
  #[pallet::getter(fn ledger_slot)]
  pub type MonthlyLedger<T: Config> =
    StorageMap<_, Blake2_128Concat, u32, MonthlyLedgerEntry, OptionQuery>;

  /// Append-only audit trail of minting epochs
  #[pallet::storage]
  #[pallet::getter(fn mint_record)]
  pub type MintRecords<T: Config> = StorageMap<_, Blake2_128Concat, u64, MintRecord, OptionQuery>;

  /// Activity samples of the running epoch
  #[pallet::storage]
  #[pallet::getter(fn epoch_activity)]
  pub type CurrentEpochActivity<T: Config> = StorageValue<_, EpochActivity, ValueQuery>;

  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A share of the collected fees was burned
    FeesBurned {
      burned: Balance,
      burn_rate: Rate,
      remaining: Balance,
      block_height: u64,
    },
    /// Epoch inflation minted into the fee collector
    InflationMinted {
      epoch: u64,
      amount: Balance,
      gas_usage_rate: Rate,
    },
    ReverseBrakeActivated {
      epoch: u64,
      consecutive_negative_periods: u32,
      reduction_rate: Rate,
      net_supply: i128,
    },
    ReverseBrakeDeactivated { epoch: u64, net_supply: i128 },
    /// Fees parked in the income buffer
    BufferContribution {
      amount: Balance,
      activity_level: Rate,
      buffer_balance: Balance,
    },
    /// Buffered income returned to the fee collector
    BufferRelease {
      amount: Balance,
      activity_level: Rate,
      buffer_balance: Balance,
    },
    ParamsUpdated { version: u64 },
  }

  #[pallet::error]
  pub enum Error<T> {
    /// A rate or threshold lies outside [0, 1]
    RateOutOfRange,
    /// Minimum burn rate exceeds maximum burn rate
    BurnRateBoundsInverted,
    /// Target burn rate lies outside the [min, max] burn rate range
    TargetBurnRateOutOfBounds,
    /// Low gas threshold must be strictly below the high gas threshold
    GasThresholdsInverted,
    /// Low activity threshold must be strictly below the high activity threshold
    ActivityThresholdsInverted,
    /// Initial supply must be positive
    ZeroInitialSupply,
    /// Epochs per year must be positive
    ZeroEpochsPerYear,
    /// Reverse brake trigger count must be positive
    ZeroTriggerCount,
    /// An enabled reverse brake needs a positive reduction rate
    ZeroBrakeReduction,
  }

  impl<T> From<ParamsError> for Error<T> {
    fn from(error: ParamsError) -> Self {
      match error {
        ParamsError::RateOutOfRange => Error::RateOutOfRange,
        ParamsError::BurnRateBoundsInverted => Error::BurnRateBoundsInverted,
        ParamsError::TargetBurnRateOutOfBounds => Error::TargetBurnRateOutOfBounds,
        ParamsError::GasThresholdsInverted => Error::GasThresholdsInverted,
        ParamsError::ActivityThresholdsInverted => Error::ActivityThresholdsInverted,
        ParamsError::ZeroInitialSupply => Error::ZeroInitialSupply,
        ParamsError::ZeroEpochsPerYear => Error::ZeroEpochsPerYear,
        ParamsError::ZeroTriggerCount => Error::ZeroTriggerCount,
        ParamsError::ZeroBrakeReduction => Error::ZeroBrakeReduction,
      }
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Replace the whole supply policy (governance only).
    ///
    /// Invalid parameters are rejected untouched; nothing is clamped.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::set_params())]
    pub fn set_params(origin: OriginFor<T>, params: SupplyParams) -> DispatchResult {
      T::AdminOrigin::ensure_origin(origin)?;
      params.validate().map_err(Error::<T>::from)?;
      Params::<T>::put(params);
      let version = ParamsVersion::<T>::mutate(|version| {
        *version = version.saturating_add(1);
        *version
      });
      log::info!(target: crate::LOG_TARGET, "supply parameters updated to version {version}");
      Self::deposit_event(Event::ParamsUpdated { version });
      Ok(())
    }
  }

  #[pallet::hooks]
  impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
    fn on_initialize(n: BlockNumberFor<T>) -> Weight {
      let mut weight = T::WeightInfo::on_block_end();
      if Self::is_epoch_end(n) {
        weight = weight.saturating_add(T::WeightInfo::on_epoch_end());
      }
      weight
    }

    fn on_finalize(n: BlockNumberFor<T>) {
      Self::sample_activity();
      if let Err(error) = Self::on_block_end() {
        log::error!(target: crate::LOG_TARGET, "block burn rolled back: {error:?}");
      }
      if Self::is_epoch_end(n) {
        let epoch = Self::epoch_of(n);
        if let Err(error) = Self::on_epoch_end(epoch) {
          log::error!(target: crate::LOG_TARGET, "epoch {epoch} step rolled back: {error:?}");
        }
      }
    }
  }

  impl<T: Config> Pallet<T> {
    /// Host entry point, once per block: smooth, then burn the fee collector.
    ///
    /// All writes are discarded if the burn fails.
    pub fn on_block_end() -> Result<(Balance, Balance), DispatchError> {
      frame::deps::frame_support::storage::with_storage_layer(Self::burn_fees)
    }

    /// Host entry point, once per epoch: mint inflation, then update the reverse brake.
    ///
    /// The gas usage rate is the mean activity sampled over the epoch. Inflation and brake
    /// writes, and the consumed activity samples, are discarded together if either fails.
    pub fn on_epoch_end(epoch: u64) -> DispatchResult {
      frame::deps::frame_support::storage::with_storage_layer(|| {
        let gas_usage_rate = Self::take_epoch_activity();
        Self::mint_inflation(epoch, gas_usage_rate)?;
        Self::update_reverse_brake_state(epoch)
      })
    }

    /// Epoch the current block belongs to.
    pub fn current_epoch() -> u64 {
      Self::epoch_of(frame_system::Pallet::<T>::block_number())
    }

    /// Current block number as a plain height.
    pub fn block_height() -> u64 {
      frame_system::Pallet::<T>::block_number().saturated_into::<u64>()
    }

    /// Clamped reading of the configured activity provider.
    pub fn activity_level() -> Rate {
      crate::economics::clamp_unit(T::ActivityLevel::activity_level())
    }

    /// Every ledger slot currently holding data, in slot order.
    pub fn monthly_ledger() -> Vec<MonthlyLedgerEntry> {
      (0..LEDGER_SLOTS).filter_map(MonthlyLedger::<T>::get).collect()
    }

    fn epoch_length() -> u64 {
      u64::from(T::EpochLength::get().max(1))
    }

    fn epoch_of(n: BlockNumberFor<T>) -> u64 {
      n.saturated_into::<u64>() / Self::epoch_length()
    }

    fn is_epoch_end(n: BlockNumberFor<T>) -> bool {
      n.saturated_into::<u64>().saturating_add(1) % Self::epoch_length() == 0
    }

    fn sample_activity() {
      let level = Self::activity_level();
      CurrentEpochActivity::<T>::mutate(|activity| {
        activity.sum = activity.sum.saturating_add(level);
        activity.samples = activity.samples.saturating_add(1);
      });
    }

    /// Mean activity of the finished epoch; a fresh reading when nothing was sampled.
    fn take_epoch_activity() -> Rate {
      CurrentEpochActivity::<T>::take()
        .mean()
        .unwrap_or_else(Self::activity_level)
    }
  }

  /// Genesis configuration: supply policy plus optional imported records
  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    pub params: SupplyParams,
    pub burn_stats: BurnStats,
    pub inflation_stats: InflationStats,
    pub reverse_brake: ReverseBrakeState,
    pub income_buffer: IncomeBuffer,
    pub monthly_ledger: Vec<MonthlyLedgerEntry>,
    #[serde(skip)]
    pub _marker: core::marker::PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      if let Err(error) = self.params.validate() {
        panic!("invalid dynamic supply genesis params: {error:?}");
      }
      assert_eq!(
        self
          .income_buffer
          .total_contributed
          .saturating_sub(self.income_buffer.total_released),
        self.income_buffer.balance,
        "income buffer genesis violates contributed - released == balance",
      );
      assert!(
        T::Currency::balance(&Pallet::<T>::buffer_account()) >= self.income_buffer.balance,
        "income buffer genesis balance is not backed by the buffer account",
      );
      let brake = &self.reverse_brake;
      let brake_consistent = if brake.is_brake_active {
        !brake.current_reduction.is_zero()
      } else {
        brake.current_reduction.is_zero()
          && brake.consecutive_negative_periods < self.params.reverse_brake.trigger_count
      };
      assert!(
        brake_consistent,
        "reverse brake genesis state is inconsistent with its activity flag",
      );
      Params::<T>::put(&self.params);
      BurnStatistics::<T>::put(&self.burn_stats);
      InflationStatistics::<T>::put(&self.inflation_stats);
      ReverseBrake::<T>::put(&self.reverse_brake);
      Buffer::<T>::put(&self.income_buffer);
      for entry in &self.monthly_ledger {
        assert!(
          entry.month_index < LEDGER_SLOTS,
          "monthly ledger slot out of range"
        );
        MonthlyLedger::<T>::insert(entry.month_index, entry);
      }
      // Buffer account survives a zero native balance via provider reference
      frame_system::Pallet::<T>::inc_providers(&Pallet::<T>::buffer_account());
    }
  }
}
