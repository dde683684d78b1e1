//! Inflation engine: activity-scaled epoch minting under an annual budget and a net supply cap.

use crate::{
  Config, Event, InflationStatistics, LOG_TARGET, MintRecords, Pallet, Params,
  economics::{inflation_scale, mul_floor},
  types::{InflationConfig, InflationStats, MintRecord, MintTrigger, Pool, to_signed},
};
use frame::deps::{frame_support::traits::fungible::Inspect, sp_runtime::DispatchResult};
use primitives::{Balance, Rate};

impl<T: Config> Pallet<T> {
  /// Mint this epoch's inflation into the fee collector.
  ///
  /// Disabled inflation, usage below the trigger threshold, exhausted budgets and amounts too
  /// small to open an empty collector are quiet no-ops. Ledger failures are returned to the
  /// caller.
  pub fn mint_inflation(epoch: u64, gas_usage_rate: Rate) -> DispatchResult {
    let config = Params::<T>::get().inflation;
    if !config.enabled {
      return Ok(());
    }
    if gas_usage_rate < config.min_gas_usage {
      log::info!(
        target: LOG_TARGET,
        "gas usage {gas_usage_rate:?} below inflation threshold {:?}",
        config.min_gas_usage,
      );
      return Ok(());
    }

    let mut stats = InflationStatistics::<T>::get();
    if epoch.saturating_sub(stats.last_annual_reset_epoch) >= config.epochs_per_year {
      stats.annual_minted = 0;
      stats.last_annual_reset_epoch = epoch;
      InflationStatistics::<T>::put(&stats);
    }

    let amount = Self::calculate_inflation_amount(&config, &stats, gas_usage_rate);
    if amount == 0 {
      return Ok(());
    }
    let collector_balance = Self::pool_balance(Pool::FeeCollector);
    if collector_balance.saturating_add(amount) < T::Currency::minimum_balance() {
      log::info!(
        target: LOG_TARGET,
        "epoch {epoch} inflation of {amount} cannot open the empty fee collector",
      );
      return Ok(());
    }

    Self::mint_to_pool(Pool::FeeCollector, amount)?;

    let block_height = Self::block_height();
    stats.total_minted = stats.total_minted.saturating_add(amount);
    stats.annual_minted = stats.annual_minted.saturating_add(amount);
    stats.last_mint_epoch = epoch;
    stats.last_mint_block_height = block_height;
    InflationStatistics::<T>::put(&stats);

    Self::record_minted(epoch, block_height, amount);
    MintRecords::<T>::insert(
      epoch,
      MintRecord {
        epoch_number: epoch,
        block_height,
        minted_amount: amount,
        gas_usage_rate,
        trigger_reason: MintTrigger::GasUsage,
      },
    );

    Self::deposit_event(Event::InflationMinted {
      epoch,
      amount,
      gas_usage_rate,
    });
    log::info!(
      target: LOG_TARGET,
      "minted {amount} inflation for epoch {epoch} at gas usage {gas_usage_rate:?}",
    );
    Ok(())
  }

  /// Epoch mint amount after the activity scale and both caps.
  pub fn calculate_inflation_amount(
    config: &InflationConfig,
    stats: &InflationStats,
    gas_usage_rate: Rate,
  ) -> Balance {
    let max_annual = mul_floor(config.initial_supply, config.max_annual_rate);
    let max_epoch = max_annual / config.epochs_per_year.max(1) as Balance;

    let remaining_annual = max_annual.saturating_sub(stats.annual_minted);
    if remaining_annual == 0 {
      log::info!(target: LOG_TARGET, "annual inflation cap reached");
      return 0;
    }

    let net_supply = Self::twelve_period_net_supply();
    let max_net_supply = mul_floor(config.initial_supply, config.max_net_supply_rate_per_year);
    let remaining_net = to_signed(max_net_supply).saturating_sub(net_supply);
    if remaining_net <= 0 {
      log::info!(
        target: LOG_TARGET,
        "twelve-period net supply cap reached: {net_supply} of {max_net_supply}",
      );
      return 0;
    }

    let scaled = mul_floor(
      max_epoch,
      inflation_scale(gas_usage_rate, config.min_gas_usage),
    );
    scaled
      .min(remaining_annual)
      .min(Balance::try_from(remaining_net).unwrap_or(Balance::MAX))
  }
}
