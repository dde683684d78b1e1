//! Burn engine.

use crate::{
  BurnStatistics, Config, Event, LOG_TARGET, Pallet, Params, ReverseBrake,
  economics::{apply_reverse_brake, interpolate_burn_rate, mul_floor},
  types::{Pool, SupplyParams},
};
use frame::deps::sp_runtime::DispatchError;
use primitives::{Balance, Rate};

impl<T: Config> Pallet<T> {
  /// Burn a share of the fee collector; returns `(burned, remaining)`.
  ///
  /// Income smoothing runs first and the collector balance is re-read afterwards, so the rate
  /// applies to post-smoothing fees. The burn is trimmed so the collector never drops below the
  /// existential deposit without being emptied. A failed burn is returned as an error with no partial
  /// effect on the caller's storage layer.
  pub fn burn_fees() -> Result<(Balance, Balance), DispatchError> {
    let params = Params::<T>::get();
    let fees = Self::pool_balance(Pool::FeeCollector);
    if !params.burn.enabled {
      return Ok((0, fees));
    }
    if fees == 0 {
      return Ok((0, 0));
    }

    let smoothed = Self::smooth_income(fees);
    let fees = Self::pool_balance(Pool::FeeCollector);
    if fees == 0 {
      return Ok((0, 0));
    }
    if smoothed != fees {
      log::debug!(
        target: LOG_TARGET,
        "income smoothing reported {smoothed}, collector holds {fees}",
      );
    }

    let burn_rate = Self::calculate_dynamic_burn_rate(&params, Self::activity_level());
    let burned = Self::dust_free_outflow(Pool::FeeCollector, mul_floor(fees, burn_rate));
    if burned == 0 {
      return Ok((0, fees));
    }

    Self::burn_from_pool(Pool::FeeCollector, burned)?;
    let remaining = Self::pool_balance(Pool::FeeCollector);

    let epoch = Self::current_epoch();
    let block_height = Self::block_height();
    BurnStatistics::<T>::mutate(|stats| {
      stats.total_burned = stats.total_burned.saturating_add(burned);
      stats.last_burn_rate = burn_rate;
      stats.last_epoch_number = epoch;
      stats.last_block_height = block_height;
    });
    Self::record_burned(epoch, block_height, burned);

    Self::deposit_event(Event::FeesBurned {
      burned,
      burn_rate,
      remaining,
      block_height,
    });
    log::info!(
      target: LOG_TARGET,
      "burned {burned} fees at rate {burn_rate:?}, {remaining} remaining",
    );
    Ok((burned, remaining))
  }

  /// Effective burn rate for `level` under `params` and the stored brake state.
  pub fn calculate_dynamic_burn_rate(params: &SupplyParams, level: Rate) -> Rate {
    let base = interpolate_burn_rate(&params.burn, level);
    apply_reverse_brake(
      base,
      params.burn.min_rate,
      &params.reverse_brake,
      &ReverseBrake::<T>::get(),
    )
  }
}
