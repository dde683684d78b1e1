//! Income smoother: parks fees in the buffer when the chain is busy and hands them back when
//! it is quiet.
//!
//! Transfer failures never abort the burn. The affected step is rolled back, logged, and the
//! unadjusted fee amount is returned.

use crate::{
  Buffer, Config, Event, LOG_TARGET, Pallet, Params,
  economics::mul_floor,
  types::{IncomeBuffer, IncomeSmootherConfig, Pool},
};
use frame::deps::{frame_support::storage::with_storage_layer, sp_runtime::DispatchError};
use primitives::{Balance, Rate};

impl<T: Config> Pallet<T> {
  /// Shift part of `fees` into or out of the income buffer; returns the adjusted fee amount.
  pub fn smooth_income(fees: Balance) -> Balance {
    let params = Params::<T>::get();
    let config = &params.income_smoother;
    if !config.enabled || fees == 0 {
      return fees;
    }

    let activity_level = Self::activity_level();
    let capacity = mul_floor(params.inflation.initial_supply, config.max_buffer_size_ratio);

    let adjusted = if activity_level > config.high_activity_threshold {
      Self::contribute_to_buffer(fees, config, capacity, activity_level)
    } else if activity_level < config.low_activity_threshold {
      Self::release_from_buffer(fees, config, activity_level)
    } else {
      fees
    };

    Buffer::<T>::mutate(|buffer| buffer.last_activity_level = activity_level);
    adjusted
  }

  fn contribute_to_buffer(
    fees: Balance,
    config: &IncomeSmootherConfig,
    capacity: Balance,
    activity_level: Rate,
  ) -> Balance {
    let buffer = Buffer::<T>::get();
    let amount = mul_floor(fees, config.contribution_rate)
      .min(capacity.saturating_sub(buffer.balance))
      .min(fees);
    let amount = Self::dust_free_outflow(Pool::FeeCollector, amount);
    if amount == 0 {
      return fees;
    }

    let moved = with_storage_layer(|| -> Result<IncomeBuffer, DispatchError> {
      Self::transfer_between_pools(Pool::FeeCollector, Pool::IncomeBuffer, amount)?;
      let mut buffer = buffer;
      buffer.balance = buffer.balance.saturating_add(amount);
      buffer.total_contributed = buffer.total_contributed.saturating_add(amount);
      buffer.last_contribution_block = Self::block_height();
      Buffer::<T>::put(&buffer);
      Ok(buffer)
    });

    match moved {
      Ok(buffer) => {
        Self::deposit_event(Event::BufferContribution {
          amount,
          activity_level,
          buffer_balance: buffer.balance,
        });
        log::debug!(
          target: LOG_TARGET,
          "contributed {amount} to income buffer at activity {activity_level:?}, buffer {}",
          buffer.balance,
        );
        fees.saturating_sub(amount)
      },
      Err(error) => {
        log::warn!(target: LOG_TARGET, "income buffer contribution of {amount} failed: {error:?}");
        fees
      },
    }
  }

  fn release_from_buffer(
    fees: Balance,
    config: &IncomeSmootherConfig,
    activity_level: Rate,
  ) -> Balance {
    let buffer = Buffer::<T>::get();
    if buffer.balance == 0 {
      return fees;
    }
    let amount = Self::dust_free_outflow(
      Pool::IncomeBuffer,
      mul_floor(fees, config.release_rate).min(buffer.balance),
    );
    if amount == 0 {
      return fees;
    }

    let moved = with_storage_layer(|| -> Result<IncomeBuffer, DispatchError> {
      Self::transfer_between_pools(Pool::IncomeBuffer, Pool::FeeCollector, amount)?;
      let mut buffer = buffer;
      buffer.balance = buffer.balance.saturating_sub(amount);
      buffer.total_released = buffer.total_released.saturating_add(amount);
      buffer.last_release_block = Self::block_height();
      Buffer::<T>::put(&buffer);
      Ok(buffer)
    });

    match moved {
      Ok(buffer) => {
        Self::deposit_event(Event::BufferRelease {
          amount,
          activity_level,
          buffer_balance: buffer.balance,
        });
        log::debug!(
          target: LOG_TARGET,
          "released {amount} from income buffer at activity {activity_level:?}, buffer {}",
          buffer.balance,
        );
        fees.saturating_add(amount)
      },
      Err(error) => {
        log::warn!(target: LOG_TARGET, "income buffer release of {amount} failed: {error:?}");
        fees
      },
    }
  }
}
