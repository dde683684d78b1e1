//! Reverse brake controller.
//!
//! Engages after `trigger_count` consecutive epochs of negative twelve-period net supply and
//! releases on the first non-negative reading.

use crate::{Config, Event, LOG_TARGET, Pallet, Params, ReverseBrake};
use frame::deps::sp_runtime::DispatchResult;
use sp_arithmetic::traits::Zero;

impl<T: Config> Pallet<T> {
  pub fn update_reverse_brake_state(epoch: u64) -> DispatchResult {
    let config = Params::<T>::get().reverse_brake;
    if !config.enabled {
      return Ok(());
    }

    let net_supply = Self::twelve_period_net_supply();
    let mut state = ReverseBrake::<T>::get();

    if net_supply < 0 {
      state.consecutive_negative_periods = state.consecutive_negative_periods.saturating_add(1);
      if !state.is_brake_active && state.consecutive_negative_periods >= config.trigger_count {
        state.is_brake_active = true;
        state.current_reduction = config.reduction_rate;
        Self::deposit_event(Event::ReverseBrakeActivated {
          epoch,
          consecutive_negative_periods: state.consecutive_negative_periods,
          reduction_rate: config.reduction_rate,
          net_supply,
        });
        log::info!(
          target: LOG_TARGET,
          "reverse brake activated at epoch {epoch} after {} negative periods, net supply {net_supply}",
          state.consecutive_negative_periods,
        );
      }
    } else {
      if state.is_brake_active {
        Self::deposit_event(Event::ReverseBrakeDeactivated { epoch, net_supply });
        log::info!(
          target: LOG_TARGET,
          "reverse brake deactivated at epoch {epoch}, net supply {net_supply}",
        );
      }
      state.consecutive_negative_periods = 0;
      state.is_brake_active = false;
      state.current_reduction = Zero::zero();
    }

    state.last_check_epoch = epoch;
    state.last_net_supply = net_supply;
    ReverseBrake::<T>::put(state);
    Ok(())
  }
}
