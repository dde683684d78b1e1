//! Pool accounts and the twelve-slot monthly ledger.

use crate::{
  Config, MonthlyLedger, Pallet, Params,
  economics::{ledger_period, ledger_slot},
  types::{LEDGER_SLOTS, MonthlyLedgerEntry, Pool},
};
use frame::deps::{
  frame_support::traits::{
    Get,
    fungible::{Inspect, Mutate},
    tokens::{Fortitude, Precision, Preservation},
  },
  sp_runtime::{DispatchError, traits::AccountIdConversion},
};
use primitives::Balance;

impl<T: Config> Pallet<T> {
  /// Pallet-owned account holding the income buffer reserve.
  pub fn buffer_account() -> T::AccountId {
    T::PalletId::get().into_sub_account_truncating(b"buffer")
  }

  pub fn pool_account(pool: Pool) -> T::AccountId {
    match pool {
      Pool::FeeCollector => T::FeeCollector::get(),
      Pool::IncomeBuffer => Self::buffer_account(),
    }
  }

  pub fn pool_balance(pool: Pool) -> Balance {
    T::Currency::balance(&Self::pool_account(pool))
  }

  /// Largest part of `amount` that `pool` can pay out without leaving dust behind.
  ///
  /// The pool is either emptied or kept at or above the existential deposit; a remainder below
  /// it would be reaped by the ledger and vanish from the books.
  pub(crate) fn dust_free_outflow(pool: Pool, amount: Balance) -> Balance {
    let balance = Self::pool_balance(pool);
    let amount = amount.min(balance);
    let remainder = balance.saturating_sub(amount);
    let minimum = T::Currency::minimum_balance();
    if remainder == 0 || remainder >= minimum {
      amount
    } else {
      balance.saturating_sub(minimum)
    }
  }

  /// Burn exactly `amount`, failing on insufficient funds.
  ///
  /// Callers size `amount` with `dust_free_outflow`.
  pub(crate) fn burn_from_pool(pool: Pool, amount: Balance) -> Result<Balance, DispatchError> {
    T::Currency::burn_from(
      &Self::pool_account(pool),
      amount,
      Preservation::Expendable,
      Precision::Exact,
      Fortitude::Polite,
    )
  }

  pub(crate) fn mint_to_pool(pool: Pool, amount: Balance) -> Result<Balance, DispatchError> {
    T::Currency::mint_into(&Self::pool_account(pool), amount)
  }

  pub(crate) fn transfer_between_pools(
    source: Pool,
    dest: Pool,
    amount: Balance,
  ) -> Result<Balance, DispatchError> {
    T::Currency::transfer(
      &Self::pool_account(source),
      &Self::pool_account(dest),
      amount,
      Preservation::Expendable,
    )
  }

  pub(crate) fn record_burned(epoch: u64, height: u64, amount: Balance) {
    Self::update_ledger_slot(epoch, height, |entry| {
      entry.burned_amount = entry.burned_amount.saturating_add(amount);
    });
  }

  pub(crate) fn record_minted(epoch: u64, height: u64, amount: Balance) {
    Self::update_ledger_slot(epoch, height, |entry| {
      entry.minted_amount = entry.minted_amount.saturating_add(amount);
    });
  }

  /// Accumulate into the slot of `epoch`'s period.
  ///
  /// A slot still holding an older period is overwritten, so slots skipped for a whole cycle
  /// keep the previous cycle's figures.
  fn update_ledger_slot(epoch: u64, height: u64, apply: impl FnOnce(&mut MonthlyLedgerEntry)) {
    let epochs_per_year = Params::<T>::get().inflation.epochs_per_year;
    let period = ledger_period(epoch, epochs_per_year);
    let slot = ledger_slot(period);
    MonthlyLedger::<T>::mutate(slot, |maybe_entry| {
      if maybe_entry
        .as_ref()
        .is_none_or(|entry| entry.period != period)
      {
        *maybe_entry = Some(MonthlyLedgerEntry::open(slot, period, epoch, height));
      }
      if let Some(entry) = maybe_entry {
        apply(entry);
        entry.end_epoch = entry.end_epoch.max(epoch);
        entry.end_height = entry.end_height.max(height);
      }
    });
  }

  /// Sum of `minted - burned` over slots 0..12 in index order.
  pub fn twelve_period_net_supply() -> i128 {
    (0..LEDGER_SLOTS)
      .filter_map(MonthlyLedger::<T>::get)
      .fold(0i128, |net, entry| net.saturating_add(entry.net_supply()))
  }
}
