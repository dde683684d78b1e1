extern crate alloc;

use crate::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::traits::fungible::Mutate;
use polkadot_sdk::frame_system::RawOrigin;
use primitives::{Rate, ecosystem::params::UNITS};
use sp_arithmetic::traits::One;

/// Smoother enabled so the burn path includes a buffer transfer.
fn smoothing_params() -> SupplyParams {
  let mut params = SupplyParams::default();
  params.income_smoother.enabled = true;
  params
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn set_params() {
    let params = smoothing_params();

    #[extrinsic_call]
    set_params(RawOrigin::Root, params.clone());

    assert_eq!(Params::<T>::get(), params);
    assert_eq!(ParamsVersion::<T>::get(), 1);
  }

  #[benchmark]
  fn on_block_end() {
    Params::<T>::put(smoothing_params());
    let fee_collector = Pallet::<T>::pool_account(Pool::FeeCollector);
    T::Currency::mint_into(&fee_collector, 1_000_000 * UNITS).expect("Failed to fund fee collector");

    #[block]
    {
      Pallet::<T>::on_block_end().expect("Burn failed");
    }

    assert!(BurnStatistics::<T>::get().total_burned > 0);
  }

  #[benchmark]
  fn on_epoch_end() {
    for slot in 0..LEDGER_SLOTS {
      let mut entry = MonthlyLedgerEntry::open(slot, u64::from(slot), 0, 0);
      entry.burned_amount = 2 * UNITS;
      entry.minted_amount = UNITS;
      MonthlyLedger::<T>::insert(slot, entry);
    }
    CurrentEpochActivity::<T>::put(EpochActivity {
      sum: Rate::one(),
      samples: 1,
    });

    #[block]
    {
      Pallet::<T>::on_epoch_end(1).expect("Epoch step failed");
    }

    assert!(MintRecords::<T>::contains_key(1));
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
