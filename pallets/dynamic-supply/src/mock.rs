extern crate alloc;

use crate as pallet_dynamic_supply;
use crate::{ActivityProvider, types::SupplyParams};
use core::cell::RefCell;
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl, parameter_types,
  traits::{ConstU32, ConstU64, Get, Hooks, LockableCurrency, WithdrawReasons},
};
use polkadot_sdk::frame_system::{self, EnsureRoot};
use polkadot_sdk::sp_runtime::{
  BuildStorage,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{Rate, ecosystem::params::DEFAULT_ACTIVITY_LEVEL, pallet_ids};

type Block = frame_system::mocking::MockBlock<Test>;

pub const ALICE: u64 = 1;
pub const FEE_COLLECTOR: u64 = 100;
pub const EPOCH_LENGTH: u32 = 10;
pub const INITIAL_BALANCE: u128 = 1_000_000_000;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    DynamicSupply: pallet_dynamic_supply,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = u64;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<u128>;
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ();
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = u128;
  type DustRemoval = ();
  type RuntimeEvent = RuntimeEvent;
  type ExistentialDeposit = ExistentialDeposit;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = ();
  type RuntimeFreezeReason = ();
  type DoneSlashHandler = ();
}

thread_local! {
  // Activity level reported to the pallet, reset by `new_test_ext`
  static ACTIVITY: RefCell<Rate> = const { RefCell::new(DEFAULT_ACTIVITY_LEVEL) };
  static EXISTENTIAL_DEPOSIT: RefCell<u128> = const { RefCell::new(1) };
}

pub struct ExistentialDeposit;
impl Get<u128> for ExistentialDeposit {
  fn get() -> u128 {
    EXISTENTIAL_DEPOSIT.with(|deposit| *deposit.borrow())
  }
}

pub fn set_activity(level: Rate) {
  ACTIVITY.with(|activity| *activity.borrow_mut() = level);
}

pub struct MockActivity;
impl ActivityProvider for MockActivity {
  fn activity_level() -> Rate {
    ACTIVITY.with(|activity| *activity.borrow())
  }
}

parameter_types! {
  pub const DynamicSupplyPalletId: PalletId = PalletId(*pallet_ids::DYNAMIC_SUPPLY_PALLET_ID);
}

impl pallet_dynamic_supply::Config for Test {
  type Currency = Balances;
  type PalletId = DynamicSupplyPalletId;
  type FeeCollector = ConstU64<FEE_COLLECTOR>;
  type ActivityLevel = MockActivity;
  type EpochLength = ConstU32<EPOCH_LENGTH>;
  type AdminOrigin = EnsureRoot<u64>;
  type WeightInfo = ();
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  new_test_ext_with(pallet_dynamic_supply::GenesisConfig::<Test>::default())
}

pub fn new_test_ext_with_params(params: SupplyParams) -> polkadot_sdk::sp_io::TestExternalities {
  new_test_ext_with(pallet_dynamic_supply::GenesisConfig::<Test> {
    params,
    ..Default::default()
  })
}

/// Externalities whose ledger reaps accounts below `deposit`.
pub fn new_test_ext_with_existential_deposit(
  params: SupplyParams,
  deposit: u128,
) -> polkadot_sdk::sp_io::TestExternalities {
  let ext = new_test_ext_with_params(params);
  EXISTENTIAL_DEPOSIT.with(|existential| *existential.borrow_mut() = deposit);
  ext
}

pub fn new_test_ext_with(
  genesis: pallet_dynamic_supply::GenesisConfig<Test>,
) -> polkadot_sdk::sp_io::TestExternalities {
  set_activity(DEFAULT_ACTIVITY_LEVEL);
  EXISTENTIAL_DEPOSIT.with(|deposit| *deposit.borrow_mut() = 1);

  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: alloc::vec![(ALICE, INITIAL_BALANCE)],
    dev_accounts: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  genesis.assimilate_storage(&mut t).unwrap();

  let mut ext: polkadot_sdk::sp_io::TestExternalities = t.into();
  ext.execute_with(|| System::set_block_number(1));
  ext
}

/// Put `amount` of fresh fees into the collector.
pub fn collect_fees(amount: u128) {
  use polkadot_sdk::frame_support::traits::fungible::Mutate;
  Balances::mint_into(&FEE_COLLECTOR, amount).unwrap();
}

/// Freeze `amount` of `who`'s balance behind a lock.
pub fn lock_funds(who: u64, amount: u128) {
  Balances::set_lock(*b"testlock", &who, amount, WithdrawReasons::all());
}

/// Drive the pallet hooks through block `n`.
pub fn run_block(n: u64) {
  System::set_block_number(n);
  DynamicSupply::on_initialize(n);
  DynamicSupply::on_finalize(n);
}

/// Default params with income smoothing switched on.
pub fn smoothing_params() -> SupplyParams {
  let mut params = SupplyParams::default();
  params.income_smoother.enabled = true;
  params
}
