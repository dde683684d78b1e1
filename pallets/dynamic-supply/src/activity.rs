//! Activity level sources.
//!
//! The engine treats chain activity as an external scalar in `[0, 1]`; readings above 1 are
//! clamped by the pallet before use.

use core::marker::PhantomData;
use frame::deps::{frame_support::traits::Get, frame_system};
use primitives::{Rate, ecosystem::params::DEFAULT_ACTIVITY_LEVEL};
use sp_arithmetic::{
  FixedPointNumber,
  traits::{One, Zero},
};

/// Source of the gas usage proxy consumed by the burn, smoothing and inflation paths.
pub trait ActivityProvider {
  /// Current activity level, expected in `[0, 1]`.
  fn activity_level() -> Rate;
}

/// No chain metric wired: report the fixed default level.
impl ActivityProvider for () {
  fn activity_level() -> Rate {
    DEFAULT_ACTIVITY_LEVEL
  }
}

/// Consumed block weight over the maximum block weight (ref time dimension).
///
/// Meaningful from `on_finalize`, once every extrinsic of the block has been accounted.
pub struct BlockFullness<T>(PhantomData<T>);

impl<T: frame_system::Config> ActivityProvider for BlockFullness<T> {
  fn activity_level() -> Rate {
    let consumed = frame_system::BlockWeight::<T>::get().total().ref_time();
    let limit = T::BlockWeights::get().max_block.ref_time();
    if limit == 0 {
      return Rate::zero();
    }
    Rate::checked_from_rational(consumed, limit)
      .unwrap_or_else(Rate::one)
      .min(Rate::one())
  }
}
