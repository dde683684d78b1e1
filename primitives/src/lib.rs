#![cfg_attr(not(feature = "std"), no_std)]

pub mod ecosystem;

pub use ecosystem::*;
