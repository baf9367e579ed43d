#![cfg_attr(not(test), no_std)]
pub mod annunciator;
pub mod bsp;
pub mod config;
pub mod control;
pub mod edt;
pub mod error;
pub mod reading;
pub mod rules;
pub mod sampler;
