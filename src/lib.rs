//! Promo Ranker
//!
//! Cart price rule ranking and application. For each cart item the eligible rules are
//! ranked by the discount they would give (coupon rules ahead of automatic ones) and applied
//! in that order, recording a per-rule discount breakdown and honoring stop-processing.

pub mod addresses;
pub mod applicator;
pub mod applier;
pub mod baseline;
pub mod breakdown;
pub mod calculators;
pub mod config;
pub mod corrections;
pub mod discounts;
pub mod eligibility;
pub mod events;
pub mod fixtures;
pub mod host;
pub mod items;
pub mod prelude;
pub mod ranking;
pub mod rules;
pub mod tags;
pub mod utils;
