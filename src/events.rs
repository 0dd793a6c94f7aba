//! Events
//!
//! Synchronous notification fired for every applied rule before corrections run. Observers
//! receive the rule, item, address, quote and fixed quantity and may rewrite the
//! discount result in place.

use std::fmt;

use rust_decimal::Decimal;

use crate::{
    addresses::{Address, Quote},
    discounts::DiscountData,
    items::Item,
    rules::Rule,
};

/// Name of the event fired while a rule is processed for an item.
pub const VALIDATOR_PROCESS: &str = "salesrule_validator_process";

/// Payload of the [`VALIDATOR_PROCESS`] event.
#[derive(Debug)]
pub struct ValidatorProcessEvent<'e, 'a> {
    /// Rule being applied
    pub rule: &'e Rule,

    /// Item the rule is applied to
    pub item: &'e Item<'a>,

    /// Address totals are collected for
    pub address: &'e Address<'e>,

    /// Quote owning the address
    pub quote: &'e Quote,

    /// Fixed quantity the discount was computed for
    pub qty: Decimal,

    /// Discount figures; observers may overwrite them
    pub result: &'e mut DiscountData<'a>,
}

impl ValidatorProcessEvent<'_, '_> {
    /// Event name
    pub fn name(&self) -> &'static str {
        VALIDATOR_PROCESS
    }
}

/// Receives rule processing events.
pub trait DiscountObserver: fmt::Debug {
    /// Called once per applied rule, before corrections.
    fn on_validator_process(&mut self, event: &mut ValidatorProcessEvent<'_, '_>);
}

/// Observers notified in registration order.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    observers: Vec<Box<dyn DiscountObserver>>,
}

impl EventDispatcher {
    /// Create a dispatcher with no observers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    pub fn subscribe(&mut self, observer: impl DiscountObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Notify every observer in turn. Later observers see earlier observers' changes.
    pub fn dispatch(&mut self, event: &mut ValidatorProcessEvent<'_, '_>) {
        for observer in &mut self.observers {
            observer.on_validator_process(event);
        }
    }
}
