//! Host
//!
//! The cart aggregate notified after every rule application to record coupon usage and a
//! human readable discount description on the address.

use std::fmt;

use crate::{addresses::Address, rules::Rule};

/// Address-level bookkeeping performed by the surrounding cart.
pub trait RulesHost: fmt::Debug {
    /// Record the coupon code a rule was applied with.
    fn maintain_address_coupon_code(
        &mut self,
        address: &mut Address<'_>,
        rule: &Rule,
        coupon_code: Option<&str>,
    );

    /// Record the rule's discount description on the address.
    fn add_discount_description(&mut self, address: &mut Address<'_>, rule: &Rule);
}

/// Writes coupon codes and descriptions straight onto the [`Address`].
///
/// A coupon rule applied without a code, or with an empty one, leaves the address's
/// recorded code untouched instead of overwriting it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressRecorder;

impl RulesHost for AddressRecorder {
    fn maintain_address_coupon_code(
        &mut self,
        address: &mut Address<'_>,
        rule: &Rule,
        coupon_code: Option<&str>,
    ) {
        if !rule.has_coupon() {
            return;
        }

        if let Some(code) = coupon_code.filter(|code| !code.is_empty()) {
            address.set_coupon_code(code);
        }
    }

    fn add_discount_description(&mut self, address: &mut Address<'_>, rule: &Rule) {
        let label = match rule.store_label(address.store()) {
            Some(label) => label.to_string(),
            None => match address.coupon_code() {
                Some(code) if !code.is_empty() => rule
                    .description
                    .clone()
                    .filter(|description| !description.is_empty())
                    .unwrap_or_else(|| code.to_string()),
                _ => return,
            },
        };

        address.add_discount_description(rule.id, label);
    }
}
