//! Utils

use clap::Parser;
use jiff::{Zoned, civil::Date};

use crate::addresses::{CustomerGroupId, Quote, StoreId, WebsiteId};

/// Arguments for the rule application demos
#[derive(Debug, Parser)]
pub struct ExampleApplyArgs {
    /// Fixture set to load items, rules and config from
    #[clap(short, long, default_value = "most_saving")]
    pub fixture: String,

    /// Website the cart belongs to
    #[clap(short, long, default_value_t = 1)]
    pub website: u32,

    /// Store view the cart is placed in
    #[clap(short, long, default_value_t = 1)]
    pub store: u32,

    /// Customer group of the shopper
    #[clap(short = 'g', long, default_value_t = 0)]
    pub customer_group: u32,

    /// Coupon code entered by the shopper
    #[clap(short, long)]
    pub coupon: Option<String>,

    /// Date to collect totals for; defaults to today
    #[clap(short, long)]
    pub date: Option<Date>,

    /// Apply rules in fixture order regardless of the fixture's config
    #[clap(long)]
    pub in_order: bool,
}

impl ExampleApplyArgs {
    /// Quote described by the arguments.
    pub fn quote(&self) -> Quote {
        Quote {
            store: StoreId(self.store),
            website: WebsiteId(self.website),
            customer_group: CustomerGroupId(self.customer_group),
            date: self.date.unwrap_or_else(|| Zoned::now().date()),
        }
    }
}
