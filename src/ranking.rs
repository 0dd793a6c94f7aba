//! Ranking
//!
//! Most-saving ordering of eligible rules. Coupon-bearing rules always come first; within
//! each partition rules are ordered by descending discount amount. Equal amounts have no
//! defined relative order.

use std::cmp::Reverse;

use rust_decimal::Decimal;

use crate::{discounts::DiscountData, rules::Rule};

/// An eligible rule with the discount it would give the current item.
#[derive(Debug, Clone)]
pub struct RankingCandidate<'r, 'a> {
    /// Candidate rule
    pub rule: &'r Rule,

    /// Coupon code supplied with the pass
    pub coupon_code: Option<&'r str>,

    /// Discount computed at ranking time
    pub discount: DiscountData<'a>,
}

impl<'r, 'a> RankingCandidate<'r, 'a> {
    /// Create a candidate.
    pub fn new(rule: &'r Rule, coupon_code: Option<&'r str>, discount: DiscountData<'a>) -> Self {
        Self {
            rule,
            coupon_code,
            discount,
        }
    }

    /// Amount the candidate is ranked by.
    pub fn amount(&self) -> Decimal {
        *self.discount.amount.amount()
    }
}

/// Candidates split by coupon presence.
#[derive(Debug, Default)]
pub struct Partitions<'r, 'a> {
    with_coupon: Vec<RankingCandidate<'r, 'a>>,
    without_coupon: Vec<RankingCandidate<'r, 'a>>,
}

impl<'r, 'a> Partitions<'r, 'a> {
    /// Create empty partitions.
    #[must_use]
    pub fn new() -> Self {
        Self {
            with_coupon: Vec::new(),
            without_coupon: Vec::new(),
        }
    }

    /// Add a candidate to the partition matching its rule's coupon type.
    pub fn push(&mut self, candidate: RankingCandidate<'r, 'a>) {
        if candidate.rule.has_coupon() {
            self.with_coupon.push(candidate);
        } else {
            self.without_coupon.push(candidate);
        }
    }

    /// Total number of candidates.
    pub fn len(&self) -> usize {
        self.with_coupon.len() + self.without_coupon.len()
    }

    /// Whether there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sort both partitions by descending amount and concatenate, coupon rules first.
    #[must_use]
    pub fn into_ranked(self) -> Vec<RankingCandidate<'r, 'a>> {
        let Self {
            mut with_coupon,
            mut without_coupon,
        } = self;

        sort_by_most_saving(&mut with_coupon);
        sort_by_most_saving(&mut without_coupon);

        with_coupon.append(&mut without_coupon);
        with_coupon
    }
}

impl<'r, 'a> FromIterator<RankingCandidate<'r, 'a>> for Partitions<'r, 'a> {
    fn from_iter<I: IntoIterator<Item = RankingCandidate<'r, 'a>>>(iter: I) -> Self {
        let mut partitions = Self::new();

        for candidate in iter {
            partitions.push(candidate);
        }

        partitions
    }
}

/// Rank candidates: coupon rules first, each partition by descending amount.
pub fn rank<'r, 'a>(
    candidates: impl IntoIterator<Item = RankingCandidate<'r, 'a>>,
) -> Vec<RankingCandidate<'r, 'a>> {
    candidates
        .into_iter()
        .collect::<Partitions<'r, 'a>>()
        .into_ranked()
}

fn sort_by_most_saving(candidates: &mut [RankingCandidate<'_, '_>]) {
    candidates.sort_unstable_by_key(|candidate| Reverse(candidate.amount()));
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::GBP};

    use crate::rules::{CouponType, RuleId, SimpleAction};

    use super::*;

    fn rule(id: u32, coupon: bool) -> Rule {
        let coupon_type = if coupon {
            CouponType::SpecificCoupon
        } else {
            CouponType::NoCoupon
        };

        Rule::new(RuleId(id), format!("Rule {id}"), SimpleAction::ByFixed)
            .with_coupon_type(coupon_type)
    }

    fn candidate(rule: &Rule, minor: i64) -> RankingCandidate<'_, 'static> {
        let amount = Money::from_minor(minor, GBP);

        RankingCandidate::new(rule, None, DiscountData::new(amount, amount, amount, amount))
    }

    fn ids(ranked: &[RankingCandidate<'_, '_>]) -> Vec<RuleId> {
        ranked.iter().map(|c| c.rule.id).collect()
    }

    #[test]
    fn most_saving_first_within_partition() {
        let five = rule(1, false);
        let ten = rule(2, false);

        let ranked = rank([candidate(&five, 500), candidate(&ten, 1000)]);

        assert_eq!(ids(&ranked), vec![RuleId(2), RuleId(1)]);
    }

    #[test]
    fn coupon_rules_precede_larger_automatic_rules() {
        let coupon = rule(1, true);
        let automatic = rule(2, false);

        let ranked = rank([candidate(&automatic, 2000), candidate(&coupon, 300)]);

        assert_eq!(ids(&ranked), vec![RuleId(1), RuleId(2)]);
    }

    #[test]
    fn partitions_sort_independently() {
        let rules: Vec<Rule> = (1..=6).map(|id| rule(id, id % 2 == 0)).collect();
        let amounts = [100, 900, 500, 200, 700, 400];

        let ranked = rank(rules.iter().zip(amounts).map(|(r, a)| candidate(r, a)));

        let coupons: Vec<bool> = ranked.iter().map(|c| c.rule.has_coupon()).collect();
        assert_eq!(coupons, vec![true, true, true, false, false, false]);

        assert_eq!(
            ids(&ranked),
            vec![
                RuleId(2),
                RuleId(6),
                RuleId(4),
                RuleId(5),
                RuleId(3),
                RuleId(1)
            ]
        );
    }

    #[test]
    fn equal_amounts_are_kept_together() {
        let a = rule(1, false);
        let b = rule(2, false);
        let c = rule(3, false);

        let ranked = rank([candidate(&a, 500), candidate(&b, 900), candidate(&c, 500)]);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked.first().map(|c| c.rule.id), Some(RuleId(2)));
        assert!(ranked.iter().skip(1).all(|c| c.amount() == Decimal::from(5)));
    }

    #[test]
    fn empty_input_ranks_to_empty() {
        let partitions = Partitions::new();

        assert!(partitions.is_empty());
        assert!(partitions.into_ranked().is_empty());
    }
}
