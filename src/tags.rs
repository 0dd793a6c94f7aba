//! Tags
//!
//! Sorted, de-duplicated string tags attached to items and matched by rule conditions.

use std::cmp::Ordering;

use serde::Deserialize;
use smallvec::SmallVec;

/// A sorted set of string tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct Tags {
    tags: SmallVec<[String; 5]>,
}

impl Tags {
    /// Create a tag set, sorting and removing duplicates.
    #[must_use]
    pub fn new(tags: SmallVec<[String; 5]>) -> Self {
        let mut collection = Self { tags };

        collection.tags.sort();
        collection.tags.dedup();

        collection
    }

    /// Create an empty tag set.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a tag set from string slices.
    pub fn from_strs(tags: &[&str]) -> Self {
        Self::new(tags.iter().map(ToString::to_string).collect())
    }

    /// Whether the set contains `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.tags
            .binary_search_by(|probe| probe.as_str().cmp(tag))
            .is_ok()
    }

    /// Whether the two sets share at least one tag.
    pub fn intersects(&self, other: &Self) -> bool {
        let mut left = self.tags.iter();
        let mut right = other.tags.iter();
        let mut left_tag = left.next();
        let mut right_tag = right.next();

        while let (Some(l), Some(r)) = (left_tag, right_tag) {
            match l.cmp(r) {
                Ordering::Equal => return true,
                Ordering::Less => left_tag = left.next(),
                Ordering::Greater => right_tag = right.next(),
            }
        }

        false
    }

    /// Whether every tag in `other` is also in this set.
    pub fn contains_all(&self, other: &Self) -> bool {
        other.tags.iter().all(|tag| self.contains(tag))
    }

    /// Whether the set has no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl From<Vec<String>> for Tags {
    fn from(tags: Vec<String>) -> Self {
        Self::new(tags.into_iter().collect())
    }
}
