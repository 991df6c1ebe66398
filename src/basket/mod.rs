//! Basket analysis
//!
//! Counts which items are purchased together within the same order. A pair is
//! an unordered set of two distinct item names; repeated purchases of the same
//! item inside one order never inflate a pair's count.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// An unordered pair of distinct item names
///
/// Equality and hashing are set-semantic: the constructor stores the names in
/// lexicographic order, so `(A, B)` and `(B, A)` are the same pair. Display
/// order can be relabeled afterwards with [`ItemPair::anchor_first`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemPair {
    pub first: String,
    pub second: String,
}

impl ItemPair {
    pub fn new(a: &str, b: &str) -> Self {
        if a <= b {
            Self {
                first: a.to_string(),
                second: b.to_string(),
            }
        } else {
            Self {
                first: b.to_string(),
                second: a.to_string(),
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.first == name || self.second == name
    }

    /// Relabel so the anchor item (when present) comes first
    ///
    /// Pure display convenience; the value still denotes the same unordered
    /// pair. Use [`ItemPair::normalized`] before comparing relabeled pairs.
    pub fn anchor_first(&self, anchor: &str) -> Self {
        if self.second == anchor && self.first != anchor {
            Self {
                first: self.second.clone(),
                second: self.first.clone(),
            }
        } else {
            self.clone()
        }
    }

    /// The lexicographically ordered form, undoing any display relabeling
    pub fn normalized(&self) -> Self {
        Self::new(&self.first, &self.second)
    }

    /// The name opposite `name` in this pair, if `name` is a member
    pub fn other(&self, name: &str) -> Option<&str> {
        if self.first == name {
            Some(&self.second)
        } else if self.second == name {
            Some(&self.first)
        } else {
            None
        }
    }
}

/// A pair together with its cumulative co-occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairCount {
    pub pair: ItemPair,
    pub count: u64,
}

/// Count item-pair co-occurrences across transactions
///
/// Each transaction contributes one occurrence per unordered 2-combination of
/// its distinct item names. The result is sorted by descending count; ties
/// land in an arbitrary but non-increasing order.
pub fn count_pairs(transactions: &[Vec<String>]) -> Vec<PairCount> {
    let mut counts: HashMap<ItemPair, u64> = HashMap::new();

    for items in transactions {
        let distinct: Vec<&String> = items.iter().collect::<BTreeSet<_>>().into_iter().collect();
        for i in 0..distinct.len() {
            for j in (i + 1)..distinct.len() {
                *counts.entry(ItemPair::new(distinct[i], distinct[j])).or_insert(0) += 1;
            }
        }
    }

    let mut pairs: Vec<PairCount> = counts
        .into_iter()
        .map(|(pair, count)| PairCount { pair, count })
        .collect();
    pairs.sort_by(|a, b| b.count.cmp(&a.count));
    pairs
}

/// Relabel every pair so the anchor item leads, without touching counts
pub fn anchor_pairs_first(pairs: Vec<PairCount>, anchor: &str) -> Vec<PairCount> {
    pairs
        .into_iter()
        .map(|pc| PairCount {
            pair: pc.pair.anchor_first(anchor),
            count: pc.count,
        })
        .collect()
}

/// Split a pair table into (contains anchor, does not contain anchor)
///
/// Both halves preserve the input order; together they are exactly the input.
pub fn split_by_anchor(pairs: &[PairCount], anchor: &str) -> (Vec<PairCount>, Vec<PairCount>) {
    pairs
        .iter()
        .cloned()
        .partition(|pc| pc.pair.contains(anchor))
}
