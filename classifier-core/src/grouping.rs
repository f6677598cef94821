//! Sort-then-partition grouping
//!
//! Unlike a single pass over unsorted input, groups are complete regardless
//! of input order, and members keep their relative input order.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::vec;

/// Lazy sequence of `(key, members)` pairs in ascending key order
pub struct Groups<K, T> {
    keyed: Peekable<vec::IntoIter<(K, T)>>,
}

impl<K: Ord, T> Groups<K, T> {
    /// Materialize into a key-ordered map.
    pub fn into_map(self) -> BTreeMap<K, Vec<T>> {
        self.collect()
    }
}

impl<K: PartialEq, T> Iterator for Groups<K, T> {
    type Item = (K, Vec<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, first) = self.keyed.next()?;
        let mut members = vec![first];
        while let Some((_, item)) = self.keyed.next_if(|(next, _)| *next == key) {
            members.push(item);
        }
        Some((key, members))
    }
}

/// Group `items` by the value `key` extracts from each.
pub fn group_by<I, K, F>(items: I, key: F) -> Groups<K, I::Item>
where
    I: IntoIterator,
    K: Ord,
    F: Fn(&I::Item) -> K,
{
    let mut keyed: Vec<(K, I::Item)> = items.into_iter().map(|item| (key(&item), item)).collect();
    // stable: equal keys keep input order
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Groups { keyed: keyed.into_iter().peekable() }
}

/// Group `items` by equality of the items themselves.
pub fn group<I>(items: I) -> Groups<I::Item, I::Item>
where
    I: IntoIterator,
    I::Item: Ord + Clone,
{
    group_by(items, |item| item.clone())
}
