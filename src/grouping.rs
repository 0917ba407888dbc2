use ahash::AHashMap;
use itertools::Itertools;
use std::cmp::Ordering;

/// Accumulators keyed by category, iterated in first-seen order.
///
/// A key only exists once a record carrying it has been folded in, so every
/// group has at least one member.
#[derive(Debug, Clone)]
pub struct OrderedGroups<V> {
    index: AHashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedGroups<V> {
    fn default() -> Self {
        Self { index: AHashMap::new(), entries: Vec::new() }
    }
}

impl<V: Default> OrderedGroups<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(&mut self, key: &str) -> &mut V {
        let idx = match self.index.get(key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(key.to_string(), i);
                self.entries.push((key.to_string(), V::default()));
                i
            }
        };
        &mut self.entries[idx].1
    }
}

impl<V> OrderedGroups<V> {
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn into_vec(self) -> Vec<(String, V)> {
        self.entries
    }
}

/// Stable sort, largest key first; equal keys keep their incoming order.
pub fn rank_desc<T, K, F>(items: Vec<T>, mut key: F) -> Vec<T>
where
    F: FnMut(&T) -> K,
    K: DescKey,
{
    items
        .into_iter()
        .sorted_by(|a, b| key(b).desc_cmp(&key(a)))
        .collect()
}

pub trait DescKey {
    fn desc_cmp(&self, other: &Self) -> Ordering;
}

impl DescKey for usize {
    fn desc_cmp(&self, other: &Self) -> Ordering { self.cmp(other) }
}

impl DescKey for f64 {
    fn desc_cmp(&self, other: &Self) -> Ordering { self.total_cmp(other) }
}
