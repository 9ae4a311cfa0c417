use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::{
    hash::Hash,
    ops::{Deref, DerefMut},
};

type Inner<K, V> = IndexMap<K, V, FxBuildHasher>;

/// An insertion-ordered map.
///
/// The allocators break ties by input order and the optimizer picks the first
/// product it meets among equals, so iteration must follow the order in which
/// products were supplied. The newtype keeps `IndexMap` out of the public
/// signatures.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Map<K: Eq + Hash, V>(Inner<K, V>);

impl<K: Eq + Hash, V> Default for Map<K, V> {
    fn default() -> Self {
        Self(Inner::default())
    }
}

impl<K: Eq + Hash, V> Deref for Map<K, V> {
    type Target = Inner<K, V>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<K: Eq + Hash, V> DerefMut for Map<K, V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for Map<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<K: Eq + Hash, V> Extend<(K, V)> for Map<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<K: Eq + Hash, V> IntoIterator for Map<K, V> {
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, K: Eq + Hash, V> IntoIterator for &'a Map<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = indexmap::map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a, K: Eq + Hash, V> IntoIterator for &'a mut Map<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = indexmap::map::IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_insertion_order() {
        let mut map = [("z", 1), ("a", 2)].into_iter().collect::<Map<_, _>>();
        map.extend([("m", 3)]);
        map.insert("b", 4);

        let keys = map.keys().copied().collect::<Vec<_>>();
        assert_eq!(keys, vec!["z", "a", "m", "b"]);

        for (_, value) in &mut map {
            *value *= 10;
        }
        assert_eq!(map.into_iter().map(|(_, v)| v).sum::<i32>(), 100);
    }
}
