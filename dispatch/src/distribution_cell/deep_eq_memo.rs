// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Memoize a value derived from a key, and only derive it again when the new key is
/// *not* deep-equal ([`PartialEq`]) to the key the value was derived from.
///
/// When the key is an [`std::sync::Arc`], `==` compares the pointees, so two distinct
/// allocations holding equal values count as the same key.
///
/// ```
/// use r3bl_dispatch::{DeepEqMemo, MemoUpdate};
///
/// let mut memo = DeepEqMemo::new(vec![1, 2], |it: &Vec<i32>| it.iter().sum::<i32>());
/// assert_eq!(*memo.get(), 3);
///
/// let outcome = memo.update(vec![1, 2], |it| it.iter().sum());
/// assert_eq!(outcome, MemoUpdate::Retained);
///
/// let outcome = memo.update(vec![1, 2, 3], |it| it.iter().sum());
/// assert_eq!(outcome, MemoUpdate::Recomputed);
/// assert_eq!(*memo.get(), 6);
/// assert_eq!(memo.recompute_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DeepEqMemo<K, V> {
    key: K,
    value: V,
    recompute_count: usize,
}

/// Result of [`DeepEqMemo::update()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoUpdate {
    /// The key changed and the value was derived again.
    Recomputed,
    /// The new key is deep-equal to the old one. Neither the key nor the value changed.
    Retained,
}

impl<K, V> DeepEqMemo<K, V>
where
    K: PartialEq,
{
    pub fn new(key: K, derive: impl FnOnce(&K) -> V) -> Self {
        let value = derive(&key);
        Self {
            key,
            value,
            recompute_count: 0,
        }
    }

    pub fn get(&self) -> &V { &self.value }

    pub fn key(&self) -> &K { &self.key }

    /// Number of times the value was derived again since [`DeepEqMemo::new()`].
    pub fn recompute_count(&self) -> usize { self.recompute_count }

    /// The old key is kept (and `derive` is not called) when `key` is deep-equal to it.
    pub fn update(&mut self, key: K, derive: impl FnOnce(&K) -> V) -> MemoUpdate {
        if self.key == key {
            return MemoUpdate::Retained;
        }
        self.replace(key, derive);
        MemoUpdate::Recomputed
    }

    /// Derive the value again, whether or not the key changed.
    pub fn replace(&mut self, key: K, derive: impl FnOnce(&K) -> V) {
        self.value = derive(&key);
        self.key = key;
        self.recompute_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{cell::Cell, sync::Arc};
    use test_case::test_case;

    #[derive(Debug, Clone, PartialEq)]
    struct Profile {
        name: String,
        tags: Vec<String>,
    }

    fn profile(name: &str, tags: &[&str]) -> Profile {
        Profile {
            name: name.to_string(),
            tags: tags.iter().map(ToString::to_string).collect(),
        }
    }

    #[test_case(profile("ada", &["math"]), MemoUpdate::Retained; "deep equal")]
    #[test_case(profile("ada", &["math", "poetry"]), MemoUpdate::Recomputed; "nested change")]
    #[test_case(profile("grace", &["math"]), MemoUpdate::Recomputed; "field change")]
    fn test_update_compares_structurally(next: Profile, expected: MemoUpdate) {
        let calls = Cell::new(0);
        let derive = |it: &Arc<Profile>| {
            calls.set(calls.get() + 1);
            it.tags.len()
        };

        let mut memo = DeepEqMemo::new(Arc::new(profile("ada", &["math"])), derive);
        let outcome = memo.update(Arc::new(next.clone()), derive);

        assert_eq!(outcome, expected);
        let expected_calls = if expected == MemoUpdate::Retained { 1 } else { 2 };
        assert_eq!(calls.get(), expected_calls);
        assert_eq!(*memo.get(), next.tags.len());
    }

    #[test]
    fn test_retained_keeps_original_key() {
        let original = Arc::new(profile("ada", &[]));
        let mut memo = DeepEqMemo::new(original.clone(), |it| it.name.clone());

        memo.update(Arc::new(profile("ada", &[])), |it| it.name.clone());

        assert!(Arc::ptr_eq(memo.key(), &original));
        assert_eq!(memo.recompute_count(), 0);
    }

    #[test]
    fn test_replace_always_derives() {
        let mut memo = DeepEqMemo::new(1, |it| it * 10);
        memo.replace(1, |it| it * 100);
        assert_eq!(*memo.get(), 100);
        assert_eq!(memo.recompute_count(), 1);
    }
}
