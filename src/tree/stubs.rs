//! Stable-keyed collection of stub paths.

use std::collections::BTreeMap;

use crate::grid::Point;

/// Handle of one stub path inside a [`StubSet`].
///
/// Keys are handed out in increasing order and never reused for a new
/// path, so iteration follows creation order no matter how many merges
/// happened before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StubKey(usize);

/// Open stub paths of one battery's tree.
#[derive(Debug, Clone, Default)]
pub struct StubSet {
    stubs: BTreeMap<StubKey, Vec<Point>>,
    next: usize,
}

impl StubSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Battery cell first, then one singleton per house in the given order.
    pub fn seeded<I>(battery: Point, houses: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        let mut set = Self::new();
        set.push(vec![battery]);
        for h in houses {
            set.push(vec![h]);
        }
        set
    }

    /// Adds a path and returns its key.
    pub fn push(&mut self, path: Vec<Point>) -> StubKey {
        let key = StubKey(self.next);
        self.next += 1;
        self.stubs.insert(key, path);
        key
    }

    pub fn len(&self) -> usize {
        self.stubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stubs.is_empty()
    }

    pub fn get(&self, key: StubKey) -> Option<&[Point]> {
        self.stubs.get(&key).map(Vec::as_slice)
    }

    /// Keys in creation order.
    pub fn keys(&self) -> Vec<StubKey> {
        self.stubs.keys().copied().collect()
    }

    /// Paths in key order.
    pub fn iter(&self) -> impl Iterator<Item = (StubKey, &[Point])> {
        self.stubs.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Joins two stubs and a connector into one path.
    ///
    /// The result is `earlier + later + connector` and is stored under the
    /// later key; the earlier key disappears. Both keys are resolved before
    /// anything is removed. Returns the surviving key, or `None` (leaving
    /// the set untouched) when a key is unknown or both keys are equal.
    pub fn merge(&mut self, a: StubKey, b: StubKey, connector: Vec<Point>) -> Option<StubKey> {
        if a == b || !self.stubs.contains_key(&a) || !self.stubs.contains_key(&b) {
            return None;
        }
        let (earlier, later) = if a < b { (a, b) } else { (b, a) };

        let mut merged = self.stubs.remove(&earlier)?;
        let tail = self.stubs.get_mut(&later)?;
        merged.append(tail);
        merged.extend(connector);
        *tail = merged;

        Some(later)
    }

    /// Takes the remaining path once everything is merged.
    pub fn into_single(mut self) -> Option<Vec<Point>> {
        if self.stubs.len() != 1 {
            return None;
        }
        self.stubs.pop_first().map(|(_, path)| path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_seeded_order() {
        let set = StubSet::seeded(p(9, 9), [p(0, 0), p(1, 1)]);
        let paths: Vec<_> = set.iter().map(|(_, path)| path[0]).collect();
        assert_eq!(paths, vec![p(9, 9), p(0, 0), p(1, 1)]);
    }

    #[test]
    fn test_merge_keeps_later_key_and_concatenates() {
        let mut set = StubSet::seeded(p(9, 9), [p(0, 0), p(1, 1), p(2, 2)]);
        let keys = set.keys();

        // Argument order does not matter, the earlier path always leads.
        let kept = set.merge(keys[2], keys[0], vec![p(5, 5)]).unwrap();
        assert_eq!(kept, keys[2]);
        assert_eq!(set.len(), 3);
        assert!(set.get(keys[0]).is_none());
        assert_eq!(set.get(keys[2]).unwrap(), &[p(9, 9), p(1, 1), p(5, 5)]);

        // Remaining order is unchanged by the removal.
        let order: Vec<_> = set.keys();
        assert_eq!(order, vec![keys[1], keys[2], keys[3]]);
    }

    #[test]
    fn test_merge_with_stale_key_is_noop() {
        let mut set = StubSet::seeded(p(0, 0), [p(1, 0)]);
        let keys = set.keys();
        set.merge(keys[0], keys[1], vec![]).unwrap();

        assert!(set.merge(keys[0], keys[1], vec![]).is_none());
        assert!(set.merge(keys[1], keys[1], vec![]).is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_into_single() {
        let set = StubSet::seeded(p(0, 0), [p(1, 0)]);
        assert!(set.clone().into_single().is_none());

        let mut set = set;
        let keys = set.keys();
        set.merge(keys[0], keys[1], vec![p(0, 0), p(1, 0)]);
        assert_eq!(
            set.into_single().unwrap(),
            vec![p(0, 0), p(1, 0), p(0, 0), p(1, 0)]
        );
    }
}
