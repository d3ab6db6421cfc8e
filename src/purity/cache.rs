//! Verdict memoization for one analysis run
//!
//! Verdicts are cached per function for the lifetime of an
//! [`AnalysisSession`](super::AnalysisSession). The cache is shared by every
//! worker thread of the session, so writes follow single-writer-wins: the
//! first verdict stored for a function is final and later stores return it.

use super::verdict::Verdict;
use crate::model::FunctionId;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct PurityCache {
    entries: DashMap<FunctionId, Verdict>,
}

impl PurityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, function: FunctionId) -> Option<Verdict> {
        self.entries.get(&function).map(|entry| *entry)
    }

    /// Store a verdict unless one is already cached; returns the cached one.
    pub fn insert(&self, function: FunctionId, verdict: Verdict) -> Verdict {
        let stored = *self.entries.entry(function).or_insert(verdict);
        if stored != verdict {
            log::debug!(
                "Concurrent analysis of {} reached {} but {} was already cached",
                function,
                verdict,
                stored
            );
        }
        stored
    }

    pub fn contains(&self, function: FunctionId) -> bool {
        self.entries.contains_key(&function)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry, e.g. between two runs over a changed model
    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;

    #[test]
    fn test_cache_new() {
        let cache = PurityCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get(FunctionId(0)), None);
    }

    #[test]
    fn test_first_write_wins() {
        let cache = PurityCache::new();
        let f = FunctionId(1);
        assert_eq!(cache.insert(f, Verdict::PURE), Verdict::PURE);

        let impure = Verdict::impure_at(Location::new(1, 1));
        assert_eq!(cache.insert(f, impure), Verdict::PURE);
        assert_eq!(cache.get(f), Some(Verdict::PURE));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clear() {
        let cache = PurityCache::new();
        cache.insert(FunctionId(4), Verdict::IMPURE);
        assert!(cache.contains(FunctionId(4)));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_inserts_agree() {
        use rayon::prelude::*;

        let cache = PurityCache::new();
        let results: Vec<Verdict> = (0..64)
            .into_par_iter()
            .map(|i| {
                let verdict = if i % 2 == 0 {
                    Verdict::PURE
                } else {
                    Verdict::IMPURE
                };
                cache.insert(FunctionId(7), verdict)
            })
            .collect();
        let first = results[0];
        assert!(results.iter().all(|v| *v == first));
    }
}
