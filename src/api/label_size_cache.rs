use std::collections::HashMap;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::{LabelSize, LabelText};

use super::label_oracle::{FontDescriptor, LabelSizeOracle};

/// Hit/miss counters for the label measurement cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelSizeCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LabelSizeCacheKey {
    text: String,
    family: String,
    size_px: OrderedFloat<f64>,
}

/// Memoized label extents keyed by label content and font.
///
/// Entries stay valid until the oracle or font changes; hosts call
/// [`LabelSizeCache::invalidate`] in that case.
#[derive(Debug, Default)]
pub struct LabelSizeCache {
    entries: HashMap<LabelSizeCacheKey, LabelSize>,
    hits: u64,
    misses: u64,
}

impl LabelSizeCache {
    const MAX_ENTRIES: usize = 8192;

    pub fn measure(
        &mut self,
        oracle: &dyn LabelSizeOracle,
        label: &LabelText,
        font: &FontDescriptor,
    ) -> LabelSize {
        let key = LabelSizeCacheKey {
            text: label.cache_key(),
            family: font.family.clone(),
            size_px: OrderedFloat(font.size_px),
        };
        if let Some(size) = self.entries.get(&key) {
            self.hits = self.hits.saturating_add(1);
            return *size;
        }

        self.misses = self.misses.saturating_add(1);
        let size = oracle.measure(label, font);
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.clear();
        }
        self.entries.insert(key, size);
        size
    }

    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn stats(&self) -> LabelSizeCacheStats {
        LabelSizeCacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::LabelSizeCache;
    use crate::api::label_oracle::{FontDescriptor, LabelSizeOracle};
    use crate::core::{LabelSize, LabelText};

    #[derive(Default)]
    struct CountingOracle {
        calls: Cell<usize>,
    }

    impl LabelSizeOracle for CountingOracle {
        fn measure(&self, label: &LabelText, _font: &FontDescriptor) -> LabelSize {
            self.calls.set(self.calls.get() + 1);
            LabelSize::new(label.cache_key().len() as f64, 10.0, 10.0)
        }
    }

    #[test]
    fn repeated_labels_hit_the_cache() {
        let oracle = CountingOracle::default();
        let font = FontDescriptor::default();
        let mut cache = LabelSizeCache::default();

        let first = cache.measure(&oracle, &LabelText::plain("1.5"), &font);
        let second = cache.measure(&oracle, &LabelText::plain("1.5"), &font);
        assert_eq!(first, second);
        assert_eq!(oracle.calls.get(), 1);

        let bigger = FontDescriptor::new(font.family.clone(), 14.0);
        cache.measure(&oracle, &LabelText::plain("1.5"), &bigger);
        assert_eq!(oracle.calls.get(), 2);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 2, 2));
    }

    #[test]
    fn invalidate_forces_remeasure() {
        let oracle = CountingOracle::default();
        let font = FontDescriptor::default();
        let mut cache = LabelSizeCache::default();
        cache.measure(&oracle, &LabelText::plain("x"), &font);
        cache.invalidate();
        cache.measure(&oracle, &LabelText::plain("x"), &font);
        assert_eq!(oracle.calls.get(), 2);
    }
}
