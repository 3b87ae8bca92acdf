use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::generate::NameTable;
use crate::locale::LocaleTag;

type Slot = Arc<OnceLock<Arc<NameTable>>>;

/// Deduplicated name tables of the display locales resolved so far in one run.
///
/// Each locale gets its own slot. The map lock is only held to fetch a slot; the table is
/// then built inside the slot's `OnceLock`, so concurrent requests for the same locale
/// wait for one computation while other locales proceed.
#[derive(Debug, Default)]
pub struct FallbackCache {
    slots: Mutex<HashMap<LocaleTag, Slot>>,
    computed: AtomicUsize,
}

impl FallbackCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `locale`, running `compute` if nobody has yet.
    ///
    /// `compute` may resolve other locales through this cache, but never `locale` itself.
    pub fn get_or_compute<F>(&self, locale: &LocaleTag, compute: F) -> Arc<NameTable>
    where
        F: FnOnce() -> NameTable,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(locale.clone()).or_default())
        };
        Arc::clone(slot.get_or_init(|| {
            self.computed.fetch_add(1, Ordering::Relaxed);
            Arc::new(compute())
        }))
    }

    /// The finished table for `locale`, if any.
    pub fn get(&self, locale: &LocaleTag) -> Option<Arc<NameTable>> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(locale).and_then(|slot| slot.get().cloned())
    }

    pub fn contains(&self, locale: &LocaleTag) -> bool {
        self.get(locale).is_some()
    }

    /// How many tables were actually computed (as opposed to served from the cache).
    pub fn computed(&self) -> usize {
        self.computed.load(Ordering::Relaxed)
    }

    /// Drop everything, ready for a new run.
    pub fn clear(&mut self) {
        self.slots
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        *self.computed.get_mut() = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::tag;
    use std::thread;

    #[test]
    fn computes_once_per_locale() {
        let cache = FallbackCache::new();
        let de = tag("de");
        let first = cache.get_or_compute(&de, || NameTable::from([(tag("de"), "Deutsch".into())]));
        let second = cache.get_or_compute(&de, || panic!("recomputed"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.computed(), 1);
        assert!(cache.contains(&de));
        assert!(!cache.contains(&tag("fr")));
    }

    #[test]
    fn nested_resolution_of_other_locales() {
        let cache = FallbackCache::new();
        let outer = cache.get_or_compute(&tag("de_AT"), || {
            let parent = cache.get_or_compute(&tag("de"), NameTable::new);
            assert!(parent.is_empty());
            NameTable::new()
        });
        assert!(outer.is_empty());
        assert_eq!(cache.computed(), 2);
    }

    #[test]
    fn concurrent_requests_share_one_computation() {
        let cache = FallbackCache::new();
        let de = tag("de");
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    cache.get_or_compute(&de, || {
                        thread::sleep(std::time::Duration::from_millis(5));
                        NameTable::new()
                    })
                });
            }
        });
        assert_eq!(cache.computed(), 1);
    }

    #[test]
    fn clear_resets() {
        let mut cache = FallbackCache::new();
        cache.get_or_compute(&tag("de"), NameTable::new);
        cache.clear();
        assert!(!cache.contains(&tag("de")));
        assert_eq!(cache.computed(), 0);
    }
}
