use std::collections::HashMap;
use std::sync::Mutex;

use crate::types::PriceSeries;

/// Cache of fetched histories keyed by `(symbol, period)`. Entries are
/// immutable snapshots; a miss always triggers a full refetch and
/// recomputation. Correctness never depends on a hit.
pub struct HistoryCache {
    data: Mutex<HashMap<String, PriceSeries>>,
    capacity: usize,
}

impl HistoryCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Mutex::new(HashMap::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn key(symbol: &str, period: &str) -> String {
        format!("{}:{}", symbol, period)
    }

    pub fn get(&self, key: &str) -> Option<PriceSeries> {
        let data = self.data.lock().unwrap();
        data.get(key).cloned()
    }

    pub fn set(&self, key: String, value: PriceSeries) {
        let mut data = self.data.lock().unwrap();
        if data.len() >= self.capacity {
            // A simple eviction strategy: clear the cache when full.
            data.clear();
        }
        data.insert(key, value);
    }
}
