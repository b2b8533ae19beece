//! A store a test can inspect after handing it over.

use std::sync::Arc;

use arrange::{MemoryStore, Store, StoreKey};
use parking_lot::Mutex;

#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<MemoryStore>>,
}

impl SharedStore {
    pub fn new(store: MemoryStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn order(&self, name: &str) -> Option<Vec<String>> {
        self.inner.lock().order(name).map(<[String]>::to_vec)
    }

    pub fn writes(&self) -> usize {
        self.inner.lock().writes()
    }
}

impl Store for SharedStore {
    fn get(&mut self, key: &StoreKey<'_>) -> Option<Vec<String>> {
        self.inner.lock().get(key)
    }

    fn set(&mut self, key: &StoreKey<'_>, order: &[String]) {
        self.inner.lock().set(key, order);
    }
}
