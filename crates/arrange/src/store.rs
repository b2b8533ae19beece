//! Order persistence.

use crate::sortable::SortableId;
use arrange_core::alloc::HashMap;
use arrange_dom::NodeId;

/// Identifies the container being saved or restored.
#[derive(Debug, Clone, Copy)]
pub struct StoreKey<'a> {
    pub sortable: SortableId,
    pub element: NodeId,
    pub group: Option<&'a str>,
}

impl StoreKey<'_> {
    /// The group name, or a name derived from the element.
    pub fn name(&self) -> String {
        match self.group {
            Some(group) if !group.is_empty() => group.to_string(),
            _ => format!("sortable-{}", self.element.0),
        }
    }
}

/// Where a container's order is kept between sessions.
pub trait Store {
    /// Order to restore when the container is registered.
    fn get(&mut self, key: &StoreKey<'_>) -> Option<Vec<String>>;

    /// Called after every committed reorder.
    fn set(&mut self, key: &StoreKey<'_>, order: &[String]);
}

/// In-process store keyed by [`StoreKey::name`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    orders: HashMap<String, Vec<String>>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, name: &str, order: &[&str]) -> Self {
        self.orders
            .insert(name.to_string(), order.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn order(&self, name: &str) -> Option<&[String]> {
        self.orders.get(name).map(Vec::as_slice)
    }

    /// Number of `set` calls so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Store for MemoryStore {
    fn get(&mut self, key: &StoreKey<'_>) -> Option<Vec<String>> {
        self.orders.get(&key.name()).cloned()
    }

    fn set(&mut self, key: &StoreKey<'_>, order: &[String]) {
        tracing::trace!("Saving order of {} ({} items)", key.name(), order.len());
        self.orders.insert(key.name(), order.to_vec());
        self.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new().with_order("tasks", &["b", "a"]);
        let key = StoreKey {
            sortable: SortableId(0),
            element: NodeId(1),
            group: Some("tasks"),
        };
        assert_eq!(store.get(&key), Some(vec!["b".to_string(), "a".to_string()]));

        let anonymous = StoreKey { group: None, ..key };
        assert_eq!(anonymous.name(), "sortable-1");
        assert_eq!(store.get(&anonymous), None);
        store.set(&anonymous, &["x".to_string()]);
        assert_eq!(store.order("sortable-1"), Some(&["x".to_string()][..]));
        assert_eq!(store.writes(), 1);
    }
}
