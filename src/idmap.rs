use std::borrow::Borrow;
use std::hash::Hash;

use ahash::HashMap;

pub(crate) trait IdIndex<T> {
    fn to_id(index: usize) -> T;
    fn from_id(id: T) -> usize;
}

/// Interns values and hands out compact ids for them.
pub(crate) struct IdMap<K: Copy + IdIndex<K>, V: Eq + Hash + Clone> {
    by_id: Vec<V>,
    by_value: HashMap<V, K>,
}

impl<K: Copy + IdIndex<K>, V: Eq + Hash + Clone> IdMap<K, V> {
    pub(crate) fn new() -> Self {
        IdMap {
            by_id: Vec::new(),
            by_value: HashMap::default(),
        }
    }

    pub(crate) fn get_id_mut(&mut self, value: V) -> K {
        if let Some(id) = self.by_value.get(&value) {
            return *id;
        }
        let id = K::to_id(self.by_id.len());
        self.by_value.insert(value.clone(), id);
        self.by_id.push(value);
        id
    }

    /// Look up an id without interning.
    pub(crate) fn get_id<Q>(&self, value: &Q) -> Option<K>
    where
        V: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.by_value.get(value).copied()
    }

    #[inline]
    pub(crate) fn get_value(&self, id: K) -> &V {
        &self.by_id[K::from_id(id)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    struct Id(u32);

    impl IdIndex<Id> for Id {
        fn to_id(index: usize) -> Id {
            Id(index as u32)
        }

        fn from_id(id: Id) -> usize {
            id.0 as usize
        }
    }

    #[test]
    fn test_id_map() {
        let mut map = IdMap::<Id, String>::new();
        let id1 = map.get_id_mut("foo".to_string());
        let id2 = map.get_id_mut("bar".to_string());
        let id3 = map.get_id_mut("foo".to_string());
        assert_eq!(id1, id3);
        assert_ne!(id1, id2);
        assert_eq!(map.get_value(id1), "foo");
        assert_eq!(map.get_value(id2), "bar");
    }

    #[test]
    fn test_lookup_without_interning() {
        let mut map = IdMap::<Id, String>::new();
        let id = map.get_id_mut("foo".to_string());
        assert_eq!(map.get_id("foo"), Some(id));
        assert_eq!(map.get_id("bar"), None);
    }
}
