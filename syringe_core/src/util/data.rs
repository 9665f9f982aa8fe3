use indexmap::map::Entry;
use indexmap::IndexMap;
use std::hash::Hash;

pub trait IndexMapExt<K, V> {
    // The same as [IndexMap::insert], but asserts that the key is not already present.
    fn insert_first(&mut self, key: K, value: V) -> &mut V;

    /// Insert only if the key is not present yet, returning whether the value was inserted.
    fn insert_if_absent(&mut self, key: K, value: V) -> bool;
}

impl<K, V> IndexMapExt<K, V> for IndexMap<K, V>
where
    K: Eq + Hash,
{
    fn insert_first(&mut self, key: K, value: V) -> &mut V {
        match self.entry(key) {
            Entry::Occupied(_) => panic!("entry already exists"),
            Entry::Vacant(entry) => entry.insert(value),
        }
    }

    fn insert_if_absent(&mut self, key: K, value: V) -> bool {
        match self.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IndexMapExt;
    use indexmap::IndexMap;

    #[test]
    fn insert_if_absent_keeps_first() {
        let mut map = IndexMap::new();
        assert!(map.insert_if_absent("a", 1));
        assert!(map.insert_if_absent("b", 2));
        assert!(!map.insert_if_absent("a", 3));
        assert_eq!(map.into_iter().collect::<Vec<_>>(), vec![("a", 1), ("b", 2)]);
    }

    #[test]
    #[should_panic(expected = "entry already exists")]
    fn insert_first_twice() {
        let mut map = IndexMap::new();
        map.insert_first(1, ());
        map.insert_first(1, ());
    }
}
