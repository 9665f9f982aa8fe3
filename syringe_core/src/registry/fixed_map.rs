// This file is also embedded verbatim into generated Rust registries,
// so it must only depend on `core` and must not refer to anything else in this crate.

use core::borrow::Borrow;
use core::cmp::Ordering;
use core::fmt;
use core::ops::Index;

/// Map with a fixed capacity `N`, backed by an array kept sorted by key.
///
/// Lookups use binary search and the map never allocates.
/// Iteration yields entries in ascending key order.
#[derive(Clone, Eq, PartialEq)]
pub struct FixedMap<K, V, const N: usize> {
    // invariant: exactly the first `len` slots are filled, and their keys are strictly increasing
    slots: [Option<(K, V)>; N],
    len: usize,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CapacityExceeded {
    pub capacity: usize,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct NotFound;

impl<K, V, const N: usize> FixedMap<K, V, N> {
    pub const fn new() -> Self {
        FixedMap {
            slots: [const { None }; N],
            len: 0,
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.slots[..self.len].iter(),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }
}

impl<K: Ord, V, const N: usize> FixedMap<K, V, N> {
    fn search<Q>(&self, key: &Q) -> Result<usize, usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.slots[..self.len].binary_search_by(|slot| match slot {
            Some((k, _)) => k.borrow().cmp(key),
            None => Ordering::Greater,
        })
    }

    /// Insert a new entry, or overwrite the value of an existing one.
    ///
    /// Returns the previous value if the key was already present.
    /// Fails without modifying the map if the key is new and the map is already full.
    pub fn insert(&mut self, key: K, value: V) -> Result<Option<V>, CapacityExceeded> {
        match self.search(&key) {
            Ok(index) => Ok(self.slots[index]
                .as_mut()
                .map(|(_, slot_value)| core::mem::replace(slot_value, value))),
            Err(index) => {
                if self.len == N {
                    return Err(CapacityExceeded { capacity: N });
                }

                // the slot at `len` is empty, rotating it down to `index` shifts the tail up by one
                self.slots[index..=self.len].rotate_right(1);
                self.slots[index] = Some((key, value));
                self.len += 1;
                Ok(None)
            }
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let index = self.search(key).ok()?;
        self.slots[index].as_ref().map(|(k, v)| (k, v))
    }

    /// Like [FixedMap::get], but treats a missing key as an error.
    pub fn at<Q>(&self, key: &Q) -> Result<&V, NotFound>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get(key).ok_or(NotFound)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_ok()
    }
}

impl<K, V, const N: usize> Default for FixedMap<K, V, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, Q, const N: usize> Index<&Q> for FixedMap<K, V, N>
where
    K: Ord + Borrow<Q>,
    Q: ?Sized + Ord,
{
    type Output = V;

    fn index(&self, key: &Q) -> &V {
        match self.get(key) {
            Some(value) => value,
            None => panic!("FixedMap: key not found"),
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, const N: usize> fmt::Debug for FixedMap<K, V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, const N: usize> IntoIterator for &'a FixedMap<K, V, N> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a, K, V> {
    inner: core::slice::Iter<'a, Option<(K, V)>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((k, v)) = self.inner.next()? {
                return Some((k, v));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((k, v)) = self.inner.next_back()? {
                return Some((k, v));
            }
        }
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl fmt::Display for CapacityExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedMap capacity of {} entries exceeded", self.capacity)
    }
}

impl core::error::Error for CapacityExceeded {}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FixedMap: key not found")
    }
}

impl core::error::Error for NotFound {}
