use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::Index;
use core::slice;

use arbor_utils::hash::HashMap;

use crate::{Pair, Tree};

// -----------------------------------------------------------------------------
// TreeMap

/// An insertion-ordered map with unique string keys.
///
/// Entries live in a vector so positional access is available; a hash index
/// maps each key to its position.
///
/// # Examples
///
/// ```
/// use arbor_tree::{Tree, TreeMap};
///
/// let mut map = TreeMap::new();
/// map.insert("b", Tree::from(2_i32));
/// map.insert("a", Tree::from(1_i32));
///
/// assert_eq!(map.get_index(0).map(|(k, _)| &**k), Some("b"));
/// assert_eq!(map["a"].get_value::<i32>(), Some(1));
/// ```
#[derive(Clone, Default)]
pub struct TreeMap {
    entries: Vec<Pair>,
    index: HashMap<Arc<str>, usize>,
}

impl TreeMap {
    /// Creates an empty map.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Tree> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// Returns the entry at insertion position `index`.
    pub fn get_index(&self, index: usize) -> Option<(&Arc<str>, &Tree)> {
        self.entries.get(index).map(|(k, v)| (k, v))
    }

    pub fn get_index_mut(&mut self, index: usize) -> Option<(&Arc<str>, &mut Tree)> {
        self.entries.get_mut(index).map(|(k, v)| (&*k, v))
    }

    /// Inserts `value` under `key`.
    ///
    /// An existing key keeps its position and the old value is returned.
    pub fn insert<K>(&mut self, key: K, value: Tree) -> Option<Tree>
    where
        K: AsRef<str> + Into<Arc<str>>,
    {
        if let Some(&i) = self.index.get(key.as_ref()) {
            return Some(core::mem::replace(&mut self.entries[i].1, value));
        }
        self.push_new(key.into(), value);
        None
    }

    /// Returns the slot for `key`, inserting `Null` at the end when absent.
    pub fn get_or_insert_null<K>(&mut self, key: K) -> &mut Tree
    where
        K: AsRef<str> + Into<Arc<str>>,
    {
        let i = match self.index.get(key.as_ref()) {
            Some(&i) => i,
            None => self.push_new(key.into(), Tree::Null),
        };
        &mut self.entries[i].1
    }

    /// Removes `key`, shifting later entries to keep the order.
    pub fn remove(&mut self, key: &str) -> Option<Tree> {
        let i = self.index.remove(key)?;
        let (_, value) = self.entries.remove(i);
        for pos in self.index.values_mut() {
            if *pos > i {
                *pos -= 1;
            }
        }
        Some(value)
    }

    /// Iterates entries in insertion order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Arc<str>, &Tree)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    #[inline]
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &Arc<str>> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Entries in insertion order.
    #[inline]
    pub fn as_slice(&self) -> &[Pair] {
        &self.entries
    }

    fn push_new(&mut self, key: Arc<str>, value: Tree) -> usize {
        let i = self.entries.len();
        self.index.insert(key.clone(), i);
        self.entries.push((key, value));
        i
    }
}

impl PartialEq for TreeMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl fmt::Debug for TreeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (&**k, v)))
            .finish()
    }
}

impl Index<&str> for TreeMap {
    type Output = Tree;

    /// # Panics
    ///
    /// Panics if `key` is absent.
    fn index(&self, key: &str) -> &Tree {
        match self.get(key) {
            Some(value) => value,
            None => panic!("key '{key}' not found in tree map"),
        }
    }
}

impl<K> FromIterator<(K, Tree)> for TreeMap
where
    K: AsRef<str> + Into<Arc<str>>,
{
    /// Later duplicates overwrite earlier values in place.
    fn from_iter<I: IntoIterator<Item = (K, Tree)>>(iter: I) -> Self {
        let mut map = TreeMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K> Extend<(K, Tree)> for TreeMap
where
    K: AsRef<str> + Into<Arc<str>>,
{
    fn extend<I: IntoIterator<Item = (K, Tree)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for TreeMap {
    type Item = Pair;
    type IntoIter = alloc::vec::IntoIter<Pair>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a TreeMap {
    type Item = &'a Pair;
    type IntoIter = slice::Iter<'a, Pair>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
