//! Provide hash containers, re-exports *hashbrown* and *foldhash*.
//!
//! All containers use [`FixedHashState`], so iteration order of a given
//! set of insertions is stable between runs. Code that needs a stable
//! *insertion* order (such as tree maps) keeps its own ordering and only
//! uses these containers as an index.

use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

const SEED: FixedState = FixedState::with_seed(0x5A1B_0C3D_9E2F_4A71);

/// The hasher built by [`FixedHashState`].
pub type FixedHasher = FoldHasher<'static>;

/// A `foldhash` state with a compile-time seed.
///
/// Equal inputs hash equally across runs and processes.
///
/// ```
/// use core::hash::BuildHasher;
/// use arbor_utils::hash::FixedHashState;
///
/// assert_eq!(FixedHashState.hash_one("key"), FixedHashState.hash_one("key"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline]
    fn build_hasher(&self) -> FixedHasher {
        SEED.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// Containers

/// A [`hashbrown::HashMap`] using [`FixedHashState`].
pub type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;

/// A [`hashbrown::HashSet`] using [`FixedHashState`].
pub type HashSet<T> = hashbrown::HashSet<T, FixedHashState>;

pub use hashbrown::hash_map::Entry;

// -----------------------------------------------------------------------------
// Re-export crates

pub use foldhash;
pub use hashbrown;

#[cfg(test)]
mod tests {
    use super::{HashMap, HashSet};

    #[test]
    fn fixed_state_containers() {
        let mut map: HashMap<&str, u32> = HashMap::default();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.get("a"), Some(&1));

        let mut set: HashSet<&str> = HashSet::default();
        assert!(set.insert("x"));
        assert!(!set.insert("x"));
        assert_eq!(set.len(), 1);
    }
}
