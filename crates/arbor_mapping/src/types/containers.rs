//! Collection and map descriptors for the standard containers.
//!
//! | Rust type                        | Class             | Name                  |
//! |----------------------------------|-------------------|-----------------------|
//! | `Vec<Option<T>>`                 | `VECTOR`          | `Vector<T>`           |
//! | `VecDeque<Option<T>>`            | `LIST`            | `List<T>`             |
//! | `HashSet<T>`                     | `UNORDERED_SET`   | `UnorderedSet<T>`     |
//! | `HashMap<K, Option<V>>`          | `UNORDERED_MAP`   | `UnorderedMap<K, V>`  |
//! | [`Fields<V>`]                    | `PAIR_LIST`       | `Fields<V>`           |
//!
//! `HashSet` and `HashMap` are the fixed-state containers from
//! `arbor_utils::hash`.

use alloc::collections::VecDeque;
use alloc::sync::Arc;
use core::any::Any;
use core::hash::Hash;
use core::marker::PhantomData;

use arbor_utils::hash::{HashMap, HashSet};

use crate::types::{Dispatcher, GenericTypeCell, Type, Typed, leak_name};
use crate::{BoxedAny, ClassId};

/// An ordered list of string-keyed entries that may repeat keys.
pub type Fields<V> = Vec<(Arc<str>, Option<V>)>;

/// Items of a collection, `None` for absent items.
pub type ItemIter<'a> = Box<dyn Iterator<Item = Option<&'a dyn Any>> + 'a>;

/// Entries of a map, `None` for absent values.
pub type EntryIter<'a> = Box<dyn Iterator<Item = (&'a dyn Any, Option<&'a dyn Any>)> + 'a>;

// -----------------------------------------------------------------------------
// CollectionDispatcher

/// Type-erased access to a sequence or set.
pub trait CollectionDispatcher: Send + Sync {
    fn item_type(&self) -> &'static Type;

    /// Iterates the items, `None` if `collection` is not of this type.
    fn iter<'a>(&self, collection: &'a dyn Any) -> Option<ItemIter<'a>>;

    /// Creates an empty collection.
    fn create(&self) -> BoxedAny;

    /// Appends an item, returning `false` if either side has the wrong type.
    fn add_item(&self, collection: &mut dyn Any, item: Option<BoxedAny>) -> bool;
}

trait CollectionStorage: Default + Send + Sync + 'static {
    type Item: Typed;

    fn items(&self) -> ItemIter<'_>;

    fn push(&mut self, item: Option<Self::Item>);
}

impl<T: Typed> CollectionStorage for Vec<Option<T>> {
    type Item = T;

    fn items(&self) -> ItemIter<'_> {
        Box::new(self.iter().map(|item| item.as_ref().map(|v| v as &dyn Any)))
    }

    fn push(&mut self, item: Option<T>) {
        Vec::push(self, item);
    }
}

impl<T: Typed> CollectionStorage for VecDeque<Option<T>> {
    type Item = T;

    fn items(&self) -> ItemIter<'_> {
        Box::new(self.iter().map(|item| item.as_ref().map(|v| v as &dyn Any)))
    }

    fn push(&mut self, item: Option<T>) {
        self.push_back(item);
    }
}

impl<T: Typed + Eq + Hash> CollectionStorage for HashSet<T> {
    type Item = T;

    fn items(&self) -> ItemIter<'_> {
        Box::new(self.iter().map(|item| Some(item as &dyn Any)))
    }

    // A set has no slot for an absent item.
    fn push(&mut self, item: Option<T>) {
        if let Some(item) = item {
            self.insert(item);
        }
    }
}

struct CollectionOf<C>(PhantomData<fn() -> C>);

impl<C: CollectionStorage> CollectionDispatcher for CollectionOf<C> {
    fn item_type(&self) -> &'static Type {
        C::Item::type_info()
    }

    fn iter<'a>(&self, collection: &'a dyn Any) -> Option<ItemIter<'a>> {
        collection.downcast_ref::<C>().map(C::items)
    }

    fn create(&self) -> BoxedAny {
        Box::new(C::default())
    }

    fn add_item(&self, collection: &mut dyn Any, item: Option<BoxedAny>) -> bool {
        let Some(collection) = collection.downcast_mut::<C>() else {
            return false;
        };
        match item.map(|item| item.downcast::<C::Item>()) {
            None => collection.push(None),
            Some(Ok(item)) => collection.push(Some(*item)),
            Some(Err(_)) => return false,
        }
        true
    }
}

fn collection_type<C: CollectionStorage>(class_id: ClassId, name: &str) -> Type {
    Type::new::<C>(
        class_id,
        leak_name(&[name, "<", C::Item::type_info().name(), ">"]),
        Dispatcher::Collection(Box::new(CollectionOf::<C>(PhantomData))),
    )
}

impl<T: Typed> Typed for Vec<Option<T>> {
    fn type_info() -> &'static Type {
        static CELL: GenericTypeCell = GenericTypeCell::new();
        CELL.get_or_insert::<Self>(|| collection_type::<Self>(ClassId::VECTOR, "Vector"))
    }
}

impl<T: Typed> Typed for VecDeque<Option<T>> {
    fn type_info() -> &'static Type {
        static CELL: GenericTypeCell = GenericTypeCell::new();
        CELL.get_or_insert::<Self>(|| collection_type::<Self>(ClassId::LIST, "List"))
    }
}

impl<T: Typed + Eq + Hash> Typed for HashSet<T> {
    fn type_info() -> &'static Type {
        static CELL: GenericTypeCell = GenericTypeCell::new();
        CELL.get_or_insert::<Self>(|| {
            collection_type::<Self>(ClassId::UNORDERED_SET, "UnorderedSet")
        })
    }
}

// -----------------------------------------------------------------------------
// MapDispatcher

/// Type-erased access to a keyed container.
pub trait MapDispatcher: Send + Sync {
    fn key_type(&self) -> &'static Type;

    fn value_type(&self) -> &'static Type;

    /// `false` for containers that keep repeated keys.
    fn unique_keys(&self) -> bool;

    /// Iterates the entries, `None` if `map` is not of this type.
    fn iter<'a>(&self, map: &'a dyn Any) -> Option<EntryIter<'a>>;

    /// Creates an empty map.
    fn create(&self) -> BoxedAny;

    /// Adds an entry, returning `false` if any part has the wrong type.
    ///
    /// Maps with unique keys keep the first value inserted for a key.
    fn insert(&self, map: &mut dyn Any, key: BoxedAny, value: Option<BoxedAny>) -> bool;
}

trait MapStorage: Default + Send + Sync + 'static {
    type Key: Typed;
    type Value: Typed;

    const UNIQUE_KEYS: bool;

    fn entries(&self) -> EntryIter<'_>;

    fn insert_entry(&mut self, key: Self::Key, value: Option<Self::Value>);
}

impl<K: Typed + Eq + Hash, V: Typed> MapStorage for HashMap<K, Option<V>> {
    type Key = K;
    type Value = V;

    const UNIQUE_KEYS: bool = true;

    fn entries(&self) -> EntryIter<'_> {
        Box::new(
            self.iter()
                .map(|(k, v)| (k as &dyn Any, v.as_ref().map(|v| v as &dyn Any))),
        )
    }

    fn insert_entry(&mut self, key: K, value: Option<V>) {
        self.entry(key).or_insert(value);
    }
}

impl<V: Typed> MapStorage for Fields<V> {
    type Key = Arc<str>;
    type Value = V;

    const UNIQUE_KEYS: bool = false;

    fn entries(&self) -> EntryIter<'_> {
        Box::new(
            self.iter()
                .map(|(k, v)| (k as &dyn Any, v.as_ref().map(|v| v as &dyn Any))),
        )
    }

    fn insert_entry(&mut self, key: Arc<str>, value: Option<V>) {
        self.push((key, value));
    }
}

struct MapOf<M>(PhantomData<fn() -> M>);

impl<M: MapStorage> MapDispatcher for MapOf<M> {
    fn key_type(&self) -> &'static Type {
        M::Key::type_info()
    }

    fn value_type(&self) -> &'static Type {
        M::Value::type_info()
    }

    #[inline]
    fn unique_keys(&self) -> bool {
        M::UNIQUE_KEYS
    }

    fn iter<'a>(&self, map: &'a dyn Any) -> Option<EntryIter<'a>> {
        map.downcast_ref::<M>().map(M::entries)
    }

    fn create(&self) -> BoxedAny {
        Box::new(M::default())
    }

    fn insert(&self, map: &mut dyn Any, key: BoxedAny, value: Option<BoxedAny>) -> bool {
        let Some(map) = map.downcast_mut::<M>() else {
            return false;
        };
        let Ok(key) = key.downcast::<M::Key>() else {
            return false;
        };
        match value.map(|value| value.downcast::<M::Value>()) {
            None => map.insert_entry(*key, None),
            Some(Ok(value)) => map.insert_entry(*key, Some(*value)),
            Some(Err(_)) => return false,
        }
        true
    }
}

impl<K: Typed + Eq + Hash, V: Typed> Typed for HashMap<K, Option<V>> {
    fn type_info() -> &'static Type {
        static CELL: GenericTypeCell = GenericTypeCell::new();
        CELL.get_or_insert::<Self>(|| {
            let name = leak_name(&[
                "UnorderedMap<",
                K::type_info().name(),
                ", ",
                V::type_info().name(),
                ">",
            ]);
            Type::new::<Self>(
                ClassId::UNORDERED_MAP,
                name,
                Dispatcher::Map(Box::new(MapOf::<Self>(PhantomData))),
            )
        })
    }
}

impl<V: Typed> Typed for Fields<V> {
    fn type_info() -> &'static Type {
        static CELL: GenericTypeCell = GenericTypeCell::new();
        CELL.get_or_insert::<Self>(|| {
            Type::new::<Self>(
                ClassId::PAIR_LIST,
                leak_name(&["Fields<", V::type_info().name(), ">"]),
                Dispatcher::Map(Box::new(MapOf::<Self>(PhantomData))),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;
    use alloc::sync::Arc;

    use arbor_utils::hash::{HashMap, HashSet};

    use super::Fields;
    use crate::ClassId;
    use crate::types::{Dispatcher, Typed};

    #[test]
    fn container_names() {
        assert_eq!(<Vec<Option<i32>>>::type_info().name(), "Vector<Int32>");
        assert_eq!(
            <VecDeque<Option<bool>>>::type_info().name(),
            "List<Boolean>"
        );
        assert_eq!(<HashSet<u8>>::type_info().name(), "UnorderedSet<UInt8>");
        assert_eq!(
            <HashMap<Arc<str>, Option<f64>>>::type_info().name(),
            "UnorderedMap<String, Float64>"
        );
        assert_eq!(<Fields<i8>>::type_info().class_id(), ClassId::PAIR_LIST);
    }

    #[test]
    fn collection_round_trip() {
        let ty = <Vec<Option<i32>>>::type_info();
        let Dispatcher::Collection(dispatcher) = ty.dispatcher() else {
            panic!("expected a collection");
        };

        let mut collection = dispatcher.create();
        assert!(dispatcher.add_item(&mut *collection, Some(Box::new(1_i32))));
        assert!(dispatcher.add_item(&mut *collection, None));
        assert!(!dispatcher.add_item(&mut *collection, Some(Box::new(1_u8))));

        let items: Vec<Option<i32>> = dispatcher
            .iter(&*collection)
            .unwrap()
            .map(|item| item.and_then(|v| v.downcast_ref::<i32>()).copied())
            .collect();
        assert_eq!(items, [Some(1), None]);
    }

    #[test]
    fn unique_map_keeps_first_value() {
        let ty = <HashMap<Arc<str>, Option<i32>>>::type_info();
        let Dispatcher::Map(dispatcher) = ty.dispatcher() else {
            panic!("expected a map");
        };

        let mut map = dispatcher.create();
        let key = || Box::new(Arc::<str>::from("k"));
        assert!(dispatcher.insert(&mut *map, key(), Some(Box::new(1_i32))));
        assert!(dispatcher.insert(&mut *map, key(), Some(Box::new(2_i32))));

        let map = map.downcast::<HashMap<Arc<str>, Option<i32>>>().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("k"), Some(&Some(1)));
    }
}
