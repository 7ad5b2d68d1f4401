//! `serde` bridge: any data format can encode or decode a [`Tree`].
//!
//! Maps are decoded into [`Tree::Map`] unless a key repeats, in which case
//! the whole object becomes [`Tree::Pairs`] so no entry is lost.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use arbor_utils::hash::HashSet;
use serde_core::de::{self, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{SerializeMap, SerializeSeq};
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Pair, Tree, TreeMap};

// -----------------------------------------------------------------------------
// Serialize

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tree::Null => serializer.serialize_unit(),
            Tree::Bool(v) => serializer.serialize_bool(*v),
            Tree::I8(v) => serializer.serialize_i8(*v),
            Tree::U8(v) => serializer.serialize_u8(*v),
            Tree::I16(v) => serializer.serialize_i16(*v),
            Tree::U16(v) => serializer.serialize_u16(*v),
            Tree::I32(v) => serializer.serialize_i32(*v),
            Tree::U32(v) => serializer.serialize_u32(*v),
            Tree::I64(v) => serializer.serialize_i64(*v),
            Tree::U64(v) => serializer.serialize_u64(*v),
            Tree::F32(v) => serializer.serialize_f32(*v),
            Tree::F64(v) => serializer.serialize_f64(*v),
            Tree::String(v) => serializer.serialize_str(v),
            Tree::Vector(v) => {
                let mut state = serializer.serialize_seq(Some(v.len()))?;
                for item in v {
                    state.serialize_element(item)?;
                }
                state.end()
            }
            Tree::Map(m) => serialize_entries(serializer, m.as_slice()),
            Tree::Pairs(p) => serialize_entries(serializer, p),
        }
    }
}

fn serialize_entries<S: Serializer>(serializer: S, entries: &[Pair]) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_map(Some(entries.len()))?;
    for (key, value) in entries {
        state.serialize_entry(&**key, value)?;
    }
    state.end()
}

// -----------------------------------------------------------------------------
// Deserialize

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TreeVisitor)
    }
}

struct TreeVisitor;

impl<'de> Visitor<'de> for TreeVisitor {
    type Value = Tree;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any tree value")
    }

    #[inline]
    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Tree::Null)
    }

    #[inline]
    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(Tree::Null)
    }

    #[inline]
    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        Tree::deserialize(deserializer)
    }

    #[inline]
    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Tree::Bool(v))
    }

    #[inline]
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Tree::I64(v))
    }

    /// Integers that fit are kept signed, matching text formats where
    /// sign is not part of the type.
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(match i64::try_from(v) {
            Ok(signed) => Tree::I64(signed),
            Err(_) => Tree::U64(v),
        })
    }

    #[inline]
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Tree::F64(v))
    }

    #[inline]
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Tree::String(Arc::from(v)))
    }

    #[inline]
    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Tree::String(Arc::from(v)))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut vector = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Tree>()? {
            vector.push(item);
        }
        Ok(Tree::Vector(vector))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut pairs: Vec<Pair> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        let mut seen: HashSet<Arc<str>> = HashSet::default();
        let mut duplicated = false;

        while let Some(key) = map.next_key::<String>()? {
            let key: Arc<str> = Arc::from(key);
            let value = map.next_value::<Tree>()?;
            duplicated |= !seen.insert(key.clone());
            pairs.push((key, value));
        }

        if duplicated {
            Ok(Tree::Pairs(pairs))
        } else {
            Ok(Tree::Map(pairs.into_iter().collect::<TreeMap>()))
        }
    }
}
