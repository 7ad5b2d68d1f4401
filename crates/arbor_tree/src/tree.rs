use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::ops::{Index, IndexMut};
use core::slice;

use crate::{TreeConversionError, TreeMap, TreeScalar};

/// One `(key, value)` entry of a [`Tree::Pairs`] node.
pub type Pair = (Arc<str>, Tree);

static NULL: Tree = Tree::Null;

// -----------------------------------------------------------------------------
// TreeType

/// The kind of representation currently held by a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeType {
    Null,
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    String,
    Vector,
    Map,
    Pairs,
}

impl TreeType {
    /// Returns the name used in diagnostics, spelled like the matching
    /// type names of `arbor_mapping` (`Int32`, `String`, `Vector`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Bool => "Boolean",
            Self::I8 => "Int8",
            Self::U8 => "UInt8",
            Self::I16 => "Int16",
            Self::U16 => "UInt16",
            Self::I32 => "Int32",
            Self::U32 => "UInt32",
            Self::I64 => "Int64",
            Self::U64 => "UInt64",
            Self::F32 => "Float32",
            Self::F64 => "Float64",
            Self::String => "String",
            Self::Vector => "Vector",
            Self::Map => "Map",
            Self::Pairs => "Pairs",
        }
    }

    /// Returns `true` for the integer and floating point kinds.
    pub const fn is_number(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::U8
                | Self::I16
                | Self::U16
                | Self::I32
                | Self::U32
                | Self::I64
                | Self::U64
                | Self::F32
                | Self::F64
        )
    }
}

impl fmt::Display for TreeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

// -----------------------------------------------------------------------------
// Tree

/// A JSON-like node holding exactly one representation.
///
/// Replacing the representation drops the previous payload. Cloning copies
/// vectors, maps and pairs, while string payloads stay shared because they
/// are never mutated in place.
///
/// Mutable indexing upserts: `tree["key"]` inserts a missing key and
/// `tree[i]` grows a vector with `Null` slots. A `Null` node is turned into
/// the accessed container first.
///
/// # Examples
///
/// ```
/// use arbor_tree::{Tree, TreeType};
///
/// let mut node = Tree::default();
/// assert!(node.is_null());
///
/// node[2] = true.into();
/// assert_eq!(node.tree_type(), TreeType::Vector);
/// assert_eq!(node.as_vector().map(|v| v.len()), Some(3));
/// assert!(node[0].is_null());
/// ```
#[derive(Clone, Default, PartialEq)]
pub enum Tree {
    #[default]
    Null,
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(Arc<str>),
    Vector(Vec<Tree>),
    Map(TreeMap),
    Pairs(Vec<Pair>),
}

impl Tree {
    /// Returns the kind of the current representation.
    pub const fn tree_type(&self) -> TreeType {
        match self {
            Self::Null => TreeType::Null,
            Self::Bool(_) => TreeType::Bool,
            Self::I8(_) => TreeType::I8,
            Self::U8(_) => TreeType::U8,
            Self::I16(_) => TreeType::I16,
            Self::U16(_) => TreeType::U16,
            Self::I32(_) => TreeType::I32,
            Self::U32(_) => TreeType::U32,
            Self::I64(_) => TreeType::I64,
            Self::U64(_) => TreeType::U64,
            Self::F32(_) => TreeType::F32,
            Self::F64(_) => TreeType::F64,
            Self::String(_) => TreeType::String,
            Self::Vector(_) => TreeType::Vector,
            Self::Map(_) => TreeType::Map,
            Self::Pairs(_) => TreeType::Pairs,
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub fn set_null(&mut self) {
        *self = Self::Null;
    }

    /// Moves the payload out, leaving `Null` behind.
    #[inline]
    pub fn take(&mut self) -> Tree {
        core::mem::take(self)
    }

    // -------------------------------------------------------------------------
    // Scalars

    /// Replaces the node with the scalar `value`.
    #[inline]
    pub fn set_value<T: TreeScalar>(&mut self, value: T) {
        *self = value.into_tree();
    }

    /// Returns the scalar if the node holds exactly the kind of `T`.
    ///
    /// Use [`to_scalar`](Self::to_scalar) for converting between numeric kinds.
    #[inline]
    pub fn get_value<T: TreeScalar>(&self) -> Option<T> {
        T::from_tree(self)
    }

    /// Checked conversion of any compatible scalar kind into `T`.
    ///
    /// With `lossy` set, out-of-range numbers are cast with `as` semantics
    /// (saturating for floats, truncating for integers) instead of failing.
    #[inline]
    pub fn to_scalar<T: TreeScalar>(&self, lossy: bool) -> Result<T, TreeConversionError> {
        T::convert_from(self, lossy)
    }

    // -------------------------------------------------------------------------
    // String

    #[inline]
    pub fn set_string(&mut self, value: impl Into<Arc<str>>) {
        *self = Self::String(value.into());
    }

    /// Returns the shared string payload.
    #[inline]
    pub fn get_string(&self) -> Option<&Arc<str>> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        self.get_string().map(|s| &**s)
    }

    // -------------------------------------------------------------------------
    // Vector

    #[inline]
    pub fn set_vector(&mut self, vector: Vec<Tree>) {
        *self = Self::Vector(vector);
    }

    /// Replaces the node with a vector of `len` `Null` nodes.
    pub fn set_vector_with_len(&mut self, len: usize) {
        let mut vector = Vec::with_capacity(len);
        vector.resize_with(len, Tree::default);
        *self = Self::Vector(vector);
    }

    #[inline]
    pub fn as_vector(&self) -> Option<&[Tree]> {
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the vector, converting a `Null` node into an empty one.
    pub fn vector_mut(&mut self) -> Option<&mut Vec<Tree>> {
        if self.is_null() {
            *self = Self::Vector(Vec::new());
        }
        match self {
            Self::Vector(v) => Some(v),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Map

    #[inline]
    pub fn set_map(&mut self, map: TreeMap) {
        *self = Self::Map(map);
    }

    #[inline]
    pub fn as_map(&self) -> Option<&TreeMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the map, converting a `Null` node into an empty one.
    pub fn map_mut(&mut self) -> Option<&mut TreeMap> {
        if self.is_null() {
            *self = Self::Map(TreeMap::new());
        }
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Pairs

    #[inline]
    pub fn set_pairs(&mut self, pairs: Vec<Pair>) {
        *self = Self::Pairs(pairs);
    }

    #[inline]
    pub fn as_pairs(&self) -> Option<&[Pair]> {
        match self {
            Self::Pairs(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the pairs, converting a `Null` node into an empty list.
    pub fn pairs_mut(&mut self) -> Option<&mut Vec<Pair>> {
        if self.is_null() {
            *self = Self::Pairs(Vec::new());
        }
        match self {
            Self::Pairs(p) => Some(p),
            _ => None,
        }
    }

    // -------------------------------------------------------------------------
    // Keyed access

    /// Iterates the entries of a `Map` or `Pairs` node in order.
    ///
    /// Duplicate keys of a `Pairs` node are all yielded.
    pub fn entries(&self) -> Option<Entries<'_>> {
        match self {
            Self::Map(m) => Some(Entries(m.as_slice().iter())),
            Self::Pairs(p) => Some(Entries(p.iter())),
            _ => None,
        }
    }

    /// Looks up `key` in a `Map`, or the first matching entry of `Pairs`.
    pub fn get(&self, key: &str) -> Option<&Tree> {
        match self {
            Self::Map(m) => m.get(key),
            Self::Pairs(p) => p.iter().find(|(k, _)| &**k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the vector element at `index`, never grows.
    pub fn get_at(&self, index: usize) -> Option<&Tree> {
        match self {
            Self::Vector(v) => v.get(index),
            _ => None,
        }
    }

    /// Upserting keyed access: returns the slot for `key`, inserting `Null`
    /// when absent. `Null` nodes become maps. Returns `None` for nodes that
    /// are neither null, map nor pairs.
    pub fn get_or_insert<K>(&mut self, key: K) -> Option<&mut Tree>
    where
        K: AsRef<str> + Into<Arc<str>>,
    {
        if self.is_null() {
            *self = Self::Map(TreeMap::new());
        }
        match self {
            Self::Map(m) => Some(m.get_or_insert_null(key)),
            Self::Pairs(p) => {
                let pos = match p.iter().position(|(k, _)| **k == *key.as_ref()) {
                    Some(pos) => pos,
                    None => {
                        p.push((key.into(), Tree::Null));
                        p.len() - 1
                    }
                };
                Some(&mut p[pos].1)
            }
            _ => None,
        }
    }

    /// Upserting positional access: grows the vector with `Null` slots up to
    /// `index`. `Null` nodes become vectors. Returns `None` for other kinds.
    pub fn get_or_grow(&mut self, index: usize) -> Option<&mut Tree> {
        let vector = self.vector_mut()?;
        if index >= vector.len() {
            vector.resize_with(index + 1, Tree::default);
        }
        vector.get_mut(index)
    }
}

// -----------------------------------------------------------------------------
// Entries

/// Ordered iterator over the entries of a `Map` or `Pairs` node.
#[derive(Clone)]
pub struct Entries<'a>(slice::Iter<'a, Pair>);

impl<'a> Iterator for Entries<'a> {
    type Item = (&'a Arc<str>, &'a Tree);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k, v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Entries<'_> {}

// -----------------------------------------------------------------------------
// Indexing

impl Index<&str> for Tree {
    type Output = Tree;

    /// Returns a shared `Null` for absent keys and non-map nodes.
    fn index(&self, key: &str) -> &Tree {
        self.get(key).unwrap_or(&NULL)
    }
}

impl IndexMut<&str> for Tree {
    /// # Panics
    ///
    /// Panics if the node is neither `Null`, `Map` nor `Pairs`.
    fn index_mut(&mut self, key: &str) -> &mut Tree {
        let found = self.tree_type();
        match self.get_or_insert(key) {
            Some(slot) => slot,
            None => panic!("cannot access key '{key}' in a tree node of type {found}"),
        }
    }
}

impl Index<usize> for Tree {
    type Output = Tree;

    /// Returns a shared `Null` for out-of-range indices and non-vector nodes.
    fn index(&self, index: usize) -> &Tree {
        self.get_at(index).unwrap_or(&NULL)
    }
}

impl IndexMut<usize> for Tree {
    /// # Panics
    ///
    /// Panics if the node is neither `Null` nor `Vector`.
    fn index_mut(&mut self, index: usize) -> &mut Tree {
        let found = self.tree_type();
        match self.get_or_grow(index) {
            Some(slot) => slot,
            None => panic!("cannot access index {index} in a tree node of type {found}"),
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Tree {
                #[inline]
                fn from(value: $ty) -> Self {
                    value.into_tree()
                }
            }
        )*
    };
}

impl_from_scalar!(bool, i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl From<&str> for Tree {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(Arc::from(value))
    }
}

impl From<String> for Tree {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(Arc::from(value))
    }
}

impl From<Arc<str>> for Tree {
    #[inline]
    fn from(value: Arc<str>) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Tree>> for Tree {
    #[inline]
    fn from(value: Vec<Tree>) -> Self {
        Self::Vector(value)
    }
}

impl From<TreeMap> for Tree {
    #[inline]
    fn from(value: TreeMap) -> Self {
        Self::Map(value)
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Bool(v) => fmt::Debug::fmt(v, f),
            Self::I8(v) => write!(f, "{v}i8"),
            Self::U8(v) => write!(f, "{v}u8"),
            Self::I16(v) => write!(f, "{v}i16"),
            Self::U16(v) => write!(f, "{v}u16"),
            Self::I32(v) => write!(f, "{v}i32"),
            Self::U32(v) => write!(f, "{v}u32"),
            Self::I64(v) => write!(f, "{v}i64"),
            Self::U64(v) => write!(f, "{v}u64"),
            Self::F32(v) => write!(f, "{v}f32"),
            Self::F64(v) => write!(f, "{v}f64"),
            Self::String(v) => fmt::Debug::fmt(&**v, f),
            Self::Vector(v) => f.debug_list().entries(v).finish(),
            Self::Map(v) => fmt::Debug::fmt(v, f),
            Self::Pairs(v) => f
                .debug_list()
                .entries(v.iter().map(|(k, v)| (&**k, v)))
                .finish(),
        }
    }
}
