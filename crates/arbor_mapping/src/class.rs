use core::fmt;
use core::hash::{Hash, Hasher};
use core::sync::atomic::{AtomicU32, Ordering};

// -----------------------------------------------------------------------------
// ClassId

/// Number of built-in class ids, custom ids start here.
const BUILTIN_COUNT: u32 = 20;

static NEXT_CLASS_ID: AtomicU32 = AtomicU32::new(BUILTIN_COUNT);

/// A stable identity for a family of runtime types, used to index
/// [`DispatchTable`](crate::DispatchTable)s.
///
/// All records share [`ClassId::OBJECT`], all enums share [`ClassId::ENUM`],
/// and so on; the concrete shape is described by the type's
/// [`Dispatcher`](crate::types::Dispatcher). Custom types that should be
/// handled by their own mapper methods (or only through interpretations)
/// get a fresh id from [`ClassId::register`].
///
/// Equality and hashing only consider the numeric id.
#[derive(Clone, Copy)]
pub struct ClassId {
    id: u32,
    name: &'static str,
}

impl ClassId {
    pub const STRING: Self = Self::builtin(0, "String");
    pub const ANY: Self = Self::builtin(1, "Any");

    pub const INT8: Self = Self::builtin(2, "Int8");
    pub const UINT8: Self = Self::builtin(3, "UInt8");
    pub const INT16: Self = Self::builtin(4, "Int16");
    pub const UINT16: Self = Self::builtin(5, "UInt16");
    pub const INT32: Self = Self::builtin(6, "Int32");
    pub const UINT32: Self = Self::builtin(7, "UInt32");
    pub const INT64: Self = Self::builtin(8, "Int64");
    pub const UINT64: Self = Self::builtin(9, "UInt64");
    pub const FLOAT32: Self = Self::builtin(10, "Float32");
    pub const FLOAT64: Self = Self::builtin(11, "Float64");
    pub const BOOLEAN: Self = Self::builtin(12, "Boolean");

    pub const OBJECT: Self = Self::builtin(13, "Object");
    pub const ENUM: Self = Self::builtin(14, "Enum");

    pub const VECTOR: Self = Self::builtin(15, "Vector");
    pub const LIST: Self = Self::builtin(16, "List");
    pub const UNORDERED_SET: Self = Self::builtin(17, "UnorderedSet");
    pub const PAIR_LIST: Self = Self::builtin(18, "PairList");
    pub const UNORDERED_MAP: Self = Self::builtin(19, "UnorderedMap");

    const fn builtin(id: u32, name: &'static str) -> Self {
        Self { id, name }
    }

    /// Allocates a new process-wide unique class id.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_mapping::ClassId;
    ///
    /// let a = ClassId::register("Point");
    /// let b = ClassId::register("Point");
    /// assert_ne!(a, b);
    /// assert!(b.id() < ClassId::class_count());
    /// ```
    pub fn register(name: &'static str) -> Self {
        let id = NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed);
        Self { id, name }
    }

    /// The number of class ids handed out so far, built-ins included.
    #[inline]
    pub fn class_count() -> u32 {
        NEXT_CLASS_ID.load(Ordering::Relaxed)
    }

    #[inline]
    pub const fn id(self) -> u32 {
        self.id
    }

    #[inline]
    pub const fn name(self) -> &'static str {
        self.name
    }
}

impl PartialEq for ClassId {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClassId {}

impl Hash for ClassId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClassId({}, {:?})", self.id, self.name)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::{BUILTIN_COUNT, ClassId};

    #[test]
    fn custom_ids_follow_builtins() {
        let id = ClassId::register("Custom");
        assert!(id.id() >= BUILTIN_COUNT);
        assert_eq!(id.name(), "Custom");
        assert_ne!(id, ClassId::STRING);
        assert_eq!(ClassId::UNORDERED_MAP.id() + 1, BUILTIN_COUNT);
    }
}
