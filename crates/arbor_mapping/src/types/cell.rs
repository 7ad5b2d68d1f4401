//! Containers for static storage of [`Type`] descriptors.
//!
//! These are used to implement [`Typed`](crate::types::Typed).
//!
//! ## NonGenericTypeCell
//!
//! For non generic types. Internally an [`OnceLock`], almost no additional expenses.
//!
//! ## GenericTypeCell
//!
//! If the type is generic, the `static CELL` inside the function is shared by
//! every instantiation, so the cell keeps a map from [`TypeId`] to the leaked
//! descriptor, guarded by a [`RwLock`].

use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use arbor_utils::hash::{FixedHashState, HashMap};

use crate::types::Type;

// -----------------------------------------------------------------------------
// NonGenericTypeCell

/// Static storage of a non-generic [`Type`].
///
/// ## Example
///
/// ```
/// use arbor_mapping::types::{FieldInfo, NonGenericTypeCell, Type, Typed};
///
/// #[derive(Default)]
/// struct Point {
///     x: Option<i32>,
/// }
///
/// impl Typed for Point {
///     fn type_info() -> &'static Type {
///         static CELL: NonGenericTypeCell = NonGenericTypeCell::new();
///         CELL.get_or_init(|| {
///             Type::object::<Self>("Point", [FieldInfo::new("x", |p: &Self| &p.x, |p| &mut p.x)])
///         })
///     }
/// }
///
/// let info = Point::type_info().as_object().unwrap();
/// assert_eq!(info.field("x").unwrap().field_type().name(), "Int32");
/// ```
pub struct NonGenericTypeCell(OnceLock<Type>);

impl NonGenericTypeCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored descriptor, building it with `f` on first use.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &Type
    where
        F: FnOnce() -> Type,
    {
        self.0.get_or_init(f)
    }
}

// -----------------------------------------------------------------------------
// GenericTypeCell

/// Static storage of [`Type`]s for generic types, one per instantiation.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
///
/// use arbor_mapping::types::{Typed, Type};
///
/// // `Vec<Option<T>>` is implemented with a generic cell.
/// let a = <Vec<Option<i32>>>::type_info();
/// let b = <Vec<Option<Arc<str>>>>::type_info();
/// assert_eq!(a.name(), "Vector<Int32>");
/// assert_eq!(b.name(), "Vector<String>");
/// assert!(a.is(<Vec<Option<i32>>>::type_info()));
/// ```
pub struct GenericTypeCell(RwLock<HashMap<TypeId, &'static Type>>);

impl GenericTypeCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(HashMap::with_hasher(FixedHashState)))
    }

    /// Returns the descriptor stored for `G`, building it with `f` if absent.
    ///
    /// `f` runs without holding the lock, so it may request other
    /// descriptors (the item type of a container, for instance).
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> Type) -> &'static Type {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> Type) -> &'static Type {
        match self.get_by_type_id(type_id) {
            Some(ty) => ty,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static Type> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: Type) -> &'static Type {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert_with(|| Box::leak(Box::new(value)))
    }
}
