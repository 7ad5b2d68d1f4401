//! Runtime type descriptors.
//!
//! Every value that takes part in mapping is described by a `&'static`
//! [`Type`]: its [`ClassId`], a display name, a [`Dispatcher`] describing
//! its shape, and optionally a list of named [`Interpretation`]s.
//!
//! Rust types opt in through [`Typed`]. Implementations for primitives,
//! strings, [`AnyValue`](crate::AnyValue) and the standard containers are
//! provided; records and enums implement it by hand with the help of
//! [`Type::object`], [`Type::enumeration`] and the type cells.

use core::any::{Any, TypeId};
use core::fmt;

use crate::ClassId;

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod containers;
mod enums;
mod interpretation;
mod object;
mod primitives;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{GenericTypeCell, NonGenericTypeCell};
pub use containers::{CollectionDispatcher, EntryIter, Fields, ItemIter, MapDispatcher};
pub use enums::{EnumDispatcher, EnumEntries, EnumEntry, EnumInterpreter, EnumInterpreterError};
pub use interpretation::{FnInterpretation, Interpretation, InterpretationSet};
pub use object::{FieldInfo, ObjectInfo, TypeSelector};

// -----------------------------------------------------------------------------
// Typed

/// A static accessor to the [`Type`] of a Rust type.
///
/// Values stored in mapped slots are always `Option<T>` where `T: Typed`;
/// `None` is the absent value.
pub trait Typed: Any + Send + Sync {
    fn type_info() -> &'static Type;
}

// -----------------------------------------------------------------------------
// Dispatcher

/// Shape-specific behaviour of a [`Type`].
pub enum Dispatcher {
    /// A scalar with a dedicated tree representation.
    Primitive,
    /// `Arc<str>`.
    String,
    /// [`AnyValue`](crate::AnyValue).
    Any,
    Collection(Box<dyn CollectionDispatcher>),
    Map(Box<dyn MapDispatcher>),
    Object(ObjectInfo),
    Enum(Box<dyn EnumDispatcher>),
    /// No built-in shape; handled by a custom mapper method or an
    /// interpretation.
    Opaque,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Primitive => "Primitive",
            Self::String => "String",
            Self::Any => "Any",
            Self::Collection(_) => "Collection",
            Self::Map(_) => "Map",
            Self::Object(_) => "Object",
            Self::Enum(_) => "Enum",
            Self::Opaque => "Opaque",
        })
    }
}

// -----------------------------------------------------------------------------
// Type

/// A runtime type descriptor.
///
/// Descriptors are created once per Rust type (see the type cells) and
/// compared by address.
pub struct Type {
    class_id: ClassId,
    name: &'static str,
    type_id: TypeId,
    dispatcher: Dispatcher,
    interpretations: Vec<(&'static str, Box<dyn Interpretation>)>,
}

impl Type {
    /// Creates a descriptor for values of type `T`.
    pub fn new<T: Any>(class_id: ClassId, name: &'static str, dispatcher: Dispatcher) -> Self {
        Self {
            class_id,
            name,
            type_id: TypeId::of::<T>(),
            dispatcher,
            interpretations: Vec::new(),
        }
    }

    /// Creates a descriptor without a built-in shape under a fresh class id.
    ///
    /// Such values can only be mapped through a custom mapper method or an
    /// interpretation.
    pub fn opaque<T: Any>(name: &'static str) -> Self {
        Self::new::<T>(ClassId::register(name), name, Dispatcher::Opaque)
    }

    /// Creates a record descriptor; see [`FieldInfo`].
    pub fn object<R>(name: &'static str, fields: impl IntoIterator<Item = FieldInfo>) -> Self
    where
        R: Default + Send + Sync + 'static,
    {
        Self::new::<R>(
            ClassId::OBJECT,
            name,
            Dispatcher::Object(ObjectInfo::new::<R>(fields)),
        )
    }

    /// Creates an enum descriptor; see [`EnumInterpreter`].
    pub fn enumeration<E: EnumEntries>(interpreter: EnumInterpreter<E>) -> Self {
        let dispatcher = Dispatcher::Enum(Box::new(interpreter));
        Self::new::<E>(ClassId::ENUM, E::NAME, dispatcher)
    }

    /// Adds a named interpretation, consulted when no mapper method exists
    /// for this type's class and `name` is enabled.
    pub fn with_interpretation(
        mut self,
        name: &'static str,
        interpretation: impl Interpretation + 'static,
    ) -> Self {
        self.interpretations.push((name, Box::new(interpretation)));
        self
    }

    #[inline]
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The [`TypeId`] of the Rust type stored in slots of this type.
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Check if the stored Rust type is `T`.
    #[inline]
    pub fn type_is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    #[inline]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Returns the record info if this is an object type.
    pub fn as_object(&self) -> Option<&ObjectInfo> {
        match &self.dispatcher {
            Dispatcher::Object(info) => Some(info),
            _ => None,
        }
    }

    /// Identity comparison.
    #[inline]
    pub fn is(&self, other: &Type) -> bool {
        core::ptr::eq(self, other)
    }

    /// Iterates the registered interpretations in registration order.
    pub fn interpretations(&self) -> impl Iterator<Item = (&'static str, &dyn Interpretation)> {
        self.interpretations.iter().map(|(name, i)| (*name, &**i))
    }

    /// The first registered interpretation whose name is in `enabled`.
    pub fn find_interpretation(&self, enabled: &InterpretationSet) -> Option<&dyn Interpretation> {
        self.interpretations
            .iter()
            .find(|(name, _)| enabled.contains(name))
            .map(|(_, i)| &**i)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("class_id", &self.class_id)
            .field("name", &self.name)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

/// Concatenates and leaks a name built for a generic instantiation.
///
/// Only called from type cell initializers, so each name leaks once.
pub(crate) fn leak_name(parts: &[&str]) -> &'static str {
    let mut len = 0usize;
    for &part in parts {
        len += part.len();
    }
    let mut name = String::with_capacity(len);
    for &part in parts {
        name.push_str(part);
    }
    name.leak()
}
