use core::any::{Any, TypeId};
use core::fmt;

use crate::BoxedAny;
use crate::types::{Type, Typed};

// -----------------------------------------------------------------------------
// Field accessors

trait FieldAccess: Send + Sync {
    fn get<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any>;

    fn set(&self, object: &mut dyn Any, value: Option<BoxedAny>) -> bool;
}

struct FieldAccessor<R, T> {
    get: fn(&R) -> &Option<T>,
    get_mut: fn(&mut R) -> &mut Option<T>,
}

impl<R: Any, T: Any> FieldAccess for FieldAccessor<R, T> {
    fn get<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any> {
        let object = object.downcast_ref::<R>()?;
        (self.get)(object).as_ref().map(|v| v as &dyn Any)
    }

    fn set(&self, object: &mut dyn Any, value: Option<BoxedAny>) -> bool {
        let Some(object) = object.downcast_mut::<R>() else {
            return false;
        };
        let value = match value.map(|v| v.downcast::<T>()) {
            None => None,
            Some(Ok(v)) => Some(*v),
            Some(Err(_)) => return false,
        };
        *(self.get_mut)(object) = value;
        true
    }
}

// -----------------------------------------------------------------------------
// TypeSelector

/// Picks the concrete type of an [`AnyValue`](crate::AnyValue) field from
/// the record that owns it.
pub trait TypeSelector: Send + Sync {
    /// Returns `None` if `object` is not of the owning record type.
    fn select_type(&self, object: &dyn Any) -> Option<&'static Type>;
}

struct FnTypeSelector<R> {
    select: fn(&R) -> &'static Type,
}

impl<R: Any> TypeSelector for FnTypeSelector<R> {
    fn select_type(&self, object: &dyn Any) -> Option<&'static Type> {
        object.downcast_ref::<R>().map(self.select)
    }
}

// -----------------------------------------------------------------------------
// FieldInfo

/// A named field of a record.
///
/// The field type is resolved lazily, so records may refer to themselves.
pub struct FieldInfo {
    name: &'static str,
    field_type: fn() -> &'static Type,
    required: bool,
    selector: Option<Box<dyn TypeSelector>>,
    accessor: Box<dyn FieldAccess>,
}

impl FieldInfo {
    /// Describes the slot of record `R` reached through `get` and `get_mut`.
    pub fn new<R, T>(
        name: &'static str,
        get: fn(&R) -> &Option<T>,
        get_mut: fn(&mut R) -> &mut Option<T>,
    ) -> Self
    where
        R: Any,
        T: Typed,
    {
        Self {
            name,
            field_type: T::type_info,
            required: false,
            selector: None,
            accessor: Box::new(FieldAccessor { get, get_mut }),
        }
    }

    /// Marks the field as required: an absent value fails the mapping.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Selects the concrete type of an `AnyValue` field from its record.
    pub fn with_type_selector<R: Any>(mut self, select: fn(&R) -> &'static Type) -> Self {
        self.selector = Some(Box::new(FnTypeSelector { select }));
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn field_type(&self) -> &'static Type {
        (self.field_type)()
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    pub fn type_selector(&self) -> Option<&dyn TypeSelector> {
        self.selector.as_deref()
    }

    /// Reads the field, `None` if absent or `object` is of another type.
    #[inline]
    pub fn get<'a>(&self, object: &'a dyn Any) -> Option<&'a dyn Any> {
        self.accessor.get(object)
    }

    /// Writes the field, returning `false` on a type mismatch.
    #[inline]
    pub fn set(&self, object: &mut dyn Any, value: Option<BoxedAny>) -> bool {
        self.accessor.set(object, value)
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// ObjectInfo

/// The field list and constructor of a record type.
pub struct ObjectInfo {
    type_id: TypeId,
    create: fn() -> BoxedAny,
    fields: Vec<FieldInfo>,
}

fn create_default<R: Default + Send + Sync + 'static>() -> BoxedAny {
    Box::new(R::default())
}

impl ObjectInfo {
    pub fn new<R>(fields: impl IntoIterator<Item = FieldInfo>) -> Self
    where
        R: Default + Send + Sync + 'static,
    {
        Self {
            type_id: TypeId::of::<R>(),
            create: create_default::<R>,
            fields: fields.into_iter().collect(),
        }
    }

    /// Fields in declaration order.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Creates a record with every field absent.
    #[inline]
    pub fn create(&self) -> BoxedAny {
        (self.create)()
    }

    #[inline]
    pub fn is_instance(&self, object: &dyn Any) -> bool {
        Any::type_id(object) == self.type_id
    }
}

impl fmt::Debug for ObjectInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.fields.iter().map(FieldInfo::name))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use crate::types::{FieldInfo, ObjectInfo, Typed};

    #[derive(Default)]
    struct Item {
        id: Option<u32>,
        title: Option<Arc<str>>,
    }

    fn item_info() -> ObjectInfo {
        ObjectInfo::new::<Item>([
            FieldInfo::new("id", |i: &Item| &i.id, |i| &mut i.id).required(),
            FieldInfo::new("title", |i: &Item| &i.title, |i| &mut i.title),
        ])
    }

    #[test]
    fn field_access() {
        let info = item_info();
        let mut object = info.create();
        assert!(info.is_instance(&*object));

        let id = info.field("id").unwrap();
        assert!(id.is_required());
        assert!(id.field_type().is(u32::type_info()));
        assert!(id.get(&*object).is_none());

        assert!(id.set(&mut *object, Some(Box::new(7_u32))));
        assert!(!id.set(&mut *object, Some(Box::new(7_i32))));
        assert_eq!(
            id.get(&*object).and_then(|v| v.downcast_ref::<u32>()),
            Some(&7)
        );

        let item = object.downcast::<Item>().unwrap();
        assert_eq!(item.id, Some(7));
        assert!(item.title.is_none());
    }

    #[test]
    fn wrong_record_type() {
        let info = item_info();
        assert!(!info.is_instance(&5_i32));
        assert!(info.field("id").unwrap().get(&5_i32).is_none());
        assert!(info.field("missing").is_none());
    }
}
