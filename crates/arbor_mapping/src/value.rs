use core::any::Any;
use core::fmt;

use crate::types::{Type, Typed};

/// An owned, type-erased value.
pub type BoxedAny = Box<dyn Any + Send + Sync>;

// -----------------------------------------------------------------------------
// ValueRef

/// A borrowed, possibly absent value tagged with its [`Type`].
///
/// The descriptor is trusted to match the value; mapper methods verify it
/// by downcasting and report a type mismatch otherwise.
#[derive(Clone, Copy)]
pub struct ValueRef<'a> {
    ty: &'static Type,
    value: Option<&'a dyn Any>,
}

impl<'a> ValueRef<'a> {
    #[inline]
    pub fn new(ty: &'static Type, value: Option<&'a dyn Any>) -> Self {
        Self { ty, value }
    }

    /// The absent value of `ty`.
    #[inline]
    pub fn null(ty: &'static Type) -> Self {
        Self { ty, value: None }
    }

    /// Borrows a present value of a [`Typed`] type.
    #[inline]
    pub fn of<T: Typed>(value: &'a T) -> Self {
        Self {
            ty: T::type_info(),
            value: Some(value),
        }
    }

    /// Borrows a slot of a [`Typed`] type.
    #[inline]
    pub fn of_option<T: Typed>(value: &'a Option<T>) -> Self {
        Self {
            ty: T::type_info(),
            value: value.as_ref().map(|v| v as &dyn Any),
        }
    }

    #[inline]
    pub fn type_info(&self) -> &'static Type {
        self.ty
    }

    #[inline]
    pub fn get(&self) -> Option<&'a dyn Any> {
        self.value
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Returns the value if it is present and of type `T`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.value.and_then(|v| v.downcast_ref::<T>())
    }
}

impl fmt::Debug for ValueRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueRef")
            .field("type", &self.ty.name())
            .field("null", &self.is_null())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Value

/// An owned, possibly absent value tagged with its [`Type`].
pub struct Value {
    ty: &'static Type,
    value: Option<BoxedAny>,
}

impl Value {
    /// Wraps a present value of a [`Typed`] type.
    #[inline]
    pub fn new<T: Typed>(value: T) -> Self {
        Self {
            ty: T::type_info(),
            value: Some(Box::new(value)),
        }
    }

    /// Wraps an erased value; the descriptor is trusted to match.
    #[inline]
    pub fn from_parts(ty: &'static Type, value: Option<BoxedAny>) -> Self {
        Self { ty, value }
    }

    /// The absent value of `ty`.
    #[inline]
    pub fn null(ty: &'static Type) -> Self {
        Self { ty, value: None }
    }

    #[inline]
    pub fn type_info(&self) -> &'static Type {
        self.ty
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    #[inline]
    pub fn as_ref(&self) -> ValueRef<'_> {
        ValueRef {
            ty: self.ty,
            value: self.value.as_deref().map(|v| v as &dyn Any),
        }
    }

    #[inline]
    pub fn into_inner(self) -> Option<BoxedAny> {
        self.value
    }

    /// Takes the value out as `T`.
    ///
    /// Returns `Ok(None)` for the absent value and gives `self` back if the
    /// stored value is not a `T`.
    pub fn downcast<T: Any>(self) -> Result<Option<T>, Self> {
        match self.value {
            None => Ok(None),
            Some(boxed) => match boxed.downcast::<T>() {
                Ok(value) => Ok(Some(*value)),
                Err(boxed) => Err(Self {
                    ty: self.ty,
                    value: Some(boxed),
                }),
            },
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Value")
            .field("type", &self.ty.name())
            .field("null", &self.is_null())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// AnyValue

/// A present value of any [`Typed`] type, remembering its [`Type`].
///
/// Fields of this type can hold anything; the object mappers resolve the
/// concrete type through a [`TypeSelector`](crate::types::TypeSelector) or,
/// when reading a tree without one, guess it from the tree's kind.
///
/// # Examples
///
/// ```
/// use arbor_mapping::AnyValue;
/// use arbor_mapping::types::Typed;
///
/// let any = AnyValue::new(7_i32);
/// assert_eq!(any.get::<i32>(), Some(&7));
/// assert!(any.retrieve(i32::type_info()).is_some());
/// assert!(any.retrieve(i64::type_info()).is_none());
/// ```
pub struct AnyValue {
    ty: &'static Type,
    value: BoxedAny,
}

impl AnyValue {
    pub fn new<T: Typed>(value: T) -> Self {
        Self {
            ty: T::type_info(),
            value: Box::new(value),
        }
    }

    /// Converts a present [`Value`], `None` for the absent value.
    pub fn from_value(value: Value) -> Option<Self> {
        let ty = value.ty;
        value.value.map(|value| Self { ty, value })
    }

    #[inline]
    pub fn type_info(&self) -> &'static Type {
        self.ty
    }

    #[inline]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Borrows the value as `ty`, `None` if it holds another type.
    pub fn retrieve(&self, ty: &'static Type) -> Option<ValueRef<'_>> {
        if self.ty.is(ty) {
            Some(self.as_value_ref())
        } else {
            None
        }
    }

    #[inline]
    pub fn as_value_ref(&self) -> ValueRef<'_> {
        ValueRef {
            ty: self.ty,
            value: Some(&*self.value as &dyn Any),
        }
    }
}

impl fmt::Debug for AnyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnyValue").field(&self.ty.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use super::{AnyValue, Value, ValueRef};
    use crate::types::Typed;

    #[test]
    fn value_downcast() {
        let value = Value::new(Arc::<str>::from("text"));
        assert!(value.type_info().is(<Arc<str>>::type_info()));
        assert_eq!(
            value.as_ref().downcast_ref::<Arc<str>>().map(|s| &**s),
            Some("text")
        );

        let value = value.downcast::<i32>().unwrap_err();
        assert_eq!(
            value.downcast::<Arc<str>>().unwrap().as_deref(),
            Some("text")
        );

        let null = Value::null(i32::type_info());
        assert!(null.as_ref().is_null());
        assert_eq!(null.downcast::<i32>().unwrap(), None);
    }

    #[test]
    fn slot_refs() {
        let slot = Some(3_u8);
        let value = ValueRef::of_option(&slot);
        assert_eq!(value.downcast_ref::<u8>(), Some(&3));

        let empty: Option<u8> = None;
        assert!(ValueRef::of_option(&empty).is_null());
    }

    #[test]
    fn any_value_retrieve() {
        let any = AnyValue::new(Arc::<str>::from("x"));
        assert!(any.retrieve(<Arc<str>>::type_info()).is_some());
        assert!(any.retrieve(i32::type_info()).is_none());
        let null = AnyValue::from_value(Value::null(i32::type_info()));
        assert!(null.is_none());
    }
}
