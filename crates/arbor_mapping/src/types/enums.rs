use alloc::sync::Arc;
use core::any::Any;
use core::marker::PhantomData;

use thiserror::Error;

use crate::types::{Type, Typed};
use crate::{BoxedAny, Value};

// -----------------------------------------------------------------------------
// EnumEntries

/// One variant of a mapped enum.
#[derive(Debug, Clone, Copy)]
pub struct EnumEntry<E> {
    pub value: E,
    pub name: &'static str,
    pub number: i32,
}

/// The variant table of a mapped enum.
///
/// # Examples
///
/// ```
/// use arbor_mapping::types::{EnumEntries, EnumEntry};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Color {
///     Red,
///     Green,
/// }
///
/// impl EnumEntries for Color {
///     const NAME: &'static str = "Color";
///
///     fn entries() -> &'static [EnumEntry<Self>] {
///         &[
///             EnumEntry { value: Color::Red, name: "red", number: 1 },
///             EnumEntry { value: Color::Green, name: "green", number: 2 },
///         ]
///     }
/// }
/// ```
pub trait EnumEntries: Copy + PartialEq + Send + Sync + 'static {
    const NAME: &'static str;

    fn entries() -> &'static [EnumEntry<Self>];
}

// -----------------------------------------------------------------------------
// EnumInterpreterError

/// Why an enum could not be converted to or from its representation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnumInterpreterError {
    #[error("absent value violates the 'NotNull' constraint")]
    ConstraintNotNull,
    #[error("value is not of the enum type")]
    TypeMismatchEnum,
    #[error("representation has an unexpected type")]
    TypeMismatchEnumValue,
    #[error("no entry matches the value")]
    EntryNotFound,
}

// -----------------------------------------------------------------------------
// EnumDispatcher

/// Type-erased conversion between an enum and its representation.
pub trait EnumDispatcher: Send + Sync {
    /// The type of the representation (`String` or `Int32`).
    fn interpretation_type(&self) -> &'static Type;

    fn to_interpretation(&self, value: Option<&dyn Any>) -> Result<Value, EnumInterpreterError>;

    fn from_interpretation(&self, value: Value) -> Result<Option<BoxedAny>, EnumInterpreterError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Representation {
    Name,
    Number,
}

/// Maps an enum by entry name or by entry number.
///
/// # Examples
///
/// ```ignore
/// Type::enumeration(EnumInterpreter::<Color>::as_string().not_null())
/// ```
pub struct EnumInterpreter<E> {
    representation: Representation,
    not_null: bool,
    _marker: PhantomData<fn() -> E>,
}

impl<E: EnumEntries> EnumInterpreter<E> {
    /// Represents each value by its entry name.
    pub const fn as_string() -> Self {
        Self {
            representation: Representation::Name,
            not_null: false,
            _marker: PhantomData,
        }
    }

    /// Represents each value by its entry number.
    pub const fn as_number() -> Self {
        Self {
            representation: Representation::Number,
            not_null: false,
            _marker: PhantomData,
        }
    }

    /// Rejects absent values in both directions.
    pub const fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    fn find(
        predicate: impl Fn(&EnumEntry<E>) -> bool,
    ) -> Result<&'static EnumEntry<E>, EnumInterpreterError> {
        E::entries()
            .iter()
            .find(|&entry| predicate(entry))
            .ok_or(EnumInterpreterError::EntryNotFound)
    }
}

impl<E: EnumEntries> EnumDispatcher for EnumInterpreter<E> {
    fn interpretation_type(&self) -> &'static Type {
        match self.representation {
            Representation::Name => <Arc<str>>::type_info(),
            Representation::Number => i32::type_info(),
        }
    }

    fn to_interpretation(&self, value: Option<&dyn Any>) -> Result<Value, EnumInterpreterError> {
        let Some(value) = value else {
            if self.not_null {
                return Err(EnumInterpreterError::ConstraintNotNull);
            }
            return Ok(Value::null(self.interpretation_type()));
        };
        let value = value
            .downcast_ref::<E>()
            .ok_or(EnumInterpreterError::TypeMismatchEnum)?;
        let entry = Self::find(|entry| entry.value == *value)?;
        Ok(match self.representation {
            Representation::Name => Value::new(Arc::<str>::from(entry.name)),
            Representation::Number => Value::new(entry.number),
        })
    }

    fn from_interpretation(&self, value: Value) -> Result<Option<BoxedAny>, EnumInterpreterError> {
        if value.is_null() {
            if self.not_null {
                return Err(EnumInterpreterError::ConstraintNotNull);
            }
            return Ok(None);
        }
        let entry = match self.representation {
            Representation::Name => {
                let name = value
                    .as_ref()
                    .downcast_ref::<Arc<str>>()
                    .ok_or(EnumInterpreterError::TypeMismatchEnumValue)?;
                Self::find(|entry| entry.name == &**name)?
            }
            Representation::Number => {
                let number = value
                    .as_ref()
                    .downcast_ref::<i32>()
                    .copied()
                    .ok_or(EnumInterpreterError::TypeMismatchEnumValue)?;
                Self::find(|entry| entry.number == number)?
            }
        };
        Ok(Some(Box::new(entry.value)))
    }
}
