use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

use arbor_tree::TreeConversionError;
use thiserror::Error;

use crate::types::EnumInterpreterError;

// -----------------------------------------------------------------------------
// MappingError

/// A failure raised by a single mapper method.
///
/// Errors are collected in an [`ErrorStack`] together with context frames
/// that locate them in the value or tree being mapped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum MappingError {
    #[error("no mapping method for type '{type_name}'")]
    UnsupportedType { type_name: &'static str },

    #[error("{type_name}::{field} is required")]
    MissingRequiredField {
        type_name: &'static str,
        field: &'static str,
    },

    #[error("invalid map key type '{key_type}', keys must be String")]
    InvalidMapKeyType { key_type: &'static str },

    #[error("enum constraint violated - '{constraint}' ({type_name})")]
    EnumConstraintViolation {
        type_name: &'static str,
        constraint: &'static str,
    },

    #[error("can't interpret enum '{type_name}': {reason}")]
    EnumInterpretationFailure {
        type_name: &'static str,
        reason: EnumInterpreterError,
    },

    /// Both sides use type names (`Int32`, `String`, `Vector<Int32>`). Tree
    /// node kinds are spelled the same way, see [`TreeType::name`].
    ///
    /// [`TreeType::name`]: arbor_tree::TreeType::name
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("numeric overflow: {value} does not fit into {target}")]
    NumericConversionOverflow { value: String, target: &'static str },

    #[error("unknown field '{field}' for type '{type_name}'")]
    UnknownField {
        type_name: &'static str,
        field: Arc<str>,
    },
}

impl From<TreeConversionError> for MappingError {
    fn from(error: TreeConversionError) -> Self {
        match error {
            TreeConversionError::TypeMismatch { expected, found } => Self::TypeMismatch {
                expected,
                found: found.name(),
            },
            TreeConversionError::Overflow { value, target } => {
                Self::NumericConversionOverflow { value, target }
            }
            _ => Self::TypeMismatch {
                expected: "scalar",
                found: "unconvertible value",
            },
        }
    }
}

// -----------------------------------------------------------------------------
// ErrorStack

/// Where in the mapped structure an error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Position in a collection.
    Index(usize),
    /// Key in a map.
    Key(Arc<str>),
    /// Field of a record.
    Field(&'static str),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "index={index}"),
            Self::Key(key) => write!(f, "key='{key}'"),
            Self::Field(name) => write!(f, "field='{name}'"),
        }
    }
}

/// One entry of an [`ErrorStack`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorFrame {
    Error {
        origin: &'static str,
        error: MappingError,
    },
    Context {
        origin: &'static str,
        locator: Locator,
    },
}

impl fmt::Display for ErrorFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error { origin, error } => write!(f, "[{origin}]: {error}"),
            Self::Context { origin, locator } => write!(f, "[{origin}]: {locator}"),
        }
    }
}

/// An ordered record of what went wrong during one mapping, innermost first.
///
/// A nested failure pushes its root error; each enclosing collection, map
/// or record then appends a context frame naming the index, key or field
/// it was working on. Reading the frames top to bottom gives the path from
/// the failing value out to the root.
///
/// # Examples
///
/// ```
/// use arbor_mapping::{ErrorStack, Locator, MappingError};
///
/// let mut errors = ErrorStack::new();
/// let error = MappingError::TypeMismatch {
///     expected: "String",
///     found: "Int32",
/// };
/// errors.push_error("map_string", error);
/// errors.push_context("map_object", Locator::Field("name"));
/// errors.push_context("map_collection", Locator::Index(2));
///
/// assert_eq!(
///     errors.stacktrace(),
///     "[map_string]: type mismatch: expected String, found Int32\n\
///      [map_object]: field='name'\n\
///      [map_collection]: index=2"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorStack {
    frames: Vec<ErrorFrame>,
}

impl ErrorStack {
    #[inline]
    pub const fn new() -> Self {
        Self { frames: Vec::new() }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// A stack holding the single error `error`.
    pub fn from_error(origin: &'static str, error: MappingError) -> Self {
        let mut stack = Self::new();
        stack.push_error(origin, error);
        stack
    }

    pub fn push_error(&mut self, origin: &'static str, error: MappingError) {
        self.frames.push(ErrorFrame::Error { origin, error });
    }

    pub fn push_context(&mut self, origin: &'static str, locator: Locator) {
        self.frames.push(ErrorFrame::Context { origin, locator });
    }

    /// Moves all frames of `other` to the end of this stack.
    pub fn append(&mut self, mut other: ErrorStack) {
        self.frames.append(&mut other.frames);
    }

    /// The first error pushed.
    pub fn root_cause(&self) -> Option<&MappingError> {
        self.errors().next()
    }

    /// Iterates the error frames, skipping context frames.
    pub fn errors(&self) -> impl Iterator<Item = &MappingError> {
        self.frames.iter().filter_map(|frame| match frame {
            ErrorFrame::Error { error, .. } => Some(error),
            ErrorFrame::Context { .. } => None,
        })
    }

    /// Iterates the context frames, innermost first.
    pub fn locators(&self) -> impl Iterator<Item = &Locator> {
        self.frames.iter().filter_map(|frame| match frame {
            ErrorFrame::Context { locator, .. } => Some(locator),
            ErrorFrame::Error { .. } => None,
        })
    }

    #[inline]
    pub fn frames(&self) -> &[ErrorFrame] {
        &self.frames
    }

    /// Renders one line per frame.
    pub fn stacktrace(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ErrorStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            fmt::Display::fmt(frame, f)?;
        }
        Ok(())
    }
}

impl core::error::Error for ErrorStack {}

impl From<MappingError> for ErrorStack {
    fn from(error: MappingError) -> Self {
        Self::from_error("arbor_mapping", error)
    }
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;

    use arbor_tree::Tree;

    use super::{ErrorStack, Locator, MappingError};
    use crate::types::Typed;

    #[test]
    fn append_keeps_order() {
        let mut inner = ErrorStack::new();
        inner.push_error("inner", MappingError::UnsupportedType { type_name: "X" });
        inner.push_context("inner", Locator::Key(Arc::from("k")));

        let mut outer = ErrorStack::new();
        outer.append(inner);
        outer.push_context("outer", Locator::Index(0));

        assert_eq!(outer.len(), 3);
        assert_eq!(
            outer.root_cause(),
            Some(&MappingError::UnsupportedType { type_name: "X" })
        );
        let locators: Vec<String> = outer.locators().map(ToString::to_string).collect();
        assert_eq!(locators, ["key='k'", "index=0"]);
    }

    #[test]
    fn scalar_errors_use_type_names() {
        let error = Tree::from("x").to_scalar::<i32>(false).unwrap_err();
        assert_eq!(
            MappingError::from(error),
            MappingError::TypeMismatch {
                expected: i32::type_info().name(),
                found: <Arc<str>>::type_info().name(),
            }
        );

        let error = MappingError::from(Tree::from(-1_i8).to_scalar::<u16>(false).unwrap_err());
        assert!(matches!(
            error,
            MappingError::NumericConversionOverflow { target: "UInt16", .. }
        ));
        assert_eq!(u16::type_info().name(), "UInt16");
    }

    #[test]
    fn empty_stack_renders_nothing() {
        let errors = ErrorStack::new();
        assert!(errors.is_empty());
        assert!(errors.root_cause().is_none());
        assert_eq!(errors.stacktrace(), "");
    }
}
