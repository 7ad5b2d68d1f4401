use alloc::string::String;
use core::any::Any;
use core::fmt;

use arbor_utils::hash::HashSet;

use crate::Value;
use crate::types::{Type, Typed};

// -----------------------------------------------------------------------------
// Interpretation

/// A named, opt-in rewrite of a type into another type the mappers
/// already know.
///
/// When no mapper method is registered for a type's class, the mappers
/// look for the first interpretation of that type whose name is enabled in
/// the config, map the converted value instead, and convert back on the
/// way in.
pub trait Interpretation: Send + Sync {
    /// The type values are converted to.
    fn interpretation_type(&self) -> &'static Type;

    /// Converts a (possibly absent) value of the interpreted type.
    ///
    /// Returns `None` if `value` is not of the interpreted type.
    fn to_interpretation(&self, value: Option<&dyn Any>) -> Option<Value>;

    /// Converts a value of [`interpretation_type`](Self::interpretation_type) back.
    ///
    /// Returns `None` if `value` is not of the interpretation type.
    fn from_interpretation(&self, value: Value) -> Option<Value>;
}

/// An [`Interpretation`] from `T` to `I` built from two plain functions.
///
/// Absent values stay absent in both directions.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use arbor_mapping::types::{FnInterpretation, Interpretation, Typed};
/// use arbor_mapping::Value;
///
/// let hex = FnInterpretation::<u32, Arc<str>>::new(
///     |v| format!("{v:x}").into(),
///     |s| u32::from_str_radix(s, 16).unwrap_or_default(),
/// );
///
/// let text = hex.to_interpretation(Some(&255_u32)).unwrap();
/// assert_eq!(text.as_ref().downcast_ref::<Arc<str>>().map(|s| &**s), Some("ff"));
///
/// let back = hex.from_interpretation(text).unwrap();
/// assert_eq!(back.downcast::<u32>().unwrap(), Some(255));
/// ```
pub struct FnInterpretation<T, I> {
    to: fn(&T) -> I,
    from: fn(&I) -> T,
}

impl<T: Typed, I: Typed> FnInterpretation<T, I> {
    pub const fn new(to: fn(&T) -> I, from: fn(&I) -> T) -> Self {
        Self { to, from }
    }
}

impl<T: Typed, I: Typed> Interpretation for FnInterpretation<T, I> {
    #[inline]
    fn interpretation_type(&self) -> &'static Type {
        I::type_info()
    }

    fn to_interpretation(&self, value: Option<&dyn Any>) -> Option<Value> {
        match value {
            None => Some(Value::null(I::type_info())),
            Some(value) => value.downcast_ref::<T>().map(|v| Value::new((self.to)(v))),
        }
    }

    fn from_interpretation(&self, value: Value) -> Option<Value> {
        match value.downcast::<I>() {
            Ok(None) => Some(Value::null(T::type_info())),
            Ok(Some(v)) => Some(Value::new((self.from)(&v))),
            Err(_) => None,
        }
    }
}

// -----------------------------------------------------------------------------
// InterpretationSet

/// The names of the interpretations a mapping run may use.
#[derive(Clone, Default)]
pub struct InterpretationSet(HashSet<String>);

impl InterpretationSet {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `name` was not enabled before.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    pub fn remove(&mut self, name: &str) -> bool {
        self.0.remove(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for InterpretationSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Debug for InterpretationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::InterpretationSet;

    #[test]
    fn set_membership() {
        let mut set: InterpretationSet = ["iso-8601"].into_iter().collect();
        assert!(set.contains("iso-8601"));
        assert!(!set.insert("iso-8601"));
        assert!(set.insert("hex"));
        assert!(set.remove("hex"));
        assert!(!set.contains("hex"));
    }
}
