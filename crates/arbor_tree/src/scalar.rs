use alloc::string::ToString;
use core::fmt;

use crate::{Tree, TreeConversionError, TreeType};

// -----------------------------------------------------------------------------
// Number

/// A numeric scalar widened to one of three carrier kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Signed(v) => fmt::Display::fmt(v, f),
            Self::Unsigned(v) => fmt::Display::fmt(v, f),
            Self::Float(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl Tree {
    /// Widens any numeric representation, `None` for other kinds.
    pub const fn as_number(&self) -> Option<Number> {
        Some(match *self {
            Self::I8(v) => Number::Signed(v as i64),
            Self::I16(v) => Number::Signed(v as i64),
            Self::I32(v) => Number::Signed(v as i64),
            Self::I64(v) => Number::Signed(v),
            Self::U8(v) => Number::Unsigned(v as u64),
            Self::U16(v) => Number::Unsigned(v as u64),
            Self::U32(v) => Number::Unsigned(v as u64),
            Self::U64(v) => Number::Unsigned(v),
            Self::F32(v) => Number::Float(v as f64),
            Self::F64(v) => Number::Float(v),
            _ => return None,
        })
    }
}

// -----------------------------------------------------------------------------
// TreeScalar

mod sealed {
    pub trait Sealed {}
}

/// Scalar types that have a dedicated [`Tree`] representation.
///
/// Implemented for `bool`, `i8`-`i64`, `u8`-`u64`, `f32` and `f64`.
pub trait TreeScalar: Copy + Send + Sync + sealed::Sealed + 'static {
    /// The representation produced by [`into_tree`](Self::into_tree).
    const TREE_TYPE: TreeType;

    /// Wraps the value in its matching representation.
    fn into_tree(self) -> Tree;

    /// Extracts the value if the node holds exactly [`TREE_TYPE`](Self::TREE_TYPE).
    fn from_tree(tree: &Tree) -> Option<Self>;

    /// Checked conversion from any compatible representation.
    fn convert_from(tree: &Tree, lossy: bool) -> Result<Self, TreeConversionError>;
}

#[inline]
fn mismatch<T: TreeScalar>(tree: &Tree) -> TreeConversionError {
    TreeConversionError::TypeMismatch {
        expected: T::TREE_TYPE.name(),
        found: tree.tree_type(),
    }
}

#[inline]
fn overflow<T: TreeScalar>(number: Number) -> TreeConversionError {
    TreeConversionError::Overflow {
        value: number.to_string(),
        target: T::TREE_TYPE.name(),
    }
}

impl sealed::Sealed for bool {}

impl TreeScalar for bool {
    const TREE_TYPE: TreeType = TreeType::Bool;

    #[inline]
    fn into_tree(self) -> Tree {
        Tree::Bool(self)
    }

    #[inline]
    fn from_tree(tree: &Tree) -> Option<Self> {
        match tree {
            Tree::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    fn convert_from(tree: &Tree, _lossy: bool) -> Result<Self, TreeConversionError> {
        Self::from_tree(tree).ok_or_else(|| mismatch::<Self>(tree))
    }
}

// Integral floats inside this range convert exactly through `i128`.
const I128_FLOAT_LIMIT: f64 = 1.7e38;

macro_rules! impl_integer_scalar {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl TreeScalar for $ty {
                const TREE_TYPE: TreeType = TreeType::$variant;

                #[inline]
                fn into_tree(self) -> Tree {
                    Tree::$variant(self)
                }

                #[inline]
                fn from_tree(tree: &Tree) -> Option<Self> {
                    match tree {
                        Tree::$variant(v) => Some(*v),
                        _ => None,
                    }
                }

                fn convert_from(tree: &Tree, lossy: bool) -> Result<Self, TreeConversionError> {
                    let number = tree.as_number().ok_or_else(|| mismatch::<Self>(tree))?;
                    if lossy {
                        return Ok(match number {
                            Number::Signed(v) => v as $ty,
                            Number::Unsigned(v) => v as $ty,
                            Number::Float(v) => v as $ty,
                        });
                    }
                    match number {
                        Number::Signed(v) => $ty::try_from(v).map_err(|_| overflow::<Self>(number)),
                        Number::Unsigned(v) => {
                            $ty::try_from(v).map_err(|_| overflow::<Self>(number))
                        }
                        Number::Float(v) => {
                            let integral = (-I128_FLOAT_LIMIT..=I128_FLOAT_LIMIT).contains(&v)
                                && (v as i128) as f64 == v;
                            if integral {
                                $ty::try_from(v as i128).map_err(|_| overflow::<Self>(number))
                            } else {
                                Err(overflow::<Self>(number))
                            }
                        }
                    }
                }
            }
        )*
    };
}

impl_integer_scalar!(
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64
);

macro_rules! impl_float_scalar {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl TreeScalar for $ty {
                const TREE_TYPE: TreeType = TreeType::$variant;

                #[inline]
                fn into_tree(self) -> Tree {
                    Tree::$variant(self)
                }

                #[inline]
                fn from_tree(tree: &Tree) -> Option<Self> {
                    match tree {
                        Tree::$variant(v) => Some(*v),
                        _ => None,
                    }
                }

                fn convert_from(tree: &Tree, lossy: bool) -> Result<Self, TreeConversionError> {
                    let number = tree.as_number().ok_or_else(|| mismatch::<Self>(tree))?;
                    // Integers must survive the round trip unless lossy.
                    let exact = |wide: i128| {
                        let cast = wide as $ty;
                        if lossy || cast as i128 == wide {
                            Ok(cast)
                        } else {
                            Err(overflow::<Self>(number))
                        }
                    };
                    match number {
                        Number::Signed(v) => exact(v as i128),
                        Number::Unsigned(v) => exact(v as i128),
                        Number::Float(v) => {
                            // Precision loss is accepted, range loss is not.
                            let max = $ty::MAX as f64;
                            if lossy || !v.is_finite() || (-max..=max).contains(&v) {
                                Ok(v as $ty)
                            } else {
                                Err(overflow::<Self>(number))
                            }
                        }
                    }
                }
            }
        )*
    };
}

impl_float_scalar!(f32 => F32, f64 => F64);
