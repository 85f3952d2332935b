use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::{error::RewriteError, util::num::i64_to_f64_checked};

/// Represents a tagged variable value carried by an L-system occurrence.
///
/// `Var` covers the three value kinds a parametrized symbol can carry:
/// booleans, reals, and integers. Arithmetic and comparison are defined only
/// between values of the same tag; crossing tags is a reportable
/// `TypeMismatch` error rather than an implicit coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Var {
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// A numeric value (double precision floating-point).
    Real(f64),
    /// An integer value (64 bit integer).
    Int(i64),
}

impl From<bool> for Var {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Var {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<i64> for Var {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Var {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl Var {
    /// Returns the name of this value's tag, for error reporting.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Real(_) => "real",
            Self::Int(_) => "integer",
        }
    }

    /// Returns the boolean payload, or a `TypeMismatch` error for any other
    /// tag.
    ///
    /// # Example
    /// ```
    /// use lsystema::engine::value::Var;
    ///
    /// assert_eq!(Var::from(true).as_bool().unwrap(), true);
    /// assert!(Var::from(1).as_bool().is_err());
    /// ```
    pub const fn as_bool(&self) -> Result<bool, RewriteError> {
        match self {
            Self::Bool(b) => Ok(*b),
            other => Err(RewriteError::TypeMismatch { expected: "boolean",
                                                      found:    other.tag(), }),
        }
    }

    /// Returns the integer payload, or a `TypeMismatch` error for any other
    /// tag. Reals are never truncated to integers.
    pub const fn as_int(&self) -> Result<i64, RewriteError> {
        match self {
            Self::Int(n) => Ok(*n),
            other => Err(RewriteError::TypeMismatch { expected: "integer",
                                                      found:    other.tag(), }),
        }
    }

    /// Returns the value as an `f64`.
    ///
    /// Accepts `Var::Real` directly and widens `Var::Int` when the integer is
    /// exactly representable as an `f64`; booleans are a `TypeMismatch`.
    ///
    /// # Errors
    /// - `TypeMismatch` for a boolean value.
    /// - `IntTooLarge` for an integer outside the exact `f64` range.
    pub fn as_real(&self) -> Result<f64, RewriteError> {
        match self {
            Self::Real(r) => Ok(*r),
            Self::Int(n) => i64_to_f64_checked(*n, RewriteError::IntTooLarge { value: *n }),
            other => Err(RewriteError::TypeMismatch { expected: "real",
                                                      found:    other.tag(), }),
        }
    }

    /// Compares two values of the same tag.
    ///
    /// Reals compare through `OrderedFloat`, giving a total order even in the
    /// presence of `NaN`. Booleans order `false` before `true`.
    ///
    /// # Errors
    /// Returns `TypeMismatch` when the tags differ; no cross-tag promotion is
    /// performed.
    ///
    /// # Example
    /// ```
    /// use std::cmp::Ordering;
    ///
    /// use lsystema::engine::value::Var;
    ///
    /// let a = Var::from(2);
    /// let b = Var::from(5);
    /// assert_eq!(a.compare(&b).unwrap(), Ordering::Less);
    ///
    /// // Tags must match.
    /// assert!(a.compare(&Var::from(5.0)).is_err());
    /// ```
    pub fn compare(&self, other: &Self) -> Result<Ordering, RewriteError> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Ok(a.cmp(b)),
            (Self::Real(a), Self::Real(b)) => Ok(OrderedFloat(*a).cmp(&OrderedFloat(*b))),
            (Self::Int(a), Self::Int(b)) => Ok(a.cmp(b)),
            (a, b) => Err(RewriteError::TypeMismatch { expected: a.tag(),
                                                       found:    b.tag(), }),
        }
    }

    /// Returns `true` if this value is strictly less than `other`.
    ///
    /// # Errors
    /// Returns `TypeMismatch` when the tags differ.
    pub fn less_than(&self, other: &Self) -> Result<bool, RewriteError> {
        Ok(self.compare(other)? == Ordering::Less)
    }

    /// Returns `true` if this value is less than or equal to `other`.
    ///
    /// # Errors
    /// Returns `TypeMismatch` when the tags differ.
    pub fn less_than_or_equal(&self, other: &Self) -> Result<bool, RewriteError> {
        Ok(self.compare(other)? != Ordering::Greater)
    }

    /// Returns `true` if this value is strictly greater than `other`.
    ///
    /// # Errors
    /// Returns `TypeMismatch` when the tags differ.
    pub fn greater_than(&self, other: &Self) -> Result<bool, RewriteError> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    /// Returns `true` if this value is greater than or equal to `other`.
    ///
    /// # Errors
    /// Returns `TypeMismatch` when the tags differ.
    pub fn greater_than_or_equal(&self, other: &Self) -> Result<bool, RewriteError> {
        Ok(self.compare(other)? != Ordering::Less)
    }

    /// Returns `true` if the value is [`Bool`].
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(..))
    }

    /// Returns `true` if the value is [`Real`].
    #[must_use]
    pub const fn is_real(&self) -> bool {
        matches!(self, Self::Real(..))
    }

    /// Returns `true` if the value is [`Int`].
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int(..))
    }
}

impl std::fmt::Display for Var {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Real(r) => write!(f, "{r}"),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}
