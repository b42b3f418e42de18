//! Validated numeric inputs.
//!
//! Mole numbers, composition amounts and mole fractions must never be
//! negative. Densities and solver tolerances must be greater than zero.
//! A [`Constrained<T, C>`] can only be built from a value that passes the
//! marker `C`, so code receiving one does not need to check it again.
//!
//! Markers:
//!
//! - [`NonNegative`]: mole numbers, amounts, fractions
//! - [`StrictlyPositive`]: densities, tolerances
//!
//! Where a value is only validated and then used raw, call
//! [`Constraint::check`] on the marker directly.

mod non_negative;
mod strictly_positive;

use std::{iter::Sum, marker::PhantomData, ops::Add};

use num_traits::Zero;
use thiserror::Error;

pub use non_negative::NonNegative;
pub use strictly_positive::StrictlyPositive;

/// A numeric requirement a value must satisfy.
pub trait Constraint<T> {
    /// Checks `value` against the requirement.
    ///
    /// # Errors
    ///
    /// Returns the [`ConstraintError`] describing the violation.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// The way a value failed a [`Constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value is negative")]
    Negative,
    #[error("value is zero")]
    Zero,
    #[error("value is NaN")]
    NotANumber,
}

/// A value known to satisfy the constraint `C`.
///
/// ```
/// use twine_equilibrium::support::constraint::{Constrained, NonNegative};
///
/// let n = Constrained::<f64, NonNegative>::new(2.5).unwrap();
/// assert_eq!(*n.as_ref(), 2.5);
/// assert!(Constrained::<f64, NonNegative>::new(-2.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// Wraps `value` after checking it.
    ///
    /// # Errors
    ///
    /// Returns the violation reported by `C`.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value).map(|()| Self::new_unchecked(value))
    }

    /// Wraps a value the caller has already shown to satisfy `C`.
    fn new_unchecked(value: T) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T, C: Constraint<T>> AsRef<T> for Constrained<T, C> {
    fn as_ref(&self) -> &T {
        &self.value
    }
}

/// Totals of constrained values, for constraints closed under addition.
impl<T, C> Sum for Constrained<T, C>
where
    C: Constraint<T>,
    Self: Add<Output = Self> + Zero,
{
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}
