use std::{cmp::Ordering, ops::Add};

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Zero or greater.
///
/// A species may be absent, but never present in a negative amount.
///
/// ```
/// use twine_equilibrium::support::constraint::NonNegative;
///
/// assert_eq!(NonNegative::new(0.0).unwrap().into_inner(), 0.0);
/// assert!(NonNegative::new(-1.0e-3).is_err());
/// assert!(NonNegative::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative;

impl NonNegative {
    /// Shorthand for [`Constrained::new`] with this marker.
    ///
    /// # Errors
    ///
    /// Returns [`ConstraintError::Negative`] or [`ConstraintError::NotANumber`].
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, NonNegative>, ConstraintError> {
        Constrained::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for NonNegative {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            None => Err(ConstraintError::NotANumber),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            Some(_) => Ok(()),
        }
    }
}

impl<T> Add for Constrained<T, NonNegative>
where
    T: Add<Output = T> + PartialOrd + Zero,
{
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        let total = self.value + rhs.value;
        debug_assert!(total >= T::zero(), "sum of non-negative values is negative");
        Self::new_unchecked(total)
    }
}

impl<T> Zero for Constrained<T, NonNegative>
where
    T: PartialOrd + Zero,
{
    fn zero() -> Self {
        Self::new_unchecked(T::zero())
    }

    fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{amount_of_substance::kilomole, f64::AmountOfSubstance};

    #[test]
    fn species_moles_sum() {
        let total: Constrained<f64, NonNegative> = [0.5, 0.0, 1.25]
            .into_iter()
            .map(|n| NonNegative::new(n).unwrap())
            .sum();
        assert_eq!(total.into_inner(), 1.75);
    }

    #[test]
    fn rejects_negative_and_nan() {
        assert_eq!(NonNegative::new(-0.1), Err(ConstraintError::Negative));
        assert_eq!(NonNegative::new(f64::NAN), Err(ConstraintError::NotANumber));
        assert!(NonNegative::new(-0.0).is_ok());
    }

    #[test]
    fn amounts_of_substance() {
        assert!(NonNegative::new(AmountOfSubstance::new::<kilomole>(3.0)).is_ok());
        assert!(NonNegative::new(AmountOfSubstance::new::<kilomole>(-3.0)).is_err());
    }
}
