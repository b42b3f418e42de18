use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Greater than zero.
///
/// ```
/// use twine_equilibrium::support::constraint::StrictlyPositive;
///
/// assert!(StrictlyPositive::new(1.0e-9).is_ok());
/// assert!(StrictlyPositive::new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Shorthand for [`Constrained::new`] with this marker.
    ///
    /// # Errors
    ///
    /// Returns the [`ConstraintError`] for zero, negative or `NaN` input.
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, StrictlyPositive>, ConstraintError> {
        Constrained::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            None => Err(ConstraintError::NotANumber),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            Some(Ordering::Equal) => Err(ConstraintError::Zero),
            Some(Ordering::Greater) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::MolarConcentration, molar_concentration::mole_per_cubic_meter};

    #[test]
    fn tolerances() {
        assert_eq!(StrictlyPositive::new(0.0), Err(ConstraintError::Zero));
        assert_eq!(StrictlyPositive::new(-1.0), Err(ConstraintError::Negative));
        assert_eq!(
            StrictlyPositive::new(f64::NAN),
            Err(ConstraintError::NotANumber)
        );
    }

    #[test]
    fn densities() {
        let graphite = MolarConcentration::new::<mole_per_cubic_meter>(187_000.0);
        assert!(StrictlyPositive::check(&graphite).is_ok());
        assert!(StrictlyPositive::check(&(graphite * 0.0)).is_err());
    }
}
