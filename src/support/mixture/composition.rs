//! Composition maps: species name to molar amount.

use std::str::FromStr;

use thiserror::Error;

use crate::support::constraint::{Constrained, ConstraintError, NonNegative};

/// Errors produced while building or parsing a [`Composition`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    /// An entry was not of the form `name:value`.
    #[error("malformed composition entry '{entry}'")]
    Malformed { entry: String },

    /// The amount of an entry could not be parsed as a number.
    #[error("invalid amount in composition entry '{entry}'")]
    InvalidAmount { entry: String },

    /// The amount of an entry was negative or `NaN`.
    #[error("invalid amount for species '{name}'")]
    Amount {
        name: String,
        #[source]
        source: ConstraintError,
    },

    /// A species appeared more than once.
    #[error("species '{name}' listed more than once")]
    Duplicate { name: String },
}

/// Association of species names with non-negative molar amounts (kmol).
///
/// Species not listed have an amount of zero. Entries keep insertion order.
///
/// # Parsing
///
/// A composition can be parsed from `name:value` pairs separated by commas
/// and/or whitespace:
///
/// ```
/// use twine_equilibrium::support::mixture::Composition;
///
/// let comp: Composition = "CH4:1, O2:2 N2:7.52".parse().unwrap();
/// assert_eq!(comp.get("O2"), 2.0);
/// assert_eq!(comp.get("Ar"), 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Composition {
    entries: Vec<(String, Constrained<f64, NonNegative>)>,
}

impl Composition {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a species amount.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError::Duplicate`] if `name` is already present.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        amount: Constrained<f64, NonNegative>,
    ) -> Result<(), CompositionError> {
        let name = name.into();
        if self.entries.iter().any(|(existing, _)| *existing == name) {
            return Err(CompositionError::Duplicate { name });
        }
        self.entries.push((name, amount));
        Ok(())
    }

    /// Builder-style variant of [`Composition::insert`] taking a raw amount.
    ///
    /// # Errors
    ///
    /// Returns [`CompositionError`] if the amount is negative or the name is repeated.
    pub fn with(mut self, name: impl Into<String>, amount: f64) -> Result<Self, CompositionError> {
        let name = name.into();
        let amount = NonNegative::new(amount).map_err(|source| CompositionError::Amount {
            name: name.clone(),
            source,
        })?;
        self.insert(name, amount)?;
        Ok(self)
    }

    /// Amount of `name`, zero if it is not listed.
    #[must_use]
    pub fn get(&self, name: &str) -> f64 {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map_or(0.0, |(_, amount)| *amount.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries
            .iter()
            .map(|(name, amount)| (name.as_str(), *amount.as_ref()))
    }

    /// Sum of all listed amounts.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries
            .iter()
            .map(|&(_, amount)| amount)
            .sum::<Constrained<f64, NonNegative>>()
            .into_inner()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for Composition {
    type Err = CompositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty());

        let mut composition = Self::new();
        while let Some(token) = tokens.next() {
            // Allow "name: value" with a space after the colon.
            let entry = match token.strip_suffix(':') {
                Some(_) => match tokens.next() {
                    Some(value) => format!("{token}{value}"),
                    None => {
                        return Err(CompositionError::Malformed {
                            entry: token.to_owned(),
                        });
                    }
                },
                None => token.to_owned(),
            };

            let Some((name, value)) = entry.rsplit_once(':') else {
                return Err(CompositionError::Malformed { entry });
            };
            if name.is_empty() {
                return Err(CompositionError::Malformed { entry });
            }
            let amount: f64 = value
                .parse()
                .map_err(|_| CompositionError::InvalidAmount {
                    entry: entry.clone(),
                })?;

            composition = composition.with(name, amount)?;
        }
        Ok(composition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn parses_mixed_separators() {
        let comp: Composition = "H2:2.0, O2:1 N2: 3.76".parse().unwrap();

        assert_eq!(comp.len(), 3);
        assert_eq!(comp.get("H2"), 2.0);
        assert_eq!(comp.get("O2"), 1.0);
        assert_eq!(comp.get("N2"), 3.76);
        assert_eq!(comp.get("AR"), 0.0);
        assert_relative_eq!(comp.total(), 6.76);

        let names: Vec<&str> = comp.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["H2", "O2", "N2"]);
    }

    #[test]
    fn empty_string_is_empty_composition() {
        let comp: Composition = "  ".parse().unwrap();
        assert!(comp.is_empty());
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(matches!(
            "H2".parse::<Composition>(),
            Err(CompositionError::Malformed { .. })
        ));
        assert!(matches!(
            ":1.0".parse::<Composition>(),
            Err(CompositionError::Malformed { .. })
        ));
        assert!(matches!(
            "H2:abc".parse::<Composition>(),
            Err(CompositionError::InvalidAmount { .. })
        ));
        assert!(matches!(
            "H2:".parse::<Composition>(),
            Err(CompositionError::Malformed { .. })
        ));
    }

    #[test]
    fn rejects_negative_and_duplicate_amounts() {
        assert!(matches!(
            "H2:-1".parse::<Composition>(),
            Err(CompositionError::Amount { .. })
        ));
        assert_eq!(
            "H2:1, H2:2".parse::<Composition>(),
            Err(CompositionError::Duplicate {
                name: "H2".to_owned()
            })
        );
    }
}
