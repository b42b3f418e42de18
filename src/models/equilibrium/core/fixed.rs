/// Pair of properties held constant during equilibration.
///
/// Pressure is always held. The second property is temperature, enthalpy or
/// entropy; for the latter two the temperature is found iteratively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FixedProperties {
    /// Temperature and pressure.
    #[default]
    TP,

    /// Enthalpy and pressure.
    HP,

    /// Entropy and pressure.
    SP,
}
