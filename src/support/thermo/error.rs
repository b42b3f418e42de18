use thiserror::Error;

/// Errors that may occur when evaluating phase properties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// The property is undefined at the given state.
    ///
    /// For example, the molar entropy of a phase whose composition is all zeros.
    #[error("undefined property: {context}")]
    Undefined { context: String },

    /// The requested state lies outside the phase's valid domain.
    #[error("out of domain: {context}")]
    OutOfDomain { context: String },

    /// The phase was given an invalid or inconsistent state.
    #[error("invalid state: {context}")]
    InvalidState { context: String },
}
