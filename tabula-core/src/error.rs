//! Errors in the library.
use crate::Capability;
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum TabulaError {
    /// An action outside the legal set was applied to an environment.
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// The environment lacks a capability the caller depends on.
    #[error("{1} requires an environment with {0}")]
    MissingCapability(Capability, String),

    /// There are no candidate actions to choose from.
    #[error("Empty action set: {0}")]
    EmptyActionSet(String),

    /// Action values and actions differ in length.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Number of actions.
        expected: usize,
        /// Number of action values.
        actual: usize,
    },

    /// None of the action values can be compared, e.g. all of them are NaN.
    #[error("No comparable action value among {0} actions")]
    IncomparableValues(usize),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
