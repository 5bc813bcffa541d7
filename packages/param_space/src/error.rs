use thiserror::Error;

/// Errors that can occur when describing a parameter space.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An axis was given an empty name. Axis names become keys of every generated
    /// assignment, so they must identify the parameter.
    #[error("axis name must not be empty")]
    InvalidName,

    /// An axis was given no candidate values.
    #[error("axis '{name}' has no values, at least one is required")]
    EmptyValues {
        /// Name of the axis that had no values.
        name: String,
    },

    /// An element used to construct a space could not be interpreted as an axis.
    #[error("element {index} is not an axis: {reason}")]
    InvalidAxisType {
        /// Position of the offending element in the input sequence.
        index: usize,

        /// A human-readable description of why the element was rejected.
        reason: String,
    },

    /// A string did not name any known traversal shape.
    #[error("unknown shape '{value}', expected one of 'corners', 'edges' or 'cube'")]
    UnknownShape {
        /// The string that failed to parse.
        value: String,
    },
}

/// A specialized `Result` type for parameter space operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
