//! Error types for option registration, alias resolution and parsing.
//!
//! Every failure mode of the crate is a variant of [`OptionError`]. Errors are
//! raised at the offending call and never leave an [`Options`](crate::Options)
//! instance partially mutated.

use thiserror::Error;

use crate::ValueKind;

/// Errors produced while configuring options or parsing arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    /// The name is neither a canonical option nor a live alias.
    #[error("unknown option: {0}")]
    UnknownOption(String),

    /// The name passed to alias removal is not a live alias.
    #[error("'{0}' is not an alias")]
    UnknownAlias(String),

    /// A proposed alias collides with the short or long form of an option.
    #[error("alias '{0}' conflicts with existing option")]
    AliasConflict(String),

    /// An alias chain revisits a name before reaching a canonical option.
    ///
    /// The payload is the offending chain joined with ` -> `.
    #[error("Cycle detected in alias chain: {0}")]
    CycleDetected(String),

    /// Name is empty, dash-prefixed, or contains whitespace or `=`.
    #[error("invalid option name: '{0}'")]
    InvalidName(String),

    /// An option defines neither a short nor a long form.
    #[error("option must define a short or long name")]
    MissingOptionName,

    /// Two options share a short or long name.
    #[error("duplicate option name: {0}")]
    DuplicateOption(String),

    /// A value-taking option appeared without an argument.
    #[error("option '{0}' requires an argument")]
    MissingArgument(String),

    /// A boolean option was given an inline argument (`--flag=value`).
    #[error("option '{0}' does not take an argument")]
    UnexpectedArgument(String),

    /// An argument could not be parsed as the option's value kind.
    #[error("invalid {kind} value '{value}' for option '{option}'")]
    InvalidValue {
        /// Option name as written by the caller.
        option: String,
        /// Raw argument text.
        value: String,
        /// Kind the option expects.
        kind: ValueKind,
    },

    /// The option was never supplied and has no default.
    #[error("option '{0}' has no value")]
    MissingValue(String),

    /// The stored value cannot be read as the requested type.
    #[error("option '{option}' holds a {actual} value")]
    TypeMismatch {
        /// Name used for the lookup.
        option: String,
        /// Kind of the stored value.
        actual: ValueKind,
    },
}

/// Convenience alias for results with [`OptionError`].
pub type Result<T> = std::result::Result<T, OptionError>;
