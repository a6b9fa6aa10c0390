//! Error types for constructor activation

use crate::role::ExecutionRole;

/// Error type returned by constructor bodies.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main error type for activation
#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    /// More than one constructor is tagged for the requested role
    #[error("Multiple constructors of '{type_name}' are marked for the {role} role. Only one may be preferred per role.")]
    AmbiguousPreferredConstructor {
        type_name: &'static str,
        role: ExecutionRole,
    },

    /// The preferred constructor cannot take the supplied arguments
    #[error("Constructor '{constructor}' of '{type_name}' is preferred for the {role} role but does not accept all of the supplied arguments.")]
    PreferredConstructorArgumentMismatch {
        type_name: &'static str,
        constructor: &'static str,
        role: ExecutionRole,
    },

    /// Nothing eligible accepts the supplied inputs
    #[error("A suitable constructor for type '{type_name}' could not be located. Ensure the type is concrete and all parameters of a constructor are either registered as services or passed as arguments. Also ensure no extraneous arguments are provided.")]
    NoApplicableConstructor { type_name: &'static str },

    /// Several constructors accept the supplied argument types
    #[error("Multiple constructors accepting all given argument types have been found in type '{type_name}' ('{first}' and '{second}'). There should only be one applicable constructor.")]
    AmbiguousConstructor {
        type_name: &'static str,
        first: &'static str,
        second: &'static str,
    },

    /// Unbound parameter with no service and no default
    #[error("Unable to resolve service for type '{parameter_type}' (parameter '{parameter}') while attempting to activate '{type_name}'.")]
    UnresolvableParameter {
        type_name: &'static str,
        parameter: &'static str,
        parameter_type: &'static str,
    },

    /// A supplied or resolved value is not assignable to its parameter
    #[error("Value of type '{actual}' cannot be assigned to parameter '{parameter}' of type '{expected}' while attempting to activate '{type_name}'.")]
    ArgumentTypeMismatch {
        type_name: &'static str,
        parameter: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// A factory was invoked with too few arguments
    #[error("Argument slot {slot} is required to activate '{type_name}' but only {supplied} argument(s) were supplied.")]
    ArgumentOutOfRange {
        type_name: &'static str,
        slot: usize,
        supplied: usize,
    },

    /// No registration table exists for the requested type
    #[error("Type '{type_name}' has no registered constructors.")]
    UnregisteredType { type_name: &'static str },

    /// The resolver handed back a value of the wrong type
    #[error("Service registered for '{expected}' has type '{actual}'.")]
    ServiceTypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The constructor body itself failed
    #[error(transparent)]
    TargetConstruction(BoxError),
}

impl ActivationError {
    /// Returns the error raised by the constructor body, if that is what this is.
    ///
    /// Use this to recover the original error and downcast it to its concrete type.
    pub fn into_target_error(self) -> Result<BoxError, Self> {
        match self {
            ActivationError::TargetConstruction(inner) => Ok(inner),
            other => Err(other),
        }
    }

    /// True when the failure was raised by selection rather than construction
    pub fn is_selection_error(&self) -> bool {
        matches!(
            self,
            ActivationError::AmbiguousPreferredConstructor { .. }
                | ActivationError::PreferredConstructorArgumentMismatch { .. }
                | ActivationError::NoApplicableConstructor { .. }
                | ActivationError::AmbiguousConstructor { .. }
                | ActivationError::UnregisteredType { .. }
        )
    }
}

/// Errors raised by [`crate::Arguments`] accessors inside constructor bodies
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    /// Index past the end of the argument list
    #[error("Argument index {index} is out of range ({len} arguments)")]
    OutOfRange { index: usize, len: usize },

    /// The slot holds nothing
    #[error("Argument {index} is missing")]
    Missing { index: usize },

    /// The slot holds a value of another type
    #[error("Argument {index} has type '{actual}', expected '{expected}'")]
    WrongType {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parse error
    #[error("Configuration parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Configuration serialization error: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Semantically invalid configuration
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Logging subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    LoggingSetup(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn test_target_error_is_transparent() {
        let err = ActivationError::TargetConstruction(Box::new(Boom));
        assert_eq!(err.to_string(), "boom");
        assert!(!err.is_selection_error());

        let inner = err.into_target_error().unwrap();
        assert!(inner.downcast_ref::<Boom>().is_some());
    }

    #[test]
    fn test_into_target_error_rejects_other_kinds() {
        let err = ActivationError::NoApplicableConstructor { type_name: "Foo" };
        assert!(err.is_selection_error());
        assert!(err.into_target_error().is_err());
    }
}
