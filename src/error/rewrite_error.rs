#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur during derivation and interpretation.
pub enum RewriteError {
    /// A variable was looked up that the firing occurrence does not bind.
    UnknownVariable {
        /// The name of the variable.
        name: String,
    },
    /// Two values of different tags were compared, or a value was accessed
    /// through an accessor of another tag.
    TypeMismatch {
        /// The tag that was required.
        expected: &'static str,
        /// The tag that was actually found.
        found:    &'static str,
    },
    /// An integer value is too large to be widened to a real exactly.
    IntTooLarge {
        /// The offending integer.
        value: i64,
    },
    /// A failure raised by a caller-supplied predicate, value function, or
    /// interpreter.
    Custom {
        /// Details about the failure.
        details: String,
    },
}

impl std::fmt::Display for RewriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariable { name } => {
                write!(f, "Rewrite error: Unknown variable '{name}'.")
            },

            Self::TypeMismatch { expected, found } => write!(f,
                                                             "Rewrite error: Expected a {expected} value but found a {found} value."),

            Self::IntTooLarge { value } => write!(f,
                                                  "Rewrite error: Integer {value} cannot be represented exactly as a real."),

            Self::Custom { details } => write!(f, "Rewrite error: {details}"),
        }
    }
}

impl std::error::Error for RewriteError {}
