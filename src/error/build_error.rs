#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can occur while building an L-system.
pub enum BuildError {
    /// The builder was finalized without an axiom definition.
    MissingAxiom,
    /// `axiom()` was called more than once.
    AxiomRedefined,
    /// A rule was opened for a symbol that already has a rule.
    DuplicateRule {
        /// The symbol of the offending rule, in debug notation.
        symbol: String,
    },
    /// A value expression references a variable its enclosing rule never
    /// declared.
    UnresolvedVariable {
        /// The scope the reference appears in (a rule symbol or the axiom).
        scope: String,
        /// The name of the referenced variable.
        name:  String,
    },
    /// An unconditional branch is not the last branch of its rule.
    MisplacedFallback {
        /// The symbol of the offending rule, in debug notation.
        symbol: String,
    },
    /// A rule declares more than one unconditional branch.
    DuplicateFallback {
        /// The symbol of the offending rule, in debug notation.
        symbol: String,
    },
    /// A probability leaf lies outside the open interval (0, 1).
    ProbabilityOutOfRange {
        /// The rejected probability.
        value: f64,
    },
    /// An exploding directive cannot be applied to the preceding output.
    MalformedExploding {
        /// Details describing why the directive is invalid.
        details: String,
    },
    /// A builder method was invoked in a position where it has no meaning.
    MisplacedCall {
        /// Details describing the protocol violation.
        details: String,
    },
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingAxiom => write!(f, "Build error: No axiom was defined."),

            Self::AxiomRedefined => write!(f, "Build error: The axiom was defined twice."),

            Self::DuplicateRule { symbol } => {
                write!(f, "Build error: A rule for symbol {symbol} already exists.")
            },

            Self::UnresolvedVariable { scope, name } => write!(f,
                                                               "Build error: Variable '{name}' is not declared in {scope}."),

            Self::MisplacedFallback { symbol } => write!(f,
                                                         "Build error: The unconditional branch of rule {symbol} must be declared last."),

            Self::DuplicateFallback { symbol } => write!(f,
                                                         "Build error: Rule {symbol} declares more than one unconditional branch."),

            Self::ProbabilityOutOfRange { value } => write!(f,
                                                            "Build error: Probability {value} is outside the open interval (0, 1)."),

            Self::MalformedExploding { details } => {
                write!(f, "Build error: Invalid exploding directive: {details}.")
            },

            Self::MisplacedCall { details } => {
                write!(f, "Build error: Misplaced builder call: {details}.")
            },
        }
    }
}

impl std::error::Error for BuildError {}
