/// Construction errors.
///
/// Defines all error types that can occur while a grammar is being assembled
/// through the fluent builder. Build errors include protocol misuse, missing
/// or duplicated declarations, out-of-range probabilities, and unresolved
/// variable references. They are detected at `build()` time, never while a
/// rewrite is running.
pub mod build_error;
/// Rewrite errors.
///
/// Contains all error types that can be raised while a derivation or the
/// interpretation pass is executing. Rewrite errors include variable lookups
/// that cannot be resolved, cross-tag value comparisons, and failures raised
/// by caller-supplied predicates, value functions, or interpreters.
pub mod rewrite_error;

pub use build_error::BuildError;
pub use rewrite_error::RewriteError;
