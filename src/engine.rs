/// The builder module assembles grammars from fluent call sequences.
///
/// The builder is the construction front end: it records axiom and rule
/// definitions, folds condition leaves and combinators into expression
/// trees, and validates the assembled grammar before handing over an
/// immutable, ready-to-derive system.
///
/// # Responsibilities
/// - Tracks the construction cursor (current rule, branch, output symbol).
/// - Folds condition calls left-to-right with implicit AND combination.
/// - Validates declarations and reports all misuse at `build()` time.
pub mod builder;
/// The context module resolves neighbors for context-sensitive matching.
///
/// A context view inspects a fixed generation around one position and
/// answers left/right neighbor queries with skip-set members transparently
/// elided, preserving the contiguity of the remaining meaningful symbols.
///
/// # Responsibilities
/// - Computes skip-filtered left and right neighbors at a distance.
/// - Matches `precedes`/`follows` sequences nearest-neighbor first.
pub mod context;
/// The grammar module defines the immutable grammar model.
///
/// This module declares the data the engine executes: the axiom output
/// specification, rules with their ordered branch lists, condition
/// expression trees, and value expressions. A grammar never changes after
/// construction and can be shared across threads.
///
/// # Responsibilities
/// - Defines `Grammar`, `Rule`, `Branch`, `OutputSymbol`, `ValueExpr`, and
///   `Condition`.
/// - Evaluates conditions and value expressions against a rewrite state.
pub mod grammar;
/// The interpret module defines the interpretation protocol.
///
/// An interpreter turns the final generation of a rewrite call into a
/// caller-visible result. This module declares the `Interpreter` trait, the
/// `and_then` combination, and stock interpreters for counting, joining,
/// and printing symbols.
///
/// # Responsibilities
/// - Declares the `before`/`interpret`/`after`/`result` protocol.
/// - Provides composable stock interpreters.
pub mod interpret;
/// The rewriter module drives the derivation loop.
///
/// The rewriter applies the grammar generation by generation: branch
/// selection in declaration order, context matching against the unmutated
/// previous generation, parameter binding, and the final interpretation
/// pass. It is the core execution engine of the crate.
///
/// # Responsibilities
/// - Evaluates the axiom into generation zero.
/// - Rewrites every occurrence of a generation in parallel semantics.
/// - Walks the final generation through the interpreter protocol.
pub mod rewriter;
/// The state module exposes the observable rewrite state.
///
/// This module declares the occurrence type carried through generations and
/// the per-call `State` handed to predicates, computed value functions, and
/// interpreters.
///
/// # Responsibilities
/// - Defines `Occurrence` and `State`.
/// - Binds occurrence values to declared variable names positionally.
pub mod state;
/// The value module defines the tagged variable model.
///
/// This module declares the `Var` sum type with boolean, real, and integer
/// variants, together with accessors, same-tag comparison, and relational
/// helpers. Cross-tag operations are reportable errors, never silent
/// coercions.
///
/// # Responsibilities
/// - Defines the `Var` enum and its accessors.
/// - Implements total-order comparison within a tag.
pub mod value;

/// An alphabet member usable as both a sequence element and a rule key.
///
/// The engine is generic over the symbol type; any cloneable, equatable,
/// hashable type qualifies. The blanket implementation means callers never
/// implement this trait by hand.
pub trait Symbol: Clone + Eq + std::hash::Hash + std::fmt::Debug {}

impl<T: Clone + Eq + std::hash::Hash + std::fmt::Debug> Symbol for T {}
