use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::Arc,
};

use rand::{rngs::StdRng, Rng};

use crate::{
    engine::{context::ContextView, state::State, value::Var, Symbol},
    error::RewriteError,
};

/// A caller-supplied function computing a value from the firing occurrence's
/// state.
pub type ValueFn<S> = Arc<dyn Fn(&State<S>) -> Result<Var, RewriteError> + Send + Sync>;

/// A caller-supplied predicate evaluated against the firing occurrence's
/// state.
pub type PredicateFn<S> = Arc<dyn Fn(&State<S>) -> Result<bool, RewriteError> + Send + Sync>;

/// A value expression attached to an output symbol.
///
/// Value expressions are evaluated in declared left-to-right order when their
/// branch fires, and the resulting values become the emitted occurrence's
/// parameters.
#[derive(Clone)]
pub enum ValueExpr<S> {
    /// A fixed value injected verbatim.
    Literal(Var),
    /// The value of a variable declared by the enclosing rule.
    Named(String),
    /// A value computed against the firing occurrence's state.
    Computed(ValueFn<S>),
}

impl<S: Symbol> ValueExpr<S> {
    /// Evaluates the expression against the firing occurrence's state.
    ///
    /// # Errors
    /// Named references fail with `UnknownVariable` if the state does not
    /// bind them; computed functions propagate their own failures unmodified.
    pub fn eval(&self, state: &State<S>) -> Result<Var, RewriteError> {
        match self {
            Self::Literal(value) => Ok(value.clone()),
            Self::Named(name) => state.var(name),
            Self::Computed(f) => f(state),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for ValueExpr<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

/// A compiled boolean condition guarding a branch.
///
/// Leaves are probability draws, caller predicates, and left/right context
/// matches; composites combine them with short-circuiting `Not`, `And`, and
/// `Or` in the exact shape the builder folded them into.
#[derive(Clone)]
pub enum Condition<S> {
    /// True iff a fresh uniform sample is below the probability.
    Probability(f64),
    /// True iff the caller-supplied predicate returns true.
    Predicate(PredicateFn<S>),
    /// True iff the left context equals the sequence, nearest neighbor first.
    Precedes(Vec<S>),
    /// True iff the right context equals the sequence, nearest neighbor
    /// first.
    Follows(Vec<S>),
    /// Logical negation.
    Not(Box<Condition<S>>),
    /// Short-circuiting conjunction.
    And(Box<Condition<S>>, Box<Condition<S>>),
    /// Short-circuiting disjunction.
    Or(Box<Condition<S>>, Box<Condition<S>>),
}

impl<S: Symbol> Condition<S> {
    /// Evaluates the condition for one branch-selection attempt.
    ///
    /// Probability leaves draw one fresh sample per attempt from the
    /// call-scoped random source; they are never cached across attempts or
    /// generations.
    ///
    /// # Errors
    /// Propagates predicate failures unmodified.
    pub(crate) fn holds(&self,
                        state: &State<S>,
                        context: &ContextView<'_, S>,
                        rng: &mut StdRng)
                        -> Result<bool, RewriteError> {
        match self {
            Self::Probability(p) => Ok(rng.gen::<f64>() < *p),
            Self::Predicate(f) => f(state),
            Self::Precedes(symbols) => Ok(context.matches_left(symbols)),
            Self::Follows(symbols) => Ok(context.matches_right(symbols)),
            Self::Not(inner) => Ok(!inner.holds(state, context, rng)?),
            Self::And(left, right) => {
                Ok(left.holds(state, context, rng)? && right.holds(state, context, rng)?)
            },
            Self::Or(left, right) => {
                Ok(left.holds(state, context, rng)? || right.holds(state, context, rng)?)
            },
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Condition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Probability(p) => f.debug_tuple("Probability").field(p).finish(),
            Self::Predicate(_) => f.write_str("Predicate(<fn>)"),
            Self::Precedes(symbols) => f.debug_tuple("Precedes").field(symbols).finish(),
            Self::Follows(symbols) => f.debug_tuple("Follows").field(symbols).finish(),
            Self::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Self::And(left, right) => f.debug_tuple("And").field(left).field(right).finish(),
            Self::Or(left, right) => f.debug_tuple("Or").field(left).field(right).finish(),
        }
    }
}

/// One symbol of an output specification, with its value expressions.
#[derive(Debug, Clone)]
pub struct OutputSymbol<S> {
    pub(crate) symbol: S,
    pub(crate) values: Vec<ValueExpr<S>>,
}

impl<S> OutputSymbol<S> {
    pub(crate) const fn new(symbol: S) -> Self {
        Self { symbol,
               values: Vec::new() }
    }

    /// The symbol to emit.
    pub const fn symbol(&self) -> &S {
        &self.symbol
    }

    /// The value expressions evaluated when the symbol is emitted.
    #[must_use]
    pub fn values(&self) -> &[ValueExpr<S>] {
        &self.values
    }
}

/// One replacement option of a rule.
///
/// Branch order is declaration order and is selection-significant: the first
/// branch whose condition holds wins. A branch without a condition is the
/// rule's unconditional fallback and must be declared last.
#[derive(Debug, Clone)]
pub struct Branch<S> {
    pub(crate) condition: Option<Condition<S>>,
    pub(crate) output:    Vec<OutputSymbol<S>>,
}

impl<S> Branch<S> {
    /// The guarding condition; `None` marks the unconditional fallback.
    pub const fn condition(&self) -> Option<&Condition<S>> {
        self.condition.as_ref()
    }

    /// The ordered output specification emitted when the branch fires.
    #[must_use]
    pub fn output(&self) -> &[OutputSymbol<S>] {
        &self.output
    }
}

/// The ordered branch list and declared variable names for one symbol.
#[derive(Debug, Clone)]
pub struct Rule<S> {
    pub(crate) names:    Vec<String>,
    pub(crate) branches: Vec<Branch<S>>,
}

impl<S> Rule<S> {
    /// The variable names the rule declares, in positional binding order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The branches in declaration order.
    #[must_use]
    pub fn branches(&self) -> &[Branch<S>] {
        &self.branches
    }
}

/// An immutable L-system grammar.
///
/// A grammar is the axiom output specification, a map from symbol to rule,
/// and the grammar-global skip set of symbols that are invisible to context
/// matching. It is built once by the fluent builder, validated, and then
/// reused across arbitrarily many rewrite calls; nothing in it mutates after
/// construction, so it can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct Grammar<S> {
    axiom: Vec<OutputSymbol<S>>,
    rules: HashMap<S, Rule<S>>,
    skip:  HashSet<S>,
}

impl<S: Symbol> Grammar<S> {
    pub(crate) const fn new(axiom: Vec<OutputSymbol<S>>,
                            rules: HashMap<S, Rule<S>>,
                            skip: HashSet<S>)
                            -> Self {
        Self { axiom, rules, skip }
    }

    /// Looks up the rule for a symbol. Symbols without a rule are terminal
    /// and are copied unchanged into the next generation.
    #[must_use]
    pub fn rule(&self, symbol: &S) -> Option<&Rule<S>> {
        self.rules.get(symbol)
    }

    /// The axiom output specification, evaluated to produce generation zero.
    #[must_use]
    pub fn axiom(&self) -> &[OutputSymbol<S>] {
        &self.axiom
    }

    /// The symbols elided from context matching.
    #[must_use]
    pub const fn skip_set(&self) -> &HashSet<S> {
        &self.skip
    }
}
