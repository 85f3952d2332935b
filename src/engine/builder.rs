use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use crate::{
    engine::{
        grammar::{Branch, Condition, Grammar, OutputSymbol, Rule, ValueExpr},
        rewriter::LSystem,
        state::State,
        value::Var,
        Symbol,
    },
    error::{BuildError, RewriteError},
};

/// Where the next builder call attaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    /// Nothing is open yet.
    Idle,
    /// Output symbols append to the axiom.
    Axiom,
    /// A rule is open with no branch in progress.
    Rule,
    /// Condition leaves accumulate for the next branch.
    Condition,
    /// Output symbols append to the open branch.
    Output,
}

/// Left-to-right fold of condition leaves into a single expression.
///
/// There is no precedence beyond call order: each pushed leaf combines with
/// everything folded so far, using AND unless an explicit `or()` intervened,
/// and `not()` negates the next leaf only.
struct CondAccum<S> {
    expr:        Option<Condition<S>>,
    pending_or:  bool,
    pending_not: bool,
}

impl<S> CondAccum<S> {
    const fn new() -> Self {
        Self { expr:        None,
               pending_or:  false,
               pending_not: false, }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn push(&mut self, mut leaf: Condition<S>) {
        if self.pending_not {
            leaf = Condition::Not(Box::new(leaf));
            self.pending_not = false;
        }
        self.expr = Some(match self.expr.take() {
                       None => leaf,
                       Some(prev) if self.pending_or => {
                           Condition::Or(Box::new(prev), Box::new(leaf))
                       },
                       Some(prev) => Condition::And(Box::new(prev), Box::new(leaf)),
                   });
        self.pending_or = false;
    }

    fn finish(&mut self) -> Result<Condition<S>, BuildError> {
        if self.pending_not || self.pending_or {
            return Err(BuildError::MisplacedCall { details:
                           "a combinator has no following condition leaf".to_string(), });
        }
        self.expr.take().ok_or_else(|| {
                            BuildError::MisplacedCall { details:
                                                            "a branch has no condition leaves"
                                                                                    .to_string(), }
                        })
    }
}

struct RuleAccum<S> {
    symbol:   S,
    names:    Vec<String>,
    branches: Vec<Branch<S>>,
}

/// Assembles an L-system through a fluent call sequence.
///
/// The builder is an explicit accumulation record: it tracks the current
/// rule, the branch being assembled, the output symbol value expressions
/// attach to, and the pending condition combinator. A condition leaf opens a
/// new branch when none is open; the first `out()` after condition leaves
/// seals the condition; a further leaf closes the branch and opens the next
/// one. All misuse is recorded and reported by [`Builder::build`] — nothing
/// fails later, during rewriting, that could have failed here.
///
/// # Example
/// ```
/// use lsystema::{engine::interpret, string_symbols};
///
/// let ls = string_symbols().rule("a").out("a").out("b")
///                          .rule("b").out("a")
///                          .axiom().out("a")
///                          .build()?;
///
/// assert_eq!(ls.rewrite(4, &mut interpret::joining())?, "abaababa");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Builder<S: Symbol> {
    axiom:      Option<Vec<OutputSymbol<S>>>,
    rules:      Vec<RuleAccum<S>>,
    skip:       HashSet<S>,
    cursor:     Cursor,
    cond:       CondAccum<S>,
    open_cond:  Option<Condition<S>>,
    branch_out: Vec<OutputSymbol<S>>,
    error:      Option<BuildError>,
}

impl<S: Symbol> Default for Builder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Symbol> Builder<S> {
    /// Creates an empty builder. Usually obtained through the front-end
    /// factories [`crate::string_symbols`], [`crate::int_symbols`], or
    /// [`crate::generic_symbols`].
    #[must_use]
    pub fn new() -> Self {
        Self { axiom:      None,
               rules:      Vec::new(),
               skip:       HashSet::new(),
               cursor:     Cursor::Idle,
               cond:       CondAccum::new(),
               open_cond:  None,
               branch_out: Vec::new(),
               error:      None, }
    }

    /// Begins the axiom definition. Exactly one axiom is required.
    #[must_use]
    pub fn axiom(mut self) -> Self {
        self.close_scope();
        if self.axiom.is_some() {
            self.fail(BuildError::AxiomRedefined);
        } else {
            self.axiom = Some(Vec::new());
            self.cursor = Cursor::Axiom;
        }
        self
    }

    /// Begins the rule for `symbol`. A symbol may have at most one rule.
    #[must_use]
    pub fn rule(mut self, symbol: impl Into<S>) -> Self {
        self.close_scope();
        let symbol = symbol.into();
        if self.rules.iter().any(|rule| rule.symbol == symbol) {
            self.fail(BuildError::DuplicateRule { symbol: format!("{symbol:?}") });
        }
        self.rules.push(RuleAccum { symbol,
                                    names: Vec::new(),
                                    branches: Vec::new() });
        self.cursor = Cursor::Rule;
        self
    }

    /// Declares the variable names of the current rule, in the positional
    /// order incoming occurrence values bind to. Only valid directly after
    /// [`Builder::rule`], before any branch content.
    #[must_use]
    pub fn def<N: Into<String>>(mut self, names: impl IntoIterator<Item = N>) -> Self {
        match self.rules.last_mut() {
            Some(rule) if self.cursor == Cursor::Rule && rule.branches.is_empty() => {
                rule.names.extend(names.into_iter().map(Into::into));
            },
            _ => self.fail(BuildError::MisplacedCall { details:
                               "def() is only valid directly after rule()".to_string(), }),
        }
        self
    }

    /// Pushes a probability leaf: true iff a fresh uniform sample is below
    /// `probability`, which must lie in (0, 1) exclusive.
    #[must_use]
    pub fn probably(mut self, probability: f64) -> Self {
        if !(probability > 0.0 && probability < 1.0) {
            self.fail(BuildError::ProbabilityOutOfRange { value: probability });
        }
        self.push_leaf(Condition::Probability(probability));
        self
    }

    /// Pushes a predicate leaf evaluated against the firing occurrence's
    /// state.
    #[must_use]
    pub fn when(mut self,
                predicate: impl Fn(&State<S>) -> Result<bool, RewriteError> + Send + Sync + 'static)
                -> Self {
        self.push_leaf(Condition::Predicate(Arc::new(predicate)));
        self
    }

    /// Pushes a left-context leaf: true iff the skip-filtered symbols to the
    /// left of the firing occurrence equal `symbols`, nearest first.
    #[must_use]
    pub fn precedes<T: Into<S>>(mut self, symbols: impl IntoIterator<Item = T>) -> Self {
        let symbols = symbols.into_iter().map(Into::into).collect();
        self.push_leaf(Condition::Precedes(symbols));
        self
    }

    /// Pushes a right-context leaf: true iff the skip-filtered symbols to
    /// the right of the firing occurrence equal `symbols`, nearest first.
    #[must_use]
    pub fn follows<T: Into<S>>(mut self, symbols: impl IntoIterator<Item = T>) -> Self {
        let symbols = symbols.into_iter().map(Into::into).collect();
        self.push_leaf(Condition::Follows(symbols));
        self
    }

    /// Adds symbols to the grammar-global skip set; they become invisible to
    /// `precedes`/`follows` matching without breaking neighbor contiguity.
    #[must_use]
    pub fn skipping<T: Into<S>>(mut self, symbols: impl IntoIterator<Item = T>) -> Self {
        self.skip.extend(symbols.into_iter().map(Into::into));
        self
    }

    /// Negates the next condition leaf.
    #[must_use]
    pub fn not(mut self) -> Self {
        self.begin_condition();
        if self.cursor == Cursor::Condition {
            self.cond.pending_not = !self.cond.pending_not;
        }
        self
    }

    /// Combines the next leaf with everything folded so far using AND. This
    /// is the default combinator; the call exists for readability.
    #[must_use]
    pub fn and(mut self) -> Self {
        self.combinator(false);
        self
    }

    /// Combines the next leaf with everything folded so far using OR.
    #[must_use]
    pub fn or(mut self) -> Self {
        self.combinator(true);
        self
    }

    /// Begins the unconditional fallback branch of the current rule. It
    /// fires when no conditional branch matched and must be declared last.
    #[must_use]
    pub fn otherwise(mut self) -> Self {
        match self.cursor {
            Cursor::Output => {
                self.close_branch();
                self.open_branch(None);
            },
            Cursor::Rule => self.open_branch(None),
            _ => self.fail(BuildError::MisplacedCall { details:
                               "otherwise() is only valid inside a rule".to_string(), }),
        }
        self
    }

    /// Appends a symbol to the output of the axiom or the open branch,
    /// sealing the branch condition if leaves are pending.
    #[must_use]
    pub fn out(mut self, symbol: impl Into<S>) -> Self {
        let symbol = symbol.into();
        match self.cursor {
            Cursor::Axiom => {
                if let Some(axiom) = self.axiom.as_mut() {
                    axiom.push(OutputSymbol::new(symbol));
                }
            },
            Cursor::Condition => match self.cond.finish() {
                Ok(condition) => {
                    self.open_branch(Some(condition));
                    self.branch_out.push(OutputSymbol::new(symbol));
                },
                Err(e) => self.fail(e),
            },
            Cursor::Rule => {
                self.open_branch(None);
                self.branch_out.push(OutputSymbol::new(symbol));
            },
            Cursor::Output => self.branch_out.push(OutputSymbol::new(symbol)),
            Cursor::Idle => self.fail(BuildError::MisplacedCall { details:
                                          "out() before axiom() or rule()".to_string(), }),
        }
        self
    }

    /// Attaches a fixed value to the last output symbol.
    #[must_use]
    pub fn val(mut self, value: impl Into<Var>) -> Self {
        self.attach_value(ValueExpr::Literal(value.into()));
        self
    }

    /// Attaches a reference to a declared variable to the last output
    /// symbol. The reference is resolved against the firing occurrence.
    #[must_use]
    pub fn var(mut self, name: impl Into<String>) -> Self {
        self.attach_value(ValueExpr::Named(name.into()));
        self
    }

    /// Attaches a computed value to the last output symbol. The function
    /// runs against the firing occurrence's state, in declared left-to-right
    /// order relative to its siblings.
    #[must_use]
    pub fn fun(mut self,
               f: impl Fn(&State<S>) -> Result<Var, RewriteError> + Send + Sync + 'static)
               -> Self {
        self.attach_value(ValueExpr::Computed(Arc::new(f)));
        self
    }

    /// Finalizes and validates the system.
    ///
    /// # Errors
    /// Returns the first protocol violation recorded during construction, or
    /// a validation failure: missing axiom, misplaced or duplicated
    /// fallback, or a named value reference its rule never declared.
    pub fn build(mut self) -> Result<LSystem<S>, BuildError> {
        self.close_scope();
        if let Some(error) = self.error {
            return Err(error);
        }

        let axiom = self.axiom.ok_or(BuildError::MissingAxiom)?;
        Self::check_value_refs(&axiom, &[], "the axiom")?;

        let mut rules = HashMap::with_capacity(self.rules.len());
        for accum in self.rules {
            let symbol = format!("{:?}", accum.symbol);

            let fallbacks = accum.branches
                                 .iter()
                                 .filter(|branch| branch.condition.is_none())
                                 .count();
            if fallbacks > 1 {
                return Err(BuildError::DuplicateFallback { symbol });
            }
            if let Some(pos) = accum.branches.iter().position(|b| b.condition.is_none()) {
                if pos + 1 != accum.branches.len() {
                    return Err(BuildError::MisplacedFallback { symbol });
                }
            }

            let scope = format!("rule {symbol}");
            for branch in &accum.branches {
                Self::check_value_refs(&branch.output, &accum.names, &scope)?;
            }

            rules.insert(accum.symbol,
                         Rule { names:    accum.names,
                                branches: accum.branches, });
        }

        Ok(LSystem::new(Grammar::new(axiom, rules, self.skip)))
    }

    fn check_value_refs(outputs: &[OutputSymbol<S>],
                        names: &[String],
                        scope: &str)
                        -> Result<(), BuildError> {
        for out in outputs {
            for value in &out.values {
                if let ValueExpr::Named(name) = value {
                    if !names.contains(name) {
                        return Err(BuildError::UnresolvedVariable { scope: scope.to_string(),
                                                                    name:  name.clone(), });
                    }
                }
            }
        }
        Ok(())
    }

    fn fail(&mut self, error: BuildError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn open_branch(&mut self, condition: Option<Condition<S>>) {
        self.open_cond = condition;
        self.branch_out.clear();
        self.cursor = Cursor::Output;
    }

    fn close_branch(&mut self) {
        let branch = Branch { condition: self.open_cond.take(),
                              output:    std::mem::take(&mut self.branch_out), };
        if let Some(rule) = self.rules.last_mut() {
            rule.branches.push(branch);
        }
        self.cursor = Cursor::Rule;
    }

    fn close_scope(&mut self) {
        match self.cursor {
            Cursor::Condition => self.fail(BuildError::MisplacedCall { details:
                                               "condition leaves without an output".to_string(), }),
            Cursor::Output => self.close_branch(),
            Cursor::Idle | Cursor::Axiom | Cursor::Rule => {},
        }
        self.cursor = Cursor::Idle;
    }

    fn begin_condition(&mut self) {
        match self.cursor {
            Cursor::Condition => {},
            Cursor::Rule => {
                self.cond.reset();
                self.cursor = Cursor::Condition;
            },
            Cursor::Output => {
                self.close_branch();
                self.cond.reset();
                self.cursor = Cursor::Condition;
            },
            Cursor::Axiom | Cursor::Idle => {
                self.fail(BuildError::MisplacedCall { details:
                              "conditions are only valid inside a rule".to_string(), });
            },
        }
    }

    fn push_leaf(&mut self, leaf: Condition<S>) {
        self.begin_condition();
        if self.cursor == Cursor::Condition {
            self.cond.push(leaf);
        }
    }

    fn combinator(&mut self, or: bool) {
        if self.cursor == Cursor::Condition && self.cond.expr.is_some() {
            self.cond.pending_or = or;
        } else {
            self.fail(BuildError::MisplacedCall { details:
                          "a combinator needs a preceding condition leaf".to_string(), });
        }
    }

    fn attach_value(&mut self, value: ValueExpr<S>) {
        let target = match self.cursor {
            Cursor::Axiom => self.axiom.as_mut().and_then(|axiom| axiom.last_mut()),
            Cursor::Output => self.branch_out.last_mut(),
            _ => None,
        };
        match target {
            Some(out) => out.values.push(value),
            None => self.fail(BuildError::MisplacedCall { details:
                                  "a value expression needs a preceding out()".to_string(), }),
        }
    }
}

impl Builder<String> {
    /// Explodes the last output token into one single-character symbol per
    /// `char`. The token must carry no value expressions.
    ///
    /// # Example
    /// ```
    /// use lsystema::{engine::interpret, string_symbols};
    ///
    /// let ls = string_symbols().axiom().out("dog").exploding().build()?;
    ///
    /// assert_eq!(ls.rewrite(0, &mut interpret::joining_with("+"))?, "d+o+g");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    #[must_use]
    pub fn exploding(mut self) -> Self {
        self.explode_last(None);
        self
    }

    /// Explodes the last output token into the non-empty parts separated by
    /// `delimiter`. The token must carry no value expressions.
    #[must_use]
    pub fn exploding_by(mut self, delimiter: impl Into<String>) -> Self {
        self.explode_last(Some(delimiter.into()));
        self
    }

    fn explode_last(&mut self, delimiter: Option<String>) {
        if delimiter.as_deref() == Some("") {
            self.fail(BuildError::MalformedExploding { details: "empty delimiter".to_string() });
            return;
        }

        let outputs = match self.cursor {
            Cursor::Axiom => self.axiom.as_mut(),
            Cursor::Output => Some(&mut self.branch_out),
            _ => None,
        };

        let error = match outputs {
            None => Some("no output token to explode"),
            Some(outputs) => match outputs.pop() {
                None => Some("no output token to explode"),
                Some(last) if !last.values.is_empty() => {
                    outputs.push(last);
                    Some("an exploded token cannot carry value expressions")
                },
                Some(last) => {
                    let parts: Vec<String> = match &delimiter {
                        None => last.symbol.chars().map(String::from).collect(),
                        Some(delim) => last.symbol
                                           .split(delim.as_str())
                                           .filter(|part| !part.is_empty())
                                           .map(String::from)
                                           .collect(),
                    };
                    outputs.extend(parts.into_iter().map(OutputSymbol::new));
                    None
                },
            },
        };

        if let Some(details) = error {
            self.fail(BuildError::MalformedExploding { details: details.to_string() });
        }
    }
}
