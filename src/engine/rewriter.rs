use rand::{rngs::StdRng, SeedableRng};

use crate::{
    engine::{
        context::ContextView,
        grammar::{Branch, Grammar, OutputSymbol, Rule},
        interpret::Interpreter,
        state::{Occurrence, State},
        Symbol,
    },
    error::RewriteError,
};

/// A built, immutable L-system ready to be derived.
///
/// An `LSystem` wraps a validated [`Grammar`] and drives the
/// generation-by-generation derivation loop: every occurrence of generation
/// *g* is matched against a fixed view of *g* and rewritten into generation
/// *g + 1*, so selection for one occurrence never observes replacements
/// already produced for its neighbors within the same step. Only the
/// previous and the current generation are alive at any point; sequence
/// length can grow exponentially with the derivation count, so nothing older
/// is retained.
///
/// A system carries no call state: each `rewrite` invocation builds a fresh
/// generation chain, state, and random source, which makes a shared
/// `LSystem` safe to use from many threads at once.
#[derive(Debug, Clone)]
pub struct LSystem<S: Symbol> {
    grammar: Grammar<S>,
}

impl<S: Symbol> LSystem<S> {
    pub(crate) const fn new(grammar: Grammar<S>) -> Self {
        Self { grammar }
    }

    /// The grammar this system derives from.
    #[must_use]
    pub const fn grammar(&self) -> &Grammar<S> {
        &self.grammar
    }

    /// Performs `derivations` parallel rewriting steps starting from the
    /// axiom and hands the final generation to `interpreter`, returning its
    /// result. Zero derivations interpret the axiom generation itself.
    ///
    /// Probability leaves draw from an entropy-seeded, call-scoped random
    /// source; use [`LSystem::rewrite_seeded`] for reproducible stochastic
    /// derivations.
    ///
    /// # Errors
    /// Any failure raised by a predicate, a computed value expression, or
    /// the interpreter abandons the whole call with no partial result.
    pub fn rewrite<I>(&self,
                      derivations: usize,
                      interpreter: &mut I)
                      -> Result<I::Output, RewriteError>
        where I: Interpreter<S>
    {
        self.run(derivations, interpreter, StdRng::from_entropy())
    }

    /// Like [`LSystem::rewrite`], with the call-scoped random source seeded
    /// from `seed`. A fixed seed makes a stochastic derivation reproducible.
    ///
    /// # Errors
    /// Same failure modes as [`LSystem::rewrite`].
    pub fn rewrite_seeded<I>(&self,
                             derivations: usize,
                             interpreter: &mut I,
                             seed: u64)
                             -> Result<I::Output, RewriteError>
        where I: Interpreter<S>
    {
        self.run(derivations, interpreter, StdRng::seed_from_u64(seed))
    }

    fn run<I>(&self,
              derivations: usize,
              interpreter: &mut I,
              mut rng: StdRng)
              -> Result<I::Output, RewriteError>
        where I: Interpreter<S>
    {
        let mut state = State::new();

        // Generation zero is the axiom evaluated against the empty state.
        let mut generation = Self::emit(self.grammar.axiom(), &state)?;

        for _ in 0..derivations {
            generation = self.step(&generation, &mut state, &mut rng)?;
        }

        self.interpret_pass(&generation, interpreter, &mut state)
    }

    /// Rewrites one generation into the next against a fixed view of it.
    fn step(&self,
            previous: &[Occurrence<S>],
            state: &mut State<S>,
            rng: &mut StdRng)
            -> Result<Vec<Occurrence<S>>, RewriteError> {
        state.reset();
        let mut next = Vec::with_capacity(previous.len());

        for (index, occurrence) in previous.iter().enumerate() {
            let rule = self.grammar.rule(&occurrence.symbol);
            state.advance(occurrence.clone(), rule.map_or(&[], Rule::names));

            // A symbol without a rule is terminal and passes through with
            // its parameters intact.
            let Some(rule) = rule else {
                next.push(occurrence.clone());
                continue;
            };

            let context = ContextView::new(previous, index, self.grammar.skip_set());
            match Self::select(rule, state, &context, rng)? {
                Some(branch) => next.extend(Self::emit(&branch.output, state)?),
                // No branch matched and no fallback exists: identity copy,
                // not an error.
                None => next.push(occurrence.clone()),
            }
        }

        Ok(next)
    }

    /// Picks the first branch, in declaration order, whose condition holds.
    fn select<'a>(rule: &'a Rule<S>,
                  state: &State<S>,
                  context: &ContextView<'_, S>,
                  rng: &mut StdRng)
                  -> Result<Option<&'a Branch<S>>, RewriteError> {
        for branch in rule.branches() {
            match branch.condition() {
                None => return Ok(Some(branch)),
                Some(condition) => {
                    if condition.holds(state, context, rng)? {
                        return Ok(Some(branch));
                    }
                },
            }
        }
        Ok(None)
    }

    /// Instantiates an output specification against the firing occurrence's
    /// state, evaluating value expressions in declared left-to-right order.
    fn emit(outputs: &[OutputSymbol<S>],
            state: &State<S>)
            -> Result<Vec<Occurrence<S>>, RewriteError> {
        let mut occurrences = Vec::with_capacity(outputs.len());
        for out in outputs {
            let mut params = Vec::with_capacity(out.values().len());
            for value in out.values() {
                params.push(value.eval(state)?);
            }
            occurrences.push(Occurrence::new(out.symbol().clone(), params));
        }
        Ok(occurrences)
    }

    /// Walks the final generation through the interpreter protocol: `before`
    /// once with seq zero and no current symbol, `interpret` once per
    /// occurrence in order, `after` once with seq equal to the generation
    /// length, then the interpreter's result.
    fn interpret_pass<I>(&self,
                         generation: &[Occurrence<S>],
                         interpreter: &mut I,
                         state: &mut State<S>)
                         -> Result<I::Output, RewriteError>
        where I: Interpreter<S>
    {
        state.reset();
        interpreter.before(state)?;

        for occurrence in generation {
            let names = self.grammar
                            .rule(&occurrence.symbol)
                            .map_or(&[] as &[String], Rule::names);
            state.advance(occurrence.clone(), names);
            interpreter.interpret(state)?;
        }

        state.clear_current();
        interpreter.after(state)?;
        Ok(interpreter.result())
    }
}
