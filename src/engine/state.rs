use std::collections::HashMap;

use crate::{
    engine::{value::Var, Symbol},
    error::RewriteError,
};

/// A parametrized symbol instance within a generation.
///
/// An occurrence pairs an alphabet symbol with the ordered variable values it
/// carries. The values are positionally bound to the declared variable names
/// of the symbol's rule when the occurrence later fires; if the symbol has no
/// rule, or the rule declares no names, the values ride along opaquely.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence<S> {
    /// The alphabet symbol.
    pub symbol: S,
    /// The bound variable values, in declaration order.
    pub params: Vec<Var>,
}

impl<S> Occurrence<S> {
    /// Creates an occurrence carrying the given values.
    pub const fn new(symbol: S, params: Vec<Var>) -> Self {
        Self { symbol, params }
    }

    /// Creates an occurrence carrying no values.
    pub const fn plain(symbol: S) -> Self {
        Self { symbol,
               params: Vec::new() }
    }
}

/// Holds the observable state of an executing rewrite pass.
///
/// A `State` is created fresh for every `rewrite` call and is exposed to
/// caller-supplied predicates, computed value functions, and interpreters. It
/// tracks the pass-local sequence counter, the occurrence currently being
/// processed, and that occurrence's variable bindings by name.
///
/// # Responsibilities
/// - Exposes the current symbol and its bound values to callbacks.
/// - Resolves variable names against the firing occurrence's bindings.
/// - Provides scratch storage via `set` for interpreter bookkeeping.
#[derive(Debug, Clone)]
pub struct State<S> {
    seq:     usize,
    current: Option<Occurrence<S>>,
    vars:    HashMap<String, Var>,
}

impl<S: Symbol> State<S> {
    pub(crate) fn new() -> Self {
        Self { seq:     0,
               current: None,
               vars:    HashMap::new(), }
    }

    /// Returns the number of occurrences visited so far in the current pass.
    ///
    /// The counter is zero before the first occurrence of a pass, `k` while
    /// the k-th occurrence (1-based) is being processed, and equal to the
    /// generation length once the pass is complete.
    #[must_use]
    pub const fn seq(&self) -> usize {
        self.seq
    }

    /// Returns the symbol currently being processed, if any.
    ///
    /// `None` only outside occurrence processing, i.e. in an interpreter's
    /// `before` and `after` hooks.
    #[must_use]
    pub fn sym(&self) -> Option<&S> {
        self.current.as_ref().map(|occ| &occ.symbol)
    }

    /// Returns `true` if the symbol currently being processed equals the
    /// given one.
    #[must_use]
    pub fn is(&self, symbol: &S) -> bool {
        self.sym() == Some(symbol)
    }

    /// Returns the raw values carried by the current occurrence, in order.
    ///
    /// Useful for symbols whose values ride along without declared names.
    #[must_use]
    pub fn params(&self) -> &[Var] {
        self.current.as_ref().map_or(&[], |occ| occ.params.as_slice())
    }

    /// Retrieves a variable bound for the current occurrence by name.
    ///
    /// # Errors
    /// Returns `UnknownVariable` if the current occurrence does not bind a
    /// variable of that name.
    pub fn var(&self, name: &str) -> Result<Var, RewriteError> {
        self.vars
            .get(name)
            .cloned()
            .ok_or_else(|| RewriteError::UnknownVariable { name: name.to_string() })
    }

    /// Binds a value to a name in the current occurrence's scope.
    ///
    /// Bindings made this way live until the next occurrence is entered; they
    /// are scratch storage for the callback that created them.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Var>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Restarts the pass: seq back to zero, no current occurrence.
    pub(crate) fn reset(&mut self) {
        self.seq = 0;
        self.current = None;
        self.vars.clear();
    }

    /// Enters the next occurrence of the pass, binding its values to the
    /// given declared names positionally. Surplus values stay reachable
    /// through `params`; surplus names stay unbound.
    pub(crate) fn advance(&mut self, occurrence: Occurrence<S>, names: &[String]) {
        self.seq += 1;
        self.vars.clear();
        for (name, value) in names.iter().zip(occurrence.params.iter()) {
            self.vars.insert(name.clone(), value.clone());
        }
        self.current = Some(occurrence);
    }

    /// Leaves occurrence processing without touching the seq counter.
    pub(crate) fn clear_current(&mut self) {
        self.current = None;
        self.vars.clear();
    }
}
