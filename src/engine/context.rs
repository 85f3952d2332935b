use std::collections::HashSet;

use crate::engine::{state::Occurrence, Symbol};

/// A read-only view of one position within a fixed generation, used for
/// context-sensitive branch selection.
///
/// Neighbors are resolved against the unmutated previous generation, so
/// context matching for one occurrence never observes replacements already
/// produced for its neighbors in the same derivation step. Skip-set members
/// are elided transparently: they are removed from the neighbor sequence
/// rather than treated as wildcards, preserving contiguity of the remaining
/// meaningful neighbors.
#[derive(Debug, Clone, Copy)]
pub struct ContextView<'a, S> {
    generation: &'a [Occurrence<S>],
    index:      usize,
    skip:       &'a HashSet<S>,
}

impl<'a, S: Symbol> ContextView<'a, S> {
    pub(crate) const fn new(generation: &'a [Occurrence<S>],
                            index: usize,
                            skip: &'a HashSet<S>)
                            -> Self {
        Self { generation,
               index,
               skip }
    }

    /// Returns the `distance`-th meaningful neighbor to the left (1-based),
    /// or `None` if the filtered left context is shorter than `distance`.
    #[must_use]
    pub fn left(&self, distance: usize) -> Option<&'a S> {
        self.nth_meaningful(self.generation[..self.index].iter().rev(), distance)
    }

    /// Returns the `distance`-th meaningful neighbor to the right (1-based),
    /// or `None` if the filtered right context is shorter than `distance`.
    #[must_use]
    pub fn right(&self, distance: usize) -> Option<&'a S> {
        self.nth_meaningful(self.generation[self.index + 1..].iter(), distance)
    }

    /// Returns `true` if the left context equals `symbols`, nearest neighbor
    /// first. An empty sequence matches vacuously.
    #[must_use]
    pub fn matches_left(&self, symbols: &[S]) -> bool {
        symbols.iter()
               .enumerate()
               .all(|(i, symbol)| self.left(i + 1) == Some(symbol))
    }

    /// Returns `true` if the right context equals `symbols`, nearest
    /// neighbor first. An empty sequence matches vacuously.
    #[must_use]
    pub fn matches_right(&self, symbols: &[S]) -> bool {
        symbols.iter()
               .enumerate()
               .all(|(i, symbol)| self.right(i + 1) == Some(symbol))
    }

    fn nth_meaningful(&self,
                      occurrences: impl Iterator<Item = &'a Occurrence<S>>,
                      distance: usize)
                      -> Option<&'a S> {
        occurrences.map(|occ| &occ.symbol)
                   .filter(|symbol| !self.skip.contains(symbol))
                   .nth(distance.checked_sub(1)?)
    }
}
