//! # lsystema
//!
//! lsystema is a Lindenmayer system (L-system) engine written in Rust.
//! It derives symbol sequences generation by generation through parallel
//! rewriting, with support for context-sensitive matching, parametrized
//! symbols, and stochastic or conditional branch selection. Grammars are
//! assembled through a fluent builder and consumed through a pluggable
//! interpreter protocol.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::engine::{builder::Builder, Symbol};

/// Orchestrates grammar construction, derivation, and interpretation.
///
/// This module ties together the grammar model, the fluent builder, the
/// context resolver, the rewrite engine, the interpretation protocol, and
/// the tagged value model to provide a complete L-system runtime. It exposes
/// the types client code interacts with after obtaining a builder.
///
/// # Responsibilities
/// - Coordinates all core components: builder, grammar, rewriter, state,
///   interpreters, and values.
/// - Provides the derivation entry points on the built system.
/// - Manages the flow of data and errors between construction and rewriting.
pub mod engine;
/// Provides unified error types for construction and rewriting.
///
/// This module defines all errors that can be raised while a grammar is
/// being built or while a derivation runs. It standardizes error reporting
/// and carries detailed information about failures.
///
/// # Responsibilities
/// - Defines error enums for both failure phases (build, rewrite).
/// - Attaches offending names, symbols, and values for context.
/// - Supports integration with standard error handling traits.
pub mod error;
/// General utilities for safe numeric conversion.
///
/// This module provides conversion routines shared across the engine, such
/// as lossless widening of integers to floating-point values.
///
/// # Responsibilities
/// - Safely convert between `i64` and `f64` without silent data loss.
pub mod util;

/// Returns a builder for L-systems over string symbols.
///
/// The string front end accepts `&str` literals everywhere a symbol is
/// expected and additionally supports exploding monolithic tokens into
/// separate symbols.
///
/// # Examples
/// ```
/// use lsystema::{engine::interpret, string_symbols};
///
/// // The classic algae system: a -> ab, b -> a.
/// let ls = string_symbols().rule("a").out("a").out("b")
///                          .rule("b").out("a")
///                          .axiom().out("a")
///                          .build()?;
///
/// let mut joined = interpret::joining();
/// assert_eq!(ls.rewrite(0, &mut joined)?, "a");
/// assert_eq!(ls.rewrite(4, &mut joined)?, "abaababa");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn string_symbols() -> Builder<String> {
    Builder::new()
}

/// Returns a builder for L-systems over integer symbols.
///
/// # Examples
/// ```
/// use lsystema::{engine::interpret, int_symbols};
///
/// // The Fibonacci word: 0 -> 1, 1 -> 01.
/// let ls = int_symbols().rule(0).out(1)
///                       .rule(1).out(0).out(1)
///                       .axiom().out(0)
///                       .build()?;
///
/// assert_eq!(ls.rewrite(7, &mut interpret::counting())?, 21);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn int_symbols() -> Builder<i64> {
    Builder::new()
}

/// Returns a builder for L-systems over an arbitrary symbol type.
///
/// Any cloneable, equatable, hashable type works as an alphabet; the string
/// and integer front ends are thin conveniences over this one.
#[must_use]
pub fn generic_symbols<S: Symbol>() -> Builder<S> {
    Builder::new()
}
