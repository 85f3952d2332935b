use std::{
    fmt::{Display, Write as _},
    io::{self, Write},
};

use crate::{
    engine::{state::State, Symbol},
    error::RewriteError,
};

/// An object that consumes the final generation of a rewrite call.
///
/// The engine treats an interpreter purely as three callbacks plus a result
/// accessor: `before` is invoked exactly once per rewrite call with sequence
/// zero and no current symbol, `interpret` once per occurrence of the final
/// generation in order, and `after` once with the sequence equal to the
/// generation length. Interpreters own their accumulator explicitly: reset
/// it in `before`, finalize it in `after` or `result`.
pub trait Interpreter<S: Symbol> {
    /// The type of the interpretation result.
    type Output;

    /// Invoked before the final generation is walked.
    ///
    /// # Errors
    /// A failure here abandons the whole rewrite call.
    fn before(&mut self, _state: &mut State<S>) -> Result<(), RewriteError> {
        Ok(())
    }

    /// Invoked for each occurrence of the final generation, in order.
    ///
    /// # Errors
    /// A failure here abandons the whole rewrite call.
    fn interpret(&mut self, state: &mut State<S>) -> Result<(), RewriteError>;

    /// Invoked after the final generation is walked, even if it was empty.
    ///
    /// # Errors
    /// A failure here abandons the whole rewrite call.
    fn after(&mut self, _state: &mut State<S>) -> Result<(), RewriteError> {
        Ok(())
    }

    /// Returns the result of interpretation.
    fn result(&mut self) -> Self::Output;

    /// Combines this interpreter with another one.
    ///
    /// The combined interpreter forwards `before`, `interpret`, and `after`
    /// to this interpreter first and then to `other`, for every call, but
    /// its result is always this interpreter's result; `other` is a
    /// side-effecting passenger.
    fn and_then<J>(self, other: J) -> AndThen<Self, J>
        where Self: Sized,
              J: Interpreter<S>
    {
        AndThen { first:  self,
                  second: other, }
    }
}

/// The combined interpreter produced by [`Interpreter::and_then`].
#[derive(Debug, Clone)]
pub struct AndThen<A, B> {
    first:  A,
    second: B,
}

impl<S, A, B> Interpreter<S> for AndThen<A, B>
    where S: Symbol,
          A: Interpreter<S>,
          B: Interpreter<S>
{
    type Output = A::Output;

    fn before(&mut self, state: &mut State<S>) -> Result<(), RewriteError> {
        self.first.before(state)?;
        self.second.before(state)
    }

    fn interpret(&mut self, state: &mut State<S>) -> Result<(), RewriteError> {
        self.first.interpret(state)?;
        self.second.interpret(state)
    }

    fn after(&mut self, state: &mut State<S>) -> Result<(), RewriteError> {
        self.first.after(state)?;
        self.second.after(state)
    }

    fn result(&mut self) -> Self::Output {
        self.first.result()
    }
}

/// Counts the occurrences of the final generation. See [`counting`].
#[derive(Debug, Clone, Default)]
pub struct Counting {
    count: u64,
}

impl<S: Symbol> Interpreter<S> for Counting {
    type Output = u64;

    fn before(&mut self, _state: &mut State<S>) -> Result<(), RewriteError> {
        self.count = 0;
        Ok(())
    }

    fn interpret(&mut self, _state: &mut State<S>) -> Result<(), RewriteError> {
        self.count += 1;
        Ok(())
    }

    fn result(&mut self) -> u64 {
        self.count
    }
}

/// Creates a simple interpreter that counts up incoming symbols.
#[must_use]
pub fn counting() -> Counting {
    Counting::default()
}

/// Joins the final generation's symbols into a string. See [`joining`].
#[derive(Debug, Clone, Default)]
pub struct Joining {
    separator: Option<String>,
    buffer:    String,
}

impl<S: Symbol + Display> Interpreter<S> for Joining {
    type Output = String;

    fn before(&mut self, _state: &mut State<S>) -> Result<(), RewriteError> {
        self.buffer.clear();
        Ok(())
    }

    fn interpret(&mut self, state: &mut State<S>) -> Result<(), RewriteError> {
        if let Some(symbol) = state.sym() {
            if let Some(separator) = &self.separator {
                if !self.buffer.is_empty() {
                    self.buffer.push_str(separator);
                }
            }
            let _ = write!(self.buffer, "{symbol}");
        }
        Ok(())
    }

    fn result(&mut self) -> String {
        self.buffer.clone()
    }
}

/// Creates a simple interpreter that joins incoming symbols into a string.
#[must_use]
pub fn joining() -> Joining {
    Joining::default()
}

/// Creates a simple interpreter that joins incoming symbols into a string,
/// separating them with `separator`.
#[must_use]
pub fn joining_with(separator: impl Into<String>) -> Joining {
    Joining { separator: Some(separator.into()),
              buffer:    String::new(), }
}

/// Writes the final generation's symbols to an output stream, followed by a
/// newline. See [`printing`] and [`printing_to`].
#[derive(Debug)]
pub struct Printing<W: Write> {
    out: W,
}

impl<S: Symbol + Display, W: Write> Interpreter<S> for Printing<W> {
    type Output = ();

    fn interpret(&mut self, state: &mut State<S>) -> Result<(), RewriteError> {
        if let Some(symbol) = state.sym() {
            write!(self.out, "{symbol}").map_err(io_error)?;
        }
        Ok(())
    }

    fn after(&mut self, _state: &mut State<S>) -> Result<(), RewriteError> {
        writeln!(self.out).map_err(io_error)
    }

    fn result(&mut self) -> Self::Output {}
}

/// Creates a simple interpreter that sends incoming symbols to standard
/// output.
#[must_use]
pub fn printing() -> Printing<io::Stdout> {
    Printing { out: io::stdout() }
}

/// Creates a simple interpreter that sends incoming symbols to a given
/// stream.
pub fn printing_to<W: Write>(out: W) -> Printing<W> {
    Printing { out }
}

fn io_error(e: io::Error) -> RewriteError {
    RewriteError::Custom { details: e.to_string() }
}
