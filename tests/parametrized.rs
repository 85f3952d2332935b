use std::fmt::Write as _;

use lsystema::{
    engine::{interpret::Interpreter, rewriter::LSystem, state::State, value::Var},
    error::RewriteError,
    string_symbols,
};

/// Formats every occurrence as `sym` or `sym(v1,v2,...)`, space separated.
#[derive(Default)]
struct Trace {
    buffer: String,
}

impl Interpreter<String> for Trace {
    type Output = String;

    fn before(&mut self, _state: &mut State<String>) -> Result<(), RewriteError> {
        self.buffer.clear();
        Ok(())
    }

    fn interpret(&mut self, state: &mut State<String>) -> Result<(), RewriteError> {
        if !self.buffer.is_empty() {
            self.buffer.push(' ');
        }
        if let Some(symbol) = state.sym() {
            self.buffer.push_str(symbol);
        }
        let params = state.params();
        if !params.is_empty() {
            self.buffer.push('(');
            for (i, param) in params.iter().enumerate() {
                if i > 0 {
                    self.buffer.push(',');
                }
                let _ = write!(self.buffer, "{param}");
            }
            self.buffer.push(')');
        }
        Ok(())
    }

    fn result(&mut self) -> String {
        self.buffer.clone()
    }
}

/// A(x, y): y <= 3 -> A(2x, x + y), otherwise -> B(x) A(x / y, 0).
/// B(x): x >= 1 -> B(x - 1), otherwise -> C.
/// Axiom: B(2) A(4, 4).
fn parametrized() -> LSystem<String> {
    string_symbols()
        .rule("A").def(["x", "y"])
            .when(|s| s.var("y")?.less_than_or_equal(&Var::from(3)))
                .out("A")
                    .fun(|s| Ok(Var::from(s.var("x")?.as_int()? * 2)))
                    .fun(|s| Ok(Var::from(s.var("x")?.as_int()? + s.var("y")?.as_int()?)))
            .otherwise()
                .out("B").var("x")
                .out("A")
                    .fun(|s| Ok(Var::from(s.var("x")?.as_int()? / s.var("y")?.as_int()?)))
                    .val(0)
        .rule("B").def(["x"])
            .when(|s| s.var("x")?.greater_than_or_equal(&Var::from(1)))
                .out("B").fun(|s| Ok(Var::from(s.var("x")?.as_int()? - 1)))
            .otherwise()
                .out("C")
        .axiom()
            .out("B").val(2)
            .out("A").val(4).val(4)
        .build()
        .expect("parametrized system must build")
}

#[test]
fn golden_trace() {
    let ls = parametrized();

    let generations = ["B(2) A(4,4)",
                       "B(1) B(4) A(1,0)",
                       "B(0) B(3) A(2,1)",
                       "C B(2) A(4,3)",
                       "C B(1) A(8,7)",
                       "C B(0) B(8) A(1,0)",
                       "C C B(7) A(2,1)",
                       "C C B(6) A(4,3)",
                       "C C B(5) A(8,7)",
                       "C C B(4) B(8) A(1,0)",
                       "C C B(3) B(7) A(2,1)"];

    let mut trace = Trace::default();
    for (i, expected) in generations.iter().enumerate() {
        assert_eq!(ls.rewrite(i, &mut trace).unwrap(), *expected, "generation {i}");
    }
}

#[test]
fn terminal_symbols_keep_parameters() {
    // "T" has no rule, so its values ride along unchanged.
    let ls = string_symbols().rule("a").out("a")
                             .axiom().out("T").val(7).val(true).out("a")
                             .build()
                             .unwrap();

    let mut trace = Trace::default();
    assert_eq!(ls.rewrite(5, &mut trace).unwrap(), "T(7,true) a");
}

#[test]
fn interpretation_binds_declared_names() {
    let ls = string_symbols().rule("P").def(["n"])
                             .out("P").fun(|s| Ok(Var::from(s.var("n")?.as_int()? + 1)))
                             .axiom().out("P").val(0)
                             .build()
                             .unwrap();

    /// Reads the declared variable of every interpreted occurrence.
    #[derive(Default)]
    struct Reader {
        seen: Vec<i64>,
    }

    impl Interpreter<String> for Reader {
        type Output = Vec<i64>;

        fn before(&mut self, _state: &mut State<String>) -> Result<(), RewriteError> {
            self.seen.clear();
            Ok(())
        }

        fn interpret(&mut self, state: &mut State<String>) -> Result<(), RewriteError> {
            self.seen.push(state.var("n")?.as_int()?);
            Ok(())
        }

        fn result(&mut self) -> Vec<i64> {
            self.seen.clone()
        }
    }

    let mut reader = Reader::default();
    assert_eq!(ls.rewrite(3, &mut reader).unwrap(), vec![3]);
}

#[test]
fn cross_tag_comparison_is_reported() {
    let ls = string_symbols().rule("A").def(["x"])
                             .when(|s| s.var("x")?.less_than(&Var::from(true)))
                             .out("B")
                             .axiom().out("A").val(1)
                             .build()
                             .unwrap();

    let err = ls.rewrite(1, &mut lsystema::engine::interpret::joining()).unwrap_err();
    assert!(matches!(err, RewriteError::TypeMismatch { .. }), "{err}");
}

#[test]
fn predicate_failures_abandon_the_call() {
    let ls = string_symbols().rule("a")
                             .when(|_| Err(RewriteError::Custom { details: "boom".to_string() }))
                             .out("b")
                             .axiom().out("a")
                             .build()
                             .unwrap();

    // Zero derivations never evaluate the predicate.
    let mut joined = lsystema::engine::interpret::joining();
    assert_eq!(ls.rewrite(0, &mut joined).unwrap(), "a");

    let err = ls.rewrite(1, &mut joined).unwrap_err();
    assert_eq!(err, RewriteError::Custom { details: "boom".to_string() });
}
