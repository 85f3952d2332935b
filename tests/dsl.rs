use lsystema::{
    engine::{interpret, interpret::Interpreter, state::State},
    error::{BuildError, RewriteError},
    string_symbols,
};

#[test]
fn exploding_into_characters() {
    let ls = string_symbols().axiom().out("dog").exploding()
                             .build()
                             .unwrap();

    assert_eq!(ls.rewrite(0, &mut interpret::joining_with("+")).unwrap(), "d+o+g");
    assert_eq!(ls.rewrite(0, &mut interpret::counting()).unwrap(), 3);
}

#[test]
fn exploding_by_delimiter() {
    let ls = string_symbols().axiom().out("a-b-c").exploding_by("-")
                             .build()
                             .unwrap();

    assert_eq!(ls.rewrite(0, &mut interpret::joining_with("+")).unwrap(), "a+b+c");
}

#[test]
fn exploding_rejects_parametrized_tokens() {
    let err = string_symbols().axiom().out("dog").val(1).exploding()
                              .build()
                              .unwrap_err();
    assert!(matches!(err, BuildError::MalformedExploding { .. }), "{err}");
}

#[test]
fn exploding_needs_an_output_token() {
    let err = string_symbols().axiom().exploding().build().unwrap_err();
    assert!(matches!(err, BuildError::MalformedExploding { .. }), "{err}");
}

#[test]
fn exploding_rejects_empty_delimiter() {
    let err = string_symbols().axiom().out("ab").exploding_by("")
                              .build()
                              .unwrap_err();
    assert!(matches!(err, BuildError::MalformedExploding { .. }), "{err}");
}

#[test]
fn precedes_matches_the_left_context() {
    let ls = string_symbols().rule("b").precedes(["a"]).out("c")
                             .axiom().out("a").out("b")
                             .build()
                             .unwrap();

    assert_eq!(ls.rewrite(1, &mut interpret::joining()).unwrap(), "ac");
}

#[test]
fn follows_matches_the_right_context() {
    let ls = string_symbols().rule("b").follows(["a"]).out("c")
                             .axiom().out("b").out("a")
                             .build()
                             .unwrap();

    assert_eq!(ls.rewrite(1, &mut interpret::joining()).unwrap(), "ca");
}

#[test]
fn context_matches_nearest_first_at_distance() {
    let ls = string_symbols().rule("A").precedes(["y", "x"]).out("M")
                             .axiom().out("x").out("y").out("A")
                             .build()
                             .unwrap();

    assert_eq!(ls.rewrite(1, &mut interpret::joining()).unwrap(), "xyM");
}

#[test]
fn skip_set_members_are_elided_from_context() {
    // Without skipping, "+" breaks the neighborhood.
    let opaque = string_symbols().rule("b").precedes(["a"]).out("c")
                                 .axiom().out("a").out("+").out("b")
                                 .build()
                                 .unwrap();
    assert_eq!(opaque.rewrite(1, &mut interpret::joining()).unwrap(), "a+b");

    // With skipping, "a" and "b" are contiguous again.
    let skipped = string_symbols().rule("b").precedes(["a"]).out("c")
                                  .skipping(["+"])
                                  .axiom().out("a").out("+").out("b")
                                  .build()
                                  .unwrap();
    assert_eq!(skipped.rewrite(1, &mut interpret::joining()).unwrap(), "a+c");
}

#[test]
fn consecutive_leaves_combine_with_and() {
    let build = |middle: &str| {
        string_symbols().rule("x").precedes(["a"]).follows(["b"]).out("m")
                        .axiom().out("a").out(middle).out("b")
                        .build()
                        .unwrap()
    };

    // Both contexts hold around "x".
    assert_eq!(build("x").rewrite(1, &mut interpret::joining()).unwrap(), "amb");
    // An unrelated middle symbol stays untouched.
    assert_eq!(build("q").rewrite(1, &mut interpret::joining()).unwrap(), "aqb");
}

#[test]
fn or_combines_the_next_leaf() {
    // The left context never matches, but the right one does.
    let ls = string_symbols().rule("x").precedes(["q"]).or().follows(["b"]).out("m")
                             .axiom().out("a").out("x").out("b")
                             .build()
                             .unwrap();

    assert_eq!(ls.rewrite(1, &mut interpret::joining()).unwrap(), "amb");
}

#[test]
fn not_negates_the_next_leaf() {
    let build = |left: &str| {
        string_symbols().rule("x").not().precedes(["a"]).out("m")
                        .axiom().out(left).out("x")
                        .build()
                        .unwrap()
    };

    assert_eq!(build("a").rewrite(1, &mut interpret::joining()).unwrap(), "ax");
    assert_eq!(build("b").rewrite(1, &mut interpret::joining()).unwrap(), "bm");
}

#[test]
fn first_matching_branch_wins() {
    let ls = string_symbols().rule("a")
                             .when(|_| Ok(true)).out("x")
                             .when(|_| Ok(true)).out("y")
                             .axiom().out("a")
                             .build()
                             .unwrap();

    assert_eq!(ls.rewrite(1, &mut interpret::joining()).unwrap(), "x");
}

#[test]
fn no_match_without_fallback_is_identity() {
    let ls = string_symbols().rule("a").when(|_| Ok(false)).out("x")
                             .axiom().out("a")
                             .build()
                             .unwrap();

    assert_eq!(ls.rewrite(4, &mut interpret::joining()).unwrap(), "a");
}

#[test]
fn empty_output_erases_the_symbol() {
    let ls = string_symbols().rule("a").otherwise()
                             .axiom().out("b").out("a")
                             .build()
                             .unwrap();

    assert_eq!(ls.rewrite(1, &mut interpret::joining()).unwrap(), "b");
    assert_eq!(ls.rewrite(1, &mut interpret::counting()).unwrap(), 1);
}

#[test]
fn seeded_derivations_are_reproducible() {
    let coin = || {
        string_symbols().rule("F")
                        .probably(0.5).out("F").out("L")
                        .otherwise().out("F").out("R")
                        .axiom().out("F")
                        .build()
                        .unwrap()
    };

    let ls = coin();
    let mut joined = interpret::joining();
    let first = ls.rewrite_seeded(10, &mut joined, 42).unwrap();
    let second = ls.rewrite_seeded(10, &mut joined, 42).unwrap();
    assert_eq!(first, second);

    // A fresh system with the same seed derives the same word.
    assert_eq!(coin().rewrite_seeded(10, &mut joined, 42).unwrap(), first);

    // Different seeds must eventually disagree over ten coin flips each.
    let words: Vec<String> = (0..20).map(|seed| {
                                        ls.rewrite_seeded(10, &mut interpret::joining(), seed)
                                          .unwrap()
                                    })
                                    .collect();
    assert!(words.iter().any(|word| *word != words[0]));
}

#[test]
fn probability_bounds_are_validated() {
    for p in [0.0, 1.0, -0.5, 1.5, f64::NAN] {
        let err = string_symbols().rule("a").probably(p).out("b")
                                  .axiom().out("a")
                                  .build()
                                  .unwrap_err();
        assert!(matches!(err, BuildError::ProbabilityOutOfRange { .. }), "{p}");
    }
}

#[test]
fn misplaced_fallback_is_rejected() {
    let err = string_symbols().rule("a").out("x")
                              .when(|_| Ok(true)).out("y")
                              .axiom().out("a")
                              .build()
                              .unwrap_err();
    assert_eq!(err, BuildError::MisplacedFallback { symbol: "\"a\"".to_string() });
}

#[test]
fn duplicate_fallback_is_rejected() {
    let err = string_symbols().rule("a").otherwise().out("x").otherwise().out("y")
                              .axiom().out("a")
                              .build()
                              .unwrap_err();
    assert_eq!(err, BuildError::DuplicateFallback { symbol: "\"a\"".to_string() });
}

#[test]
fn duplicate_rules_are_rejected() {
    let err = string_symbols().rule("a").out("x")
                              .rule("a").out("y")
                              .axiom().out("a")
                              .build()
                              .unwrap_err();
    assert!(matches!(err, BuildError::DuplicateRule { .. }), "{err}");
}

#[test]
fn unresolved_variable_references_fail_at_build() {
    let err = string_symbols().rule("a").out("b").var("z")
                              .axiom().out("a")
                              .build()
                              .unwrap_err();
    assert_eq!(err,
               BuildError::UnresolvedVariable { scope: "rule \"a\"".to_string(),
                                                name:  "z".to_string(), });

    // The axiom declares no variables at all.
    let err = string_symbols().axiom().out("b").var("z").build().unwrap_err();
    assert_eq!(err,
               BuildError::UnresolvedVariable { scope: "the axiom".to_string(),
                                                name:  "z".to_string(), });
}

#[test]
fn missing_axiom_is_rejected() {
    let err = string_symbols().rule("a").out("b").build().unwrap_err();
    assert_eq!(err, BuildError::MissingAxiom);
}

#[test]
fn dangling_combinators_are_rejected() {
    let err = string_symbols().rule("a").or().out("b")
                              .axiom().out("a")
                              .build()
                              .unwrap_err();
    assert!(matches!(err, BuildError::MisplacedCall { .. }), "{err}");

    let err = string_symbols().rule("a").precedes(["b"]).or().out("x")
                              .axiom().out("a")
                              .build()
                              .unwrap_err();
    assert!(matches!(err, BuildError::MisplacedCall { .. }), "{err}");
}

#[test]
fn and_then_returns_the_left_result() {
    let ls = string_symbols().rule("a").out("a").out("b")
                             .rule("b").out("a")
                             .axiom().out("a")
                             .build()
                             .unwrap();

    let mut combined =
        Interpreter::<String>::and_then(interpret::counting(), interpret::joining());
    assert_eq!(ls.rewrite(4, &mut combined).unwrap(), 8);

    let mut flipped =
        Interpreter::<String>::and_then(interpret::joining(), interpret::counting());
    assert_eq!(ls.rewrite(4, &mut flipped).unwrap(), "abaababa");
}

#[test]
fn interpreter_protocol_runs_once_per_call() {
    /// Records the seq values each hook observes.
    #[derive(Default)]
    struct Protocol {
        before: Vec<usize>,
        seqs:   Vec<usize>,
        after:  Vec<usize>,
    }

    impl Interpreter<String> for Protocol {
        type Output = ();

        fn before(&mut self, state: &mut State<String>) -> Result<(), RewriteError> {
            assert!(state.sym().is_none());
            self.before.push(state.seq());
            Ok(())
        }

        fn interpret(&mut self, state: &mut State<String>) -> Result<(), RewriteError> {
            self.seqs.push(state.seq());
            Ok(())
        }

        fn after(&mut self, state: &mut State<String>) -> Result<(), RewriteError> {
            assert!(state.sym().is_none());
            self.after.push(state.seq());
            Ok(())
        }

        fn result(&mut self) -> Self::Output {}
    }

    let ls = string_symbols().rule("a").out("a").out("b")
                             .rule("b").out("a")
                             .axiom().out("a")
                             .build()
                             .unwrap();

    let mut protocol = Protocol::default();
    ls.rewrite(3, &mut protocol).unwrap();

    // Generation three of algae is "abaab".
    assert_eq!(protocol.before, vec![0]);
    assert_eq!(protocol.seqs, vec![1, 2, 3, 4, 5]);
    assert_eq!(protocol.after, vec![5]);
}
