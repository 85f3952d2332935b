use lsystema::{
    engine::{interpret, rewriter::LSystem},
    int_symbols, string_symbols,
};

fn algae() -> LSystem<String> {
    string_symbols().rule("a").out("a").out("b")
                    .rule("b").out("a")
                    .axiom().out("a")
                    .build()
                    .expect("algae must build")
}

#[test]
fn algae_words() {
    let ls = algae();
    let words = ["a", "ab", "aba", "abaab", "abaababa"];

    let mut joined = interpret::joining();
    for (i, word) in words.iter().enumerate() {
        assert_eq!(ls.rewrite(i, &mut joined).unwrap(), *word);
    }
}

#[test]
fn fibonacci_counts() {
    let ls = int_symbols().rule(0).out(1)
                          .rule(1).out(0).out(1)
                          .axiom().out(0)
                          .build()
                          .unwrap();

    let series: [u64; 16] = [1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, 233, 377, 610, 987];
    let mut counting = interpret::counting();
    for (i, expected) in series.iter().enumerate() {
        assert_eq!(ls.rewrite(i, &mut counting).unwrap(), *expected);
    }
}

#[test]
fn derivations_are_deterministic_without_probability() {
    let ls = algae();

    let mut joined = interpret::joining();
    let first = ls.rewrite(9, &mut joined).unwrap();
    let second = ls.rewrite(9, &mut joined).unwrap();
    assert_eq!(first, second);
}

#[test]
fn terminal_symbols_pass_through() {
    // Neither "x" nor "y" has a rule; every generation is the axiom.
    let ls = string_symbols().rule("a").out("a")
                             .axiom().out("x").out("a").out("y")
                             .build()
                             .unwrap();

    let mut joined = interpret::joining();
    assert_eq!(ls.rewrite(6, &mut joined).unwrap(), "xay");
}
