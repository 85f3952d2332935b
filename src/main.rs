use std::fmt::Display;

use clap::Parser;
use lsystema::{
    engine::{interpret, rewriter::LSystem, Symbol},
    error::BuildError,
    int_symbols, string_symbols,
};

/// lsystema derives one of the bundled classic L-systems and prints the
/// resulting word.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The bundled system to derive: algae, fibonacci, or coin.
    system: String,

    /// The number of derivation steps to perform.
    derivations: usize,

    /// Separator inserted between the symbols of the printed word.
    #[arg(short, long)]
    separator: Option<String>,

    /// Seed for the call-scoped random source, making stochastic systems
    /// reproducible.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    let args = Args::parse();

    match run(&args) {
        Ok(word) => println!("{word}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}

fn run(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    match args.system.as_str() {
        "algae" => derive(&algae()?, args),
        "fibonacci" => derive(&fibonacci()?, args),
        "coin" => derive(&coin()?, args),
        other => {
            Err(format!("Unknown system '{other}'. Available: algae, fibonacci, coin.").into())
        },
    }
}

fn derive<S: Symbol + Display>(ls: &LSystem<S>,
                               args: &Args)
                               -> Result<String, Box<dyn std::error::Error>> {
    let mut joined = match &args.separator {
        Some(separator) => interpret::joining_with(separator.as_str()),
        None => interpret::joining(),
    };

    let word = match args.seed {
        Some(seed) => ls.rewrite_seeded(args.derivations, &mut joined, seed)?,
        None => ls.rewrite(args.derivations, &mut joined)?,
    };

    Ok(word)
}

/// Lindenmayer's original algae model: a -> ab, b -> a.
fn algae() -> Result<LSystem<String>, BuildError> {
    string_symbols().rule("a").out("a").out("b")
                    .rule("b").out("a")
                    .axiom().out("a")
                    .build()
}

/// The Fibonacci word: 0 -> 1, 1 -> 01.
fn fibonacci() -> Result<LSystem<i64>, BuildError> {
    int_symbols().rule(0).out(1)
                 .rule(1).out(0).out(1)
                 .axiom().out(0)
                 .build()
}

/// A stochastic system: every F flips a coin and grows left or right.
fn coin() -> Result<LSystem<String>, BuildError> {
    string_symbols().rule("F")
                    .probably(0.5).out("F").out("L")
                    .otherwise().out("F").out("R")
                    .axiom().out("F")
                    .build()
}
