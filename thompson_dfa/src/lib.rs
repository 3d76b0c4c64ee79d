//! Thompson NFAs and subset-construction DFAs
//!
//! This library compiles a small regular expression AST into a nondeterministic
//! finite automaton using Thompson construction, and determinizes that
//! automaton into a deterministic finite automaton using subset construction.
//! Both automata answer whole-string matches:
//!
//! ```
//! use thompson_dfa::{build, Dfa};
//!
//! let nfa = build("(ab)+").unwrap();
//! assert!(nfa.matches("abab"));
//!
//! let dfa = Dfa::new(&nfa);
//! assert!(dfa.matches("ab"));
//! assert!(!dfa.matches("a"));
//! ```
//!
//! Supported syntax is deliberately tiny: literal characters, concatenation,
//! alternation, grouping and the `*`, `+` and `?` quantifiers. Everything else
//! is rejected at compile time with [`Error::UnsupportedConstruct`].
//!
//! # Crate features
//!
//! * **std** (enabled by default) - Required.
//! * **logging** - Emits `debug` and `trace` messages through the `log` crate
//!   while NFAs and DFAs are being built.

#[macro_use]
mod macros;

pub mod ast;
pub mod builder;
pub mod compiler;
pub mod dfa;
pub mod nfa;
pub mod parse;
pub mod state;

pub use ast::Node;
pub use builder::{Builder, Fragment};
pub use compiler::{build, compile, Compiler};
pub use dfa::{CombinedState, Dfa, DfaTransitionTable};
pub use nfa::{Nfa, NfaRow, NfaTable};
pub use parse::parse;
pub use state::{State, StateId, StateNumber, Symbol};

/// The result of compiling or parsing a pattern.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a pattern into an automaton
///
/// Both kinds are raised before any matching happens. Matching itself is
/// total and never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The AST contains a node, quantifier or character kind that cannot be
    /// compiled, or the pattern carries flags.
    UnsupportedConstruct(String),
    /// The input could not be turned into an AST at all.
    MalformedInput(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnsupportedConstruct(what) => write!(f, "unsupported construct: {}", what),
            Error::MalformedInput(msg) => write!(f, "malformed input: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
