pub mod automaton;
pub mod derivation;
pub mod error;
pub mod grammar;
pub mod loader;
pub mod stack;
pub mod table;
pub mod token;
pub mod trace;

#[cfg(test)]
mod fixtures;

pub use automaton::Automaton;
pub use derivation::Derivation;
pub use grammar::{Grammar, Rule};
pub use loader::Definition;
pub use stack::Stack;
pub use table::{PatternMode, Transition, TransitionTable};
pub use token::{EPSILON, EncodedState, GrammarToken, StackToken, Terminal, Variable, WILDCARD};
pub use trace::{Configuration, Trace};
