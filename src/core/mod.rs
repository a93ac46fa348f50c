// LogQuery - core/mod.rs
//
// Core query engine layer.
// Must NOT depend on: platform, app, or any I/O crate directly.

pub mod evaluator;
pub mod export;
pub mod model;
pub mod operators;
pub mod query;
pub mod tokenizer;

pub use evaluator::Evaluator;
pub use operators::{Operator, OperatorSet, QuerySyntax};
pub use query::{LogQuerier, QueryOptions, SortOrder};
pub use tokenizer::{Token, TokenSequence, Tokenizer};
