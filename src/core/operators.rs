// LogQuery - core/operators.rs
//
// Operator literals and quote marker that make up the query surface syntax.
// Core layer: pure data, no I/O.

use crate::util::constants;
use crate::util::error::QueryError;
use serde::{Deserialize, Serialize};

/// The five structural operators of the query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
    Not,
    LeftParenthesis,
    RightParenthesis,
}

impl Operator {
    /// All operators, in the order their patterns are tried by the tokenizer.
    pub fn all() -> &'static [Operator] {
        &[
            Operator::And,
            Operator::Or,
            Operator::Not,
            Operator::LeftParenthesis,
            Operator::RightParenthesis,
        ]
    }

    /// Upper-case name used in configuration messages.
    pub fn name(self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Not => "NOT",
            Operator::LeftParenthesis => "LEFT_PARENTHESIS",
            Operator::RightParenthesis => "RIGHT_PARENTHESIS",
        }
    }

    /// Returns true for operators that can never start a term.
    pub fn is_invalid_in_term_position(self) -> bool {
        matches!(
            self,
            Operator::And | Operator::Or | Operator::RightParenthesis
        )
    }
}

/// Literal surface token for each operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSet {
    pub and: String,
    pub or: String,
    pub not: String,
    pub left_parenthesis: String,
    pub right_parenthesis: String,
}

impl Default for OperatorSet {
    fn default() -> Self {
        Self {
            and: constants::DEFAULT_AND.to_string(),
            or: constants::DEFAULT_OR.to_string(),
            not: constants::DEFAULT_NOT.to_string(),
            left_parenthesis: constants::DEFAULT_LEFT_PARENTHESIS.to_string(),
            right_parenthesis: constants::DEFAULT_RIGHT_PARENTHESIS.to_string(),
        }
    }
}

impl OperatorSet {
    /// Raw literal for `op`.
    pub fn literal(&self, op: Operator) -> &str {
        match op {
            Operator::And => &self.and,
            Operator::Or => &self.or,
            Operator::Not => &self.not,
            Operator::LeftParenthesis => &self.left_parenthesis,
            Operator::RightParenthesis => &self.right_parenthesis,
        }
    }

    /// Regex-safe form of the literal for `op`.
    pub fn escaped(&self, op: Operator) -> String {
        regex::escape(self.literal(op))
    }

    /// Alternation of every escaped literal, in `Operator::all()` order.
    pub fn pattern(&self) -> String {
        Operator::all()
            .iter()
            .map(|op| self.escaped(*op))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Classify `text` by exact equality against the operator literals.
    pub fn classify(&self, text: &str) -> Option<Operator> {
        Operator::all()
            .iter()
            .copied()
            .find(|op| self.literal(*op) == text)
    }
}

/// Operator literals plus the quote marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySyntax {
    pub operators: OperatorSet,

    /// Stripped from operands after tokenization. Empty disables quoting.
    pub quote_marker: String,
}

impl Default for QuerySyntax {
    fn default() -> Self {
        Self {
            operators: OperatorSet::default(),
            quote_marker: constants::DEFAULT_QUOTE_MARKER.to_string(),
        }
    }
}

impl QuerySyntax {
    pub fn new(operators: OperatorSet, quote_marker: impl Into<String>) -> Self {
        Self {
            operators,
            quote_marker: quote_marker.into(),
        }
    }

    /// Check that every literal is non-empty, bounded, and distinct from the
    /// others, and that the quote marker does not collide with an operator.
    pub fn validate(&self) -> Result<(), QueryError> {
        let max_length = constants::MAX_OPERATOR_LITERAL_LENGTH;
        let ops = Operator::all();

        for (i, op) in ops.iter().enumerate() {
            let literal = self.operators.literal(*op);
            if literal.is_empty() {
                return Err(QueryError::EmptyLiteral {
                    operator: op.name(),
                });
            }
            if literal.chars().count() > max_length {
                return Err(QueryError::LiteralTooLong {
                    operator: op.name(),
                    length: literal.chars().count(),
                    max_length,
                });
            }
            for other in &ops[i + 1..] {
                if self.operators.literal(*other) == literal {
                    return Err(QueryError::DuplicateLiteral {
                        literal: literal.to_string(),
                        first: op.name(),
                        second: other.name(),
                    });
                }
            }
        }

        if self.quote_marker.chars().count() > max_length {
            return Err(QueryError::LiteralTooLong {
                operator: "QUOTE",
                length: self.quote_marker.chars().count(),
                max_length,
            });
        }
        if let Some(op) = self.operators.classify(&self.quote_marker) {
            return Err(QueryError::DuplicateLiteral {
                literal: self.quote_marker.clone(),
                first: op.name(),
                second: "QUOTE",
            });
        }

        Ok(())
    }
}
