// LogQuery - core/evaluator.rs
//
// Recursive-descent evaluation of a token sequence against one log line.
// Core layer: pure logic, no I/O.
//
// Grammar, lowest precedence first:
//   or    := and (OR and)*
//   and   := unary (AND unary)*
//   unary := NOT unary | LEFT_PAREN or RIGHT_PAREN | operand
//
// Both sides of AND/OR are always evaluated so that a malformed right-hand
// side is reported for every line, not only for lines where it would matter.
// Running out of tokens where a term is expected yields `false` without
// consuming anything. Parentheses are not checked for balance: after a group
// the position skips one token on the assumption that it closes the group.
// NOT and group nesting is capped at `MAX_NESTING_DEPTH` levels.

use crate::core::operators::{Operator, OperatorSet};
use crate::core::tokenizer::{Token, TokenSequence};
use crate::util::constants;
use crate::util::error::QueryError;

/// Evaluates one token sequence against any number of lines.
///
/// Cheap to share across threads: holds only borrowed, immutable data plus
/// the pre-lowercased operands used for case-insensitive matching.
#[derive(Debug)]
pub struct Evaluator<'a> {
    tokens: &'a [Token],
    operators: &'a OperatorSet,
    case_insensitive: bool,
    lowered: Vec<String>,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        tokens: &'a TokenSequence,
        operators: &'a OperatorSet,
        case_insensitive: bool,
    ) -> Self {
        let lowered = if case_insensitive {
            tokens
                .iter()
                .map(|t| match t {
                    Token::Operand(s) => s.to_lowercase(),
                    Token::Operator(_) => String::new(),
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            tokens: tokens.as_slice(),
            operators,
            case_insensitive,
            lowered,
        }
    }

    /// Evaluate the whole sequence against `line`.
    pub fn matches(&self, line: &str) -> Result<bool, QueryError> {
        self.evaluate_at(line, 0).map(|(matched, _)| matched)
    }

    /// Evaluate an OR-expression starting at token `pos`.
    ///
    /// Returns the result and the index of the first unconsumed token.
    pub fn evaluate_at(&self, line: &str, pos: usize) -> Result<(bool, usize), QueryError> {
        if self.case_insensitive {
            let line = line.to_lowercase();
            self.eval_or(&line, pos, 0)
        } else {
            self.eval_or(line, pos, 0)
        }
    }

    fn eval_or(
        &self,
        line: &str,
        pos: usize,
        depth: usize,
    ) -> Result<(bool, usize), QueryError> {
        let (mut result, mut next) = self.eval_and(line, pos, depth)?;

        while self.is_operator_at(next, Operator::Or) {
            let (rhs, after) = self.eval_and(line, next + 1, depth)?;
            result = result || rhs;
            next = after;
        }

        Ok((result, next))
    }

    fn eval_and(
        &self,
        line: &str,
        pos: usize,
        depth: usize,
    ) -> Result<(bool, usize), QueryError> {
        let (mut result, mut next) = self.eval_unary(line, pos, depth)?;

        while self.is_operator_at(next, Operator::And) {
            let (rhs, after) = self.eval_unary(line, next + 1, depth)?;
            result = result && rhs;
            next = after;
        }

        Ok((result, next))
    }

    fn eval_unary(
        &self,
        line: &str,
        pos: usize,
        depth: usize,
    ) -> Result<(bool, usize), QueryError> {
        let Some(token) = self.tokens.get(pos) else {
            return Ok((false, pos));
        };

        match token {
            Token::Operator(Operator::LeftParenthesis) => {
                let depth = Self::nested(depth, pos)?;
                let (result, next) = self.eval_or(line, pos + 1, depth)?;
                Ok((result, next + 1))
            }
            Token::Operator(Operator::Not) => {
                let depth = Self::nested(depth, pos)?;
                let (result, next) = self.eval_unary(line, pos + 1, depth)?;
                Ok((!result, next))
            }
            Token::Operator(op) => {
                debug_assert!(op.is_invalid_in_term_position());
                Err(QueryError::InvalidToken {
                    token: self.operators.literal(*op).to_string(),
                    position: pos,
                })
            }
            Token::Operand(needle) => {
                let needle = if self.case_insensitive {
                    self.lowered[pos].as_str()
                } else {
                    needle.as_str()
                };
                Ok((line.contains(needle), pos + 1))
            }
        }
    }

    fn nested(depth: usize, pos: usize) -> Result<usize, QueryError> {
        if depth >= constants::MAX_NESTING_DEPTH {
            return Err(QueryError::NestingTooDeep {
                max_depth: constants::MAX_NESTING_DEPTH,
                position: pos,
            });
        }
        Ok(depth + 1)
    }

    fn is_operator_at(&self, pos: usize, op: Operator) -> bool {
        self.tokens.get(pos).and_then(Token::as_operator) == Some(op)
    }
}
