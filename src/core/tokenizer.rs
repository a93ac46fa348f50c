// LogQuery - core/tokenizer.rs
//
// Splits a query string into operator and operand tokens.
// Core layer: pure logic, no I/O.
//
// The scan is a single regex alternation over the escaped operator literals.
// Text between two operator matches becomes an operand after trimming and
// quote-marker removal; operands that end up empty are dropped.

use crate::core::operators::{Operator, OperatorSet, QuerySyntax};
use crate::util::error::QueryError;
use regex::Regex;

/// One element of a tokenized query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A structural operator.
    Operator(Operator),

    /// A substring to search for. Never empty.
    Operand(String),
}

impl Token {
    /// The operator this token represents, if any.
    pub fn as_operator(&self) -> Option<Operator> {
        match self {
            Token::Operator(op) => Some(*op),
            Token::Operand(_) => None,
        }
    }

    /// Surface text of the token under the given operator set.
    pub fn text<'a>(&'a self, operators: &'a OperatorSet) -> &'a str {
        match self {
            Token::Operator(op) => operators.literal(*op),
            Token::Operand(s) => s,
        }
    }
}

/// Ordered tokens produced from one query. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSequence {
    tokens: Vec<Token>,
}

impl TokenSequence {
    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Render each token back to its surface text.
    pub fn to_strings(&self, operators: &OperatorSet) -> Vec<String> {
        self.tokens
            .iter()
            .map(|t| t.text(operators).to_string())
            .collect()
    }
}

impl From<Vec<Token>> for TokenSequence {
    fn from(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

impl<'a> IntoIterator for &'a TokenSequence {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Query tokenizer bound to one `QuerySyntax`.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    syntax: QuerySyntax,
    pattern: Regex,
}

impl Tokenizer {
    /// Compile the operator alternation for `syntax`.
    pub fn new(syntax: QuerySyntax) -> Result<Self, QueryError> {
        let source = syntax.operators.pattern();
        let pattern = Regex::new(&source).map_err(|e| QueryError::Pattern {
            pattern: source.clone(),
            source: e,
        })?;
        Ok(Self { syntax, pattern })
    }

    pub fn syntax(&self) -> &QuerySyntax {
        &self.syntax
    }

    /// Tokenize `query`. An empty query yields an empty sequence.
    pub fn tokenize(&self, query: &str) -> TokenSequence {
        let mut tokens = Vec::new();
        let mut rest_start = 0;

        for m in self.pattern.find_iter(query) {
            self.push_operand(&query[rest_start..m.start()], &mut tokens);
            match self.syntax.operators.classify(m.as_str()) {
                Some(op) => tokens.push(Token::Operator(op)),
                None => self.push_operand(m.as_str(), &mut tokens),
            }
            rest_start = m.end();
        }
        self.push_operand(&query[rest_start..], &mut tokens);

        tracing::trace!(query, tokens = tokens.len(), "Query tokenized");
        TokenSequence::from(tokens)
    }

    /// Normalize `raw` and append it unless it is empty.
    ///
    /// A normalized operand equal to an operator literal is classified as
    /// that operator.
    fn push_operand(&self, raw: &str, tokens: &mut Vec<Token>) {
        let operand = self.normalize(raw);
        if operand.is_empty() {
            return;
        }
        match self.syntax.operators.classify(&operand) {
            Some(op) => tokens.push(Token::Operator(op)),
            None => tokens.push(Token::Operand(operand)),
        }
    }

    fn normalize(&self, raw: &str) -> String {
        let trimmed = raw.trim();
        if self.syntax.quote_marker.is_empty() {
            trimmed.to_string()
        } else {
            trimmed.replace(&self.syntax.quote_marker, "")
        }
    }
}
