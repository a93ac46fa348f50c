// LogQuery - core/query.rs
//
// Query façade: tokenize once, evaluate every line, then apply limit and
// ordering. Core layer: pure logic, no I/O.

use crate::core::evaluator::Evaluator;
use crate::core::operators::QuerySyntax;
use crate::core::tokenizer::{TokenSequence, Tokenizer};
use crate::util::constants;
use crate::util::error::QueryError;
use crate::util::logging;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result ordering when a limit is applied.
///
/// The corpus is assumed to be chronological, oldest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Keep the last `limit` matches, oldest first.
    #[default]
    Asc,
    /// Keep the first `limit` matches, reversed.
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            other => Err(format!(
                "unknown ordering '{other}'. Valid values are: asc, desc"
            )),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// Query-time options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Maximum number of results. `None` or `Some(0)` means unbounded.
    pub limit: Option<usize>,

    /// Which end of the match list survives the limit.
    pub ordering: SortOrder,

    /// Lowercase both operands and lines before matching.
    pub case_insensitive: bool,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn ordering(mut self, ordering: SortOrder) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }
}

/// Boolean substring query engine over an in-memory, ordered set of lines.
#[derive(Debug, Clone)]
pub struct LogQuerier {
    lines: Vec<String>,
    tokenizer: Tokenizer,
    parallel_threshold: usize,
}

impl LogQuerier {
    /// Build a querier with the default `&&`, `||`, `!!`, `((`, `))` syntax.
    pub fn new<I, S>(lines: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_syntax(lines, QuerySyntax::default())
    }

    /// Build a querier with custom operator literals and quote marker.
    pub fn with_syntax<I, S>(lines: I, syntax: QuerySyntax) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        syntax.validate()?;
        let tokenizer = Tokenizer::new(syntax)?;
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();

        tracing::debug!(lines = lines.len(), "Log querier created");

        Ok(Self {
            lines,
            tokenizer,
            parallel_threshold: constants::PARALLEL_EVALUATION_THRESHOLD,
        })
    }

    /// Corpus size at or above which lines are evaluated on the rayon pool.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn syntax(&self) -> &QuerySyntax {
        self.tokenizer.syntax()
    }

    pub fn tokenize(&self, query: &str) -> TokenSequence {
        self.tokenizer.tokenize(query)
    }

    /// Lines matching `query`, shaped by `options`.
    ///
    /// An empty query (or one that tokenizes to nothing) matches every line.
    pub fn query(&self, query: &str, options: &QueryOptions) -> Result<Vec<&str>, QueryError> {
        Ok(self
            .query_indices(query, options)?
            .into_iter()
            .map(|i| self.lines[i].as_str())
            .collect())
    }

    /// Like `query`, but returns positions in the corpus.
    pub fn query_indices(
        &self,
        query: &str,
        options: &QueryOptions,
    ) -> Result<Vec<usize>, QueryError> {
        let tokens = if query.is_empty() {
            TokenSequence::default()
        } else {
            self.tokenize(query)
        };

        let matched = if tokens.is_empty() {
            (0..self.lines.len()).collect()
        } else {
            self.matching_indices(&tokens, options.case_insensitive)?
        };

        tracing::debug!(
            query,
            tokens = tokens.len(),
            lines = self.lines.len(),
            matched = matched.len(),
            limit = ?options.limit,
            ordering = %options.ordering,
            "Query evaluated"
        );

        Ok(apply_limit(matched, options.limit, options.ordering))
    }

    fn matching_indices(
        &self,
        tokens: &TokenSequence,
        case_insensitive: bool,
    ) -> Result<Vec<usize>, QueryError> {
        let evaluator = Evaluator::new(tokens, &self.tokenizer.syntax().operators, case_insensitive);

        if self.lines.len() >= self.parallel_threshold {
            let flags: Vec<bool> = self
                .lines
                .par_iter()
                .map(|line| evaluator.matches(line))
                .collect::<Result<_, _>>()?;
            return Ok(flags
                .into_iter()
                .enumerate()
                .filter_map(|(i, matched)| matched.then_some(i))
                .collect());
        }

        let mut matched = Vec::new();
        for (i, line) in self.lines.iter().enumerate() {
            if evaluator.matches(line)? {
                tracing::trace!(index = i, line = logging::preview(line), "Line matched");
                matched.push(i);
            }
        }
        Ok(matched)
    }
}

/// Keep at most `limit` results.
///
/// Ascending keeps the tail in original order; descending keeps the head and
/// reverses it. Without a limit the input is returned untouched.
pub fn apply_limit<T>(mut items: Vec<T>, limit: Option<usize>, ordering: SortOrder) -> Vec<T> {
    match limit {
        Some(limit) if limit > 0 => match ordering {
            SortOrder::Asc => {
                let start = items.len().saturating_sub(limit);
                items.split_off(start)
            }
            SortOrder::Desc => {
                items.truncate(limit);
                items.reverse();
                items
            }
        },
        _ => items,
    }
}
