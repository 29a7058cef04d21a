//! Identifier selection expressions.
//!
//! ```text
//! 1,3,5-7     ids 1, 3, 5, 6 and 7
//! 2 4 9-12    whitespace works as a separator too
//! *           every id currently in the collection
//! ```
//!
//! Bad tokens are collected instead of failing the whole expression, so
//! `1,x,3` still selects 1 and 3 and reports `x`.

use std::collections::BTreeSet;

pub const WILDCARD: &str = "*";

/// Outcome of resolving a selection expression against a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Distinct ids in ascending order.
    pub ids: Vec<i64>,
    /// Tokens that could not be parsed, in input order.
    pub rejected: Vec<String>,
    /// Whether the expression was the lone `*`.
    pub wildcard: bool,
    /// Parts of ranges that lie past the end of the collection, as
    /// inclusive `(start, end)` spans. They are not expanded into `ids`.
    pub beyond: Vec<(i64, i64)>,
}

impl Resolution {
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Resolve `expression` for a collection holding `collection_size` rows.
///
/// Ids are dense, so `*` expands to `1..=collection_size`. Ranges are
/// clipped to the collection; bare ids are kept as given so that a missing
/// id can be reported where it is used.
pub fn resolve(expression: &str, collection_size: i64) -> Resolution {
    let tokens: Vec<&str> = tokens(expression).collect();

    if tokens.len() == 1 && tokens[0] == WILDCARD {
        return Resolution {
            ids: (1..=collection_size.max(0)).collect(),
            rejected: Vec::new(),
            wildcard: true,
            beyond: Vec::new(),
        };
    }

    let mut ids = BTreeSet::new();
    let mut rejected = Vec::new();
    let mut beyond = Vec::new();

    for token in tokens {
        match parse_token(token) {
            Some(Token::Single(id)) => {
                ids.insert(id);
            }
            Some(Token::Range(start, end)) => {
                if end > collection_size {
                    beyond.push((start.max(collection_size + 1), end));
                }
                let last = end.min(collection_size);
                if start <= last {
                    ids.extend(start..=last);
                }
            }
            None => rejected.push(token.to_string()),
        }
    }

    Resolution {
        ids: ids.into_iter().collect(),
        rejected,
        wildcard: false,
        beyond,
    }
}

fn tokens(expression: &str) -> impl Iterator<Item = &str> {
    expression
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
}

enum Token {
    Single(i64),
    Range(i64, i64),
}

fn parse_token(token: &str) -> Option<Token> {
    match token.split_once('-') {
        Some((start, end)) => {
            let start = parse_id(start)?;
            let end = parse_id(end)?;
            (start <= end).then_some(Token::Range(start, end))
        }
        None => parse_id(token).map(Token::Single),
    }
}

fn parse_id(s: &str) -> Option<i64> {
    s.trim().parse::<i64>().ok().filter(|id| *id >= 1)
}
