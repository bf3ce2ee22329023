//! Contains the lexer

use crate::lexer::token_parsing::{classify, segment_row};
use l1_tokens::token::Lexeme;
use std::collections::VecDeque;
use std::iter::FusedIterator;
use thiserror::Error;
use tracing::trace;

mod token_parsing;

/// A lexer, producing lexemes row by row
#[derive(Debug)]
pub struct Lexer<'s> {
    rows: std::iter::Enumerate<std::str::Split<'s, char>>,
    row: usize,
    pending: VecDeque<&'s str>,
}

impl<'s> Lexer<'s> {
    /// Creates a new lexer over the given source text
    pub fn new(source: &'s str) -> Self {
        Self {
            rows: source.split('\n').enumerate(),
            row: 0,
            pending: VecDeque::new(),
        }
    }

    /// The 1-based row the lexer is currently in, `0` before the first row
    pub fn row(&self) -> usize {
        self.row
    }

    fn next_segment(&mut self) -> Option<&'s str> {
        loop {
            if let Some(segment) = self.pending.pop_front() {
                return Some(segment);
            }
            let (index, row) = self.rows.next()?;
            self.row = index + 1;
            self.pending.extend(segment_row(row));
            trace!("row {} has {} segments", self.row, self.pending.len());
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Lexeme, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let segment = self.next_segment()?;
        let row = self.row;
        Some(match classify(segment) {
            Some(kind) => Ok(Lexeme::new(row, segment, kind)),
            None => Err(LexError::UnknownLexeme {
                text: segment.to_string(),
                row,
            }),
        })
    }
}

impl FusedIterator for Lexer<'_> {}

/// A lexing error. Lexing continues after any of these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("Unidentified lexem \"{text}\" on the row {row}.")]
    UnknownLexeme { text: String, row: usize },
}

impl LexError {
    pub fn row(&self) -> usize {
        match self {
            LexError::UnknownLexeme { row, .. } => *row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use l1_tokens::token::{AddOp, TokenKind};
    use test_log::test;

    #[test]
    fn test_rows_are_one_based() {
        let lexemes = Lexer::new("x = 1\n\ny = x + 2")
            .collect::<Result<Vec<_>, _>>()
            .expect("should lex");
        assert_eq!(lexemes.len(), 8);
        assert_eq!(lexemes[0].row(), 1);
        assert_eq!(lexemes[3].row(), 3);
        assert_eq!(lexemes[6].kind(), &TokenKind::AddOp(AddOp::Plus));
    }

    #[test]
    fn test_lexing_continues_after_unknown() {
        let results = Lexer::new("a = 1\nb = a$b\nc = 2").collect::<Vec<_>>();
        let errors = results
            .iter()
            .filter_map(|result| result.as_ref().err())
            .collect::<Vec<_>>();
        assert_eq!(
            errors,
            vec![&LexError::UnknownLexeme {
                text: "a$b".to_string(),
                row: 2
            }]
        );
        assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 8);
        assert_eq!(
            errors[0].to_string(),
            "Unidentified lexem \"a$b\" on the row 2."
        );
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(Lexer::new("").count(), 0);
        assert_eq!(Lexer::new("\n \n\t").count(), 0);
    }
}
