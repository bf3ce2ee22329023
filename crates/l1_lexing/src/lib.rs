#![doc = include_str!("../README.md")]

use crate::lexer::{LexError, Lexer};
use l1_tokens::token::Lexeme;
use l1_types::Tables;
use tracing::{debug, instrument, warn};

pub mod lexer;

/// The result of lexing a source text
#[derive(Debug, Default, Clone)]
pub struct Lexed {
    /// The classified lexemes, linked to their table entries
    pub lexemes: Vec<Lexeme>,
    pub tables: Tables,
    /// Every piece of text that couldn't be classified, in source order
    pub diagnostics: Vec<LexError>,
}

impl Lexed {
    /// Whether lexing produced no diagnostics
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Lexes a whole source text and interns its constants and identifiers
#[instrument(skip_all)]
pub fn lex(source: &str) -> Lexed {
    let mut lexed = Lexed::default();
    for result in Lexer::new(source) {
        match result {
            Ok(lexeme) => lexed.lexemes.push(lexeme),
            Err(error) => {
                warn!("{error}");
                lexed.diagnostics.push(error);
            }
        }
    }
    lexed.tables.intern_lexemes(&mut lexed.lexemes);
    debug!(
        "lexed {} lexemes, {} constants, {} identifiers",
        lexed.lexemes.len(),
        lexed.tables.constants.len(),
        lexed.tables.identifiers.len()
    );
    lexed
}
