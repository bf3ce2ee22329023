//! An L1 pipeline error

use itertools::Itertools as _;
use l1_grammar::SyntaxError;
use l1_lexing::lexer::LexError;
use l1_vm::RuntimeError;
use std::io;
use thiserror::Error;

/// An error occurred while driving a program through the pipeline
#[derive(Debug, Error)]
pub enum L1cError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{}", .0.iter().join("\n"))]
    Lex(Vec<LexError>),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl From<Vec<LexError>> for L1cError {
    fn from(value: Vec<LexError>) -> Self {
        L1cError::Lex(value)
    }
}

/// A type alias for general results in l1c
pub type L1cResult<T> = Result<T, L1cError>;
