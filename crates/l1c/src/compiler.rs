//! Responsible with driving L1 source texts through the pipeline

use l1_grammar::{parse, Program};
use l1_lexing::lexer::LexError;
use l1_lexing::Lexed;
use l1_tokens::token::Lexeme;
use l1_types::Tables;
use l1_vm::Interpreter;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info_span, instrument, warn};

pub mod error;

pub use error::{L1cError, L1cResult};

/// Lexes a source text and interns its constants and identifiers
#[inline]
pub fn lex(source: &str) -> Lexed {
    l1_lexing::lex(source)
}

/// Lexes and parses a source text with the default configuration
pub fn compile(source: &str) -> L1cResult<Compiled> {
    L1c::default().compile(source)
}

/// Lexes, parses and runs a source text with the default configuration
pub fn run(source: &str) -> L1cResult<Finished> {
    L1c::default().run(source)
}

/// A program that was lexed and parsed
#[derive(Debug, Clone)]
pub struct Compiled {
    /// Every lexeme, in source order
    pub lexemes: Vec<Lexeme>,
    /// Lexing diagnostics that were tolerated
    pub diagnostics: Vec<LexError>,
    pub program: Program,
}

/// A program that ran to its end
#[derive(Debug, Clone)]
pub struct Finished {
    pub compiled: Compiled,
    /// The tables as they were when the program ended
    pub tables: Tables,
    /// The number of executed records
    pub steps: usize,
}

/// Responsible with driving L1 source texts through the pipeline.
///
/// Must be configured using an [L1cBuilder].
#[derive(Debug)]
pub struct L1c {
    step_limit: Option<usize>,
    strict_lexing: bool,
}

impl L1c {
    /// Creates the default L1cBuilder
    #[inline]
    pub fn builder() -> L1cBuilder {
        L1cBuilder::new()
    }

    /// The maximum number of records a run may execute
    pub fn step_limit(&self) -> Option<usize> {
        self.step_limit
    }

    /// Whether lexing diagnostics abort the pipeline
    pub fn strict_lexing(&self) -> bool {
        self.strict_lexing
    }

    /// Lexes and parses a source text
    #[instrument(skip_all)]
    pub fn compile(&self, source: &str) -> L1cResult<Compiled> {
        let Lexed {
            lexemes,
            tables,
            diagnostics,
        } = lex(source);
        if !diagnostics.is_empty() {
            if self.strict_lexing {
                return Err(diagnostics.into());
            }
            warn!("ignoring {} unidentified lexemes", diagnostics.len());
        }
        let program = parse(&lexemes, tables)?;
        debug!("syntax is correct");
        Ok(Compiled {
            lexemes,
            diagnostics,
            program,
        })
    }

    /// Lexes, parses and runs a source text
    #[instrument(skip_all)]
    pub fn run(&self, source: &str) -> L1cResult<Finished> {
        let compiled = self.compile(source)?;
        self.execute(compiled)
    }

    /// Runs an already compiled program
    pub fn execute(&self, compiled: Compiled) -> L1cResult<Finished> {
        let span = info_span!("execute", records = compiled.program.rpn.len());
        let _enter = span.enter();
        let mut interpreter =
            Interpreter::new(&compiled.program.rpn, compiled.program.tables.clone())
                .with_step_limit(self.step_limit);
        interpreter.run()?;
        let steps = interpreter.steps();
        let tables = interpreter.into_tables();
        debug!("finished after {steps} steps");
        Ok(Finished {
            compiled,
            tables,
            steps,
        })
    }

    /// Lexes and parses a source file
    pub fn compile_file<P: AsRef<Path>>(&self, path: P) -> L1cResult<Compiled> {
        let source = std::fs::read_to_string(path.as_ref())?;
        self.compile(&source)
    }

    /// Lexes, parses and runs a source file
    pub fn run_file<P: AsRef<Path>>(&self, path: P) -> L1cResult<Finished> {
        let source = std::fs::read_to_string(path.as_ref())?;
        self.run(&source)
    }
}

impl Default for L1c {
    fn default() -> Self {
        let builder = L1cBuilder::default();
        Self {
            step_limit: builder.step_limit,
            strict_lexing: builder.strict_lexing,
        }
    }
}

/// Builder for creating a [L1c] instance.
#[derive(Debug)]
pub struct L1cBuilder {
    /// Maximum number of records a run may execute, unlimited if `None`
    pub step_limit: Option<usize>,
    /// Whether unidentified lexemes abort the pipeline
    pub strict_lexing: bool,
}

impl L1cBuilder {
    /// Creates an L1cBuilder with default settings
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of records a run may execute
    pub fn step_limit(mut self, limit: impl Into<Option<usize>>) -> Self {
        self.step_limit = limit.into();
        self
    }

    /// Sets whether unidentified lexemes abort the pipeline
    pub fn strict_lexing(mut self, strict: bool) -> Self {
        self.strict_lexing = strict;
        self
    }

    /// Builds an [L1c] instance from this builder
    pub fn build(self) -> Result<L1c, BuildL1cError> {
        if self.step_limit == Some(0) {
            return Err(BuildL1cError::ZeroStepLimit);
        }
        Ok(L1c {
            step_limit: self.step_limit,
            strict_lexing: self.strict_lexing,
        })
    }
}

impl Default for L1cBuilder {
    fn default() -> Self {
        Self {
            step_limit: None,
            strict_lexing: true,
        }
    }
}

/// An error occurred while building an [L1c] instance
#[derive(Debug, Error)]
pub enum BuildL1cError {
    #[error("Programs can't run if no steps are allowed")]
    ZeroStepLimit,
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_zero_step_limit_is_rejected() {
        assert!(matches!(
            L1c::builder().step_limit(0).build(),
            Err(BuildL1cError::ZeroStepLimit)
        ));
        let l1c = L1c::builder().step_limit(10).build().expect("valid");
        assert_eq!(l1c.step_limit(), Some(10));
        assert!(l1c.strict_lexing());
    }

    #[test]
    fn test_lenient_lexing_drops_unidentified_lexemes() {
        let source = "var x = 1\nx = 2 $";
        assert!(matches!(compile(source), Err(L1cError::Lex(_))));
        let l1c = L1c::builder().strict_lexing(false).build().expect("valid");
        let compiled = l1c.compile(source).expect("should compile");
        assert_eq!(compiled.diagnostics.len(), 1);
        assert_eq!(compiled.lexemes.len(), 7);
    }
}
