#![doc = include_str!("../README.md")]

use std::fmt::{Display, Formatter};

pub mod token;

/// An error attached to the source row it was raised on
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub struct RowError<E> {
    #[source]
    error: E,
    row: Option<usize>,
}

impl<E> RowError<E> {
    pub fn new(error: E, row: impl Into<Option<usize>>) -> Self {
        Self {
            error,
            row: row.into(),
        }
    }

    /// The error itself
    pub fn error(&self) -> &E {
        &self.error
    }

    /// The row the error was raised on, if known
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    /// Consumes this error, returning the inner error
    pub fn into_inner(self) -> E {
        self.error
    }
}

impl<E: Display> Display for RowError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.row {
            Some(row) => write!(f, "Row {row}: {}", self.error),
            None => write!(f, "{}", self.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_prefix() {
        let error = RowError::new("boom", 12);
        assert_eq!(error.to_string(), "Row 12: boom");
        let error = RowError::new("boom", None);
        assert_eq!(error.to_string(), "boom");
    }

    #[derive(Debug, thiserror::Error)]
    #[error("inner failure")]
    struct Inner;

    #[test]
    fn test_source_is_the_inner_error() {
        use std::error::Error;

        let error = RowError::new(Inner, 3);
        assert_eq!(error.to_string(), "Row 3: inner failure");
        let source = error.source().expect("should have a source");
        assert_eq!(source.to_string(), "inner failure");
    }
}
