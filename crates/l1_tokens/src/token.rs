//! A lexical token from an L1 source, along with the kinds a token can have

use itertools::Itertools;
use std::fmt::{Debug, Display, Formatter};
use strum::{AsRefStr, EnumIter, EnumString};

/// A classified token instance carrying the row it was read from.
///
/// Rows are 1-based. `table_index` links constant and identifier lexemes to their entry
/// in the constant or identifier table.
#[derive(Clone, PartialEq)]
pub struct Lexeme {
    row: usize,
    text: String,
    kind: TokenKind,
    table_index: Option<usize>,
}

impl Lexeme {
    /// Creates a new lexeme that isn't linked to any table
    pub fn new(row: usize, text: impl Into<String>, kind: TokenKind) -> Self {
        Self {
            row,
            text: text.into(),
            kind,
            table_index: None,
        }
    }

    /// Gets the row for this lexeme
    pub fn row(&self) -> usize {
        self.row
    }

    /// Gets the source text of this lexeme
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Gets the kind for this lexeme
    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    pub fn table_index(&self) -> Option<usize> {
        self.table_index
    }

    /// Links this lexeme to a table entry
    pub fn set_table_index(&mut self, index: usize) {
        self.table_index = Some(index);
    }

    /// Builder-style version of [Lexeme::set_table_index]
    pub fn with_table_index(mut self, index: usize) -> Self {
        self.set_table_index(index);
        self
    }

    /// Checks whether this lexeme is of the given kind
    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Checks if this lexeme is an identifier
    #[inline]
    pub fn is_identifier(&self) -> bool {
        self.is(TokenKind::Identifier)
    }

    /// Checks if this lexeme is a constant
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.is(TokenKind::Constant)
    }
}

impl Debug for Lexeme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}@{}({:?})", self.kind, self.row, self.text)
    }
}

impl Display for Lexeme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<7} {:<15} {:<15} {}",
            self.row,
            self.text,
            self.kind.as_ref(),
            self.table_index.map(|i| i.to_string()).unwrap_or_default()
        )
    }
}

/// Joins the text of lexemes with single spaces
pub fn join_text<'a>(lexemes: impl IntoIterator<Item = &'a Lexeme>) -> String {
    lexemes.into_iter().map(Lexeme::text).join(" ")
}

/// The kind for a lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Identifier,
    Constant,
    /// `val` or `var`
    Declaration(Declaration),
    /// `for`, `while`, `to`, `do` and `end`
    Loop(LoopKeyword),
    /// `if` and `then`
    Condition(ConditionKeyword),
    /// `goto`
    Jump,
    /// `number`, `boolean` and `string`
    Type(TypeKeyword),
    /// =
    Assign,
    AddOp(AddOp),
    MultOp(MultOp),
    /// ^
    PowOp,
    RelOp(RelOp),
    #[strum(serialize = "BRACKET_OP")]
    Bracket(Bracket),
    /// :
    Punct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Declaration {
    Val,
    Var,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum LoopKeyword {
    For,
    While,
    To,
    Do,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum ConditionKeyword {
    If,
    Then,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum TypeKeyword {
    Number,
    Boolean,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter)]
pub enum AddOp {
    #[strum(serialize = "+")]
    Plus,
    #[strum(serialize = "-")]
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter)]
pub enum MultOp {
    #[strum(serialize = "*")]
    Star,
    #[strum(serialize = "/")]
    Slash,
}

/// Relational operators, multi character forms first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter)]
pub enum RelOp {
    #[strum(serialize = ">=")]
    Gte,
    #[strum(serialize = "<=")]
    Lte,
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Neq,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = "<")]
    Lt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter)]
pub enum Bracket {
    #[strum(serialize = "(")]
    Open,
    #[strum(serialize = ")")]
    Close,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_keyword_spelling() {
        assert_eq!(Declaration::from_str("val").unwrap(), Declaration::Val);
        assert_eq!(LoopKeyword::End.as_ref(), "end");
        assert_eq!(RelOp::from_str("!=").unwrap(), RelOp::Neq);
        assert!(TypeKeyword::from_str("Number").is_err());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(TokenKind::Identifier.as_ref(), "IDENTIFIER");
        assert_eq!(TokenKind::AddOp(AddOp::Plus).as_ref(), "ADD_OP");
        assert_eq!(TokenKind::Bracket(Bracket::Open).as_ref(), "BRACKET_OP");
    }

    #[test]
    fn test_lexeme_listing() {
        let lexeme = Lexeme::new(3, "x", TokenKind::Identifier).with_table_index(0);
        assert_eq!(
            lexeme.to_string(),
            format!("{:<7} {:<15} {:<15} 0", 3, "x", "IDENTIFIER")
        );
        assert_eq!(
            join_text(&[lexeme.clone(), Lexeme::new(3, "=", TokenKind::Assign)]),
            "x ="
        );
    }
}
