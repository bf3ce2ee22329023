//! The values an L1 program works with

use l1_tokens::token::TypeKeyword;
use std::fmt::{Display, Formatter};
use strum::AsRefStr;

/// The type tag of a table entry
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    /// Not known yet
    #[default]
    Undef,
    Number,
    String,
    Boolean,
    /// A jump target
    Mark,
}

impl From<TypeKeyword> for ValueType {
    fn from(value: TypeKeyword) -> Self {
        match value {
            TypeKeyword::Number => ValueType::Number,
            TypeKeyword::Boolean => ValueType::Boolean,
            TypeKeyword::String => ValueType::String,
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// A concrete value
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum Literal {
    Number(f64),
    String(String),
    Boolean(bool),
}

impl Literal {
    /// Parses the source text of a constant lexeme.
    ///
    /// Strings keep their quotes in the source text, the returned value doesn't.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "true" => Some(Literal::Boolean(true)),
            "false" => Some(Literal::Boolean(false)),
            quoted if quoted.len() >= 2 && quoted.starts_with('\'') && quoted.ends_with('\'') => {
                Some(Literal::String(quoted[1..quoted.len() - 1].to_string()))
            }
            number => number.parse::<f64>().ok().map(Literal::Number),
        }
    }

    /// Gets the type of this literal
    pub fn value_type(&self) -> ValueType {
        match self {
            Literal::Number(_) => ValueType::Number,
            Literal::String(_) => ValueType::String,
            Literal::Boolean(_) => ValueType::Boolean,
        }
    }

    /// The source spelling of this literal, used as its interning key
    pub fn literal_text(&self) -> String {
        self.to_string()
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Literal::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Literal::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Number(n) => write!(f, "{n}"),
            Literal::String(s) => write!(f, "'{s}'"),
            Literal::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// What an identifier is bound to
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Binding {
    /// Not declared yet
    #[default]
    Undef,
    /// Declared, but never assigned
    Def,
    Value(Literal),
}

impl Binding {
    /// Gets the value, if one was assigned
    pub fn value(&self) -> Option<&Literal> {
        match self {
            Binding::Value(literal) => Some(literal),
            _ => None,
        }
    }
}

impl Display for Binding {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Binding::Undef => f.write_str("UNDEF"),
            Binding::Def => f.write_str("DEF"),
            Binding::Value(literal) => write!(f, "{literal}"),
        }
    }
}
