use l1_tokens::token::{join_text, Lexeme};
use std::fmt::{Display, Formatter};
use strum::{AsRefStr, Display as StrumDisplay};

/// The grammar rules a diagnostic can be reported for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Rule {
    Statement,
    Declaration,
    Assignment,
    Loop,
    #[strum(serialize = "while loop")]
    WhileLoop,
    #[strum(serialize = "for loop")]
    ForLoop,
    Condition,
    Goto,
}

/// A rule that was committed to, but failed one of its parts
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub struct GrammarError {
    pub rule: Rule,
    pub detail: Option<String>,
    pub row: usize,
    pub lexemes: Vec<Lexeme>,
    /// How deeply nested the statement was, `0` for top level statements
    pub depth: usize,
}

impl GrammarError {
    pub fn new(
        rule: Rule,
        detail: impl Into<Option<String>>,
        lexemes: &[Lexeme],
        depth: usize,
    ) -> Self {
        Self {
            rule,
            detail: detail.into(),
            row: lexemes.first().map(Lexeme::row).unwrap_or_default(),
            lexemes: lexemes.to_vec(),
            depth,
        }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Wrong {}", self.rule)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        write!(f, " on line {}: {}", self.row, join_text(&self.lexemes))
    }
}

/// The program isn't syntactically correct
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub struct SyntaxError {
    /// The most relevant diagnostic, absent if the program was empty
    pub diagnostic: Option<GrammarError>,
}

impl Display for SyntaxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Syntax is wrong!")?;
        match &self.diagnostic {
            Some(diagnostic) => write!(f, "\n{diagnostic}"),
            None => write!(f, "\nEmpty program"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use l1_tokens::token::TokenKind;

    #[test]
    fn test_diagnostic_text() {
        let lexemes = vec![
            Lexeme::new(4, "y", TokenKind::Identifier),
            Lexeme::new(4, "=", TokenKind::Assign),
        ];
        let error = GrammarError::new(
            Rule::Assignment,
            "invalid expression".to_string(),
            &lexemes,
            0,
        );
        assert_eq!(
            error.to_string(),
            "Wrong assignment (invalid expression) on line 4: y ="
        );
        let error = GrammarError::new(Rule::ForLoop, None, &lexemes, 0);
        assert_eq!(error.to_string(), "Wrong for loop on line 4: y =");
        assert_eq!(
            SyntaxError {
                diagnostic: Some(error)
            }
            .to_string(),
            "Syntax is wrong!\nWrong for loop on line 4: y ="
        );
    }
}
