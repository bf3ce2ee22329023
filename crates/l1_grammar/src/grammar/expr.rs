//! Expression recognizers.
//!
//! These only check whether a run of lexemes has the shape of an expression, they never emit
//! anything. Binary productions find their operator with [find_operator_before_suffix]: the
//! right operand is the shortest suffix accepted by the higher production, and the operator has
//! to sit right before it.

use l1_tokens::token::{Bracket, Lexeme, TokenKind};

/// Grows a suffix of `lexemes` from the right, one lexeme at a time, until `predicate` accepts it.
///
/// The suffix never includes the first lexeme. Returns the index of the lexeme right before the
/// first accepted suffix, or `None` if no suffix was accepted.
pub fn find_operator_before_suffix<F>(lexemes: &[Lexeme], mut predicate: F) -> Option<usize>
where
    F: FnMut(&[Lexeme]) -> bool,
{
    (1..lexemes.len())
        .rev()
        .find(|&start| predicate(&lexemes[start..]))
        .map(|start| start - 1)
}

pub fn expression(lexemes: &[Lexeme]) -> bool {
    arithm_expression(lexemes) || bool_expression(lexemes) || string(lexemes)
}

/// `Boolean | Identifier | ArithmExpression RelOp ArithmExpression`
///
/// Arithmetic expressions never contain relational operators, so the relational operator splits
/// the two sides.
pub fn bool_expression(lexemes: &[Lexeme]) -> bool {
    if boolean(lexemes) || identifier(lexemes) {
        return true;
    }
    if lexemes.len() < 3 {
        return false;
    }
    let Some(index) = lexemes
        .iter()
        .position(|lexeme| matches!(lexeme.kind(), TokenKind::RelOp(_)))
    else {
        return false;
    };
    arithm_expression(&lexemes[..index]) && arithm_expression(&lexemes[index + 1..])
}

/// `[sign] Term | ArithmExpression AddOp Term`
pub fn arithm_expression(lexemes: &[Lexeme]) -> bool {
    if lexemes.is_empty() {
        return false;
    }
    let signed = lexemes.len() > 1 && matches!(lexemes[0].kind(), TokenKind::AddOp(_));
    let term = if signed {
        term(&lexemes[1..])
    } else {
        term(lexemes)
    };
    if term {
        return true;
    }
    if lexemes.len() < 3 {
        return false;
    }
    match find_operator_before_suffix(lexemes, self::term) {
        Some(index) if matches!(lexemes[index].kind(), TokenKind::AddOp(_)) => {
            arithm_expression(&lexemes[..index])
        }
        _ => false,
    }
}

/// `Factor | Term (MultOp | PowOp) Factor`
pub fn term(lexemes: &[Lexeme]) -> bool {
    if factor(lexemes) {
        return true;
    }
    if lexemes.len() < 3 {
        return false;
    }
    match find_operator_before_suffix(lexemes, factor) {
        Some(index)
            if matches!(
                lexemes[index].kind(),
                TokenKind::MultOp(_) | TokenKind::PowOp
            ) =>
        {
            term(&lexemes[..index])
        }
        _ => false,
    }
}

/// `Identifier | UnsignedNumber | ( ArithmExpression )`
pub fn factor(lexemes: &[Lexeme]) -> bool {
    if identifier(lexemes) || unsigned_number(lexemes) {
        return true;
    }
    if lexemes.len() < 3 {
        return false;
    }
    let bracketed = lexemes[0].is(TokenKind::Bracket(Bracket::Open))
        && lexemes[lexemes.len() - 1].is(TokenKind::Bracket(Bracket::Close));
    bracketed && arithm_expression(&lexemes[1..lexemes.len() - 1])
}

pub fn identifier(lexemes: &[Lexeme]) -> bool {
    matches!(lexemes, [lexeme] if lexeme.is_identifier())
}

pub fn unsigned_number(lexemes: &[Lexeme]) -> bool {
    matches!(lexemes, [lexeme] if lexeme.is_constant() && lexeme.text().starts_with(|c: char| c.is_ascii_digit()))
}

pub fn boolean(lexemes: &[Lexeme]) -> bool {
    matches!(lexemes, [lexeme] if lexeme.is_constant() && matches!(lexeme.text(), "true" | "false"))
}

pub fn string(lexemes: &[Lexeme]) -> bool {
    matches!(lexemes, [lexeme] if lexeme.is_constant() && lexeme.text().starts_with('\''))
}
