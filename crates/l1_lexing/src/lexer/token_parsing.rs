use std::str::FromStr;

use l1_common::nom_helpers::{recognize_identifier, recognize_number, recognize_quoted, recognize_real};
use l1_tokens::token::{
    AddOp, Bracket, ConditionKeyword, Declaration, LoopKeyword, MultOp, RelOp, TokenKind,
    TypeKeyword,
};
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, one_of, satisfy};
use nom::combinator::{all_consuming, map, map_res, recognize, rest, value};
use nom::error::{context, VerboseError};
use nom::IResult;

type Result<'a, O, E = &'a str> = IResult<&'a str, O, VerboseError<E>>;

/// Cuts a row into its segments.
///
/// Delimiters are segments of their own, and so is the text between two delimiters. Blank
/// segments are dropped.
pub fn segment_row(row: &str) -> Vec<&str> {
    let mut segments = vec![];
    let mut start = 0;
    let mut offset = 0;
    while offset < row.len() {
        match parse_delimiter(&row[offset..]) {
            Ok((rest, delimiter)) => {
                if start < offset {
                    segments.push(&row[start..offset]);
                }
                segments.push(delimiter);
                offset = row.len() - rest.len();
                start = offset;
            }
            Err(_) => {
                offset += row[offset..]
                    .chars()
                    .next()
                    .map(char::len_utf8)
                    .unwrap_or(1);
            }
        }
    }
    if start < row.len() {
        segments.push(&row[start..]);
    }
    segments.retain(|segment| !segment.trim().is_empty());
    segments
}

fn parse_delimiter(src: &str) -> Result<&str> {
    context(
        "delimiter",
        alt((
            context("string", recognize_quoted),
            context("real", recognize_real),
            context(
                "whitespace",
                recognize(satisfy(|c| c.is_ascii_whitespace() || c == '\x0B')),
            ),
            context(
                "relational operator",
                alt((tag(">="), tag("<="), tag("=="), tag("!="), tag(">"), tag("<"))),
            ),
            context("operator", recognize(one_of("+-*/^:=()"))),
        )),
    )(src)
}

/// Classifies a whole segment into a token kind.
///
/// Kinds are tried in a fixed priority order, constants and keywords before identifiers.
/// Returns `None` if no kind matches the entire segment.
pub fn classify(segment: &str) -> Option<TokenKind> {
    alt((
        value(TokenKind::Constant, all_consuming(parse_constant)),
        map(all_consuming(parse_word::<Declaration>), TokenKind::Declaration),
        map(all_consuming(parse_word::<LoopKeyword>), TokenKind::Loop),
        map(all_consuming(parse_word::<ConditionKeyword>), TokenKind::Condition),
        value(TokenKind::Jump, all_consuming(tag("goto"))),
        map(all_consuming(parse_word::<TypeKeyword>), TokenKind::Type),
        value(TokenKind::Assign, all_consuming(char('='))),
        map(all_consuming(parse_word::<AddOp>), TokenKind::AddOp),
        map(all_consuming(parse_word::<MultOp>), TokenKind::MultOp),
        value(TokenKind::PowOp, all_consuming(char('^'))),
        map(all_consuming(parse_word::<RelOp>), TokenKind::RelOp),
        map(all_consuming(parse_word::<Bracket>), TokenKind::Bracket),
        value(TokenKind::Punct, all_consuming(char(':'))),
        value(TokenKind::Identifier, all_consuming(recognize_identifier)),
    ))(segment)
    .ok()
    .map(|(_, kind)| kind)
}

fn parse_constant(src: &str) -> Result<&str> {
    context(
        "constant",
        alt((tag("true"), tag("false"), recognize_quoted, recognize_number)),
    )(src)
}

/// Parses the whole input as the spelling of `K`
fn parse_word<K: FromStr>(src: &str) -> Result<K> {
    context("word", map_res(rest, K::from_str))(src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_segment_row() {
        assert_eq!(
            segment_row("val x: number = 3+4"),
            vec!["val", "x", ":", "number", "=", "3", "+", "4"]
        );
        assert_eq!(segment_row("if a>=b then goto L"), vec!["if", "a", ">=", "b", "then", "goto", "L"]);
        assert_eq!(segment_row("x==1.5e+3"), vec!["x", "==", "1.5e+3"]);
        assert_eq!(segment_row("s = 'a b'"), vec!["s", "=", "'a b'"]);
        assert_eq!(segment_row("x1.5"), vec!["x", "1.5"]);
        assert_eq!(segment_row("a$b + 1"), vec!["a$b", "+", "1"]);
        assert!(segment_row("   \t").is_empty());
    }

    #[test]
    fn test_classify_priority() {
        assert_eq!(classify("true"), Some(TokenKind::Constant));
        assert_eq!(classify("'str'"), Some(TokenKind::Constant));
        assert_eq!(classify("12"), Some(TokenKind::Constant));
        assert_eq!(classify("1.5e-2"), Some(TokenKind::Constant));
        assert_eq!(classify("var"), Some(TokenKind::Declaration(Declaration::Var)));
        assert_eq!(classify("do"), Some(TokenKind::Loop(LoopKeyword::Do)));
        assert_eq!(classify("then"), Some(TokenKind::Condition(ConditionKeyword::Then)));
        assert_eq!(classify("goto"), Some(TokenKind::Jump));
        assert_eq!(classify("boolean"), Some(TokenKind::Type(TypeKeyword::Boolean)));
        assert_eq!(classify("="), Some(TokenKind::Assign));
        assert_eq!(classify("=="), Some(TokenKind::RelOp(RelOp::Eq)));
        assert_eq!(classify("-"), Some(TokenKind::AddOp(AddOp::Minus)));
        assert_eq!(classify("^"), Some(TokenKind::PowOp));
        assert_eq!(classify(")"), Some(TokenKind::Bracket(Bracket::Close)));
        assert_eq!(classify(":"), Some(TokenKind::Punct));
    }

    #[test]
    fn test_keywords_only_match_whole_words() {
        assert_eq!(classify("value"), Some(TokenKind::Identifier));
        assert_eq!(classify("format"), Some(TokenKind::Identifier));
        assert_eq!(classify("truest"), Some(TokenKind::Identifier));
        assert_eq!(classify("x_1"), Some(TokenKind::Identifier));
    }

    #[test]
    fn test_unclassifiable() {
        assert_eq!(classify("a$b"), None);
        assert_eq!(classify("1e5"), None);
        assert_eq!(classify("'open"), None);
        assert_eq!(classify("!"), None);
        assert_eq!(classify("_x"), None);
    }
}
