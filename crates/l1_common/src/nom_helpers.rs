//! nom helpers

use nom::branch::alt;
use nom::bytes::complete::{tag, take_till};
use nom::character::complete::{alpha1, alphanumeric1, char, digit1, one_of};
use nom::combinator::{opt, recognize};
use nom::error::ParseError;
use nom::multi::many0_count;
use nom::sequence::{delimited, pair, tuple};
use nom::IResult;

/// Recognizes `[a-zA-Z]+\w*`
pub fn recognize_identifier<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    recognize(pair(alpha1, many0_count(alt((alphanumeric1, tag("_"))))))(input)
}

/// Recognizes the part of a number following its integer digits, either a fraction or an
/// optional fraction followed by a signed exponent.
fn recognize_fraction_or_exponent<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    alt((
        recognize(tuple((
            opt(pair(char('.'), digit1)),
            char('e'),
            one_of("+-"),
            digit1,
        ))),
        recognize(pair(char('.'), digit1)),
    ))(input)
}

/// Recognizes a number that isn't a plain integer, like `1.5` or `2e+10`
pub fn recognize_real<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    recognize(pair(digit1, recognize_fraction_or_exponent))(input)
}

/// Recognizes any unsigned number, integers included
pub fn recognize_number<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    recognize(pair(digit1, opt(recognize_fraction_or_exponent)))(input)
}

/// Recognizes a single quoted string, quotes included. Strings can't contain quotes.
pub fn recognize_quoted<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    recognize(delimited(char('\''), take_till(|c: char| c == '\''), char('\'')))(input)
}
