//! Infix to postfix conversion

use l1_rpn::Op;
use l1_tokens::token::{AddOp, Bracket, Lexeme, TokenKind};
use tracing::trace;

/// An item of a postfix sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Postfix<'a> {
    /// A constant or identifier lexeme
    Operand(&'a Lexeme),
    /// An operator and the row of the lexeme it came from
    Op(Op, usize),
}

#[derive(Debug)]
enum Pending {
    Open,
    Op(Op, usize),
}

/// Converts an infix run of lexemes into postfix order with the shunting-yard algorithm.
///
/// Operators of equal priority pop each other, so binary operators are left associative. A `-`
/// at the start or right after another operator negates, a `+` in the same place is dropped.
/// `val` and `var` are prefix operators binding tighter than anything else.
pub fn to_postfix<'a, I>(lexemes: I) -> Vec<Postfix<'a>>
where
    I: IntoIterator<Item = &'a Lexeme>,
{
    let mut output = vec![];
    let mut stack: Vec<Pending> = vec![];
    let mut after_operand = false;

    for lexeme in lexemes {
        let row = lexeme.row();
        match lexeme.kind() {
            TokenKind::Identifier | TokenKind::Constant => {
                output.push(Postfix::Operand(lexeme));
                after_operand = true;
            }
            TokenKind::Bracket(Bracket::Open) => {
                stack.push(Pending::Open);
                after_operand = false;
            }
            TokenKind::Bracket(Bracket::Close) => {
                while let Some(pending) = stack.pop() {
                    match pending {
                        Pending::Open => break,
                        Pending::Op(op, row) => output.push(Postfix::Op(op, row)),
                    }
                }
                after_operand = true;
            }
            TokenKind::AddOp(sign) if !after_operand => match sign {
                AddOp::Minus => stack.push(Pending::Op(Op::Negate, row)),
                AddOp::Plus => {}
            },
            TokenKind::Declaration(declaration) => {
                stack.push(Pending::Op(Op::from(*declaration), row));
                after_operand = false;
            }
            kind => {
                let Some((op, priority)) =
                    Op::from_token(kind).and_then(|op| Some((op, op.priority()?)))
                else {
                    trace!("skipping {lexeme:?} in infix expression");
                    continue;
                };
                while let Some(Pending::Op(top, top_row)) = stack.last() {
                    if top.priority().unwrap_or_default() < priority {
                        break;
                    }
                    output.push(Postfix::Op(*top, *top_row));
                    stack.pop();
                }
                stack.push(Pending::Op(op, row));
                after_operand = false;
            }
        }
    }

    while let Some(pending) = stack.pop() {
        if let Pending::Op(op, row) = pending {
            output.push(Postfix::Op(op, row));
        }
    }
    output
}
