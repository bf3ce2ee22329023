use l1_tokens::token::{AddOp, Declaration, MultOp, RelOp, TokenKind};
use std::fmt::{Display, Formatter};
use strum::{AsRefStr, EnumIter, EnumString};

impl Display for Op {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

/// An operator, spelled the way it's listed
#[derive(Debug, Eq, PartialEq, Hash, Clone, Copy, AsRefStr, EnumString, EnumIter)]
pub enum Op {
    /// Unary minus
    #[strum(serialize = "@")]
    Negate,
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Subtract,
    #[strum(serialize = "*")]
    Mult,
    #[strum(serialize = "/")]
    Divide,
    #[strum(serialize = "^")]
    Pow,

    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Neq,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Gte,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Lte,

    #[strum(serialize = "=")]
    Assign,
    /// Defines an immutable identifier
    #[strum(serialize = "val")]
    Val,
    /// Defines a modifiable identifier
    #[strum(serialize = "var")]
    Var,

    /// Unconditional jump to a mark
    #[strum(serialize = "goto")]
    Goto,
    /// Jumps to a mark when the condition below it is false
    #[strum(serialize = "if")]
    If,
    /// Places the mark below it
    #[strum(serialize = ":")]
    Label,
}

impl Op {
    /// The precedence of this operator when converting infix to postfix, higher binds tighter.
    ///
    /// Control flow operators are never part of an infix expression and have none.
    pub fn priority(&self) -> Option<u8> {
        match self {
            Op::Assign => Some(2),
            Op::Eq | Op::Neq | Op::Gt | Op::Gte | Op::Lt | Op::Lte => Some(3),
            Op::Add | Op::Subtract => Some(4),
            Op::Mult | Op::Divide => Some(5),
            Op::Pow => Some(6),
            Op::Negate => Some(7),
            Op::Val | Op::Var => Some(8),
            Op::Goto | Op::If | Op::Label => None,
        }
    }

    /// Whether this operator takes a single operand
    pub fn is_unary(&self) -> bool {
        matches!(self, Op::Negate | Op::Val | Op::Var | Op::Goto | Op::Label)
    }

    /// Gets the operator a token stands for in an expression, if any
    pub fn from_token(kind: &TokenKind) -> Option<Op> {
        match kind {
            TokenKind::Declaration(declaration) => Some(Op::from(*declaration)),
            TokenKind::Assign => Some(Op::Assign),
            TokenKind::AddOp(op) => Some(Op::from(*op)),
            TokenKind::MultOp(op) => Some(Op::from(*op)),
            TokenKind::PowOp => Some(Op::Pow),
            TokenKind::RelOp(op) => Some(Op::from(*op)),
            _ => None,
        }
    }
}

impl From<Declaration> for Op {
    fn from(value: Declaration) -> Self {
        match value {
            Declaration::Val => Op::Val,
            Declaration::Var => Op::Var,
        }
    }
}

impl From<AddOp> for Op {
    fn from(value: AddOp) -> Self {
        match value {
            AddOp::Plus => Op::Add,
            AddOp::Minus => Op::Subtract,
        }
    }
}

impl From<MultOp> for Op {
    fn from(value: MultOp) -> Self {
        match value {
            MultOp::Star => Op::Mult,
            MultOp::Slash => Op::Divide,
        }
    }
}

impl From<RelOp> for Op {
    fn from(value: RelOp) -> Self {
        match value {
            RelOp::Gte => Op::Gte,
            RelOp::Lte => Op::Lte,
            RelOp::Eq => Op::Eq,
            RelOp::Neq => Op::Neq,
            RelOp::Gt => Op::Gt,
            RelOp::Lt => Op::Lt,
        }
    }
}
