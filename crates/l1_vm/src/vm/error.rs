use l1_rpn::Op;
use l1_tokens::RowError;
use l1_types::ValueType;

use crate::vm::Operand;

/// A runtime error, along with the row of the record that raised it
pub type RuntimeError = RowError<RuntimeErrorKind>;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum RuntimeErrorKind {
    #[error("Variable {0:?} is used before it was initialized")]
    Uninitialized(String),
    #[error("Variable {0:?} is already defined")]
    Redefined(String),
    #[error("Variable {0:?} can not be modified")]
    NotModifiable(String),
    #[error("Can not {op} on {found}, expected {expected}")]
    TypeMismatch {
        op: Op,
        expected: ValueType,
        found: ValueType,
    },
    #[error("{0:?} is not a mark")]
    UnknownMark(String),
    #[error("No label for mark {0:?}")]
    LabelNotFound(String),
    #[error("No operand on stack for {0}")]
    StackUnderflow(Op),
    #[error("{0} expects an identifier")]
    NotAnIdentifier(Op),
    #[error("No table entry for {0:?}")]
    InvalidReference(Operand),
    #[error("Step limit of {0} exceeded")]
    StepLimitExceeded(usize),
}
