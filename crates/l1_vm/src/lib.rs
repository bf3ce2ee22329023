#![doc = include_str!("../README.md")]

pub mod vm;

pub use vm::error::{RuntimeError, RuntimeErrorKind};
pub use vm::{interpret, Interpreter, Operand};
