#![doc = include_str!("../README.md")]

pub mod debug;
pub mod rpn;

pub use rpn::{Instr, Op, Record, Rpn};
