#![doc = include_str!("../README.md")]

mod compiler;
pub mod listing;

pub use compiler::*;
