#![doc = include_str!("../README.md")]

pub mod grammar;

pub use grammar::{parse, GrammarError, Parser, Program, Rule, SyntaxError};
