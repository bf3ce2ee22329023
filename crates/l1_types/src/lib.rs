#![doc = include_str!("../README.md")]

pub mod table;
pub mod value;

pub use table::{ConstantEntry, ConstantTable, IdentifierEntry, IdentifierTable, Tables};
pub use value::{Binding, Literal, ValueType};
