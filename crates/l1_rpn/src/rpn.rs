//! The RPN program

use itertools::Itertools;
use l1_types::Tables;
use std::fmt::{Debug, Formatter};
use std::ops::Index;

pub use op::*;

mod op;

/// One instruction of an RPN program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instr {
    /// Pushes a reference to a constant table entry
    Constant(usize),
    /// Pushes a reference to an identifier table entry
    Identifier(usize),
    Op(Op),
}

impl Instr {
    /// Gets the text of this instruction, resolving table references
    pub fn text(&self, tables: &Tables) -> String {
        match self {
            Instr::Constant(index) => tables
                .constants
                .get(*index)
                .map(|constant| constant.literal().to_string())
                .unwrap_or_else(|| format!("#c{index}")),
            Instr::Identifier(index) => tables
                .identifiers
                .get(*index)
                .map(|identifier| identifier.name().to_string())
                .unwrap_or_else(|| format!("#i{index}")),
            Instr::Op(op) => op.to_string(),
        }
    }

    pub fn as_op(&self) -> Option<Op> {
        match self {
            Instr::Op(op) => Some(*op),
            _ => None,
        }
    }
}

impl From<Op> for Instr {
    fn from(value: Op) -> Self {
        Instr::Op(value)
    }
}

/// An instruction along with the source row it was generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub row: usize,
    pub instr: Instr,
}

/// An RPN program
#[derive(Default, Clone, PartialEq)]
pub struct Rpn {
    records: Vec<Record>,
}

impl Debug for Rpn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.records.iter().map(|record| record.instr))
            .finish()
    }
}

impl Rpn {
    /// Creates a new empty program
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an instruction
    pub fn push(&mut self, row: usize, instr: impl Into<Instr>) {
        self.records.push(Record {
            row,
            instr: instr.into(),
        });
    }

    pub fn push_constant(&mut self, row: usize, index: usize) {
        self.push(row, Instr::Constant(index));
    }

    pub fn push_identifier(&mut self, row: usize, index: usize) {
        self.push(row, Instr::Identifier(index));
    }

    /// Appends every record of another program
    pub fn extend(&mut self, other: Rpn) {
        self.records.extend(other.records);
    }

    /// Splits the program in two at the given index, returning the records from `at` on
    pub fn split_off(&mut self, at: usize) -> Rpn {
        Rpn {
            records: self.records.split_off(at),
        }
    }

    /// Drops every record at or after `len`
    pub fn truncate(&mut self, len: usize) {
        self.records.truncate(len);
    }

    /// Gets the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Checks if this program is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Finds the position right after the first `mark :` pair for the given mark.
    ///
    /// Scans the whole program, so labels after and before the jump are both found.
    pub fn find_label(&self, mark: usize) -> Option<usize> {
        self.records
            .iter()
            .tuple_windows()
            .position(|(first, second)| {
                first.instr == Instr::Identifier(mark) && second.instr == Instr::Op(Op::Label)
            })
            .map(|position| position + 2)
    }

    /// Space separated text of every instruction
    pub fn to_text(&self, tables: &Tables) -> String {
        self.records
            .iter()
            .map(|record| record.instr.text(tables))
            .join(" ")
    }
}

impl Index<usize> for Rpn {
    type Output = Record;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a Rpn {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> Tables {
        let mut tables = Tables::new();
        tables.identifiers.intern("x");
        tables.identifiers.intern("L");
        tables.constants.intern_text("3");
        tables
    }

    #[test]
    fn test_to_text() {
        let tables = tables();
        let mut rpn = Rpn::new();
        rpn.push_identifier(1, 0);
        rpn.push(1, Op::Val);
        rpn.push_constant(1, 0);
        rpn.push(1, Op::Negate);
        rpn.push(1, Op::Assign);
        assert_eq!(rpn.to_text(&tables), "x val 3 @ =");
        assert_eq!(rpn.len(), 5);
        rpn.truncate(2);
        assert_eq!(rpn.to_text(&tables), "x val");
    }

    #[test]
    fn test_find_label() {
        let mut rpn = Rpn::new();
        rpn.push_identifier(1, 1);
        rpn.push(1, Op::Goto);
        rpn.push_identifier(2, 0);
        rpn.push_identifier(3, 1);
        rpn.push(3, Op::Label);
        assert_eq!(rpn.find_label(1), Some(5));
        assert_eq!(rpn.find_label(0), None);
    }
}
