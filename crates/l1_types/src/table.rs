//! The constant and identifier tables.
//!
//! Both tables are insertion ordered and dense: the n-th interned entry has index n.

use crate::value::{Binding, Literal, ValueType};
use indexmap::IndexMap;
use l1_tokens::token::{Lexeme, TokenKind};
use log::trace;
use std::fmt::{Display, Formatter};

/// An interned constant
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantEntry {
    literal: String,
    value: Literal,
    index: usize,
}

impl ConstantEntry {
    /// The literal text this constant was interned under
    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn value(&self) -> &Literal {
        &self.value
    }

    pub fn value_type(&self) -> ValueType {
        self.value.value_type()
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl Display for ConstantEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<15} {:<8} {}",
            self.literal,
            self.value_type().as_ref(),
            self.index
        )
    }
}

/// Constants deduplicated by their literal text
#[derive(Debug, Default, Clone)]
pub struct ConstantTable {
    entries: IndexMap<String, ConstantEntry>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns the source text of a constant lexeme, returning `None` if the text isn't a
    /// literal.
    pub fn intern_text(&mut self, text: &str) -> Option<usize> {
        if let Some(index) = self.entries.get_index_of(text) {
            return Some(index);
        }
        let value = Literal::parse(text)?;
        Some(self.insert(text.to_string(), value))
    }

    /// Interns a value by its canonical literal text
    pub fn intern(&mut self, value: Literal) -> usize {
        let literal = value.literal_text();
        match self.entries.get_index_of(&literal) {
            Some(index) => index,
            None => self.insert(literal, value),
        }
    }

    fn insert(&mut self, literal: String, value: Literal) -> usize {
        let index = self.entries.len();
        trace!("interned constant {literal} at {index}");
        self.entries.insert(
            literal.clone(),
            ConstantEntry {
                literal,
                value,
                index,
            },
        );
        index
    }

    /// Drops every entry at or after `len`
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn get(&self, index: usize) -> Option<&ConstantEntry> {
        self.entries.get_index(index).map(|(_, entry)| entry)
    }

    /// Gets the index of an already interned literal
    pub fn index_of(&self, literal: &str) -> Option<usize> {
        self.entries.get_index_of(literal)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConstantEntry> {
        self.entries.values()
    }
}

/// An interned identifier
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifierEntry {
    name: String,
    value_type: ValueType,
    binding: Binding,
    modifiable: bool,
    index: usize,
}

impl IdentifierEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn set_value_type(&mut self, value_type: ValueType) {
        self.value_type = value_type;
    }

    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    pub fn set_binding(&mut self, binding: Binding) {
        self.binding = binding;
    }

    /// The assigned value, if any
    pub fn value(&self) -> Option<&Literal> {
        self.binding.value()
    }

    /// Whether this identifier was declared with `var`
    pub fn modifiable(&self) -> bool {
        self.modifiable
    }

    pub fn set_modifiable(&mut self, modifiable: bool) {
        self.modifiable = modifiable;
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

impl Display for IdentifierEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<15} {:<8} {:<10} {:<6} {}",
            self.name,
            self.value_type.as_ref(),
            self.binding.to_string(),
            self.modifiable,
            self.index
        )
    }
}

/// Prefix of generated jump targets. The lexer never produces identifiers starting with `_`.
pub const MARK_PREFIX: &str = "_m";

/// Identifiers deduplicated by name
#[derive(Debug, Default, Clone)]
pub struct IdentifierTable {
    entries: IndexMap<String, IdentifierEntry>,
}

impl IdentifierTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns an identifier by name, creating an undeclared placeholder on first sight
    pub fn intern(&mut self, name: &str) -> usize {
        if let Some(index) = self.entries.get_index_of(name) {
            return index;
        }
        let index = self.entries.len();
        trace!("interned identifier {name} at {index}");
        self.entries.insert(
            name.to_string(),
            IdentifierEntry {
                name: name.to_string(),
                value_type: ValueType::Undef,
                binding: Binding::Undef,
                modifiable: false,
                index,
            },
        );
        index
    }

    /// Appends a fresh jump target
    pub fn push_mark(&mut self) -> usize {
        let index = self.intern(&format!("{MARK_PREFIX}{}", self.entries.len()));
        if let Some(entry) = self.get_mut(index) {
            entry.value_type = ValueType::Mark;
        }
        index
    }

    /// Drops every entry at or after `len`.
    ///
    /// Only used to undo entries created by an attempt that got rejected.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    pub fn get(&self, index: usize) -> Option<&IdentifierEntry> {
        self.entries.get_index(index).map(|(_, entry)| entry)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut IdentifierEntry> {
        self.entries.get_index_mut(index).map(|(_, entry)| entry)
    }

    /// Looks up an identifier by name
    pub fn by_name(&self, name: &str) -> Option<&IdentifierEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IdentifierEntry> {
        self.entries.values()
    }

    /// Iterates over the generated jump targets
    pub fn marks(&self) -> impl Iterator<Item = &IdentifierEntry> {
        self.iter()
            .filter(|entry| entry.name.starts_with(MARK_PREFIX))
    }
}

/// The constant and identifier tables of one pipeline run
#[derive(Debug, Default, Clone)]
pub struct Tables {
    pub constants: ConstantTable,
    pub identifiers: IdentifierTable,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns every constant and identifier lexeme, linking each one to its table entry.
    ///
    /// Constant lexemes whose text isn't a literal are left unlinked.
    pub fn intern_lexemes(&mut self, lexemes: &mut [Lexeme]) {
        for lexeme in lexemes.iter_mut() {
            let index = match lexeme.kind() {
                TokenKind::Constant => self.constants.intern_text(lexeme.text()),
                TokenKind::Identifier => Some(self.identifiers.intern(lexeme.text())),
                _ => None,
            };
            if let Some(index) = index {
                lexeme.set_table_index(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_dedup_by_text() {
        let mut table = ConstantTable::new();
        assert_eq!(table.intern_text("3"), Some(0));
        assert_eq!(table.intern_text("'a'"), Some(1));
        assert_eq!(table.intern_text("3"), Some(0));
        assert_eq!(table.intern(Literal::Number(3.0)), 0);
        assert_eq!(table.intern(Literal::Number(7.0)), 2);
        assert_eq!(table.get(1).unwrap().value_type(), ValueType::String);
        assert_eq!(table.intern_text("nope"), None);
    }

    #[test]
    fn test_marks_are_distinct_and_typed() {
        let mut table = IdentifierTable::new();
        table.intern("x");
        let first = table.push_mark();
        let second = table.push_mark();
        assert_ne!(first, second);
        assert_eq!(table.marks().count(), 2);
        assert!(table.marks().all(|mark| mark.value_type() == ValueType::Mark));
        table.truncate(1);
        assert_eq!(table.len(), 1);
        assert_eq!(table.marks().count(), 0);
    }

    #[test]
    fn test_identifier_listing() {
        let mut table = IdentifierTable::new();
        let x = table.intern("x");
        let entry = table.get_mut(x).unwrap();
        entry.set_value_type(ValueType::Number);
        entry.set_binding(Binding::Value(Literal::Number(7.0)));
        assert_eq!(
            table.get(x).unwrap().to_string(),
            format!("{:<15} {:<8} {:<10} {:<6} 0", "x", "NUMBER", "7", "false")
        );
    }
}
