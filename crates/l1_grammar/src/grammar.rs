//! The statement recognizer and RPN generator

use crate::grammar::expr::{
    arithm_expression, bool_expression, boolean, expression, find_operator_before_suffix,
    identifier, string,
};
use crate::grammar::infix::{to_postfix, Postfix};
use itertools::Itertools;
use l1_rpn::{Op, Rpn};
use l1_tokens::token::{ConditionKeyword, Declaration, Lexeme, LoopKeyword, TokenKind};
use l1_types::{Literal, Tables, ValueType};
use std::cmp::Reverse;
use std::ops::Range;
use tracing::{debug, instrument, trace};

mod error;
pub mod expr;
pub mod infix;

pub use error::*;

/// A syntactically correct program, lowered into RPN
#[derive(Debug, Clone)]
pub struct Program {
    pub rpn: Rpn,
    /// The tables, with types assigned and synthetic marks appended
    pub tables: Tables,
}

/// Where a transaction started
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    rpn: usize,
    constants: usize,
    identifiers: usize,
    journal: usize,
}

/// Recognizes statements and lowers them into RPN.
///
/// Lexemes are expected to be linked to the tables the parser was created with.
#[derive(Debug)]
pub struct Parser {
    tables: Tables,
    rpn: Rpn,
    /// Previous types of identifiers whose type was changed, used for rolling back
    journal: Vec<(usize, ValueType)>,
    diagnostics: Vec<GrammarError>,
    depth: usize,
}

impl Parser {
    /// Creates a new parser over the given tables
    pub fn new(tables: Tables) -> Self {
        Self {
            tables,
            rpn: Rpn::new(),
            journal: vec![],
            diagnostics: vec![],
            depth: 0,
        }
    }

    /// Parses a whole program.
    ///
    /// On failure, the reported diagnostic is the most deeply nested one recorded while trying
    /// the last pending statement.
    #[instrument(skip_all, fields(lexemes = lexemes.len()))]
    pub fn parse(mut self, lexemes: &[Lexeme]) -> Result<Program, SyntaxError> {
        if lexemes.is_empty() {
            return Err(SyntaxError { diagnostic: None });
        }
        match self.statement_list(lexemes) {
            Ok(()) => {
                debug!("lowered into {} records", self.rpn.len());
                Ok(Program {
                    rpn: self.rpn,
                    tables: self.tables,
                })
            }
            Err(pending) => {
                let diagnostic = self
                    .diagnostics
                    .iter()
                    .min_by_key(|diagnostic| Reverse(diagnostic.depth))
                    .cloned()
                    .unwrap_or_else(|| GrammarError::new(Rule::Statement, None, pending, 0));
                debug!("syntax is wrong: {diagnostic}");
                Err(SyntaxError {
                    diagnostic: Some(diagnostic),
                })
            }
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            rpn: self.rpn.len(),
            constants: self.tables.constants.len(),
            identifiers: self.tables.identifiers.len(),
            journal: self.journal.len(),
        }
    }

    fn rollback(&mut self, checkpoint: Checkpoint) {
        self.rpn.truncate(checkpoint.rpn);
        self.tables.constants.truncate(checkpoint.constants);
        self.tables.identifiers.truncate(checkpoint.identifiers);
        for (index, previous) in self.journal.drain(checkpoint.journal..).rev() {
            if let Some(entry) = self.tables.identifiers.get_mut(index) {
                entry.set_value_type(previous);
            }
        }
    }

    /// Runs `f`, undoing everything it did if it returns `false`
    fn attempt<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&mut Self) -> bool,
    {
        let checkpoint = self.checkpoint();
        if f(self) {
            true
        } else {
            self.rollback(checkpoint);
            false
        }
    }

    /// Records a diagnostic for a rule that was committed to, always returns `false`
    fn wrong(&mut self, rule: Rule, detail: &str, lexemes: &[Lexeme]) -> bool {
        let error = GrammarError::new(rule, detail.to_string(), lexemes, self.depth);
        trace!("{error}");
        self.diagnostics.push(error);
        false
    }

    fn set_type(&mut self, index: usize, value_type: ValueType) {
        if let Some(entry) = self.tables.identifiers.get_mut(index) {
            self.journal.push((index, entry.value_type()));
            entry.set_value_type(value_type);
        }
    }

    /// Emits the postfix form of an infix run of lexemes
    fn emit_infix<'a, I>(&mut self, lexemes: I)
    where
        I: IntoIterator<Item = &'a Lexeme>,
    {
        for item in to_postfix(lexemes) {
            match item {
                Postfix::Operand(lexeme) => {
                    let row = lexeme.row();
                    match self.operand_index(lexeme) {
                        Some(index) if lexeme.is_constant() => self.rpn.push_constant(row, index),
                        Some(index) => self.rpn.push_identifier(row, index),
                        None => trace!("{lexeme:?} isn't a literal"),
                    }
                }
                Postfix::Op(op, row) => self.rpn.push(row, op),
            }
        }
    }

    fn operand_index(&mut self, lexeme: &Lexeme) -> Option<usize> {
        lexeme.table_index().or_else(|| {
            if lexeme.is_constant() {
                self.tables.constants.intern_text(lexeme.text())
            } else {
                Some(self.tables.identifiers.intern(lexeme.text()))
            }
        })
    }

    /// Tries every row group as a statement, joining it with the following row groups while it
    /// isn't one.
    ///
    /// Diagnostics recorded while trying a statement are dropped once it's recognized. Returns the
    /// lexemes that never formed a statement on failure.
    fn statement_list<'l>(&mut self, lexemes: &'l [Lexeme]) -> Result<(), &'l [Lexeme]> {
        let groups = row_groups(lexemes);
        if groups.is_empty() {
            return Err(lexemes);
        }
        // first lexeme of the pending statement, and the diagnostics recorded before it
        let mut pending: Option<(usize, usize)> = None;
        for group in groups {
            if self.depth == 0 {
                self.diagnostics.clear();
            }
            let (start, recorded) = pending.unwrap_or((group.start, self.diagnostics.len()));
            let recorded = recorded.min(self.diagnostics.len());
            let candidate = &lexemes[start..group.end];
            if self.statement(candidate) {
                self.diagnostics.truncate(recorded);
                pending = None;
            } else {
                trace!("no statement in rows {}", rows_of(candidate));
                pending = Some((start, recorded));
            }
        }
        match pending {
            None => Ok(()),
            Some((start, _)) => Err(&lexemes[start..]),
        }
    }

    fn statement(&mut self, lexemes: &[Lexeme]) -> bool {
        self.attempt(|p| p.declaration(lexemes))
            || self.attempt(|p| p.constant_definition(lexemes))
            || self.attempt(|p| p.assignment(lexemes))
            || self.attempt(|p| p.loop_statement(lexemes))
            || self.attempt(|p| p.condition(lexemes))
            || self.attempt(|p| p.goto(lexemes))
            || self.attempt(|p| p.label_mark(lexemes))
    }

    /// `(val|var) IDENTIFIER [: TYPE] [= Expression]`
    fn declaration(&mut self, lexemes: &[Lexeme]) -> bool {
        let Some(TokenKind::Declaration(declaration)) = lexemes.first().map(Lexeme::kind) else {
            return false;
        };
        let declaration = *declaration;
        let Some(name) = lexemes.get(1).filter(|lexeme| lexeme.is_identifier()) else {
            return self.wrong(Rule::Declaration, "expected identifier", lexemes);
        };
        let (annotation, rest) = match lexemes.get(2).map(Lexeme::kind) {
            Some(TokenKind::Punct) => match lexemes.get(3).map(Lexeme::kind) {
                Some(TokenKind::Type(value_type)) => (Some(*value_type), &lexemes[4..]),
                _ => return self.wrong(Rule::Declaration, "expected type", lexemes),
            },
            _ => (None, &lexemes[2..]),
        };
        let initializer = match rest.split_first() {
            None => None,
            Some((assign, initializer)) if assign.is(TokenKind::Assign) => Some(initializer),
            Some(_) => {
                return self.wrong(Rule::Declaration, "expected =", lexemes);
            }
        };
        let value_type = match (initializer, annotation) {
            (Some(initializer), _) if !expression(initializer) => {
                return self.wrong(Rule::Declaration, "invalid initializer", lexemes);
            }
            (Some(initializer), annotation) => annotation
                .map(ValueType::from)
                .unwrap_or_else(|| self.infer_type(initializer)),
            (None, _) if declaration == Declaration::Val => {
                return self.wrong(Rule::Declaration, "val requires an initializer", lexemes);
            }
            (None, Some(annotation)) => ValueType::from(annotation),
            (None, None) => {
                return self.wrong(
                    Rule::Declaration,
                    "var requires a type or an initializer",
                    lexemes,
                );
            }
        };
        if let Some(index) = self.operand_index(name) {
            self.set_type(index, value_type);
        }
        self.emit_infix(lexemes[..2].iter().chain(rest));
        true
    }

    /// Gets the type of a declaration initializer
    fn infer_type(&self, initializer: &[Lexeme]) -> ValueType {
        if string(initializer) {
            ValueType::String
        } else if identifier(initializer) {
            initializer[0]
                .table_index()
                .and_then(|index| self.tables.identifiers.get(index))
                .map(|entry| entry.value_type())
                .unwrap_or_default()
        } else if boolean(initializer)
            || initializer
                .iter()
                .any(|lexeme| matches!(lexeme.kind(), TokenKind::RelOp(_)))
        {
            ValueType::Boolean
        } else {
            ValueType::Number
        }
    }

    /// `IDENTIFIER = CONSTANT`
    fn constant_definition(&mut self, lexemes: &[Lexeme]) -> bool {
        match lexemes {
            [name, assign, constant]
                if name.is_identifier() && assign.is(TokenKind::Assign) && constant.is_constant() =>
            {
                self.emit_infix(lexemes);
                true
            }
            _ => false,
        }
    }

    /// `IDENTIFIER = Expression`
    fn assignment(&mut self, lexemes: &[Lexeme]) -> bool {
        match lexemes {
            [name, assign, value @ ..] if name.is_identifier() && assign.is(TokenKind::Assign) => {
                if !expression(value) {
                    return self.wrong(Rule::Assignment, "invalid expression", lexemes);
                }
                self.emit_infix(lexemes);
                true
            }
            _ => false,
        }
    }

    /// `(WhileLoop | ForLoop) LoopStatements`
    fn loop_statement(&mut self, lexemes: &[Lexeme]) -> bool {
        let Some(TokenKind::Loop(keyword @ (LoopKeyword::For | LoopKeyword::While))) =
            lexemes.first().map(Lexeme::kind)
        else {
            return false;
        };
        let keyword = *keyword;
        let start = self.rpn.len();
        let recorded = self.diagnostics.len();
        let Some(header_end) = find_operator_before_suffix(lexemes, |suffix| {
            self.attempt(|p| p.loop_statements(suffix))
        }) else {
            return self.wrong(Rule::Loop, "expected do ... end", lexemes);
        };
        // shorter bodies that were rejected on the way aren't relevant anymore
        self.diagnostics.truncate(recorded);
        let body = self.rpn.split_off(start);
        let header = &lexemes[..=header_end];
        let end_row = lexemes[lexemes.len() - 1].row();
        match keyword {
            LoopKeyword::While => self.while_loop(header, body, end_row),
            _ => self.for_loop(header, body, end_row),
        }
    }

    /// `do StatementList end`
    fn loop_statements(&mut self, lexemes: &[Lexeme]) -> bool {
        let [first, body @ .., last] = lexemes else {
            return false;
        };
        if !first.is(TokenKind::Loop(LoopKeyword::Do)) || !last.is(TokenKind::Loop(LoopKeyword::End)) {
            return false;
        }
        self.depth += 1;
        let parsed = self.statement_list(body).is_ok();
        self.depth -= 1;
        parsed
    }

    /// `while BoolExpression`, lowered as `top : cond exit if body top goto exit :`
    fn while_loop(&mut self, header: &[Lexeme], body: Rpn, end_row: usize) -> bool {
        let condition = &header[1..];
        if !bool_expression(condition) {
            return self.wrong(Rule::WhileLoop, "invalid condition", header);
        }
        let row = header[0].row();
        let top = self.tables.identifiers.push_mark();
        let exit = self.tables.identifiers.push_mark();

        self.rpn.push_identifier(row, top);
        self.rpn.push(row, Op::Label);
        self.emit_infix(condition);
        self.rpn.push_identifier(row, exit);
        self.rpn.push(row, Op::If);
        self.rpn.extend(body);
        self.rpn.push_identifier(end_row, top);
        self.rpn.push(end_row, Op::Goto);
        self.rpn.push_identifier(end_row, exit);
        self.rpn.push(end_row, Op::Label);
        true
    }

    /// `for (Declaration | Assignment) to ArithmExpression`, lowered as
    /// `init top : counter bound < exit if body counter counter 1 + = top goto exit :`
    fn for_loop(&mut self, header: &[Lexeme], body: Rpn, end_row: usize) -> bool {
        if header.len() < 4 {
            return self.wrong(Rule::ForLoop, "expected for ... to ...", header);
        }
        let Some(to) = find_operator_before_suffix(header, arithm_expression) else {
            return self.wrong(Rule::ForLoop, "invalid bound", header);
        };
        if !header[to].is(TokenKind::Loop(LoopKeyword::To)) {
            return self.wrong(Rule::ForLoop, "expected to", header);
        }
        let init = &header[1..to];
        let bound = &header[to + 1..];
        if !self.attempt(|p| p.declaration(init) || p.assignment(init)) {
            return self.wrong(Rule::ForLoop, "invalid initializer", header);
        }
        let counter_lexeme = match init.first().map(Lexeme::kind) {
            Some(TokenKind::Declaration(_)) => &init[1],
            _ => &init[0],
        };
        let Some(counter) = self.operand_index(counter_lexeme) else {
            return self.wrong(Rule::ForLoop, "invalid initializer", header);
        };

        let row = header[0].row();
        let top = self.tables.identifiers.push_mark();
        let exit = self.tables.identifiers.push_mark();
        let one = self.tables.constants.intern(Literal::Number(1.0));

        self.rpn.push_identifier(row, top);
        self.rpn.push(row, Op::Label);
        self.rpn.push_identifier(row, counter);
        self.emit_infix(bound);
        self.rpn.push(row, Op::Lt);
        self.rpn.push_identifier(row, exit);
        self.rpn.push(row, Op::If);
        self.rpn.extend(body);
        self.rpn.push_identifier(end_row, counter);
        self.rpn.push_identifier(end_row, counter);
        self.rpn.push_constant(end_row, one);
        self.rpn.push(end_row, Op::Add);
        self.rpn.push(end_row, Op::Assign);
        self.rpn.push_identifier(end_row, top);
        self.rpn.push(end_row, Op::Goto);
        self.rpn.push_identifier(end_row, exit);
        self.rpn.push(end_row, Op::Label);
        true
    }

    /// `if BoolExpression then goto IDENTIFIER`, lowered as `cond skip if L goto skip :`
    fn condition(&mut self, lexemes: &[Lexeme]) -> bool {
        if !lexemes
            .first()
            .is_some_and(|lexeme| lexeme.is(TokenKind::Condition(ConditionKeyword::If)))
        {
            return false;
        }
        let [.., then, jump, mark] = lexemes else {
            return self.wrong(Rule::Condition, "expected if ... then goto <mark>", lexemes);
        };
        if lexemes.len() < 5
            || !then.is(TokenKind::Condition(ConditionKeyword::Then))
            || !jump.is(TokenKind::Jump)
            || !mark.is_identifier()
        {
            return self.wrong(Rule::Condition, "expected if ... then goto <mark>", lexemes);
        }
        let condition = &lexemes[1..lexemes.len() - 3];
        if !bool_expression(condition) {
            return self.wrong(Rule::Condition, "invalid condition", lexemes);
        }
        let Some(target) = self.operand_index(mark) else {
            return false;
        };
        let row = lexemes[0].row();
        let skip = self.tables.identifiers.push_mark();

        self.emit_infix(condition);
        self.rpn.push_identifier(row, skip);
        self.rpn.push(row, Op::If);
        self.rpn.push_identifier(mark.row(), target);
        self.rpn.push(jump.row(), Op::Goto);
        self.rpn.push_identifier(mark.row(), skip);
        self.rpn.push(mark.row(), Op::Label);
        true
    }

    /// `goto IDENTIFIER`
    fn goto(&mut self, lexemes: &[Lexeme]) -> bool {
        match lexemes {
            [] => false,
            [jump, ..] if !jump.is(TokenKind::Jump) => false,
            [jump, mark] if mark.is_identifier() => {
                let Some(target) = self.operand_index(mark) else {
                    return false;
                };
                self.rpn.push_identifier(mark.row(), target);
                self.rpn.push(jump.row(), Op::Goto);
                true
            }
            _ => self.wrong(Rule::Goto, "expected mark", lexemes),
        }
    }

    /// `IDENTIFIER :`
    fn label_mark(&mut self, lexemes: &[Lexeme]) -> bool {
        match lexemes {
            [mark, colon] if mark.is_identifier() && colon.is(TokenKind::Punct) => {
                let Some(index) = self.operand_index(mark) else {
                    return false;
                };
                self.set_type(index, ValueType::Mark);
                self.rpn.push_identifier(mark.row(), index);
                self.rpn.push(colon.row(), Op::Label);
                true
            }
            _ => false,
        }
    }
}

/// Parses a whole program with a fresh parser
pub fn parse(lexemes: &[Lexeme], tables: Tables) -> Result<Program, SyntaxError> {
    Parser::new(tables).parse(lexemes)
}

/// Splits lexemes into runs sharing the same row
fn row_groups(lexemes: &[Lexeme]) -> Vec<Range<usize>> {
    let mut groups: Vec<Range<usize>> = vec![];
    for (index, lexeme) in lexemes.iter().enumerate() {
        match groups.last_mut() {
            Some(group) if lexemes[group.start].row() == lexeme.row() => group.end = index + 1,
            _ => groups.push(index..index + 1),
        }
    }
    groups
}

fn rows_of(lexemes: &[Lexeme]) -> String {
    lexemes.iter().map(Lexeme::row).dedup().join(",")
}
