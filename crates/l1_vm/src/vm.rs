//! The stack machine

use cfg_if::cfg_if;
use l1_rpn::{Instr, Op, Rpn};
use l1_types::{Binding, Literal, Tables, ValueType};
use log::debug;

use crate::vm::error::{RuntimeError, RuntimeErrorKind};

pub mod error;
mod ops;

/// A reference held by the operand stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Constant(usize),
    Identifier(usize),
}

/// Runs a program to its end, returning the final tables
pub fn interpret(program: &Rpn, tables: Tables) -> Result<Tables, RuntimeError> {
    let mut interpreter = Interpreter::new(program, tables);
    interpreter.run()?;
    Ok(interpreter.into_tables())
}

/// Executes an RPN program against its tables
#[derive(Debug)]
pub struct Interpreter<'p> {
    program: &'p Rpn,
    tables: Tables,
    stack: Vec<Operand>,
    cursor: usize,
    steps: usize,
    step_limit: Option<usize>,
}

impl<'p> Interpreter<'p> {
    pub fn new(program: &'p Rpn, tables: Tables) -> Self {
        Self {
            program,
            tables,
            stack: vec![],
            cursor: 0,
            steps: 0,
            step_limit: None,
        }
    }

    /// Aborts runs that execute more than `limit` records
    pub fn with_step_limit(mut self, limit: impl Into<Option<usize>>) -> Self {
        self.step_limit = limit.into();
        self
    }

    /// Runs until the cursor passes the end of the program
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        while let Some(record) = self.program.get(self.cursor).copied() {
            if self.step_limit.is_some_and(|limit| self.steps >= limit) {
                return Err(RuntimeError::new(
                    RuntimeErrorKind::StepLimitExceeded(self.steps),
                    record.row,
                ));
            }
            self.trace_record(record.instr);
            self.cursor += 1;
            self.steps += 1;
            self.execute(record.instr)
                .map_err(|kind| RuntimeError::new(kind, record.row))?;
        }
        debug!("program finished after {} steps", self.steps);
        Ok(())
    }

    /// The operand stack, bottom first
    pub fn stack(&self) -> &[Operand] {
        &self.stack
    }

    /// The number of records executed so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn into_tables(self) -> Tables {
        self.tables
    }

    cfg_if! {
        if #[cfg(feature = "debug_trace_execution")] {
            fn trace_record(&self, instr: Instr) {
                use itertools::Itertools;
                use log::trace;

                trace!(
                    "stack: {}",
                    self.stack
                        .iter()
                        .map(|operand| match operand {
                            Operand::Constant(index) => Instr::Constant(*index),
                            Operand::Identifier(index) => Instr::Identifier(*index),
                        })
                        .map(|instr| format!("[{}]", instr.text(&self.tables)))
                        .join("")
                );
                trace!("{:04} {}", self.cursor, instr.text(&self.tables));
            }
        } else {
            #[inline(always)]
            fn trace_record(&self, _instr: Instr) {}
        }
    }

    fn execute(&mut self, instr: Instr) -> Result<(), RuntimeErrorKind> {
        let op = match instr {
            Instr::Constant(index) => {
                self.push(Operand::Constant(index));
                return Ok(());
            }
            Instr::Identifier(index) => {
                self.push(Operand::Identifier(index));
                return Ok(());
            }
            Instr::Op(op) => op,
        };
        match op {
            Op::Negate => {
                let operand = self.pop(op)?;
                let value = self.resolve(operand)?;
                let negated = ops::negate(&value)?;
                self.push_value(negated);
            }
            Op::Val | Op::Var => {
                let index = self.pop_identifier(op)?;
                self.define(index, op == Op::Var)?;
                self.push(Operand::Identifier(index));
            }
            Op::Goto => {
                let mark = self.pop_identifier(op)?;
                self.jump(mark)?;
            }
            Op::Label => {
                self.pop(op)?;
            }
            Op::If => {
                let mark = self.pop_identifier(op)?;
                let condition = self.pop(op)?;
                let value = self.resolve(condition)?;
                match value {
                    Literal::Boolean(true) => {}
                    Literal::Boolean(false) => self.jump(mark)?,
                    other => {
                        return Err(RuntimeErrorKind::TypeMismatch {
                            op,
                            expected: ValueType::Boolean,
                            found: other.value_type(),
                        })
                    }
                }
            }
            Op::Assign => {
                let value = self.pop(op)?;
                let target = self.pop_identifier(op)?;
                self.assign(target, value)?;
            }
            _ => {
                let last = self.pop(op)?;
                let pre_last = self.pop(op)?;
                let left = self.resolve(pre_last)?;
                let right = self.resolve(last)?;
                let result = ops::binary(op, &left, &right)?;
                self.push_value(result);
            }
        }
        Ok(())
    }

    fn push(&mut self, operand: Operand) {
        self.stack.push(operand);
    }

    /// Interns a computed value and pushes a reference to it
    fn push_value(&mut self, value: Literal) {
        let index = self.tables.constants.intern(value);
        self.push(Operand::Constant(index));
    }

    fn pop(&mut self, op: Op) -> Result<Operand, RuntimeErrorKind> {
        self.stack.pop().ok_or(RuntimeErrorKind::StackUnderflow(op))
    }

    fn pop_identifier(&mut self, op: Op) -> Result<usize, RuntimeErrorKind> {
        match self.pop(op)? {
            Operand::Identifier(index) => Ok(index),
            Operand::Constant(_) => Err(RuntimeErrorKind::NotAnIdentifier(op)),
        }
    }

    fn name(&self, index: usize) -> String {
        self.tables
            .identifiers
            .get(index)
            .map(|entry| entry.name().to_string())
            .unwrap_or_default()
    }

    /// Gets the concrete value behind an operand
    fn resolve(&self, operand: Operand) -> Result<Literal, RuntimeErrorKind> {
        match operand {
            Operand::Constant(index) => self
                .tables
                .constants
                .get(index)
                .map(|constant| constant.value().clone())
                .ok_or(RuntimeErrorKind::InvalidReference(operand)),
            Operand::Identifier(index) => {
                let entry = self
                    .tables
                    .identifiers
                    .get(index)
                    .ok_or(RuntimeErrorKind::InvalidReference(operand))?;
                entry
                    .value()
                    .cloned()
                    .ok_or_else(|| RuntimeErrorKind::Uninitialized(entry.name().to_string()))
            }
        }
    }

    fn define(&mut self, index: usize, modifiable: bool) -> Result<(), RuntimeErrorKind> {
        let entry = self
            .tables
            .identifiers
            .get_mut(index)
            .ok_or(RuntimeErrorKind::InvalidReference(Operand::Identifier(index)))?;
        if entry.binding() != &Binding::Undef {
            return Err(RuntimeErrorKind::Redefined(entry.name().to_string()));
        }
        entry.set_binding(Binding::Def);
        if modifiable {
            entry.set_modifiable(true);
        }
        Ok(())
    }

    fn assign(&mut self, target: usize, value: Operand) -> Result<(), RuntimeErrorKind> {
        let entry = self
            .tables
            .identifiers
            .get(target)
            .ok_or(RuntimeErrorKind::InvalidReference(Operand::Identifier(target)))?;
        match entry.binding() {
            Binding::Undef => {
                return Err(RuntimeErrorKind::Uninitialized(entry.name().to_string()))
            }
            Binding::Value(_) if !entry.modifiable() => {
                return Err(RuntimeErrorKind::NotModifiable(entry.name().to_string()))
            }
            _ => {}
        }
        let expected = entry.value_type();
        let value = self.resolve(value)?;
        if value.value_type() != expected {
            return Err(RuntimeErrorKind::TypeMismatch {
                op: Op::Assign,
                expected,
                found: value.value_type(),
            });
        }
        if let Some(entry) = self.tables.identifiers.get_mut(target) {
            entry.set_binding(Binding::Value(value));
        }
        Ok(())
    }

    /// Moves the cursor right after the label of a mark and clears the operand stack
    fn jump(&mut self, mark: usize) -> Result<(), RuntimeErrorKind> {
        let entry = self
            .tables
            .identifiers
            .get(mark)
            .ok_or(RuntimeErrorKind::InvalidReference(Operand::Identifier(mark)))?;
        if entry.value_type() != ValueType::Mark {
            return Err(RuntimeErrorKind::UnknownMark(entry.name().to_string()));
        }
        let target = self
            .program
            .find_label(mark)
            .ok_or_else(|| RuntimeErrorKind::LabelNotFound(self.name(mark)))?;
        self.cursor = target;
        self.stack.clear();
        Ok(())
    }
}

#[cfg(all(test, feature = "debug_trace_execution"))]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_traced_run() {
        let mut tables = Tables::new();
        let x = tables.identifiers.intern("x");
        if let Some(entry) = tables.identifiers.get_mut(x) {
            entry.set_value_type(ValueType::Number);
        }
        let two = tables.constants.intern(Literal::Number(2.0));
        let mut rpn = Rpn::new();
        rpn.push_identifier(1, x);
        rpn.push(1, Op::Var);
        rpn.push_constant(1, two);
        rpn.push_constant(1, two);
        rpn.push(1, Op::Mult);
        rpn.push(1, Op::Assign);

        let mut interpreter = Interpreter::new(&rpn, tables);
        interpreter.run().expect("could not run");
        assert_eq!(interpreter.steps(), 6);
        assert_eq!(
            interpreter.tables().identifiers.get(x).and_then(|entry| entry.value()),
            Some(&Literal::Number(4.0))
        );
    }
}
