//! Helps with debugging

use std::io;
use std::io::{stdout, BufWriter, Write};

use l1_types::Tables;

use crate::rpn::{Instr, Rpn};

/// Responsible for listing RPN programs, one record per line
#[derive(Debug)]
pub struct Disassembler;

impl Disassembler {
    /// Lists a program to stdout
    #[inline]
    pub fn disassemble(&self, rpn: &Rpn, tables: &Tables, name: &str) -> io::Result<()> {
        self.disassemble_to(rpn, tables, name, stdout())
    }

    /// Lists a program to a specific writer
    pub fn disassemble_to<W: Write>(
        &self,
        rpn: &Rpn,
        tables: &Tables,
        name: &str,
        writer: W,
    ) -> io::Result<()> {
        let mut buffer = BufWriter::new(writer);
        writeln!(buffer, "== {} ==", name)?;
        for offset in 0..rpn.len() {
            self.disassemble_record(rpn, tables, offset, &mut buffer)?;
        }
        buffer.flush()?;
        Ok(())
    }

    /// Lists a single record
    pub fn disassemble_record<W: Write>(
        &self,
        rpn: &Rpn,
        tables: &Tables,
        offset: usize,
        mut w: W,
    ) -> io::Result<()> {
        write!(w, "{offset:04} ")?;

        let row = rpn[offset].row;
        if offset > 0 && rpn[offset - 1].row == row {
            write!(w, "   | ")?;
        } else {
            write!(w, "{row:4} ")?;
        }

        let instr = rpn[offset].instr;
        match instr {
            Instr::Constant(index) => {
                writeln!(w, "{:<16} #{index:<6} // {}", "constant", instr.text(tables))
            }
            Instr::Identifier(index) => {
                writeln!(w, "{:<16} #{index:<6} // {}", "identifier", instr.text(tables))
            }
            Instr::Op(op) => writeln!(w, "{op}"),
        }
    }
}
