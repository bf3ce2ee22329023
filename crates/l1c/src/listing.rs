//! Listings of the tables a pipeline run works with.
//!
//! Every listing is a header line followed by one line per entry. Listings written together are
//! separated by [SEPARATOR].

use l1_rpn::debug::Disassembler;
use l1_rpn::Rpn;
use l1_tokens::token::Lexeme;
use l1_types::{ConstantTable, IdentifierTable, Tables};
use std::io;
use std::io::Write;

/// Line written between two listings
pub const SEPARATOR: &str = "-----";

pub fn write_lexemes<W: Write>(mut w: W, lexemes: &[Lexeme]) -> io::Result<()> {
    writeln!(w, "{:<7} {:<15} {:<15} {}", "ROW", "TEXT", "KIND", "INDEX")?;
    for lexeme in lexemes {
        writeln!(w, "{lexeme}")?;
    }
    Ok(())
}

pub fn write_constants<W: Write>(mut w: W, constants: &ConstantTable) -> io::Result<()> {
    writeln!(w, "{:<15} {:<8} {}", "LITERAL", "TYPE", "INDEX")?;
    for constant in constants.iter() {
        writeln!(w, "{constant}")?;
    }
    Ok(())
}

pub fn write_identifiers<W: Write>(mut w: W, identifiers: &IdentifierTable) -> io::Result<()> {
    writeln!(
        w,
        "{:<15} {:<8} {:<10} {:<6} {}",
        "NAME", "TYPE", "BINDING", "MOD", "INDEX"
    )?;
    for identifier in identifiers.iter() {
        writeln!(w, "{identifier}")?;
    }
    Ok(())
}

/// Writes the constant table and the identifier table
pub fn write_tables<W: Write>(mut w: W, tables: &Tables) -> io::Result<()> {
    write_constants(&mut w, &tables.constants)?;
    writeln!(w, "{SEPARATOR}")?;
    write_identifiers(&mut w, &tables.identifiers)
}

/// Writes a program, one record per line
pub fn write_rpn<W: Write>(w: W, rpn: &Rpn, tables: &Tables) -> io::Result<()> {
    Disassembler.disassemble_to(rpn, tables, "rpn", w)
}
