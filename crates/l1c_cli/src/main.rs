use crate::args::{Args, Emit};
use clap::Parser;
use l1c::listing::{write_identifiers, write_lexemes, write_rpn, write_tables, SEPARATOR};
use l1c::{Compiled, L1c, L1cError};
use owo_colors::OwoColorize;
use owo_colors::Stream::{Stderr as StderrStream, Stdout as StdoutStream};
use std::io;
use std::io::{stderr, stdout, Stderr, StderrLock, Stdout, StdoutLock, Write};
use std::process::ExitCode;
use tracing::metadata::LevelFilter;
use tracing::{debug, error, trace, Level, Metadata};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::{format, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::Registry;

mod args;

fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.log_level_filter())?;
    trace!("starting l1c with args: {args:?}");
    debug!("l1c version: {}", env!("CARGO_PKG_VERSION"));

    let l1c = L1c::builder()
        .step_limit(args.step_limit)
        .strict_lexing(!args.lenient)
        .build()?;

    let compiled = match l1c.compile_file(&args.file) {
        Ok(compiled) => compiled,
        Err(L1cError::Io(e)) => return Err(e.into()),
        Err(e) => return Ok(failure(&e)),
    };
    if args.check {
        println!("{}", "Syntax is correct".if_supports_color(StdoutStream, |text| text.green()));
        return Ok(ExitCode::SUCCESS);
    }
    emit(&args.emit, &compiled, stdout().lock())?;

    match l1c.execute(compiled) {
        Ok(finished) => {
            debug!("ran {} records", finished.steps);
            write_identifiers(stdout().lock(), &finished.tables.identifiers)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(failure(&e)),
    }
}

/// Prints the requested listings, each followed by a separator
fn emit<W: Write>(emit: &[Emit], compiled: &Compiled, mut w: W) -> io::Result<()> {
    let program = &compiled.program;
    for listing in emit {
        match listing {
            Emit::Lexemes => write_lexemes(&mut w, &compiled.lexemes)?,
            Emit::Tables => write_tables(&mut w, &program.tables)?,
            Emit::Rpn => write_rpn(&mut w, &program.rpn, &program.tables)?,
        }
        writeln!(w, "{SEPARATOR}")?;
    }
    Ok(())
}

fn failure(e: &L1cError) -> ExitCode {
    error!("{e}");
    eprintln!("{}", e.if_supports_color(StderrStream, |text| text.bright_red()));
    ExitCode::FAILURE
}

struct MyWriter {
    stdout: Stdout,
    stderr: Stderr,
}

enum StdioLock<'a> {
    Stdout(StdoutLock<'a>),
    Stderr(StderrLock<'a>),
}

impl<'a> io::Write for StdioLock<'a> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            StdioLock::Stdout(stdout) => stdout.write(buf),
            StdioLock::Stderr(stderr) => stderr.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            StdioLock::Stdout(stdout) => stdout.flush(),
            StdioLock::Stderr(stderr) => stderr.flush(),
        }
    }
}

impl<'a> MakeWriter<'a> for MyWriter {
    type Writer = StdioLock<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        StdioLock::Stderr(self.stderr.lock())
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        if meta.level() <= &Level::WARN {
            StdioLock::Stderr(self.stderr.lock())
        } else {
            StdioLock::Stdout(self.stdout.lock())
        }
    }
}

fn init_logging(level_filter: LevelFilter) -> eyre::Result<()> {
    Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format().without_time())
                .with_writer(MyWriter {
                    stdout: stdout(),
                    stderr: stderr(),
                })
                .with_filter(level_filter),
        )
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}
