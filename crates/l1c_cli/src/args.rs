//! the args for running l1c

use clap::ValueEnum;
use l1_cli_common::LoggingArgs;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

/// The args struct
#[derive(Debug, clap::Parser)]
#[clap(author, version, about = "Checks and runs L1 programs")]
pub struct Args {
    #[command(flatten)]
    logging: LoggingArgs,

    /// The source file to run
    #[clap(value_name = "source file", value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,
    /// Print an intermediate listing before running, can be used multiple times
    #[clap(long, value_enum)]
    pub emit: Vec<Emit>,
    /// Only check the syntax, without running the program
    #[clap(long)]
    pub check: bool,
    /// Abort runs that execute more than this many records
    #[clap(long, env = "L1C_STEP_LIMIT")]
    pub step_limit: Option<usize>,
    /// Drop unidentified lexemes instead of failing
    #[clap(long)]
    pub lenient: bool,
}

/// An intermediate listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    Lexemes,
    Tables,
    Rpn,
}

impl Args {
    pub fn log_level_filter(&self) -> LevelFilter {
        self.logging.log_level_filter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn test_args_parsing() {
        let test = "l1c program.l1";
        let args = Args::try_parse_from(test.split(" ")).expect("could not parse test string");
        assert_eq!(args.file, Path::new("program.l1"));
        assert!(args.emit.is_empty());
        assert!(!args.check);
        assert_eq!(args.log_level_filter(), LevelFilter::INFO);
    }

    #[test]
    fn test_emit_many() {
        let test = "l1c --emit lexemes --emit rpn -v --step-limit 1000 program.l1";
        let args = Args::try_parse_from(test.split(" ")).expect("could not parse test string");
        assert_eq!(args.emit, vec![Emit::Lexemes, Emit::Rpn]);
        assert_eq!(args.step_limit, Some(1000));
        assert_eq!(args.log_level_filter(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_file_is_required() {
        assert!(Args::try_parse_from(["l1c", "--check"]).is_err());
        assert!(Args::try_parse_from(["l1c", "--emit", "ast", "program.l1"]).is_err());
    }
}
