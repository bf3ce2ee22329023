#![doc = include_str!("../README.md")]

use clap::{value_parser, ArgAction, Args};

/// Common way to set logging levels
#[derive(Debug, Clone, Copy, Args)]
pub struct LoggingArgs {
    /// Logs more, use twice for tracing
    #[clap(short = 'v', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,
    /// Logs less, use twice to turn logging off
    #[clap(short = 'q', value_parser = value_parser!(u8).range(0..=2), action = ArgAction::Count, conflicts_with = "verbose")]
    quiet: u8,
}

impl LoggingArgs {
    /// Gets the logging level based on whether `-v[v]` or `-q[q]` has been used
    #[cfg(feature = "tracing")]
    pub fn log_level_filter(&self) -> tracing::level_filters::LevelFilter {
        use tracing::level_filters::LevelFilter;
        let sum = self.verbose as i8 - self.quiet as i8;
        match sum {
            i8::MIN..=-2 => LevelFilter::OFF,
            -1 => LevelFilter::ERROR,
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestArgs {
        #[command(flatten)]
        logging: LoggingArgs,
    }

    #[test]
    #[cfg(feature = "tracing")]
    fn test_levels() {
        use tracing::level_filters::LevelFilter;

        let level = |args: &[&str]| {
            TestArgs::try_parse_from(args.iter().copied())
                .expect("could not parse")
                .logging
                .log_level_filter()
        };
        assert_eq!(level(&["l1c"]), LevelFilter::INFO);
        assert_eq!(level(&["l1c", "-vv"]), LevelFilter::TRACE);
        assert_eq!(level(&["l1c", "-q"]), LevelFilter::ERROR);
        assert_eq!(level(&["l1c", "-qq"]), LevelFilter::OFF);
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(TestArgs::try_parse_from(["l1c", "-v", "-q"]).is_err());
    }
}
