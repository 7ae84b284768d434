//! Flags shared by `new`, `generate`, `add` and the housekeeping commands.
//!
//! Verbosity only changes what reaches stderr through `tracing`; the summary
//! a command prints on stdout is governed by `--quiet` and `--output-format`.

use clap::{Args, builder::FalseyValueParser};
use std::path::PathBuf;

/// Flags accepted before or after any subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log more of what a pass does to stderr.
    ///
    /// At `-v` every scaffold phase and expanded feature is logged; `-vv`
    /// adds each file written and the resolved dialect.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Log scaffold progress to stderr (-v, -vv, -vvv)",
        long_help = "Log scaffold progress to stderr:
    (none)  - warnings only, e.g. a base template whose dialect differs from --lang
    -v      - each scaffold phase and every feature expanded
    -vv     - every file written, the resolved dialect and manifest reads
    -vvv    - trace, every event kiln emits
RUST_LOG, when set, replaces this filter."
    )]
    pub verbose: u8,

    /// Print only errors; the command summary and created-file list are dropped.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Print errors only, no summary"
    )]
    pub quiet: bool,

    /// Plain output without ANSI colours, for logs and the summary alike.
    ///
    /// Any non-empty `NO_COLOR` other than `0`/`false` has the same effect
    /// (see <https://no-color.org>).
    #[arg(
        long = "no-color",
        global = true,
        env = "NO_COLOR",
        value_parser = FalseyValueParser::new(),
        help = "Disable colored output"
    )]
    pub no_color: bool,

    /// A `kiln.toml` read in place of the platform config file. It must exist;
    /// `./kiln.toml` and `KILN__*` variables still apply on top.
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        value_name = "FILE",
        help = "Use this file instead of the user config"
    )]
    pub config: Option<PathBuf>,

    /// How command results are printed on stdout.
    #[arg(
        long = "output-format",
        global = true,
        value_enum,
        default_value = "auto",
        help = "Result format on stdout (json also switches logs to JSON lines)"
    )]
    pub output_format: OutputFormat,
}

/// How command results are printed on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `output.format` from config, else human on a terminal and plain otherwise.
    #[default]
    Auto,
    /// Coloured summary with a spinner while the pass runs.
    Human,
    /// Same summary without colours or spinner.
    Plain,
    /// The scaffold report or catalog as one JSON document.
    Json,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;
    use crate::cli::Cli;

    #[test]
    fn verbosity_counts_repeated_flags() {
        let cli = Cli::try_parse_from(["kiln", "-vv", "list"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert!(!cli.global.quiet);
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli =
            Cli::try_parse_from(["kiln", "list", "-q", "--output-format", "json"]).unwrap();
        assert!(cli.global.quiet);
        assert_eq!(cli.global.output_format, OutputFormat::Json);
    }

    #[test]
    fn verbose_help_names_scaffold_levels() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("each scaffold phase and every feature expanded"));
        assert!(help.contains("RUST_LOG"));
    }
}
