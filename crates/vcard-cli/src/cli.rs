//! CLI argument definitions for the batch runner.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "vcard-batch",
    version,
    about = "Normalize one contact file into the record stores",
    long_about = "Normalize one uploaded contact list into canonical contact records.\n\n\
                  Reads CSV, TSV, plain text, JSON, and spreadsheet files, maps their\n\
                  columns onto the canonical contact fields, and writes every record to\n\
                  the narrow and wide stores. Prints one JSON result line on stdout."
)]
pub struct Cli {
    /// Identifier of the batch being processed.
    #[arg(long = "batch-id", env = "VCARD_BATCH_ID")]
    pub batch_id: String,

    /// Path of the source file, relative to the storage root when one is set.
    #[arg(long = "file-path", value_name = "PATH", env = "VCARD_FILE_PATH")]
    pub file_path: PathBuf,

    /// SQLite database holding searchable records and batch status.
    #[arg(long = "narrow-db", value_name = "PATH", env = "VCARD_NARROW_DB")]
    pub narrow_db: PathBuf,

    /// SQLite database holding full contact records.
    #[arg(long = "wide-db", value_name = "PATH", env = "VCARD_WIDE_DB")]
    pub wide_db: PathBuf,

    /// How the source file is fetched.
    #[arg(
        long = "storage-mode",
        value_enum,
        default_value = "local",
        env = "VCARD_STORAGE_MODE"
    )]
    pub storage_mode: StorageModeArg,

    /// Directory source paths are resolved against.
    #[arg(long = "storage-root", value_name = "DIR", env = "VCARD_STORAGE_ROOT")]
    pub storage_root: Option<PathBuf>,

    /// Digits prepended to four-digit work numbers.
    #[arg(long = "work-phone-prefix", env = "VCARD_WORK_PHONE_PREFIX")]
    pub work_phone_prefix: Option<String>,

    /// Country code placed before formatted local numbers, e.g. "+(506)".
    #[arg(long = "country-code", env = "VCARD_COUNTRY_CODE")]
    pub country_code: Option<String>,

    /// Records between commits of the narrow store.
    #[arg(long = "checkpoint-interval", default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub checkpoint_interval: u32,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Allow contact values (names, emails, phones) in log output.
    #[arg(long = "log-data")]
    pub log_data: bool,
}

/// Source file retrieval modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StorageModeArg {
    /// Read the file where it is.
    Local,
    /// Copy the file to a temporary location first and delete the copy after.
    Staged,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from([
            "vcard-batch",
            "--batch-id",
            "b-1",
            "--file-path",
            "contacts.csv",
            "--narrow-db",
            "narrow.db",
            "--wide-db",
            "wide.db",
        ])
        .unwrap();
        assert_eq!(cli.storage_mode, StorageModeArg::Local);
        assert_eq!(cli.checkpoint_interval, 100);
        assert!(!cli.log_data);
    }

    #[test]
    fn zero_checkpoint_interval_is_rejected() {
        let result = Cli::try_parse_from([
            "vcard-batch",
            "--batch-id",
            "b-1",
            "--file-path",
            "contacts.csv",
            "--narrow-db",
            "narrow.db",
            "--wide-db",
            "wide.db",
            "--checkpoint-interval",
            "0",
        ]);
        assert!(result.is_err());
    }
}
