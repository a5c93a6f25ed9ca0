use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use open_case::document::CaseFormat;
use open_case::io::preprocess::SolarTimeSchedule;

#[derive(Parser)]
#[command(name = "open-case", author, version, about = "Load and inspect OPEN simulator cases")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check case files and print every violation.
    Validate {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Print a summary of a case and its warnings.
    Show(CaseSource),

    /// Re-serialize a case in canonical form.
    Normalize {
        path: PathBuf,

        /// Write here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format; defaults to the output file extension, else YAML.
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Ambient temperature at EMS resolution for one day.
    Ambient {
        #[command(flatten)]
        source: CaseSource,

        /// Day stamped on the profile; defaults to the day of the station file.
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Write `DateTime,DegreeCelsius` CSV here instead of printing a table.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Sample connection plans for the EV fleet.
    Fleet {
        #[command(flatten)]
        source: CaseSource,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Convert a raw MeteoNavarra export from solar to civil time.
    PreprocessTemperature {
        #[arg(short, long)]
        input: PathBuf,

        /// `winter` (+1 h) or `summer` (+2 h).
        #[arg(long)]
        schedule: SolarTimeSchedule,

        /// First day kept (inclusive).
        #[arg(long)]
        start: NaiveDate,

        /// Day after the last day kept (exclusive).
        #[arg(long)]
        end: NaiveDate,

        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

/// Where a case comes from: a file or a built-in preset, never both.
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct CaseSource {
    /// Case file (`.toml` as TOML, anything else as YAML).
    pub path: Option<PathBuf>,

    /// Built-in case name.
    #[arg(long)]
    pub preset: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Yaml,
    Toml,
}

impl From<FormatArg> for CaseFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Yaml => Self::Yaml,
            FormatArg::Toml => Self::Toml,
        }
    }
}
