use clap::{Parser, ValueEnum};
use member_graph::NodeKeying;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "member-graph")]
#[command(
    version,
    about = "Member dependency graph of the classes in a C# file",
    long_about = None
)]
pub struct Args {
    /// C# source file to analyse
    pub file: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Members to start from (node key or member name); repeatable
    #[arg(short, long = "seed")]
    pub seeds: Vec<String>,

    /// Members not to expand past; repeatable
    #[arg(long = "stop")]
    pub stops: Vec<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Dot)]
    pub format: OutputFormat,

    /// Override the configured node keying
    #[arg(short, long, value_enum)]
    pub keying: Option<KeyingArg>,

    /// Write the graph here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Read seed/stop selections from stdin
    #[arg(short, long)]
    pub interactive: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Dot,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KeyingArg {
    Identity,
    Name,
}

impl From<KeyingArg> for NodeKeying {
    fn from(arg: KeyingArg) -> Self {
        match arg {
            KeyingArg::Identity => Self::Identity,
            KeyingArg::Name => Self::Name,
        }
    }
}

impl Args {
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
