// src/cli.rs
use clap::{Command, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse and manage exercise definitions", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Write list output as CSV instead of a table
    #[arg(long, global = true)]
    pub export_csv: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OriginCli {
    All,
    BuiltIn,
    Custom,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the details of one exercise
    Show {
        /// Built-in id (e.g. "plank") or custom id (e.g. "custom_3")
        identifier: String,
    },
    /// List exercises
    List {
        /// Which exercises to include
        #[arg(long, value_enum, default_value_t = OriginCli::All)]
        origin: OriginCli,
        /// Only exercises working this muscle (primary or secondary)
        #[arg(long)]
        muscle: Option<String>,
    },
    /// Define a new custom exercise
    Create {
        /// Name of the exercise (e.g., "Cable Curl")
        #[arg(short, long)]
        name: String,
        /// Comma-separated primary muscles (e.g., "biceps")
        #[arg(short, long)]
        primary: String,
        /// Comma-separated secondary muscles (e.g., "forearms,shoulders")
        #[arg(short, long)]
        secondary: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a custom exercise
    Edit {
        identifier: String,
        #[arg(short, long)]
        name: Option<String>,
        /// Comma-separated primary muscles
        #[arg(short, long)]
        primary: Option<String>,
        /// Comma-separated secondary muscles; an empty string clears them
        #[arg(short, long)]
        secondary: Option<String>,
        /// New notes; an empty string clears them
        #[arg(long)]
        notes: Option<String>,
    },
    /// Delete a custom exercise
    Delete {
        identifier: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show the path to the database file
    DbPath,
    /// Show the path to the config file
    ConfigPath,
    /// Print a shell completion script to stdout
    GenerateCompletion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

// Function to parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

pub fn build_cli_command() -> Command {
    Cli::command()
}
